#[macro_use]
pub mod macros;

pub mod cost;
pub mod energy;
pub mod rate;

/// Round to two decimal places, the precision of every reported value.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate};

    #[test]
    fn round_to_hundredths_ok() {
        assert_abs_diff_eq!(round_to_hundredths(1.234_56), 1.23);
        assert_abs_diff_eq!(round_to_hundredths(-0.056), -0.06);
    }

    #[test]
    fn energy_times_rate_is_cost() {
        assert_eq!(KilowattHours(2.0) * KilowattHourRate(0.25), Cost(0.5));
    }

    #[test]
    fn ordering_ok() {
        assert!(KilowattHours(1.0) < KilowattHours(2.0));
        assert_eq!(KilowattHours(3.0).min(KilowattHours(2.0)), KilowattHours(2.0));
        assert_eq!(KilowattHourRate(-0.1).max(KilowattHourRate::ZERO), KilowattHourRate::ZERO);
    }

    #[test]
    fn display_respects_precision() {
        assert_eq!(format!("{:.2}", KilowattHours(1.234)), "1.23 kWh");
        assert_eq!(format!("{:.2}", Cost(-0.5)), "-0.50 €");
    }
}
