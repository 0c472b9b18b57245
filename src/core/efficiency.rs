/// Efficiency never drops below this, whatever the C-rate.
pub const MIN_EFFICIENCY: f64 = 0.5;

/// Efficiency lost per C-rate step.
const LOSS_PER_STEP: f64 = 0.01;

/// Absorbs the representation error of decimal rates, for example `0.3 / 0.1 = 2.999…`.
const STEP_TOLERANCE: f64 = 1e-9;

/// Conversion efficiency that degrades stepwise with the charging or discharging rate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EfficiencyCurve {
    /// Efficiency at the lowest rates.
    pub base: f64,

    /// C-rate increment that costs another percent of efficiency.
    pub step: f64,
}

impl EfficiencyCurve {
    pub const fn new(base: f64, step: f64) -> Self {
        Self { base, step }
    }

    /// Efficiency at the given C-rate.
    pub fn at(self, c_rate: f64) -> f64 {
        let n_steps = (c_rate / self.step + STEP_TOLERANCE).floor();
        (self.base - n_steps * LOSS_PER_STEP).max(MIN_EFFICIENCY)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn base_at_zero_rate() {
        assert_abs_diff_eq!(EfficiencyCurve::new(0.95, 0.1).at(0.0), 0.95, epsilon = 1e-12);
    }

    #[test]
    fn degrades_per_step() {
        let curve = EfficiencyCurve::new(0.95, 0.1);
        assert_abs_diff_eq!(curve.at(0.1), 0.94, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.at(0.3), 0.92, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.at(0.35), 0.92, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.at(1.0), 0.85, epsilon = 1e-12);
    }

    #[test]
    fn wider_step() {
        let curve = EfficiencyCurve::new(0.9, 0.2);
        assert_abs_diff_eq!(curve.at(0.1), 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.at(0.3), 0.89, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.at(0.6), 0.87, epsilon = 1e-12);
    }

    #[test]
    fn floored() {
        assert_abs_diff_eq!(EfficiencyCurve::new(0.55, 0.01).at(1.0), MIN_EFFICIENCY, epsilon = 1e-12);
    }
}
