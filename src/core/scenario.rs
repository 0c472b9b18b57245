use std::f64::consts::PI;

use rand::Rng;
use serde::Serialize;

use crate::{
    core::{conditions::Conditions, pricing::PricingStructure},
    prelude::*,
    quantity::{energy::KilowattHours, round_to_hundredths},
};

pub const N_HOURS: usize = 24;

/// Peak solar generation at noon for the unit multiplier.
const PEAK_SOLAR_GENERATION: f64 = 6.0;

/// Household demand and solar production profile of the simulated day.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Scenario {
    HighSolarHighLoad,
    HighSolarLowLoad,
    LowSolarHighLoad,
    LowSolarLowLoad,
    NoSolar,
}

impl Scenario {
    /// The no-solar flag takes precedence over the other two.
    pub const fn select(high_solar: bool, high_load: bool, no_solar_and_load: bool) -> Self {
        match (no_solar_and_load, high_solar, high_load) {
            (true, _, _) => Self::NoSolar,
            (false, true, true) => Self::HighSolarHighLoad,
            (false, true, false) => Self::HighSolarLowLoad,
            (false, false, true) => Self::LowSolarHighLoad,
            (false, false, false) => Self::LowSolarLowLoad,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::HighSolarHighLoad => "High Solar, High Load",
            Self::HighSolarLowLoad => "High Solar, Low Load",
            Self::LowSolarHighLoad => "Low Solar, High Load",
            Self::LowSolarLowLoad => "Low Solar, Low Load",
            Self::NoSolar => "No Solar",
        }
    }

    pub const fn solar_multiplier(self) -> f64 {
        match self {
            Self::HighSolarHighLoad | Self::HighSolarLowLoad => 1.5,
            Self::LowSolarHighLoad | Self::LowSolarLowLoad => 0.5,
            Self::NoSolar => 0.0,
        }
    }

    pub const fn load_multiplier(self) -> f64 {
        match self {
            Self::HighSolarHighLoad | Self::LowSolarHighLoad => 1.5,
            Self::HighSolarLowLoad | Self::LowSolarLowLoad => 0.5,
            Self::NoSolar => 1.0,
        }
    }

    /// Generate the hourly conditions for the whole day.
    #[instrument(skip_all, fields(scenario = ?self, pricing = ?pricing))]
    pub fn generate<R: Rng + ?Sized>(
        self,
        pricing: PricingStructure,
        rng: &mut R,
    ) -> Vec<Conditions> {
        let series: Vec<Conditions> = (0..N_HOURS)
            .map(|hour| {
                let (import_rate, export_rate) = pricing.draw_rates(hour, rng);
                Conditions {
                    hour,
                    import_rate: import_rate.round_to_hundredths(),
                    export_rate: export_rate.round_to_hundredths(),
                    load: KilowattHours(round_to_hundredths(
                        base_load(hour) * self.load_multiplier(),
                    )),
                    solar_generation: KilowattHours(round_to_hundredths(
                        unit_solar_generation(hour) * self.solar_multiplier(),
                    )),
                }
            })
            .collect();
        debug!(n_hours = series.len(), "generated");
        series
    }
}

/// Household load for the unit multiplier: ramps up through the morning and evening peaks.
#[expect(clippy::cast_precision_loss)]
fn base_load(hour: usize) -> f64 {
    match hour {
        6..=9 => 0.5f64.mul_add((hour - 6) as f64, 3.0),
        17..=22 => 0.5f64.mul_add((hour - 17) as f64, 4.0),
        0..6 | 23.. => 2.0,
        _ => 3.5,
    }
}

/// Half-sine bell between 6:00 and 18:00, peaking at noon.
#[expect(clippy::cast_precision_loss)]
fn unit_solar_generation(hour: usize) -> f64 {
    if (6..=18).contains(&hour) {
        PEAK_SOLAR_GENERATION * ((hour - 6) as f64 / 12.0 * PI).sin()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::quantity::rate::KilowattHourRate;

    #[test]
    fn generates_every_hour_once() {
        let mut rng = StdRng::seed_from_u64(0);
        let series = Scenario::HighSolarHighLoad.generate(PricingStructure::Normal, &mut rng);
        assert_eq!(series.len(), N_HOURS);
        assert_eq!(series.iter().map(|conditions| conditions.hour).collect_vec(), (0..24).collect_vec());
    }

    #[test]
    fn same_seed_same_day() {
        let lhs = Scenario::LowSolarLowLoad
            .generate(PricingStructure::Normal, &mut StdRng::seed_from_u64(99));
        let rhs = Scenario::LowSolarLowLoad
            .generate(PricingStructure::Normal, &mut StdRng::seed_from_u64(99));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn values_are_rounded() {
        let series = Scenario::HighSolarLowLoad
            .generate(PricingStructure::VariableCheapRatesLowExport, &mut StdRng::seed_from_u64(5));
        for conditions in series {
            for value in [
                conditions.import_rate.0,
                conditions.export_rate.0,
                conditions.load.0,
                conditions.solar_generation.0,
            ] {
                assert_abs_diff_eq!(value, round_to_hundredths(value));
            }
        }
    }

    #[test]
    fn load_profile() {
        assert_abs_diff_eq!(base_load(0), 2.0);
        assert_abs_diff_eq!(base_load(7), 3.5);
        assert_abs_diff_eq!(base_load(12), 3.5);
        assert_abs_diff_eq!(base_load(22), 6.5);
        assert_abs_diff_eq!(base_load(23), 2.0);
    }

    #[test]
    fn solar_profile() {
        assert_abs_diff_eq!(unit_solar_generation(5), 0.0);
        assert_abs_diff_eq!(unit_solar_generation(12), PEAK_SOLAR_GENERATION);
        assert_abs_diff_eq!(unit_solar_generation(18), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(unit_solar_generation(19), 0.0);
    }

    #[test]
    fn no_solar_scenario() {
        let series =
            Scenario::NoSolar.generate(PricingStructure::SimpleCheaper, &mut StdRng::seed_from_u64(1));
        assert!(series.iter().all(|conditions| conditions.solar_generation == KilowattHours::ZERO));
        assert_eq!(series[0].import_rate, KilowattHourRate(0.05));
        assert_eq!(series[0].load, KilowattHours(2.0));
    }

    #[test]
    fn select_precedence() {
        assert_eq!(Scenario::select(true, true, true), Scenario::NoSolar);
        assert_eq!(Scenario::select(true, false, false), Scenario::HighSolarLowLoad);
        assert_eq!(Scenario::select(false, true, false), Scenario::LowSolarHighLoad);
        assert_eq!(Scenario::select(false, false, false), Scenario::LowSolarLowLoad);
    }
}
