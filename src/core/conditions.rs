use serde::Serialize;

use crate::quantity::{energy::KilowattHours, rate::KilowattHourRate};

/// External hourly conditions: what the household consumes, what the panels produce,
/// and what the grid charges and pays.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub hour: usize,

    #[serde(rename = "importPrice")]
    pub import_rate: KilowattHourRate,

    #[serde(rename = "exportPrice")]
    pub export_rate: KilowattHourRate,

    pub load: KilowattHours,
    pub solar_generation: KilowattHours,
}

impl Conditions {
    /// Energy the household has to cover from elsewhere after the solar production.
    pub fn deficit(&self) -> KilowattHours {
        (self.load - self.solar_generation).max(KilowattHours::ZERO)
    }

    /// Positive is excess solar energy, negative is deficit.
    pub fn net_energy(&self) -> KilowattHours {
        self.solar_generation - self.load
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Build a flat-price day with the given per-hour import and export rates.
    pub fn day_from_rates(import_rates: &[f64], export_rates: &[f64]) -> Vec<Conditions> {
        import_rates
            .iter()
            .zip(export_rates)
            .enumerate()
            .map(|(hour, (import_rate, export_rate))| Conditions {
                hour,
                import_rate: KilowattHourRate(*import_rate),
                export_rate: KilowattHourRate(*export_rate),
                load: KilowattHours(1.0),
                solar_generation: KilowattHours::ZERO,
            })
            .collect()
    }

    #[test]
    fn deficit_is_non_negative() {
        let conditions = Conditions {
            hour: 12,
            import_rate: KilowattHourRate(0.1),
            export_rate: KilowattHourRate(0.1),
            load: KilowattHours(2.0),
            solar_generation: KilowattHours(5.0),
        };
        assert_eq!(conditions.deficit(), KilowattHours::ZERO);
        assert_eq!(conditions.net_energy(), KilowattHours(3.0));
    }
}
