use serde::Serialize;

use crate::{
    core::{
        classifier::ArbitrageThresholds,
        conditions::Conditions,
        found::Found,
        ledger::LedgerEntry,
        profile::{EnergyProfileEntry, LOOK_AHEAD_HOURS, needed_energy_profile},
        simulator::AnalyzedHour,
        zone::{Zone, ZoneKind, cheaper_tariff_zones, expensive_import_zones, export_price_zones},
    },
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// Import tariff below this share of the average makes for a cheaper tariff zone.
const CHEAP_IMPORT_FACTOR: f64 = 0.9;

/// Export tariff above this share of the average makes for a cheaper tariff zone.
const GOOD_EXPORT_FACTOR: f64 = 1.1;

/// Daily totals of one battery configuration ledger.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub total_grid_import: KilowattHours,
    pub total_grid_export: KilowattHours,
    pub total_import_cost: Cost,
    pub total_export_profit: Cost,
    pub net_cost: Cost,
}

impl LedgerTotals {
    fn new<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            totals.total_grid_import += entry.grid_import;
            totals.total_grid_export += entry.grid_export;
            totals.total_import_cost += entry.import_cost;
            totals.total_export_profit += entry.export_profit;
        }
        totals.net_cost = totals.total_import_cost - totals.total_export_profit;
        totals.round_to_hundredths()
    }

    fn round_to_hundredths(self) -> Self {
        Self {
            total_grid_import: self.total_grid_import.round_to_hundredths(),
            total_grid_export: self.total_grid_export.round_to_hundredths(),
            total_import_cost: self.total_import_cost.round_to_hundredths(),
            total_export_profit: self.total_export_profit.round_to_hundredths(),
            net_cost: self.net_cost.round_to_hundredths(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_load: KilowattHours,
    pub total_solar_generation: KilowattHours,

    /// Totals of the primary battery configuration.
    #[serde(flatten)]
    pub primary: LedgerTotals,

    /// Totals of every battery configuration, including the primary one.
    pub ledgers: Vec<LedgerTotals>,

    pub final_battery_capacity: KilowattHours,
    pub arbitrage: ArbitrageThresholds,
    pub export_price_zones: Found<Zone>,
    pub expensive_import_zones: Found<Zone>,
    pub cheaper_tariff_zones: Found<Zone<ZoneKind>>,
    pub needed_energy_profile: Found<EnergyProfileEntry>,
}

impl Summary {
    pub fn new(hours: &[AnalyzedHour], n_ledgers: usize, arbitrage: ArbitrageThresholds) -> Self {
        let series: Vec<Conditions> = hours.iter().map(|hour| hour.conditions).collect();
        let ledgers: Vec<LedgerTotals> = (0..n_ledgers)
            .map(|index| LedgerTotals::new(hours.iter().filter_map(|hour| hour.ledgers.get(index))))
            .collect();

        let average_import_rate =
            KilowattHourRate::mean(series.iter().map(|conditions| conditions.import_rate));
        let average_export_rate =
            KilowattHourRate::mean(series.iter().map(|conditions| conditions.export_rate));
        let expensive_import_zones = expensive_import_zones(&series, average_import_rate);
        let needed_energy_profile =
            needed_energy_profile(&series, &expensive_import_zones, LOOK_AHEAD_HOURS);

        Self {
            total_load: series
                .iter()
                .map(|conditions| conditions.load)
                .sum::<KilowattHours>()
                .round_to_hundredths(),
            total_solar_generation: series
                .iter()
                .map(|conditions| conditions.solar_generation)
                .sum::<KilowattHours>()
                .round_to_hundredths(),
            primary: ledgers.first().copied().unwrap_or_default(),
            ledgers,
            final_battery_capacity: hours
                .last()
                .map_or(KilowattHours::ZERO, |hour| hour.battery_level.round_to_hundredths()),
            arbitrage,
            export_price_zones: export_price_zones(&series, average_export_rate).into(),
            cheaper_tariff_zones: cheaper_tariff_zones(
                &series,
                average_import_rate * CHEAP_IMPORT_FACTOR,
                average_export_rate * GOOD_EXPORT_FACTOR,
            )
            .into(),
            expensive_import_zones: expensive_import_zones.into(),
            needed_energy_profile: needed_energy_profile.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    use super::*;
    use crate::core::conditions::tests::day_from_rates;

    fn analyzed(series: Vec<Conditions>) -> Vec<AnalyzedHour> {
        series
            .into_iter()
            .enumerate()
            .map(|(index, conditions)| {
                #[expect(clippy::cast_precision_loss)]
                let grid_import = KilowattHours(index as f64);
                let mut hour = AnalyzedHour::idle(conditions, KilowattHours(1.5), 2);
                hour.ledgers = vec![
                    LedgerEntry::settle(&conditions, None, grid_import, KilowattHours::ZERO),
                    LedgerEntry::settle(&conditions, None, grid_import * 2.0, KilowattHours(1.0)),
                ];
                hour
            })
            .collect()
    }

    #[test]
    fn totals_ok() {
        let hours = analyzed(day_from_rates(&[0.1, 0.2, 0.3], &[0.01, 0.01, 0.01]));
        let summary = Summary::new(&hours, 2, ArbitrageThresholds::default());

        assert_abs_diff_eq!(summary.total_load.0, 3.0);
        assert_abs_diff_eq!(summary.total_solar_generation.0, 0.0);
        assert_abs_diff_eq!(summary.final_battery_capacity.0, 1.5);

        // Import 0 + 1 + 2 kWh at 0.1, 0.2 and 0.3:
        assert_abs_diff_eq!(summary.primary.total_grid_import.0, 3.0);
        assert_abs_diff_eq!(summary.primary.total_import_cost.0, 0.8);
        assert_abs_diff_eq!(summary.primary.net_cost.0, 0.8);
        assert_eq!(summary.ledgers[0], summary.primary);

        assert_abs_diff_eq!(summary.ledgers[1].total_grid_import.0, 6.0);
        assert_abs_diff_eq!(summary.ledgers[1].total_import_cost.0, 1.6);
        assert_abs_diff_eq!(summary.ledgers[1].total_export_profit.0, 0.03);
        assert_abs_diff_eq!(summary.ledgers[1].net_cost.0, 1.57);
    }

    #[test]
    fn zones_ok() {
        let hours = analyzed(day_from_rates(&[0.1, 0.1, 0.4, 0.4], &[0.0, 0.3, 0.0, 0.0]));
        let summary = Summary::new(&hours, 1, ArbitrageThresholds::default());
        assert_eq!(summary.expensive_import_zones.as_slice(), [Zone { start: 2, end: 3, kind: () }]);
        assert_eq!(summary.export_price_zones.as_slice(), [Zone { start: 1, end: 1, kind: () }]);
        assert_eq!(
            summary.cheaper_tariff_zones.as_slice(),
            [Zone { start: 0, end: 1, kind: ZoneKind::Import }],
        );
        assert_eq!(summary.needed_energy_profile.as_slice().len(), 4);
    }

    #[test]
    fn flat_prices_serialize_without_zones() {
        let hours = analyzed(day_from_rates(&[0.25; 3], &[0.5; 3]));
        let summary = serde_json::to_value(Summary::new(&hours, 1, ArbitrageThresholds::default())).unwrap();

        // Flat prices are all at the average, hence expensive:
        assert_eq!(summary["expensiveImportZones"], json!([{"start": 0, "end": 2}]));
        assert_eq!(summary["cheaperTariffZones"], json!("None"));
        assert_eq!(summary["totalGridImport"], json!(3.0));
        assert_eq!(summary["ledgers"][0]["netCost"], json!(0.75));
    }

    #[test]
    fn final_level_is_rounded() {
        let mut hours = analyzed(day_from_rates(&[0.1, 0.2], &[0.0, 0.0]));
        hours[1].battery_level = KilowattHours(3.456_789);
        let summary = Summary::new(&hours, 2, ArbitrageThresholds::default());
        assert_eq!(summary.final_battery_capacity, KilowattHours(3.46));
    }

    #[test]
    fn empty_day_ok() {
        let summary = Summary::new(&[], 2, ArbitrageThresholds::default());
        assert_eq!(summary.final_battery_capacity, KilowattHours::ZERO);
        assert_eq!(summary.ledgers, vec![LedgerTotals::default(); 2]);
        assert!(summary.needed_energy_profile.as_slice().is_empty());
    }
}
