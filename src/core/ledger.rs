use serde::Serialize;

use crate::{
    core::{conditions::Conditions, efficiency::EfficiencyCurve},
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Efficiency curves of one battery configuration.
///
/// Several configurations share the same physical schedule, each keeping its own ledger.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BatteryConfiguration {
    pub charging: EfficiencyCurve,
    pub discharging: EfficiencyCurve,
}

impl BatteryConfiguration {
    /// Round-trip efficiency at the lowest rates.
    pub fn round_trip_efficiency(&self) -> f64 {
        self.charging.base * self.discharging.base
    }
}

/// Hourly grid flow and money of one battery configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Realized conversion efficiency, when the battery was active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,

    pub grid_import: KilowattHours,
    pub grid_export: KilowattHours,

    /// Export minus import: positive when feeding into the grid.
    pub grid_power: KilowattHours,

    pub import_cost: Cost,
    pub export_profit: Cost,
}

impl LedgerEntry {
    /// Bill the grid flows at the hour's rates.
    pub fn settle(
        conditions: &Conditions,
        efficiency: Option<f64>,
        grid_import: KilowattHours,
        grid_export: KilowattHours,
    ) -> Self {
        Self {
            efficiency,
            grid_import,
            grid_export,
            grid_power: grid_export - grid_import,
            import_cost: grid_import * conditions.import_rate,
            export_profit: grid_export * conditions.export_rate,
        }
    }

    /// Import a negative energy balance, export a positive one.
    pub fn settle_balance(
        conditions: &Conditions,
        efficiency: Option<f64>,
        balance: KilowattHours,
    ) -> Self {
        Self::settle(
            conditions,
            efficiency,
            (-balance).max(KilowattHours::ZERO),
            balance.max(KilowattHours::ZERO),
        )
    }

    pub fn net_cost(&self) -> Cost {
        self.import_cost - self.export_profit
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::conditions::tests::day_from_rates;

    #[test]
    fn settle_ok() {
        let conditions = day_from_rates(&[0.2], &[0.1])[0];
        let entry = LedgerEntry::settle(&conditions, None, KilowattHours(2.0), KilowattHours(1.0));
        assert_abs_diff_eq!(entry.import_cost.0, 0.4);
        assert_abs_diff_eq!(entry.export_profit.0, 0.1);
        assert_abs_diff_eq!(entry.net_cost().0, 0.3, epsilon = 1e-12);
        assert_eq!(entry.grid_power, KilowattHours(-1.0));
    }

    #[test]
    fn grid_power_is_export_minus_import() {
        let conditions = day_from_rates(&[0.2], &[0.1])[0];

        let importing = LedgerEntry::settle_balance(&conditions, None, KilowattHours(-1.5));
        assert_eq!(importing.grid_import, KilowattHours(1.5));
        assert_eq!(importing.grid_export, KilowattHours::ZERO);
        assert_eq!(importing.grid_power, KilowattHours(-1.5));

        let exporting = LedgerEntry::settle_balance(&conditions, Some(0.9), KilowattHours(2.0));
        assert_eq!(exporting.grid_import, KilowattHours::ZERO);
        assert_eq!(exporting.grid_power, KilowattHours(2.0));
        assert_abs_diff_eq!(exporting.export_profit.0, 0.2);

        let json = serde_json::to_value(exporting).unwrap();
        assert_eq!(json["gridPower"], 2.0);
    }

    #[test]
    fn round_trip_efficiency_ok() {
        let configuration = BatteryConfiguration {
            charging: EfficiencyCurve::new(0.9, 0.1),
            discharging: EfficiencyCurve::new(0.8, 0.2),
        };
        assert_abs_diff_eq!(configuration.round_trip_efficiency(), 0.72, epsilon = 1e-12);
    }
}
