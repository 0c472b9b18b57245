use serde::Serialize;

use crate::{
    core::{
        conditions::Conditions,
        ledger::BatteryConfiguration,
        reason::Reason,
        simulator::AnalyzedHour,
    },
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Dynamic "good price" thresholds around the day's price midpoint.
///
/// The margin grows with the round-trip losses: a lossy battery needs a wider price
/// spread to make a trade worth it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageThresholds {
    pub max_export_price: KilowattHourRate,
    pub min_import_price: KilowattHourRate,
    pub efficiency_loss_factor: f64,
    pub arbitrage_margin: KilowattHourRate,
    pub mid_price: KilowattHourRate,
    pub good_import_threshold: KilowattHourRate,
    pub good_export_threshold: KilowattHourRate,
}

impl ArbitrageThresholds {
    /// Calculate the thresholds for the series, using the base efficiencies of the configuration.
    pub fn new<'a>(
        series: impl IntoIterator<Item = &'a Conditions> + Clone,
        configuration: &BatteryConfiguration,
    ) -> Self {
        let max_export_price = series
            .clone()
            .into_iter()
            .map(|conditions| conditions.export_rate)
            .max()
            .unwrap_or(KilowattHourRate::ZERO);
        let min_import_price = series
            .into_iter()
            .map(|conditions| conditions.import_rate)
            .min()
            .unwrap_or(KilowattHourRate::ZERO);
        let efficiency_loss_factor = 1.0 - configuration.round_trip_efficiency();
        let arbitrage_margin = (max_export_price - min_import_price) * efficiency_loss_factor;
        let mid_price = (max_export_price + min_import_price) / 2.0;
        Self {
            max_export_price,
            min_import_price,
            efficiency_loss_factor,
            arbitrage_margin,
            mid_price,
            good_import_threshold: mid_price - arbitrage_margin,
            good_export_threshold: mid_price + arbitrage_margin,
        }
    }

    /// Relabel the hours with good prices. A good export overrides a good import.
    #[instrument(skip_all, fields(mid_price = ?self.mid_price, margin = ?self.arbitrage_margin))]
    pub fn relabel(&self, hours: &mut [AnalyzedHour]) {
        let mut n_relabeled = 0_usize;
        for hour in hours {
            let original = hour.reason;
            if hour.conditions.import_rate <= self.good_import_threshold {
                hour.reason = hour.reason.overridden_by(Reason::GoodImport);
            }
            if hour.conditions.export_rate >= self.good_export_threshold {
                hour.reason = hour.reason.overridden_by(Reason::GoodExport);
            }
            if hour.reason != original {
                n_relabeled += 1;
            }
        }
        debug!(n_relabeled, "relabeled");
    }
}
