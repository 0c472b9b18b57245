//! Rule-based dispatch: sell the battery into expensive hours, refill it ahead of them.

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        conditions::Conditions,
        ledger::{BatteryConfiguration, LedgerEntry},
        reason::Reason,
        simulator::{AnalyzedHour, InitialLevel, LevelSnapshot, c_rate_of, walk},
        working_mode::{Remainder, WorkingMode},
        zone::{Zone, cheap_import_zones, expensive_import_zones},
    },
    prelude::*,
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
};

/// Share of the capacity never discharged in the expensive hours.
pub const RESERVE_SHARE: f64 = 0.2;

/// Import rate above this multiple of the average makes an hour expensive.
pub const EXPENSIVE_FACTOR: f64 = 1.2;

/// Import rate below this multiple of the average makes an hour cheap.
pub const CHEAP_FACTOR: f64 = 0.8;

/// How the battery schedule is decided.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Brute-force the fixed charging and discharging windows.
    #[default]
    Optimal,

    /// Follow the import price relative to the daily average.
    Heuristic,
}

#[derive(Builder)]
pub struct Dispatcher<'a> {
    capacity: KilowattHours,
    charging_c_rate: f64,
    discharging_c_rate: f64,
    configurations: &'a [BatteryConfiguration],

    #[builder(default)]
    initial_level: InitialLevel,

    #[builder(default)]
    level_snapshot: LevelSnapshot,
}

/// Price landmarks of the day the rules are checked against.
struct Landmarks {
    expensive_threshold: KilowattHourRate,
    expensive_zones: Vec<Zone>,
    cheap_zones: Vec<Zone>,
}

impl Landmarks {
    fn new(series: &[Conditions]) -> Self {
        let average = KilowattHourRate::mean(series.iter().map(|conditions| conditions.import_rate));
        let expensive_threshold = average * EXPENSIVE_FACTOR;
        Self {
            expensive_threshold,
            expensive_zones: expensive_import_zones(series, expensive_threshold),
            cheap_zones: cheap_import_zones(series, average * CHEAP_FACTOR),
        }
    }

    fn is_cheap(&self, index: usize) -> bool {
        self.cheap_zones.iter().any(|zone| zone.contains(index))
    }

    /// Household deficit of the first expensive zone starting after the hour.
    fn needed_ahead(&self, series: &[Conditions], index: usize) -> KilowattHours {
        self.expensive_zones
            .iter()
            .find(|zone| zone.start > index)
            .and_then(|zone| series.get(zone.start..=zone.end))
            .map_or(KilowattHours::ZERO, |span| span.iter().map(Conditions::deficit).sum())
    }
}

impl Dispatcher<'_> {
    #[instrument(skip_all, fields(capacity = ?self.capacity, n_hours = series.len()))]
    pub fn run(&self, series: &[Conditions]) -> Vec<AnalyzedHour> {
        let landmarks = Landmarks::new(series);
        debug!(
            expensive_threshold = ?landmarks.expensive_threshold,
            n_expensive_zones = landmarks.expensive_zones.len(),
            n_cheap_zones = landmarks.cheap_zones.len(),
            "landmarks"
        );
        walk(series, self.capacity, self.initial_level, self.level_snapshot, |index, conditions, level| {
            self.apply(&landmarks, series, index, conditions, level)
        })
    }

    fn apply(
        &self,
        landmarks: &Landmarks,
        series: &[Conditions],
        index: usize,
        conditions: &Conditions,
        level: KilowattHours,
    ) -> AnalyzedHour {
        let mut hour = AnalyzedHour::idle(*conditions, level, self.configurations.len());
        let net_energy = conditions.net_energy();
        let reserve = self.capacity * RESERVE_SHARE;
        let is_cheap = landmarks.is_cheap(index);

        if conditions.import_rate > landmarks.expensive_threshold && level > reserve {
            let amount = (level - reserve)
                .min(conditions.load)
                .min(self.capacity * self.discharging_c_rate)
                .max(KilowattHours::ZERO);
            let c_rate = c_rate_of(amount, self.capacity);
            hour.battery_discharge = amount;
            self.settle(&mut hour, WorkingMode::PeakDischarge, Reason::PeakHour, |configuration| {
                let efficiency = configuration.discharging.at(c_rate);
                (efficiency, net_energy + amount * efficiency)
            });
            return hour;
        }

        if is_cheap || net_energy > KilowattHours::ZERO {
            let shortfall = landmarks.needed_ahead(series, index) - level;
            if shortfall > KilowattHours::ZERO {
                let source_limit =
                    if is_cheap { self.capacity * self.charging_c_rate } else { net_energy };
                let amount = shortfall
                    .min(source_limit)
                    .min(self.capacity - level)
                    .max(KilowattHours::ZERO);
                let c_rate = c_rate_of(amount, self.capacity);
                let mode =
                    if is_cheap { WorkingMode::ChargeFromGrid } else { WorkingMode::ChargeFromSolar };
                hour.battery_charge = amount;
                self.settle(&mut hour, mode, Reason::PreparingForExpensivePeriod, |configuration| {
                    let efficiency = configuration.charging.at(c_rate);
                    (efficiency, net_energy - amount / efficiency)
                });
                return hour;
            }
        }

        hour.ledgers.extend(
            self.configurations
                .iter()
                .map(|_| LedgerEntry::settle_balance(conditions, None, net_energy)),
        );
        hour.decide(WorkingMode::Idle, Reason::of_balance(net_energy), Remainder::of(net_energy));
        hour
    }

    /// Settle every ledger with its own efficiency, the primary one decides the remainder.
    fn settle(
        &self,
        hour: &mut AnalyzedHour,
        mode: WorkingMode,
        reason: Reason,
        balance_of: impl Fn(&BatteryConfiguration) -> (f64, KilowattHours),
    ) {
        let conditions = hour.conditions;
        hour.ledgers.extend(self.configurations.iter().map(|configuration| {
            let (efficiency, balance) = balance_of(configuration);
            LedgerEntry::settle_balance(&conditions, Some(efficiency), balance)
        }));
        let remainder =
            hour.ledgers.first().and_then(|entry| Remainder::of(entry.grid_power));
        hour.decide(mode, reason, remainder);
    }
}
