use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        conditions::Conditions,
        ledger::{BatteryConfiguration, LedgerEntry},
        reason::Reason,
        schedule::ScheduleMap,
        working_mode::{Decision, Remainder, WorkingMode},
    },
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Battery state of charge at the start of the day.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum InitialLevel {
    #[default]
    Empty,
    Half,
}

impl InitialLevel {
    pub fn of(self, capacity: KilowattHours) -> KilowattHours {
        match self {
            Self::Empty => KilowattHours::ZERO,
            Self::Half => capacity * 0.5,
        }
    }
}

/// What happens with the household balance during the idle hours.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum IdlePolicy {
    /// No grid flow is accounted.
    #[default]
    Hold,

    /// Import the household deficit and export the solar excess.
    Reconcile,
}

/// Which battery level gets recorded for an hour.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum LevelSnapshot {
    /// Level at the start of the hour.
    #[default]
    Before,

    /// Level at the end of the hour.
    After,
}

impl LevelSnapshot {
    pub const fn pick(self, before: KilowattHours, after: KilowattHours) -> KilowattHours {
        match self {
            Self::Before => before,
            Self::After => after,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedHour {
    #[serde(flatten)]
    pub conditions: Conditions,

    pub battery_charge: KilowattHours,
    pub battery_discharge: KilowattHours,
    pub battery_level: KilowattHours,
    pub action: WorkingMode,

    /// Action together with the grid remainder.
    pub decision: Decision,

    pub reason: Reason,

    /// One entry per battery configuration, in the configuration order.
    pub ledgers: Vec<LedgerEntry>,
}

impl AnalyzedHour {
    /// Idle hour without any ledger entries yet.
    pub fn idle(conditions: Conditions, level: KilowattHours, n_ledgers: usize) -> Self {
        Self {
            conditions,
            battery_charge: KilowattHours::ZERO,
            battery_discharge: KilowattHours::ZERO,
            battery_level: level,
            action: WorkingMode::Idle,
            decision: WorkingMode::Idle.into(),
            reason: Reason::NoAction,
            ledgers: Vec::with_capacity(n_ledgers),
        }
    }

    pub fn decide(&mut self, mode: WorkingMode, reason: Reason, remainder: Option<Remainder>) {
        self.action = mode;
        self.reason = reason;
        self.decision = Decision { mode, remainder };
    }
}

/// Realized C-rate of the energy moved within an hour.
pub fn c_rate_of(amount: KilowattHours, capacity: KilowattHours) -> f64 {
    if capacity > KilowattHours::ZERO { amount / capacity } else { 0.0 }
}

/// Walk the series threading the battery level through the hours.
///
/// `apply` simulates a single hour starting at the given level. The recorded level follows
/// the snapshot convention, and the carried level never leaves `[0, capacity]`.
pub fn walk(
    series: &[Conditions],
    capacity: KilowattHours,
    initial_level: InitialLevel,
    level_snapshot: LevelSnapshot,
    mut apply: impl FnMut(usize, &Conditions, KilowattHours) -> AnalyzedHour,
) -> Vec<AnalyzedHour> {
    let mut level = initial_level.of(capacity);
    let mut hours = Vec::with_capacity(series.len());
    for (index, conditions) in series.iter().enumerate() {
        let mut hour = apply(index, conditions, level);
        let level_after = (level + hour.battery_charge - hour.battery_discharge)
            .clamp(KilowattHours::ZERO, capacity);
        hour.battery_level = level_snapshot.pick(level, level_after);
        trace!(
            hour = conditions.hour,
            decision = %hour.decision,
            charge = ?hour.battery_charge,
            discharge = ?hour.battery_discharge,
            battery_level = ?level_after,
        );
        level = level_after;
        hours.push(hour);
    }
    debug!(final_level = ?level, "walked");
    hours
}

/// Sequential walk over the day, applying the charging and discharging schedules.
#[derive(Builder)]
pub struct Simulator<'a> {
    capacity: KilowattHours,
    charging_c_rate: f64,
    discharging_c_rate: f64,
    configurations: &'a [BatteryConfiguration],
    charging_schedule: &'a ScheduleMap,
    discharging_schedule: &'a ScheduleMap,

    #[builder(default)]
    initial_level: InitialLevel,

    #[builder(default)]
    idle_policy: IdlePolicy,

    #[builder(default)]
    level_snapshot: LevelSnapshot,
}

impl Simulator<'_> {
    #[instrument(skip_all, fields(capacity = ?self.capacity, n_hours = series.len()))]
    pub fn run(&self, series: &[Conditions]) -> Vec<AnalyzedHour> {
        walk(series, self.capacity, self.initial_level, self.level_snapshot, |_, conditions, level| {
            self.apply(conditions, level)
        })
    }

    /// Simulate a single hour starting at the specified level.
    fn apply(&self, conditions: &Conditions, level: KilowattHours) -> AnalyzedHour {
        let mut hour = AnalyzedHour::idle(*conditions, level, self.configurations.len());

        if let Some(rate) = self.charging_schedule.rate(conditions.hour).filter(|rate| *rate > 0.0) {
            let amount = (self.capacity * rate)
                .min(self.capacity * self.charging_c_rate)
                .min(self.capacity - level)
                .max(KilowattHours::ZERO);
            let c_rate = c_rate_of(amount, self.capacity);
            hour.battery_charge = amount;
            hour.ledgers.extend(self.configurations.iter().map(|configuration| {
                let efficiency = configuration.charging.at(c_rate);
                LedgerEntry::settle(conditions, Some(efficiency), amount / efficiency, KilowattHours::ZERO)
            }));
            hour.decide(WorkingMode::Charge, Reason::ScheduledCharging, None);
        } else if let Some(rate) =
            self.discharging_schedule.rate(conditions.hour).filter(|rate| *rate > 0.0)
        {
            let amount = (self.capacity * rate)
                .min(self.capacity * self.discharging_c_rate)
                .min(level)
                .max(KilowattHours::ZERO);
            let c_rate = c_rate_of(amount, self.capacity);
            hour.battery_discharge = amount;
            hour.ledgers.extend(self.configurations.iter().map(|configuration| {
                let efficiency = configuration.discharging.at(c_rate);
                LedgerEntry::settle(conditions, Some(efficiency), KilowattHours::ZERO, amount * efficiency)
            }));
            hour.decide(WorkingMode::Discharge, Reason::ScheduledDischarging, None);
        } else {
            let balance = match self.idle_policy {
                IdlePolicy::Hold => KilowattHours::ZERO,
                IdlePolicy::Reconcile => conditions.net_energy(),
            };
            hour.ledgers.extend(
                self.configurations
                    .iter()
                    .map(|_| LedgerEntry::settle_balance(conditions, None, balance)),
            );
            hour.decide(WorkingMode::Idle, Reason::of_balance(balance), Remainder::of(balance));
        }

        hour
    }
}
