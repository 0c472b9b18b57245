use std::{collections::BTreeMap, ops::RangeInclusive};

use rand::Rng;
use serde::Serialize;

use crate::{
    core::{
        classifier::ArbitrageThresholds,
        conditions::Conditions,
        heuristic::{Dispatcher, Strategy},
        ledger::BatteryConfiguration,
        optimizer::{Direction, Optimizer},
        pricing::PricingStructure,
        scenario::Scenario,
        schedule::ScheduleMap,
        simulator::{AnalyzedHour, IdlePolicy, InitialLevel, LevelSnapshot, Simulator},
        summary::Summary,
    },
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Overnight and midday windows in which the battery gets filled up.
pub const CHARGING_WINDOWS: [RangeInclusive<usize>; 2] = [0..=5, 10..=15];

/// Morning and evening peak windows in which the battery may sell.
pub const DISCHARGING_WINDOWS: [RangeInclusive<usize>; 2] = [6..=9, 16..=21];

/// Validated analysis settings.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    pub capacity: KilowattHours,
    pub charging_c_rate: f64,
    pub discharging_c_rate: f64,

    /// The first one is primary: it drives the optimizer and the arbitrage thresholds.
    pub configurations: Vec<BatteryConfiguration>,

    pub scenario: Scenario,
    pub pricing: PricingStructure,
    pub strategy: Strategy,
    pub initial_level: InitialLevel,
    pub idle_policy: IdlePolicy,
    pub level_snapshot: LevelSnapshot,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: &'static str,
    pub hourly_data: Vec<AnalyzedHour>,
    pub summary: Summary,
}

/// Reports keyed by the scenario identifier.
pub type Report = BTreeMap<Scenario, ScenarioReport>;

/// Generate the day, optimize the windows, walk the hours and summarize.
#[instrument(
    skip_all,
    fields(scenario = ?config.scenario, pricing = ?config.pricing, strategy = ?config.strategy),
)]
pub fn analyze<R: Rng + ?Sized>(config: &AnalysisConfig, rng: &mut R) -> Result<Report> {
    let primary = config.configurations.first().context("no battery configurations")?;
    let series = config.scenario.generate(config.pricing, rng);

    let mut hours = match config.strategy {
        Strategy::Optimal => {
            let charging_schedule =
                schedule(&series, &CHARGING_WINDOWS, Direction::Charge, config.capacity, primary);
            let discharging_schedule = schedule(
                &series,
                &DISCHARGING_WINDOWS,
                Direction::Discharge,
                config.capacity,
                primary,
            );
            Simulator::builder()
                .capacity(config.capacity)
                .charging_c_rate(config.charging_c_rate)
                .discharging_c_rate(config.discharging_c_rate)
                .configurations(&config.configurations)
                .charging_schedule(&charging_schedule)
                .discharging_schedule(&discharging_schedule)
                .initial_level(config.initial_level)
                .idle_policy(config.idle_policy)
                .level_snapshot(config.level_snapshot)
                .build()
                .run(&series)
        }
        Strategy::Heuristic => Dispatcher::builder()
            .capacity(config.capacity)
            .charging_c_rate(config.charging_c_rate)
            .discharging_c_rate(config.discharging_c_rate)
            .configurations(&config.configurations)
            .initial_level(config.initial_level)
            .level_snapshot(config.level_snapshot)
            .build()
            .run(&series),
    };

    let thresholds = ArbitrageThresholds::new(&series, primary);
    thresholds.relabel(&mut hours);

    let summary = Summary::new(&hours, config.configurations.len(), thresholds);
    info!(
        net_cost = %summary.primary.net_cost,
        final_level = %summary.final_battery_capacity,
        "analyzed"
    );

    let report = ScenarioReport { name: config.scenario.name(), hourly_data: hours, summary };
    Ok(BTreeMap::from([(config.scenario, report)]))
}

/// Optimize every window independently and merge the winners.
fn schedule(
    series: &[Conditions],
    windows: &[RangeInclusive<usize>],
    direction: Direction,
    capacity: KilowattHours,
    configuration: &BatteryConfiguration,
) -> ScheduleMap {
    let optimizer = Optimizer::builder()
        .direction(direction)
        .capacity(capacity)
        .efficiency(match direction {
            Direction::Charge => configuration.charging,
            Direction::Discharge => configuration.discharging,
        })
        .build();
    ScheduleMap::merge(windows.iter().map(|window| {
        let optimum = optimizer.optimize(series.get(window.clone()).unwrap_or_default());
        debug!(?window, ?direction, value = %optimum.value, "window optimized");
        ScheduleMap::from_optimum(&optimum)
    }))
}
