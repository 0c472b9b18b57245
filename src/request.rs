use serde::Deserialize;
use thiserror::Error;

use crate::{
    core::{
        analysis::AnalysisConfig,
        efficiency::EfficiencyCurve,
        heuristic::Strategy,
        ledger::BatteryConfiguration,
        pricing::PricingStructure,
        scenario::Scenario,
        simulator::{IdlePolicy, InitialLevel, LevelSnapshot},
    },
    quantity::energy::KilowattHours,
};

const DEFAULT_BATTERY_CAPACITY: f64 = 10.0;
const DEFAULT_EFFICIENCY: f64 = 0.95;
const DEFAULT_EFFICIENCY_2: f64 = 0.9;
const DEFAULT_C_RATE: f64 = 0.5;
const DEFAULT_CHARGING_EFFICIENCY_STEP: f64 = 0.1;
const DEFAULT_DISCHARGING_EFFICIENCY_STEP: f64 = 0.2;

/// Simulation settings, either from the command line or from a URL query string.
#[derive(Clone, Debug, PartialEq, clap::Args, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Request {
    /// Usable battery capacity in kilowatt-hours.
    #[clap(long, default_value_t = DEFAULT_BATTERY_CAPACITY, env = "BATTERY_CAPACITY")]
    pub battery_capacity: f64,

    /// Base charging efficiency of the primary battery configuration.
    #[clap(long, default_value_t = DEFAULT_EFFICIENCY, env = "CHARGING_EFFICIENCY")]
    pub charging_efficiency: f64,

    /// Base discharging efficiency of the primary battery configuration.
    #[clap(long, default_value_t = DEFAULT_EFFICIENCY, env = "DISCHARGING_EFFICIENCY")]
    pub discharging_efficiency: f64,

    /// Base charging efficiency of the alternative battery configuration.
    #[clap(long, default_value_t = DEFAULT_EFFICIENCY_2, env = "CHARGING_EFFICIENCY_2")]
    pub charging_efficiency_2: f64,

    /// Base discharging efficiency of the alternative battery configuration.
    #[clap(long, default_value_t = DEFAULT_EFFICIENCY_2, env = "DISCHARGING_EFFICIENCY_2")]
    pub discharging_efficiency_2: f64,

    /// Maximum share of the capacity charged per hour.
    #[clap(long, default_value_t = DEFAULT_C_RATE, env = "CHARGING_C_RATE")]
    pub charging_c_rate: f64,

    /// Maximum share of the capacity discharged per hour.
    #[clap(long, default_value_t = DEFAULT_C_RATE, env = "DISCHARGING_C_RATE")]
    pub discharging_c_rate: f64,

    #[clap(long, env = "HIGH_SOLAR")]
    pub high_solar: bool,

    #[clap(long, env = "HIGH_LOAD")]
    pub high_load: bool,

    /// Overrides the solar and load flags.
    #[clap(long, env = "NO_SOLAR_AND_LOAD")]
    pub no_solar_and_load: bool,

    #[clap(long, value_enum, default_value_t, env = "PRICING_STRUCTURE")]
    pub pricing_structure: PricingStructure,

    /// Random seed for reproducible prices, entropy is used when omitted.
    #[clap(long, env = "SEED")]
    pub seed: Option<u64>,

    /// Optimize the fixed windows, or follow the price heuristic.
    #[clap(long, value_enum, default_value_t, env = "STRATEGY")]
    pub strategy: Strategy,

    #[clap(long, value_enum, default_value_t, env = "INITIAL_LEVEL")]
    pub initial_level: InitialLevel,

    #[clap(long, value_enum, default_value_t, env = "IDLE_POLICY")]
    pub idle_policy: IdlePolicy,

    #[clap(long, value_enum, default_value_t, env = "LEVEL_SNAPSHOT")]
    pub level_snapshot: LevelSnapshot,

    /// C-rate increment that costs one percent of the charging efficiency.
    #[clap(long, default_value_t = DEFAULT_CHARGING_EFFICIENCY_STEP, env = "CHARGING_EFFICIENCY_STEP")]
    pub charging_efficiency_step: f64,

    /// C-rate increment that costs one percent of the discharging efficiency.
    #[clap(
        long,
        default_value_t = DEFAULT_DISCHARGING_EFFICIENCY_STEP,
        env = "DISCHARGING_EFFICIENCY_STEP"
    )]
    pub discharging_efficiency_step: f64,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            battery_capacity: DEFAULT_BATTERY_CAPACITY,
            charging_efficiency: DEFAULT_EFFICIENCY,
            discharging_efficiency: DEFAULT_EFFICIENCY,
            charging_efficiency_2: DEFAULT_EFFICIENCY_2,
            discharging_efficiency_2: DEFAULT_EFFICIENCY_2,
            charging_c_rate: DEFAULT_C_RATE,
            discharging_c_rate: DEFAULT_C_RATE,
            high_solar: false,
            high_load: false,
            no_solar_and_load: false,
            pricing_structure: PricingStructure::default(),
            seed: None,
            strategy: Strategy::default(),
            initial_level: InitialLevel::default(),
            idle_policy: IdlePolicy::default(),
            level_snapshot: LevelSnapshot::default(),
            charging_efficiency_step: DEFAULT_CHARGING_EFFICIENCY_STEP,
            discharging_efficiency_step: DEFAULT_DISCHARGING_EFFICIENCY_STEP,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("`{field}` must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("`{field}` must be within (0, 1], got {value}")]
    InvalidEfficiency { field: &'static str, value: f64 },
}

impl Request {
    pub fn scenario(&self) -> Scenario {
        Scenario::select(self.high_solar, self.high_load, self.no_solar_and_load)
    }

    pub fn validate(&self) -> Result<AnalysisConfig, ValidationError> {
        let battery_capacity = positive("batteryCapacity", self.battery_capacity)?;
        let charging_c_rate = positive("chargingCRate", self.charging_c_rate)?;
        let discharging_c_rate = positive("dischargingCRate", self.discharging_c_rate)?;
        let charging_step = positive("chargingEfficiencyStep", self.charging_efficiency_step)?;
        let discharging_step =
            positive("dischargingEfficiencyStep", self.discharging_efficiency_step)?;

        let configurations = vec![
            BatteryConfiguration {
                charging: EfficiencyCurve::new(
                    efficiency("chargingEfficiency", self.charging_efficiency)?,
                    charging_step,
                ),
                discharging: EfficiencyCurve::new(
                    efficiency("dischargingEfficiency", self.discharging_efficiency)?,
                    discharging_step,
                ),
            },
            BatteryConfiguration {
                charging: EfficiencyCurve::new(
                    efficiency("chargingEfficiency2", self.charging_efficiency_2)?,
                    charging_step,
                ),
                discharging: EfficiencyCurve::new(
                    efficiency("dischargingEfficiency2", self.discharging_efficiency_2)?,
                    discharging_step,
                ),
            },
        ];

        Ok(AnalysisConfig {
            capacity: KilowattHours(battery_capacity),
            charging_c_rate,
            discharging_c_rate,
            configurations,
            scenario: self.scenario(),
            pricing: self.pricing_structure,
            strategy: self.strategy,
            initial_level: self.initial_level,
            idle_policy: self.idle_policy,
            level_snapshot: self.level_snapshot,
        })
    }
}

const fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() { Ok(value) } else { Err(ValidationError::NotFinite { field, value }) }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value > 0.0 { Ok(value) } else { Err(ValidationError::NotPositive { field, value }) }
}

fn efficiency(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidEfficiency { field, value })
    }
}
