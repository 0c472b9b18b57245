pub mod analysis;
pub mod classifier;
pub mod conditions;
pub mod distribution;
pub mod efficiency;
pub mod found;
pub mod heuristic;
pub mod ledger;
pub mod optimizer;
pub mod pricing;
pub mod profile;
pub mod reason;
pub mod scenario;
pub mod schedule;
pub mod simulator;
pub mod summary;
pub mod working_mode;
pub mod zone;
