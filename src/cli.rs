use clap::{Parser, Subcommand};

use crate::{prelude::*, request::Request};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate the day with the settings from the command line and the environment.
    #[clap(name = "simulate")]
    Simulate(Box<SimulateArgs>),

    /// Simulate the day with the settings from a URL query string and print the JSON report.
    #[clap(name = "query")]
    Query(QueryArgs),
}

#[derive(Parser)]
pub struct SimulateArgs {
    /// Print the JSON report instead of the tables.
    #[clap(long)]
    pub json: bool,

    #[clap(flatten)]
    pub request: Request,
}

#[derive(Parser)]
pub struct QueryArgs {
    /// For example, `batteryCapacity=10&pricingStructure=simpleCheaper&seed=42`.
    pub query: String,
}

impl QueryArgs {
    pub fn request(&self) -> Result<Request> {
        let query = self.query.trim_start_matches('?');
        serde_qs::from_str(query).with_context(|| format!("failed to parse the query: `{query}`"))
    }
}
