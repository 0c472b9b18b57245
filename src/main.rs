#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod prelude;
mod quantity;
mod request;
mod tables;

use clap::{Parser, crate_version};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    cli::{Args, Command},
    core::analysis::{Report, analyze},
    prelude::*,
    request::Request,
    tables::{build_hourly_table, build_ledgers_table, build_profile_table, build_summary_table},
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Simulate(args) => {
            let report = run(&args.request)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for scenario in report.values() {
                    println!("{}", scenario.name);
                    let summary = &scenario.summary;
                    println!("{}", build_hourly_table(&scenario.hourly_data, &summary.arbitrage));
                    println!("{}", build_ledgers_table(summary));
                    println!("{}", build_summary_table(summary));
                    println!("{}", build_profile_table(summary));
                }
            }
        }

        Command::Query(args) => {
            let report = run(&args.request()?)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn run(request: &Request) -> Result<Report> {
    let config = request.validate().context("invalid request")?;
    let seed = request.seed.unwrap_or_else(rand::random);
    info!(seed, scenario = ?config.scenario, pricing = ?config.pricing, "simulating…");
    analyze(&config, &mut StdRng::seed_from_u64(seed))
}
