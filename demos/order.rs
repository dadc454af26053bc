//! Order Example
//!
//! Costs an order fixture and prints its receipt.
//!
//! Use `-f` to load an order fixture by name
//! Use `-t` to load a tier fixture by name
//! Use `-e` to request expedited handling
//! Set `RUST_LOG=parcel_costs=trace` to follow the discount search

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use parcel_costs::fixtures::Fixture;

/// Arguments for the order example
#[derive(Debug, Parser)]
struct ExampleOrderArgs {
    /// Order fixture to cost
    #[clap(short, long, default_value = "bulk")]
    fixture: String,

    /// Tier fixture to price parcels against
    #[clap(short, long, default_value = "standard")]
    tiers: String,

    /// Request expedited handling even if the fixture does not
    #[clap(short, long)]
    expedite: bool,

    /// Log filter used when `RUST_LOG` is not set
    #[clap(short, long, default_value = "info")]
    log_level: String,
}

/// Order Example
pub fn main() -> Result<()> {
    let args = ExampleOrderArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .try_init()?;

    let fixture = Fixture::from_set(&args.tiers, &args.fixture)?;
    let calculator = fixture.calculator()?;

    let mut order = fixture.order()?.clone();

    if args.expedite {
        order = order.expedited();
    }

    let start = Instant::now();

    let result = calculator.calculate(Some(&order))?;

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    result.write_to(&mut handle, Some(&order))?;

    writeln!(handle, "\nCosted in {}", elapsed.human(Truncate::Nano))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn args_default_to_bulk_order_and_standard_tiers() -> TestResult {
        let args = ExampleOrderArgs::try_parse_from(["order"])?;

        assert_eq!(args.fixture, "bulk");
        assert_eq!(args.tiers, "standard");
        assert!(!args.expedite);
        assert_eq!(args.log_level, "info");

        Ok(())
    }

    #[test]
    fn args_accept_short_flags() -> TestResult {
        let args = ExampleOrderArgs::try_parse_from(["order", "-f", "mixed", "-e"])?;

        assert_eq!(args.fixture, "mixed");
        assert!(args.expedite);

        Ok(())
    }
}
