use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use wavebench_rs::{
    aggregate, ctrl_c, init_tracing, render_summary, run_load_test_until, write_report,
    LoadTestConfig, DEFAULT_FIXTURE_PRODUCTS,
};

#[derive(Parser, Debug)]
#[command(
    name = "wavebench",
    about = "Drive waves of simulated users against an HTTP API and report latency"
)]
struct Args {
    /// Base URL of the API under test (e.g. http://localhost:8080)
    #[arg(long)]
    url: String,

    /// Number of concurrent simulated users per wave
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    users: u64,

    /// Test duration in seconds; checked between waves
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// Write the JSON report to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Do not seed categories and products before the run
    #[arg(long)]
    skip_fixtures: bool,

    /// Number of products to seed
    #[arg(long, default_value_t = DEFAULT_FIXTURE_PRODUCTS)]
    fixture_products: usize,

    /// Log filter directive (e.g. info, wavebench_rs=debug)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = LoadTestConfig::try_new(
        &args.url,
        args.users as usize,
        Duration::from_secs(args.duration),
    )?
    .with_request_timeout(Duration::from_secs(args.request_timeout_secs))
    .with_fixtures(!args.skip_fixtures, args.fixture_products);

    let outcome = run_load_test_until(config, ctrl_c()).await?;
    if outcome.interrupted {
        println!("\nTest interrupted by user");
    }

    let report = aggregate(&outcome.results);
    print!("{}", render_summary(report.as_ref()));

    if let Some(path) = &args.output {
        write_report(path, report.as_ref()).await?;
        println!("\nDetailed results saved to: {}", path.display());
    }

    info!(
        waves = outcome.waves_completed,
        elapsed_secs = outcome.elapsed.as_secs_f64(),
        "done"
    );
    Ok(())
}
