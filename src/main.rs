mod logging;

use anyhow::Result;
use std::env;

use pokeapi_etl::{EtlConfig, Fetcher, Pipeline, RunMode};

fn main() -> Result<()> {
    logging::init("warn");

    let args: Vec<String> = env::args().collect();
    let mode = match RunMode::from_arg(args.get(1).map(String::as_str)) {
        Some(mode) => mode,
        None => {
            eprintln!("❌ Unknown stage: {}", args[1]);
            eprintln!("   Usage: pokeapi-etl [extract|transform]");
            std::process::exit(2);
        }
    };

    let config = EtlConfig::default();
    let fetcher = Fetcher::from_config(&config)?;
    let report = Pipeline::new(config, fetcher).run(mode)?;

    let rows: usize = report.stages.iter().map(|s| s.total_rows()).sum();
    println!("✓ {} stages, {} rows written (run {})", report.stages.len(), rows, report.run_id);

    Ok(())
}
