// 🚰 Pipeline Orchestrator
// extract (pokemon, moves, types) → transform (pokemon, moves, types)
//
// Stages run strictly in sequence; each one fully reads its input and fully
// writes its output before the next starts. Any failure aborts the run and a
// rerun starts from scratch.

use crate::config::{EtlConfig, MOVES_RAW_FILE, POKEMON_RAW_FILE, TYPES_RAW_FILE};
use crate::error::Result;
use crate::fetcher::{Fetcher, Transport};
use crate::raw_store;
use crate::report::{OutputFile, RunReport, StageReport};
use crate::transform;
use tracing::info;

/// Which half of the pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    All,
    ExtractOnly,
    TransformOnly,
}

impl RunMode {
    /// Parse the optional positional argument of the binary
    pub fn from_arg(arg: Option<&str>) -> Option<Self> {
        match arg {
            None | Some("all") => Some(RunMode::All),
            Some("extract") => Some(RunMode::ExtractOnly),
            Some("transform") => Some(RunMode::TransformOnly),
            Some(_) => None,
        }
    }
}

pub struct Pipeline<T: Transport> {
    config: EtlConfig,
    fetcher: Fetcher<T>,
}

impl<T: Transport> Pipeline<T> {
    pub fn new(config: EtlConfig, fetcher: Fetcher<T>) -> Self {
        Pipeline { config, fetcher }
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Run the selected stages, then save the run manifest.
    pub fn run(&self, mode: RunMode) -> Result<RunReport> {
        let mut report = RunReport::start();
        info!(run_id = %report.run_id, ?mode, "pipeline started");

        println!("========== POKÉMON ETL START ==========");

        if mode != RunMode::TransformOnly {
            println!("\n[1/4] EXTRACT RAW ...");
            for stage in self.run_extract()? {
                report.record(stage);
            }
        }

        if mode != RunMode::ExtractOnly {
            println!("\n[2/4] TRANSFORM POKÉMON ...");
            report.record(transform::run_transform_creatures(&self.config)?);

            println!("\n[3/4] TRANSFORM MOVES ...");
            report.record(transform::run_transform_moves(&self.config)?);

            println!("\n[4/4] TRANSFORM TYPES ...");
            report.record(transform::run_transform_types(&self.config)?);
        }

        report.finish();
        report.save(&self.config.manifest_path())?;
        println!("\n========== POKÉMON ETL DONE ==========");

        Ok(report)
    }

    pub fn run_all(&self) -> Result<RunReport> {
        self.run(RunMode::All)
    }

    /// Extract the three raw files: pokemon, moves, types (in that order).
    pub fn run_extract(&self) -> Result<Vec<StageReport>> {
        let c = &self.config;
        Ok(vec![
            self.extract("extract-pokemon", "pokemon", c.pokemon_page_size, POKEMON_RAW_FILE)?,
            self.extract("extract-moves", "move", c.move_page_size, MOVES_RAW_FILE)?,
            self.extract("extract-types", "type", c.type_page_size, TYPES_RAW_FILE)?,
        ])
    }

    fn extract(&self, stage: &str, endpoint: &str, page_size: usize, raw_file: &str) -> Result<StageReport> {
        println!("==> Listing /{} ...", endpoint);
        let records = self.fetcher.fetch_all_details(&self.config.base_url, endpoint, page_size)?;

        let path = self.config.raw_path(raw_file);
        let written = raw_store::write_jsonl(&path, &records)?;
        println!("==> {} saved to {} ({} records)", raw_file, path.display(), written);

        Ok(StageReport::new(stage).with_output(OutputFile::describe(&path, written)?))
    }
}
