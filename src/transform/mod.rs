// Silver-layer transformers - one module per data domain

pub mod creatures;
pub mod moves;
pub mod types;

pub use creatures::{build_creature_tables, run_transform_creatures, CreatureRow, CreatureTables, MoveRefRow, StatRow, TypeSlotRow};
pub use moves::{build_moves_table, run_transform_moves, MoveRow};
pub use types::{build_type_effectiveness, run_transform_types, EffectivenessRow, Multiplier};

use crate::config::EtlConfig;
use crate::error::Result;
use crate::report::OutputFile;
use crate::table::{write_table, Table};

/// Write one silver table and describe it for the run report
fn write_output(config: &EtlConfig, file: &str, table: &Table) -> Result<OutputFile> {
    let path = config.silver_path(file);
    let rows = write_table(&path, table)?;
    OutputFile::describe(&path, rows)
}
