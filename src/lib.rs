// PokéAPI ETL - Core Library
// Raw layer (JSONL) + silver layer (CSV) for pokemon, moves and types

pub mod config;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod raw_store;
pub mod record;
pub mod report;
pub mod table;
pub mod transform;

// Re-export commonly used types
pub use config::{EtlConfig, RetryPolicy};
pub use error::{EtlError, Result};
pub use fetcher::{Fetcher, HttpResponse, ReqwestTransport, ResourceRef, Transport};
pub use pipeline::{Pipeline, RunMode};
pub use raw_store::{load_jsonl, write_jsonl};
pub use record::extract_id;
pub use report::{OutputFile, RunReport, StageReport};
pub use table::{write_table, Cell, Table, TableRow};
pub use transform::{
    build_creature_tables, build_moves_table, build_type_effectiveness,
    CreatureRow, CreatureTables, EffectivenessRow, MoveRefRow, MoveRow, Multiplier, StatRow, TypeSlotRow,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
