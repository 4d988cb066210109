// 🐾 Pokémon transformer
// /pokemon detail records → pokemon, pokemon_stats, pokemon_types, pokemon_moves

use crate::config::{EtlConfig, POKEMON_CSV, POKEMON_MOVES_CSV, POKEMON_RAW_FILE, POKEMON_STATS_CSV, POKEMON_TYPES_CSV};
use crate::error::Result;
use crate::raw_store;
use crate::record::{self, extract_id};
use crate::report::StageReport;
use crate::table::{Cell, Table, TableRow};
use serde_json::Value;

use super::write_output;

// ============================================================================
// ROWS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CreatureRow {
    pub id: i64,
    pub name: Option<String>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub base_experience: Option<i64>,
    /// Sum of every `base_stat` in the record (0 when there are no stats)
    pub total_base_stats: i64,
}

impl TableRow for CreatureRow {
    const COLUMNS: &'static [&'static str] = &["id", "name", "height", "weight", "base_experience", "total_base_stats"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.id.into(),
            self.name.clone().into(),
            self.height.into(),
            self.weight.into(),
            self.base_experience.into(),
            self.total_base_stats.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub pokemon_id: i64,
    pub stat_name: String,
    pub stat_value: i64,
    pub effort: Option<i64>,
}

impl TableRow for StatRow {
    const COLUMNS: &'static [&'static str] = &["pokemon_id", "stat_name", "stat_value", "effort"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.pokemon_id.into(),
            self.stat_name.clone().into(),
            self.stat_value.into(),
            self.effort.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSlotRow {
    pub pokemon_id: i64,
    pub slot: Option<i64>,
    pub type_name: String,
}

impl TableRow for TypeSlotRow {
    const COLUMNS: &'static [&'static str] = &["pokemon_id", "slot", "type"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.pokemon_id.into(), self.slot.into(), self.type_name.clone().into()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveRefRow {
    pub pokemon_id: i64,
    pub move_id: i64,
    pub move_name: String,
}

impl TableRow for MoveRefRow {
    const COLUMNS: &'static [&'static str] = &["pokemon_id", "move_id", "move_name"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.pokemon_id.into(), self.move_id.into(), self.move_name.clone().into()]
    }
}

/// The four silver tables derived from /pokemon
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatureTables {
    pub pokemon: Vec<CreatureRow>,
    pub stats: Vec<StatRow>,
    pub types: Vec<TypeSlotRow>,
    pub moves: Vec<MoveRefRow>,
}

// ============================================================================
// BUILD
// ============================================================================

/// Flatten raw /pokemon records. Every table is stably sorted by its key.
///
/// Required keys: `id`, each stat's `base_stat` and `stat.name`, each type's
/// `type.name`, each move's `move.url` and `move.name`. A move URL without a
/// numeric id fails the whole build.
pub fn build_creature_tables(raw: &[Value]) -> Result<CreatureTables> {
    let mut tables = CreatureTables::default();

    for p in raw {
        let pid = record::req_i64(p, "id", "pokemon")?;

        let mut total_base_stats = 0;
        for s in record::list(p, "stats")? {
            let stat_value = record::req_i64(s, "base_stat", "pokemon stat")?;
            total_base_stats += stat_value;

            tables.stats.push(StatRow {
                pokemon_id: pid,
                stat_name: record::req_nested_name(s, "stat", "pokemon stat")?,
                stat_value,
                effort: record::opt_i64(s, "effort")?,
            });
        }

        tables.pokemon.push(CreatureRow {
            id: pid,
            name: record::opt_str(p, "name")?,
            height: record::opt_i64(p, "height")?,
            weight: record::opt_i64(p, "weight")?,
            base_experience: record::opt_i64(p, "base_experience")?,
            total_base_stats,
        });

        for t in record::list(p, "types")? {
            tables.types.push(TypeSlotRow {
                pokemon_id: pid,
                slot: record::opt_i64(t, "slot")?,
                type_name: record::req_nested_name(t, "type", "pokemon type")?,
            });
        }

        for m in record::list(p, "moves")? {
            let move_ref = m.get("move").unwrap_or(&Value::Null);
            let url = record::req_str(move_ref, "url", "pokemon move")?;

            tables.moves.push(MoveRefRow {
                pokemon_id: pid,
                move_id: extract_id(&url)?,
                move_name: record::req_str(move_ref, "name", "pokemon move")?,
            });
        }
    }

    tables.pokemon.sort_by_key(|r| r.id);
    tables.stats.sort_by(|a, b| (a.pokemon_id, &a.stat_name).cmp(&(b.pokemon_id, &b.stat_name)));
    // Absent slots go last
    tables.types.sort_by_key(|r| (r.pokemon_id, r.slot.is_none(), r.slot));
    tables.moves.sort_by_key(|r| (r.pokemon_id, r.move_id));

    Ok(tables)
}

// ============================================================================
// STAGE
// ============================================================================

pub fn run_transform_creatures(config: &EtlConfig) -> Result<StageReport> {
    println!("==> Reading raw Pokémon data...");
    let raw = raw_store::load_jsonl(&config.raw_path(POKEMON_RAW_FILE))?;
    println!("   Records loaded: {}", raw.len());

    println!("==> Building normalized tables...");
    let tables = build_creature_tables(&raw)?;
    println!("   pokemon: {} rows", tables.pokemon.len());
    println!("   pokemon_stats: {} rows", tables.stats.len());
    println!("   pokemon_types: {} rows", tables.types.len());
    println!("   pokemon_moves: {} rows", tables.moves.len());

    println!("==> Writing CSV to {} ...", config.silver_dir.display());
    let report = StageReport::new("transform-pokemon")
        .with_output(write_output(config, POKEMON_CSV, &Table::from_rows(&tables.pokemon))?)
        .with_output(write_output(config, POKEMON_STATS_CSV, &Table::from_rows(&tables.stats))?)
        .with_output(write_output(config, POKEMON_TYPES_CSV, &Table::from_rows(&tables.types))?)
        .with_output(write_output(config, POKEMON_MOVES_CSV, &Table::from_rows(&tables.moves))?);
    println!("==> OK. Silver Pokémon tables written.");

    Ok(report)
}
