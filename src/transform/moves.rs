// 🥊 Moves transformer
// /move detail records → moves

use crate::config::{EtlConfig, MOVES_CSV, MOVES_RAW_FILE};
use crate::error::Result;
use crate::raw_store;
use crate::record;
use crate::report::StageReport;
use crate::table::{Cell, Table, TableRow};
use serde_json::Value;

use super::write_output;

#[derive(Debug, Clone, PartialEq)]
pub struct MoveRow {
    pub id: i64,
    pub name: Option<String>,
    pub move_type: Option<String>,
    pub damage_class: Option<String>,
    pub power: Option<i64>,
    pub accuracy: Option<i64>,
    pub pp: Option<i64>,
}

impl TableRow for MoveRow {
    const COLUMNS: &'static [&'static str] = &["id", "name", "type", "damage_class", "power", "accuracy", "pp"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.id.into(),
            self.name.clone().into(),
            self.move_type.clone().into(),
            self.damage_class.clone().into(),
            self.power.into(),
            self.accuracy.into(),
            self.pp.into(),
        ]
    }
}

/// One row per raw move, sorted by id. `type` and `damage_class` come from
/// their `{name}` sub-objects; status moves have no power or accuracy.
pub fn build_moves_table(raw: &[Value]) -> Result<Vec<MoveRow>> {
    let mut rows = raw
        .iter()
        .map(|m| -> Result<MoveRow> {
            Ok(MoveRow {
                id: record::req_i64(m, "id", "move")?,
                name: record::opt_str(m, "name")?,
                move_type: record::nested_name(m, "type")?,
                damage_class: record::nested_name(m, "damage_class")?,
                power: record::opt_i64(m, "power")?,
                accuracy: record::opt_i64(m, "accuracy")?,
                pp: record::opt_i64(m, "pp")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    rows.sort_by_key(|r| r.id);
    Ok(rows)
}

pub fn run_transform_moves(config: &EtlConfig) -> Result<StageReport> {
    println!("==> Reading raw move data...");
    let raw = raw_store::load_jsonl(&config.raw_path(MOVES_RAW_FILE))?;
    println!("   Records loaded: {}", raw.len());

    println!("==> Building moves table...");
    let rows = build_moves_table(&raw)?;
    println!("   moves: {} rows", rows.len());

    let output = write_output(config, MOVES_CSV, &Table::from_rows(&rows))?;
    println!("==> OK. {} written.", output.path.display());

    Ok(StageReport::new("transform-moves").with_output(output))
}
