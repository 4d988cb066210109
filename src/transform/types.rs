// ⚔️ Type effectiveness matrix
// /type detail records → type_effectiveness (attacking × defending → multiplier)

use crate::config::{EtlConfig, TYPES_RAW_FILE, TYPE_EFFECTIVENESS_CSV};
use crate::error::Result;
use crate::raw_store;
use crate::record;
use crate::report::StageReport;
use crate::table::{Cell, Table, TableRow};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use super::write_output;

// ============================================================================
// MULTIPLIER
// ============================================================================

/// Damage multiplier of an attacking type against a defending type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplier {
    /// no_damage_to (0.0)
    Immune,
    /// half_damage_to (0.5)
    NotVeryEffective,
    /// Not listed anywhere (1.0)
    Neutral,
    /// double_damage_to (2.0)
    SuperEffective,
}

impl Multiplier {
    pub fn as_f64(&self) -> f64 {
        match self {
            Multiplier::Immune => 0.0,
            Multiplier::NotVeryEffective => 0.5,
            Multiplier::Neutral => 1.0,
            Multiplier::SuperEffective => 2.0,
        }
    }
}

// ============================================================================
// DAMAGE RELATIONS
// ============================================================================

/// Outgoing relation sets of one attacking type.
///
/// The API does not promise the three lists are disjoint, so lookups apply a
/// fixed precedence: no-damage, then half-damage, then double-damage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageRelations {
    pub double_damage_to: HashSet<String>,
    pub half_damage_to: HashSet<String>,
    pub no_damage_to: HashSet<String>,
}

impl DamageRelations {
    /// Read `damage_relations` from a raw type record. A missing block (or
    /// missing list) means no relations, so every outgoing pair is neutral.
    /// Entries without a name are skipped.
    pub fn from_record(type_record: &Value) -> Result<Self> {
        let relations = type_record.get("damage_relations").unwrap_or(&Value::Null);
        Ok(DamageRelations {
            double_damage_to: names(relations, "double_damage_to")?,
            half_damage_to: names(relations, "half_damage_to")?,
            no_damage_to: names(relations, "no_damage_to")?,
        })
    }

    pub fn against(&self, defending: &str) -> Multiplier {
        if self.no_damage_to.contains(defending) {
            Multiplier::Immune
        } else if self.half_damage_to.contains(defending) {
            Multiplier::NotVeryEffective
        } else if self.double_damage_to.contains(defending) {
            Multiplier::SuperEffective
        } else {
            Multiplier::Neutral
        }
    }
}

fn names(relations: &Value, key: &str) -> Result<HashSet<String>> {
    let mut set = HashSet::new();
    for entry in record::list(relations, key)? {
        if let Some(name) = record::opt_str(entry, "name")? {
            set.insert(name);
        }
    }
    Ok(set)
}

// ============================================================================
// MATRIX
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EffectivenessRow {
    pub attacking_type: String,
    pub defending_type: String,
    pub multiplier: Multiplier,
}

impl TableRow for EffectivenessRow {
    const COLUMNS: &'static [&'static str] = &["attacking_type", "defending_type", "multiplier"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.attacking_type.clone().into(),
            self.defending_type.clone().into(),
            self.multiplier.as_f64().into(),
        ]
    }
}

/// Full attacking × defending cross product over the types in `raw`.
///
/// The universe is the set of top-level type names, sorted; names that only
/// show up inside relation lists never become rows or columns. Output has
/// exactly |universe|² rows, ordered by (attacking, defending). The diagonal
/// follows the same rule as every other pair. When two records share a name
/// the later one wins.
pub fn build_type_effectiveness(raw: &[Value]) -> Result<Vec<EffectivenessRow>> {
    let mut by_name: BTreeMap<String, DamageRelations> = BTreeMap::new();
    for t in raw {
        let name = record::req_str(t, "name", "type")?;
        by_name.insert(name, DamageRelations::from_record(t)?);
    }

    let mut rows = Vec::with_capacity(by_name.len() * by_name.len());
    for (attacking, relations) in &by_name {
        for defending in by_name.keys() {
            rows.push(EffectivenessRow {
                attacking_type: attacking.clone(),
                defending_type: defending.clone(),
                multiplier: relations.against(defending),
            });
        }
    }

    Ok(rows)
}

pub fn run_transform_types(config: &EtlConfig) -> Result<StageReport> {
    println!("==> Reading raw type data...");
    let raw = raw_store::load_jsonl(&config.raw_path(TYPES_RAW_FILE))?;
    println!("   Records loaded: {}", raw.len());

    println!("==> Building type_effectiveness table...");
    let rows = build_type_effectiveness(&raw)?;
    println!("   type_effectiveness: {} rows", rows.len());

    let output = write_output(config, TYPE_EFFECTIVENESS_CSV, &Table::from_rows(&rows))?;
    println!("==> OK. {} written.", output.path.display());

    Ok(StageReport::new("transform-types").with_output(output))
}
