//! Domain snapshot adapter.
//!
//! Converts one host [`DomainSnapshot`] into display labels:
//! - flat mode: the ordered labels of the bound column
//! - tree mode: one ordered label sequence per populated hierarchy level
//!
//! Stateless. A snapshot without any column yields `None`, which callers treat
//! as "field removed".

use serde_json::Value;
use slicer_schemas::{ColumnSource, DomainSnapshot};

/// Labels of the single bound column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatCandidate {
    pub source: ColumnSource,
    pub labels: Vec<String>,
}

impl FlatCandidate {
    pub fn count(&self) -> usize {
        self.labels.len()
    }
}

/// One populated hierarchy level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLabels {
    pub source: ColumnSource,
    pub labels: Vec<String>,
}

/// Labels of every populated level, outermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCandidate {
    pub levels: Vec<LevelLabels>,
}

impl LevelCandidate {
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn sources(&self) -> Vec<ColumnSource> {
        self.levels.iter().map(|l| l.source.clone()).collect()
    }
}

/// Display label for one raw value. `null` becomes the empty string.
pub fn label_of(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Identity of the bound field(s): query names joined with `|`.
///
/// `None` when no column is bound.
pub fn field_identity(snap: &DomainSnapshot) -> Option<String> {
    if snap.columns.is_empty() {
        return None;
    }
    let names: Vec<&str> = snap
        .columns
        .iter()
        .map(|c| c.source.query_name.as_str())
        .collect();
    Some(names.join("|"))
}

/// Flat mode: labels of the first column.
pub fn extract_flat(snap: &DomainSnapshot) -> Option<FlatCandidate> {
    let col = snap.columns.first()?;
    Some(FlatCandidate {
        source: col.source.clone(),
        labels: col.values.iter().map(label_of).collect(),
    })
}

/// Tree mode: one label sequence per level, skipping levels without values.
///
/// Returns `None` only when the snapshot has no column at all. A bound
/// hierarchy whose levels are all empty yields `Some` with zero levels.
pub fn extract_levels(snap: &DomainSnapshot) -> Option<LevelCandidate> {
    if snap.columns.is_empty() {
        return None;
    }
    let levels = snap
        .columns
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| LevelLabels {
            source: c.source.clone(),
            labels: c.values.iter().map(label_of).collect(),
        })
        .collect();
    Some(LevelCandidate { levels })
}
