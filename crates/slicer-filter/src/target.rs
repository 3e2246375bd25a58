//! Filter target resolution.
//!
//! Order of preference:
//! 1. structured column reference carried by the column source
//! 2. dotted `table.column` query name
//! 3. display name with an empty table (last resort; may not round-trip)

use serde::{Deserialize, Serialize};
use slicer_schemas::ColumnSource;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterTarget {
    pub table: String,
    pub column: String,
}

impl FilterTarget {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Which rule produced a target. Kept for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetOrigin {
    ColumnRef,
    QueryName,
    DisplayName,
}

/// Resolve the `{table, column}` a filter for `source` should address.
pub fn resolve_target(source: &ColumnSource) -> Option<FilterTarget> {
    resolve_target_with_origin(source).map(|(t, _)| t)
}

pub fn resolve_target_with_origin(source: &ColumnSource) -> Option<(FilterTarget, TargetOrigin)> {
    if let Some(r) = &source.column_ref {
        if !r.table.trim().is_empty() && !r.column.trim().is_empty() {
            return Some((
                FilterTarget::new(r.table.trim(), r.column.trim()),
                TargetOrigin::ColumnRef,
            ));
        }
    }

    if let Some(t) = split_query_name(&source.query_name) {
        return Some((t, TargetOrigin::QueryName));
    }

    let display = source.display_name.trim();
    if !display.is_empty() {
        return Some((FilterTarget::new("", display), TargetOrigin::DisplayName));
    }

    None
}

/// `Table.Column` → target. Aggregation wrappers such as `Sum(T.C)` are not
/// column references and are rejected.
fn split_query_name(q: &str) -> Option<FilterTarget> {
    let q = q.trim();
    if q.contains('(') || q.contains(')') {
        return None;
    }
    let (table, column) = q.split_once('.')?;
    let (table, column) = (table.trim(), column.trim());
    if table.is_empty() || column.is_empty() {
        return None;
    }
    Some(FilterTarget::new(table, column))
}
