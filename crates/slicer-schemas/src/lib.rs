//! slicer-schemas
//!
//! Wire-level types shared by every slicer crate: the categorical snapshot
//! the host pushes on each refresh, the column source descriptor used for
//! filter targeting, and the opaque handles/scopes the host hands back.
//!
//! Everything here is plain data with serde derives. No logic beyond small
//! accessors lives in this crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Structured `table.column` reference embedded in a column descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Descriptor of a bound column as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSource {
    /// Host query identifier, usually `Table.Column`. Identity of the binding.
    pub query_name: String,
    /// Human readable column name.
    #[serde(default)]
    pub display_name: String,
    /// Structured reference, when the host provides one.
    #[serde(default)]
    pub column_ref: Option<ColumnRef>,
}

impl ColumnSource {
    pub fn new(query_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            display_name: display_name.into(),
            column_ref: None,
        }
    }

    pub fn with_ref(mut self, column_ref: ColumnRef) -> Self {
        self.column_ref = Some(column_ref);
        self
    }
}

/// One categorical column: a source descriptor plus its ordered raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub source: ColumnSource,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(source: ColumnSource, values: Vec<Value>) -> Self {
        Self { source, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Host-provided categorical snapshot.
///
/// Flat mode reads `columns[0]`. Tree mode reads every column in order as one
/// hierarchy level; their `values` are parallel (row `i` of each level belongs
/// to the same data row).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainSnapshot {
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl DomainSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(column: Column) -> Self {
        Self {
            columns: vec![column],
        }
    }

    pub fn levels(columns: Vec<Column>) -> Self {
        Self { columns }
    }
}

// ---------------------------------------------------------------------------
// Host handles
// ---------------------------------------------------------------------------

/// Opaque host selection handle. Only its key is ever inspected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectionHandle {
    key: String,
}

impl SelectionHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Identifier a widget instance scopes its filters to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub Uuid);

impl ScopeId {
    /// Stable scope derived from a name (same name, same scope).
    pub fn from_name(name: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
