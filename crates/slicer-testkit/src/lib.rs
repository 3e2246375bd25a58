//! slicer-testkit
//!
//! Test doubles and replay tooling for the slicer crates:
//! - [`RecordingHost`]: in-memory host that records writes and can echo
//! - [`Script`] / [`replay`]: JSON step lists driven through a controller

mod recording_host;
mod script;

pub use recording_host::{FilterCall, RecordingHost};
pub use script::{
    replay, Replay, Script, ScriptError, Step, TranscriptEntry, WriteRecord, DEFAULT_REPLAY_SCOPE,
};

use serde_json::Value;
use slicer_schemas::{Column, ColumnSource, DomainSnapshot};

/// One flat column named `query_name` with string values.
pub fn flat_snapshot(query_name: &str, labels: &[&str]) -> DomainSnapshot {
    DomainSnapshot::single(column(query_name, labels))
}

/// Parallel hierarchy levels, outermost first.
pub fn tree_snapshot(levels: &[(&str, &[&str])]) -> DomainSnapshot {
    DomainSnapshot::levels(
        levels
            .iter()
            .map(|(query_name, labels)| column(query_name, labels))
            .collect(),
    )
}

fn column(query_name: &str, labels: &[&str]) -> Column {
    let display = query_name.rsplit('.').next().unwrap_or(query_name);
    Column::new(
        ColumnSource::new(query_name, display),
        labels.iter().map(|l| Value::String(l.to_string())).collect(),
    )
}
