//! JSON replay scripts.
//!
//! A script is an ordered list of host events and user actions. Replaying it
//! drives one [`Controller`] against a [`RecordingHost`] and yields one
//! transcript entry per step: the outcome, the resulting selection and lock
//! memory, and every host call the step caused.
//!
//! ```json
//! { "mode": "flat",
//!   "steps": [
//!     { "op": "refresh", "columns": [ { "source": { "query_name": "Sales.Region" },
//!                                       "values": ["East", "West"] } ] },
//!     { "op": "echo" },
//!     { "op": "click_item", "index": 1 } ] }
//! ```

use std::fmt;
use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slicer_config::{Settings, ViewMode, WidgetConfig};
use slicer_reconcile::{Controller, ReconcileState, SelectionWrite};
use slicer_schemas::{Column, DomainSnapshot, ScopeId};

use crate::recording_host::{FilterCall, RecordingHost};

/// Scope used when the config names none, so transcripts stay reproducible.
pub const DEFAULT_REPLAY_SCOPE: &str = "slicer-replay";

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Refresh {
        #[serde(default)]
        columns: Vec<Column>,
    },
    ClickItem {
        index: usize,
    },
    ClickNodePath {
        path: Vec<String>,
    },
    ToggleNodePath {
        path: Vec<String>,
    },
    /// Host callback carrying a selection this widget did not write.
    HostSelection {
        keys: Vec<String>,
    },
    /// Host callback echoing whatever it currently holds.
    Echo,
    Settings {
        objects: Value,
    },
    Search {
        text: String,
    },
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Step::Refresh { .. } => "refresh",
            Step::ClickItem { .. } => "click_item",
            Step::ClickNodePath { .. } => "click_node_path",
            Step::ToggleNodePath { .. } => "toggle_node_path",
            Step::HostSelection { .. } => "host_selection",
            Step::Echo => "echo",
            Step::Settings { .. } => "settings",
            Step::Search { .. } => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Overrides the configured view mode when present.
    #[serde(default)]
    pub mode: Option<ViewMode>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parse replay script json")
    }

    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("read script: {path}"))?;
        Self::from_json_str(&raw)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A node step ran while the controller holds no tree.
    NotInTreeMode { step: usize, op: &'static str },
    /// The label path does not exist in the committed tree.
    UnknownNodePath { step: usize, path: Vec<String> },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::NotInTreeMode { step, op } => {
                write!(f, "step {step}: '{op}' needs a committed tree")
            }
            ScriptError::UnknownNodePath { step, path } => {
                write!(f, "step {step}: no node at path {path:?}")
            }
        }
    }
}

impl std::error::Error for ScriptError {}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteRecord {
    Select {
        keys: Vec<String>,
        extend_current: bool,
    },
    Clear,
}

impl From<&SelectionWrite> for WriteRecord {
    fn from(w: &SelectionWrite) -> Self {
        match w {
            SelectionWrite::Select {
                handles,
                extend_current,
            } => WriteRecord::Select {
                keys: handles.iter().map(|h| h.key().to_string()).collect(),
                extend_current: *extend_current,
            },
            SelectionWrite::Clear => WriteRecord::Clear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub step: usize,
    pub op: &'static str,
    pub outcome: String,
    pub selected: Vec<String>,
    pub filtered_lock: bool,
    pub max_item_count: usize,
    pub last_item_count: usize,
    pub writes: Vec<WriteRecord>,
    pub filters: Vec<FilterCall>,
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

pub struct Replay {
    controller: Controller,
    host: RecordingHost,
}

impl Replay {
    pub fn new(mode: ViewMode, config: &WidgetConfig) -> Self {
        let scope = ScopeId::from_name(
            config
                .scope_name
                .as_deref()
                .unwrap_or(DEFAULT_REPLAY_SCOPE),
        );
        Self {
            controller: Controller::new(mode, config.settings.clone(), ReconcileState::new(), scope),
            host: RecordingHost::new(),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn host(&self) -> &RecordingHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut RecordingHost {
        &mut self.host
    }

    pub fn run(&mut self, script: &Script) -> Result<Vec<TranscriptEntry>, ScriptError> {
        script
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| self.step(i, step))
            .collect()
    }

    pub fn step(&mut self, index: usize, step: &Step) -> Result<TranscriptEntry, ScriptError> {
        let outcome = match step {
            Step::Refresh { columns } => {
                let snapshot = DomainSnapshot::levels(columns.clone());
                format!("{:?}", self.controller.refresh(&snapshot, &mut self.host))
            }
            Step::ClickItem { index: item } => {
                format!("{:?}", self.controller.click_item(*item, &mut self.host))
            }
            Step::ClickNodePath { path } => {
                let id = self.resolve_path(index, step.op(), path)?;
                format!("{:?}", self.controller.click_node(id, &mut self.host))
            }
            Step::ToggleNodePath { path } => {
                let id = self.resolve_path(index, step.op(), path)?;
                format!("toggled={}", self.controller.toggle_node(id))
            }
            Step::HostSelection { keys } => {
                self.host.set_held(keys);
                format!(
                    "{:?}",
                    self.controller.apply_external_selection(keys, &self.host)
                )
            }
            Step::Echo => {
                let keys = self.host.echo();
                format!(
                    "{:?}",
                    self.controller.apply_external_selection(&keys, &self.host)
                )
            }
            Step::Settings { objects } => {
                self.controller.set_settings(Settings::parse(objects));
                "settings_applied".to_string()
            }
            Step::Search { text } => {
                self.controller.set_search(text.clone());
                format!("visible={}", self.visible_count())
            }
        };

        let (writes, filters) = self.host.take_calls();
        let state = self.controller.state();
        Ok(TranscriptEntry {
            step: index,
            op: step.op(),
            outcome,
            selected: self.controller.selected_labels(),
            filtered_lock: state.filtered_lock,
            max_item_count: state.max_item_count,
            last_item_count: state.last_item_count,
            writes: writes.iter().map(WriteRecord::from).collect(),
            filters,
        })
    }

    fn resolve_path(
        &self,
        step: usize,
        op: &'static str,
        path: &[String],
    ) -> Result<slicer_domain::NodeId, ScriptError> {
        let tree = self
            .controller
            .tree()
            .ok_or(ScriptError::NotInTreeMode { step, op })?;
        tree.find_path(path).ok_or_else(|| ScriptError::UnknownNodePath {
            step,
            path: path.to_vec(),
        })
    }

    fn visible_count(&self) -> usize {
        match self.controller.mode() {
            ViewMode::Flat => self.controller.visible_items().len(),
            ViewMode::Tree => self.controller.visible_nodes().len(),
        }
    }
}

/// Replay `script` against a fresh controller built from `config`.
pub fn replay(script: &Script, config: &WidgetConfig) -> Result<Vec<TranscriptEntry>, ScriptError> {
    let mode = script.mode.unwrap_or(config.mode);
    Replay::new(mode, config).run(script)
}
