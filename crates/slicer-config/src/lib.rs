//! slicer-config
//!
//! Layered YAML configuration for a slicer widget instance plus the settings
//! surface the host delivers as metadata objects.
//!
//! - Layers merge in order (earlier = base, later overrides).
//! - The merged tree is hashed (SHA-256 over canonical JSON) so a replay can
//!   name exactly which configuration produced it.
//! - Unused keys are reported against the registry of keys the widget
//!   actually reads, per view mode.

mod settings;

pub use settings::{Propagation, SelectionMode, Settings};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;

// ---------------------------------------------------------------------------
// View mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Flat,
    Tree,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Flat => "FLAT",
            ViewMode::Tree => "TREE",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "list" => Ok(ViewMode::Flat),
            "tree" | "hierarchy" => Ok(ViewMode::Tree),
            other => bail!("invalid view mode '{}'. expected one of: flat | tree", other),
        }
    }
}

// ---------------------------------------------------------------------------
// Widget config
// ---------------------------------------------------------------------------

/// Everything a widget instance needs from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Filter scope name; `None` falls back to the caller's default name.
    pub scope_name: Option<String>,
    pub mode: ViewMode,
    pub settings: Settings,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            scope_name: None,
            mode: ViewMode::Flat,
            settings: Settings::default(),
        }
    }
}

impl WidgetConfig {
    /// Build from canonical config JSON (see [`load_layered_yaml`]).
    ///
    /// Optional fields:
    /// - widget.scope (string)
    /// - widget.mode (`flat` | `tree`); default flat
    /// - objects.* (host metadata objects, see [`Settings::parse`])
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let scope_name = match cfg.pointer("/widget/scope") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(other) => bail!("widget.scope must be a non-empty string (got {other})"),
        };

        let mode = match cfg.pointer("/widget/mode") {
            None | Some(Value::Null) => ViewMode::Flat,
            Some(Value::String(s)) => ViewMode::parse(s).context("widget.mode")?,
            Some(other) => bail!("widget.mode must be a string (got {other})"),
        };

        let settings = Settings::parse(cfg.pointer("/objects").unwrap_or(&Value::Null));

        Ok(Self {
            scope_name,
            mode,
            settings,
        })
    }
}

// ---------------------------------------------------------------------------
// Unused-key report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnusedKeyReport {
    pub mode: ViewMode,
    /// JSON pointers of config leaves nothing reads (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// A key read by [`WidgetConfig::from_config_json`] or [`Settings::parse`].
struct ConsumedKey {
    path: &'static [&'static str],
    /// `None` when every view mode reads it.
    only_in: Option<ViewMode>,
}

const fn consumed(path: &'static [&'static str], only_in: Option<ViewMode>) -> ConsumedKey {
    ConsumedKey { path, only_in }
}

// Keep in step with the readers above and in settings.rs.
const CONSUMED_KEYS: &[ConsumedKey] = &[
    consumed(&["widget", "scope"], None),
    consumed(&["widget", "mode"], None),
    consumed(&["objects", "behavior", "selectionMode"], None),
    consumed(&["objects", "behavior", "forceSelection"], None),
    consumed(&["objects", "behavior", "leafOnly"], Some(ViewMode::Tree)),
    consumed(&["objects", "behavior", "propagation"], None),
    consumed(&["objects", "formatting", "fontSize"], None),
    consumed(&["objects", "formatting", "itemPadding"], None),
    consumed(&["objects", "search", "enabled"], None),
    consumed(&["objects", "search", "placeholder"], None),
    consumed(&["objects", "search", "fontSize"], None),
];

/// Report config leaves that a widget in `mode` never reads.
/// With [`UnusedKeyPolicy::Fail`] any such leaf is an error.
pub fn report_unused_keys(
    mode: ViewMode,
    config_json: &Value,
    policy: UnusedKeyPolicy,
) -> Result<UnusedKeyReport> {
    let read: Vec<&[&str]> = CONSUMED_KEYS
        .iter()
        .filter(|k| k.only_in.map_or(true, |m| m == mode))
        .map(|k| k.path)
        .collect();

    let mut unused = Vec::new();
    collect_unread(config_json, &mut Vec::new(), &read, &mut unused);
    unused.sort();

    let report = UnusedKeyReport {
        mode,
        unused_leaf_pointers: unused,
    };
    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "CONFIG_UNUSED_KEYS (mode={}): {} config key(s) are never read: {}",
            mode.as_str(),
            report.unused_leaf_pointers.len(),
            report
                .unused_leaf_pointers
                .iter()
                .take(12)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(report)
}

/// Depth-first over `value`; a subtree under a read key is skipped whole.
fn collect_unread(value: &Value, path: &mut Vec<String>, read: &[&[&str]], out: &mut Vec<String>) {
    if read.iter().any(|key| is_under(key, path)) {
        return;
    }
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                path.push(k.clone());
                collect_unread(v, path, read, out);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                path.push(i.to_string());
                collect_unread(v, path, read, out);
                path.pop();
            }
        }
        _ => out.push(json_pointer(path)),
    }
}

fn is_under(key: &[&str], path: &[String]) -> bool {
    key.len() <= path.len() && key.iter().zip(path).all(|(k, p)| *k == p)
}

fn json_pointer(path: &[String]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.iter()
        .map(|seg| format!("/{}", seg.replace('~', "~0").replace('/', "~1")))
        .collect()
}

// ---------------------------------------------------------------------------
// Layered loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    fn from_merged(config_json: Value) -> Result<Self> {
        let canonical_json =
            serde_json::to_string(&config_json).context("serialize merged config")?;
        let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));
        Ok(Self {
            config_hash,
            canonical_json,
            config_json,
        })
    }
}

/// Read and layer YAML files in order.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for path in paths {
        let raw = fs::read_to_string(path).with_context(|| format!("read config layer: {path}"))?;
        let layer = parse_layer(&raw).with_context(|| format!("config layer: {path}"))?;
        overlay(&mut merged, layer);
    }
    LoadedConfig::from_merged(merged)
}

/// Same as [`load_layered_yaml`] over in-memory documents.
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let layer = parse_layer(raw).with_context(|| format!("config layer #{i}"))?;
        overlay(&mut merged, layer);
    }
    LoadedConfig::from_merged(merged)
}

fn parse_layer(raw: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
    serde_json::to_value(yaml).context("yaml layer has no json form")
}

/// Lay `top` over `base`: objects merge key by key, any other value replaces.
/// An empty layer changes nothing.
fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(top_map)) => {
            for (k, v) in top_map {
                match base_map.get_mut(&k) {
                    Some(slot) => overlay(slot, v),
                    None => {
                        base_map.insert(k, v);
                    }
                }
            }
        }
        (slot, other) => *slot = other,
    }
}
