//! Command handler helpers for slicer-cli.
//!
//! Shared utilities used by multiple command paths live here.

use anyhow::{Context, Result};
use slicer_config::{LoadedConfig, ViewMode, WidgetConfig};
use slicer_testkit::{Replay, Script};
use tracing::info;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Parse a CLI `--mode` string into a [`ViewMode`].
pub fn parse_view_mode(mode: &str) -> Result<ViewMode> {
    ViewMode::parse(mode).with_context(|| format!("invalid --mode '{}'", mode.trim()))
}

/// Merge the given YAML layers. No layers yields the empty config `{}`.
pub fn load_config(paths: &[String]) -> Result<(LoadedConfig, WidgetConfig)> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = slicer_config::load_layered_yaml(&path_refs)?;
    let widget = WidgetConfig::from_config_json(&loaded.config_json)
        .context("config does not describe a valid widget")?;
    Ok((loaded, widget))
}

// ---------------------------------------------------------------------------
// replay
// ---------------------------------------------------------------------------

/// Replay a script and return one compact JSON line per transcript entry.
///
/// Mode precedence: `--mode`, then the script's own `mode`, then `widget.mode`.
pub fn replay_lines(
    script_path: &str,
    config_paths: &[String],
    mode: Option<&str>,
) -> Result<Vec<String>> {
    let script = Script::load(script_path)?;
    let (loaded, widget) = load_config(config_paths)?;

    let mode = match mode {
        Some(m) => parse_view_mode(m)?,
        None => script.mode.unwrap_or(widget.mode),
    };
    info!(
        "replay script={} steps={} mode={} config_hash={}",
        script_path,
        script.steps.len(),
        mode.as_str(),
        loaded.config_hash
    );

    let mut replay = Replay::new(mode, &widget);
    let transcript = replay
        .run(&script)
        .with_context(|| format!("replay failed: {script_path}"))?;

    transcript
        .iter()
        .map(|entry| serde_json::to_string(entry).context("transcript serialize failed"))
        .collect()
}
