//! Widget settings read from host metadata objects.
//!
//! Parsing never fails: every property is type-checked on its own and falls
//! back to its default when missing or of the wrong JSON type.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Single,
    Multiple,
}

/// Channels a committed selection is propagated through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    /// Host-native selection writes only.
    Selection,
    /// Declarative filter descriptors only.
    Filter,
    Both,
}

impl Propagation {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selection" => Some(Self::Selection),
            "filter" => Some(Self::Filter),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Filter => "filter",
            Self::Both => "both",
        }
    }

    pub fn writes_selection(&self) -> bool {
        matches!(self, Self::Selection | Self::Both)
    }

    pub fn writes_filter(&self) -> bool {
        matches!(self, Self::Filter | Self::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // behavior
    pub selection_mode: SelectionMode,
    pub force_selection: bool,
    pub leaf_only: bool,
    pub propagation: Propagation,

    // formatting
    pub font_size: f64,
    pub item_padding: f64,

    // search
    pub search_enabled: bool,
    pub search_placeholder: String,
    pub search_font_size: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::Single,
            force_selection: true,
            leaf_only: true,
            propagation: Propagation::Selection,
            font_size: 12.0,
            item_padding: 4.0,
            search_enabled: true,
            search_placeholder: "Search...".to_string(),
            search_font_size: 12.0,
        }
    }
}

impl Settings {
    pub fn is_single(&self) -> bool {
        self.selection_mode == SelectionMode::Single
    }

    /// Read settings from a metadata `objects` tree:
    ///
    /// ```text
    /// { "behavior":   { "selectionMode": bool, "forceSelection": bool,
    ///                   "leafOnly": bool, "propagation": "selection|filter|both" },
    ///   "formatting": { "fontSize": number, "itemPadding": number },
    ///   "search":     { "enabled": bool, "placeholder": string, "fontSize": number } }
    /// ```
    ///
    /// `selectionMode` is `true` for single selection.
    pub fn parse(objects: &Value) -> Self {
        let d = Self::default();

        let single = get_bool(objects, "behavior", "selectionMode", d.is_single());
        let propagation = get_text(objects, "behavior", "propagation")
            .and_then(Propagation::parse)
            .unwrap_or(d.propagation);

        Self {
            selection_mode: if single {
                SelectionMode::Single
            } else {
                SelectionMode::Multiple
            },
            force_selection: get_bool(objects, "behavior", "forceSelection", d.force_selection),
            leaf_only: get_bool(objects, "behavior", "leafOnly", d.leaf_only),
            propagation,
            font_size: get_number(objects, "formatting", "fontSize", d.font_size),
            item_padding: get_number(objects, "formatting", "itemPadding", d.item_padding),
            search_enabled: get_bool(objects, "search", "enabled", d.search_enabled),
            search_placeholder: get_text(objects, "search", "placeholder")
                .map(str::to_string)
                .unwrap_or(d.search_placeholder),
            search_font_size: get_number(objects, "search", "fontSize", d.search_font_size),
        }
    }

    /// Format-pane enumeration for one object. Unknown objects yield nothing.
    pub fn object_instances(&self, object_name: &str) -> Vec<Value> {
        let properties = match object_name {
            "behavior" => json!({
                "selectionMode": self.is_single(),
                "forceSelection": self.force_selection,
                "leafOnly": self.leaf_only,
                "propagation": self.propagation.as_str(),
            }),
            "formatting" => json!({
                "fontSize": self.font_size,
                "itemPadding": self.item_padding,
            }),
            "search" => json!({
                "enabled": self.search_enabled,
                "placeholder": self.search_placeholder,
                "fontSize": self.search_font_size,
            }),
            _ => return Vec::new(),
        };
        vec![json!({
            "objectName": object_name,
            "properties": properties,
            "selector": Value::Object(Map::new()),
        })]
    }
}

fn get_prop<'a>(objects: &'a Value, category: &str, prop: &str) -> Option<&'a Value> {
    objects.get(category)?.get(prop)
}

fn get_bool(objects: &Value, category: &str, prop: &str, def: bool) -> bool {
    get_prop(objects, category, prop)
        .and_then(Value::as_bool)
        .unwrap_or(def)
}

fn get_number(objects: &Value, category: &str, prop: &str, def: f64) -> f64 {
    get_prop(objects, category, prop)
        .and_then(Value::as_f64)
        .unwrap_or(def)
}

fn get_text<'a>(objects: &'a Value, category: &str, prop: &str) -> Option<&'a str> {
    get_prop(objects, category, prop).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_single_force_leaf_only() {
        let s = Settings::parse(&Value::Null);
        assert_eq!(s, Settings::default());
        assert!(s.is_single());
        assert!(s.force_selection);
        assert!(s.leaf_only);
        assert_eq!(s.propagation, Propagation::Selection);
    }

    #[test]
    fn wrong_types_fall_back_per_property() {
        let objects = json!({
            "behavior": { "selectionMode": "no", "forceSelection": false, "propagation": 7 },
            "formatting": { "fontSize": "big", "itemPadding": 6 },
            "search": { "placeholder": "Buscar..." }
        });
        let s = Settings::parse(&objects);
        assert!(s.is_single());
        assert!(!s.force_selection);
        assert_eq!(s.propagation, Propagation::Selection);
        assert_eq!(s.font_size, 12.0);
        assert_eq!(s.item_padding, 6.0);
        assert_eq!(s.search_placeholder, "Buscar...");
    }

    #[test]
    fn multiple_mode_and_both_channels() {
        let objects = json!({
            "behavior": { "selectionMode": false, "propagation": "Both" }
        });
        let s = Settings::parse(&objects);
        assert_eq!(s.selection_mode, SelectionMode::Multiple);
        assert!(s.propagation.writes_filter());
        assert!(s.propagation.writes_selection());
    }

    #[test]
    fn object_instances_round_trip_through_parse() {
        let mut s = Settings::default();
        s.selection_mode = SelectionMode::Multiple;
        s.font_size = 14.0;

        let mut objects = Map::new();
        for name in ["behavior", "formatting", "search"] {
            let inst = s.object_instances(name).remove(0);
            objects.insert(name.to_string(), inst["properties"].clone());
        }
        assert_eq!(Settings::parse(&Value::Object(objects)), s);
        assert!(s.object_instances("nope").is_empty());
    }
}
