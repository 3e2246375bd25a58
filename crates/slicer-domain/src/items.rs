//! Flat-mode value items.

use std::collections::HashSet;

use slicer_schemas::SelectionHandle;

/// One selectable value in flat mode.
///
/// Identity for selection is the handle. The label is only used as a
/// best-effort key to carry selection across rebuilds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueItem {
    pub label: String,
    pub handle: SelectionHandle,
    pub selected: bool,
}

/// Build items for `labels`, minting one handle per label.
///
/// Labels selected in `previous` stay selected.
pub fn build_items(
    labels: &[String],
    mut handle_for: impl FnMut(&str) -> SelectionHandle,
    previous: &[ValueItem],
) -> Vec<ValueItem> {
    let kept: HashSet<&str> = previous
        .iter()
        .filter(|i| i.selected)
        .map(|i| i.label.as_str())
        .collect();

    labels
        .iter()
        .map(|label| ValueItem {
            label: label.clone(),
            handle: handle_for(label),
            selected: kept.contains(label.as_str()),
        })
        .collect()
}

pub fn any_selected(items: &[ValueItem]) -> bool {
    items.iter().any(|i| i.selected)
}

pub fn selected_labels(items: &[ValueItem]) -> Vec<String> {
    items
        .iter()
        .filter(|i| i.selected)
        .map(|i| i.label.clone())
        .collect()
}

pub fn selected_handles(items: &[ValueItem]) -> Vec<SelectionHandle> {
    items
        .iter()
        .filter(|i| i.selected)
        .map(|i| i.handle.clone())
        .collect()
}
