//! Host capability seams.
//!
//! The controller never owns the host. Every entry point borrows it for the
//! duration of one synchronous turn. Writes are fire-and-forget; the only
//! feedback is a later call to
//! [`Controller::apply_external_selection`](crate::Controller::apply_external_selection).

use slicer_filter::FilterHost;
use slicer_schemas::{ColumnSource, SelectionHandle};

/// Outbound selection write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionWrite {
    Select {
        handles: Vec<SelectionHandle>,
        /// Multiple mode sends the full selected set with `true`.
        extend_current: bool,
    },
    Clear,
}

/// Host-native selection capability.
pub trait SelectionHost {
    /// Mint the handle for a value. `path` is the label path from the first
    /// level down to the value (a single label in flat mode).
    fn selection_handle(&self, source: &ColumnSource, path: &[String]) -> SelectionHandle;

    fn write_selection(&mut self, write: SelectionWrite);

    /// Whether the host currently holds a selection for this widget.
    /// `None` when the host cannot tell; the controller then falls back to the
    /// last reported key set.
    fn has_selection(&self) -> Option<bool> {
        None
    }
}

/// Everything the controller needs from the host.
pub trait Host: SelectionHost + FilterHost {
    fn as_filter_host(&mut self) -> &mut dyn FilterHost;
}

impl<T: SelectionHost + FilterHost> Host for T {
    fn as_filter_host(&mut self) -> &mut dyn FilterHost {
        self
    }
}
