//! slicer-filter
//!
//! Declarative filter emission for the slicer: resolve which `{table, column}`
//! a selection addresses, build a basic "In" descriptor, and merge or
//! withdraw it through the host's filter capability.

mod descriptor;
mod emitter;
mod target;

pub use descriptor::{FilterAction, FilterDescriptor, BASIC_FILTER_SCHEMA};
pub use emitter::{EmissionOutcome, FilterEmitter, FilterHost};
pub use target::{resolve_target, resolve_target_with_origin, FilterTarget, TargetOrigin};
