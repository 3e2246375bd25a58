//! Filter emission.
//!
//! Projects a committed selection into a filter request and issues it to the
//! host. Host writes are fire-and-forget.
//!
//! # Invariants
//!
//! - Non-empty selection → `Merge` with a set-membership descriptor.
//! - Empty selection → `Remove` with no descriptor, and only when this
//!   emitter has a filter of its own outstanding.
//! - Unresolvable target → nothing is sent; the caller keeps its local
//!   selection and the condition is logged.

use slicer_schemas::{ColumnSource, ScopeId};
use tracing::{debug, warn};

use crate::descriptor::{FilterAction, FilterDescriptor};
use crate::target::{resolve_target_with_origin, FilterTarget};

/// Outbound filter capability of the host.
pub trait FilterHost {
    fn apply_filter(
        &mut self,
        filter: Option<&FilterDescriptor>,
        scope: &ScopeId,
        action: FilterAction,
    );
}

/// What an emission did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmissionOutcome {
    /// A merge filter was issued for `target`.
    Applied { target: FilterTarget, values: usize },
    /// This widget's prior filter was withdrawn.
    Withdrawn,
    /// Selection is empty and nothing was outstanding.
    Idle,
    /// No filter target could be determined for the column.
    Skipped,
}

/// Remembers the target of the last filter this widget emitted so withdrawals
/// only ever touch its own filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterEmitter {
    outstanding: Option<FilterTarget>,
}

impl FilterEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target of the filter this widget currently holds, if any.
    pub fn outstanding(&self) -> Option<&FilterTarget> {
        self.outstanding.as_ref()
    }

    /// Emit (or withdraw) the filter for `labels` on `source`.
    pub fn emit(
        &mut self,
        labels: &[String],
        source: Option<&ColumnSource>,
        host: &mut dyn FilterHost,
        scope: &ScopeId,
    ) -> EmissionOutcome {
        if labels.is_empty() {
            return self.withdraw(host, scope);
        }

        let Some((target, origin)) = source.and_then(resolve_target_with_origin) else {
            warn!(
                query_name = source.map(|s| s.query_name.as_str()).unwrap_or(""),
                "filter target unresolved; filter not applied"
            );
            return EmissionOutcome::Skipped;
        };

        // Switching columns (tree level change): drop the old filter first so
        // the host never holds two filters from this widget.
        if self.outstanding.as_ref().is_some_and(|t| t != &target) {
            host.apply_filter(None, scope, FilterAction::Remove);
        }

        let desc = FilterDescriptor::basic_in(target.clone(), labels.to_vec());
        host.apply_filter(Some(&desc), scope, FilterAction::Merge);
        debug!(
            table = %target.table,
            column = %target.column,
            ?origin,
            values = labels.len(),
            "filter merged"
        );

        self.outstanding = Some(target.clone());
        EmissionOutcome::Applied {
            target,
            values: labels.len(),
        }
    }

    /// Withdraw this widget's own filter, if it holds one.
    pub fn withdraw(&mut self, host: &mut dyn FilterHost, scope: &ScopeId) -> EmissionOutcome {
        match self.outstanding.take() {
            Some(target) => {
                host.apply_filter(None, scope, FilterAction::Remove);
                debug!(table = %target.table, column = %target.column, "filter withdrawn");
                EmissionOutcome::Withdrawn
            }
            None => EmissionOutcome::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls(Vec<(Option<FilterDescriptor>, FilterAction)>);

    impl FilterHost for Calls {
        fn apply_filter(
            &mut self,
            filter: Option<&FilterDescriptor>,
            _scope: &ScopeId,
            action: FilterAction,
        ) {
            self.0.push((filter.cloned(), action));
        }
    }

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn merge_then_withdraw() {
        let scope = ScopeId::from_name("t");
        let src = ColumnSource::new("Geo.State", "State");
        let mut host = Calls::default();
        let mut em = FilterEmitter::new();

        let out = em.emit(&labels(&["SP", "RJ"]), Some(&src), &mut host, &scope);
        assert_eq!(
            out,
            EmissionOutcome::Applied {
                target: FilterTarget::new("Geo", "State"),
                values: 2
            }
        );
        assert_eq!(host.0.len(), 1);
        assert_eq!(host.0[0].1, FilterAction::Merge);
        assert_eq!(host.0[0].0.as_ref().unwrap().values, labels(&["SP", "RJ"]));

        let out = em.emit(&[], Some(&src), &mut host, &scope);
        assert_eq!(out, EmissionOutcome::Withdrawn);
        assert_eq!(host.0[1], (None, FilterAction::Remove));
        assert!(em.outstanding().is_none());
    }

    #[test]
    fn empty_without_prior_filter_sends_nothing() {
        let scope = ScopeId::from_name("t");
        let mut host = Calls::default();
        let mut em = FilterEmitter::new();
        assert_eq!(em.emit(&[], None, &mut host, &scope), EmissionOutcome::Idle);
        assert!(host.0.is_empty());
    }

    #[test]
    fn unresolved_target_is_skipped() {
        let scope = ScopeId::from_name("t");
        let src = ColumnSource::new("NoDot", "");
        let mut host = Calls::default();
        let mut em = FilterEmitter::new();
        assert_eq!(
            em.emit(&labels(&["x"]), Some(&src), &mut host, &scope),
            EmissionOutcome::Skipped
        );
        assert!(host.0.is_empty());
        assert!(em.outstanding().is_none());
    }

    #[test]
    fn column_switch_withdraws_previous_filter() {
        let scope = ScopeId::from_name("t");
        let mut host = Calls::default();
        let mut em = FilterEmitter::new();
        em.emit(&labels(&["S"]), Some(&ColumnSource::new("Geo.Region", "")), &mut host, &scope);
        em.emit(&labels(&["POA"]), Some(&ColumnSource::new("Geo.City", "")), &mut host, &scope);

        let actions: Vec<FilterAction> = host.0.iter().map(|c| c.1).collect();
        assert_eq!(
            actions,
            vec![FilterAction::Merge, FilterAction::Remove, FilterAction::Merge]
        );
        assert_eq!(em.outstanding(), Some(&FilterTarget::new("Geo", "City")));
    }
}
