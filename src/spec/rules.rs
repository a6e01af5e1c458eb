//! Ordered rule engine.
//!
//! A node kind declares a fixed, dependency-ordered list of named rules. Each rule
//! looks at the spec (or the old/new pair on update) and appends zero or more
//! violations. The engine never stops early: later rules run even when earlier ones
//! fired, so one pass reports every problem.

use crate::spec::field::ErrorList;
use tracing::debug;

/// A create-time rule.
pub struct Rule<S: 'static> {
    pub name: &'static str,
    pub check: fn(&S, &mut ErrorList),
}

/// An update-time rule, called with `(old, new)`.
pub struct UpdateRule<S: 'static> {
    pub name: &'static str,
    pub check: fn(&S, &S, &mut ErrorList),
}

pub fn run_create<S>(rules: &[Rule<S>], spec: &S) -> ErrorList {
    let mut errors = ErrorList::new();
    for rule in rules {
        let before = errors.len();
        (rule.check)(spec, &mut errors);
        trace_fired(rule.name, &errors, before);
    }
    errors
}

pub fn run_update<S>(rules: &[UpdateRule<S>], old: &S, new: &S) -> ErrorList {
    let mut errors = ErrorList::new();
    for rule in rules {
        let before = errors.len();
        (rule.check)(old, new, &mut errors);
        trace_fired(rule.name, &errors, before);
    }
    errors
}

pub(crate) fn trace_fired(rule: &str, errors: &ErrorList, before: usize) {
    for err in &errors.as_slice()[before..] {
        debug!(rule, field = %err.field, detail = %err.detail, "rule violated");
    }
}
