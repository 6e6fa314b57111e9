//! # Signature Introspection
//!
//! Reads the formal parameter names a companion method declares.
//!
//! Used exactly once per synthesized-member call, to test membership of
//! one specific name: the execution-mode option. Pure; no caching is
//! needed because a method's declared set cannot change for a given
//! method value.

use crate::companion::CompanionMethod;
use std::collections::BTreeSet;

/// Name of the implicit execution-mode parameter.
///
/// A synthesized member forwards its execution-mode option only to
/// resolved methods that declare this name.
pub const JITTED_PARAM: &str = "jitted";

/// The set of formal parameter names a method declares, by name only.
#[must_use]
pub fn param_names(method: &CompanionMethod) -> &BTreeSet<String> {
    method.params()
}

/// Check whether a method declares a parameter of the given name.
#[must_use]
pub fn accepts(method: &CompanionMethod, name: &str) -> bool {
    method.params().contains(name)
}

// =============================================================================
// TESTS
// =============================================================================
