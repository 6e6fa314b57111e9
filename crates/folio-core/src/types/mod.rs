//! # Core Type Definitions
//!
//! This module contains all core types for the Folio delegation engine:
//! - Member name newtypes (`TargetName`, `SourceName`)
//! - Domain wrappers for accessor parameters (`GroupBy`, `Freq`, `ReturnsSeries`, `JitOption`)
//! - Open-ended argument passing (`Kwargs`, `ArgValue`)
//! - Metric results (`MetricValue`)
//! - Error types (`FolioError`)
//!
//! ## Determinism Guarantees
//!
//! All keyed collections in this module use `BTreeMap` for deterministic
//! ordering. Name newtypes validate identifier shape on construction so a
//! surface never carries a member name that could not be spelled in code.

use crate::capability::Capability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// MEMBER NAME NEWTYPES
// =============================================================================

/// Check that a string is usable as a member name.
///
/// ASCII identifier shape: a letter or underscore followed by
/// letters, digits, or underscores. Empty strings are rejected.
fn is_member_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The public member name exposed on the host's accessor surface.
///
/// A target `sharpe_ratio` yields the method `get_sharpe_ratio` and the
/// property `sharpe_ratio`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetName(String);

impl TargetName {
    /// Create a validated target name.
    ///
    /// Returns `FolioError::InvalidMemberName` if the string is not an
    /// ASCII identifier.
    pub fn new(s: impl Into<String>) -> Result<Self, FolioError> {
        let s = s.into();
        if is_member_name(&s) {
            Ok(Self(s))
        } else {
            Err(FolioError::InvalidMemberName(s))
        }
    }

    /// Get the target name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The method name resolved on the returns accessor at call time.
///
/// Defaults to the target name when a configuration entry omits it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceName(String);

impl SourceName {
    /// Create a validated source name.
    ///
    /// Returns `FolioError::InvalidMemberName` if the string is not an
    /// ASCII identifier.
    pub fn new(s: impl Into<String>) -> Result<Self, FolioError> {
        let s = s.into();
        if is_member_name(&s) {
            Ok(Self(s))
        } else {
            Err(FolioError::InvalidMemberName(s))
        }
    }

    /// Get the source name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TargetName> for SourceName {
    fn from(target: TargetName) -> Self {
        // Target names pass the same identifier validation.
        Self(target.0)
    }
}

// =============================================================================
// ACCESSOR PARAMETER WRAPPERS
// =============================================================================

/// Grouping key for collapsing columns into groups before computation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupBy(pub String);

impl GroupBy {
    /// Create a new grouping key.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the grouping key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sampling or annualization frequency, e.g. `"d"` or `"365d"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Freq(pub String);

impl Freq {
    /// Create a new frequency.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the frequency as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A series of simple returns, one value per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReturnsSeries(pub Vec<f64>);

impl ReturnsSeries {
    /// Create a new returns series.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self(values.into())
    }

    /// Get the underlying values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Number of periods in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the series has no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Execution-mode option for accessor methods that support compiled paths.
///
/// Forwarded to a resolved accessor method only when that method declares
/// the `jitted` parameter; silently dropped otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JitOption {
    /// Force the interpreted path.
    Disabled,
    /// Compile without falling back to object mode.
    Nopython,
    /// Compile with parallel execution.
    Parallel,
}

// =============================================================================
// OPEN-ENDED ARGUMENTS
// =============================================================================

/// A single value passed through the open-ended argument map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer argument, e.g. a window length.
    Int(i64),
    /// Floating-point argument, e.g. a risk-free rate.
    Float(f64),
    /// Text argument.
    Text(String),
    /// Per-period series argument.
    Series(Vec<f64>),
    /// The execution-mode option, carried verbatim when forwarded.
    ///
    /// `None` means the caller left the option at its default; presence of
    /// the entry itself records that forwarding happened.
    Jitted(Option<JitOption>),
}

impl ArgValue {
    /// View as a boolean, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// View as a float. Integers widen; other variants return `None`.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// View as the forwarded execution-mode option.
    #[must_use]
    pub fn as_jitted(&self) -> Option<Option<JitOption>> {
        match self {
            Self::Jitted(j) => Some(*j),
            _ => None,
        }
    }
}

/// Open-ended named arguments forwarded to a resolved accessor method.
///
/// Uses `BTreeMap` for deterministic ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kwargs {
    values: BTreeMap<String, ArgValue>,
}

impl Kwargs {
    /// Create an empty argument map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an argument, replacing any previous value under the name.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    /// Look up an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Check whether an argument is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no arguments are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate arguments in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// =============================================================================
// METRIC RESULTS
// =============================================================================

/// Result of an accessor method, returned unchanged by the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    /// A single metric value.
    Scalar(f64),
    /// One metric value per group or column.
    Series(Vec<f64>),
}

impl MetricValue {
    /// View as a scalar, if this is a `Scalar`.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// View as a series, if this is a `Series`.
    #[must_use]
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Self::Series(v) => Some(v),
            _ => None,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Folio engine.
///
/// Two families:
/// - Configuration-time errors are raised eagerly by the augmentation driver;
///   when one is raised, zero members are attached.
/// - Call-time errors are deferred to the first use of a specific member and
///   never surface during augmentation.
#[derive(Debug, Error)]
pub enum FolioError {
    /// The host class does not declare a required capability (configuration-time).
    #[error("host '{host}' is missing required capability {capability:?}")]
    MissingCapability {
        host: &'static str,
        capability: Capability,
    },

    /// A configuration key is not usable as a member name (configuration-time).
    #[error("invalid member name '{0}'")]
    InvalidMemberName(String),

    /// The same target name appears twice in one configuration (configuration-time).
    #[error("duplicate target name '{0}' in configuration")]
    DuplicateTarget(String),

    /// A generated member name collides with a host-declared member (configuration-time).
    #[error("member name '{member}' collides with an existing member of host '{host}'")]
    MemberCollision {
        host: &'static str,
        member: String,
    },

    /// The surface has no entry under the requested target name (call-time).
    #[error("surface has no member for target '{0}'")]
    UnknownTarget(String),

    /// The returns accessor has no method under the source name (call-time).
    #[error("returns accessor has no method '{method}' (target '{target}')")]
    UnknownSourceMethod { method: String, target: String },

    /// The companion factory itself failed (call-time).
    #[error("returns accessor construction failed: {0}")]
    FactoryFailed(String),

    /// An accessor method rejected one of its arguments (call-time).
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },
}

// =============================================================================
// TESTS
// =============================================================================
