//! # Companion Model
//!
//! The returns accessor as seen by the engine: an instance-owned registry
//! of named methods, each carrying its declared parameter-name set and a
//! computation body.
//!
//! The engine never inspects what a method computes. Resolution is by name
//! and lazy: a synthesized member looks its source method up on every
//! call, so an accessor whose registry differs between calls changes what
//! is found. Unknown names are a typed call-time error, raised by the
//! synthesized member, never during registration.

use crate::types::{FolioError, Freq, GroupBy, JitOption, Kwargs, MetricValue, ReturnsSeries};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// =============================================================================
// FACTORY REQUEST
// =============================================================================

/// Named parameters accepted by the companion factory on a host.
///
/// Built from `CallArgs` on every synthesized-member call; the factory
/// receives the grouping key, benchmark series, frequencies, the
/// asset-vs-portfolio selector, and the execution-mode option.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessorRequest {
    /// Grouping key for collapsing columns before computation.
    pub group_by: Option<GroupBy>,
    /// Benchmark return series for relative metrics.
    pub benchmark_rets: Option<ReturnsSeries>,
    /// Sampling frequency of the return series.
    pub freq: Option<Freq>,
    /// Annualization frequency.
    pub year_freq: Option<Freq>,
    /// `true` selects asset returns, `false` portfolio returns.
    pub use_asset_returns: bool,
    /// Execution-mode option handed to the factory itself.
    pub jitted: Option<JitOption>,
}

// =============================================================================
// COMPANION METHOD
// =============================================================================

/// Computation body of one accessor method.
type MethodBody = Box<dyn Fn(&Kwargs) -> Result<MetricValue, FolioError> + Send + Sync>;

/// One method registered on a `Companion`.
///
/// The parameter-name set is declared at registration and is what the
/// signature introspector reads to decide execution-mode forwarding.
pub struct CompanionMethod {
    params: BTreeSet<String>,
    body: MethodBody,
}

impl CompanionMethod {
    /// Create a method with its declared formal parameter names.
    #[must_use]
    pub fn new(
        params: &[&str],
        body: impl Fn(&Kwargs) -> Result<MetricValue, FolioError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            params: params.iter().map(|p| (*p).to_string()).collect(),
            body: Box::new(body),
        }
    }

    /// The declared formal parameter names, by name only.
    #[must_use]
    pub fn params(&self) -> &BTreeSet<String> {
        &self.params
    }

    /// Invoke the computation body with the given arguments.
    pub fn invoke(&self, kwargs: &Kwargs) -> Result<MetricValue, FolioError> {
        (self.body)(kwargs)
    }
}

impl fmt::Debug for CompanionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanionMethod")
            .field("params", &self.params)
            .finish()
    }
}

// =============================================================================
// COMPANION
// =============================================================================

/// A returns accessor instance: a registry of named methods.
///
/// Constructed by the host's factory on every synthesized-member call and
/// dropped when the call returns. Which methods exist is a property of the
/// instance, not of any type.
#[derive(Default)]
pub struct Companion {
    methods: BTreeMap<String, CompanionMethod>,
}

impl Companion {
    /// Create an accessor with no methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method, replacing any previous one under the name.
    pub fn register(&mut self, name: impl Into<String>, method: CompanionMethod) {
        self.methods.insert(name.into(), method);
    }

    /// Builder form of `register`.
    #[must_use]
    pub fn with_method(
        mut self,
        name: impl Into<String>,
        params: &[&str],
        body: impl Fn(&Kwargs) -> Result<MetricValue, FolioError> + Send + Sync + 'static,
    ) -> Self {
        self.register(name, CompanionMethod::new(params, body));
        self
    }

    /// Resolve a method by name. `None` when the name is unknown.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&CompanionMethod> {
        self.methods.get(name)
    }

    /// Iterate registered method names in name order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(|k| k.as_str())
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if no methods are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for Companion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Companion")
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_finds_registered_method() {
        let companion = Companion::new()
            .with_method("sharpe_ratio", &["risk_free", "jitted"], |_| {
                Ok(MetricValue::Scalar(1.0))
            });

        assert!(companion.resolve("sharpe_ratio").is_some());
        assert!(companion.resolve("sortino_ratio").is_none());
    }

    #[test]
    fn register_replaces_existing() {
        let mut companion = Companion::new();
        companion.register(
            "total_return",
            CompanionMethod::new(&[], |_| Ok(MetricValue::Scalar(1.0))),
        );
        companion.register(
            "total_return",
            CompanionMethod::new(&[], |_| Ok(MetricValue::Scalar(2.0))),
        );

        assert_eq!(companion.len(), 1);
        let method = companion.resolve("total_return").expect("resolve");
        let result = method.invoke(&Kwargs::new()).expect("invoke");
        assert_eq!(result, MetricValue::Scalar(2.0));
    }

    #[test]
    fn declared_params_are_a_set() {
        let method = CompanionMethod::new(&["jitted", "risk_free", "jitted"], |_| {
            Ok(MetricValue::Scalar(0.0))
        });

        assert_eq!(method.params().len(), 2);
        assert!(method.params().contains("jitted"));
        assert!(method.params().contains("risk_free"));
    }

    #[test]
    fn invoke_passes_kwargs_through() {
        let method = CompanionMethod::new(&["window"], |kwargs| {
            let window = kwargs
                .get("window")
                .and_then(|v| v.as_float())
                .ok_or_else(|| FolioError::InvalidArgument {
                    name: "window".to_string(),
                    reason: "missing".to_string(),
                })?;
            Ok(MetricValue::Scalar(window))
        });

        let mut kwargs = Kwargs::new();
        kwargs.insert("window", crate::types::ArgValue::Int(30));

        let result = method.invoke(&kwargs).expect("invoke");
        assert_eq!(result, MetricValue::Scalar(30.0));
    }

    #[test]
    fn method_names_sorted() {
        let companion = Companion::new()
            .with_method("sortino_ratio", &[], |_| Ok(MetricValue::Scalar(0.0)))
            .with_method("calmar_ratio", &[], |_| Ok(MetricValue::Scalar(0.0)));

        let names: Vec<_> = companion.method_names().collect();
        assert_eq!(names, vec!["calmar_ratio", "sortino_ratio"]);
    }
}
