//! # Member Synthesis
//!
//! Builds the two member kinds attached per configuration entry:
//!
//! - `SynthMethod`: the forwarding method `get_<target>`. Captures its
//!   source name by value at synthesis time; resolves it on the accessor
//!   lazily, on every call.
//! - `SynthProperty`: the zero-argument read-only property `<target>`.
//!   Its value is always the sibling method called with all defaults; the
//!   surface routes the read through the method so the two cannot diverge.
//!
//! Synthesis itself cannot fail beyond name validation; entry-specific
//! resolution failures are deferred into call-time behavior.

use crate::capability::HostClass;
use crate::companion::AccessorRequest;
use crate::config::MemberEntry;
use crate::introspect;
use crate::types::{
    ArgValue, FolioError, Freq, GroupBy, JitOption, Kwargs, MetricValue, ReturnsSeries, SourceName,
    TargetName,
};
use std::marker::PhantomData;

// =============================================================================
// CALL ARGUMENTS
// =============================================================================

/// The fixed external signature of every synthesized method.
///
/// `Default` yields the all-defaults form the sibling property uses:
/// no grouping, no benchmark, no frequency overrides, portfolio
/// semantics, no execution-mode option, no extra arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    /// Grouping key forwarded to the accessor factory.
    pub group_by: Option<GroupBy>,
    /// Benchmark return series forwarded to the accessor factory.
    pub benchmark_rets: Option<ReturnsSeries>,
    /// Sampling frequency forwarded to the accessor factory.
    pub freq: Option<Freq>,
    /// Annualization frequency forwarded to the accessor factory.
    pub year_freq: Option<Freq>,
    /// `true` selects asset returns, `false` portfolio returns.
    pub use_asset_returns: bool,
    /// Execution-mode option, conditionally forwarded to the resolved method.
    pub jitted: Option<JitOption>,
    /// Open-ended named arguments passed through to the resolved method.
    pub extra: Kwargs,
}

impl CallArgs {
    /// All-defaults call arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grouping key.
    #[must_use]
    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    /// Set the benchmark return series.
    #[must_use]
    pub fn with_benchmark(mut self, benchmark_rets: ReturnsSeries) -> Self {
        self.benchmark_rets = Some(benchmark_rets);
        self
    }

    /// Set the sampling frequency.
    #[must_use]
    pub fn with_freq(mut self, freq: Freq) -> Self {
        self.freq = Some(freq);
        self
    }

    /// Set the annualization frequency.
    #[must_use]
    pub fn with_year_freq(mut self, year_freq: Freq) -> Self {
        self.year_freq = Some(year_freq);
        self
    }

    /// Select asset-returns semantics instead of portfolio semantics.
    #[must_use]
    pub fn with_asset_returns(mut self) -> Self {
        self.use_asset_returns = true;
        self
    }

    /// Set the execution-mode option.
    #[must_use]
    pub fn with_jitted(mut self, jitted: JitOption) -> Self {
        self.jitted = Some(jitted);
        self
    }

    /// Add an open-ended named argument.
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.extra.insert(name, value);
        self
    }

    /// The factory request carrying everything except the open-ended
    /// arguments.
    #[must_use]
    pub fn to_request(&self) -> AccessorRequest {
        AccessorRequest {
            group_by: self.group_by.clone(),
            benchmark_rets: self.benchmark_rets.clone(),
            freq: self.freq.clone(),
            year_freq: self.year_freq.clone(),
            use_asset_returns: self.use_asset_returns,
            jitted: self.jitted,
        }
    }
}

// =============================================================================
// SYNTHESIZED METHOD
// =============================================================================

/// A forwarding method `get_<target>` bound to a host class.
///
/// Holds the per-entry configuration as an explicit record: target,
/// source, member name, qualified name, docstring. All captured by value
/// at synthesis time, immune to later mutation of the configuration.
pub struct SynthMethod<H: HostClass> {
    target: TargetName,
    source: SourceName,
    name: String,
    qualname: String,
    doc: String,
    _host: PhantomData<fn(&H)>,
}

impl<H: HostClass> SynthMethod<H> {
    /// Build the method for one configuration entry.
    ///
    /// The source name defaults to the target name; the docstring defaults
    /// to a generated line naming the authoritative accessor method.
    pub(crate) fn synthesize(target: TargetName, entry: &MemberEntry) -> Result<Self, FolioError> {
        let source = match &entry.source_name {
            Some(source) => SourceName::new(source.clone())?,
            None => SourceName::from(target.clone()),
        };
        let doc = entry
            .docstring
            .clone()
            .unwrap_or_else(|| format!("See `{source}` on the returns accessor."));
        let name = format!("get_{target}");
        let qualname = format!("{}.{name}", H::NAME);

        Ok(Self {
            target,
            source,
            name,
            qualname,
            doc,
            _host: PhantomData,
        })
    }

    /// The target name this method was synthesized for.
    #[must_use]
    pub fn target(&self) -> &TargetName {
        &self.target
    }

    /// The accessor method name resolved at call time.
    #[must_use]
    pub fn source(&self) -> &SourceName {
        &self.source
    }

    /// The generated member name, `get_<target>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The qualified member name, `<Host>.get_<target>`.
    #[must_use]
    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    /// The member docstring.
    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Invoke the forwarding method on a host instance.
    ///
    /// Obtains a fresh accessor from the host's factory, resolves the
    /// source method by name (lazily, every call), forwards the caller's
    /// execution-mode option only if the resolved method declares the
    /// `jitted` parameter, and returns the method's result unchanged.
    pub fn call(&self, host: &H, args: &CallArgs) -> Result<MetricValue, FolioError> {
        let accessor = host.returns_accessor(&args.to_request())?;

        let method =
            accessor
                .resolve(self.source.as_str())
                .ok_or_else(|| FolioError::UnknownSourceMethod {
                    method: self.source.as_str().to_string(),
                    target: self.target.as_str().to_string(),
                })?;

        let mut kwargs = args.extra.clone();
        if introspect::accepts(method, introspect::JITTED_PARAM) {
            kwargs.insert(introspect::JITTED_PARAM, ArgValue::Jitted(args.jitted));
        }

        method.invoke(&kwargs)
    }
}

impl<H: HostClass> std::fmt::Debug for SynthMethod<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthMethod")
            .field("target", &self.target)
            .field("source", &self.source)
            .field("qualname", &self.qualname)
            .finish()
    }
}

// =============================================================================
// SYNTHESIZED PROPERTY
// =============================================================================

/// A zero-argument read-only property `<target>`.
///
/// Metadata only: the surface routes property reads through the sibling
/// method with `CallArgs::default()`, which keeps the invariant that a
/// property's value always equals the method called with all defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthProperty {
    target: TargetName,
    name: String,
    qualname: String,
    doc: String,
}

impl SynthProperty {
    /// Build the property for one configuration entry.
    ///
    /// The docstring is auto-generated from the sibling method's qualified
    /// name; it is not independently configurable.
    pub(crate) fn synthesize<H: HostClass>(target: TargetName) -> Self {
        let name = target.as_str().to_string();
        let qualname = format!("{}.{name}", H::NAME);
        let doc = format!("`{}.get_{name}` with default arguments.", H::NAME);

        Self {
            target,
            name,
            qualname,
            doc,
        }
    }

    /// The target name this property was synthesized for.
    #[must_use]
    pub fn target(&self) -> &TargetName {
        &self.target
    }

    /// The generated member name, `<target>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The qualified member name, `<Host>.<target>`.
    #[must_use]
    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    /// The auto-generated docstring.
    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::companion::Companion;

    /// Host whose accessor echoes what it received, for forwarding checks.
    struct Probe;

    impl HostClass for Probe {
        const NAME: &'static str = "Probe";
        const CAPABILITIES: &'static [Capability] = &[Capability::ReturnsAccessor];

        fn returns_accessor(
            &self,
            request: &AccessorRequest,
        ) -> Result<Companion, FolioError> {
            let use_asset = request.use_asset_returns;
            Ok(Companion::new()
                .with_method("echo_jitted", &["jitted"], |kwargs| {
                    let code = match kwargs.get("jitted").and_then(|v| v.as_jitted()) {
                        None => -2.0,
                        Some(None) => -1.0,
                        Some(Some(JitOption::Disabled)) => 0.0,
                        Some(Some(JitOption::Nopython)) => 1.0,
                        Some(Some(JitOption::Parallel)) => 2.0,
                    };
                    Ok(MetricValue::Scalar(code))
                })
                .with_method("plain", &["window"], move |kwargs| {
                    if kwargs.contains("jitted") {
                        return Err(FolioError::InvalidArgument {
                            name: "jitted".to_string(),
                            reason: "not a declared parameter".to_string(),
                        });
                    }
                    Ok(MetricValue::Scalar(if use_asset { 1.0 } else { 0.0 }))
                }))
        }
    }

    fn method_for(target: &str, entry: &MemberEntry) -> SynthMethod<Probe> {
        let target = TargetName::new(target).expect("valid target");
        SynthMethod::synthesize(target, entry).expect("synthesize")
    }

    #[test]
    fn source_defaults_to_target() {
        let method = method_for("plain", &MemberEntry::same_name());
        assert_eq!(method.source().as_str(), "plain");
        assert_eq!(method.name(), "get_plain");
        assert_eq!(method.qualname(), "Probe.get_plain");
    }

    #[test]
    fn default_docstring_names_source() {
        let method = method_for("alpha", &MemberEntry::renamed("jensens_alpha"));
        assert_eq!(method.doc(), "See `jensens_alpha` on the returns accessor.");
    }

    #[test]
    fn supplied_docstring_wins_exactly() {
        let entry = MemberEntry::renamed("jensens_alpha").with_docstring("Alpha.");
        let method = method_for("alpha", &entry);
        assert_eq!(method.doc(), "Alpha.");
    }

    #[test]
    fn invalid_source_name_rejected_at_synthesis() {
        let target = TargetName::new("alpha").expect("valid target");
        let entry = MemberEntry::renamed("not an identifier");
        assert!(SynthMethod::<Probe>::synthesize(target, &entry).is_err());
    }

    #[test]
    fn jitted_forwarded_when_declared() {
        let method = method_for("echo_jitted", &MemberEntry::same_name());

        let args = CallArgs::new().with_jitted(JitOption::Parallel);
        let result = method.call(&Probe, &args).expect("call");
        assert_eq!(result, MetricValue::Scalar(2.0));

        // Default option still forwarded as an explicit entry.
        let result = method.call(&Probe, &CallArgs::new()).expect("call");
        assert_eq!(result, MetricValue::Scalar(-1.0));
    }

    #[test]
    fn jitted_dropped_when_undeclared() {
        let method = method_for("plain", &MemberEntry::same_name());

        let args = CallArgs::new().with_jitted(JitOption::Nopython);
        let result = method.call(&Probe, &args).expect("call");
        assert_eq!(result, MetricValue::Scalar(0.0));
    }

    #[test]
    fn factory_sees_asset_selector() {
        let method = method_for("plain", &MemberEntry::same_name());

        let args = CallArgs::new().with_asset_returns();
        let result = method.call(&Probe, &args).expect("call");
        assert_eq!(result, MetricValue::Scalar(1.0));
    }

    #[test]
    fn unknown_source_fails_at_call_time() {
        let method = method_for("missing", &MemberEntry::same_name());

        let err = method.call(&Probe, &CallArgs::new()).expect_err("unknown source");
        assert!(matches!(
            err,
            FolioError::UnknownSourceMethod { method, target }
                if method == "missing" && target == "missing"
        ));
    }

    #[test]
    fn property_metadata() {
        let target = TargetName::new("sharpe_ratio").expect("valid target");
        let property = SynthProperty::synthesize::<Probe>(target);

        assert_eq!(property.name(), "sharpe_ratio");
        assert_eq!(property.qualname(), "Probe.sharpe_ratio");
        assert_eq!(property.doc(), "`Probe.get_sharpe_ratio` with default arguments.");
    }

    #[test]
    fn call_args_to_request_copies_fields() {
        let args = CallArgs::new()
            .with_group_by(GroupBy::new("sector"))
            .with_freq(Freq::new("d"))
            .with_year_freq(Freq::new("365d"))
            .with_benchmark(ReturnsSeries::new(vec![0.01, 0.02]))
            .with_jitted(JitOption::Disabled)
            .with_arg("window", ArgValue::Int(30));

        let request = args.to_request();
        assert_eq!(request.group_by, Some(GroupBy::new("sector")));
        assert_eq!(request.freq, Some(Freq::new("d")));
        assert_eq!(request.year_freq, Some(Freq::new("365d")));
        assert_eq!(request.benchmark_rets, Some(ReturnsSeries::new(vec![0.01, 0.02])));
        assert_eq!(request.jitted, Some(JitOption::Disabled));
        assert!(!request.use_asset_returns);
    }
}
