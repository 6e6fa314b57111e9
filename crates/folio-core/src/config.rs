//! # Member Configuration
//!
//! Declarative configuration consumed by the augmentation driver.
//!
//! A `MemberConfig` is an ordered mapping from target name to entry:
//! - `source_name`: name of the accessor method backing the member.
//!   Defaults to the target name.
//! - `docstring`: member documentation. Defaults to a generated line
//!   naming the authoritative accessor method.
//!
//! Insertion order is contractual: the driver attaches members in the
//! order entries were declared. Serialization preserves that order, and
//! deserialization keeps whatever order the input format yields.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =============================================================================
// ENTRY
// =============================================================================

/// One configuration entry: how a single target member is backed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEntry {
    /// Accessor method name. `None` means "same as the target name".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    /// Member documentation override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

impl MemberEntry {
    /// Entry backed by the accessor method of the same name.
    #[must_use]
    pub fn same_name() -> Self {
        Self::default()
    }

    /// Entry backed by a differently named accessor method.
    #[must_use]
    pub fn renamed(source_name: impl Into<String>) -> Self {
        Self {
            source_name: Some(source_name.into()),
            docstring: None,
        }
    }

    /// Attach a docstring override to this entry.
    #[must_use]
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Ordered mapping from target name to `MemberEntry`.
///
/// The driver only reads it; captured values are copied out at synthesis
/// time, so mutating a configuration after augmentation cannot affect an
/// already-built surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberConfig {
    entries: Vec<(String, MemberEntry)>,
}

impl MemberConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a target backed by the accessor method of the same name.
    #[must_use]
    pub fn entry(self, target: impl Into<String>) -> Self {
        self.with_entry(target, MemberEntry::same_name())
    }

    /// Append a target backed by a differently named accessor method.
    #[must_use]
    pub fn renamed(self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.with_entry(target, MemberEntry::renamed(source))
    }

    /// Append a target with a full entry.
    ///
    /// Duplicate targets are accepted here and rejected by the driver,
    /// which is where structural validation lives.
    #[must_use]
    pub fn with_entry(mut self, target: impl Into<String>, entry: MemberEntry) -> Self {
        self.entries.push((target.into(), entry));
        self
    }

    /// Look up the first entry under a target name.
    #[must_use]
    pub fn get(&self, target: &str) -> Option<&MemberEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == target)
            .map(|(_, entry)| entry)
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MemberEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the configuration has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// SERDE (ordered map form)
// =============================================================================

impl Serialize for MemberConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (target, entry) in &self.entries {
            map.serialize_entry(target, entry)?;
        }
        map.end()
    }
}

struct MemberConfigVisitor;

impl<'de> Visitor<'de> for MemberConfigVisitor {
    type Value = MemberConfig;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of target names to member entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((target, entry)) = map.next_entry::<String, MemberEntry>()? {
            entries.push((target, entry));
        }
        Ok(MemberConfig { entries })
    }
}

impl<'de> Deserialize<'de> for MemberConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MemberConfigVisitor)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_declaration_order() {
        let config = MemberConfig::new()
            .entry("total_return")
            .entry("sharpe_ratio")
            .renamed("alpha", "jensens_alpha");

        let targets: Vec<_> = config.iter().map(|(name, _)| name).collect();
        assert_eq!(targets, vec!["total_return", "sharpe_ratio", "alpha"]);
    }

    #[test]
    fn renamed_entry_carries_source() {
        let config = MemberConfig::new().renamed("alpha", "jensens_alpha");

        let entry = config.get("alpha").expect("entry");
        assert_eq!(entry.source_name.as_deref(), Some("jensens_alpha"));
        assert_eq!(entry.docstring, None);
    }

    #[test]
    fn docstring_override() {
        let entry = MemberEntry::renamed("jensens_alpha").with_docstring("Alpha.");
        assert_eq!(entry.docstring.as_deref(), Some("Alpha."));
    }

    #[test]
    fn get_returns_none_for_missing_target() {
        let config = MemberConfig::new().entry("sharpe_ratio");
        assert!(config.get("sortino_ratio").is_none());
    }

    #[test]
    fn serialize_roundtrip_keeps_entries() {
        let config = MemberConfig::new()
            .entry("sharpe_ratio")
            .renamed("alpha", "jensens_alpha");

        let restored = toml_roundtrip(&config);
        assert_eq!(restored, config);
    }

    /// Round-trip through the toml value model (the config carrier used in
    /// integration tests).
    fn toml_roundtrip(config: &MemberConfig) -> MemberConfig {
        let text = toml::to_string(config).expect("serialize");
        toml::from_str(&text).expect("deserialize")
    }

    #[test]
    fn deserialize_preserves_document_order() {
        // Document order is deliberately non-alphabetical; attachment
        // order follows it, so a sorted carrier would be a contract break.
        let config: MemberConfig = toml::from_str(
            r#"
            [total_return]

            [sharpe_ratio]

            [calmar_ratio]

            [annualized_return]
            "#,
        )
        .expect("parse");

        let targets: Vec<_> = config.iter().map(|(name, _)| name).collect();
        assert_eq!(
            targets,
            vec![
                "total_return",
                "sharpe_ratio",
                "calmar_ratio",
                "annualized_return",
            ]
        );
    }

    #[test]
    fn deserialize_from_toml_defaults() {
        let config: MemberConfig = toml::from_str(
            r#"
            [sharpe_ratio]

            [alpha]
            source_name = "jensens_alpha"
            docstring = "Alpha."
            "#,
        )
        .expect("parse");

        assert_eq!(config.len(), 2);
        assert_eq!(config.get("sharpe_ratio"), Some(&MemberEntry::same_name()));

        let alpha = config.get("alpha").expect("entry");
        assert_eq!(alpha.source_name.as_deref(), Some("jensens_alpha"));
        assert_eq!(alpha.docstring.as_deref(), Some("Alpha."));
    }
}
