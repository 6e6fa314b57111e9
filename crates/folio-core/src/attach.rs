//! # Augmentation Driver
//!
//! One-shot builder turning a `MemberConfig` into an `AccessorSurface`
//! for a host class.
//!
//! Order of operations is fixed: the capability check runs exactly once,
//! before anything is attached; entries are then synthesized and attached
//! in configuration order. Any configuration-time failure returns `Err`
//! and no surface exists, so attachment is atomic. Entry-specific resolution
//! failures never surface here; they are deferred to the first call of the
//! affected member.

use crate::capability::{Capability, HostClass, ensure_capability};
use crate::config::MemberConfig;
use crate::synthesize::{CallArgs, SynthMethod, SynthProperty};
use crate::types::{FolioError, MetricValue, TargetName};
use std::collections::BTreeMap;

// =============================================================================
// SURFACE
// =============================================================================

/// One attached entry: the forwarding method and its sibling property.
pub struct SurfaceEntry<H: HostClass> {
    /// The forwarding method `get_<target>`.
    pub method: SynthMethod<H>,
    /// The read-only property `<target>`.
    pub property: SynthProperty,
}

/// The generated member surface of a host class.
///
/// Owned by the host type for its whole lifetime (typically in a
/// `static`/`OnceLock` initialized at startup); immutable once built.
/// Lookups go through a name index; iteration follows configuration
/// order.
pub struct AccessorSurface<H: HostClass> {
    entries: Vec<SurfaceEntry<H>>,
    index: BTreeMap<String, usize>,
}

impl<H: HostClass> std::fmt::Debug for SurfaceEntry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceEntry")
            .field("method", &self.method)
            .field("property", &self.property)
            .finish()
    }
}

impl<H: HostClass> std::fmt::Debug for AccessorSurface<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorSurface")
            .field("members", &self.member_names())
            .finish()
    }
}

impl<H: HostClass> AccessorSurface<H> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: BTreeMap::new(),
        }
    }

    /// Look up the forwarding method for a target.
    #[must_use]
    pub fn method(&self, target: &str) -> Option<&SynthMethod<H>> {
        self.index.get(target).map(|&i| &self.entries[i].method)
    }

    /// Look up the property for a target.
    #[must_use]
    pub fn property(&self, target: &str) -> Option<&SynthProperty> {
        self.index.get(target).map(|&i| &self.entries[i].property)
    }

    /// Invoke the forwarding method for a target on a host instance.
    pub fn call(&self, target: &str, host: &H, args: &CallArgs) -> Result<MetricValue, FolioError> {
        let method = self
            .method(target)
            .ok_or_else(|| FolioError::UnknownTarget(target.to_string()))?;
        method.call(host, args)
    }

    /// Read the property for a target on a host instance.
    ///
    /// This is the property getter: the sibling method called with all
    /// defaults. By construction it cannot diverge from
    /// `call(target, host, &CallArgs::default())`.
    pub fn value(&self, target: &str, host: &H) -> Result<MetricValue, FolioError> {
        self.call(target, host, &CallArgs::default())
    }

    /// Check whether a target has attached members.
    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.index.contains_key(target)
    }

    /// Number of attached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the surface has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &SurfaceEntry<H>> {
        self.entries.iter()
    }

    /// All generated member names in configuration order, method before
    /// property per entry: `get_<t1>, <t1>, get_<t2>, <t2>, ...`.
    #[must_use]
    pub fn member_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            names.push(entry.method.name());
            names.push(entry.property.name());
        }
        names
    }
}

// =============================================================================
// DRIVER
// =============================================================================

/// Build the accessor surface for host class `H` from a configuration.
///
/// Validates the `ReturnsAccessor` capability once, then per entry in
/// order: validates the target identifier, rejects duplicate targets and
/// collisions with host-declared members (both the `<target>` and
/// `get_<target>` forms), and synthesizes a method plus a property.
///
/// On any error, zero members are attached.
pub fn attach_returns_members<H: HostClass>(
    config: &MemberConfig,
) -> Result<AccessorSurface<H>, FolioError> {
    ensure_capability::<H>(Capability::ReturnsAccessor)?;

    let mut surface = AccessorSurface::with_capacity(config.len());
    for (target, entry) in config.iter() {
        let target = TargetName::new(target)?;
        if surface.index.contains_key(target.as_str()) {
            return Err(FolioError::DuplicateTarget(target.as_str().to_string()));
        }

        let method = SynthMethod::synthesize(target.clone(), entry)?;
        for member in [target.as_str(), method.name()] {
            if H::MEMBERS.contains(&member) {
                return Err(FolioError::MemberCollision {
                    host: H::NAME,
                    member: member.to_string(),
                });
            }
        }
        let property = SynthProperty::synthesize::<H>(target.clone());

        surface
            .index
            .insert(target.as_str().to_string(), surface.entries.len());
        surface.entries.push(SurfaceEntry { method, property });
    }

    Ok(surface)
}

// =============================================================================
// TESTS
// =============================================================================
