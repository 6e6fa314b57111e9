//! # Capability Checking
//!
//! Structural precondition on the host class, validated exactly once per
//! augmentation and before any member is attached.
//!
//! The check is deliberately coarse: it confirms the host declares the
//! accessor capability at all, not that any particular configuration entry
//! resolves to a real method. Entry-level failures stay lazy (call-time).

use crate::companion::{AccessorRequest, Companion};
use crate::types::FolioError;
use serde::{Deserialize, Serialize};

// =============================================================================
// CAPABILITIES
// =============================================================================

/// An accessor family a host class can declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Return-based metrics (the family this engine delegates to).
    ReturnsAccessor,
    /// Order records.
    OrdersAccessor,
    /// Trade records.
    TradesAccessor,
    /// Drawdown records.
    DrawdownsAccessor,
}

// =============================================================================
// HOST CONTRACT
// =============================================================================

/// The base contract a host class must satisfy before augmentation.
///
/// `NAME` feeds qualified member names, `CAPABILITIES` is what the
/// capability checker reads, and `MEMBERS` lists the host's pre-existing
/// member names so the driver can fail fast on collisions.
///
/// `returns_accessor` is the companion factory: invoked on every
/// synthesized-member call, it builds a fresh accessor for the request.
/// Construction may be expensive; the engine never caches it.
pub trait HostClass {
    /// Host type name, used in qualified member names and error messages.
    const NAME: &'static str;

    /// Accessor families this host declares support for.
    const CAPABILITIES: &'static [Capability];

    /// Pre-existing member names on the host. Generated members must not
    /// collide with these.
    const MEMBERS: &'static [&'static str] = &[];

    /// Build a returns accessor for this instance.
    fn returns_accessor(&self, request: &AccessorRequest) -> Result<Companion, FolioError>;
}

/// Confirm that a host class declares a required capability.
///
/// Returns `FolioError::MissingCapability` otherwise. Run once per
/// augmentation, never per entry.
pub fn ensure_capability<H: HostClass>(capability: Capability) -> Result<(), FolioError> {
    if H::CAPABILITIES.contains(&capability) {
        Ok(())
    } else {
        Err(FolioError::MissingCapability {
            host: H::NAME,
            capability,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
