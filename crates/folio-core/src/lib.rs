//! # folio-core
//!
//! The deterministic delegation engine for Folio - THE ENGINE.
//!
//! This crate builds accessor surfaces for portfolio-like host types: a
//! declarative configuration maps target member names to methods on a
//! returns accessor, and the engine generates one forwarding method plus
//! one default-argument property per entry. The real metric computation
//! lives on the accessor; the engine only validates, synthesizes, and
//! dispatches.
//!
//! ## One-Shot Augmentation
//!
//! A surface is built once per host class, typically at startup, and is
//! immutable afterwards:
//! 1. The host's `ReturnsAccessor` capability is checked exactly once.
//! 2. Entries attach in configuration order; any failure is atomic.
//! 3. Source-method resolution stays lazy: each call builds a fresh
//!    accessor and looks the method up by name, so missing methods fail
//!    on first use, never during augmentation.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network dependencies, no I/O
//! - Deterministic: BTreeMap for keyed state, insertion order where contractual
//! - Minimal: the engine never computes a metric itself

// =============================================================================
// MODULES
// =============================================================================

pub mod attach;
pub mod capability;
pub mod companion;
pub mod config;
pub mod introspect;
pub mod synthesize;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ArgValue, FolioError, Freq, GroupBy, JitOption, Kwargs, MetricValue, ReturnsSeries,
    SourceName, TargetName,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use attach::{AccessorSurface, SurfaceEntry, attach_returns_members};
pub use capability::{Capability, HostClass, ensure_capability};
pub use companion::{AccessorRequest, Companion, CompanionMethod};
pub use config::{MemberConfig, MemberEntry};
pub use introspect::JITTED_PARAM;
pub use synthesize::{CallArgs, SynthMethod, SynthProperty};
