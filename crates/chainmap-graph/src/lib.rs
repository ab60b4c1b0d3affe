#![deny(missing_docs)]

//! Deterministic topology reconciliation engine for wormhole chain maps.
//!
//! The pipeline runs in four stages, each depending only on the previous
//! one: discovery ([`build_from_home`]), canonicalization ([`dedup`]), tree
//! layout ([`layout`]), and reconciliation against the previously published
//! snapshot ([`has_changes`] / [`compute_deletions`]). Every stage is pure,
//! synchronous computation over in-memory values.

mod builder;
mod dedup;
mod diff;
mod layout;

pub use builder::{
    build_from_home, connection_from_link, system_from_signature, LinkResolution, SkipReason,
};
pub use dedup::dedup;
pub use diff::{compute_deletions, has_changes, protected_set, Deletions};
pub use layout::layout;
