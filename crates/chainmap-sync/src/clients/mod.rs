//! Collaborator contracts and their HTTP implementations.
//!
//! The engine only sees the two traits below; the reqwest-backed clients
//! live in [`source`] and [`target`] and own the wire envelopes.

mod source;
mod target;

use async_trait::async_trait;
use chainmap_core::{ChainError, MapSnapshot, Signature, WormholeLink};
use chainmap_graph::Deletions;
use serde::Deserialize;

pub use source::HttpChainSource;
pub use target::HttpMapTarget;

/// Read-only access to the source signature inventory.
#[async_trait]
pub trait ChainSource {
    /// Fetches all wormhole link records visible under the configured mask.
    async fn wormhole_links(&self) -> Result<Vec<WormholeLink>, ChainError>;

    /// Fetches all signature records visible under the configured mask.
    async fn signatures(&self) -> Result<Vec<Signature>, ChainError>;
}

/// Read/write access to the target map.
#[async_trait]
pub trait MapTarget {
    /// Reads the currently published snapshot, including `locked` flags.
    async fn current_map(&self) -> Result<MapSnapshot, ChainError>;

    /// Deletes the given systems and connections from the map.
    async fn delete(&self, deletions: &Deletions) -> Result<(), ChainError>;

    /// Publishes a snapshot; the target upserts and reports counts.
    async fn submit(&self, snapshot: &MapSnapshot) -> Result<SubmitSummary, ChainError>;
}

/// Created/updated counters reported by the target for one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub struct SubmitCounts {
    /// Records newly created by the submission.
    #[serde(default)]
    pub created: u64,
    /// Records updated in place by the submission.
    #[serde(default)]
    pub updated: u64,
}

/// Outcome of one snapshot submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub struct SubmitSummary {
    /// Counters for system records.
    #[serde(default)]
    pub systems: SubmitCounts,
    /// Counters for connection records.
    #[serde(default)]
    pub connections: SubmitCounts,
}
