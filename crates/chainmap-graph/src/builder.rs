//! Chain discovery: walks signature pairings outward from the home system.

use std::collections::BTreeSet;

use chainmap_core::errors::ErrorInfo;
use chainmap_core::{ChainError, MapConnection, MapSnapshot, MapSystem, Signature, WormholeLink};
use tracing::warn;

/// Source system IDs below this floor are placeholders or malformed records.
const MIN_VALID_SYSTEM_ID: i64 = 10000;

/// Why a wormhole link was dropped without being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// An endpoint signature has no resolvable system yet. Half-scanned
    /// links are expected in normal source data.
    UnresolvedEndpoint,
}

/// Outcome of resolving a wormhole link into a map connection.
///
/// Routine data gaps (`Skip`) are kept apart from genuine defects, which
/// surface as [`ChainError`] so callers never need to guess which is which.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkResolution {
    /// Both endpoints resolved; the connection can join the snapshot.
    Ready(MapConnection),
    /// The link is structurally incomplete and is dropped silently.
    Skip(SkipReason),
}

/// Builds the chain snapshot reachable from `home_system_id`.
///
/// Iterative depth-first traversal over signature pairings with a visited
/// set keyed by the source's string system IDs, so cyclic topologies
/// terminate and each system is visited at most once. Traversal follows the
/// input order of signatures and links, which makes the output deterministic
/// for a given fetch. Malformed records are logged and skipped; they never
/// abort the build.
pub fn build_from_home(
    home_system_id: i64,
    signatures: &[Signature],
    links: &[WormholeLink],
) -> MapSnapshot {
    let mut snapshot = MapSnapshot::default();
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut stack = vec![home_system_id.to_string()];

    while let Some(system_key) = stack.pop() {
        if !visited.insert(system_key.clone()) {
            continue;
        }

        let local = signatures_for_system(&system_key, signatures);
        let touching = links_touching(&local, links);

        // One node per system, synthesized from the first signature seen.
        if let Some(first) = local.first() {
            match system_from_signature(first) {
                Ok(system) if system.solar_system_id >= MIN_VALID_SYSTEM_ID => {
                    snapshot.systems.push(system);
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(signature = %first.id, error = %err, "skipping system derived from signature");
                }
            }
        }

        let mut next_hops: Vec<String> = Vec::new();
        for link in touching {
            match connection_from_link(link, signatures) {
                Ok(LinkResolution::Ready(connection)) => {
                    snapshot.connections.push(connection);
                    if let Some(hop) = next_hop(link, &local, signatures) {
                        if !visited.contains(&hop) {
                            next_hops.push(hop);
                        }
                    }
                }
                Ok(LinkResolution::Skip(_)) => {}
                Err(err) => {
                    warn!(link = %link.id, error = %err, "skipping connection derived from wormhole link");
                }
            }
        }
        // Reversed so the stack pops hops in link order.
        for hop in next_hops.into_iter().rev() {
            stack.push(hop);
        }
    }

    snapshot
}

/// Synthesizes a map system from a source signature.
///
/// System IDs shorter than five characters or unparsable as an integer are
/// malformed source data and reported as a build error.
pub fn system_from_signature(signature: &Signature) -> Result<MapSystem, ChainError> {
    let solar_system_id = parse_system_id(&signature.system_id)?;
    Ok(MapSystem::new(solar_system_id))
}

/// Resolves a wormhole link into a map connection.
///
/// A link whose endpoint signatures exist but have no resolved system yet is
/// a [`LinkResolution::Skip`]; a link referencing a missing signature or an
/// unparsable system ID is a build error.
pub fn connection_from_link(
    link: &WormholeLink,
    signatures: &[Signature],
) -> Result<LinkResolution, ChainError> {
    let source = find_signature(&link.initial_signature_id, signatures).ok_or_else(|| {
        build_error("missing-signature", "link endpoint signature not found")
            .with_context("link", &link.id)
            .with_context("signature", &link.initial_signature_id)
    })?;
    if source.system_id.len() < 5 {
        return Ok(LinkResolution::Skip(SkipReason::UnresolvedEndpoint));
    }
    let source_system = parse_system_id(&source.system_id)?;

    let target = find_signature(&link.secondary_signature_id, signatures).ok_or_else(|| {
        build_error("missing-signature", "link endpoint signature not found")
            .with_context("link", &link.id)
            .with_context("signature", &link.secondary_signature_id)
    })?;
    if target.system_id.len() < 5 {
        return Ok(LinkResolution::Skip(SkipReason::UnresolvedEndpoint));
    }
    let target_system = parse_system_id(&target.system_id)?;

    Ok(LinkResolution::Ready(MapConnection::new(
        source_system,
        target_system,
    )))
}

fn parse_system_id(raw: &str) -> Result<i64, ChainError> {
    if raw.len() < 5 {
        return Err(build_error("invalid-system-id", "system ID too short")
            .with_context("system_id", raw));
    }
    raw.parse::<i64>().map_err(|_| {
        build_error("unparsable-system-id", "system ID is not an integer")
            .with_context("system_id", raw)
    })
}

fn signatures_for_system<'a>(system_key: &str, signatures: &'a [Signature]) -> Vec<&'a Signature> {
    signatures
        .iter()
        .filter(|sig| sig.system_id == system_key)
        .collect()
}

/// Links where either end belongs to the given local signatures, in local
/// signature order then link order. First match wins downstream.
fn links_touching<'a>(local: &[&Signature], links: &'a [WormholeLink]) -> Vec<&'a WormholeLink> {
    let mut touching = Vec::new();
    for sig in local {
        for link in links {
            if sig.id == link.initial_signature_id || sig.id == link.secondary_signature_id {
                touching.push(link);
            }
        }
    }
    touching
}

fn find_signature<'a>(id: &str, signatures: &'a [Signature]) -> Option<&'a Signature> {
    signatures.iter().find(|sig| sig.id == id)
}

/// Determines the far-side system of a link relative to the current system,
/// if it is a distinct system worth traversing into.
fn next_hop(link: &WormholeLink, local: &[&Signature], signatures: &[Signature]) -> Option<String> {
    let other_id = local.iter().find_map(|sig| {
        if sig.id == link.initial_signature_id {
            Some(link.secondary_signature_id.as_str())
        } else if sig.id == link.secondary_signature_id {
            Some(link.initial_signature_id.as_str())
        } else {
            None
        }
    })?;
    let other = find_signature(other_id, signatures)?;
    if other.system_id.is_empty() || other.system_id == "0" {
        return None;
    }
    Some(other.system_id.clone())
}

fn build_error(code: &str, message: &str) -> ChainError {
    ChainError::Build(ErrorInfo::new(code, message))
}

trait ContextExt {
    fn with_context(self, key: &str, value: &str) -> ChainError;
}

impl ContextExt for ChainError {
    fn with_context(self, key: &str, value: &str) -> ChainError {
        match self {
            ChainError::Build(info) => ChainError::Build(info.with_context(key, value)),
            other => other,
        }
    }
}
