use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sigid;

/// A raw signature observation fetched from the source inventory.
///
/// Signatures are immutable snapshots; one fetch cycle produces a fresh list
/// and the previous list is discarded. Field names follow the source wire
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Signature {
    /// Opaque identifier, unique within one source fetch.
    #[serde(default)]
    pub id: String,
    /// Six character site code such as `abc123`, or the `???` placeholder.
    #[serde(rename = "signatureID", default)]
    pub signature_code: Option<String>,
    /// String form of the solar system the signature was scanned in.
    /// May be empty when the source has not resolved the system yet.
    #[serde(rename = "systemID", default)]
    pub system_id: String,
    /// Free text category: `wormhole`, `gas`, `data`, `relic`, `combat`,
    /// `ore`, or `unknown`.
    #[serde(rename = "type", default)]
    pub type_tag: String,
    /// Display name recorded by the scanner.
    #[serde(default)]
    pub name: String,
    /// Identifier of the character that created the record.
    #[serde(rename = "createdByID", default)]
    pub created_by_id: String,
}

/// Pairs the two signature observations that form one traversable wormhole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WormholeLink {
    /// Opaque link identifier assigned by the source.
    #[serde(default)]
    pub id: String,
    /// Signature on the side the wormhole was first scanned from.
    #[serde(rename = "initialID", default)]
    pub initial_signature_id: String,
    /// Signature on the far side, once it has been paired.
    #[serde(rename = "secondaryID", default)]
    pub secondary_signature_id: String,
}

/// A star system node on the target map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapSystem {
    /// Natural key of the system. At most one node per ID in any snapshot.
    pub solar_system_id: i64,
    /// Whether the system is shown on the map.
    #[serde(default)]
    pub visible: bool,
    /// Operator applied lock. Authoritative only from the target map; the
    /// locked component is exempt from deletion during reconciliation.
    #[serde(default)]
    pub locked: bool,
    /// Horizontal layout coordinate.
    #[serde(default)]
    pub position_x: f64,
    /// Vertical layout coordinate.
    #[serde(default)]
    pub position_y: f64,
}

impl MapSystem {
    /// Creates a visible, unlocked system at the origin.
    pub fn new(solar_system_id: i64) -> Self {
        Self {
            solar_system_id,
            visible: true,
            locked: false,
            position_x: 0.0,
            position_y: 0.0,
        }
    }
}

/// An undirected connection between two map systems.
///
/// Endpoint order carries no meaning beyond tie breaking; identity is the
/// unordered pair from [`MapConnection::pair`]. The opaque `id` is assigned
/// by the target map and is only needed when deleting an existing connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MapConnection {
    /// Target-assigned identifier, empty for freshly built connections.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// One endpoint system ID.
    pub solar_system_source: i64,
    /// The other endpoint system ID.
    pub solar_system_target: i64,
}

impl MapConnection {
    /// Creates a connection between two systems with no target identity yet.
    pub fn new(solar_system_source: i64, solar_system_target: i64) -> Self {
        Self {
            id: String::new(),
            solar_system_source,
            solar_system_target,
        }
    }

    /// Returns the normalized unordered endpoint pair, smaller ID first.
    pub fn pair(&self) -> (i64, i64) {
        pair_key(self.solar_system_source, self.solar_system_target)
    }

    /// A connection with a zero endpoint or identical endpoints is
    /// structurally invalid and must be discarded.
    pub fn is_valid(&self) -> bool {
        self.solar_system_source != 0
            && self.solar_system_target != 0
            && self.solar_system_source != self.solar_system_target
    }
}

/// Normalizes an endpoint pair so connection identity is direction free.
pub fn pair_key(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One complete snapshot of systems and connections.
///
/// Snapshots are value objects: either freshly built from source records or
/// read back from the target map, produced and replaced every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapSnapshot {
    /// System nodes in the snapshot.
    #[serde(default)]
    pub systems: Vec<MapSystem>,
    /// Connections in the snapshot.
    #[serde(default)]
    pub connections: Vec<MapConnection>,
}

impl MapSnapshot {
    /// Returns the set of system IDs present in the snapshot.
    pub fn system_ids(&self) -> BTreeSet<i64> {
        self.systems.iter().map(|s| s.solar_system_id).collect()
    }

    /// Returns the set of normalized connection endpoint pairs.
    pub fn connection_pairs(&self) -> BTreeSet<(i64, i64)> {
        self.connections.iter().map(MapConnection::pair).collect()
    }

    /// Looks up a system by its solar system ID.
    pub fn system(&self, solar_system_id: i64) -> Option<&MapSystem> {
        self.systems
            .iter()
            .find(|s| s.solar_system_id == solar_system_id)
    }

    /// Returns whether the snapshot contains the given system.
    pub fn contains_system(&self, solar_system_id: i64) -> bool {
        self.system(solar_system_id).is_some()
    }
}

/// A signature record in the target map's own format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MappedSignature {
    /// Character that created the source record.
    pub character_eve_id: String,
    /// Normalized site code (`AAA-999`), empty when unresolvable.
    pub eve_id: String,
    /// Signature category carried over from the source.
    pub group: String,
    /// Fixed record kind expected by the target.
    pub kind: String,
    /// Display name carried over from the source.
    pub name: String,
    /// Solar system the signature belongs to, 0 when unparsable.
    pub solar_system_id: i64,
}

impl MappedSignature {
    /// Record kind the target map expects for scanned signatures.
    pub const KIND: &'static str = "Cosmic Signature";

    /// Converts a source signature into the target map's format.
    ///
    /// Unparsable system IDs map to 0 and unresolvable site codes map to an
    /// empty `eve_id`; neither is an error at this layer.
    pub fn from_source(signature: &Signature) -> Self {
        let solar_system_id = signature.system_id.parse::<i64>().unwrap_or(0);
        let eve_id = sigid::normalize(signature.signature_code.as_deref()).unwrap_or_default();
        Self {
            character_eve_id: signature.created_by_id.clone(),
            eve_id,
            group: signature.type_tag.clone(),
            kind: Self::KIND.to_string(),
            name: signature.name.clone(),
            solar_system_id,
        }
    }
}
