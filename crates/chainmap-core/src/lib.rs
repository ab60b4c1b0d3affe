#![deny(missing_docs)]

//! Core records and shared utilities for the chainmap sync engine.
//!
//! This crate defines the value types exchanged between the source signature
//! inventory and the target map, the signature-identifier normalizer, and the
//! structured error type used across the workspace.

pub mod errors;
pub mod sigid;
mod types;

pub use errors::{ChainError, ErrorInfo};
pub use types::{
    pair_key, MapConnection, MapSnapshot, MapSystem, MappedSignature, Signature, WormholeLink,
};
