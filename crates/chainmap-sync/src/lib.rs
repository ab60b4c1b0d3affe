//! Long-running synchronizer between a signature inventory and a map
//! service.
//!
//! Each cycle fetches the raw signature and wormhole records, runs the
//! chain-building pipeline from `chainmap-graph`, diffs the result against
//! the published map, and reconciles the difference. The engine is written
//! against the [`clients::ChainSource`] and [`clients::MapTarget`] traits;
//! the binary wires in the HTTP implementations.

#![deny(missing_docs)]

pub mod clients;
pub mod config;
pub mod doctor;
pub mod sync;

pub use config::SyncConfig;
pub use sync::{run_cycle, run_loop, CycleOutcome};
