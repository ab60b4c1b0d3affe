//! Connectivity diagnostics for both configured services.

use chainmap_core::ChainError;
use serde::Serialize;
use tracing::info;

use crate::clients::{ChainSource, MapTarget};
use crate::config::SyncConfig;

/// Outcome of one diagnostic probe.
#[derive(Debug, Serialize)]
pub struct DoctorCheck {
    /// Probe name, stable across releases.
    pub name: String,
    /// Whether the probe succeeded.
    pub ok: bool,
    /// Human-readable result or error detail.
    pub detail: String,
}

/// Aggregate diagnostic report.
#[derive(Debug, Serialize)]
pub struct DoctorReport {
    /// `"ok"` when every check passed, `"failed"` otherwise.
    pub status: String,
    /// Individual probe outcomes, in execution order.
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    /// True when every probe passed.
    pub fn healthy(&self) -> bool {
        self.status == "ok"
    }
}

/// Probes the source inventory and the target map with live reads.
///
/// Both probes run even if the first fails, so one report covers every
/// misconfigured credential at once.
pub async fn diagnose<S, T>(source: &S, target: &T, config: &SyncConfig) -> DoctorReport
where
    S: ChainSource + Sync,
    T: MapTarget + Sync,
{
    let mut checks = Vec::new();

    checks.push(match source.signatures().await {
        Ok(signatures) => check_ok(
            "source-signatures",
            &format!("fetched {} signature records", signatures.len()),
        ),
        Err(err) => check_failed("source-signatures", &err),
    });

    checks.push(match source.wormhole_links().await {
        Ok(links) => check_ok(
            "source-wormholes",
            &format!("fetched {} wormhole records", links.len()),
        ),
        Err(err) => check_failed("source-wormholes", &err),
    });

    checks.push(match target.current_map().await {
        Ok(snapshot) => {
            let home_present = snapshot.contains_system(config.home_system_id);
            check_ok(
                "target-map",
                &format!(
                    "read {} systems; home {} {}",
                    snapshot.systems.len(),
                    config.home_system_id,
                    if home_present { "present" } else { "absent" }
                ),
            )
        }
        Err(err) => check_failed("target-map", &err),
    });

    let status = if checks.iter().all(|check| check.ok) {
        "ok"
    } else {
        "failed"
    };
    info!(status, "doctor probes complete");
    DoctorReport {
        status: status.to_string(),
        checks,
    }
}

fn check_ok(name: &str, detail: &str) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        ok: true,
        detail: detail.to_string(),
    }
}

fn check_failed(name: &str, err: &ChainError) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        ok: false,
        detail: err.to_string(),
    }
}
