//! Sync cycle orchestration and the long-running poll loop.

use std::time::{Duration, Instant};

use chainmap_core::{ChainError, MapSnapshot};
use chainmap_graph::{build_from_home, compute_deletions, dedup, has_changes, layout};
use tracing::{info, warn};

use crate::clients::{ChainSource, MapTarget, SubmitSummary};
use crate::config::SyncConfig;

/// How one sync cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Changes were published; deletions ran first, then the submission.
    Published {
        /// Counters reported by the target for the submission.
        summary: SubmitSummary,
        /// Systems removed before submitting.
        deleted_systems: usize,
        /// Connections removed before submitting.
        deleted_connections: usize,
    },
    /// The fresh build matches the published map; nothing was written.
    NoChanges,
    /// The skip-guard system is present on the map; writes were suppressed.
    SkipGuardActive,
    /// Dry run: the built snapshot is returned instead of being published.
    DryRun(Box<MapSnapshot>),
}

/// Runs one fetch-build-reconcile-publish cycle.
///
/// The engine stages run in order: discovery, dedup, layout, then diff
/// against the snapshot read back from the target. Deletion and submission
/// are two independent calls; a failure between them is corrected by the
/// next successful cycle.
pub async fn run_cycle<S, T>(
    source: &S,
    target: &T,
    config: &SyncConfig,
    dry_run: bool,
) -> Result<CycleOutcome, ChainError>
where
    S: ChainSource + Sync,
    T: MapTarget + Sync,
{
    let links = source.wormhole_links().await?;
    let signatures = source.signatures().await?;
    info!(
        links = links.len(),
        signatures = signatures.len(),
        "fetched source records"
    );

    let built = build_from_home(config.home_system_id, &signatures, &links);
    let fresh = layout(
        dedup(built),
        config.home_system_id,
        config.position_x_separation,
        config.position_y_separation,
    );
    info!(
        systems = fresh.systems.len(),
        connections = fresh.connections.len(),
        "built chain snapshot"
    );

    if dry_run {
        return Ok(CycleOutcome::DryRun(Box::new(fresh)));
    }

    let current = target.current_map().await?;

    if let Some(guard) = config.skip_guard_system_id {
        if current.contains_system(guard) {
            info!(guard, "skip-guard system present on map; not writing");
            return Ok(CycleOutcome::SkipGuardActive);
        }
    }

    if !has_changes(&current, &fresh) {
        return Ok(CycleOutcome::NoChanges);
    }

    let deletions = compute_deletions(&current, &fresh);
    if !deletions.is_empty() {
        info!(
            systems = deletions.system_ids.len(),
            connections = deletions.connection_ids.len(),
            "deleting stale map entries"
        );
        target.delete(&deletions).await?;
    }

    let summary = target.submit(&fresh).await?;
    info!(
        systems_created = summary.systems.created,
        systems_updated = summary.systems.updated,
        connections_created = summary.connections.created,
        connections_updated = summary.connections.updated,
        "published snapshot"
    );

    Ok(CycleOutcome::Published {
        summary,
        deleted_systems: deletions.system_ids.len(),
        deleted_connections: deletions.connection_ids.len(),
    })
}

/// Logs or prints the outcome of a cycle.
pub fn report_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Published { .. } => {}
        CycleOutcome::NoChanges => info!("no changes detected; map left untouched"),
        CycleOutcome::SkipGuardActive => {}
        CycleOutcome::DryRun(snapshot) => {
            match serde_json::to_string_pretty(snapshot.as_ref()) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => warn!(error = %err, "failed to render dry-run snapshot"),
            }
        }
    }
}

/// Runs sync cycles until a shutdown signal arrives.
///
/// A failed cycle is logged and the loop moves on to the next scheduled
/// cycle; only cancellation terminates the loop. Cancellation is observed
/// while sleeping between cycles.
pub async fn run_loop<S, T>(source: &S, target: &T, config: &SyncConfig, dry_run: bool)
where
    S: ChainSource + Sync,
    T: MapTarget + Sync,
{
    let interval = Duration::from_secs(config.poll_interval_secs);
    info!(interval_secs = config.poll_interval_secs, "starting sync loop");

    loop {
        let started = Instant::now();
        match run_cycle(source, target, config, dry_run).await {
            Ok(outcome) => report_outcome(&outcome),
            Err(err) => warn!(error = %err, "sync cycle failed; will retry next cycle"),
        }
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "cycle finished; sleeping"
        );

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }
}
