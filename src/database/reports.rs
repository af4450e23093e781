use anyhow::{Context, Result};
use log::info;

use super::connection::DbConn;
use super::models::{AnalysisRun, RunMetadata};
use super::{results, runs};
use crate::pipeline::AnalysisReport;

/// Persist a run and all its rows in one transaction
pub fn save_report(
    conn: &mut DbConn,
    metadata: &RunMetadata,
    report: &AnalysisReport,
) -> Result<AnalysisRun> {
    let tx = conn.transaction().context("Failed to start transaction")?;

    let run = runs::insert_run(&tx, metadata, &report.diagnostics)?;
    for band in &report.bands {
        results::insert_band_result(&tx, run.id, band.aggregate.opponents, &band.performance)?;
    }
    if let Some(overall) = &report.overall {
        results::insert_band_result(&tx, run.id, report.opponents.len(), overall)?;
    }
    for opponent in &report.opponents {
        results::insert_opponent_result(&tx, run.id, opponent)?;
    }

    tx.commit().context("Failed to commit analysis run")?;
    info!(
        "Saved run {} ({} bands, {} opponents)",
        run.id,
        report.bands.len(),
        report.opponents.len()
    );
    Ok(run)
}
