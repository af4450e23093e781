use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{AnalysisRun, RunMetadata};
use crate::pipeline::Diagnostics;

const RUN_COLUMNS: &str = "id, player, since, until, min_opp_rating, use_reference_bands, use_two_year_average, tournament_policy, games_received, games_used, unique_opponents, resolved_opponents, fallback_opponents, averaged_opponents, skipped_rows, ingestion_skipped, created_at";

pub fn insert_run(
    conn: &Connection,
    metadata: &RunMetadata,
    diagnostics: &Diagnostics,
) -> Result<AnalysisRun> {
    let sql = format!(
        "INSERT INTO analysis_runs (player, since, until, min_opp_rating, use_reference_bands, use_two_year_average, tournament_policy, games_received, games_used, unique_opponents, resolved_opponents, fallback_opponents, averaged_opponents, skipped_rows, ingestion_skipped, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16) RETURNING {}",
        RUN_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            metadata.player,
            metadata.since,
            metadata.until,
            metadata.min_opp_rating,
            metadata.use_reference_bands,
            metadata.use_two_year_average,
            metadata.tournament_policy,
            diagnostics.games_received as i64,
            diagnostics.games_used() as i64,
            diagnostics.unique_opponents as i64,
            diagnostics.resolved_opponents as i64,
            diagnostics.fallback_opponents as i64,
            diagnostics.averaged_opponents as i64,
            diagnostics.skipped_rows as i64,
            diagnostics.ingestion_skipped as i64,
            Utc::now()
        ],
        parse_run_row,
    )
    .context("Failed to insert analysis run")
}

pub fn latest_for_player(conn: &Connection, player: &str) -> Result<Option<AnalysisRun>> {
    let sql = format!(
        "SELECT {} FROM analysis_runs WHERE player = ?1 ORDER BY id DESC LIMIT 1",
        RUN_COLUMNS
    );

    conn.query_row(&sql, params![player.to_lowercase()], parse_run_row)
        .optional()
        .context("Failed to load latest analysis run")
}

pub fn list_runs(conn: &Connection) -> Result<Vec<AnalysisRun>> {
    let sql = format!("SELECT {} FROM analysis_runs ORDER BY id", RUN_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_run_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_run_row(row: &rusqlite::Row) -> rusqlite::Result<AnalysisRun> {
    Ok(AnalysisRun {
        id: row.get(0)?,
        player: row.get(1)?,
        since: row.get(2)?,
        until: row.get(3)?,
        min_opp_rating: row.get(4)?,
        use_reference_bands: row.get(5)?,
        use_two_year_average: row.get(6)?,
        tournament_policy: row.get(7)?,
        games_received: row.get(8)?,
        games_used: row.get(9)?,
        unique_opponents: row.get(10)?,
        resolved_opponents: row.get(11)?,
        fallback_opponents: row.get(12)?,
        averaged_opponents: row.get(13)?,
        skipped_rows: row.get(14)?,
        ingestion_skipped: row.get(15)?,
        created_at: row.get(16)?,
    })
}
