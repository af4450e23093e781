use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::models::{BandResultRow, OpponentResultRow};
use crate::pipeline::OpponentResult;
use crate::rating::PerformanceResult;

pub fn insert_band_result(
    conn: &Connection,
    run_id: i64,
    opponents: usize,
    result: &PerformanceResult,
) -> Result<()> {
    let sql = "INSERT INTO band_results (run_id, label, opponents, games, score, avg_opponent_rating, performance_rating, expected_score, z_score, ci_low, ci_high) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

    conn.execute(
        sql,
        params![
            run_id,
            result.label,
            opponents as i64,
            result.games as i64,
            result.score,
            result.avg_opponent_rating,
            result.performance_rating,
            result.expected_score,
            result.z_score,
            result.confidence_interval.low,
            result.confidence_interval.high
        ],
    )
    .with_context(|| format!("Failed to insert band result {}", result.label))?;
    Ok(())
}

pub fn insert_opponent_result(conn: &Connection, run_id: i64, opponent: &OpponentResult) -> Result<()> {
    let sql = "INSERT INTO opponent_results (run_id, identifier, display_name, reference_rating, rating_source, match_method, band, games, score, avg_opponent_rating, performance_rating, z_score, ci_low, ci_high) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

    let aggregate = &opponent.aggregate;
    let result = &opponent.performance;
    conn.execute(
        sql,
        params![
            run_id,
            aggregate.identifier,
            aggregate.display_name,
            aggregate.resolved_reference_rating,
            aggregate.rating_source.as_str(),
            opponent.match_method.map(|m| m.as_str().to_string()),
            aggregate.band.map(|b| b.label()).unwrap_or_default(),
            result.games as i64,
            result.score,
            result.avg_opponent_rating,
            result.performance_rating,
            result.z_score,
            result.confidence_interval.low,
            result.confidence_interval.high
        ],
    )
    .with_context(|| format!("Failed to insert opponent result {}", aggregate.identifier))?;
    Ok(())
}

pub fn list_band_results(conn: &Connection, run_id: i64) -> Result<Vec<BandResultRow>> {
    let sql = "SELECT run_id, label, opponents, games, score, avg_opponent_rating, performance_rating, expected_score, z_score, ci_low, ci_high FROM band_results WHERE run_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok(BandResultRow {
                run_id: row.get(0)?,
                label: row.get(1)?,
                opponents: row.get(2)?,
                games: row.get(3)?,
                score: row.get(4)?,
                avg_opponent_rating: row.get(5)?,
                performance_rating: row.get(6)?,
                expected_score: row.get(7)?,
                z_score: row.get(8)?,
                ci_low: row.get(9)?,
                ci_high: row.get(10)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_opponent_results(conn: &Connection, run_id: i64) -> Result<Vec<OpponentResultRow>> {
    let sql = "SELECT run_id, identifier, display_name, reference_rating, rating_source, match_method, band, games, score, avg_opponent_rating, performance_rating, z_score, ci_low, ci_high FROM opponent_results WHERE run_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok(OpponentResultRow {
                run_id: row.get(0)?,
                identifier: row.get(1)?,
                display_name: row.get(2)?,
                reference_rating: row.get(3)?,
                rating_source: row.get(4)?,
                match_method: row.get(5)?,
                band: row.get(6)?,
                games: row.get(7)?,
                score: row.get(8)?,
                avg_opponent_rating: row.get(9)?,
                performance_rating: row.get(10)?,
                z_score: row.get(11)?,
                ci_low: row.get(12)?,
                ci_high: row.get(13)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
