use colored::Colorize;

use crate::pipeline::{AnalysisReport, Diagnostics, OpponentResult};
use crate::rating::PerformanceResult;

const SIGNIFICANT_Z: f64 = 1.96;

pub fn print_report(player: &str, report: &AnalysisReport, top_opponents: usize) {
    println!();
    println!("{}", format!("Performance by band for {}", player).bright_cyan().bold());
    println!("{}", "=".repeat(96).cyan());

    if report.is_empty() {
        println!("{}", "No games matched the filters.".yellow());
        print_diagnostics(&report.diagnostics);
        return;
    }

    println!("{}", band_header().bold());
    for band in &report.bands {
        print_row(&band_row(band.aggregate.opponents, &band.performance), &band.performance);
    }
    if let Some(overall) = &report.overall {
        println!("{}", "-".repeat(96));
        print_row(&band_row(report.opponents.len(), overall), overall);
    }

    let shown = report.opponents.len().min(top_opponents);
    println!();
    println!(
        "{}",
        format!("Top {} opponents by games played", shown).bright_yellow().bold()
    );
    println!("{}", "=".repeat(96).yellow());
    println!("{}", opponent_header().bold());
    for opponent in report.opponents.iter().take(top_opponents) {
        print_row(&opponent_row(opponent), &opponent.performance);
    }

    print_diagnostics(&report.diagnostics);
}

pub fn band_header() -> String {
    format!(
        "{:<8} {:>5} {:>6} {:>7} {:>7} {:>8} {:>8} {:>7} {:>17}",
        "Band", "Opps", "Games", "Score", "Pct", "AvgOpp", "Perf", "z", "95% CI"
    )
}

pub fn band_row(opponents: usize, result: &PerformanceResult) -> String {
    format!(
        "{:<8} {:>5} {:>6} {:>7.1} {:>6.1}% {:>8.0} {:>8.0} {:>7.2} {:>17}",
        result.label,
        opponents,
        result.games,
        result.score,
        result.score_pct(),
        result.avg_opponent_rating,
        result.performance_rating,
        result.z_score,
        interval(result)
    )
}

pub fn opponent_header() -> String {
    format!(
        "{:<20} {:<24} {:>5} {:>6} {:>7} {:>7} {:>8} {:>8} {:>10}",
        "Opponent", "Name", "Band", "Games", "Score", "Pct", "AvgOpp", "Perf", "Source"
    )
}

pub fn opponent_row(opponent: &OpponentResult) -> String {
    let aggregate = &opponent.aggregate;
    let result = &opponent.performance;
    format!(
        "{:<20} {:<24} {:>5} {:>6} {:>7.1} {:>6.1}% {:>8.0} {:>8.0} {:>10}",
        truncate(&aggregate.identifier, 20),
        truncate(aggregate.display_name.as_deref().unwrap_or("-"), 24),
        aggregate.band.map(|b| b.label()).unwrap_or("-"),
        result.games,
        result.score,
        result.score_pct(),
        result.avg_opponent_rating,
        result.performance_rating,
        aggregate.rating_source.as_str()
    )
}

pub fn diagnostics_lines(diagnostics: &Diagnostics) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Games: {} received, {} used, {} below minimum, {} dropped by tournament policy",
            diagnostics.games_received,
            diagnostics.games_used(),
            diagnostics.games_below_minimum,
            diagnostics.games_dropped_by_policy
        ),
        format!(
            "Opponents: {} unique, {} resolved, {} platform fallback, {} below minimum",
            diagnostics.unique_opponents,
            diagnostics.resolved_opponents,
            diagnostics.fallback_opponents,
            diagnostics.opponents_below_minimum
        ),
    ];
    if diagnostics.averaged_opponents > 0 {
        lines.push(format!(
            "Banded by two-year average: {}",
            diagnostics.averaged_opponents
        ));
    }
    if diagnostics.ingestion_skipped > 0 {
        lines.push(format!(
            "Malformed records skipped: {}",
            diagnostics.ingestion_skipped
        ));
    }
    lines
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    println!();
    for line in diagnostics_lines(diagnostics) {
        println!("{}", line.dimmed());
    }
}

/// Rows whose z-score is significant at 95% stand out
fn print_row(line: &str, result: &PerformanceResult) {
    if result.z_score >= SIGNIFICANT_Z {
        println!("{}", line.green());
    } else if result.z_score <= -SIGNIFICANT_Z {
        println!("{}", line.red());
    } else {
        println!("{}", line);
    }
}

fn interval(result: &PerformanceResult) -> String {
    format!(
        "[{:.0}, {:.0}]",
        result.confidence_interval.low, result.confidence_interval.high
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::ConfidenceInterval;

    fn result() -> PerformanceResult {
        PerformanceResult {
            label: "600".to_string(),
            games: 12,
            score: 7.5,
            score_fraction: 0.625,
            avg_opponent_rating: 2648.4,
            performance_rating: 2737.2,
            expected_score: 0.5,
            z_score: 0.87,
            confidence_interval: ConfidenceInterval {
                low: 2540.6,
                high: 2961.0,
            },
        }
    }

    #[test]
    fn test_band_row_contents() {
        let row = band_row(5, &result());

        assert!(row.starts_with("600"));
        assert!(row.contains("7.5"));
        assert!(row.contains("62.5%"));
        assert!(row.contains("2648"));
        assert!(row.contains("2737"));
        assert!(row.contains("[2541, 2961]"));
    }

    #[test]
    fn test_header_and_row_align() {
        assert_eq!(band_header().len(), band_row(5, &result()).len());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("averyveryverylongname", 8), "averyve…");
    }

    #[test]
    fn test_diagnostics_mention_malformed_only_when_present() {
        let mut diagnostics = Diagnostics {
            games_received: 10,
            games_below_minimum: 3,
            ..Diagnostics::default()
        };
        assert_eq!(diagnostics_lines(&diagnostics).len(), 2);
        assert!(diagnostics_lines(&diagnostics)[0].contains("7 used"));

        diagnostics.ingestion_skipped = 2;
        assert_eq!(diagnostics_lines(&diagnostics).len(), 3);
    }
}
