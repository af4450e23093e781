use anyhow::Result;
use log::{debug, info};

use crate::domain::ReferenceRecord;

/// Which rating column of the FIDE list becomes the reference rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RatingColumn {
    Standard,
    Rapid,
    #[default]
    Blitz,
}

impl RatingColumn {
    fn header(&self) -> &'static str {
        match self {
            RatingColumn::Standard => "SRtng",
            RatingColumn::Rapid => "RRtng",
            RatingColumn::Blitz => "BRtng",
        }
    }
}

const RATING_WIDTH: usize = 5;
const ID_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct FideListSummary {
    pub records: Vec<ReferenceRecord>,
    pub player_lines: usize,
    pub below_minimum: usize,
}

/// Column offsets located from the header line
#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    fed: usize,
    rating: usize,
}

/// Parse the fixed-width FIDE players list, keeping players rated at least
/// `min_rating` in `column`. Names keep the list's "Last, First" form.
pub fn parse(data: &str, min_rating: i32, column: RatingColumn) -> Result<FideListSummary> {
    let columns = locate_columns(data, column)?;
    let mut summary = FideListSummary {
        records: Vec::new(),
        player_lines: 0,
        below_minimum: 0,
    };

    for line in data.lines().filter(|l| is_player_line(l)) {
        summary.player_lines += 1;
        match parse_player_line(line, &columns) {
            Some(record) if record.rating >= min_rating => summary.records.push(record),
            Some(_) => summary.below_minimum += 1,
            None => debug!("Skipping FIDE line without name or rating: {}", line.trim()),
        }
    }

    info!(
        "Parsed {} players rated >= {} ({} player lines)",
        summary.records.len(),
        min_rating,
        summary.player_lines
    );
    Ok(summary)
}

fn locate_columns(data: &str, column: RatingColumn) -> Result<Columns> {
    let header = data
        .lines()
        .find(|line| line.contains("ID Number") && line.contains("Name"))
        .ok_or_else(|| anyhow::anyhow!("Could not find FIDE list header line"))?;

    let find = |label: &str| {
        char_index(header, label)
            .ok_or_else(|| anyhow::anyhow!("FIDE list header has no {} column", label))
    };

    Ok(Columns {
        name: find("Name")?,
        fed: find("Fed")?,
        rating: find(column.header())?,
    })
}

fn char_index(haystack: &str, needle: &str) -> Option<usize> {
    let byte_idx = haystack.find(needle)?;
    Some(haystack[..byte_idx].chars().count())
}

fn is_player_line(line: &str) -> bool {
    let id = slice_chars(line, 0, ID_WIDTH);
    let id = id.trim();
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

fn parse_player_line(line: &str, columns: &Columns) -> Option<ReferenceRecord> {
    let name = slice_chars(line, columns.name, columns.fed);
    let name = name.trim();
    if is_placeholder_name(name) {
        return None;
    }

    let rating = slice_chars(line, columns.rating, columns.rating + RATING_WIDTH)
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|&r| r > 0)?;

    Some(ReferenceRecord {
        canonical_name: name.to_string(),
        rating,
    })
}

fn is_placeholder_name(name: &str) -> bool {
    name.is_empty() || name == "-" || name == "-, -"
}

fn slice_chars(line: &str, start: usize, end: usize) -> String {
    line.chars().skip(start).take(end.saturating_sub(start)).collect()
}
