use crate::pagination::MonthWindow;

/// (year, month) from an archive URL ending in `/games/{yyyy}/{mm}`
pub fn parse_archive_month(url: &str) -> Option<(i32, u32)> {
    let mut parts = url.trim_end_matches('/').rsplit('/');
    let month = parts
        .next()?
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))?;
    let year = parts.next()?.parse::<i32>().ok()?;
    Some((year, month))
}

/// Archive months inside the window, oldest first
pub fn months_in_window(archives: &[String], window: &MonthWindow) -> Vec<(i32, u32)> {
    let mut months: Vec<(i32, u32)> = archives
        .iter()
        .filter_map(|url| parse_archive_month(url))
        .filter(|&(year, month)| window.contains_month(year, month))
        .collect();
    months.sort();
    months.dedup();
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_archive_month() {
        assert_eq!(
            parse_archive_month("https://api.chess.com/pub/player/hikaru/games/2024/03"),
            Some((2024, 3))
        );
        assert_eq!(parse_archive_month("https://api.chess.com/pub/player/hikaru/games/2024/13"), None);
        assert_eq!(parse_archive_month("not a url"), None);
    }

    #[test]
    fn test_months_in_window() {
        let window = MonthWindow::new(
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap();
        let archives: Vec<String> = ["2024/01", "2024/03", "2024/02", "2024/04", "garbage"]
            .iter()
            .map(|m| format!("https://api.chess.com/pub/player/hikaru/games/{}", m))
            .collect();

        assert_eq!(months_in_window(&archives, &window), vec![(2024, 2), (2024, 3)]);
    }
}
