/// `{base}/player/{username}/games/archives`
pub fn build_archives_url(base_url: &str, username: &str) -> String {
    format!("{}/games/archives", player_url(base_url, username))
}

/// `{base}/player/{username}/games/{yyyy}/{mm}`
pub fn build_monthly_url(base_url: &str, username: &str, year: i32, month: u32) -> String {
    format!("{}/games/{:04}/{:02}", player_url(base_url, username), year, month)
}

pub fn build_profile_url(base_url: &str, username: &str) -> String {
    player_url(base_url, username)
}

fn player_url(base_url: &str, username: &str) -> String {
    format!(
        "{}/player/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(&username.to_lowercase())
    )
}
