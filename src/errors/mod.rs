use anyhow::Context as _;

/// Domain errors the analysis core can raise
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Insufficient data for {label}: at least one game is required")]
    InsufficientData { label: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AnalysisError {
    pub fn insufficient_data(label: &str) -> Self {
        AnalysisError::InsufficientData {
            label: label.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        AnalysisError::Configuration {
            message: message.into(),
        }
    }
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Add context to cache errors
pub fn cache_context(operation: &str, key: &str) -> String {
    format!("Failed to {} cache for key: {}", operation, key)
}

/// Wrap result with parse context
pub fn with_parse_context<T, E>(result: Result<T, E>, data_type: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(parse_context(data_type))
}
