use thiserror::Error;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// The source URL could not be fetched at all
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Transport-level HTTP error
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Every tier of every strategy produced nothing. Diagnostic counts
    /// let a human triage why a given site failed.
    #[error(
        "No extractable recipe data ({structured_blocks} structured data block(s) seen, \
         microdata present: {microdata_present}, heading patterns present: {heading_patterns})"
    )]
    NoExtractableData {
        structured_blocks: usize,
        microdata_present: bool,
        heading_patterns: bool,
    },

    /// A video import where both chapters and directions came up empty
    #[error("No recipe content found in video: {0}")]
    EmptyVideo(String),

    /// A single strategy failed to parse; callers fall through to the
    /// next strategy rather than surfacing this
    #[error("Failed to parse recipe: {0}")]
    Parse(String),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The URL argument itself is malformed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_extractable_data_message_carries_diagnostics() {
        let err = ImportError::NoExtractableData {
            structured_blocks: 2,
            microdata_present: false,
            heading_patterns: true,
        };
        let message = err.to_string();
        assert!(message.contains("2 structured data block(s)"));
        assert!(message.contains("microdata present: false"));
        assert!(message.contains("heading patterns present: true"));
    }

    #[test]
    fn test_fetch_error_includes_url() {
        let err = ImportError::Fetch {
            url: "https://example.com/recipe".to_string(),
            reason: "status 404".to_string(),
        };
        assert!(err.to_string().contains("https://example.com/recipe"));
    }
}
