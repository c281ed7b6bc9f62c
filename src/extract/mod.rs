use crate::error::ImportError;
use crate::model::ImportedRecipe;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

mod html_rules;
mod microdata;
mod structured;

pub use html_rules::HtmlRulesExtractor;
pub use microdata::MicroDataExtractor;
pub use structured::StructuredDataExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<ImportedRecipe, ImportError>;
}

/// Diagnostic counts gathered while a page fails to yield anything,
/// reported inside the final error so a human can triage the site
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractionDiagnostics {
    pub structured_blocks: usize,
    pub microdata_present: bool,
    pub heading_patterns: bool,
}

impl ExtractionDiagnostics {
    pub fn gather(document: &Html) -> Self {
        Self {
            structured_blocks: structured::count_structured_blocks(document),
            microdata_present: microdata::has_recipe_microdata(document),
            heading_patterns: html_rules::has_heading_patterns(document),
        }
    }

    pub fn into_error(self) -> ImportError {
        ImportError::NoExtractableData {
            structured_blocks: self.structured_blocks,
            microdata_present: self.microdata_present,
            heading_patterns: self.heading_patterns,
        }
    }
}

static STEP_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:step\s*)?\d+\s*[.):]?\s*$").expect("step number regex")
});

static LEADING_NUMBERING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:step\s+\d+\s*[:.)-]?\s*|\d+\s*[.):]\s+)").expect("numbering regex")
});

static BYLINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:by|recipe by|photo by|words by)\s+[A-Z]").expect("byline regex"));

/// Navigation labels that leak into scraped direction lists
static NAV_LABELS: &[&str] = &[
    "print",
    "share",
    "save",
    "pin",
    "jump",
    "video",
    "notes",
    "comments",
    "advertisement",
    "instructions",
    "directions",
    "method",
];

/// Strip numbering and drop junk lines from a scraped direction list:
/// bare step-number headers, author bylines, single-word navigation
/// labels, lines with no alphanumeric content. Surviving lines are
/// deduplicated by normalized text.
pub fn clean_directions(lines: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut cleaned = Vec::with_capacity(lines.len());

    for line in lines {
        let line = crate::text::normalize(&line);
        if line.is_empty() || STEP_NUMBER_REGEX.is_match(&line) {
            continue;
        }
        if !line.chars().any(|c| c.is_alphanumeric()) {
            continue;
        }
        if BYLINE_REGEX.is_match(&line) {
            continue;
        }
        let stripped = LEADING_NUMBERING_REGEX.replace(&line, "").trim().to_string();
        if stripped.is_empty() {
            continue;
        }
        let word_count = stripped.split_whitespace().count();
        if word_count == 1 && NAV_LABELS.contains(&stripped.to_lowercase().trim_end_matches(':')) {
            continue;
        }
        let key = stripped.to_lowercase();
        if seen.insert(key) {
            cleaned.push(stripped);
        }
    }
    cleaned
}

/// og:image fallback for pages whose recipe markup omits the photo
pub fn og_image(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_directions_filters_junk() {
        let lines = vec![
            "Step 1".to_string(),
            "1. Mix the flour and water.".to_string(),
            "by Jane Author".to_string(),
            "Print".to_string(),
            "***".to_string(),
            "Bake until golden.".to_string(),
            "bake until golden.".to_string(),
        ];
        let cleaned = clean_directions(lines);
        assert_eq!(
            cleaned,
            vec!["Mix the flour and water.", "Bake until golden."]
        );
    }

    #[test]
    fn test_clean_directions_strips_step_prefixes() {
        let cleaned = clean_directions(vec![
            "Step 2: Fold in the egg whites.".to_string(),
            "3) Chill for an hour.".to_string(),
        ]);
        assert_eq!(cleaned, vec!["Fold in the egg whites.", "Chill for an hour."]);
    }

    #[test]
    fn test_og_image() {
        let html = r#"<html><head><meta property="og:image" content="https://example.com/photo.jpg"></head><body></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(
            og_image(&document).as_deref(),
            Some("https://example.com/photo.jpg")
        );
    }
}
