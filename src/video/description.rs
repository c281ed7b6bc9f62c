//! One-pass state machine over a video description.
//!
//! Creators structure descriptions with ad-hoc headers, decorative
//! borders, promo banners and affiliate blocks. The machine tracks which
//! section it is in, drops boilerplate unconditionally, and switches
//! sections without a header when a line's shape strongly contradicts the
//! current section.

use super::chapters;
use crate::ingredient;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Ingredients,
    Directions,
    Notes,
    Ignore,
}

/// Everything the description parse produces
#[derive(Debug, Default, PartialEq)]
pub struct DescriptionParse {
    pub ingredients: Vec<String>,
    pub directions: Vec<String>,
    pub notes: Vec<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
}

static DECORATIVE_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s•▪‣◦►▶→★☆✦✧◆▹\-–—=~*#_|┃─━═╔╗╚╝║]+").expect("decorative prefix regex")
});

static DECORATIVE_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s•▪‣◦►▶→★☆✦✧◆▹=~*#_|┃─━═╔╗╚╝║]+$").expect("decorative suffix regex")
});

static TIME_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(prep|cook|total)\s*time\s*[:\-]\s*(.+)$").expect("time line regex")
});

static YIELD_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:serves|servings|yield|yields|makes)\b").expect("yield line regex")
});

static SOCIAL_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)instagram\.com|facebook\.com|tiktok\.com|twitter\.com|x\.com/|patreon\.com|discord\.gg|linktr\.ee|\bfollow me\b|\bsubscribe\b",
    )
    .expect("social link regex")
});

static AFFILIATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\baffiliate\b|\bamazon associate\b|\bcommission\b|\bsponsored\b|\buse code\b")
        .expect("affiliate regex")
});

static INGREDIENTS_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:ingredients?|what you(?:'ll)? need|shopping list|recipe)\s*[:\-]?\s*$")
        .expect("ingredients header regex")
});

static DIRECTIONS_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:directions?|instructions?|method|steps|how to make(?: it)?|chapters?|timestamps?)\s*[:\-]?\s*$",
    )
    .expect("directions header regex")
});

static NOTES_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:notes?|tips?)\s*[:\-]?\s*$").expect("notes header regex"));

static IGNORE_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:links?|gear|my gear|equipment i use|music|about( me)?|disclaimer|socials?)\s*[:\-]?\s*$")
        .expect("ignore header regex")
});

/// Parse a description into sectioned content, one pass, line by line
pub fn parse_description(description: &str) -> DescriptionParse {
    let mut parse = DescriptionParse::default();
    let mut section = Section::None;

    for raw_line in description.lines() {
        let line = DECORATIVE_PREFIX_REGEX.replace(raw_line.trim(), "");
        let line = DECORATIVE_SUFFIX_REGEX.replace(&line, "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Explicit time lines are captured wherever they appear and never
        // reach the notes
        if let Some(caps) = TIME_LINE_REGEX.captures(line) {
            let value = caps[2].trim().to_string();
            match caps[1].to_lowercase().as_str() {
                "prep" => parse.prep_time.get_or_insert(value),
                "cook" => parse.cook_time.get_or_insert(value),
                _ => parse.total_time.get_or_insert(value),
            };
            continue;
        }

        // Header transitions. A "chapters"/"timestamps" block reads as
        // directions: the chapter titles are the steps.
        if INGREDIENTS_HEADER_REGEX.is_match(line) {
            section = Section::Ingredients;
            continue;
        }
        if DIRECTIONS_HEADER_REGEX.is_match(line) {
            section = Section::Directions;
            continue;
        }
        if NOTES_HEADER_REGEX.is_match(line) {
            section = Section::Notes;
            continue;
        }
        if IGNORE_HEADER_REGEX.is_match(line) {
            section = Section::Ignore;
            continue;
        }

        // Boilerplate drops regardless of section
        if SOCIAL_LINK_REGEX.is_match(line)
            || AFFILIATE_REGEX.is_match(line)
            || is_promo_banner(line)
        {
            continue;
        }

        // Yield phrasing routes to notes regardless of section
        if YIELD_LINE_REGEX.is_match(line) {
            parse.notes.push(line.to_string());
            continue;
        }

        // Chapter timestamp lines belong to the chapter parser, not here
        if chapters::is_timestamp_line(line) {
            continue;
        }

        // Shape contradictions switch the section without a header
        section = match section {
            Section::Directions | Section::None if ingredient::is_ingredient_shaped(line) => {
                Section::Ingredients
            }
            Section::Ingredients if looks_like_direction(line) => Section::Directions,
            current => current,
        };

        match section {
            Section::Ingredients => parse.ingredients.push(line.to_string()),
            Section::Directions => parse.directions.push(line.to_string()),
            Section::Notes | Section::None => parse.notes.push(line.to_string()),
            Section::Ignore => {}
        }
    }

    parse
}

/// An all-caps line of real length is a promo banner, not content
fn is_promo_banner(line: &str) -> bool {
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 10 && letters.iter().all(|c| c.is_uppercase())
}

/// A long prose sentence with no measurement reads as a direction
fn looks_like_direction(line: &str) -> bool {
    line.split_whitespace().count() >= 10 && !ingredient::contains_measurement(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_route_lines() {
        let description = "Ingredients:\n2 cups flour\nDirections:\n1. Mix well";
        let parse = parse_description(description);
        assert_eq!(parse.ingredients, vec!["2 cups flour"]);
        assert_eq!(parse.directions, vec!["1. Mix well"]);
    }

    #[test]
    fn test_time_lines_never_reach_notes() {
        let description = "Prep time: 10 minutes\nCook Time - 25 minutes\nTotal time: 35 minutes";
        let parse = parse_description(description);
        assert_eq!(parse.prep_time.as_deref(), Some("10 minutes"));
        assert_eq!(parse.cook_time.as_deref(), Some("25 minutes"));
        assert_eq!(parse.total_time.as_deref(), Some("35 minutes"));
        assert!(parse.notes.is_empty());
    }

    #[test]
    fn test_decorative_prefixes_stripped_before_headers() {
        let description = "••• Ingredients •••\n2 cups flour";
        let parse = parse_description(description);
        // The decorated header still transitions the section
        assert_eq!(parse.ingredients, vec!["2 cups flour"]);
    }

    #[test]
    fn test_boilerplate_dropped_in_any_section() {
        let description = "Ingredients:\n2 cups flour\nFollow me on instagram.com/cook\nSUBSCRIBE FOR MORE RECIPES\nAs an Amazon Associate I earn commission\n1 tsp salt";
        let parse = parse_description(description);
        assert_eq!(parse.ingredients, vec!["2 cups flour", "1 tsp salt"]);
    }

    #[test]
    fn test_shape_switch_without_header() {
        // No headers at all: the ingredient-shaped line flips the machine
        // into ingredients, the long prose line flips it back out
        let description =
            "2 cups bread flour\n1 tsp yeast\nKnead the dough until smooth and elastic then leave it somewhere warm";
        let parse = parse_description(description);
        assert_eq!(parse.ingredients.len(), 2);
        assert_eq!(parse.directions.len(), 1);
    }

    #[test]
    fn test_yield_routed_to_notes() {
        let description = "Ingredients:\nServes 4\n2 cups flour";
        let parse = parse_description(description);
        assert_eq!(parse.notes, vec!["Serves 4"]);
        assert_eq!(parse.ingredients, vec!["2 cups flour"]);
    }

    #[test]
    fn test_chapter_lines_skipped() {
        let description = "Timestamps:\n0:00 Intro\n2:30 Mixing\nNotes:\nUse cold butter";
        let parse = parse_description(description);
        assert!(parse.directions.is_empty());
        assert_eq!(parse.notes, vec!["Use cold butter"]);
    }

    #[test]
    fn test_ignore_section_swallows_lines() {
        let description = "My Gear\nStand mixer I love\nIngredients:\n2 eggs";
        let parse = parse_description(description);
        assert!(parse.notes.is_empty());
        assert_eq!(parse.ingredients, vec!["2 eggs"]);
    }
}
