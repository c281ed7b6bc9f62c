//! Chapter timestamps out of a video description.
//!
//! Two line shapes are recognized, both with an optional hour component:
//! `"Title – MM:SS"` and `"MM:SS Title"`.

use crate::model::Chapter;
use crate::text;
use regex::Regex;
use std::sync::LazyLock;

static TIME_FIRST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?((?:\d{1,2}:)?\d{1,2}:\d{2})\)?\s*[–—:-]?\s*(.+)$").expect("time-first regex")
});

static TITLE_FIRST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.{1,80}?)\s*[–—-]\s*\(?((?:\d{1,2}:)?\d{1,2}:\d{2})\)?\s*$")
        .expect("title-first regex")
});

static TIMESTAMP_ANYWHERE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\d{1,2}:)?\d{1,2}:\d{2}").expect("timestamp regex"));

/// Parse every chapter line in a description, ordered by start offset
pub fn parse_chapters(description: &str) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = description
        .lines()
        .filter_map(|line| parse_chapter_line(line.trim()))
        .collect();
    chapters.sort_by_key(|c| c.start_offset);
    chapters
}

/// One chapter line, or None when the line has no timestamp shape
pub fn parse_chapter_line(line: &str) -> Option<Chapter> {
    if line.is_empty() {
        return None;
    }

    if let Some(caps) = TIME_FIRST_REGEX.captures(line) {
        let offset = parse_offset(&caps[1])?;
        let title = text::normalize(caps[2].trim_matches(['-', '–', ' ']));
        if !title.is_empty() {
            return Some(Chapter {
                title,
                start_offset: offset,
            });
        }
    }

    if let Some(caps) = TITLE_FIRST_REGEX.captures(line) {
        let offset = parse_offset(&caps[2])?;
        let title = text::normalize(caps[1].trim());
        if !title.is_empty() {
            return Some(Chapter {
                title,
                start_offset: offset,
            });
        }
    }

    None
}

/// Does this line carry a timestamp at all? Used to keep chapter lines
/// out of the notes and directions buckets.
pub fn is_timestamp_line(line: &str) -> bool {
    parse_chapter_line(line.trim()).is_some()
        || TIMESTAMP_ANYWHERE_REGEX.is_match(line) && line.split_whitespace().count() <= 2
}

/// `"MM:SS"` or `"H:MM:SS"` to seconds
fn parse_offset(timestamp: &str) -> Option<u32> {
    let parts: Vec<&str> = timestamp.split(':').collect();
    let numbers: Vec<u32> = parts.iter().map(|p| p.parse().ok()).collect::<Option<_>>()?;
    match numbers.as_slice() {
        [minutes, seconds] if *seconds < 60 => Some(minutes * 60 + seconds),
        [hours, minutes, seconds] if *minutes < 60 && *seconds < 60 => {
            Some(hours * 3_600 + minutes * 60 + seconds)
        }
        _ => None,
    }
}
