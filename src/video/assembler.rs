//! Chapter-to-transcript step assembly.

use crate::model::{Chapter, TranscriptSegment};
use crate::text;

/// Build direction strings from chapters and transcript segments.
///
/// Each chapter's text is the concatenation of every segment whose start
/// offset falls in `[chapter.start, next_chapter.start)`, sentence-cased
/// and terminally punctuated. A chapter whose window is empty falls back
/// to its title. With no segments at all, the titles alone are the steps.
pub fn build_directions_from_chapters(
    chapters: &[Chapter],
    segments: &[TranscriptSegment],
) -> Vec<String> {
    if chapters.is_empty() {
        return Vec::new();
    }

    if segments.is_empty() {
        return chapters
            .iter()
            .map(|c| text::ensure_terminal_punctuation(&text::sentence_case(&c.title)))
            .collect();
    }

    chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| {
            let window_start = f64::from(chapter.start_offset);
            let window_end = chapters
                .get(index + 1)
                .map(|next| f64::from(next.start_offset))
                .unwrap_or(f64::INFINITY);

            let spoken: Vec<&str> = segments
                .iter()
                .filter(|s| s.start_offset >= window_start && s.start_offset < window_end)
                .map(|s| s.text.as_str())
                .collect();

            let body = if spoken.is_empty() {
                chapter.title.clone()
            } else {
                spoken.join(" ")
            };
            text::ensure_terminal_punctuation(&text::sentence_case(&body))
        })
        .collect()
}
