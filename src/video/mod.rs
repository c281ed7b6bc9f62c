//! The video import path: description section parsing, chapter
//! timestamps, transcript acquisition, and step assembly.

mod assembler;
pub mod chapters;
pub mod description;
pub mod transcript;

pub use assembler::build_directions_from_chapters;

use crate::classify::{self, CourseSignals};
use crate::config::ImportConfig;
use crate::confidence;
use crate::error::ImportError;
use crate::extract::clean_directions;
use crate::fetch::Fetcher;
use crate::ingredient;
use crate::model::{ImportedRecipe, ProvenanceTier, RawIngredientLine};
use crate::text;
use log::{debug, info};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::sync::LazyLock;
use url::Url;

static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""videoId"\s*:\s*"([\w-]{6,})""#).expect("video id regex"));

static DESCRIPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""shortDescription"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("description regex")
});

static VIDEO_TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""videoDetails"\s*:\s*\{[^{}]*?"title"\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("video title regex")
});

static PAGE_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>(.*?)</title>").expect("page title regex"));

/// Watch-page hosts that route to the video pipeline
pub fn is_video_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.strip_prefix("www.").unwrap_or(host);
    match host {
        "youtu.be" => true,
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            parsed.path().starts_with("/watch") || parsed.path().starts_with("/shorts")
        }
        _ => false,
    }
}

/// The video id, from the URL when possible, else from the page
pub fn video_id(url: &str, watch_html: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            if host.ends_with("youtu.be") {
                if let Some(id) = parsed.path().strip_prefix('/') {
                    if !id.is_empty() {
                        return id.to_string();
                    }
                }
            }
        }
        if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "v") {
            return id.into_owned();
        }
        if let Some(id) = parsed.path().strip_prefix("/shorts/") {
            return id.trim_matches('/').to_string();
        }
    }
    VIDEO_ID_REGEX
        .captures(watch_html)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Import a recipe from a video watch page
pub async fn import_video(
    fetcher: &dyn Fetcher,
    config: &ImportConfig,
    url: &str,
) -> Result<ImportedRecipe, ImportError> {
    let watch_html = fetch_watch_page(fetcher, config, url).await?;
    let id = video_id(url, &watch_html);
    let title = extract_title(&watch_html);
    let raw_description = extract_description(&watch_html);
    debug!(
        "Video import: id={id:?}, title={title:?}, description {} chars",
        raw_description.len()
    );

    let parsed_description = description::parse_description(&raw_description);
    let chapter_list = chapters::parse_chapters(&raw_description);

    let outcome = transcript::fetch_transcript(fetcher, &config.video, &watch_html, &id).await;
    if let Some(diagnostic) = &outcome.diagnostic {
        debug!("Transcript diagnostic: {diagnostic}");
    }

    // Chapters plus transcript beat chapters alone beat the description
    let (raw_directions, directions_tier) = if !chapter_list.is_empty() {
        let steps = build_directions_from_chapters(&chapter_list, &outcome.segments);
        let tier = if outcome.segments.is_empty() {
            ProvenanceTier::ListSniffing
        } else {
            ProvenanceTier::HeadingInference
        };
        (steps, tier)
    } else {
        (
            parsed_description.directions.clone(),
            ProvenanceTier::HeadingInference,
        )
    };
    let directions = clean_directions(raw_directions.clone());

    let raw_ingredient_lines: Vec<RawIngredientLine> = parsed_description
        .ingredients
        .iter()
        .map(|line| RawIngredientLine::new(line.clone(), None))
        .collect();
    let parsed_ingredients = ingredient::parse_ingredient_lines(&raw_ingredient_lines);

    let ingredient_names: Vec<String> = parsed_ingredients
        .iter()
        .filter(|i| !i.name.is_empty())
        .map(|i| i.name.clone())
        .collect();

    let classification = classify::classify(&CourseSignals {
        title: title.as_deref().unwrap_or(""),
        category: None,
        cuisine: None,
        keywords: "",
        description: &raw_description,
        ingredient_names,
        source_url: Some(url),
    });

    let notes = if parsed_description.notes.is_empty() {
        None
    } else {
        Some(parsed_description.notes.join("\n"))
    };

    let time = parsed_description.total_time.clone();
    let prep_time = parsed_description.prep_time.clone();
    let cook_time = parsed_description.cook_time.clone();

    let mut images = Vec::new();
    if !id.is_empty() {
        images.push(format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"));
    }

    let mut confidences = confidence::score_fields(
        ProvenanceTier::HeadingInference,
        title.is_some(),
        classification.confidence,
        classification.cuisine.is_some(),
        &parsed_ingredients,
        raw_ingredient_lines.len(),
        directions.len(),
        false,
        time.is_some() || prep_time.is_some() || cook_time.is_some(),
    );
    confidences.directions = confidence::directions(directions_tier, directions.len());

    let recipe = ImportedRecipe {
        name: title,
        course: Some(classification.course.clone()),
        cuisine: classification.cuisine.clone(),
        subcategory: classification.subcategory.clone(),
        time,
        prep_time,
        cook_time,
        ingredients: parsed_ingredients,
        directions,
        notes,
        images,
        raw_ingredients: raw_ingredient_lines.into_iter().map(|l| l.text).collect(),
        raw_directions,
        source_url: Some(url.to_string()),
        confidences,
        ..Default::default()
    };

    if !recipe.has_content() {
        return Err(ImportError::EmptyVideo(
            outcome
                .diagnostic
                .unwrap_or_else(|| "description had no recipe content".to_string()),
        ));
    }

    info!(
        "Video import produced {} ingredient(s), {} direction(s)",
        recipe.ingredients.len(),
        recipe.directions.len()
    );
    Ok(recipe)
}

async fn fetch_watch_page(
    fetcher: &dyn Fetcher,
    config: &ImportConfig,
    url: &str,
) -> Result<String, ImportError> {
    let mut headers = HeaderMap::new();
    if let Some(agent) = config.user_agents.first() {
        if let Ok(value) = HeaderValue::from_str(agent) {
            headers.insert(USER_AGENT, value);
        }
    }
    let response = fetcher.get(url, headers).await?;
    if !response.is_success() {
        return Err(ImportError::Fetch {
            url: url.to_string(),
            reason: format!("status {}", response.status),
        });
    }
    Ok(response.text())
}

fn extract_description(watch_html: &str) -> String {
    DESCRIPTION_REGEX
        .captures(watch_html)
        .map(|caps| unescape_json_string(&caps[1]))
        .unwrap_or_default()
}

fn extract_title(watch_html: &str) -> Option<String> {
    if let Some(caps) = VIDEO_TITLE_REGEX.captures(watch_html) {
        let title = text::normalize(&unescape_json_string(&caps[1]));
        if !title.is_empty() {
            return Some(title);
        }
    }
    PAGE_TITLE_REGEX
        .captures(watch_html)
        .map(|caps| {
            text::normalize(
                caps[1]
                    .trim()
                    .trim_end_matches("- YouTube")
                    .trim_end_matches("- youtube"),
            )
        })
        .filter(|t| !t.is_empty())
}

/// Minimal JSON string unescaping for fields pulled out with regexes
fn unescape_json_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => {}
            Some('t') => result.push('\t'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some('/') => result.push('/'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                if let Ok(value) = u32::from_str_radix(&code, 16) {
                    if let Some(decoded) = char::from_u32(value) {
                        result.push(decoded);
                    }
                }
            }
            Some(other) => result.push(other),
            None => {}
        }
    }
    result
}
