//! Machine-readable recipe markup: linked-data graphs and embedded
//! page-state JSON.
//!
//! Payloads here are untrusted and loosely shaped, so everything goes
//! through `serde_json::Value` with explicit pattern matching; a candidate
//! that doesn't parse is skipped, never fatal to the import.

use super::{clean_directions, html_rules, og_image, Extractor, ParsingContext};
use crate::classify::{self, CourseSignals};
use crate::confidence;
use crate::error::ImportError;
use crate::ingredient;
use crate::model::{ImportedRecipe, ProvenanceTier, RawIngredientLine};
use crate::text;
use log::debug;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

pub struct StructuredDataExtractor;

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[type='application/ld+json'], script#__NEXT_DATA__")
        .expect("script selector")
});

static TEXTUAL_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(hours?|hrs?|h\b|minutes?|mins?|m\b|seconds?|secs?|s\b|days?|d\b)")
        .expect("textual duration regex")
});

/// How many structured-data blocks the page exposes, for diagnostics
pub fn count_structured_blocks(document: &Html) -> usize {
    document.select(&SCRIPT_SELECTOR).count()
}

impl Extractor for StructuredDataExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<ImportedRecipe, ImportError> {
        let payloads: Vec<String> = context
            .document
            .select(&SCRIPT_SELECTOR)
            .map(|el| el.inner_html())
            .collect();
        debug!(
            "StructuredDataExtractor: {} candidate script block(s)",
            payloads.len()
        );

        for (index, payload) in payloads.iter().enumerate() {
            let sanitized = sanitize_json(payload);
            let json: Value = match serde_json::from_str(&sanitized) {
                Ok(v) => v,
                Err(e) => {
                    debug!("StructuredDataExtractor: block {index} is not JSON: {e}");
                    continue;
                }
            };
            let Some(node) = find_recipe_node(&json) else {
                continue;
            };
            if let Some(recipe) = convert_node(node, context) {
                return Ok(recipe);
            }
            debug!("StructuredDataExtractor: block {index} had a Recipe node that didn't convert");
        }

        Err(ImportError::Parse(
            "no usable recipe in structured data".to_string(),
        ))
    }
}

/// Escape the literal control characters some sites leave inside JSON
/// strings instead of escaped versions
fn sanitize_json(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut prev_char = '\0';

    for c in json.chars() {
        if c == '"' && prev_char != '\\' {
            in_string = !in_string;
            result.push(c);
        } else if in_string {
            match c {
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                c if c.is_control() => {}
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
        prev_char = c;
    }

    result
}

/// Depth-first, left-to-right search for the first node typed "Recipe".
/// Handles single records, `@graph` wrappers, plain arrays, and nesting.
fn find_recipe_node(json: &Value) -> Option<&Value> {
    match json {
        Value::Object(obj) => {
            if let Some(type_val) = obj.get("@type") {
                let is_recipe = match type_val {
                    Value::String(s) => s.eq_ignore_ascii_case("recipe"),
                    Value::Array(arr) => arr
                        .iter()
                        .any(|v| v.as_str().is_some_and(|s| s.eq_ignore_ascii_case("recipe"))),
                    _ => false,
                };
                if is_recipe {
                    return Some(json);
                }
            }
            if let Some(graph) = obj.get("@graph") {
                if let Some(recipe) = find_recipe_node(graph) {
                    return Some(recipe);
                }
            }
            for (_, value) in obj {
                if let Some(recipe) = find_recipe_node(value) {
                    return Some(recipe);
                }
            }
            None
        }
        Value::Array(arr) => arr.iter().find_map(find_recipe_node),
        _ => None,
    }
}

fn convert_node(node: &Value, context: &ParsingContext) -> Option<ImportedRecipe> {
    let name = node
        .get("name")
        .and_then(Value::as_str)
        .map(text::normalize)
        .filter(|n| !n.is_empty());

    let ingredient_fragments = string_list(node, &["recipeIngredient", "ingredients"]);
    let raw_direction_lines = direction_list(node, &["recipeInstructions", "instructions", "steps"]);

    if ingredient_fragments.is_empty() && raw_direction_lines.is_empty() {
        return None;
    }

    // Some sources emit one entry per comma-separated fragment; rejoin
    // before parsing
    let rejoined = rejoin_split_fragments(&ingredient_fragments);
    let mut raw_lines = dedup_with_section_reset(rejoined);
    let mut ingredient_tier = ProvenanceTier::StructuredData;

    // Section structure is commonly lost in linked-data exports. When the
    // page's HTML carries ingredient-group headings the structured list
    // lacks, trust the HTML for ingredients and keep everything else.
    let has_sections = raw_lines.iter().any(|l| l.section.is_some());
    if !has_sections {
        if let Some(html_lines) = html_rules::grouped_ingredient_lines(&context.document) {
            debug!("StructuredDataExtractor: taking sectioned ingredient list from HTML");
            raw_lines = html_lines;
            ingredient_tier = ProvenanceTier::PluginMarkup;
        }
    }

    let parsed = ingredient::parse_ingredient_lines(&raw_lines);
    let directions = clean_directions(raw_direction_lines.clone());

    let category = text_field(node, &["recipeCategory"]);
    let cuisine_field = text_field(node, &["recipeCuisine"]);
    let keywords = text_field(node, &["keywords"]).unwrap_or_default();
    let description = node
        .get("description")
        .and_then(Value::as_str)
        .map(text::normalize)
        .unwrap_or_default();

    let ingredient_names: Vec<String> = parsed
        .iter()
        .filter(|i| !i.name.is_empty())
        .map(|i| i.name.clone())
        .collect();

    let classification = classify::classify(&CourseSignals {
        title: name.as_deref().unwrap_or(""),
        category: category.as_deref(),
        cuisine: cuisine_field.as_deref(),
        keywords: &keywords,
        description: &description,
        ingredient_names,
        source_url: Some(&context.url),
    });

    let serves = yield_value(node);
    let prep_time = node
        .get("prepTime")
        .and_then(Value::as_str)
        .and_then(parse_duration);
    let cook_time = node
        .get("cookTime")
        .and_then(Value::as_str)
        .and_then(parse_duration);
    let time = node
        .get("totalTime")
        .and_then(Value::as_str)
        .and_then(parse_duration);

    let mut images = image_urls(node);
    if images.is_empty() {
        if let Some(og) = og_image(&context.document) {
            images.push(og);
        }
    }

    let raw_count = raw_lines
        .iter()
        .filter(|l| ingredient::section_header(&l.text).is_none())
        .count();

    let confidences = confidence::score_fields(
        ingredient_tier,
        name.is_some(),
        classification.confidence,
        classification.cuisine.is_some(),
        &parsed,
        raw_count,
        directions.len(),
        serves.is_some(),
        time.is_some() || prep_time.is_some() || cook_time.is_some(),
    );

    Some(ImportedRecipe {
        name,
        course: Some(classification.course.clone()),
        cuisine: classification.cuisine.clone(),
        subcategory: classification.subcategory.clone(),
        serves,
        time,
        prep_time,
        cook_time,
        ingredients: parsed,
        directions,
        notes: if description.is_empty() {
            None
        } else {
            Some(description)
        },
        images,
        nutrition: nutrition_block(node),
        raw_ingredients: raw_lines.into_iter().map(|l| l.text).collect(),
        raw_directions: raw_direction_lines,
        source_url: Some(context.url.clone()),
        confidences,
        ..Default::default()
    })
}

/// A fragment continues the previous entry when it is very short, purely
/// numeric/punctuation, starts with a closing parenthesis, starts with a
/// bare unit, or when parenthesis depth is still open.
pub fn rejoin_split_fragments(fragments: &[String]) -> Vec<String> {
    let mut rejoined: Vec<String> = Vec::with_capacity(fragments.len());
    let mut open_depth = 0i32;

    for fragment in fragments {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        let is_continuation = !rejoined.is_empty()
            && (open_depth > 0
                || fragment.len() <= 3
                || !fragment.chars().any(|c| c.is_alphabetic())
                || fragment.starts_with(')')
                || text::starts_with_bare_unit(fragment));

        if is_continuation {
            let last = rejoined.last_mut().expect("non-empty");
            last.push_str(", ");
            last.push_str(fragment);
        } else {
            rejoined.push(fragment.to_string());
        }

        for c in fragment.chars() {
            match c {
                '(' => open_depth += 1,
                ')' => open_depth = (open_depth - 1).max(0),
                _ => {}
            }
        }
    }

    rejoined
}

/// Remove exact duplicates (case/whitespace normalized), resetting the
/// seen-set at every section header so the same ingredient can appear in
/// two sections.
pub fn dedup_with_section_reset(lines: Vec<String>) -> Vec<RawIngredientLine> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut current_section: Option<String> = None;
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        if let Some(section) = ingredient::section_header(&line) {
            seen.clear();
            current_section = Some(section);
            out.push(RawIngredientLine::new(line, current_section.clone()));
            continue;
        }
        let key = line
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if seen.insert(key) {
            out.push(RawIngredientLine::new(line, current_section.clone()));
        }
    }

    out
}

/// Field that may be a string or a list of strings
fn text_field(node: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match node.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(text::normalize(s)),
            Some(Value::Array(arr)) => {
                let joined = arr
                    .iter()
                    .filter_map(Value::as_str)
                    .map(text::normalize)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            _ => {}
        }
    }
    None
}

/// Ingredient lines: strings, or `{name, amount}` objects
fn string_list(node: &Value, keys: &[&str]) -> Vec<String> {
    for key in keys {
        let Some(value) = node.get(key) else { continue };
        let items: Vec<String> = match value {
            Value::Array(arr) => arr
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Object(obj) => {
                        let name = obj.get("name").and_then(Value::as_str)?.trim();
                        let amount = obj
                            .get("amount")
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .trim();
                        if amount.is_empty() {
                            Some(name.to_string())
                        } else {
                            Some(format!("{amount} {name}"))
                        }
                    }
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Value::String(s) => s
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}

/// Directions: a string (split on newlines or sentence boundaries), a
/// list of strings, `{text|name}` objects, or HowToSection wrappers
fn direction_list(node: &Value, keys: &[&str]) -> Vec<String> {
    for key in keys {
        let Some(value) = node.get(key) else { continue };
        let steps = collect_direction_steps(value);
        if !steps.is_empty() {
            return steps;
        }
    }
    Vec::new()
}

fn collect_direction_steps(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_direction_text(s),
        Value::Array(arr) => arr.iter().flat_map(collect_direction_steps).collect(),
        Value::Object(obj) => {
            if let Some(items) = obj.get("itemListElement") {
                return collect_direction_steps(items);
            }
            obj.get("text")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str)
                .map(|s| vec![s.trim().to_string()])
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Split a direction blob on newlines, or failing that on sentence
/// boundaries followed by a capital letter
pub fn split_direction_text(s: &str) -> Vec<String> {
    if s.contains('\n') {
        return s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
    }

    let chars: Vec<char> = s.chars().collect();
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        current.push(chars[i]);
        if matches!(chars[i], '.' | '!' | '?') {
            let mut j = i + 1;
            let mut saw_whitespace = false;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
                saw_whitespace = true;
            }
            if saw_whitespace && j < chars.len() && chars[j].is_uppercase() {
                let step = current.trim().to_string();
                if !step.is_empty() {
                    steps.push(step);
                }
                current.clear();
                i = j;
                continue;
            }
        }
        i += 1;
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        steps.push(tail);
    }
    steps
}

fn yield_value(node: &Value) -> Option<String> {
    match node.get("recipeYield") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(text::normalize(s)),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Array(arr)) => {
            // Prefer the descriptive entry ("15 pieces") over a bare number
            let strings: Vec<String> = arr
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.trim().to_string(),
                    Value::Number(n) => n.to_string(),
                    _ => String::new(),
                })
                .filter(|s| !s.is_empty())
                .collect();
            strings
                .iter()
                .find(|s| s.contains(char::is_alphabetic))
                .or_else(|| strings.first())
                .cloned()
        }
        _ => None,
    }
}

fn image_urls(node: &Value) -> Vec<String> {
    let mut urls = Vec::new();
    match node.get("image") {
        Some(Value::String(s)) if !s.is_empty() => urls.push(text::decode_entities(s)),
        Some(Value::Object(obj)) => {
            if let Some(url) = obj.get("url").and_then(Value::as_str) {
                urls.push(url.to_string());
            }
        }
        Some(Value::Array(arr)) => {
            for item in arr {
                match item {
                    Value::String(s) if !s.is_empty() => urls.push(text::decode_entities(s)),
                    Value::Object(obj) => {
                        if let Some(url) = obj.get("url").and_then(Value::as_str) {
                            urls.push(url.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
    urls
}

fn nutrition_block(node: &Value) -> HashMap<String, String> {
    let mut nutrition = HashMap::new();
    if let Some(Value::Object(obj)) = node.get("nutrition") {
        for (key, value) in obj {
            if key.starts_with('@') {
                continue;
            }
            if let Some(s) = value.as_str() {
                if !s.trim().is_empty() {
                    nutrition.insert(key.clone(), s.trim().to_string());
                }
            }
        }
    }
    nutrition
}

/// ISO-8601-style duration (months and years as 30/365 days) with a
/// textual fallback; bare integers read as minutes. Output is
/// human-readable ("1 hour 30 minutes").
pub fn parse_duration(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(seconds) = parse_iso_duration(text) {
        return humanize_seconds(seconds);
    }
    if let Some(seconds) = parse_textual_duration(text) {
        return humanize_seconds(seconds);
    }
    None
}

fn parse_iso_duration(text: &str) -> Option<f64> {
    let rest = text.strip_prefix('P').or_else(|| text.strip_prefix('p'))?;
    let mut seconds = 0.0;
    let mut number = String::new();
    let mut in_time = false;
    let mut matched_any = false;

    for c in rest.chars() {
        match c {
            'T' | 't' => in_time = true,
            '0'..='9' | '.' => number.push(c),
            _ => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                let multiplier = match (c.to_ascii_uppercase(), in_time) {
                    ('Y', false) => 365.0 * 86_400.0,
                    ('M', false) => 30.0 * 86_400.0,
                    ('W', false) => 7.0 * 86_400.0,
                    ('D', false) => 86_400.0,
                    ('H', true) => 3_600.0,
                    ('M', true) => 60.0,
                    ('S', true) => 1.0,
                    _ => return None,
                };
                seconds += value * multiplier;
                matched_any = true;
            }
        }
    }

    if matched_any && number.is_empty() {
        Some(seconds)
    } else {
        None
    }
}

fn parse_textual_duration(text: &str) -> Option<f64> {
    let mut seconds = 0.0;
    let mut matched = false;
    for caps in TEXTUAL_DURATION_REGEX.captures_iter(text) {
        let value: f64 = caps[1].parse().ok()?;
        let unit = caps[2].to_lowercase();
        let multiplier = if unit.starts_with('d') {
            86_400.0
        } else if unit.starts_with('h') {
            3_600.0
        } else if unit.starts_with('m') {
            60.0
        } else {
            1.0
        };
        seconds += value * multiplier;
        matched = true;
    }
    if matched {
        return Some(seconds);
    }
    // A bare integer reads as minutes
    text.trim().parse::<f64>().ok().map(|minutes| minutes * 60.0)
}

fn humanize_seconds(seconds: f64) -> Option<String> {
    let total_minutes = (seconds / 60.0).round() as u64;
    if total_minutes == 0 {
        return None;
    }
    let days = total_minutes / 1_440;
    let hours = (total_minutes % 1_440) / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{} day{}", days, if days == 1 { "" } else { "s" }));
    }
    if hours > 0 {
        parts.push(format!("{} hour{}", hours, if hours == 1 { "" } else { "s" }));
    }
    if minutes > 0 {
        parts.push(format!(
            "{} minute{}",
            minutes,
            if minutes == 1 { "" } else { "s" }
        ));
    }
    Some(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_for(html: &str) -> ParsingContext {
        ParsingContext {
            url: "https://example.com/recipe".to_string(),
            document: Html::parse_document(html),
        }
    }

    fn wrap_json_ld(json: &str) -> String {
        format!(
            r#"<html><head><script type="application/ld+json">{json}</script></head><body></body></html>"#
        )
    }

    #[test]
    fn test_parse_basic_recipe() {
        let html = wrap_json_ld(
            r#"{
                "@context": "https://schema.org/",
                "@type": "Recipe",
                "name": "Chocolate Chip Cookies",
                "recipeIngredient": ["2 cups flour", "1 cup sugar", "2 eggs"],
                "recipeInstructions": "Mix ingredients. Bake at 350F for 10 minutes.",
                "recipeYield": "24 cookies",
                "recipeCategory": "Dessert",
                "prepTime": "PT15M",
                "totalTime": "PT25M"
            }"#,
        );
        let context = context_for(&html);
        let recipe = StructuredDataExtractor.parse(&context).unwrap();

        assert_eq!(recipe.name.as_deref(), Some("Chocolate Chip Cookies"));
        assert_eq!(recipe.course.as_deref(), Some("Desserts"));
        assert_eq!(recipe.serves.as_deref(), Some("24 cookies"));
        assert_eq!(recipe.prep_time.as_deref(), Some("15 minutes"));
        assert_eq!(recipe.time.as_deref(), Some("25 minutes"));
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].name, "flour");
        assert_eq!(recipe.directions.len(), 2);
        assert!(recipe.confidences.ingredients > 0.8);
    }

    #[test]
    fn test_recipe_in_graph() {
        let html = wrap_json_ld(
            r#"{
                "@context": "https://schema.org/",
                "@graph": [
                    {"@type": "WebSite", "name": "Some Site"},
                    {
                        "@type": "Recipe",
                        "name": "Carbonara",
                        "recipeIngredient": ["1 lb spaghetti"],
                        "recipeInstructions": [
                            {"@type": "HowToStep", "text": "Boil pasta."},
                            {"@type": "HowToStep", "text": "Toss with sauce."}
                        ]
                    }
                ]
            }"#,
        );
        let context = context_for(&html);
        let recipe = StructuredDataExtractor.parse(&context).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("Carbonara"));
        assert_eq!(recipe.directions, vec!["Boil pasta.", "Toss with sauce."]);
    }

    #[test]
    fn test_type_array_and_alias_keys() {
        let html = wrap_json_ld(
            r#"{
                "@type": ["Recipe", "NewsArticle"],
                "name": "Stew",
                "ingredients": ["2 cups stock"],
                "steps": ["Simmer everything."]
            }"#,
        );
        let context = context_for(&html);
        let recipe = StructuredDataExtractor.parse(&context).unwrap();
        assert_eq!(recipe.ingredients[0].name, "stock");
        assert_eq!(recipe.directions, vec!["Simmer everything."]);
    }

    #[test]
    fn test_malformed_block_falls_through() {
        let html = format!(
            r#"<html><head>
            <script type="application/ld+json">{{not json at all</script>
            <script type="application/ld+json">{{"@type": "Recipe", "name": "Salvage", "recipeIngredient": ["1 cup rice"], "recipeInstructions": "Cook rice."}}</script>
            </head><body></body></html>"#
        );
        let context = context_for(&html);
        let recipe = StructuredDataExtractor.parse(&context).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("Salvage"));
    }

    #[test]
    fn test_rejoin_split_fragments() {
        let fragments = vec![
            "2 (1".to_string(),
            "2)".to_string(),
            "cup flour".to_string(),
        ];
        let rejoined = rejoin_split_fragments(&fragments);
        assert_eq!(rejoined.len(), 1);
        assert!(rejoined[0].contains("flour"));
    }

    #[test]
    fn test_rejoin_keeps_real_entries_apart() {
        let fragments = vec![
            "2 cups flour".to_string(),
            "1 cup sugar".to_string(),
            "3 eggs".to_string(),
        ];
        assert_eq!(rejoin_split_fragments(&fragments).len(), 3);
    }

    #[test]
    fn test_dedup_resets_at_section_headers() {
        let lines = vec![
            "[A]".to_string(),
            "2 eggs".to_string(),
            "2 eggs".to_string(),
            "[B]".to_string(),
            "2 eggs".to_string(),
        ];
        let deduped = dedup_with_section_reset(lines);
        let egg_lines: Vec<_> = deduped.iter().filter(|l| l.text == "2 eggs").collect();
        assert_eq!(egg_lines.len(), 2);
        assert_eq!(egg_lines[0].section.as_deref(), Some("A"));
        assert_eq!(egg_lines[1].section.as_deref(), Some("B"));
    }

    #[test]
    fn test_iso_durations() {
        assert_eq!(parse_duration("PT30M").as_deref(), Some("30 minutes"));
        assert_eq!(parse_duration("PT1H30M").as_deref(), Some("1 hour 30 minutes"));
        assert_eq!(parse_duration("PT5400S").as_deref(), Some("1 hour 30 minutes"));
        assert_eq!(parse_duration("P1DT2H").as_deref(), Some("1 day 2 hours"));
        // Calendar months read as 30 days
        assert_eq!(parse_duration("P1M").as_deref(), Some("30 days"));
    }

    #[test]
    fn test_textual_durations() {
        assert_eq!(
            parse_duration("6 hours 20 minutes").as_deref(),
            Some("6 hours 20 minutes")
        );
        assert_eq!(parse_duration("45").as_deref(), Some("45 minutes"));
        assert_eq!(parse_duration("not a time"), None);
    }

    #[test]
    fn test_split_direction_text_sentences() {
        let steps = split_direction_text("Mix the dough. Rest for 1.5 hours. Bake until done.");
        assert_eq!(
            steps,
            vec!["Mix the dough.", "Rest for 1.5 hours.", "Bake until done."]
        );
    }

    #[test]
    fn test_yield_prefers_descriptive() {
        let node: Value =
            serde_json::from_str(r#"{"recipeYield": ["8", "8 servings"]}"#).unwrap();
        assert_eq!(yield_value(&node).as_deref(), Some("8 servings"));
    }

    #[test]
    fn test_nutrition_block() {
        let node: Value = serde_json::from_str(
            r#"{"nutrition": {"@type": "NutritionInformation", "calories": "240 kcal", "proteinContent": "8 g"}}"#,
        )
        .unwrap();
        let nutrition = nutrition_block(&node);
        assert_eq!(nutrition.get("calories").map(String::as_str), Some("240 kcal"));
        assert!(!nutrition.contains_key("@type"));
    }
}
