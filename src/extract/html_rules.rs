//! Heuristic HTML extraction, used when structured data yields nothing.
//!
//! Ingredients come from an ordered cascade of tiers, each attempted only
//! when the one before produced zero lines. Every tier is strictly weaker
//! evidence than the last, and the tier that finally produced the list is
//! recorded so confidence scoring can reflect it.

use super::{clean_directions, og_image, Extractor, ParsingContext};
use crate::classify::{self, CourseSignals};
use crate::confidence;
use crate::error::ImportError;
use crate::ingredient;
use crate::model::{ImportedRecipe, ProvenanceTier, RawIngredientLine};
use crate::text;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

pub struct HtmlRulesExtractor;

// Recipe-plugin class families. The first classes are the big WordPress
// plugins (WPRM, Tasty, Create by Mediavine, WP Zoom); the rest are the
// long tail of hand-rolled themes.
static TITLE_CLASSES: &[&str] = &[
    "wprm-recipe-name",
    "tasty-recipes-title",
    "mv-create-title",
    "wpzoom-recipe-card-title",
    "recipe-name",
    "recipe-title",
    "recipe-card-title",
    "recipe-header-title",
];

static INGREDIENT_CONTAINER_CLASSES: &[&str] = &[
    "wprm-recipe-ingredients-container",
    "tasty-recipes-ingredients",
    "mv-create-ingredients",
    "wpzoom-recipe-ingredients",
    "recipe-ingredients",
    "recipe-ingredient-list",
    "recipe-card-ingredients",
    "structured-ingredients",
];

static INGREDIENT_GROUP_CLASSES: &[&str] = &[
    "wprm-recipe-ingredient-group",
    "tasty-recipes-ingredients-body",
    "ingredient-group",
];

static GROUP_NAME_CLASSES: &[&str] = &[
    "wprm-recipe-group-name",
    "wprm-recipe-ingredient-group-name",
    "ingredient-group-name",
];

static INSTRUCTION_CONTAINER_CLASSES: &[&str] = &[
    "wprm-recipe-instructions-container",
    "tasty-recipes-instructions",
    "mv-create-instructions",
    "wpzoom-recipe-instructions",
    "recipe-instructions",
    "recipe-instruction-list",
    "recipe-card-instructions",
    "recipe-directions",
    "directions",
];

static EQUIPMENT_CLASSES: &[&str] = &[
    "wprm-recipe-equipment-container",
    "recipe-equipment",
    "equipment-list",
];

static PREP_TIME_CLASSES: &[&str] = &[
    "wprm-recipe-prep-time",
    "tasty-recipes-prep-time",
    "mv-create-time-prep",
    "recipe-prep-time",
    "prep-time",
];

static COOK_TIME_CLASSES: &[&str] = &[
    "wprm-recipe-cook-time",
    "tasty-recipes-cook-time",
    "mv-create-time-active",
    "recipe-cook-time",
    "cook-time",
];

static TOTAL_TIME_CLASSES: &[&str] = &[
    "wprm-recipe-total-time",
    "tasty-recipes-total-time",
    "mv-create-time-total",
    "recipe-total-time",
    "total-time",
];

static SERVINGS_CLASSES: &[&str] = &[
    "wprm-recipe-servings",
    "tasty-recipes-yield",
    "mv-create-yield",
    "recipe-servings",
    "recipe-yield",
];

static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector"));

static LIST_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul, ol").expect("list selector"));

static LI_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").expect("li"));

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("body"));

static BULLET_SPLIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[•▪‣◦]|\s[-–*]\s").expect("bullet regex"));

/// Raw "number + unit (+ name)" spans harvested straight out of
/// unstructured text, the last-resort tier
static FREE_TEXT_INGREDIENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?|[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞]|\d+\s*[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])\s*(tbsp|tsp|cup|oz|lb|kg|g|ml|L)\b\s+(?:of\s+)?([a-z][a-z '\-]{2,40})",
    )
    .expect("free text ingredient regex")
});

static SERVES_TEXT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:serves|servings?|yields?|makes)[:\s]+([\w ]{1,24}?)(?:\.|,|$)")
        .expect("serves regex")
});

static TIME_TEXT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(prep|cook|total)\s*time[:\s]+([\w ]{1,30}?)(?:\.|,|\n|$)")
        .expect("time regex")
});

struct IngredientHarvest {
    lines: Vec<RawIngredientLine>,
    tier: ProvenanceTier,
}

/// Diagnostics: does the page have recipe-shaped headings at all?
pub fn has_heading_patterns(document: &Html) -> bool {
    document.select(&HEADING_SELECTOR).any(|h| {
        let heading = element_text(&h).to_lowercase();
        heading.contains("ingredient")
            || heading.contains("direction")
            || heading.contains("instruction")
            || heading.contains("method")
    })
}

/// Sectioned ingredient list from recipe-plugin group markup, for the
/// structured-data extractor's asymmetric merge. Only returns lines when
/// at least one group heading is present.
pub fn grouped_ingredient_lines(document: &Html) -> Option<Vec<RawIngredientLine>> {
    for group_class in INGREDIENT_GROUP_CLASSES {
        let Ok(selector) = Selector::parse(&format!(".{group_class}")) else {
            continue;
        };
        let mut lines = Vec::new();
        let mut saw_group_name = false;

        for group in document.select(&selector) {
            let section = GROUP_NAME_CLASSES.iter().find_map(|name_class| {
                let sel = Selector::parse(&format!(".{name_class}")).ok()?;
                group.select(&sel).next().map(|el| element_text(&el))
            });
            if section.is_some() {
                saw_group_name = true;
            }
            for li in group.select(&LI_SELECTOR) {
                let item = element_text(&li);
                if !item.is_empty() {
                    lines.push(RawIngredientLine::new(item, section.clone()));
                }
            }
        }

        if saw_group_name && !lines.is_empty() {
            return Some(lines);
        }
    }
    None
}

impl Extractor for HtmlRulesExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<ImportedRecipe, ImportError> {
        let document = &context.document;

        let harvest = harvest_ingredients(document);
        let (raw_directions, directions_tier) = harvest_directions(document);
        let directions = clean_directions(raw_directions.clone());

        let Some(harvest) = harvest else {
            if directions.is_empty() {
                return Err(ImportError::Parse(
                    "no ingredient or direction tier matched".to_string(),
                ));
            }
            return Ok(directions_only_result(
                context,
                raw_directions,
                directions,
                directions_tier,
            ));
        };

        let parsed = ingredient::parse_ingredient_lines(&harvest.lines);
        let name = extract_name(document);

        // Drink-specific sub-extraction runs independently of the
        // ingredient cascade
        let (glass, garnishes) = extract_glass_and_garnish(document);
        let equipment = extract_equipment(document);

        let (prep_time, cook_time, time, times_tier) = extract_times(document);
        let (serves, serves_tier) = extract_serves(document);

        let ingredient_names: Vec<String> = parsed
            .iter()
            .filter(|i| !i.name.is_empty())
            .map(|i| i.name.clone())
            .collect();
        let ingredient_text = ingredient_names.join(" ");

        let classification = classify::classify(&CourseSignals {
            title: name.as_deref().unwrap_or(""),
            category: None,
            cuisine: None,
            keywords: &ingredient_text,
            description: "",
            ingredient_names,
            source_url: Some(&context.url),
        });

        let raw_count = harvest
            .lines
            .iter()
            .filter(|l| ingredient::section_header(&l.text).is_none())
            .count();

        let mut confidences = confidence::score_fields(
            harvest.tier,
            name.is_some(),
            classification.confidence,
            classification.cuisine.is_some(),
            &parsed,
            raw_count,
            directions.len(),
            serves.is_some(),
            time.is_some() || prep_time.is_some() || cook_time.is_some(),
        );
        // Fields found outside the ingredient tier rescore on their own
        confidences.directions = confidence::directions(directions_tier, directions.len());
        confidences.serves = confidence::scalar(serves_tier, serves.is_some());
        confidences.time = confidence::scalar(
            times_tier,
            time.is_some() || prep_time.is_some() || cook_time.is_some(),
        );

        let images = og_image(document).into_iter().collect();

        Ok(ImportedRecipe {
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
            images,
            equipment,
            glass,
            garnishes,
            raw_ingredients: harvest.lines.into_iter().map(|l| l.text).collect(),
            raw_directions,
            source_url: Some(context.url.clone()),
            confidences,
            ..Default::default()
        })
    }
}

fn directions_only_result(
    context: &ParsingContext,
    raw_directions: Vec<String>,
    directions: Vec<String>,
    tier: ProvenanceTier,
) -> ImportedRecipe {
    let name = extract_name(&context.document);
    let classification = classify::classify(&CourseSignals {
        title: name.as_deref().unwrap_or(""),
        source_url: Some(&context.url),
        ..Default::default()
    });
    let confidences = confidence::score_fields(
        tier,
        name.is_some(),
        classification.confidence,
        false,
        &[],
        0,
        directions.len(),
        false,
        false,
    );
    ImportedRecipe {
        name,
        course: Some(classification.course),
        directions,
        raw_directions,
        source_url: Some(context.url.clone()),
        confidences,
        ..Default::default()
    }
}

/// The ingredient cascade: plugin markup, heading inference, generic
/// list sniffing, then free-text mining. Each tier runs only when the
/// previous produced zero lines.
fn harvest_ingredients(document: &Html) -> Option<IngredientHarvest> {
    if let Some(lines) = tier_plugin_markup(document) {
        debug!("HtmlRulesExtractor: plugin markup yielded {} lines", lines.len());
        return Some(IngredientHarvest {
            lines,
            tier: ProvenanceTier::PluginMarkup,
        });
    }
    if let Some(lines) = tier_heading_inference(document, &["ingredient"]) {
        debug!("HtmlRulesExtractor: heading inference yielded {} lines", lines.len());
        return Some(IngredientHarvest {
            lines,
            tier: ProvenanceTier::HeadingInference,
        });
    }
    if let Some(lines) = tier_list_sniffing(document) {
        debug!("HtmlRulesExtractor: list sniffing yielded {} lines", lines.len());
        return Some(IngredientHarvest {
            lines,
            tier: ProvenanceTier::ListSniffing,
        });
    }
    if let Some(lines) = tier_free_text(document) {
        debug!("HtmlRulesExtractor: free-text mining yielded {} lines", lines.len());
        return Some(IngredientHarvest {
            lines,
            tier: ProvenanceTier::FreeText,
        });
    }
    None
}

/// Tier A: fixed recipe-plugin class families
fn tier_plugin_markup(document: &Html) -> Option<Vec<RawIngredientLine>> {
    if let Some(lines) = grouped_ingredient_lines(document) {
        return Some(lines);
    }
    for class in INGREDIENT_CONTAINER_CLASSES {
        let Ok(selector) = Selector::parse(&format!(".{class}")) else {
            continue;
        };
        let mut lines = Vec::new();
        for container in document.select(&selector) {
            for li in container.select(&LI_SELECTOR) {
                let item = element_text(&li);
                if !item.is_empty() {
                    lines.push(RawIngredientLine::new(item, None));
                }
            }
        }
        if !lines.is_empty() {
            return Some(lines);
        }
    }
    None
}

/// Tier B: find a heading naming the zone, then walk following siblings
/// collecting list items until the next same-or-higher-level heading.
/// Sub-headings along the way become inline section markers.
fn tier_heading_inference(
    document: &Html,
    heading_keywords: &[&str],
) -> Option<Vec<RawIngredientLine>> {
    let heading = find_heading(document, heading_keywords)?;
    let start_level = heading_level(&heading)?;
    let mut lines = Vec::new();
    let mut current_section: Option<String> = None;

    for sibling in heading.next_siblings() {
        let Some(element) = ElementRef::wrap(sibling) else {
            continue;
        };
        if let Some(level) = heading_level(&element) {
            if level <= start_level {
                break;
            }
            let section = element_text(&element);
            if !section.is_empty() {
                current_section = Some(section);
            }
            continue;
        }
        // Sub-headings and lists may be nested one container down
        for li in element.select(&LI_SELECTOR) {
            let item = element_text(&li);
            if !item.is_empty() {
                lines.push(RawIngredientLine::new(item, current_section.clone()));
            }
        }
        if element.value().name() == "li" {
            let item = element_text(&element);
            if !item.is_empty() {
                lines.push(RawIngredientLine::new(item, current_section.clone()));
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

/// Tier C: any list where at least two items carry a measurement
fn tier_list_sniffing(document: &Html) -> Option<Vec<RawIngredientLine>> {
    for list in document.select(&LIST_SELECTOR) {
        let items: Vec<String> = list
            .select(&LI_SELECTOR)
            .map(|li| element_text(&li))
            .filter(|t| !t.is_empty())
            .collect();
        let measured = items
            .iter()
            .filter(|i| ingredient::contains_measurement(i))
            .count();
        if measured >= 2 {
            return Some(
                items
                    .into_iter()
                    .map(|i| RawIngredientLine::new(i, None))
                    .collect(),
            );
        }
    }
    None
}

/// Tier D: free-text mining over the whole page body
fn tier_free_text(document: &Html) -> Option<Vec<RawIngredientLine>> {
    let body = document.select(&BODY_SELECTOR).next()?;
    let body_text = body.text().collect::<Vec<_>>().join("\n");

    // Bullet-character splitting
    let bullet_lines: Vec<String> = BULLET_SPLIT_REGEX
        .split(&body_text)
        .map(str::trim)
        .filter(|l| ingredient::is_ingredient_shaped(l))
        .map(String::from)
        .collect();
    if bullet_lines.len() >= 2 {
        return Some(
            bullet_lines
                .into_iter()
                .map(|l| RawIngredientLine::new(l, None))
                .collect(),
        );
    }

    // Line scanning within an "ingredients" zone
    if let Some(lines) = scan_ingredient_zone(&body_text) {
        return Some(lines);
    }

    // Raw regex harvesting of "number + unit (+ name)" spans
    let harvested: Vec<String> = FREE_TEXT_INGREDIENT_REGEX
        .captures_iter(&body_text)
        .map(|caps| caps[0].trim().to_string())
        .collect();
    if harvested.len() >= 2 {
        return Some(
            harvested
                .into_iter()
                .map(|l| RawIngredientLine::new(l, None))
                .collect(),
        );
    }

    None
}

fn scan_ingredient_zone(body_text: &str) -> Option<Vec<RawIngredientLine>> {
    let lines: Vec<&str> = body_text.lines().map(str::trim).collect();
    let zone_start = lines
        .iter()
        .position(|l| l.to_lowercase().contains("ingredients"))?;

    let mut collected = Vec::new();
    for line in lines.iter().skip(zone_start + 1) {
        let lower = line.to_lowercase();
        if lower.contains("direction") || lower.contains("instruction") || lower.contains("method")
        {
            break;
        }
        if line.is_empty() {
            if !collected.is_empty() {
                break;
            }
            continue;
        }
        if ingredient::is_ingredient_shaped(line) {
            collected.push(RawIngredientLine::new(line.to_string(), None));
        } else if !collected.is_empty() {
            break;
        }
    }

    if collected.len() >= 2 {
        Some(collected)
    } else {
        None
    }
}

/// The direction cascade: explicit instruction markup, heading-driven
/// step sections (sub-headings become bolded step titles), then an
/// ordered-list fallback.
fn harvest_directions(document: &Html) -> (Vec<String>, ProvenanceTier) {
    for class in INSTRUCTION_CONTAINER_CLASSES {
        let Ok(selector) = Selector::parse(&format!(".{class}")) else {
            continue;
        };
        let mut steps = Vec::new();
        for container in document.select(&selector) {
            for li in container.select(&LI_SELECTOR) {
                let step = element_text(&li);
                if !step.is_empty() {
                    steps.push(step);
                }
            }
            if steps.is_empty() {
                // Some plugins mark up steps as paragraphs or divs
                if let Ok(p_selector) = Selector::parse("p") {
                    for p in container.select(&p_selector) {
                        let step = element_text(&p);
                        if !step.is_empty() {
                            steps.push(step);
                        }
                    }
                }
            }
        }
        if !steps.is_empty() {
            return (steps, ProvenanceTier::PluginMarkup);
        }
    }

    if let Some(steps) = heading_driven_directions(document) {
        return (steps, ProvenanceTier::HeadingInference);
    }

    // Ordered-list fallback
    if let Ok(ol_selector) = Selector::parse("ol") {
        for list in document.select(&ol_selector) {
            let steps: Vec<String> = list
                .select(&LI_SELECTOR)
                .map(|li| element_text(&li))
                .filter(|t| !t.is_empty() && !ingredient::is_ingredient_shaped(t))
                .collect();
            if steps.len() >= 2 {
                return (steps, ProvenanceTier::ListSniffing);
            }
        }
    }

    (Vec::new(), ProvenanceTier::Fallback)
}

fn heading_driven_directions(document: &Html) -> Option<Vec<String>> {
    let heading = find_heading(document, &["direction", "instruction", "method", "steps"])?;
    let start_level = heading_level(&heading)?;
    let mut steps = Vec::new();

    for sibling in heading.next_siblings() {
        let Some(element) = ElementRef::wrap(sibling) else {
            continue;
        };
        if let Some(level) = heading_level(&element) {
            if level <= start_level {
                break;
            }
            // Sub-heading becomes a bolded step title to preserve grouping
            let title = element_text(&element);
            if !title.is_empty() {
                steps.push(format!("**{title}**"));
            }
            continue;
        }
        let items: Vec<String> = element
            .select(&LI_SELECTOR)
            .map(|li| element_text(&li))
            .filter(|t| !t.is_empty())
            .collect();
        if items.is_empty() {
            let tag = element.value().name();
            if tag == "p" || tag == "li" {
                let step = element_text(&element);
                if !step.is_empty() {
                    steps.push(step);
                }
            }
        } else {
            steps.extend(items);
        }
    }

    if steps.is_empty() {
        None
    } else {
        Some(steps)
    }
}

/// Glass and garnish extraction for drinks. Handles separate "glass" and
/// "garnish" headings and the combined "glass and garnish" heading where
/// the first item is the glass and the rest are garnishes.
fn extract_glass_and_garnish(document: &Html) -> (Option<String>, Vec<String>) {
    if let Some(combined) = tier_heading_inference(document, &["glass and garnish"]) {
        let mut items = combined.into_iter().map(|l| l.text);
        let glass = items.next();
        return (glass, items.collect());
    }

    let glass = tier_heading_inference(document, &["glass"])
        .and_then(|lines| lines.into_iter().next())
        .map(|l| l.text);
    let garnishes = tier_heading_inference(document, &["garnish"])
        .map(|lines| lines.into_iter().map(|l| l.text).collect())
        .unwrap_or_default();
    (glass, garnishes)
}

fn extract_equipment(document: &Html) -> Vec<String> {
    for class in EQUIPMENT_CLASSES {
        let Ok(selector) = Selector::parse(&format!(".{class}")) else {
            continue;
        };
        let mut items = Vec::new();
        for container in document.select(&selector) {
            for li in container.select(&LI_SELECTOR) {
                let item = element_text(&li);
                if !item.is_empty() {
                    items.push(item);
                }
            }
        }
        if !items.is_empty() {
            return items;
        }
    }
    tier_heading_inference(document, &["equipment"])
        .map(|lines| lines.into_iter().map(|l| l.text).collect())
        .unwrap_or_default()
}

fn extract_times(
    document: &Html,
) -> (Option<String>, Option<String>, Option<String>, ProvenanceTier) {
    let prep = first_class_text(document, PREP_TIME_CLASSES);
    let cook = first_class_text(document, COOK_TIME_CLASSES);
    let total = first_class_text(document, TOTAL_TIME_CLASSES);
    if prep.is_some() || cook.is_some() || total.is_some() {
        return (prep, cook, total, ProvenanceTier::PluginMarkup);
    }

    // Free-text fallback over the body
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return (None, None, None, ProvenanceTier::FreeText);
    };
    let body_text = body.text().collect::<Vec<_>>().join("\n");
    let mut prep = None;
    let mut cook = None;
    let mut total = None;
    for caps in TIME_TEXT_REGEX.captures_iter(&body_text) {
        let value = caps[2].trim().to_string();
        match caps[1].to_lowercase().as_str() {
            "prep" if prep.is_none() => prep = Some(value),
            "cook" if cook.is_none() => cook = Some(value),
            "total" if total.is_none() => total = Some(value),
            _ => {}
        }
    }
    (prep, cook, total, ProvenanceTier::FreeText)
}

fn extract_serves(document: &Html) -> (Option<String>, ProvenanceTier) {
    if let Some(serves) = first_class_text(document, SERVINGS_CLASSES) {
        return (Some(serves), ProvenanceTier::PluginMarkup);
    }
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return (None, ProvenanceTier::FreeText);
    };
    let body_text = body.text().collect::<Vec<_>>().join("\n");
    let serves = SERVES_TEXT_REGEX
        .captures(&body_text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty());
    (serves, ProvenanceTier::FreeText)
}

fn extract_name(document: &Html) -> Option<String> {
    if let Some(name) = first_class_text(document, TITLE_CLASSES) {
        return Some(name);
    }
    let h1 = Selector::parse("h1, h2").ok()?;
    document
        .select(&h1)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
}

fn first_class_text(document: &Html, classes: &[&str]) -> Option<String> {
    for class in classes {
        let Ok(selector) = Selector::parse(&format!(".{class}")) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let content = element_text(&element);
            if !content.is_empty() {
                return Some(content);
            }
        }
    }
    None
}

fn find_heading<'a>(document: &'a Html, keywords: &[&str]) -> Option<ElementRef<'a>> {
    document.select(&HEADING_SELECTOR).find(|h| {
        let heading = element_text(h).to_lowercase();
        keywords.iter().any(|k| heading.contains(k))
    })
}

fn heading_level(element: &ElementRef) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn element_text(element: &ElementRef) -> String {
    text::normalize(&element.text().collect::<Vec<_>>().join(" "))
}
