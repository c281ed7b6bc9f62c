//! Ingredient-line grammar.
//!
//! One raw line in, one structured ingredient out. The grammar is a fixed
//! priority cascade: the more specific patterns run first because the
//! looser ones would otherwise mask them. Parsing is total; a line that
//! matches nothing comes back with an empty name for the caller to filter.

use crate::model::{ParsedIngredient, RawIngredientLine};
use crate::text;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const GLYPHS: &str = "½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞";

static BRACKET_SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.*)$").expect("bracket section regex"));

static PAREN_SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\((for\s+[^)]+)\)\s*(.*)$").expect("paren section regex"));

static COLON_SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(for\s+(?:the\s+)?[^:,\d]{2,40}):?\s*$").expect("colon section regex"));

static FOOTNOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[*†]+|\[\d+\])\s*|\s*(?:[*†]+|\[\d+\])$").expect("footnote regex")
});

static TOP_UP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^top\s+(?:up\s+)?with\s+(.+)$").expect("top up regex"));

static COLON_AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^([^:\d]+):\s*((?:\d|[{GLYPHS}]).*)$"
    ))
    .expect("colon amount regex")
});

static BAKER_PERCENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?),\s*(\d+(?:\.\d+)?%)\s*[–—-]\s*(\S+)\s*(?:\(([^)]+)\))?\s*$")
        .expect("baker percent regex")
});

static COMMA_AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^([^,]+),\s*((?:\d|[{GLYPHS}]).*)$"
    ))
    .expect("comma amount regex")
});

static AS_NEEDED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?),\s*(as needed|to taste|as required)\.?$").expect("as needed regex")
});

static OPTIONAL_PAREN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(\s*optional[^)]*\)").expect("optional paren regex"));

static TRAILING_OPTIONAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[,;\s]+optional\s*$").expect("trailing optional regex"));

static PAREN_SPAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("paren span regex"));

static RATIO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*:\s*\d+").expect("ratio regex"));

static COMPOUND_AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(\d+)\s*([{GLYPHS}])")).expect("compound amount regex")
});

static FRACTION_AMOUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"[{GLYPHS}]")).expect("fraction amount regex"));

static TO_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(\d+(?:\.\d+)?|[{GLYPHS}])\s+to\s+(\d+(?:\.\d+)?|[{GLYPHS}])"
    ))
    .expect("to range regex")
});

static SIMPLE_AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(\s*[-–]\s*\d+(?:\.\d+)?)?").expect("simple amount regex")
});

/// Unit token immediately following an extracted amount
static UNIT_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(tbsp|tsp|cup|oz|lb|kg|g|ml|L|pinch|dash|cloves?|sprigs?|cans?|slices?|sticks?|bunch(?:es)?|heads?|packets?|packages?|stalks?|drops?|parts?)\b\.?",
    )
    .expect("unit token regex")
});

/// Quantity-plus-unit pattern anywhere in a line. Used by the generic
/// list sniffer (Tier C accepts lists with at least two such items).
static MEASUREMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:^|\s)(?:\d+(?:\.\d+)?|[{GLYPHS}]|\d+[{GLYPHS}])\s*(?:tbsp|tsp|cup|oz|lb|kg|g|ml|L|pinch|dash|cloves?|cans?|slices?|sticks?|bunch(?:es)?)\b"
    ))
    .expect("measurement regex")
});

/// Leading amount, as ingredient lines overwhelmingly start with one
static LEADING_AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:\d+(?:\.\d+)?|[{GLYPHS}]|\d+[{GLYPHS}])\s")).expect("leading amount")
});

/// A numbered direction step ("1. Mix well", "2) Bake")
static NUMBERED_STEP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*[.):]\s").expect("numbered step regex"));

/// Note that is only a weight ("600g", "32 oz") and therefore a poor
/// candidate for a salvaged name
static WEIGHT_ONLY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?:\d+(?:\.\d+)?|[{GLYPHS}]|\d+[{GLYPHS}])\s*(?:tbsp|tsp|cup|oz|lb|kg|g|ml|L)\s*$"
    ))
    .expect("weight only regex")
});

/// Parse one raw ingredient line into a structured ingredient.
///
/// Total: never fails. An unparseable line yields an empty-name entry
/// rather than an error; callers filter those out unless they double as
/// section markers.
pub fn parse_ingredient_line(raw: &str) -> ParsedIngredient {
    let line = text::normalize(raw);
    if line.is_empty() {
        return ParsedIngredient::default();
    }

    // Rule 1: inline section marker at line start
    if let Some(parsed) = rule_inline_section(&line) {
        return parsed;
    }

    // Rule 2: footnote markers are a pre-pass, not a terminal rule
    let line = strip_footnotes(&line);
    if line.is_empty() {
        return ParsedIngredient::default();
    }

    let rules: [fn(&str) -> Option<ParsedIngredient>; 5] = [
        rule_top_up,
        rule_colon_amount,
        rule_baker_percent,
        rule_comma_amount,
        rule_as_needed,
    ];
    for rule in rules {
        if let Some(parsed) = rule(&line) {
            return parsed;
        }
    }

    rule_general(&line)
}

/// Parse a batch of raw lines, attaching the section each line appeared
/// under and dropping empty results that are not section markers.
pub fn parse_ingredient_lines(lines: &[RawIngredientLine]) -> Vec<ParsedIngredient> {
    let mut parsed = Vec::with_capacity(lines.len());
    for raw in lines {
        let mut ingredient = parse_ingredient_line(&raw.text);
        if ingredient.section.is_none() {
            ingredient.section = raw.section.clone();
        }
        if !ingredient.name.is_empty() || ingredient.is_section_marker() {
            parsed.push(ingredient);
        }
    }
    parsed
}

/// Recognize a line that is purely a section header ("[For the sauce]",
/// "For the glaze:", "(For the filling)")
pub fn section_header(line: &str) -> Option<String> {
    let line = text::normalize(line);
    if let Some(caps) = BRACKET_SECTION_REGEX
        .captures(&line)
        .filter(|c| c[1].chars().any(|ch| ch.is_alphabetic()))
    {
        if caps[2].trim().is_empty() {
            return Some(caps[1].trim().to_string());
        }
    }
    if let Some(caps) = PAREN_SECTION_REGEX.captures(&line) {
        if caps[2].trim().is_empty() {
            return Some(text::sentence_case(caps[1].trim()));
        }
    }
    if let Some(caps) = COLON_SECTION_REGEX.captures(&line) {
        return Some(text::sentence_case(caps[1].trim()));
    }
    None
}

/// Does the line contain a quantity-plus-unit measurement anywhere?
pub fn contains_measurement(line: &str) -> bool {
    MEASUREMENT_REGEX.is_match(&text::normalize(line))
}

/// Shape test: does this look like an ingredient line? Ingredient lines
/// start with an amount; numbered direction steps do not count.
pub fn is_ingredient_shaped(line: &str) -> bool {
    let line = text::normalize(line);
    if NUMBERED_STEP_REGEX.is_match(&line) {
        return false;
    }
    if !LEADING_AMOUNT_REGEX.is_match(&line) {
        return false;
    }
    MEASUREMENT_REGEX.is_match(&line) || line.split_whitespace().count() <= 8
}

fn strip_footnotes(line: &str) -> String {
    let mut current = line.trim().to_string();
    loop {
        let next = FOOTNOTE_REGEX.replace_all(&current, "").trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn rule_inline_section(line: &str) -> Option<ParsedIngredient> {
    let (section, remainder) = if let Some(caps) = BRACKET_SECTION_REGEX
        .captures(line)
        .filter(|c| c[1].chars().any(|ch| ch.is_alphabetic()))
    {
        (caps[1].trim().to_string(), caps[2].trim().to_string())
    } else if let Some(caps) = PAREN_SECTION_REGEX.captures(line) {
        (
            text::sentence_case(caps[1].trim()),
            caps[2].trim().to_string(),
        )
    } else {
        return None;
    };

    if remainder.is_empty() {
        return Some(ParsedIngredient::section_marker(section));
    }
    let mut parsed = parse_ingredient_line(&remainder);
    parsed.section = Some(section);
    Some(parsed)
}

fn rule_top_up(line: &str) -> Option<ParsedIngredient> {
    let caps = TOP_UP_REGEX.captures(line)?;
    Some(ParsedIngredient {
        name: caps[1].trim().to_string(),
        amount: Some("Top".to_string()),
        ..Default::default()
    })
}

/// Cocktail card format: `Gin: 2 oz / 60 ml stirred`
fn rule_colon_amount(line: &str) -> Option<ParsedIngredient> {
    let caps = COLON_AMOUNT_REGEX.captures(line)?;
    let name = caps[1].trim().to_string();
    let rhs = caps[2].trim();

    let (primary, metric) = match rhs.split_once('/') {
        Some((p, m)) => (p.trim(), Some(m.trim())),
        None => (rhs, None),
    };

    let (amount, unit, rest) = take_amount(primary)?;
    let mut notes: Vec<String> = Vec::new();
    if !rest.trim().is_empty() {
        notes.push(rest.trim().to_string());
    }
    if let Some(metric) = metric {
        notes.push(metric.to_string());
    }

    Some(ParsedIngredient {
        name,
        amount: Some(amount),
        unit,
        preparation: join_notes(notes),
        ..Default::default()
    })
}

/// Bread-formula format: `All-Purpose Flour, 100% – 600g (4 ½ cup)`
fn rule_baker_percent(line: &str) -> Option<ParsedIngredient> {
    let caps = BAKER_PERCENT_REGEX.captures(line)?;
    Some(ParsedIngredient {
        name: caps[1].trim().to_string(),
        amount: Some(caps[3].trim().to_string()),
        baker_percent: Some(caps[2].to_string()),
        preparation: caps.get(4).map(|m| m.as_str().trim().to_string()),
        ..Default::default()
    })
}

/// `Flour, 2 cup (sifted)`
fn rule_comma_amount(line: &str) -> Option<ParsedIngredient> {
    let caps = COMMA_AMOUNT_REGEX.captures(line)?;
    let name = caps[1].trim().to_string();
    // A name carrying its own quantity means this is not the comma
    // format; the general rule handles it
    if name.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let rhs = caps[2].trim();

    let mut notes = Vec::new();
    let rhs_without_parens = PAREN_SPAN_REGEX
        .replace_all(rhs, |c: &Captures| {
            notes.push(c[1].trim().to_string());
            String::new()
        })
        .trim()
        .to_string();

    let (amount, unit, rest) = take_amount(&rhs_without_parens)?;
    // Anything after the amount is a preparation note, not part of the name
    if !rest.trim().is_empty() {
        notes.insert(0, rest.trim().to_string());
    }

    Some(ParsedIngredient {
        name,
        amount: Some(amount),
        unit,
        preparation: join_notes(notes),
        ..Default::default()
    })
}

fn rule_as_needed(line: &str) -> Option<ParsedIngredient> {
    let caps = AS_NEEDED_REGEX.captures(line)?;
    Some(ParsedIngredient {
        name: caps[1].trim().to_string(),
        preparation: Some(caps[2].to_lowercase()),
        ..Default::default()
    })
}

/// The general case: optional markers, parenthetical notes, amount
/// extraction, then a top-level-comma split into name and preparation.
fn rule_general(line: &str) -> ParsedIngredient {
    let mut working = line.to_string();
    let mut notes: Vec<String> = Vec::new();
    let mut is_optional = false;

    // Optional markers first so "(optional)" never lands in the notes
    if OPTIONAL_PAREN_REGEX.is_match(&working) {
        is_optional = true;
        working = OPTIONAL_PAREN_REGEX
            .replace_all(&working, "")
            .trim()
            .to_string();
        notes.push("optional".to_string());
    }
    if TRAILING_OPTIONAL_REGEX.is_match(&working) {
        is_optional = true;
        working = TRAILING_OPTIONAL_REGEX
            .replace_all(&working, "")
            .trim()
            .to_string();
        if !notes.iter().any(|n| n == "optional") {
            notes.push("optional".to_string());
        }
    }

    // Parenthetical spans, right to left, unless the span describes the
    // ingredient itself (a ratio, brix or syrup description)
    loop {
        let span = PAREN_SPAN_REGEX
            .captures_iter(&working)
            .last()
            .map(|c| (c.get(0).unwrap().range(), c[1].trim().to_string()));
        let Some((range, content)) = span else { break };
        if describes_ingredient(&content) {
            break;
        }
        notes.insert(0, content);
        working.replace_range(range, " ");
        working = working.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let (amount, unit, remainder) = match take_amount(&working) {
        Some((amount, unit, rest)) => (Some(amount), unit, rest),
        None => (None, None, working.clone()),
    };

    let (mut name, trailing_note) = split_top_level_comma(&remainder);
    if let Some(note) = trailing_note {
        notes.push(note);
    }
    name = name.trim_matches([' ', ',', '-', '–']).to_string();

    // Salvage: a nameless entry with notes usually mis-filed its name
    if name.is_empty() {
        if let Some(pos) = notes
            .iter()
            .position(|n| n != "optional" && !WEIGHT_ONLY_REGEX.is_match(n))
        {
            name = notes.remove(pos);
        }
    }

    ParsedIngredient {
        name,
        amount,
        unit,
        preparation: join_notes(notes),
        is_optional,
        ..Default::default()
    }
}

/// A parenthetical that is part of the ingredient identity rather than a
/// preparation note: ratios ("2:1"), brix and syrup descriptions
fn describes_ingredient(span: &str) -> bool {
    let lower = span.to_lowercase();
    RATIO_REGEX.is_match(span)
        || lower.contains("brix")
        || lower.contains("syrup")
        || lower.contains("ratio")
}

/// Extract the first amount from the text, trying the grammar's amount
/// shapes in priority order. Returns (amount, unit, remainder).
fn take_amount(input: &str) -> Option<(String, Option<String>, String)> {
    // Whole + fraction compound: "1 ½" or "1½"
    if let Some(m) = COMPOUND_AMOUNT_REGEX.captures(input) {
        let full = m.get(0).unwrap();
        let amount = format!("{}{}", &m[1], &m[2]);
        return Some(finish_amount(input, full.range(), amount));
    }
    // Standalone fraction: "¼ tsp"
    if let Some(m) = FRACTION_AMOUNT_REGEX.find(input) {
        return Some(finish_amount(input, m.range(), m.as_str().to_string()));
    }
    // "2 to 3 cup" range
    if let Some(m) = TO_RANGE_REGEX.captures(input) {
        let full = m.get(0).unwrap();
        let amount = format!("{} to {}", &m[1], &m[2]);
        return Some(finish_amount(input, full.range(), amount));
    }
    // Simple amount or dash range: "2", "2-3", "2.5"
    if let Some(m) = SIMPLE_AMOUNT_REGEX.find(input) {
        return Some(finish_amount(input, m.range(), m.as_str().to_string()));
    }
    None
}

fn finish_amount(
    input: &str,
    range: std::ops::Range<usize>,
    amount: String,
) -> (String, Option<String>, String) {
    let before = &input[..range.start];
    let after = &input[range.end..];

    let (unit, after) = match UNIT_TOKEN_REGEX.find(after) {
        Some(m) => (
            Some(canonical_unit(m.as_str())),
            after[m.end()..].to_string(),
        ),
        None => (None, after.to_string()),
    };

    let remainder = format!("{} {}", before.trim(), after.trim())
        .trim()
        .to_string();
    (amount, unit, remainder)
}

fn canonical_unit(token: &str) -> String {
    let token = token.trim().trim_end_matches('.');
    let canonical = text::canonicalize_units(token);
    let lower = canonical.to_lowercase();
    // Count-ish units are stored singular and lowercase
    match lower.as_str() {
        "cloves" => "clove".to_string(),
        "sprigs" => "sprig".to_string(),
        "cans" => "can".to_string(),
        "slices" => "slice".to_string(),
        "sticks" => "stick".to_string(),
        "bunches" => "bunch".to_string(),
        "heads" => "head".to_string(),
        "packets" => "packet".to_string(),
        "packages" => "package".to_string(),
        "stalks" => "stalk".to_string(),
        "drops" => "drop".to_string(),
        "parts" => "part".to_string(),
        _ if canonical == "L" => "L".to_string(),
        _ => lower,
    }
}

/// Split at the first comma that is not inside parentheses
fn split_top_level_comma(input: &str) -> (String, Option<String>) {
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                let name = input[..i].trim().to_string();
                let note = input[i + 1..].trim().to_string();
                let note = if note.is_empty() { None } else { Some(note) };
                return (name, note);
            }
            _ => {}
        }
    }
    (input.trim().to_string(), None)
}

fn join_notes(notes: Vec<String>) -> Option<String> {
    let filtered: Vec<String> = notes.into_iter().filter(|n| !n.is_empty()).collect();
    if filtered.is_empty() {
        None
    } else {
        Some(filtered.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_total() {
        for line in ["", "***", "()", "[", "!!!", "12345", "and then"] {
            let parsed = parse_ingredient_line(line);
            // Never panics; unparseable lines come back empty-named
            assert!(parsed.name.is_empty() || !parsed.name.is_empty());
        }
    }

    #[test]
    fn test_pure_section_marker() {
        let parsed = parse_ingredient_line("[For the sauce]");
        assert!(parsed.is_section_marker());
        assert_eq!(parsed.section.as_deref(), Some("For the sauce"));

        let parsed = parse_ingredient_line("(for the glaze)");
        assert!(parsed.is_section_marker());
        assert_eq!(parsed.section.as_deref(), Some("For the glaze"));
    }

    #[test]
    fn test_inline_section_with_remainder() {
        let parsed = parse_ingredient_line("[Dough] 2 cups flour");
        assert_eq!(parsed.section.as_deref(), Some("Dough"));
        assert_eq!(parsed.name, "flour");
        assert_eq!(parsed.amount.as_deref(), Some("2"));
        assert_eq!(parsed.unit.as_deref(), Some("cup"));
    }

    #[test]
    fn test_footnote_stripping() {
        let parsed = parse_ingredient_line("* 2 cups flour *");
        assert_eq!(parsed.name, "flour");
        assert_eq!(parsed.amount.as_deref(), Some("2"));

        let parsed = parse_ingredient_line("[1] 1 tsp salt");
        assert_eq!(parsed.name, "salt");
    }

    #[test]
    fn test_top_up_with() {
        let parsed = parse_ingredient_line("Top up with soda water");
        assert_eq!(parsed.name, "soda water");
        assert_eq!(parsed.amount.as_deref(), Some("Top"));
    }

    #[test]
    fn test_colon_cocktail_format() {
        let parsed = parse_ingredient_line("Gin: 2 oz / 60 ml");
        assert_eq!(parsed.name, "Gin");
        assert_eq!(parsed.amount.as_deref(), Some("2"));
        assert_eq!(parsed.unit.as_deref(), Some("oz"));
        assert_eq!(parsed.preparation.as_deref(), Some("60 ml"));
    }

    #[test]
    fn test_baker_percent_format() {
        let parsed = parse_ingredient_line("All-Purpose Flour, 100% – 600g (4 1/2 Cups)");
        assert_eq!(parsed.name, "All-Purpose Flour");
        assert_eq!(parsed.amount.as_deref(), Some("600g"));
        assert_eq!(parsed.baker_percent.as_deref(), Some("100%"));
        // Preparation carries the alternate measure in unicode fraction form
        assert_eq!(parsed.preparation.as_deref(), Some("4 ½ cup"));
    }

    #[test]
    fn test_comma_amount_format() {
        let parsed = parse_ingredient_line("Flour, 2 cups (sifted)");
        assert_eq!(parsed.name, "Flour");
        assert_eq!(parsed.amount.as_deref(), Some("2"));
        assert_eq!(parsed.unit.as_deref(), Some("cup"));
        assert_eq!(parsed.preparation.as_deref(), Some("sifted"));
    }

    #[test]
    fn test_as_needed() {
        let parsed = parse_ingredient_line("Kosher salt, to taste");
        assert_eq!(parsed.name, "Kosher salt");
        assert!(parsed.amount.is_none());
        assert_eq!(parsed.preparation.as_deref(), Some("to taste"));
    }

    #[test]
    fn test_general_simple() {
        let parsed = parse_ingredient_line("2 cups flour");
        assert_eq!(parsed.name, "flour");
        assert_eq!(parsed.amount.as_deref(), Some("2"));
        assert_eq!(parsed.unit.as_deref(), Some("cup"));
    }

    #[test]
    fn test_general_compound_fraction() {
        let parsed = parse_ingredient_line("1 1/2 cups sugar");
        assert_eq!(parsed.amount.as_deref(), Some("1½"));
        assert_eq!(parsed.unit.as_deref(), Some("cup"));
        assert_eq!(parsed.name, "sugar");
    }

    #[test]
    fn test_general_standalone_fraction() {
        let parsed = parse_ingredient_line("1/4 tsp nutmeg");
        assert_eq!(parsed.amount.as_deref(), Some("¼"));
        assert_eq!(parsed.unit.as_deref(), Some("tsp"));
        assert_eq!(parsed.name, "nutmeg");
    }

    #[test]
    fn test_general_to_range() {
        let parsed = parse_ingredient_line("2 to 3 tbsp olive oil");
        assert_eq!(parsed.amount.as_deref(), Some("2 to 3"));
        assert_eq!(parsed.unit.as_deref(), Some("tbsp"));
        assert_eq!(parsed.name, "olive oil");
    }

    #[test]
    fn test_general_dash_range() {
        let parsed = parse_ingredient_line("2-3 cloves garlic");
        assert_eq!(parsed.amount.as_deref(), Some("2-3"));
        assert_eq!(parsed.unit.as_deref(), Some("clove"));
        assert_eq!(parsed.name, "garlic");
    }

    #[test]
    fn test_optional_markers() {
        let parsed = parse_ingredient_line("1 tsp vanilla extract (optional)");
        assert!(parsed.is_optional);
        assert_eq!(parsed.name, "vanilla extract");

        let parsed = parse_ingredient_line("chopped cilantro, optional");
        assert!(parsed.is_optional);
        assert_eq!(parsed.name, "chopped cilantro");
    }

    #[test]
    fn test_parenthetical_notes_right_to_left() {
        let parsed = parse_ingredient_line("2 cups carrots (peeled) (diced)");
        assert_eq!(parsed.name, "carrots");
        assert_eq!(parsed.preparation.as_deref(), Some("peeled; diced"));
    }

    #[test]
    fn test_ratio_span_stays_in_name() {
        let parsed = parse_ingredient_line("1 oz simple syrup (2:1)");
        assert_eq!(parsed.name, "simple syrup (2:1)");
        assert!(parsed.preparation.is_none());
    }

    #[test]
    fn test_trailing_preparation_after_comma() {
        let parsed = parse_ingredient_line("1 cup butter, softened");
        assert_eq!(parsed.name, "butter");
        assert_eq!(parsed.preparation.as_deref(), Some("softened"));
    }

    #[test]
    fn test_comma_inside_parens_does_not_split() {
        let parsed = parse_ingredient_line("2 cups tomatoes (ripe, diced)");
        assert_eq!(parsed.name, "tomatoes");
        assert_eq!(parsed.preparation.as_deref(), Some("ripe, diced"));
    }

    #[test]
    fn test_salvage_promotes_note_to_name() {
        let parsed = parse_ingredient_line("(fresh basil leaves)");
        assert_eq!(parsed.name, "fresh basil leaves");
    }

    #[test]
    fn test_unparseable_line_yields_empty_name() {
        let parsed = parse_ingredient_line("~~~~~");
        assert!(parsed.name.is_empty());
        assert!(parsed.amount.is_none());
    }

    #[test]
    fn test_section_header_detection() {
        assert_eq!(
            section_header("For the sauce:").as_deref(),
            Some("For the sauce")
        );
        assert_eq!(
            section_header("[Garnish]").as_deref(),
            Some("Garnish")
        );
        assert!(section_header("2 cups flour").is_none());
    }

    #[test]
    fn test_ingredient_shape() {
        assert!(is_ingredient_shaped("2 cups flour"));
        assert!(is_ingredient_shaped("½ tsp salt"));
        assert!(!is_ingredient_shaped("Preheat the oven and wait for it to come to temperature before you start anything else"));
        assert!(!is_ingredient_shaped("Subscribe to my channel"));
    }

    #[test]
    fn test_batch_parsing_attaches_sections() {
        let lines = vec![
            RawIngredientLine::new("2 eggs", Some("Base".to_string())),
            RawIngredientLine::new("~~~", None),
        ];
        let parsed = parse_ingredient_lines(&lines);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].section.as_deref(), Some("Base"));
    }
}
