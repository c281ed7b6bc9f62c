use html_escape::decode_html_entities;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Residual markup left behind by sloppy structured-data exports
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

/// ASCII fraction with an optional single-digit numerator, word-boundary
/// guarded so dates ("11/2") and phone-number-ish runs are untouched
static ASCII_FRACTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d)/(\d{1,2})\b").expect("fraction regex"));

/// Decimal fraction with a single-digit whole part. Two-digit whole parts
/// ("10.5") never match because there is no word boundary between digits.
static DECIMAL_FRACTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d)\.(\d{1,3})\b").expect("decimal regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("whitespace regex"));

/// Measurement-unit spelling variants, canonicalized case-insensitively.
/// Canonical tokens map to themselves so normalization is idempotent.
static UNIT_VARIANTS: &[(&str, &str)] = &[
    (r"tablespoons?|tbsps?|tbs", "tbsp"),
    (r"teaspoons?|tsps?", "tsp"),
    (r"cups?", "cup"),
    (r"ounces?", "oz"),
    (r"pounds?|lbs?", "lb"),
    (r"kilograms?|kgs?", "kg"),
    (r"grams?|grs?", "g"),
    (r"milliliters?|millilitres?|mls?", "ml"),
    (r"liters?|litres?", "L"),
];

static UNIT_REGEXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    UNIT_VARIANTS
        .iter()
        .map(|(pattern, canonical)| {
            let re = Regex::new(&format!(r"(?i)\b(?:{pattern})\b")).expect("unit regex");
            (re, *canonical)
        })
        .collect()
});

/// A bare canonical unit token, used to decide whether a fragment is a
/// dangling measurement (see the split-ingredient rejoin)
static BARE_UNIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:tbsp|tsp|cup|oz|lb|kg|g|ml|L|pinch|dash|cloves?|sprigs?)\b")
        .expect("bare unit regex")
});

const FRACTION_GLYPHS: &[(&str, char)] = &[
    ("1/2", '½'),
    ("1/3", '⅓'),
    ("2/3", '⅔'),
    ("1/4", '¼'),
    ("3/4", '¾'),
    ("1/5", '⅕'),
    ("2/5", '⅖'),
    ("3/5", '⅗'),
    ("4/5", '⅘'),
    ("1/6", '⅙'),
    ("5/6", '⅚'),
    ("1/8", '⅛'),
    ("3/8", '⅜'),
    ("5/8", '⅝'),
    ("7/8", '⅞'),
];

const DECIMAL_GLYPHS: &[(&str, char)] = &[
    ("5", '½'),
    ("50", '½'),
    ("500", '½'),
    ("25", '¼'),
    ("250", '¼'),
    ("75", '¾'),
    ("750", '¾'),
    ("33", '⅓'),
    ("333", '⅓'),
    ("66", '⅔'),
    ("67", '⅔'),
    ("667", '⅔'),
    ("2", '⅕'),
    ("20", '⅕'),
    ("125", '⅛'),
    ("375", '⅜'),
    ("625", '⅝'),
    ("875", '⅞'),
];

/// Normalize a scrap of text pulled out of a web page: decode entities,
/// strip residual tags, convert fractions to unicode glyphs, and
/// canonicalize measurement-unit spellings.
///
/// Pure and idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let decoded = decode_entities(text);
    let stripped = strip_tags(&decoded);
    let fractions = convert_fractions(&stripped);
    let units = canonicalize_units(&fractions);
    WHITESPACE_REGEX.replace_all(&units, " ").trim().to_string()
}

/// Decode HTML/XML entities (named, decimal, hex).
/// Decoded twice: plenty of sites double-encode their structured data.
pub fn decode_entities(text: &str) -> String {
    let text = text.replace('\u{a0}', " ");
    decode_html_entities(&decode_html_entities(&text)).into_owned()
}

/// Remove residual markup tags from text that should be plain
pub fn strip_tags(text: &str) -> String {
    TAG_REGEX.replace_all(text, " ").into_owned()
}

/// Convert ASCII ("1/2") and decimal ("0.5") fractions to unicode glyphs.
/// Unknown fractions and multi-digit whole parts are left untouched.
pub fn convert_fractions(text: &str) -> String {
    let converted = ASCII_FRACTION_REGEX.replace_all(text, |caps: &Captures| {
        let key = format!("{}/{}", &caps[1], &caps[2]);
        match fraction_glyph(&key) {
            Some(glyph) => glyph.to_string(),
            None => caps[0].to_string(),
        }
    });

    DECIMAL_FRACTION_REGEX
        .replace_all(&converted, |caps: &Captures| {
            let whole = &caps[1];
            match decimal_glyph(&caps[2]) {
                Some(glyph) if whole == "0" => glyph.to_string(),
                Some(glyph) => format!("{whole}{glyph}"),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Canonicalize measurement-unit spelling variants to a single token
pub fn canonicalize_units(text: &str) -> String {
    let mut result = text.to_string();
    for (re, canonical) in UNIT_REGEXES.iter() {
        result = re.replace_all(&result, *canonical).into_owned();
    }
    result
}

pub fn fraction_glyph(ascii: &str) -> Option<char> {
    FRACTION_GLYPHS
        .iter()
        .find(|(key, _)| *key == ascii)
        .map(|(_, glyph)| *glyph)
}

fn decimal_glyph(digits: &str) -> Option<char> {
    DECIMAL_GLYPHS
        .iter()
        .find(|(key, _)| *key == digits)
        .map(|(_, glyph)| *glyph)
}

/// Numeric value of a unicode fraction glyph
pub fn glyph_value(c: char) -> Option<f64> {
    let value = match c {
        '½' => 0.5,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 0.25,
        '¾' => 0.75,
        '⅕' => 0.2,
        '⅖' => 0.4,
        '⅗' => 0.6,
        '⅘' => 0.8,
        '⅙' => 1.0 / 6.0,
        '⅚' => 5.0 / 6.0,
        '⅛' => 0.125,
        '⅜' => 0.375,
        '⅝' => 0.625,
        '⅞' => 0.875,
        _ => return None,
    };
    Some(value)
}

/// Does this fragment start with a bare measurement unit (no quantity)?
pub fn starts_with_bare_unit(fragment: &str) -> bool {
    BARE_UNIT_REGEX.is_match(fragment.trim_start())
}

/// Comparable magnitude for an amount string ("1½", "2", "¾", "2-3",
/// "1 ½"). Used only for ordering; amounts are stored as display strings.
pub fn amount_magnitude(amount: &str) -> Option<f64> {
    let amount = amount.trim();
    if amount.is_empty() {
        return None;
    }

    // Ranges compare by their lower bound
    let lower = amount
        .split(['-', '–'])
        .next()
        .unwrap_or(amount)
        .split(" to ")
        .next()
        .unwrap_or(amount)
        .trim();

    let mut total = 0.0;
    let mut digits = String::new();
    let mut seen_any = false;

    for c in lower.chars() {
        if c.is_ascii_digit() || c == '.' {
            digits.push(c);
        } else if let Some(value) = glyph_value(c) {
            if !digits.is_empty() {
                total += digits.parse::<f64>().ok()?;
                digits.clear();
            }
            total += value;
            seen_any = true;
        } else if !digits.is_empty() {
            total += digits.parse::<f64>().ok()?;
            digits.clear();
            seen_any = true;
        }
    }
    if !digits.is_empty() {
        total += digits.parse::<f64>().ok()?;
        seen_any = true;
    }

    if seen_any {
        Some(total)
    } else {
        None
    }
}

/// Uppercase the first alphabetic character, leaving the rest alone
pub fn sentence_case(text: &str) -> String {
    let trimmed = text.trim();
    let mut result = String::with_capacity(trimmed.len());
    let mut done = false;
    for c in trimmed.chars() {
        if !done && c.is_alphabetic() {
            result.extend(c.to_uppercase());
            done = true;
        } else {
            result.push(c);
        }
    }
    result
}

/// Ensure a direction string ends with terminal punctuation
pub fn ensure_terminal_punctuation(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return String::new();
    }
    match trimmed.chars().last() {
        Some('.') | Some('!') | Some('?') | Some(':') => trimmed.to_string(),
        _ => format!("{trimmed}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "1/2 cup sugar",
            "0.5 tablespoons butter",
            "2 &amp;amp; 3",
            "<b>1 1/2 cups</b> flour",
            "10.5 oz tomatoes",
            "3 tbsp olive oil",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_ascii_and_decimal_fractions_agree() {
        assert_eq!(normalize("0.5"), "½");
        assert_eq!(normalize("1/2"), "½");
        assert_eq!(normalize("0.25 tsp"), "¼ tsp");
        assert_eq!(normalize("3/4 cup"), "¾ cup");
    }

    #[test]
    fn test_compound_decimal_keeps_whole_part() {
        assert_eq!(normalize("1.5 cups"), "1½ cup");
    }

    #[test]
    fn test_decimal_guard_leaves_large_numbers() {
        assert_eq!(normalize("10.5 oz"), "10.5 oz");
        assert_eq!(normalize("350.25 degrees"), "350.25 degrees");
    }

    #[test]
    fn test_ascii_fraction_guard_leaves_dates() {
        // "11/2" reads as a date, not a fraction
        assert_eq!(normalize("11/2"), "11/2");
    }

    #[test]
    fn test_unit_canonicalization() {
        assert_eq!(normalize("2 tablespoons milk"), "2 tbsp milk");
        assert_eq!(normalize("2 tbs milk"), "2 tbsp milk");
        assert_eq!(normalize("3 teaspoons salt"), "3 tsp salt");
        assert_eq!(normalize("500 grams flour"), "500 g flour");
        assert_eq!(normalize("2 litres water"), "2 L water");
    }

    #[test]
    fn test_entity_decoding_twice() {
        assert_eq!(normalize("salt &amp;amp; pepper"), "salt & pepper");
        assert_eq!(normalize("crème fra&#238;che"), "crème fraîche");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(normalize("<p>Mix <b>well</b></p>"), "Mix well");
    }

    #[test]
    fn test_amount_magnitude() {
        assert_eq!(amount_magnitude("2"), Some(2.0));
        assert_eq!(amount_magnitude("½"), Some(0.5));
        assert_eq!(amount_magnitude("1½"), Some(1.5));
        assert_eq!(amount_magnitude("1 ½"), Some(1.5));
        assert_eq!(amount_magnitude("2-3"), Some(2.0));
        assert_eq!(amount_magnitude("Top"), None);
        assert_eq!(amount_magnitude(""), None);
    }

    #[test]
    fn test_sentence_case_and_punctuation() {
        assert_eq!(sentence_case("mix the dough"), "Mix the dough");
        assert_eq!(
            ensure_terminal_punctuation("mix the dough"),
            "mix the dough."
        );
        assert_eq!(
            ensure_terminal_punctuation("mix the dough!"),
            "mix the dough!"
        );
    }
}
