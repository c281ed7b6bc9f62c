//! Course, cuisine and base-spirit classification.
//!
//! All tables are read-only statics checked in a fixed order, first match
//! wins. The detect-all pass is deliberately separate from the single
//! course guess: several categories can plausibly apply, and the reviewer
//! sees the full set.

use crate::model::ClassificationResult;
use url::Url;

/// Sites that only publish cocktails. Membership short-circuits course
/// classification at the highest confidence tier.
static COCKTAIL_SITES: &[&str] = &[
    "liquor.com",
    "diffordsguide.com",
    "punchdrink.com",
    "imbibemagazine.com",
    "thecocktaildb.com",
    "kindredcocktails.com",
    "tuxedono2.com",
    "cocktailvirgin.blogspot.com",
];

static DRINK_KEYWORDS: &[&str] = &[
    "cocktail",
    "mocktail",
    "drink",
    "beverage",
    "highball",
    "martini",
    "margarita",
    "negroni",
    "daiquiri",
    "old fashioned",
    "spritz",
    "punch",
    "toddy",
    "mule",
    "smoothie",
    "milkshake",
    "liqueur",
    "shrub",
];

static MODERNIST_KEYWORDS: &[&str] = &[
    "modernist",
    "molecular",
    "gastronomy",
    "spherification",
    "hydrocolloid",
    "gellan",
    "xanthan",
    "agar",
    "transglutaminase",
    "centrifuge",
    "rotovap",
    "clarified milk",
];

static MODERNIST_URL_TOKENS: &[&str] = &["modernist", "molecular", "chefsteps"];

/// Explicit-category keyword table, checked in order
static CATEGORY_COURSES: &[(&str, &str)] = &[
    ("dessert", "Desserts"),
    ("appetizer", "Appetizers"),
    ("starter", "Appetizers"),
    ("hors d'oeuvre", "Appetizers"),
    ("soup", "Soups"),
    ("stew", "Soups"),
    ("salad", "Sides"),
    ("side", "Sides"),
    ("bread", "Breads"),
    ("breakfast", "Breakfast"),
    ("brunch", "Breakfast"),
    ("main", "Mains"),
    ("dinner", "Mains"),
    ("entree", "Mains"),
    ("entrée", "Mains"),
    ("sauce", "Sauces"),
    ("condiment", "Sauces"),
    ("pizza", "Pizza"),
];

/// Title keyword families for the fallback pass and the detect-all pass
static TITLE_COURSES: &[(&str, &[&str])] = &[
    (
        "Breads",
        &[
            "bread", "sourdough", "baguette", "focaccia", "loaf", "bagel", "brioche", "ciabatta",
        ],
    ),
    (
        "Soups",
        &["soup", "stew", "chowder", "bisque", "broth", "ramen"],
    ),
    (
        "Desserts",
        &[
            "cake",
            "cookie",
            "brownie",
            "pie",
            "tart",
            "ice cream",
            "pudding",
            "custard",
            "dessert",
            "cheesecake",
            "macaron",
        ],
    ),
    (
        "Sauces",
        &[
            "sauce",
            "dressing",
            "vinaigrette",
            "aioli",
            "salsa",
            "pesto",
            "gravy",
            "marinade",
        ],
    ),
    ("Pizza", &["pizza"]),
    (
        "Smoking",
        &["smoked", "smoker", "bbq", "barbecue", "brisket", "pellet grill"],
    ),
    (
        "Appetizers",
        &["appetizer", "dip", "crostini", "bruschetta"],
    ),
    (
        "Breakfast",
        &["breakfast", "pancake", "waffle", "granola", "oatmeal"],
    ),
    ("Sides", &["salad", "slaw", "side"]),
];

/// Regional adjectives to canonical cuisine names
static CUISINE_MAP: &[(&str, &str)] = &[
    ("tex-mex", "Mexican"),
    ("mexican", "Mexican"),
    ("italian", "Italian"),
    ("sicilian", "Italian"),
    ("french", "French"),
    ("provencal", "French"),
    ("chinese", "Chinese"),
    ("szechuan", "Chinese"),
    ("sichuan", "Chinese"),
    ("cantonese", "Chinese"),
    ("japanese", "Japanese"),
    ("thai", "Thai"),
    ("vietnamese", "Vietnamese"),
    ("korean", "Korean"),
    ("indian", "Indian"),
    ("punjabi", "Indian"),
    ("greek", "Greek"),
    ("spanish", "Spanish"),
    ("basque", "Spanish"),
    ("german", "German"),
    ("scandinavian", "Nordic"),
    ("nordic", "Nordic"),
    ("swedish", "Nordic"),
    ("norwegian", "Nordic"),
    ("danish", "Nordic"),
    ("middle eastern", "Middle Eastern"),
    ("lebanese", "Middle Eastern"),
    ("persian", "Middle Eastern"),
    ("israeli", "Middle Eastern"),
    ("moroccan", "Moroccan"),
    ("cajun", "Cajun"),
    ("creole", "Cajun"),
    ("southern", "American"),
    ("american", "American"),
    ("caribbean", "Caribbean"),
    ("cuban", "Caribbean"),
    ("jamaican", "Caribbean"),
    ("brazilian", "Brazilian"),
    ("peruvian", "Peruvian"),
    ("british", "British"),
    ("english", "British"),
    ("irish", "Irish"),
    ("scottish", "British"),
    ("turkish", "Turkish"),
    ("ethiopian", "Ethiopian"),
    ("filipino", "Filipino"),
    ("indonesian", "Indonesian"),
    ("malaysian", "Malaysian"),
    ("polish", "Polish"),
    ("russian", "Russian"),
    ("portuguese", "Portuguese"),
    ("hawaiian", "Hawaiian"),
    ("mediterranean", "Mediterranean"),
];

/// Spirit taxonomy, most specific entries first so "rye whiskey" wins
/// over "whiskey"
static SPIRITS: &[(&str, &str)] = &[
    ("rye whiskey", "Rye"),
    ("white rum", "Rum"),
    ("dark rum", "Rum"),
    ("aged rum", "Rum"),
    ("bourbon", "Bourbon"),
    ("rye", "Rye"),
    ("scotch", "Scotch"),
    ("whiskey", "Whiskey"),
    ("whisky", "Whiskey"),
    ("gin", "Gin"),
    ("vodka", "Vodka"),
    ("rum", "Rum"),
    ("tequila", "Tequila"),
    ("mezcal", "Mezcal"),
    ("cognac", "Cognac"),
    ("brandy", "Brandy"),
    ("pisco", "Pisco"),
    ("cachaça", "Cachaça"),
    ("cachaca", "Cachaça"),
    ("absinthe", "Absinthe"),
    ("aperol", "Aperol"),
    ("campari", "Campari"),
    ("amaro", "Amaro"),
    ("vermouth", "Vermouth"),
    ("sherry", "Sherry"),
    ("champagne", "Champagne"),
    ("prosecco", "Prosecco"),
    ("sake", "Sake"),
];

/// Everything the classifier is allowed to look at
#[derive(Debug, Default)]
pub struct CourseSignals<'a> {
    pub title: &'a str,
    pub category: Option<&'a str>,
    pub cuisine: Option<&'a str>,
    pub keywords: &'a str,
    pub description: &'a str,
    pub ingredient_names: Vec<String>,
    pub source_url: Option<&'a str>,
}

// Confidence levels for the course guess, by how it was derived
const CONF_COCKTAIL_SITE: f32 = 0.95;
const CONF_EXPLICIT_CATEGORY: f32 = 0.85;
const CONF_KEYWORD: f32 = 0.7;
const CONF_TITLE_KEYWORD: f32 = 0.6;
const CONF_DIET_CATEGORY: f32 = 0.55;
const CONF_DEFAULT: f32 = 0.3;

/// Classify course, cuisine and (for drinks) base spirit.
///
/// Precedence is fixed: cocktail-site membership, drink keywords,
/// modernist keywords, explicit category table, title keywords, explicit
/// vegetarian/vegan category, then the "Mains" default.
pub fn classify(signals: &CourseSignals) -> ClassificationResult {
    let combined = combined_text(signals);
    let detected_courses = detect_all_courses(&combined);
    let detected_cuisines = detect_all_cuisines(&combined);
    let cuisine = signals
        .cuisine
        .map(map_cuisine)
        .or_else(|| detected_cuisines.first().cloned());

    let (course, confidence) = course_with_confidence(signals, &combined);

    let subcategory = if course == "Drinks" {
        detect_spirit(&signals.ingredient_names)
    } else {
        None
    };

    ClassificationResult {
        course,
        cuisine,
        subcategory,
        detected_courses,
        detected_cuisines,
        confidence,
    }
}

fn course_with_confidence(signals: &CourseSignals, combined: &str) -> (String, f32) {
    // 1. Known cocktail site
    if signals.source_url.map(is_cocktail_site).unwrap_or(false) {
        return ("Drinks".to_string(), CONF_COCKTAIL_SITE);
    }

    // 2. Drink keyword family across category, keywords, title, description
    if contains_any(combined, DRINK_KEYWORDS) {
        return ("Drinks".to_string(), CONF_KEYWORD);
    }

    // 3. Modernist keywords or URL tokens
    if contains_any(combined, MODERNIST_KEYWORDS)
        || signals
            .source_url
            .map(|u| contains_any(&u.to_lowercase(), MODERNIST_URL_TOKENS))
            .unwrap_or(false)
    {
        return ("Modernist".to_string(), CONF_KEYWORD);
    }

    // 4. Explicit category field against the ordered keyword table
    if let Some(category) = signals.category {
        let category_lower = category.to_lowercase();
        for (keyword, course) in CATEGORY_COURSES {
            if category_lower.contains(keyword) {
                return (course.to_string(), CONF_EXPLICIT_CATEGORY);
            }
        }
    }

    // 5. Title keyword fallback, restricted to the strong families
    let title_lower = signals.title.to_lowercase();
    for family in ["Breads", "Soups", "Desserts", "Sauces", "Pizza"] {
        let keywords = TITLE_COURSES
            .iter()
            .find(|(name, _)| *name == family)
            .map(|(_, kws)| *kws)
            .unwrap_or(&[]);
        if contains_any(&title_lower, keywords) {
            return (family.to_string(), CONF_TITLE_KEYWORD);
        }
    }

    // 6. Explicit vegetarian/vegan category (not just a keyword anywhere)
    if let Some(category) = signals.category {
        let category_lower = category.to_lowercase();
        if category_lower.contains("vegetarian") || category_lower.contains("vegan") {
            return ("Veg'n".to_string(), CONF_DIET_CATEGORY);
        }
    }

    // 7. Default
    ("Mains".to_string(), CONF_DEFAULT)
}

/// Every course whose keyword family matches, sorted for determinism
pub fn detect_all_courses(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut courses: Vec<String> = Vec::new();

    if contains_any(&lower, DRINK_KEYWORDS) {
        courses.push("Drinks".to_string());
    }
    if contains_any(&lower, MODERNIST_KEYWORDS) {
        courses.push("Modernist".to_string());
    }
    for (course, keywords) in TITLE_COURSES {
        if contains_any(&lower, keywords) && !courses.iter().any(|c| c == course) {
            courses.push(course.to_string());
        }
    }
    courses.sort();
    courses
}

/// Every cuisine whose adjective appears, sorted for determinism
pub fn detect_all_cuisines(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut cuisines: Vec<String> = Vec::new();
    for (adjective, canonical) in CUISINE_MAP {
        if lower.contains(adjective) && !cuisines.iter().any(|c| c == canonical) {
            cuisines.push(canonical.to_string());
        }
    }
    cuisines.sort();
    cuisines
}

/// Map an explicit cuisine value to its canonical name; unmapped values
/// pass through title-cased
pub fn map_cuisine(value: &str) -> String {
    let lower = value.trim().to_lowercase();
    for (adjective, canonical) in CUISINE_MAP {
        if lower == *adjective {
            return canonical.to_string();
        }
    }
    title_case(value.trim())
}

/// First spirit detected across the parsed ingredient names
pub fn detect_spirit(ingredient_names: &[String]) -> Option<String> {
    for name in ingredient_names {
        let padded = word_padded(name);
        for (keyword, display) in SPIRITS {
            if padded.contains(&format!(" {keyword} ")) {
                return Some(display.to_string());
            }
        }
    }
    None
}

pub fn is_cocktail_site(url: &str) -> bool {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) else {
        return false;
    };
    let host = host.strip_prefix("www.").unwrap_or(&host).to_lowercase();
    COCKTAIL_SITES
        .iter()
        .any(|site| host == *site || host.ends_with(&format!(".{site}")))
}

fn combined_text(signals: &CourseSignals) -> String {
    let mut combined = String::new();
    if let Some(category) = signals.category {
        combined.push_str(category);
        combined.push(' ');
    }
    combined.push_str(signals.keywords);
    combined.push(' ');
    combined.push_str(signals.title);
    combined.push(' ');
    combined.push_str(signals.description);
    combined.to_lowercase()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let padded = word_padded(haystack);
    needles.iter().any(|needle| {
        if padded.contains(&format!(" {needle} ")) {
            return true;
        }
        padded.split_whitespace().any(|word| {
            // Simple plurals, and compound words for longer keywords:
            // "cookies" and "cornbread" count, "ginger" never reads as gin
            word.strip_suffix('s') == Some(*needle)
                || (needle.len() >= 5 && word.ends_with(*needle))
        })
    })
}

/// Lowercase and pad with spaces so single-word keywords match on word
/// boundaries ("gin" must not match "ginger")
fn word_padded(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' || c == '-' || c == ':' {
                c
            } else {
                ' '
            }
        })
        .collect();
    format!(" {} ", cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals<'a>(title: &'a str, category: Option<&'a str>) -> CourseSignals<'a> {
        CourseSignals {
            title,
            category,
            ..Default::default()
        }
    }

    #[test]
    fn test_cocktail_site_short_circuits() {
        let mut s = signals("Some Recipe", Some("Dessert"));
        s.source_url = Some("https://www.liquor.com/recipes/old-fashioned/");
        let result = classify(&s);
        assert_eq!(result.course, "Drinks");
        assert!(result.confidence > 0.9);
    }

    #[test]
    fn test_drink_keywords_beat_category_table() {
        let result = classify(&signals("Espresso Martini", Some("Dessert")));
        assert_eq!(result.course, "Drinks");
    }

    #[test]
    fn test_modernist_keyword() {
        let result = classify(&signals("Spherification basics", None));
        assert_eq!(result.course, "Modernist");
    }

    #[test]
    fn test_explicit_category_table_order() {
        let result = classify(&signals("Grandma's Special", Some("Dessert Recipes")));
        assert_eq!(result.course, "Desserts");
        assert_eq!(result.confidence, CONF_EXPLICIT_CATEGORY);

        let result = classify(&signals("Weeknight thing", Some("Main Course")));
        assert_eq!(result.course, "Mains");
    }

    #[test]
    fn test_title_fallback() {
        let result = classify(&signals("Crusty Sourdough", None));
        assert_eq!(result.course, "Breads");
        assert_eq!(result.confidence, CONF_TITLE_KEYWORD);
    }

    #[test]
    fn test_vegn_requires_explicit_category() {
        let result = classify(&signals("Hearty Bowl", Some("Vegan")));
        assert_eq!(result.course, "Veg'n");

        // A vegan keyword in the title alone is not enough
        let result = classify(&signals("Vegan-adjacent Bowl", None));
        assert_eq!(result.course, "Mains");
    }

    #[test]
    fn test_default_is_mains() {
        let result = classify(&signals("Tuesday Skillet", None));
        assert_eq!(result.course, "Mains");
        assert_eq!(result.confidence, CONF_DEFAULT);
    }

    #[test]
    fn test_detect_all_is_sorted_and_multi() {
        let detected = detect_all_courses("smoked brisket with bbq sauce and corn bread");
        assert_eq!(detected, vec!["Breads", "Sauces", "Smoking"]);
    }

    #[test]
    fn test_cuisine_mapping() {
        assert_eq!(map_cuisine("tex-mex"), "Mexican");
        assert_eq!(map_cuisine("Scandinavian"), "Nordic");
        assert_eq!(map_cuisine("burgundian"), "Burgundian");
    }

    #[test]
    fn test_spirit_detection_word_boundaries() {
        let names = vec!["fresh ginger".to_string(), "london dry gin".to_string()];
        assert_eq!(detect_spirit(&names).as_deref(), Some("Gin"));

        let no_spirit = vec!["ginger beer syrup base".to_string()];
        assert_eq!(detect_spirit(&no_spirit), None);
    }

    #[test]
    fn test_spirit_specificity() {
        let names = vec!["2 oz rye whiskey".to_string()];
        assert_eq!(detect_spirit(&names).as_deref(), Some("Rye"));
    }
}
