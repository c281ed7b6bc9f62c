use serde::Serialize;
use std::collections::HashMap;

/// Which extraction strategy produced a field. Earlier variants are
/// stronger evidence; the derived ordering is the tier ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ProvenanceTier {
    StructuredData,
    PluginMarkup,
    Microdata,
    HeadingInference,
    ListSniffing,
    FreeText,
    Fallback,
}

impl ProvenanceTier {
    /// Seed confidence for a field produced by this tier. Completeness
    /// signals adjust from here; they never override the tier ordering.
    pub fn base_confidence(self) -> f32 {
        match self {
            ProvenanceTier::StructuredData => 0.95,
            ProvenanceTier::PluginMarkup => 0.85,
            ProvenanceTier::Microdata => 0.8,
            ProvenanceTier::HeadingInference => 0.65,
            ProvenanceTier::ListSniffing => 0.5,
            ProvenanceTier::FreeText => 0.35,
            ProvenanceTier::Fallback => 0.2,
        }
    }
}

/// One untouched source ingredient line plus the section it appeared under
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawIngredientLine {
    pub text: String,
    pub section: Option<String>,
}

impl RawIngredientLine {
    pub fn new(text: impl Into<String>, section: Option<String>) -> Self {
        Self {
            text: text.into(),
            section,
        }
    }
}

/// A structured ingredient parsed from one raw line.
///
/// `name` is empty only when the line was itself a pure section marker.
/// `amount` keeps its display form (unicode fraction glyphs, not floats).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedIngredient {
    pub name: String,
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub preparation: Option<String>,
    pub is_optional: bool,
    pub section: Option<String>,
    pub baker_percent: Option<String>,
}

impl ParsedIngredient {
    /// A section-only entry: empty name, populated section
    pub fn section_marker(section: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            ..Default::default()
        }
    }

    pub fn is_section_marker(&self) -> bool {
        self.name.is_empty() && self.section.is_some()
    }
}

/// A video chapter parsed from a description timestamp line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    pub title: String,
    /// Seconds from the start of the video
    pub start_offset: u32,
}

/// One caption/transcript segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Seconds from the start of the video
    pub start_offset: f64,
}

/// Course/cuisine classification. A set rather than a single guess:
/// several categories can plausibly apply and the reviewer disambiguates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub course: String,
    pub cuisine: Option<String>,
    pub subcategory: Option<String>,
    pub detected_courses: Vec<String>,
    pub detected_cuisines: Vec<String>,
    pub confidence: f32,
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self {
            course: "Mains".to_string(),
            cuisine: None,
            subcategory: None,
            detected_courses: Vec::new(),
            detected_cuisines: Vec::new(),
            confidence: ProvenanceTier::Fallback.base_confidence(),
        }
    }
}

/// Per-field confidence scores, 0.0 when the field has no value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Confidences {
    pub name: f32,
    pub course: f32,
    pub cuisine: f32,
    pub ingredients: f32,
    pub directions: f32,
    pub serves: f32,
    pub time: f32,
}

/// The externally visible artifact of one import call.
///
/// Raw pre-parse ingredient and direction strings are kept alongside the
/// parsed forms so a reviewer can audit what the parser did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportedRecipe {
    pub name: Option<String>,
    pub course: Option<String>,
    pub cuisine: Option<String>,
    pub subcategory: Option<String>,
    pub serves: Option<String>,
    pub time: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub ingredients: Vec<ParsedIngredient>,
    pub directions: Vec<String>,
    pub notes: Option<String>,
    pub images: Vec<String>,
    pub equipment: Vec<String>,
    pub glass: Option<String>,
    pub garnishes: Vec<String>,
    pub nutrition: HashMap<String, String>,
    pub raw_ingredients: Vec<String>,
    pub raw_directions: Vec<String>,
    pub source_url: Option<String>,
    pub confidences: Confidences,
}

impl ImportedRecipe {
    /// Usable means at least one of the two load-bearing lists came out
    pub fn has_content(&self) -> bool {
        self.ingredients.iter().any(|i| !i.name.is_empty()) || !self.directions.is_empty()
    }
}

/// Legacy flat recipe for callers that do not need per-field confidence
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recipe {
    pub name: String,
    pub description: Option<String>,
    pub image: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub metadata: HashMap<String, String>,
}

impl From<ImportedRecipe> for Recipe {
    fn from(imported: ImportedRecipe) -> Self {
        let mut metadata = HashMap::new();
        if let Some(url) = &imported.source_url {
            metadata.insert("source".to_string(), url.clone());
        }
        if let Some(course) = &imported.course {
            metadata.insert("course".to_string(), course.clone());
        }
        if let Some(cuisine) = &imported.cuisine {
            metadata.insert("cuisine".to_string(), cuisine.clone());
        }
        if let Some(serves) = &imported.serves {
            metadata.insert("servings".to_string(), serves.clone());
        }
        if let Some(time) = &imported.time {
            metadata.insert("time required".to_string(), time.clone());
        }
        if let Some(prep) = &imported.prep_time {
            metadata.insert("prep time".to_string(), prep.clone());
        }
        if let Some(cook) = &imported.cook_time {
            metadata.insert("cook time".to_string(), cook.clone());
        }

        let ingredients = imported
            .ingredients
            .iter()
            .filter(|i| !i.name.is_empty())
            .map(|i| {
                let mut line = String::new();
                if let Some(amount) = &i.amount {
                    line.push_str(amount);
                    line.push(' ');
                }
                if let Some(unit) = &i.unit {
                    line.push_str(unit);
                    line.push(' ');
                }
                line.push_str(&i.name);
                if let Some(prep) = &i.preparation {
                    line.push_str(", ");
                    line.push_str(prep);
                }
                line
            })
            .collect();

        Recipe {
            name: imported.name.unwrap_or_default(),
            description: imported.notes,
            image: imported.images,
            ingredients,
            instructions: imported.directions.join("\n\n"),
            metadata,
        }
    }
}
