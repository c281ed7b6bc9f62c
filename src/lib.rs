//! Import structured recipes from web pages and videos.
//!
//! The pipeline tries machine-readable markup first, then a cascade of
//! HTML heuristics, and attaches a per-field confidence score describing
//! which strategy produced each field and how completely it parsed.

pub mod classify;
pub mod config;
pub mod confidence;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod ingredient;
pub mod model;
pub mod pipeline;
pub mod text;
pub mod video;

pub use config::ImportConfig;
pub use error::ImportError;
pub use model::{
    Chapter, ClassificationResult, Confidences, ImportedRecipe, ParsedIngredient, ProvenanceTier,
    RawIngredientLine, Recipe, TranscriptSegment,
};

/// Import a recipe from a web page or video watch URL, with per-field
/// confidence scores attached.
pub async fn import_recipe(url: &str) -> Result<ImportedRecipe, ImportError> {
    let config = ImportConfig::load().unwrap_or_default();
    pipeline::import(url, &config).await
}

/// Import with an explicit configuration (timeouts, user-agents, video
/// endpoints)
pub async fn import_recipe_with_config(
    url: &str,
    config: &ImportConfig,
) -> Result<ImportedRecipe, ImportError> {
    pipeline::import(url, config).await
}

/// Legacy entry point for callers that do not need confidences: the same
/// import flattened into a plain `Recipe`.
pub async fn fetch_recipe(url: &str) -> Result<Recipe, ImportError> {
    let imported = import_recipe(url).await?;
    Ok(imported.into())
}
