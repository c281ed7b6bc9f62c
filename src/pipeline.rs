//! Import orchestration.
//!
//! One logical task per import: fetch once, then run the strategies
//! strictly in sequence, each tier only when the one before it failed or
//! came back incomplete. A structured-data result missing one of the two
//! load-bearing lists is partial-merged with the HTML cascade's result,
//! each field keeping the confidence of the strategy that produced it.

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::extract::{
    Extractor, ExtractionDiagnostics, HtmlRulesExtractor, MicroDataExtractor, ParsingContext,
    StructuredDataExtractor,
};
use crate::fetch::RequestFetcher;
use crate::model::ImportedRecipe;
use crate::video;
use log::{debug, info};
use scraper::Html;
use url::Url;

/// Import a recipe from a web page or video watch URL
pub async fn import(url: &str, config: &ImportConfig) -> Result<ImportedRecipe, ImportError> {
    if Url::parse(url).is_err() {
        return Err(ImportError::InvalidUrl(url.to_string()));
    }

    let fetcher = RequestFetcher::new(config);

    if video::is_video_url(url) {
        info!("Importing {url} through the video pipeline");
        return video::import_video(&fetcher, config, url).await;
    }

    let html = fetcher.fetch_page(url).await?;
    import_from_html(&html, url)
}

/// Run the extraction cascade over already-fetched HTML
pub fn import_from_html(html: &str, url: &str) -> Result<ImportedRecipe, ImportError> {
    let context = ParsingContext {
        url: url.to_string(),
        document: Html::parse_document(html),
    };
    let diagnostics = ExtractionDiagnostics::gather(&context.document);

    match StructuredDataExtractor.parse(&context) {
        Ok(recipe) if is_complete(&recipe) => {
            debug!("Structured data produced a complete result");
            Ok(recipe)
        }
        Ok(partial) => {
            debug!("Structured data was incomplete, partial-merging with the HTML cascade");
            match run_heuristics(&context) {
                Some(secondary) => Ok(merge_partial(partial, secondary)),
                None if partial.has_content() => Ok(partial),
                None => Err(diagnostics.into_error()),
            }
        }
        Err(e) => {
            debug!("Structured data yielded nothing: {e}");
            match run_heuristics(&context) {
                Some(recipe) if recipe.has_content() => Ok(recipe),
                _ => Err(diagnostics.into_error()),
            }
        }
    }
}

/// The heuristic strategies, strictly in order: microdata, then the
/// HTML rule cascade
fn run_heuristics(context: &ParsingContext) -> Option<ImportedRecipe> {
    match MicroDataExtractor.parse(context) {
        Ok(recipe) => Some(recipe),
        Err(e) => {
            debug!("Microdata yielded nothing: {e}");
            match HtmlRulesExtractor.parse(context) {
                Ok(recipe) => Some(recipe),
                Err(e) => {
                    debug!("HTML rules yielded nothing: {e}");
                    None
                }
            }
        }
    }
}

fn is_complete(recipe: &ImportedRecipe) -> bool {
    recipe.ingredients.iter().any(|i| !i.name.is_empty()) && !recipe.directions.is_empty()
}

/// Fill the primary result's missing fields from the secondary one. The
/// confidence of every filled field comes from the strategy that actually
/// produced it, never upgraded to the primary's tier.
fn merge_partial(mut primary: ImportedRecipe, secondary: ImportedRecipe) -> ImportedRecipe {
    if !primary.ingredients.iter().any(|i| !i.name.is_empty())
        && secondary.ingredients.iter().any(|i| !i.name.is_empty())
    {
        primary.ingredients = secondary.ingredients;
        primary.raw_ingredients = secondary.raw_ingredients;
        primary.confidences.ingredients = secondary.confidences.ingredients;
    }
    if primary.directions.is_empty() && !secondary.directions.is_empty() {
        primary.directions = secondary.directions;
        primary.raw_directions = secondary.raw_directions;
        primary.confidences.directions = secondary.confidences.directions;
    }
    if primary.name.is_none() && secondary.name.is_some() {
        primary.name = secondary.name;
        primary.confidences.name = secondary.confidences.name;
    }
    if primary.serves.is_none() && secondary.serves.is_some() {
        primary.serves = secondary.serves;
        primary.confidences.serves = secondary.confidences.serves;
    }
    if primary.time.is_none() && secondary.time.is_some() {
        primary.time = secondary.time;
        primary.confidences.time = secondary.confidences.time;
    }
    if primary.prep_time.is_none() {
        primary.prep_time = secondary.prep_time;
    }
    if primary.cook_time.is_none() {
        primary.cook_time = secondary.cook_time;
    }
    if primary.images.is_empty() {
        primary.images = secondary.images;
    }
    if primary.equipment.is_empty() {
        primary.equipment = secondary.equipment;
    }
    if primary.glass.is_none() {
        primary.glass = secondary.glass;
    }
    if primary.garnishes.is_empty() {
        primary.garnishes = secondary.garnishes;
    }
    primary
}
