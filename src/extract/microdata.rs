use super::{clean_directions, og_image, Extractor, ParsingContext};
use crate::classify::{self, CourseSignals};
use crate::confidence;
use crate::error::ImportError;
use crate::ingredient;
use crate::model::{ImportedRecipe, ProvenanceTier, RawIngredientLine};
use crate::text;
use log::debug;
use scraper::{ElementRef, Html, Selector};

pub struct MicroDataExtractor;

/// Is there a schema.org Recipe item anywhere on the page?
pub fn has_recipe_microdata(document: &Html) -> bool {
    find_recipe_container(document).is_some()
}

fn find_recipe_container(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("[itemscope]").expect("itemscope selector");
    document.select(&selector).find(|element| {
        element
            .value()
            .attr("itemtype")
            .is_some_and(|itemtype| {
                itemtype.contains("schema.org/Recipe")
                    || itemtype.contains("data-vocabulary.org/Recipe")
            })
    })
}

fn itemprop_text(root: ElementRef, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!("[itemprop='{prop}']")).ok()?;
    root.select(&selector).next().map(|el| {
        // Meta tags carry their value in the content attribute
        if let Some(content) = el.value().attr("content") {
            text::normalize(content)
        } else {
            text::normalize(&el.text().collect::<Vec<_>>().join(" "))
        }
    })
}

fn itemprop_list(root: ElementRef, prop: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(&format!("[itemprop='{prop}']")) else {
        return Vec::new();
    };
    root.select(&selector)
        .map(|el| {
            el.value()
                .attr("content")
                .map(str::to_string)
                .unwrap_or_else(|| el.text().collect::<Vec<_>>().join(" "))
        })
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl Extractor for MicroDataExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<ImportedRecipe, ImportError> {
        debug!("MicroDataExtractor: looking for a Recipe container");

        // Strictly scoped to a Recipe item: global itemprop searches pick
        // up site titles, author bios and ads.
        let container = find_recipe_container(&context.document).ok_or_else(|| {
            ImportError::Parse("no microdata Recipe container found".to_string())
        })?;

        let name = itemprop_text(container, "name").filter(|n| !n.is_empty());

        let mut raw_ingredients = itemprop_list(container, "recipeIngredient");
        if raw_ingredients.is_empty() {
            raw_ingredients = itemprop_list(container, "ingredients");
        }

        let mut raw_directions = itemprop_list(container, "recipeInstructions");
        if raw_directions.is_empty() {
            raw_directions = itemprop_list(container, "instructions");
        }

        if raw_ingredients.is_empty() && raw_directions.is_empty() {
            return Err(ImportError::Parse(
                "microdata Recipe container had no content".to_string(),
            ));
        }

        let raw_lines: Vec<RawIngredientLine> = raw_ingredients
            .iter()
            .map(|line| RawIngredientLine::new(line.clone(), None))
            .collect();
        let parsed = ingredient::parse_ingredient_lines(&raw_lines);
        let directions = clean_directions(raw_directions.clone());

        let category = itemprop_text(container, "recipeCategory");
        let cuisine_field = itemprop_text(container, "recipeCuisine");
        let description = itemprop_text(container, "description").unwrap_or_default();

        let ingredient_names: Vec<String> = parsed
            .iter()
            .filter(|i| !i.name.is_empty())
            .map(|i| i.name.clone())
            .collect();

        let classification = classify::classify(&CourseSignals {
            title: name.as_deref().unwrap_or(""),
            category: category.as_deref(),
            cuisine: cuisine_field.as_deref(),
            keywords: "",
            description: &description,
            ingredient_names,
            source_url: Some(&context.url),
        });

        let serves = itemprop_text(container, "recipeYield").filter(|s| !s.is_empty());
        let prep_time = itemprop_text(container, "prepTime")
            .and_then(|t| super::structured::parse_duration(&t));
        let cook_time = itemprop_text(container, "cookTime")
            .and_then(|t| super::structured::parse_duration(&t));
        let time = itemprop_text(container, "totalTime")
            .and_then(|t| super::structured::parse_duration(&t));

        let mut images = image_urls(container);
        if images.is_empty() {
            if let Some(og) = og_image(&context.document) {
                images.push(og);
            }
        }

        let confidences = confidence::score_fields(
            ProvenanceTier::Microdata,
            name.is_some(),
            classification.confidence,
            classification.cuisine.is_some(),
            &parsed,
            raw_ingredients.len(),
            directions.len(),
            serves.is_some(),
            time.is_some() || prep_time.is_some() || cook_time.is_some(),
        );

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
            notes: if description.is_empty() {
                None
            } else {
                Some(description)
            },
            images,
            raw_ingredients,
            raw_directions,
            source_url: Some(context.url.clone()),
            confidences,
            ..Default::default()
        })
    }
}

fn image_urls(container: ElementRef) -> Vec<String> {
    let Ok(selector) = Selector::parse("[itemprop='image']") else {
        return Vec::new();
    };
    container
        .select(&selector)
        .filter_map(|el| {
            el.value()
                .attr("src")
                .or_else(|| el.value().attr("href"))
                .or_else(|| el.value().attr("content"))
                .map(str::to_string)
        })
        .collect()
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

    #[test]
    fn test_microdata_extraction() {
        let html = r#"
            <html><body>
            <div itemscope itemtype="https://schema.org/Recipe">
                <h1 itemprop="name">Lentil Soup</h1>
                <img itemprop="image" src="https://example.com/soup.jpg">
                <span itemprop="recipeYield">Serves 4</span>
                <meta itemprop="totalTime" content="PT45M">
                <ul>
                    <li itemprop="recipeIngredient">1 cup lentils</li>
                    <li itemprop="recipeIngredient">2 carrots</li>
                </ul>
                <div itemprop="recipeInstructions">Simmer everything until tender.</div>
            </div>
            </body></html>
        "#;
        let recipe = MicroDataExtractor.parse(&context_for(html)).unwrap();

        assert_eq!(recipe.name.as_deref(), Some("Lentil Soup"));
        assert_eq!(recipe.serves.as_deref(), Some("Serves 4"));
        assert_eq!(recipe.time.as_deref(), Some("45 minutes"));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].name, "lentils");
        assert_eq!(recipe.images, vec!["https://example.com/soup.jpg"]);
        assert_eq!(recipe.course.as_deref(), Some("Soups"));
    }

    #[test]
    fn test_no_container_is_an_error() {
        let html = "<html><body><p itemprop='name'>Not scoped</p></body></html>";
        assert!(MicroDataExtractor.parse(&context_for(html)).is_err());
    }
}
