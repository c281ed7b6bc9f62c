use mise_import::{import_recipe_with_config, ImportConfig};

fn recipe_page(json_ld: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <script type="application/ld+json">
    {json_ld}
    </script>
</head>
<body><h1>Page chrome</h1></body>
</html>"#
    )
}

#[tokio::test]
async fn test_import_from_json_ld() {
    let mut server = mockito::Server::new_async().await;
    let page = recipe_page(
        r#"{
            "@context": "https://schema.org/",
            "@type": "Recipe",
            "name": "Brown Butter Blondies",
            "description": "Chewy blondies with brown butter",
            "image": "https://example.com/blondies.jpg",
            "recipeIngredient": ["1 cup butter", "2 cups brown sugar", "2 eggs", "2 cups flour"],
            "recipeInstructions": [
                {"@type": "HowToStep", "text": "Brown the butter."},
                {"@type": "HowToStep", "text": "Mix everything together."},
                {"@type": "HowToStep", "text": "Bake at 350F."}
            ],
            "recipeYield": "16 bars",
            "recipeCategory": "Dessert",
            "prepTime": "PT20M",
            "cookTime": "PT25M",
            "totalTime": "PT45M"
        }"#,
    );
    let _mock = server
        .mock("GET", "/recipe")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(page)
        .create_async()
        .await;

    let url = format!("{}/recipe", server.url());
    let recipe = import_recipe_with_config(&url, &ImportConfig::default())
        .await
        .unwrap();

    assert_eq!(recipe.name.as_deref(), Some("Brown Butter Blondies"));
    assert_eq!(recipe.course.as_deref(), Some("Desserts"));
    assert_eq!(recipe.serves.as_deref(), Some("16 bars"));
    assert_eq!(recipe.time.as_deref(), Some("45 minutes"));
    assert_eq!(recipe.prep_time.as_deref(), Some("20 minutes"));
    assert_eq!(recipe.ingredients.len(), 4);
    assert_eq!(recipe.ingredients[0].name, "butter");
    assert_eq!(recipe.ingredients[0].amount.as_deref(), Some("1"));
    assert_eq!(recipe.ingredients[0].unit.as_deref(), Some("cup"));
    assert_eq!(recipe.directions.len(), 3);
    assert_eq!(recipe.images, vec!["https://example.com/blondies.jpg"]);

    // Raw strings are preserved for audit
    assert_eq!(recipe.raw_ingredients[0], "1 cup butter");

    // Structured data scores at the top tier
    assert!(recipe.confidences.ingredients > 0.9);
    assert!(recipe.confidences.directions > 0.9);
    assert!(recipe.confidences.name > 0.9);
}

#[tokio::test]
async fn test_partial_structured_merges_html_directions() {
    let mut server = mockito::Server::new_async().await;
    // Structured data with ingredients but no instructions; directions
    // only exist as an ordered list in the HTML
    let page = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <script type="application/ld+json">
    {{
        "@type": "Recipe",
        "name": "Sheet Pan Chicken",
        "recipeIngredient": ["1 lb chicken thighs", "2 tbsp olive oil"]
    }}
    </script>
</head>
<body>
    <h2>Directions</h2>
    <p>Toss the chicken with oil. Roast until done.</p>
</body>
</html>"#
    );
    let _mock = server
        .mock("GET", "/partial")
        .with_status(200)
        .with_body(page)
        .create_async()
        .await;

    let url = format!("{}/partial", server.url());
    let recipe = import_recipe_with_config(&url, &ImportConfig::default())
        .await
        .unwrap();

    assert_eq!(recipe.name.as_deref(), Some("Sheet Pan Chicken"));
    assert_eq!(recipe.ingredients.len(), 2);
    assert!(!recipe.directions.is_empty());
    // The merged directions keep the weaker strategy's confidence
    assert!(recipe.confidences.directions < recipe.confidences.ingredients);
}

#[tokio::test]
async fn test_fetch_failure_includes_url() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone")
        .with_status(404)
        .create_async()
        .await;

    let url = format!("{}/gone", server.url());
    let err = import_recipe_with_config(&url, &ImportConfig::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("/gone"));
}

#[tokio::test]
async fn test_empty_page_reports_diagnostic_counts() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/blog")
        .with_status(200)
        .with_body("<html><body><p>A post about my garden.</p></body></html>")
        .create_async()
        .await;

    let url = format!("{}/blog", server.url());
    let err = import_recipe_with_config(&url, &ImportConfig::default())
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("0 structured data block(s)"));
    assert!(message.contains("microdata present: false"));
}
