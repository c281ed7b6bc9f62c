use mise_import::ingredient::parse_ingredient_line;
use mise_import::model::{Chapter, TranscriptSegment};
use mise_import::text::normalize;
use mise_import::video::build_directions_from_chapters;
use mise_import::video::description::parse_description;

#[test]
fn test_parser_never_fails_on_garbage() {
    let nasty = [
        "",
        "     ",
        "()()()",
        "[[[",
        "★★★★★",
        "1",
        "/",
        "½",
        "a, b, c, d, e, f, g",
        "((nested (parens)))",
        "🍕🍕🍕",
        "&amp;&amp;&amp;",
    ];
    for line in nasty {
        // Totality: worst case is an empty-name entry, never a panic
        let _ = parse_ingredient_line(line);
    }
}

#[test]
fn test_normalize_idempotence_over_corpus() {
    let corpus = [
        "1/2 cup sugar &amp; spice",
        "<li>2 tablespoons butter</li>",
        "0.25 tsp salt",
        "1 1/2 cups milk, divided",
        "Top up with soda",
        "All-Purpose Flour, 100% – 600g (4 1/2 Cups)",
        "10.5 oz can of tomatoes",
    ];
    for s in corpus {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "normalize must be idempotent for {s:?}");
    }
}

#[test]
fn test_decimal_and_ascii_fraction_round_trip() {
    assert_eq!(normalize("0.5"), normalize("1/2"));
    assert_eq!(normalize("0.5"), "½");
}

#[test]
fn test_bakers_percentage_full_example() {
    let parsed = parse_ingredient_line("All-Purpose Flour, 100% – 600g (4 1/2 Cups)");
    assert_eq!(parsed.name, "All-Purpose Flour");
    assert_eq!(parsed.amount.as_deref(), Some("600g"));
    assert_eq!(parsed.baker_percent.as_deref(), Some("100%"));
    assert_eq!(parsed.preparation.as_deref(), Some("4 ½ cup"));
}

#[test]
fn test_description_machine_assigns_sections() {
    let parse = parse_description("Ingredients:\n2 cups flour\nDirections:\n1. Mix well");
    assert_eq!(parse.ingredients, vec!["2 cups flour"]);
    assert_eq!(parse.directions, vec!["1. Mix well"]);
}

#[test]
fn test_chapter_assembly_produces_one_step_per_chapter() {
    let chapters = vec![
        Chapter {
            title: "Mix".to_string(),
            start_offset: 0,
        },
        Chapter {
            title: "Bake".to_string(),
            start_offset: 600,
        },
    ];
    let segments = vec![
        TranscriptSegment {
            text: "start by mixing".to_string(),
            start_offset: 3.0,
        },
        TranscriptSegment {
            text: "now we bake".to_string(),
            start_offset: 615.0,
        },
    ];
    let directions = build_directions_from_chapters(&chapters, &segments);
    assert_eq!(directions.len(), 2);
    for step in &directions {
        let first = step.chars().next().unwrap();
        assert!(first.is_uppercase(), "step must be sentence-cased: {step}");
        assert!(step.ends_with('.'), "step must be punctuated: {step}");
    }
}

#[test]
fn test_drink_formats() {
    let parsed = parse_ingredient_line("Top up with ginger beer");
    assert_eq!(parsed.amount.as_deref(), Some("Top"));
    assert_eq!(parsed.name, "ginger beer");

    let parsed = parse_ingredient_line("Mezcal: 1 oz / 30 ml");
    assert_eq!(parsed.name, "Mezcal");
    assert_eq!(parsed.amount.as_deref(), Some("1"));
    assert_eq!(parsed.unit.as_deref(), Some("oz"));
}

#[test]
fn test_optional_and_sections_travel_together() {
    let parsed = parse_ingredient_line("[Garnish] mint sprig (optional)");
    assert_eq!(parsed.section.as_deref(), Some("Garnish"));
    assert!(parsed.is_optional);
    assert_eq!(parsed.name, "mint sprig");
}
