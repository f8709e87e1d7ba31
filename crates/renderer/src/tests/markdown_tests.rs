use super::*;

fn text(value: &str) -> Inline {
    Inline::Text(value.to_string())
}

#[test]
fn heading_and_tight_list() {
    let doc = render_markdown("# Title\n- item");

    assert_eq!(
        doc.blocks,
        vec![
            Block::Heading {
                level: 1,
                content: vec![text("Title")],
            },
            Block::List {
                ordered: false,
                start: None,
                items: vec![vec![Block::Paragraph(vec![text("item")])]],
            },
        ]
    );
    assert_eq!(doc.headings(), vec![(1, "Title".to_string())]);
    assert_eq!(doc.list_items(), vec!["item".to_string()]);
}

#[test]
fn deep_headings_fold_into_level_three() {
    let doc = render_markdown("## Two\n### Three\n#### Four\n###### Six");
    assert_eq!(
        doc.headings(),
        vec![
            (2, "Two".to_string()),
            (3, "Three".to_string()),
            (3, "Four".to_string()),
            (3, "Six".to_string()),
        ]
    );
}

#[test]
fn ordered_list_keeps_start_number() {
    let doc = render_markdown("3. thread section\n4. hexagonal nut\n");
    let Block::List {
        ordered,
        start,
        items,
    } = &doc.blocks[0]
    else {
        panic!("expected list, got {:?}", doc.blocks);
    };
    assert!(*ordered);
    assert_eq!(*start, Some(3));
    assert_eq!(items.len(), 2);
    assert_eq!(doc.list_items(), vec!["thread section", "hexagonal nut"]);
}

#[test]
fn inline_and_block_code_are_distinct() {
    let doc = render_markdown("Model `SILKFR8A6` checked.\n\n```text\nPASS\nline two\n```\n");

    assert_eq!(
        doc.blocks[0],
        Block::Paragraph(vec![
            text("Model "),
            Inline::Code("SILKFR8A6".to_string()),
            text(" checked."),
        ])
    );
    assert_eq!(
        doc.blocks[1],
        Block::CodeBlock {
            language: Some("text".to_string()),
            code: "PASS\nline two".to_string(),
        }
    );
}

#[test]
fn indented_code_block_has_no_language() {
    let doc = render_markdown("Intro\n\n    raw output\n");
    assert_eq!(
        doc.blocks[1],
        Block::CodeBlock {
            language: None,
            code: "raw output".to_string(),
        }
    );
}

#[test]
fn strong_and_emphasis_nest() {
    let doc = render_markdown("**Overall: *FAIL***");
    assert_eq!(
        doc.blocks,
        vec![Block::Paragraph(vec![Inline::Strong(vec![
            text("Overall: "),
            Inline::Emphasis(vec![text("FAIL")]),
        ])])]
    );
}

#[test]
fn nested_lists_stay_inside_their_item() {
    let doc = render_markdown("- Electrodes\n  - center aligned\n  - gap uniform\n- Seal ring\n");

    let Block::List { items, .. } = &doc.blocks[0] else {
        panic!("expected list");
    };
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0][1], Block::List { .. }));
    assert_eq!(
        doc.list_items(),
        vec!["Electrodes", "center aligned", "gap uniform", "Seal ring"]
    );
}

#[test]
fn loose_list_items_use_paragraphs() {
    let doc = render_markdown("- first\n\n- second\n");
    assert_eq!(doc.list_items(), vec!["first", "second"]);
}

#[test]
fn soft_breaks_join_lines_and_links_keep_text() {
    let doc = render_markdown("line one\nline [two](http://example.com)");
    assert_eq!(
        doc.blocks,
        vec![Block::Paragraph(vec![text("line one line two")])]
    );
}

#[test]
fn empty_input_renders_nothing() {
    assert!(render_markdown("").is_empty());
    assert!(render_markdown("   \n\n").is_empty());
}

#[test]
fn blocks_serialize_with_type_tag() {
    let doc = render_markdown("# Title");
    let json = serde_json::to_value(&doc).expect("json");
    assert_eq!(json["blocks"][0]["type"], "heading");
    assert_eq!(json["blocks"][0]["content"]["level"], 1);
}
