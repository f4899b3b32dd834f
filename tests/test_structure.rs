//! Integration tests for structure annotation and window aggregation.
//!
//! Pages are built from mock lines on a 72..540 text area with a 36 unit
//! indent, roughly a US letter page with one inch margins.

use doc_sections::layout::{
    annotate_document, annotate_line, window_string, Document, Line, LineType, LineTypes, Page,
};
use proptest::prelude::*;

// ============================================================================
// Helper Functions for Creating Mock Data
// ============================================================================

fn mock_page(number: u32, lines: Vec<Line>) -> Page {
    let mut page = Page::new(number, 72.0, 540.0, 36.0);
    for line in lines {
        page.push(line);
    }
    page
}

fn names(page: &Page, index: usize) -> Vec<String> {
    annotate_line(page, index)
        .into_iter()
        .map(|t| t.name().to_string())
        .collect()
}

/// Body line, heading line and page number footer.
fn opinion_page() -> Page {
    mock_page(
        1,
        vec![
            Line::new("The court held that the motion was denied.", 0)
                .with_extent(72.0, 540.0)
                .with_typography(12.0, 12.0),
            Line::new("I. INTRODUCTION", 1)
                .with_extent(250.0, 362.0)
                .with_typography(24.0, 14.0),
            Line::new("12", 2)
                .with_types(LineTypes::new().with(LineType::Footer))
                .with_extent(300.0, 312.0)
                .with_typography(40.0, 9.0),
        ],
    )
}

// ============================================================================
// Annotation
// ============================================================================

#[test]
fn test_body_line_tokens() {
    let page = opinion_page();
    assert_eq!(
        names(&page, 0),
        vec![
            "text",
            "lnfull",
            "lnleft",
            "lnright",
            "fontmed",
            "spaced_sml",
            "start_page",
            "caps1letter",
            "end_period",
        ]
    );
}

#[test]
fn test_heading_line_tokens() {
    let page = opinion_page();
    assert_eq!(
        names(&page, 1),
        vec![
            "text",
            "indent_multi",
            "lnmed",
            "centered",
            "fontlrg",
            "outline",
            "capsline",
            "capsmidword",
            "capsmidletter",
        ]
    );
}

#[test]
fn test_footer_line_tokens() {
    let page = opinion_page();
    assert_eq!(
        names(&page, 2),
        vec![
            "footer",
            "indent_multi",
            "lnshort",
            "centered",
            "fontsml",
            "spaced_vlg",
            "end_page",
            "numsline",
        ]
    );
}

#[test]
fn test_blank_line_has_no_width_or_font_tokens() {
    let blank = Line::new("", 0)
        .with_types(LineTypes::new().with(LineType::Blank))
        .with_extent(72.0, 540.0)
        .with_typography(15.0, 20.0);
    let page = mock_page(1, vec![blank, Line::new("after", 1)]);
    let tokens = names(&page, 0);

    assert!(tokens.contains(&"blank".to_string()));
    for forbidden in [
        "lnfull", "lnindent", "lndblindent", "lnlrindent", "lninter", "lnshort", "lnmed",
        "centered", "lnleft", "lnright", "fontlrg", "fontmed", "fontsml",
    ] {
        assert!(!tokens.contains(&forbidden.to_string()), "unexpected {}", forbidden);
    }
}

#[test]
fn test_scrambled_line_tokens() {
    let page = mock_page(
        1,
        vec![
            Line::new("a", 0),
            Line::new("b", 1),
            Line::new("c", 2).with_seq(7),
        ],
    );
    let tokens = names(&page, 2);
    let at = tokens.iter().position(|t| t == "lnumb7").unwrap();
    assert_eq!(tokens[at + 1], "lrank2");
    assert_eq!(tokens[at + 2], "lnscrambled");
}

#[test]
fn test_mixed_types_suppress_bare_text() {
    let types: LineTypes = [LineType::Text, LineType::Note].into_iter().collect();
    let page = mock_page(1, vec![Line::new("1 See id.", 0).with_types(types)]);
    let tokens = names(&page, 0);
    assert!(!tokens.contains(&"text".to_string()));
    assert!(tokens.contains(&"note".to_string()));
}

#[test]
fn test_caps_patterns() {
    let page = mock_page(
        1,
        vec![
            Line::new("OPINION of the Court", 0),
            Line::new("before the Supreme Court of Ohio", 1),
            Line::new("and then the JURY returned a VERDICT", 2),
        ],
    );
    let t0 = names(&page, 0);
    assert!(t0.contains(&"caps1word".to_string()));
    assert!(t0.contains(&"capsmidletter".to_string()));

    let t1 = names(&page, 1);
    assert!(t1.contains(&"capsmid2letter".to_string()));
    assert!(!t1.contains(&"caps1letter".to_string()));

    let t2 = names(&page, 2);
    assert!(t2.contains(&"capsmid2word".to_string()));
}

#[test]
fn test_document_begin_and_end_markers() {
    let mut doc = Document::new(
        "two pages",
        vec![
            mock_page(1, vec![Line::new("first", 0), Line::new("second", 1)]),
            mock_page(2, vec![Line::new("third", 0), Line::new("last", 1)]),
        ],
    );
    annotate_document(&mut doc);

    let first = &doc.pages[0].lines[0].structure;
    assert_eq!(first[0].name(), "begin");
    let last = &doc.pages[1].lines[1].structure;
    assert_eq!(last.last().unwrap().name(), "end");

    for line in [&doc.pages[0].lines[1], &doc.pages[1].lines[0]] {
        assert!(line
            .structure
            .iter()
            .all(|t| t.name() != "begin" && t.name() != "end"));
    }
}

// ============================================================================
// Window aggregation
// ============================================================================

#[test]
fn test_window_stays_on_page() {
    let mut doc = Document::new(
        "isolation",
        vec![
            mock_page(1, (0..3).map(|i| Line::new(format!("one {}", i), i)).collect()),
            mock_page(2, (0..3).map(|i| Line::new(format!("two {}", i), i)).collect()),
        ],
    );
    annotate_document(&mut doc);
    let page = &doc.pages[1];
    let window = window_string(page, 0, 5);

    let offsets: Vec<&str> = window
        .split_whitespace()
        .filter(|t| t.starts_with("start_page") || t.starts_with("end_page"))
        .collect();
    assert_eq!(offsets, vec!["start_page0", "end_page+2"]);
    assert!(!window.contains("-1"));
    assert!(!window.contains("+3"));
}

#[test]
fn test_window_relabels_neighbours() {
    let mut doc = Document::new("relabel", vec![opinion_page()]);
    annotate_document(&mut doc);
    let window = window_string(&doc.pages[0], 1, 1);

    assert!(window.starts_with("begin-1 text-1 lnfull-1"));
    assert!(window.contains("outline0"));
    assert!(window.contains("numsline+1"));
    assert!(window.ends_with("end+1"));
}

proptest! {
    #[test]
    fn prop_window_never_leaves_page(lines in 1usize..12, size in 0usize..8, pick in 0usize..12) {
        let index = pick % lines;
        let mut page = mock_page(1, Vec::new());
        for i in 0..lines {
            let mut line = Line::new("x", i);
            line.structure = vec![doc_sections::layout::StructureToken::new(format!("l{}_", i))];
            page.push(line);
        }

        let window = window_string(&page, index, size);
        for token in window.split_whitespace() {
            let rest = token.strip_prefix('l').unwrap();
            let (line, offset) = rest.split_once('_').unwrap();
            let line: usize = line.parse().unwrap();
            let offset: isize = offset.parse().unwrap();
            prop_assert!(line < lines);
            prop_assert_eq!(line as isize - index as isize, offset);
            prop_assert!(line.abs_diff(index) <= size);
        }
    }
}
