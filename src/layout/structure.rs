//! Structure annotation: layout and content features of a single line.
//!
//! Each line is described by a list of generic [`StructureToken`]s: its type
//! flags, indentation, width and alignment, font size, vertical spacing, page
//! position, and the shape of its content (outline markers, capitalization,
//! legal keywords, trailing punctuation). Tokens carry no offset yet; the
//! window stage resolves them relative to the line being classified.
//!
//! All geometric comparisons use a fixed tolerance of [`ALIGN_TOLERANCE`] units.

use crate::layout::line::{Document, Line, LineType, Page};
use crate::layout::window::format_offset;
use crate::text::{filter_all, filter_xml};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance for position comparisons.
pub const ALIGN_TOLERANCE: f32 = 16.0;

/// Largest `|seq - rank|` distance still considered in order.
pub const SCRAMBLE_DISTANCE: usize = 3;

/// Marker prepended to the first line of a document.
pub const BEGIN_TOKEN: &str = "begin";

/// Marker appended to the last line of a document.
pub const END_TOKEN: &str = "end";

lazy_static! {
    /// Outline markers at line start: "I.", "(a)", "12)"
    static ref RE_OUTLINE: Regex =
        Regex::new(r"^\s*\(?(\p{Lu}{1,3}|\p{Ll}{1,3}|\d{1,3})[.)]\s+").unwrap();

    /// Whole line in capitals
    static ref RE_CAPSLINE: Regex = Regex::new(r"^(\p{Lu}+\s+)*\p{Lu}+$").unwrap();

    /// First word in capitals
    static ref RE_CAPS1WORD: Regex = Regex::new(r"^\p{Lu}{2,}\b").unwrap();

    /// First word capitalized
    static ref RE_CAPS1LETTER: Regex = Regex::new(r"^\p{Lu}\p{Ll}").unwrap();

    /// Two capitalized words after the line start
    static ref RE_CAPSMID2WORD: Regex = Regex::new(r"\S\s+\b\p{Lu}+\b.*\b\p{Lu}+\b").unwrap();

    /// One capitalized word after the line start
    static ref RE_CAPSMIDWORD: Regex = Regex::new(r"\S\s+\b\p{Lu}+\b").unwrap();

    /// Two initial capitals after the line start
    static ref RE_CAPSMID2LETTER: Regex = Regex::new(r"\S\s+\p{Lu}.*\s\p{Lu}").unwrap();

    /// One initial capital after the line start
    static ref RE_CAPSMIDLETTER: Regex = Regex::new(r"\S\s+\p{Lu}").unwrap();

    /// Digits only
    static ref RE_DIGITS: Regex = Regex::new(r"^\d+$").unwrap();

    /// Sentence end, allowing closing quotes and a trailing note number
    static ref RE_END_PERIOD: Regex = Regex::new(r"\.[[:punct:]’”]*\s?\d{0,2}$").unwrap();

    /// Colon end, allowing a trailing note number
    static ref RE_END_COLON: Regex = Regex::new(r":\s?\d{0,2}$").unwrap();

    /// Comma end, allowing a trailing note number
    static ref RE_END_COMMA: Regex = Regex::new(r",\s?\d{0,2}$").unwrap();

    /// Keyword markers, matched as whole words against lowercased content
    static ref KEYWORDS: Vec<(&'static str, Regex)> = [
        ("keyaffirmed", r"\baffirmed\b"),
        ("keyjudge", r"\bjudge\b"),
        ("keybrief", r"\bbrief\b"),
        ("keyversus", r"\bv\b"),
        ("keyand", r"\band\b"),
        ("keybackground", r"\bbackground\b"),
        ("keydiscussion", r"\bdiscussion\b"),
        ("keyconclusion", r"\bconclusion\b"),
        ("keyanalysis", r"\banalysis\b"),
        ("keydecided", r"\bdecided\b"),
        ("keydissent", r"\bdissent\b"),
        ("keyenbanc", r"\ben\s*banc\b"),
        ("keypercuriam", r"\bper\s*curiam\b"),
        ("keyconcur", r"\bconcur\b"),
    ]
    .iter()
    .map(|(token, pattern)| (*token, Regex::new(pattern).unwrap()))
    .collect();
}

/// A generic structure element of a line, not yet tied to a window position.
///
/// A relative token displays with the `##` placeholder that
/// [`resolve`](Self::resolve) replaces with the signed offset of the line
/// within a window. A fixed token resolves to its bare name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureToken {
    name: String,
    #[serde(default = "relative_default")]
    relative: bool,
}

fn relative_default() -> bool {
    true
}

impl StructureToken {
    /// Create a token that is resolved relative to the window position.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relative: true,
        }
    }

    /// Create a token that keeps its bare name in every window.
    pub fn fixed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relative: false,
        }
    }

    /// Token name without placeholder.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the token needs an offset when resolved.
    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// Render the token relative to a window position.
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_sections::layout::StructureToken;
    ///
    /// let token = StructureToken::new("lnfull");
    /// assert_eq!(token.resolve(-2), "lnfull-2");
    /// assert_eq!(token.resolve(0), "lnfull0");
    /// assert_eq!(token.resolve(1), "lnfull+1");
    /// assert_eq!(StructureToken::fixed("lnfull").resolve(1), "lnfull");
    /// ```
    pub fn resolve(&self, offset: isize) -> String {
        if self.relative {
            format!("{}{}", self.name, format_offset(offset))
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for StructureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relative {
            write!(f, "{}##", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

fn within(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

/// Token collector in emission order.
#[derive(Default)]
struct Tokens(Vec<StructureToken>);

impl Tokens {
    fn push(&mut self, name: impl Into<String>) {
        self.0.push(StructureToken::new(name));
    }
}

/// Annotate one line of a page.
///
/// # Arguments
///
/// * `page` - The page holding the line, for margins and page-relative position
/// * `index` - Rank-order index of the line within the page
///
/// # Returns
///
/// The line's structure tokens in a fixed category order. An out-of-range
/// index yields no tokens.
pub fn annotate_line(page: &Page, index: usize) -> Vec<StructureToken> {
    let Some(line) = page.lines.get(index) else {
        return Vec::new();
    };
    let mut tokens = Tokens::default();
    let blank = line.is_blank();

    // type
    if blank {
        tokens.push("blank");
    }
    if line.types.is_only(LineType::Text) {
        tokens.push("text");
    }
    if line.types.contains(LineType::Note) {
        tokens.push("note");
    }
    if line.types.contains(LineType::Header) {
        tokens.push("header");
    }
    if line.types.contains(LineType::Footer) {
        tokens.push("footer");
    }

    // out-of-order line
    if line.seq.abs_diff(line.rank) > SCRAMBLE_DISTANCE {
        tokens.push(format!("lnumb{}", line.seq));
        tokens.push(format!("lrank{}", line.rank));
        tokens.push("lnscrambled");
    }

    let lm = page.left_margin;
    let indent = page.indent;
    let tol = ALIGN_TOLERANCE;

    if within(line.x, lm + indent, tol) {
        tokens.push("indent");
    } else if within(line.x, lm + 2.0 * indent, tol) {
        tokens.push("indent2");
    } else if line.x > lm + 2.0 * indent + tol {
        tokens.push("indent_multi");
    }

    if !blank {
        push_width(&mut tokens, page, line);

        if line.font_size > 13.0 {
            tokens.push("fontlrg");
        } else if line.font_size < 10.0 {
            tokens.push("fontsml");
        } else {
            tokens.push("fontmed");
        }
    }

    if line.spacing < 10.0 {
        tokens.push("spaced_vsm");
    } else if line.spacing > 30.0 {
        tokens.push("spaced_vlg");
    } else {
        match line.spacing.round() as i32 {
            10 | 12 => tokens.push("spaced_sml"),
            15 => tokens.push("spaced_med"),
            20 => tokens.push("spaced_lrg"),
            30 => tokens.push("spaced_xlg"),
            _ => {},
        }
    }

    if line.rank == 0 {
        tokens.push("start_page");
    }
    if page.note_first_rank == Some(line.rank) {
        tokens.push("start_notes");
    }
    if line.rank + 1 == page.len() {
        tokens.push("end_page");
    }

    push_content(&mut tokens, &line.content);
    tokens.0
}

fn push_width(tokens: &mut Tokens, page: &Page, line: &Line) {
    let tol = ALIGN_TOLERANCE;
    let (x, x_max) = (line.x, line.x_max);
    let (lm, rm, indent) = (page.left_margin, page.right_margin, page.indent);
    let width = line.width();
    let mut full = false;

    if within(x, lm, tol) && within(x_max, rm, tol) {
        tokens.push("lnfull");
        full = true;
    } else if within(x, lm + indent, tol) && within(x_max, rm, tol) {
        tokens.push("lnindent");
    } else if within(x, lm + 2.0 * indent, tol) && within(x_max, rm, tol) {
        tokens.push("lndblindent");
    } else if within(x, lm + indent, tol) && within(x_max, rm - indent, tol) {
        tokens.push("lnlrindent");
    } else if width > 0.5 * page.text_width() {
        tokens.push("lninter");
    } else if width <= indent {
        tokens.push("lnshort");
    } else {
        tokens.push("lnmed");
    }

    if !full && within(rm - x_max, x - lm, tol) {
        tokens.push("centered");
    }
    if within(x, lm, tol) {
        tokens.push("lnleft");
    }
    if within(x_max, rm, tol) {
        tokens.push("lnright");
    }
}

fn push_content(tokens: &mut Tokens, content: &str) {
    let trimmed = content.trim();
    if RE_OUTLINE.is_match(trimmed) {
        tokens.push("outline");
    }

    let clean = filter_all(trimmed);
    if RE_CAPSLINE.is_match(&clean) {
        tokens.push("capsline");
    } else if RE_CAPS1WORD.is_match(&clean) {
        tokens.push("caps1word");
    } else if RE_CAPS1LETTER.is_match(&clean) {
        tokens.push("caps1letter");
    }

    if RE_CAPSMID2WORD.is_match(&clean) {
        tokens.push("capsmid2word");
    } else if RE_CAPSMIDWORD.is_match(&clean) {
        tokens.push("capsmidword");
    }

    if RE_CAPSMID2LETTER.is_match(&clean) {
        tokens.push("capsmid2letter");
    } else if RE_CAPSMIDLETTER.is_match(&clean) {
        tokens.push("capsmidletter");
    }

    if RE_DIGITS.is_match(&clean.replace(' ', "")) {
        tokens.push("numsline");
    }

    let lower = clean.to_lowercase();
    for (token, re) in KEYWORDS.iter() {
        if re.is_match(&lower) {
            tokens.push(*token);
        }
    }

    let xml = filter_xml(trimmed);
    if RE_END_PERIOD.is_match(&xml) {
        tokens.push("end_period");
    } else if RE_END_COLON.is_match(&xml) {
        tokens.push("end_colon");
    } else if RE_END_COMMA.is_match(&xml) {
        tokens.push("end_comma");
    }
}

/// Annotate every line of a document in place.
///
/// The first line of the first page additionally starts with [`BEGIN_TOKEN`]
/// and the last line of the last page ends with [`END_TOKEN`]. A single-line
/// document receives both.
pub fn annotate_document(doc: &mut Document) {
    for page in doc.pages.iter_mut() {
        for index in 0..page.len() {
            let tokens = annotate_line(page, index);
            page.lines[index].structure = tokens;
        }
    }

    if let Some(first) = doc.pages.first_mut().and_then(|p| p.lines.first_mut()) {
        first.structure.insert(0, StructureToken::new(BEGIN_TOKEN));
    }
    if let Some(last) = doc.pages.last_mut().and_then(|p| p.lines.last_mut()) {
        last.structure.push(StructureToken::new(END_TOKEN));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::line::{Line, LineTypes};

    fn names(tokens: &[StructureToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.name()).collect()
    }

    fn page_with(lines: Vec<Line>) -> Page {
        let mut page = Page::new(1, 72.0, 540.0, 36.0);
        for line in lines {
            page.push(line);
        }
        page
    }

    #[test]
    fn test_token_display() {
        let token = StructureToken::new("capsline");
        assert_eq!(token.to_string(), "capsline##");
        assert_eq!(token.resolve(2), "capsline+2");

        let fixed = StructureToken::fixed("capsline");
        assert_eq!(fixed.to_string(), "capsline");
        assert!(!fixed.is_relative());
    }

    #[test]
    fn test_token_name_with_hashes_is_not_rewritten() {
        let token = StructureToken::new("lnumb##7");
        assert_eq!(token.resolve(-1), "lnumb##7-1");
    }

    #[test]
    fn test_within_is_inclusive() {
        assert!(within(72.0, 88.0, 16.0));
        assert!(!within(72.0, 88.5, 16.0));
    }

    #[test]
    fn test_scrambled_line() {
        let page = page_with(vec![
            Line::new("a", 0),
            Line::new("b", 1),
            Line::new("c", 2).with_seq(10),
        ]);
        let tokens = annotate_line(&page, 2);
        let names = names(&tokens);
        assert!(names.contains(&"lnumb10"));
        assert!(names.contains(&"lrank2"));
        assert!(names.contains(&"lnscrambled"));

        let tokens = annotate_line(&page, 1);
        assert!(!names_contain(&tokens, "lnscrambled"));
    }

    fn names_contain(tokens: &[StructureToken], name: &str) -> bool {
        tokens.iter().any(|t| t.name() == name)
    }

    #[test]
    fn test_indent_levels() {
        let page = page_with(vec![
            Line::new("flush", 0).with_extent(72.0, 300.0),
            Line::new("one", 1).with_extent(110.0, 300.0),
            Line::new("two", 2).with_extent(144.0, 300.0),
            Line::new("deep", 3).with_extent(200.0, 300.0),
        ]);
        assert!(!names_contain(&annotate_line(&page, 0), "indent"));
        assert!(names_contain(&annotate_line(&page, 1), "indent"));
        assert!(names_contain(&annotate_line(&page, 2), "indent2"));
        assert!(names_contain(&annotate_line(&page, 3), "indent_multi"));
    }

    #[test]
    fn test_width_tokens() {
        let page = page_with(vec![
            Line::new("x", 0).with_extent(108.0, 540.0),
            Line::new("x", 1).with_extent(144.0, 540.0),
            Line::new("x", 2).with_extent(108.0, 504.0),
            Line::new("x", 3).with_extent(72.0, 400.0),
            Line::new("x", 4).with_extent(72.0, 100.0),
            Line::new("x", 5).with_extent(72.0, 200.0),
        ]);
        let expect = ["lnindent", "lndblindent", "lnlrindent", "lninter", "lnshort", "lnmed"];
        for (i, token) in expect.iter().enumerate() {
            assert!(
                names_contain(&annotate_line(&page, i), token),
                "line {} should carry {}",
                i,
                token
            );
        }
    }

    #[test]
    fn test_inter_width_is_relative_to_text_area() {
        let page = page_with(vec![
            Line::new("half", 0).with_extent(72.0, 306.0),
            Line::new("more", 1).with_extent(72.0, 307.0),
        ]);
        assert!(names_contain(&annotate_line(&page, 0), "lnmed"));
        assert!(names_contain(&annotate_line(&page, 1), "lninter"));

        let mut narrow = page.clone();
        narrow.right_margin = 400.0;
        assert!(names_contain(&annotate_line(&narrow, 0), "lninter"));
    }

    #[test]
    fn test_spacing_tokens() {
        let cases = [
            (5.0, Some("spaced_vsm")),
            (12.2, Some("spaced_sml")),
            (15.0, Some("spaced_med")),
            (19.6, Some("spaced_lrg")),
            (30.0, Some("spaced_xlg")),
            (31.0, Some("spaced_vlg")),
            (24.0, None),
        ];
        for (spacing, expected) in cases {
            let page = page_with(vec![Line::new("x", 0).with_typography(spacing, 12.0)]);
            let tokens = annotate_line(&page, 0);
            let spaced: Vec<&str> = names(&tokens)
                .into_iter()
                .filter(|n| n.starts_with("spaced_"))
                .collect();
            assert_eq!(spaced, expected.into_iter().collect::<Vec<_>>(), "spacing {}", spacing);
        }
    }

    #[test]
    fn test_blank_line_skips_width_and_font() {
        let line = Line::new("", 0)
            .with_types(LineTypes::new().with(LineType::Blank))
            .with_typography(15.0, 12.0);
        let page = page_with(vec![line, Line::new("next", 1)]);
        let tokens = annotate_line(&page, 0);
        assert_eq!(names(&tokens), vec!["blank", "spaced_med", "start_page"]);
    }

    #[test]
    fn test_notes_start() {
        let mut page = page_with(vec![Line::new("a", 0), Line::new("1 See id.", 1)]);
        page = page.with_notes_from(1);
        let tokens = annotate_line(&page, 1);
        assert!(names_contain(&tokens, "start_notes"));
        assert!(names_contain(&tokens, "end_page"));
    }

    #[test]
    fn test_keywords() {
        let page = page_with(vec![
            Line::new("AFFIRMED in part and REVERSED", 0),
            Line::new("Judge Smith, dissenting", 1),
            Line::new("Smith v. Jones", 2),
            Line::new("Heard en banc; per curiam.", 3),
        ]);
        let t0 = annotate_line(&page, 0);
        assert!(names_contain(&t0, "keyaffirmed"));
        assert!(names_contain(&t0, "keyand"));
        let t1 = annotate_line(&page, 1);
        assert!(names_contain(&t1, "keyjudge"));
        assert!(!names_contain(&t1, "keydissent"));
        assert!(names_contain(&annotate_line(&page, 2), "keyversus"));
        let t3 = annotate_line(&page, 3);
        assert!(names_contain(&t3, "keyenbanc"));
        assert!(names_contain(&t3, "keypercuriam"));
    }

    #[test]
    fn test_line_endings() {
        let page = page_with(vec![
            Line::new("the motion is denied.\u{201D} 12", 0),
            Line::new("as follows:", 1),
            Line::new("Smith,", 2),
            Line::new("no ending", 3),
        ]);
        assert!(names_contain(&annotate_line(&page, 0), "end_period"));
        assert!(names_contain(&annotate_line(&page, 1), "end_colon"));
        assert!(names_contain(&annotate_line(&page, 2), "end_comma"));
        let t3 = annotate_line(&page, 3);
        assert!(!t3.iter().any(|t| t.name().starts_with("end_")));
    }

    #[test]
    fn test_out_of_range_index() {
        let page = page_with(vec![]);
        assert!(annotate_line(&page, 0).is_empty());
    }

    #[test]
    fn test_annotate_document_markers() {
        let mut doc = Document::new("one", vec![page_with(vec![Line::new("only", 0)])]);
        annotate_document(&mut doc);
        let structure = &doc.pages[0].lines[0].structure;
        assert_eq!(structure.first().map(|t| t.name()), Some(BEGIN_TOKEN));
        assert_eq!(structure.last().map(|t| t.name()), Some(END_TOKEN));
    }
}
