use regex::Regex;
use std::{collections::HashSet, sync::LazyLock};

static PUNCTUATIONS: &str = concat!(
    r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##,
    "。，、；：？！…—·ˉ¨\"'々～‖∶＂＇｀｜〃〔〕〈〉《》「」『』．",
    "“”±×÷≤≥≠≈∈∑∏∫√∞∆∇‰€£¥§¶†‡•◦‣※←→↑↓⇌⇒⇔∀∃∧∨¬⊕⊗",
    "－＊／＝＼＾＿｀｛｜｝～￥（）【】〚〛〘〙‹›«»‽⁄",
    "⁰¹²³⁴⁵⁶⁷⁸⁹₀₁₂₃₄₅₆₇₈₉",
);

static PUNCTUATION_SET: LazyLock<HashSet<char>> =
    LazyLock::new(|| PUNCTUATIONS.chars().collect());

// Unicode punctuation and symbol classes
static PUNCT_OR_SYMBOL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{P}\p{S}]$").expect("Failed to compile PUNCT_OR_SYMBOL_REGEX")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Chinese,
    /// ASCII letters and any whitespace.
    Latin,
    Digit,
    Punctuation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub kind: SegmentKind,
    pub content: String,
}

#[inline]
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{20000}'..='\u{2A6DF}')
}

pub fn is_punctuation(c: char) -> bool {
    if PUNCTUATION_SET.contains(&c) {
        return true;
    }
    let mut buf = [0u8; 4];
    PUNCT_OR_SYMBOL_REGEX.is_match(c.encode_utf8(&mut buf))
}

/// Classifies one character; the order of the checks is significant.
pub fn char_kind(c: char) -> SegmentKind {
    if is_cjk_ideograph(c) {
        SegmentKind::Chinese
    } else if c.is_ascii_alphabetic() || c.is_whitespace() {
        SegmentKind::Latin
    } else if c.is_ascii_digit() {
        SegmentKind::Digit
    } else if is_punctuation(c) {
        SegmentKind::Punctuation
    } else {
        SegmentKind::Other
    }
}

/// Splits text into maximal runs of a single character class.
pub fn segment(text: &str) -> Vec<TextSegment> {
    let mut segments: Vec<TextSegment> = Vec::with_capacity(text.len() / 8 + 1);

    for c in text.chars() {
        let kind = char_kind(c);
        match segments.last_mut() {
            Some(last) if last.kind == kind => last.content.push(c),
            _ => segments.push(TextSegment {
                kind,
                content: c.to_string(),
            }),
        }
    }

    segments
}
