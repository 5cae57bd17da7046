//! Heuristic scorer: pure, deterministic 1–10 score for one category span.
//!
//! Algorithm:
//! 1. Start at the baseline (5).
//! 2. +1 per positive keyword present in the span or the source CV,
//!    −1 per negative keyword present in either.
//! 3. +1 if the span is longer than 300 chars, −1 if shorter than 100.
//! 4. +1 if the CV carries an achievement marker (GPA, certification).
//! 5. +1 if the CV mentions a project and the span mentions results.
//! 6. Clamp to [1, 10].

use tracing::debug;

use crate::evaluation::rubric::{ContextMarkers, KeywordTable, BASELINE_SCORE};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

const DETAILED_SPAN_CHARS: usize = 300;
const SPARSE_SPAN_CHARS: usize = 100;

pub fn score(span: &str, keywords: &KeywordTable, source: &str, markers: &ContextMarkers) -> u8 {
    let span_lower = span.to_lowercase();
    let source_lower = source.to_lowercase();
    let mut score = i32::from(BASELINE_SCORE);

    for kw in keywords.positive {
        if span_lower.contains(kw) || source_lower.contains(kw) {
            score += 1;
            debug!("Positive keyword '{kw}' found, score +1");
        }
    }
    for kw in keywords.negative {
        if span_lower.contains(kw) || source_lower.contains(kw) {
            score -= 1;
            debug!("Negative keyword '{kw}' found, score -1");
        }
    }

    let span_chars = span.chars().count();
    if span_chars > DETAILED_SPAN_CHARS {
        score += 1;
        debug!("Span length {span_chars} > {DETAILED_SPAN_CHARS}, score +1");
    } else if span_chars < SPARSE_SPAN_CHARS {
        score -= 1;
        debug!("Span length {span_chars} < {SPARSE_SPAN_CHARS}, score -1");
    }

    if contains_any(&source_lower, markers.achievement) {
        score += 1;
        debug!("Achievement marker found in CV, score +1");
    }
    if contains_any(&source_lower, markers.project) && contains_any(&span_lower, markers.results) {
        score += 1;
        debug!("Project with results mentioned, score +1");
    }

    clamp_score(score)
}

/// Clamps any intermediate value into the valid score range.
pub fn clamp_score(raw: i32) -> u8 {
    raw.clamp(i32::from(MIN_SCORE), i32::from(MAX_SCORE)) as u8
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYWORDS: KeywordTable = KeywordTable {
        positive: &["clear", "github", "portfolio"],
        negative: &["verbose", "sparse"],
    };

    const MARKERS: ContextMarkers = ContextMarkers {
        achievement: &["gpa", "certification"],
        project: &["project"],
        results: &["result"],
    };

    /// Neutral filler that matches no keyword or marker.
    fn filler(chars: usize) -> String {
        "lorem ipsum dolor sit amet ".chars().cycle().take(chars).collect()
    }

    #[test]
    fn test_short_span_without_keywords_scores_four() {
        assert_eq!(score("Fonts vary a bit.", &KEYWORDS, "Jane Doe, baker.", &MARKERS), 4);
    }

    #[test]
    fn test_mid_length_span_stays_at_baseline() {
        let span = filler(200);
        assert_eq!(score(&span, &KEYWORDS, "", &MARKERS), 5);
    }

    #[test]
    fn test_long_span_earns_detail_bonus() {
        let span = filler(301);
        assert_eq!(score(&span, &KEYWORDS, "", &MARKERS), 6);
    }

    #[test]
    fn test_keywords_count_once_from_span_or_source() {
        let span = format!("{} clear layout", filler(150));
        // "clear" in span, "github" in source, "clear" also in source: +2 total
        assert_eq!(score(&span, &KEYWORDS, "github link, clear", &MARKERS), 7);
    }

    #[test]
    fn test_negative_keywords_subtract() {
        let span = format!("{} verbose and sparse", filler(150));
        assert_eq!(score(&span, &KEYWORDS, "", &MARKERS), 3);
    }

    #[test]
    fn test_context_bonuses() {
        let span = format!("{} the result was measurable", filler(150));
        // achievement marker +1, project + result +1
        assert_eq!(score(&span, &KEYWORDS, "GPA 3.8, final project", &MARKERS), 7);
        // results in span but no project in CV: only the achievement bonus
        assert_eq!(score(&span, &KEYWORDS, "GPA 3.8", &MARKERS), 6);
    }

    #[test]
    fn test_score_clamped_to_range() {
        let heavy = KeywordTable {
            positive: &["a", "b", "c", "d", "e", "f", "g"],
            negative: &[],
        };
        let span = format!("abcdefg {}", filler(400));
        assert_eq!(score(&span, &heavy, "gpa project", &MARKERS), MAX_SCORE);

        let harsh = KeywordTable {
            positive: &[],
            negative: &["x", "y", "z", "w", "v"],
        };
        assert_eq!(score("xyzwv", &harsh, "", &MARKERS), MIN_SCORE);
    }

    #[test]
    fn test_adding_positive_keyword_never_lowers_score() {
        let base = filler(150);
        let with_kw = format!("{base} portfolio");
        let before = score(&base, &KEYWORDS, "", &MARKERS);
        let after = score(&with_kw, &KEYWORDS, "", &MARKERS);
        assert!(after >= before);
        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_adding_negative_keyword_never_raises_score() {
        let base = filler(150);
        let with_kw = format!("{base} verbose");
        assert!(score(&with_kw, &KEYWORDS, "", &MARKERS) <= score(&base, &KEYWORDS, "", &MARKERS));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let span = format!("{} clear result", filler(320));
        let a = score(&span, &KEYWORDS, "project gpa", &MARKERS);
        let b = score(&span, &KEYWORDS, "project gpa", &MARKERS);
        assert_eq!(a, b);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 120 multi-byte chars = 240 bytes: still a mid-length span
        let span: String = "é".repeat(120);
        assert_eq!(score(&span, &KEYWORDS, "", &MARKERS), 5);
    }
}
