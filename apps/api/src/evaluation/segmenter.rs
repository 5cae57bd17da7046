//! Section segmentation: splits narrative LLM prose into named spans.
//!
//! All heading matches are collected up front, so a section that is missing
//! from the middle of the narrative never swallows or shifts later sections.

use std::collections::BTreeMap;

use tracing::debug;

use crate::evaluation::rubric::{SectionBoundary, SectionKey};

#[derive(Debug, Clone, Copy)]
struct HeadingHit {
    key: SectionKey,
    start: usize,
    end: usize,
}

/// Returns one entry per boundary row. Sections whose heading never appears
/// map to an empty string.
pub fn segment(narrative: &str, boundaries: &[SectionBoundary]) -> BTreeMap<SectionKey, String> {
    let hits: Vec<HeadingHit> = boundaries
        .iter()
        .flat_map(|b| {
            b.start.find_iter(narrative).map(move |m| HeadingHit {
                key: b.key,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect();

    boundaries
        .iter()
        .map(|boundary| {
            let body = section_body(narrative, boundary, &hits);
            debug!(
                "Extracted section {:?}: {}",
                boundary.key,
                preview(body, 100)
            );
            (boundary.key, body.to_string())
        })
        .collect()
}

fn section_body<'a>(narrative: &'a str, boundary: &SectionBoundary, hits: &[HeadingHit]) -> &'a str {
    let Some(own) = hits
        .iter()
        .filter(|h| h.key == boundary.key)
        .min_by_key(|h| h.start)
    else {
        return "";
    };

    let end = hits
        .iter()
        .filter(|h| h.start >= own.end && boundary.next.contains(&h.key))
        .map(|h| h.start)
        .min()
        .unwrap_or(narrative.len());

    narrative[own.end..end].trim()
}

/// First `max_chars` characters of `text`, for logs and templated suggestions.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
