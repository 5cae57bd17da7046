//! Entity extraction: pattern-matches skills, projects and certifications
//! out of the source CV text.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::evaluation::models::ExtractedSignals;

static SKILL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(python|javascript|typescript|java|rust|sql|excel|figma|trello|draw\.io|swot|docker|kubernetes|aws|react|git|tableau|power bi)\b",
    )
    .expect("skill pattern must compile")
});

static PROJECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(jewelry store management system|[^\s,.;:()]+ (?:project|system|application)\b)",
    )
    .expect("project pattern must compile")
});

static CERTIFICATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\bielts\b|\btoeic\b|\btoefl\b|google ai essentials|[^\s,.;:()]+ certification\b|[^\s,.;:()]+ certificate\b)",
    )
    .expect("certification pattern must compile")
});

/// Scans the lower-cased source document once per signal kind.
/// Never fails; a CV with no recognisable vocabulary yields empty lists.
pub fn extract(source: &str) -> ExtractedSignals {
    let lowered = source.to_lowercase();
    let signals = ExtractedSignals {
        skills: distinct_matches(&SKILL_RE, &lowered),
        projects: distinct_matches(&PROJECT_RE, &lowered),
        certifications: distinct_matches(&CERTIFICATION_RE, &lowered),
    };
    debug!(
        "Extracted skills: {:?}, projects: {:?}, certifications: {:?}",
        signals.skills, signals.projects, signals.certifications
    );
    signals
}

/// Every distinct match, in first-seen order.
fn distinct_matches(re: &Regex, text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in re.find_iter(text) {
        let matched = m.as_str().trim();
        if !matched.is_empty() && !found.iter().any(|f| f == matched) {
            found.push(matched.to_string());
        }
    }
    found
}
