//! Report synthesis: turns narrative LLM prose plus the source CV into a
//! complete `EvaluationReport`.
//!
//! The pipeline is a chain of pure stages, each consuming and returning a
//! report value:
//!
//! seed → apply_sections → fold_signals → infer_roles → summarize → average → validate
//!
//! Every stage tolerates missing input; the worst case is a fully defaulted
//! report. The only terminal failure is undecodable input bytes.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::evaluation::models::{
    AggregateSummary, CategoryId, EvaluationReport, ExtractedSignals, SynthesisFailure,
};
use crate::evaluation::rubric::{Rubric, SectionKey};
use crate::evaluation::scorer::{self, clamp_score, MAX_SCORE};
use crate::evaluation::segmenter::{self, preview};
use crate::evaluation::signals;

const DEFAULT_DETAILED_ASSESSMENT: &str = "The CV has potential but needs more detail, \
    stronger presentation and a more professional tone to meet current hiring standards.";
const DEFAULT_STRENGTHS: [&str; 1] = ["Shows potential to grow across several fields."];
const DEFAULT_WEAKNESSES: [&str; 2] = ["Lacks specific detail.", "Presentation does not stand out."];
const DEFAULT_IMPROVEMENTS: [&str; 3] = [
    "Add more detail about projects and skills.",
    "Improve the CV layout.",
    "Proofread spelling carefully.",
];
const DEFAULT_GENERAL_REMARK: &str =
    "The CV needs revision to make a stronger impression on recruiters.";
const DEFAULT_MARKET_IMPACT: &str = "In its current form the CV meets only basic requirements \
    and needs improvement to compete in the job market.";
const OVERALL_MARKET_IMPACT: &str = "The CV has potential in several fields but needs more detail. \
    To compete, add project detail and certifications and improve the presentation.";

const OBJECTIVE_SUGGESTION: &str = "Summarise your career objective in two or three sentences, \
    focused on the value you bring to an employer.";
const STRENGTHS_SUGGESTION: &str =
    "Tie your knowledge to specific skills and illustrate it with concrete examples.";
const INTERESTS_SUGGESTION: &str =
    "Choose interests that show energy and relate to your target field.";

const SUGGESTION_PREVIEW_CHARS: usize = 200;

/// Stateless synthesis engine. Cheap to share across tasks.
#[derive(Debug, Clone)]
pub struct ReportSynthesizer {
    rubric: Arc<Rubric>,
}

impl ReportSynthesizer {
    pub fn new(rubric: Arc<Rubric>) -> Self {
        Self { rubric }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Builds a complete report from narrative prose. Never fails.
    pub fn synthesize(&self, narrative: &str, source: &str) -> EvaluationReport {
        info!(
            "Synthesizing report from narrative text ({} chars)",
            narrative.chars().count()
        );
        let rubric = self.rubric.as_ref();
        let signals = signals::extract(source);
        let sections = segmenter::segment(narrative, &rubric.boundaries);

        let report = seed(rubric);
        let report = apply_sections(report, &sections, rubric, source);
        let report = fold_signals(report, &signals);
        let report = infer_roles(report, &signals, source, rubric);
        let report = summarize(report, &signals, narrative);
        let report = average(report);
        let report = validate(report, rubric);

        info!(
            "Synthesis completed, average score {}",
            report.summary.average_score
        );
        report
    }

    /// Byte-level entry point. Undecodable input is the one terminal failure.
    pub fn synthesize_bytes(
        &self,
        narrative: &[u8],
        source: &[u8],
    ) -> Result<EvaluationReport, SynthesisFailure> {
        let failure = |what: &str, e: std::str::Utf8Error| {
            error!("Error parsing text response: {what} is not valid UTF-8: {e}");
            SynthesisFailure {
                error: format!("Failed to parse text response: {what} is not valid UTF-8"),
                raw_text: String::from_utf8_lossy(narrative).into_owned(),
            }
        };
        let narrative_text = std::str::from_utf8(narrative).map_err(|e| failure("narrative", e))?;
        let source_text = std::str::from_utf8(source).map_err(|e| failure("source document", e))?;
        Ok(self.synthesize(narrative_text, source_text))
    }

    /// Brings an upstream structured report in line with the report invariants.
    pub fn normalize(&self, report: EvaluationReport) -> EvaluationReport {
        average(validate(report, &self.rubric))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stages
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn seed(rubric: &Rubric) -> EvaluationReport {
    EvaluationReport {
        categories: rubric
            .categories
            .iter()
            .map(|c| (c.id, c.default_assessment()))
            .collect(),
        summary: AggregateSummary {
            average_score: 5.0,
            detailed_assessment: DEFAULT_DETAILED_ASSESSMENT.to_string(),
            strengths: to_strings(&DEFAULT_STRENGTHS),
            weaknesses: to_strings(&DEFAULT_WEAKNESSES),
            improvement_suggestions: to_strings(&DEFAULT_IMPROVEMENTS),
            general_remark: DEFAULT_GENERAL_REMARK.to_string(),
            market_impact: DEFAULT_MARKET_IMPACT.to_string(),
        },
        suitable_roles: Vec::new(),
        market_trend_note: rubric.market_trend_note.to_string(),
    }
}

pub(crate) fn apply_sections(
    mut report: EvaluationReport,
    sections: &BTreeMap<SectionKey, String>,
    rubric: &Rubric,
    source: &str,
) -> EvaluationReport {
    for (key, body) in sections {
        if body.is_empty() {
            warn!("No content extracted for section {key:?}, using default");
            continue;
        }
        match key {
            SectionKey::Category(id) => {
                let Some(category) = rubric.category(*id) else {
                    continue;
                };
                let entry = report
                    .categories
                    .entry(*id)
                    .or_insert_with(|| category.default_assessment());
                entry.commentary = body.clone();
                entry.suggestion = format!(
                    "Improve the detail here: {}...",
                    preview(body, SUGGESTION_PREVIEW_CHARS)
                );
                entry.score = scorer::score(body, &category.keywords, source, &rubric.markers);
            }
            SectionKey::Objective => {
                if let Some(entry) = report.categories.get_mut(&CategoryId::PersonalInfo) {
                    entry.commentary.push_str(&format!("\nCareer objective: {body}"));
                    entry.suggestion.push_str(&format!("\n{OBJECTIVE_SUGGESTION}"));
                }
            }
            SectionKey::Strengths => {
                if let Some(entry) = report.categories.get_mut(&CategoryId::Skills) {
                    entry
                        .commentary
                        .push_str(&format!("\nKnowledge and strengths: {body}"));
                    entry.suggestion.push_str(&format!("\n{STRENGTHS_SUGGESTION}"));
                }
            }
            SectionKey::Overall => {
                report.summary.detailed_assessment = body.clone();
                report.summary.general_remark = body.clone();
                report.summary.market_impact = OVERALL_MARKET_IMPACT.to_string();
            }
            SectionKey::Interests => {
                report
                    .summary
                    .detailed_assessment
                    .push_str(&format!("\nInterests: {body}"));
                report
                    .summary
                    .improvement_suggestions
                    .push(INTERESTS_SUGGESTION.to_string());
            }
        }
    }
    report
}

/// Folds CV-derived entities into the skills, projects and education
/// categories. A no-op when `signals` is empty.
pub(crate) fn fold_signals(
    mut report: EvaluationReport,
    signals: &ExtractedSignals,
) -> EvaluationReport {
    if signals.is_empty() {
        return report;
    }
    let folds = [
        (
            CategoryId::Skills,
            &signals.skills,
            "Notable skills",
            "Describe how you used {} in specific projects.",
            signals.skills.len() / 2,
        ),
        (
            CategoryId::Projects,
            &signals.projects,
            "Notable projects",
            "Give details about {} (role, results, technologies).",
            signals.projects.len(),
        ),
        (
            CategoryId::Education,
            &signals.certifications,
            "Notable certifications",
            "Emphasise {} in the CV to make it more persuasive.",
            signals.certifications.len(),
        ),
    ];

    for (id, found, label, suggestion_template, bonus) in folds {
        if found.is_empty() {
            continue;
        }
        let Some(entry) = report.categories.get_mut(&id) else {
            continue;
        };
        let joined = found.join(", ");
        entry
            .commentary
            .push_str(&format!("\n{label}: {}.", title_case(&joined)));
        entry.suggestion.push('\n');
        entry
            .suggestion
            .push_str(&suggestion_template.replace("{}", &joined));
        entry.score = usize::from(entry.score)
            .saturating_add(bonus)
            .min(usize::from(MAX_SCORE)) as u8;
    }
    report
}

pub(crate) fn infer_roles(
    mut report: EvaluationReport,
    signals: &ExtractedSignals,
    source: &str,
    rubric: &Rubric,
) -> EvaluationReport {
    let source_lower = source.to_lowercase();
    let roles: Vec<String> = rubric
        .role_rules
        .iter()
        .filter_map(|rule| {
            let evidence: Vec<&str> = rule
                .any_skills
                .iter()
                .filter(|skill| signals.skills.iter().any(|s| s == *skill))
                .copied()
                .chain(rule.marker_hits(&source_lower))
                .collect();
            if evidence.is_empty() {
                None
            } else {
                Some(format!(
                    "{}: {} ({})",
                    rule.role,
                    rule.rationale,
                    evidence.join(", ")
                ))
            }
        })
        .collect();

    report.suitable_roles = if roles.is_empty() {
        vec![rubric.fallback_role.to_string()]
    } else {
        roles
    };
    report
}

pub(crate) fn summarize(
    mut report: EvaluationReport,
    signals: &ExtractedSignals,
    narrative: &str,
) -> EvaluationReport {
    let skills = signals.skills.join(", ");
    let projects = signals.projects.join(", ");
    let certifications = signals.certifications.join(", ");

    report.summary.strengths = vec![
        if skills.is_empty() {
            "Shows potential to develop further skills.".to_string()
        } else {
            format!("Skills: {}", title_case(&skills))
        },
        if projects.is_empty() {
            "Has basic project experience.".to_string()
        } else {
            format!("Projects: {}", title_case(&projects))
        },
        if certifications.is_empty() {
            "Has a solid educational foundation.".to_string()
        } else {
            format!("Certifications: {}", title_case(&certifications))
        },
    ];

    report.summary.weaknesses = vec![
        if projects.is_empty() {
            "Project and skill descriptions lack detail."
        } else {
            "Project results should be quantified."
        }
        .to_string(),
        if narrative.to_lowercase().contains("verbose") {
            "The CV presentation is not yet optimised."
        } else {
            "The CV layout could be improved."
        }
        .to_string(),
        if certifications.is_empty() {
            "No standout certifications yet."
        } else {
            "Certifications should be highlighted more prominently."
        }
        .to_string(),
    ];

    // Keep suggestions contributed by narrative sections; replace the seeded defaults.
    let carried: Vec<String> = report
        .summary
        .improvement_suggestions
        .drain(..)
        .filter(|s| !DEFAULT_IMPROVEMENTS.contains(&s.as_str()))
        .collect();
    let mut suggestions = vec![
        "Add specific detail about projects and skills.".to_string(),
        "Improve the layout with a consistent font and sensible spacing.".to_string(),
        "Proofread and use industry-appropriate terminology.".to_string(),
        format!(
            "Highlight {} in the CV.",
            if skills.is_empty() { "your technical skills" } else { skills.as_str() }
        ),
        format!(
            "Provide portfolio links for {}.",
            if projects.is_empty() { "your projects" } else { projects.as_str() }
        ),
    ];
    suggestions.extend(carried);
    report.summary.improvement_suggestions = suggestions;
    report
}

pub(crate) fn average(mut report: EvaluationReport) -> EvaluationReport {
    report.summary.average_score = report.mean_category_score();
    report
}

/// Re-asserts the completeness invariants after all mutation.
pub(crate) fn validate(mut report: EvaluationReport, rubric: &Rubric) -> EvaluationReport {
    for category in &rubric.categories {
        let name = category.id.display_name();
        let entry = report
            .categories
            .entry(category.id)
            .or_insert_with(|| category.default_assessment());
        entry.score = clamp_score(i32::from(entry.score));
        if entry.commentary.trim().is_empty() {
            warn!("Empty commentary for {name}, using default");
            entry.commentary = non_empty_or(category.default_commentary, || {
                format!("No detailed information for {name}.")
            });
            entry.suggestion = non_empty_or(category.default_suggestion, || {
                format!("Provide more information about {name} for a more accurate assessment.")
            });
        } else if entry.suggestion.trim().is_empty() {
            warn!("Empty suggestion for {name}, using default");
            entry.suggestion = non_empty_or(category.default_suggestion, || {
                format!("Provide more information about {name} for a more accurate assessment.")
            });
        }
    }

    let summary = &mut report.summary;
    fill_if_empty(&mut summary.strengths, &DEFAULT_STRENGTHS);
    fill_if_empty(&mut summary.weaknesses, &DEFAULT_WEAKNESSES);
    fill_if_empty(&mut summary.improvement_suggestions, &DEFAULT_IMPROVEMENTS);
    if summary.detailed_assessment.trim().is_empty() {
        summary.detailed_assessment = DEFAULT_DETAILED_ASSESSMENT.to_string();
    }
    if summary.general_remark.trim().is_empty() {
        summary.general_remark = DEFAULT_GENERAL_REMARK.to_string();
    }
    if summary.market_impact.trim().is_empty() {
        summary.market_impact = DEFAULT_MARKET_IMPACT.to_string();
    }
    if report.suitable_roles.is_empty() {
        report.suitable_roles.push(rubric.fallback_role.to_string());
    }
    if report.market_trend_note.trim().is_empty() {
        report.market_trend_note = rubric.market_trend_note.to_string();
    }
    report
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Capitalises the first letter of every word: "draw.io, sql" → "Draw.Io, Sql".
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

fn non_empty_or(text: &str, fallback: impl FnOnce() -> String) -> String {
    if text.trim().is_empty() {
        fallback()
    } else {
        text.to_string()
    }
}

fn fill_if_empty(list: &mut Vec<String>, defaults: &[&str]) {
    list.retain(|s| !s.trim().is_empty());
    if list.is_empty() {
        *list = to_strings(defaults);
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
