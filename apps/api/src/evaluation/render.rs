//! Plain-text rendering of a stored outcome.

use std::fmt::Write;

use crate::evaluation::models::{AnalysisOutcome, CategoryId, EvaluationReport};

const BANNER: &str = "====================================";
const RULE: &str = "---------------------------------------";

pub fn render_text(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Report(report) => render_report(report),
        AnalysisOutcome::Failure(failure) => {
            format!("Error: {}\n\nRaw response:\n{}\n", failure.error, failure.raw_text)
        }
    }
}

// writeln! into a String cannot fail.
fn render_report(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{BANNER}\n=== CV EVALUATION REPORT ===\n{BANNER}\n");

    for id in CategoryId::ALL {
        let Some(assessment) = report.category(id) else {
            continue;
        };
        let _ = writeln!(out, "## {}", id.display_name().to_uppercase());
        let _ = writeln!(out, "Score: {}/10\n{RULE}", assessment.score);
        let _ = writeln!(out, "### Commentary:\n{}\n", assessment.commentary);
        let _ = writeln!(out, "### Suggestion:\n{}\n", assessment.suggestion);
    }

    let summary = &report.summary;
    let _ = writeln!(out, "## OVERALL ASSESSMENT");
    let _ = writeln!(out, "Average score: {:.1}/10\n{RULE}\n", summary.average_score);
    let _ = writeln!(out, "### Detailed assessment:\n{}\n", summary.detailed_assessment);
    write_list(&mut out, "Strengths", &summary.strengths);
    write_list(&mut out, "Weaknesses", &summary.weaknesses);
    write_list(&mut out, "Improvement suggestions", &summary.improvement_suggestions);
    let _ = writeln!(out, "### General remark:\n{}\n", summary.general_remark);
    let _ = writeln!(out, "### Job market impact:\n{}\n", summary.market_impact);

    let _ = writeln!(out, "## SUITABLE ROLES\n{RULE}");
    for role in &report.suitable_roles {
        let _ = writeln!(out, "- {role}");
    }
    let _ = writeln!(out, "\n## MARKET TRENDS\n{RULE}\n{}\n", report.market_trend_note);

    let _ = writeln!(out, "{BANNER}\n= END OF CV EVALUATION REPORT =\n{BANNER}");
    out
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "### {title}:");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::evaluation::models::SynthesisFailure;
    use crate::evaluation::rubric::Rubric;
    use crate::evaluation::synthesizer::ReportSynthesizer;

    #[test]
    fn test_report_renders_every_section_in_order() {
        let synth = ReportSynthesizer::new(Arc::new(Rubric::standard()));
        let report = synth.synthesize("Skills: SQL only.", "Skills: SQL");
        let text = render_text(&AnalysisOutcome::Report(report));

        let personal = text.find("## PERSONAL INFORMATION").unwrap();
        let language = text.find("## LANGUAGE AND EXPRESSION").unwrap();
        let overall = text.find("## OVERALL ASSESSMENT").unwrap();
        let roles = text.find("## SUITABLE ROLES").unwrap();
        assert!(personal < language && language < overall && overall < roles);
        assert!(text.contains("### Commentary:\nSQL only."));
        assert!(text.contains("Average score: 5.0/10"));
        assert!(text.trim_end().ends_with(BANNER));
    }

    #[test]
    fn test_failure_renders_error_and_raw_text() {
        let outcome = AnalysisOutcome::Failure(SynthesisFailure {
            error: "narrative is not valid UTF-8".to_string(),
            raw_text: "fo\u{fffd}o".to_string(),
        });
        let text = render_text(&outcome);
        assert!(text.starts_with("Error: narrative is not valid UTF-8"));
        assert!(text.contains("fo\u{fffd}o"));
    }
}
