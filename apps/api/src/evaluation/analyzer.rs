//! Analysis orchestration: one LLM call, then either a structured report or
//! the narrative fallback.

use tracing::{info, warn};

use crate::evaluation::models::{AnalysisOutcome, EvaluationReport};
use crate::evaluation::prompts::{evaluation_prompt, evaluation_system};
use crate::evaluation::synthesizer::ReportSynthesizer;
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};

/// Asks the generator for an evaluation of `cv_text` and interprets the reply.
///
/// Only the upstream call can fail; every reply, however malformed, yields a
/// complete report.
pub async fn analyze(
    generator: &dyn TextGenerator,
    synthesizer: &ReportSynthesizer,
    cv_text: &str,
) -> Result<AnalysisOutcome, LlmError> {
    info!("Requesting CV evaluation ({} chars)", cv_text.chars().count());
    let reply = generator
        .generate(&evaluation_prompt(cv_text), &evaluation_system())
        .await?;
    Ok(interpret(&reply, cv_text, synthesizer))
}

/// Structured JSON first; prose goes through the synthesizer.
///
/// A reply counts as structured only if it carries at least one recognised
/// category. Anything else, including `{}` or unrelated JSON, is treated as
/// narrative.
pub fn interpret(reply: &str, cv_text: &str, synthesizer: &ReportSynthesizer) -> AnalysisOutcome {
    match serde_json::from_str::<EvaluationReport>(strip_json_fences(reply)) {
        Ok(report) if !report.categories.is_empty() => {
            info!("Received structured evaluation report");
            AnalysisOutcome::Report(synthesizer.normalize(report))
        }
        Ok(_) => {
            warn!("Structured reply has no categories, synthesizing from narrative");
            AnalysisOutcome::Report(synthesizer.synthesize(reply, cv_text))
        }
        Err(e) => {
            warn!("Reply is not a structured report ({e}), synthesizing from narrative");
            AnalysisOutcome::Report(synthesizer.synthesize(reply, cv_text))
        }
    }
}
