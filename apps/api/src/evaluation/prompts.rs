// LLM prompt constants for CV evaluation.
// Reuses the JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for CV evaluation.
pub fn evaluation_system() -> String {
    format!(
        "You are an experienced recruiter reviewing CVs across industries \
        (technology, business, marketing, education, finance). \
        Assess the CV honestly and specifically. {JSON_ONLY_SYSTEM}"
    )
}

/// Evaluation prompt template. Replace `{cv_text}` before sending.
///
/// The numbered headings at the bottom double as the narrative boundary
/// table, so a prose reply still segments cleanly.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate the following CV across seven categories.

Return a JSON object with this EXACT schema (no extra fields):
{
  "categories": {
    "personal-info":    {"score": 7, "commentary": "...", "suggestion": "..."},
    "education":        {"score": 6, "commentary": "...", "suggestion": "..."},
    "experience":       {"score": 5, "commentary": "...", "suggestion": "..."},
    "skills":           {"score": 6, "commentary": "...", "suggestion": "..."},
    "projects":         {"score": 5, "commentary": "...", "suggestion": "..."},
    "formatting":       {"score": 6, "commentary": "...", "suggestion": "..."},
    "language-quality": {"score": 7, "commentary": "...", "suggestion": "..."}
  },
  "summary": {
    "averageScore": 6.0,
    "detailedAssessment": "...",
    "strengths": ["..."],
    "weaknesses": ["..."],
    "improvementSuggestions": ["..."],
    "generalRemark": "...",
    "marketImpact": "..."
  },
  "suitableRoles": ["Role: why it fits"],
  "marketTrendNote": "..."
}

Rules:
- Scores are integers from 1 (very weak) to 10 (excellent).
- Every commentary and suggestion must be specific to this CV.
- averageScore is the mean of the seven category scores, one decimal place.
- suitableRoles names 1-4 roles across any industry, each with a short reason.

If you cannot produce JSON, write a plain report using exactly these headings,
each followed by a colon:
1. Personal information:
2. Education:
3. Work experience:
4. Skills:
5. Projects:
6. Structure and formatting:
7. Language and expression:
Career objective:
Key strengths:
Interests:
Overall assessment:

CV:
{cv_text}"#;

pub fn evaluation_prompt(cv_text: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE.replace("{cv_text}", cv_text)
}
