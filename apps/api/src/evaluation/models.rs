use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One fixed evaluation dimension of a CV.
///
/// Declaration order is the report order: `BTreeMap<CategoryId, _>` iterates
/// categories exactly as listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryId {
    PersonalInfo,
    Education,
    Experience,
    Skills,
    Projects,
    Formatting,
    LanguageQuality,
}

impl CategoryId {
    pub const ALL: [CategoryId; 7] = [
        CategoryId::PersonalInfo,
        CategoryId::Education,
        CategoryId::Experience,
        CategoryId::Skills,
        CategoryId::Projects,
        CategoryId::Formatting,
        CategoryId::LanguageQuality,
    ];

    /// Human-readable heading used in rendered reports and fallback texts.
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryId::PersonalInfo => "Personal Information",
            CategoryId::Education => "Education",
            CategoryId::Experience => "Work Experience",
            CategoryId::Skills => "Skills",
            CategoryId::Projects => "Projects / Portfolio",
            CategoryId::Formatting => "Structure and Formatting",
            CategoryId::LanguageQuality => "Language and Expression",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssessment {
    pub score: u8, // 1 – 10
    pub commentary: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateSummary {
    /// Mean of all category scores, rounded to one decimal place.
    pub average_score: f64,
    pub detailed_assessment: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub general_remark: String,
    pub market_impact: String,
}

/// The structured critique returned to callers.
///
/// `categories` is required on deserialization; everything else defaults so
/// partial upstream replies still parse and `ReportSynthesizer::normalize`
/// fills whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub categories: BTreeMap<CategoryId, CategoryAssessment>,
    #[serde(default)]
    pub summary: AggregateSummary,
    #[serde(default)]
    pub suitable_roles: Vec<String>,
    #[serde(default)]
    pub market_trend_note: String,
}

impl EvaluationReport {
    pub fn category(&self, id: CategoryId) -> Option<&CategoryAssessment> {
        self.categories.get(&id)
    }

    /// Mean of the category scores rounded to one decimal, 5.0 when there are none.
    pub fn mean_category_score(&self) -> f64 {
        if self.categories.is_empty() {
            return 5.0;
        }
        let total: u32 = self.categories.values().map(|c| u32::from(c.score)).sum();
        let mean = f64::from(total) / self.categories.len() as f64;
        (mean * 10.0).round() / 10.0
    }
}

/// Domain entities matched in the source document. Each list is
/// insertion-ordered and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedSignals {
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub certifications: Vec<String>,
}

impl ExtractedSignals {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.projects.is_empty() && self.certifications.is_empty()
    }
}

/// Terminal synthesis error. Carries the raw narrative for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisFailure {
    pub error: String,
    pub raw_text: String,
}

/// What gets stored per request: a complete report or an explicit failure.
///
/// `Failure` is listed first: untagged matching tries variants in order and a
/// report accepts any object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Failure(SynthesisFailure),
    Report(EvaluationReport),
}
