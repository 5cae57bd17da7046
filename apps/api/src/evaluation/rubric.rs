//! Rubric: the explicit configuration the fallback engine runs on.
//!
//! Everything the segmenter, scorer and synthesizer need to know about the
//! CV vocabulary lives here: narrative headings, per-category keyword
//! tables, default texts, context markers and role-inference rules.
//! `Rubric::standard()` is the canonical multi-industry table.

use regex::Regex;

use crate::evaluation::models::{CategoryAssessment, CategoryId};

/// Baseline score for every category before any heuristic runs.
pub const BASELINE_SCORE: u8 = 5;

/// A named span the segmenter can locate in narrative text.
///
/// Categories map onto report categories one-to-one; the other keys are
/// folded into neighbouring fields by the synthesizer.
///
/// Declaration order is the order sections are applied in: `Overall`
/// replaces the detailed assessment, so it must precede `Interests`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKey {
    Category(CategoryId),
    Objective,
    Strengths,
    Overall,
    Interests,
}

/// One row of the boundary table.
#[derive(Debug, Clone)]
pub struct SectionBoundary {
    pub key: SectionKey,
    pub start: Regex,
    /// Headings that terminate this section's body.
    pub next: Vec<SectionKey>,
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordTable {
    pub positive: &'static [&'static str],
    pub negative: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct CategoryRubric {
    pub id: CategoryId,
    pub keywords: KeywordTable,
    pub default_commentary: &'static str,
    pub default_suggestion: &'static str,
}

impl CategoryRubric {
    pub fn default_assessment(&self) -> CategoryAssessment {
        CategoryAssessment {
            score: BASELINE_SCORE,
            commentary: self.default_commentary.to_string(),
            suggestion: self.default_suggestion.to_string(),
        }
    }
}

/// Cross-category context bonuses applied by the scorer.
#[derive(Debug, Clone, Copy)]
pub struct ContextMarkers {
    /// Any of these in the source document: +1.
    pub achievement: &'static [&'static str],
    /// Any of these in the source document...
    pub project: &'static [&'static str],
    /// ...together with any of these in the span: +1.
    pub results: &'static [&'static str],
}

/// A role suggestion that fires when the CV shows any of its skills or markers.
#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub role: &'static str,
    pub rationale: &'static str,
    /// Matched against extracted skills (exact, lower-case).
    pub any_skills: &'static [&'static str],
    /// Matched as whole words of the lower-cased source document.
    pub any_markers: &'static [&'static str],
}

impl RoleRule {
    /// Markers that occur as whole words in `source_lower`, in rule order.
    pub fn marker_hits<'a>(
        &'a self,
        source_lower: &'a str,
    ) -> impl Iterator<Item = &'static str> + 'a {
        self.any_markers
            .iter()
            .copied()
            .filter(move |marker| contains_word(source_lower, marker))
    }
}

/// True when `word` occurs in `haystack` with no alphanumeric character on
/// either side, so "tutor" does not fire inside "tutorial".
pub fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[derive(Debug, Clone)]
pub struct Rubric {
    pub categories: Vec<CategoryRubric>,
    pub boundaries: Vec<SectionBoundary>,
    pub markers: ContextMarkers,
    pub role_rules: Vec<RoleRule>,
    pub fallback_role: &'static str,
    pub market_trend_note: &'static str,
}

impl Rubric {
    pub fn category(&self, id: CategoryId) -> Option<&CategoryRubric> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// The canonical multi-industry rubric.
    pub fn standard() -> Self {
        let headings: Vec<(SectionKey, &str)> = vec![
            (
                SectionKey::Category(CategoryId::PersonalInfo),
                r"personal\s+info(?:rmation)?|contact\s+(?:info(?:rmation)?|details)",
            ),
            (SectionKey::Objective, r"(?:career\s+)?objective"),
            (
                SectionKey::Category(CategoryId::Education),
                r"education(?:al\s+background)?|academic\s+background",
            ),
            (
                SectionKey::Category(CategoryId::Experience),
                r"(?:work\s+|professional\s+)?experience(?:\s+and\s+achievements)?",
            ),
            (SectionKey::Category(CategoryId::Skills), r"skills?"),
            (
                SectionKey::Category(CategoryId::Projects),
                r"projects?(?:\s*/\s*portfolio)?|portfolio",
            ),
            (
                SectionKey::Category(CategoryId::Formatting),
                r"structure\s+and\s+format(?:ting)?|format(?:ting)?|layout",
            ),
            (
                SectionKey::Category(CategoryId::LanguageQuality),
                r"language\s+and\s+expression|language(?:\s+quality)?|writing",
            ),
            (
                SectionKey::Strengths,
                r"(?:key\s+|knowledge\s+and\s+)?strengths",
            ),
            (SectionKey::Interests, r"interests|hobbies"),
            (
                SectionKey::Overall,
                r"overall(?:\s+assessment)?|conclusion|in\s+summary",
            ),
        ];

        let keys: Vec<SectionKey> = headings.iter().map(|(key, _)| *key).collect();
        let boundaries = headings
            .iter()
            .map(|(key, label)| SectionBoundary {
                key: *key,
                start: heading_pattern(label),
                next: keys.iter().copied().filter(|k| k != key).collect(),
            })
            .collect();

        Self {
            categories: standard_categories(),
            boundaries,
            markers: ContextMarkers {
                achievement: &["gpa", "certification", "certificate"],
                project: &["project"],
                results: &["result", "outcome"],
            },
            role_rules: standard_role_rules(),
            fallback_role: "Entry-level generalist: the CV does not yet show a clear \
                specialisation; add concrete skills and projects to target a field.",
            market_trend_note: "Hiring across industries currently favours practical skills, \
                fluency with modern tools, concrete project experience and adaptability. \
                The CV should add detail, certifications and evidence of skills to stay competitive.",
        }
    }
}

/// Compiles a line-anchored, case-insensitive heading that ends with a colon.
///
/// Tolerates markdown headers (`##`), bold markers and list numbering such as
/// `3.` or `3)` around the label.
pub fn heading_pattern(label: &str) -> Regex {
    let pattern = format!(
        r"(?im)^[ \t]*(?:#+[ \t]*)?(?:\*\*)?[ \t]*(?:\d+[.)][ \t]*)?(?:\*\*)?[ \t]*(?:{label})[ \t]*(?:\*\*)?[ \t]*:(?:\*\*)?"
    );
    Regex::new(&pattern).expect("built-in heading pattern must compile")
}

fn standard_categories() -> Vec<CategoryRubric> {
    vec![
        CategoryRubric {
            id: CategoryId::PersonalInfo,
            keywords: KeywordTable {
                positive: &["complete", "clear", "professional", "linkedin", "email", "address"],
                negative: &["missing", "inappropriate", "icon", "unprofessional"],
            },
            default_commentary:
                "Basic personal information is present but lacks professional detail.",
            default_suggestion:
                "Add a LinkedIn profile, use a professional email address and remove decorative icons.",
        },
        CategoryRubric {
            id: CategoryId::Education,
            keywords: KeywordTable {
                positive: &["gpa", "achievement", "certification", "clear", "relevant"],
                negative: &["missing", "irrelevant", "sparse"],
            },
            default_commentary: "Education is listed but lacks standout achievements.",
            default_suggestion:
                "List your GPA, certifications or academic projects to make this section persuasive.",
        },
        CategoryRubric {
            id: CategoryId::Experience,
            keywords: KeywordTable {
                positive: &["project", "accomplishment", "quantified", "github", "role", "result"],
                negative: &["repetitive", "lacks detail", "unconvincing", "sparse"],
            },
            default_commentary: "Work experience is thin and needs more detailed descriptions.",
            default_suggestion:
                "Use action verbs and quantify achievements (e.g. cut processing time by 20%).",
        },
        CategoryRubric {
            id: CategoryId::Skills,
            keywords: KeywordTable {
                positive: &["categorized", "specific", "proficient", "trello", "figma", "sql", "excel"],
                negative: &["generic", "lacks detail", "sparse"],
            },
            default_commentary: "Skills are listed without concrete evidence.",
            default_suggestion: "Give an example of using each skill in a project or job.",
        },
        CategoryRubric {
            id: CategoryId::Projects,
            keywords: KeywordTable {
                positive: &["project", "result", "github", "role", "portfolio"],
                negative: &["repetitive", "lacks detail", "sparse"],
            },
            default_commentary: "Projects are mentioned but lack detail.",
            default_suggestion:
                "Describe your role and the results, and link a portfolio or GitHub repository.",
        },
        CategoryRubric {
            id: CategoryId::Formatting,
            keywords: KeywordTable {
                positive: &["clear", "coherent", "professional", "readable"],
                negative: &["verbose", "repetitive", "confusing", "sparse"],
            },
            default_commentary:
                "The CV structure is basic; layout and visual consistency need work.",
            default_suggestion: "Use one consistent font, tighten spacing and keep a clear layout.",
        },
        CategoryRubric {
            id: CategoryId::LanguageQuality,
            keywords: KeywordTable {
                positive: &["coherent", "professional", "ielts", "toeic", "precise"],
                negative: &["spelling error", "generic", "sparse"],
            },
            default_commentary: "Language needs to be more professional and precise.",
            default_suggestion: "Proofread carefully and use industry-appropriate terminology.",
        },
    ]
}

fn standard_role_rules() -> Vec<RoleRule> {
    vec![
        RoleRule {
            role: "Software Developer",
            rationale: "programming skills",
            any_skills: &["python", "java", "javascript", "typescript", "rust", "react", "git"],
            any_markers: &["software engineer", "developer"],
        },
        RoleRule {
            role: "Data Analyst",
            rationale: "data and reporting tools",
            any_skills: &["sql", "excel", "tableau", "power bi"],
            any_markers: &["data analysis", "dashboard"],
        },
        RoleRule {
            role: "UI/UX Designer",
            rationale: "design tooling",
            any_skills: &["figma", "draw.io"],
            any_markers: &["wireframe", "user research"],
        },
        RoleRule {
            role: "Business Analyst / Project Coordinator",
            rationale: "planning and analysis experience",
            any_skills: &["trello", "swot"],
            any_markers: &["business analysis", "project management", "scrum", "agile"],
        },
        RoleRule {
            role: "DevOps / Cloud Engineer",
            rationale: "infrastructure tooling",
            any_skills: &["docker", "kubernetes", "aws"],
            any_markers: &["ci/cd", "devops"],
        },
        RoleRule {
            role: "Marketing Specialist",
            rationale: "marketing background",
            any_skills: &[],
            any_markers: &["marketing", "seo", "content creation"],
        },
        RoleRule {
            role: "Teacher / Trainer",
            rationale: "teaching or training background",
            any_skills: &[],
            any_markers: &["teaching", "tutor", "trainer"],
        },
        RoleRule {
            role: "Finance / Accounting Associate",
            rationale: "finance background",
            any_skills: &[],
            any_markers: &["accounting", "finance", "banking"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rubric_covers_every_category() {
        let rubric = Rubric::standard();
        for id in CategoryId::ALL {
            let category = rubric.category(id).expect("category present");
            assert!(!category.default_commentary.is_empty());
            assert!(!category.default_suggestion.is_empty());
            assert!(rubric
                .boundaries
                .iter()
                .any(|b| b.key == SectionKey::Category(id)));
        }
    }

    #[test]
    fn test_boundaries_never_terminate_on_themselves() {
        let rubric = Rubric::standard();
        for boundary in &rubric.boundaries {
            assert!(!boundary.next.contains(&boundary.key));
            assert_eq!(boundary.next.len(), rubric.boundaries.len() - 1);
        }
    }

    #[test]
    fn test_heading_pattern_accepts_common_shapes() {
        let re = heading_pattern("education");
        assert!(re.is_match("3. Education: BSc"));
        assert!(re.is_match("**3. Education:** BSc"));
        assert!(re.is_match("## Education: BSc"));
        assert!(re.is_match("   education   : BSc"));
        assert!(re.is_match("intro\n3) EDUCATION:\nBSc"));
    }

    #[test]
    fn test_heading_pattern_requires_line_start_and_colon() {
        let re = heading_pattern("education");
        assert!(!re.is_match("Her education: BSc"));
        assert!(!re.is_match("3. Education BSc"));
    }

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("worked as a tutor for two years", "tutor"));
        assert!(contains_word("ci/cd pipelines", "ci/cd"));
        assert!(contains_word("finance.", "finance"));
        assert!(!contains_word("wrote a rust tutorial", "tutor"));
        assert!(!contains_word("refinanced the loan", "finance"));
        assert!(!contains_word("web developers", "developer"));
    }

    #[test]
    fn test_role_markers_ignore_partial_words() {
        let rules = standard_role_rules();
        let teacher = rules.iter().find(|r| r.role.starts_with("Teacher")).unwrap();
        let finance = rules.iter().find(|r| r.role.starts_with("Finance")).unwrap();
        let source = "wrote a tutorial series; refinanced a mortgage";
        assert_eq!(teacher.marker_hits(source).count(), 0);
        assert_eq!(finance.marker_hits(source).count(), 0);
        let hits: Vec<_> = teacher.marker_hits("private tutor and trainer").collect();
        assert_eq!(hits, vec!["tutor", "trainer"]);
    }

    #[test]
    fn test_default_assessment_starts_at_baseline() {
        let rubric = Rubric::standard();
        let skills = rubric.category(CategoryId::Skills).unwrap();
        assert_eq!(skills.default_assessment().score, BASELINE_SCORE);
    }
}
