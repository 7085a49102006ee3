//! Professional terminology usage.

use iep_qa_core::{CategoryUsage, GeneratedContent, TermCategory, TerminologyResult};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Categories with fewer matches than this get a targeted suggestion.
pub const WEAK_CATEGORY_LEVEL: usize = 2;

/// Average matches per category below this get a density suggestion.
pub const DENSITY_TARGET: f64 = 3.0;

/// Example terms named per weak-category suggestion.
const EXAMPLES_PER_SUGGESTION: usize = 3;

/// Canonical professional vocabulary per category.
pub fn category_terms(category: TermCategory) -> &'static [&'static str] {
    match category {
        TermCategory::Assessment => &[
            "standard score",
            "percentile rank",
            "grade equivalent",
            "age equivalent",
            "composite score",
            "subtest",
            "norm-referenced",
            "criterion-referenced",
            "curriculum-based measurement",
            "standardized assessment",
            "informal assessment",
            "progress monitoring",
            "benchmark assessment",
            "diagnostic assessment",
            "functional behavioral assessment",
            "confidence interval",
            "standard deviation",
            "baseline data",
        ],
        TermCategory::SpecialEducation => &[
            "individualized education program",
            "iep",
            "free appropriate public education",
            "fape",
            "least restrictive environment",
            "lre",
            "present levels of academic achievement",
            "specially designed instruction",
            "related services",
            "accommodations",
            "modifications",
            "annual goals",
            "short-term objectives",
            "transition services",
            "extended school year",
            "eligibility",
            "specific learning disability",
            "general education curriculum",
        ],
        TermCategory::Academic => &[
            "reading comprehension",
            "reading fluency",
            "decoding",
            "phonemic awareness",
            "phonological processing",
            "vocabulary development",
            "written expression",
            "math computation",
            "math reasoning",
            "problem solving",
            "number sense",
            "spelling",
            "oral reading",
            "sight words",
            "grade-level text",
            "multisyllabic words",
            "basic reading skills",
        ],
        TermCategory::Behavioral => &[
            "on-task behavior",
            "self-regulation",
            "executive functioning",
            "attention",
            "task initiation",
            "social skills",
            "social-emotional",
            "coping strategies",
            "replacement behavior",
            "behavior intervention plan",
            "positive behavior support",
            "antecedent",
            "work completion",
            "peer interactions",
            "emotional regulation",
            "impulse control",
            "transitions",
        ],
        TermCategory::Intervention => &[
            "explicit instruction",
            "direct instruction",
            "small group instruction",
            "evidence-based",
            "research-based",
            "scaffolding",
            "graphic organizer",
            "multisensory",
            "repeated reading",
            "guided practice",
            "visual supports",
            "check-in/check-out",
            "modeling",
            "prompting",
            "chunking",
            "response to intervention",
            "tier 2",
            "assistive technology",
        ],
    }
}

#[derive(Clone)]
struct CompiledTerm {
    category: TermCategory,
    term: &'static str,
    regex: Regex,
}

/// Counts whole-word/phrase occurrences of professional vocabulary.
#[derive(Clone)]
pub struct TerminologyAnalyzer {
    terms: Vec<CompiledTerm>,
}

impl TerminologyAnalyzer {
    /// Create a new analyzer, compiling the term table once.
    pub fn new() -> Self {
        let terms = TermCategory::ALL
            .into_iter()
            .flat_map(|category| {
                category_terms(category).iter().filter_map(move |&term| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(term)))
                        .ok()
                        .map(|regex| CompiledTerm {
                            category,
                            term,
                            regex,
                        })
                })
            })
            .collect();
        Self { terms }
    }

    /// Count term usage across all sections.
    ///
    /// `min_terms` is the minimum total occurrence count.
    pub fn analyze(&self, generated: &GeneratedContent, min_terms: usize) -> TerminologyResult {
        let corpus = generated.joined("\n").to_lowercase();

        let mut category_breakdown: BTreeMap<TermCategory, CategoryUsage> = TermCategory::ALL
            .into_iter()
            .map(|c| (c, CategoryUsage::default()))
            .collect();
        let mut distinct = BTreeSet::new();
        let mut total = 0usize;

        for compiled in &self.terms {
            let count = compiled.regex.find_iter(&corpus).count();
            if count == 0 {
                continue;
            }
            total += count;
            distinct.insert(compiled.term);
            let usage = category_breakdown.entry(compiled.category).or_default();
            usage.count += count;
            *usage.matched_terms.entry(compiled.term.to_string()).or_insert(0) += count;
        }

        let passes_threshold = total >= min_terms;
        let score = terminology_score(total, min_terms);

        tracing::debug!(
            total_terms = total,
            unique_terms = distinct.len(),
            "Terminology analysis complete"
        );

        let suggestions = suggestions(total, min_terms, &category_breakdown);

        TerminologyResult {
            total_professional_terms: total,
            unique_terms: distinct.len(),
            passes_threshold,
            category_breakdown,
            score,
            suggestions,
        }
    }
}

impl Default for TerminologyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TerminologyAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminologyAnalyzer")
            .field("terms", &self.terms.len())
            .finish()
    }
}

/// Map a raw term count to a quality contribution.
pub fn terminology_score(total: usize, min_terms: usize) -> f64 {
    if min_terms == 0 {
        return 1.0;
    }
    let total = total as f64;
    let min = min_terms as f64;
    if total >= min {
        (0.8 + 0.2 * (total - min) / min).min(1.0)
    } else {
        (total / min * 0.8).max(0.3)
    }
}

fn suggestions(
    total: usize,
    min_terms: usize,
    breakdown: &BTreeMap<TermCategory, CategoryUsage>,
) -> Vec<String> {
    let mut out = Vec::new();
    if total < min_terms {
        out.push(format!(
            "Increase professional terminology: {} term occurrences found (target: at least {}).",
            total, min_terms
        ));
    }

    for (category, usage) in breakdown {
        if usage.count >= WEAK_CATEGORY_LEVEL {
            continue;
        }
        let examples: Vec<String> = category_terms(*category)
            .iter()
            .filter(|term| !usage.matched_terms.contains_key(**term))
            .take(EXAMPLES_PER_SUGGESTION)
            .map(|term| format!("'{}'", term))
            .collect();
        out.push(format!(
            "Add more {} terminology ({} found, target: at least {}), e.g. {}.",
            category,
            usage.count,
            WEAK_CATEGORY_LEVEL,
            examples.join(", ")
        ));
    }

    let average = total as f64 / TermCategory::ALL.len() as f64;
    if average < DENSITY_TARGET {
        out.push(format!(
            "Raise terminology density: {:.1} terms per category on average (target: {:.1}).",
            average, DENSITY_TARGET
        ));
    }
    out
}
