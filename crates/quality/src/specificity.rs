//! Specificity and data-integration scoring.
//!
//! Measures how concretely each section is grounded in quantitative data,
//! normalized to an expected density of one indicator per 50 words.

use iep_qa_core::{GeneratedContent, QuantifiedData, SpecificityResult};
use regex::Regex;
use std::collections::BTreeMap;

use crate::patterns::{self, pattern, Pattern};
use crate::text;

/// Words per expected indicator.
pub const WORDS_PER_INDICATOR: f64 = 50.0;

/// Sections scoring below this are listed as vague.
pub const VAGUE_SECTION_LEVEL: f64 = 0.5;

/// Integration score when there is no quantified data to check.
pub const NEUTRAL_INTEGRATION: f64 = 0.5;

/// Weight of the integration bonus added to the score.
pub const INTEGRATION_BONUS_WEIGHT: f64 = 0.1;

// ── Quantitative data ─────────────────────────────────────────────────────
pattern!(RE_Q_PERCENT, r"\d+(?:\.\d+)?\s*%");
pattern!(RE_Q_RATIO, r"\b\d+\s*(?:/|out of)\s*\d+\b");
pattern!(RE_Q_GRADE_LEVEL, r"\b(?:grade[- ]level|grade\s+\d+(?:\.\d+)?|\d+(?:st|nd|rd|th)\s+grade)\b");
pattern!(RE_Q_AGE_LEVEL, r"\b(?:age[- ](?:equivalent|level)|age\s+\d+(?:\.\d+)?)\b");
pattern!(
    RE_Q_STANDARD_SCORE,
    r"\b(?:standard scores?|scaled scores?|ss\s*[=:]?\s*\d+|scores?\s+(?:of\s+)?\d+)\b"
);
pattern!(RE_Q_PERCENTILE, r"\b(?:\d+(?:st|nd|rd|th)\s+percentile|percentile(?:\s+rank)?)\b");

// ── Specific measures ─────────────────────────────────────────────────────
pattern!(RE_M_RATE, r"\b(?:fluency|accuracy|words correct per minute|wcpm|wpm|rate)\b");
pattern!(
    RE_M_BASELINE,
    r"\b(?:baseline|current(?:ly)?\s+(?:level|performance|performing|functioning))\b"
);
pattern!(RE_M_ADMINISTERED, r"\b(?:administered|assessed|measured|evaluated|observed|tested)\b");
pattern!(RE_M_SUBTEST, r"\b(?:composite|subtests?|index|cluster)\b");

// ── Contextual details ────────────────────────────────────────────────────
pattern!(RE_C_WHEN_GIVEN, r"\bwhen (?:given|presented)\b");
pattern!(
    RE_C_SETTING,
    r"\b(?:classroom setting|general education (?:setting|classroom)|small[- ]group|one[- ]on[- ]one|1:1)\b"
);
pattern!(RE_C_SUPPORT, r"\bwith (?:\w+\s+)?(?:support|prompts?|assistance|accommodations?)\b");
pattern!(RE_C_ACROSS, r"\bacross (?:settings|environments|subjects|content areas|classes)\b");

// ── Data integration ──────────────────────────────────────────────────────
pattern!(
    RE_RATING_MENTION,
    r"\b(?:rat(?:ing|ed)|level)\s+(?:of\s+)?\d+\b|\b(?:below|above|at)\s+(?:grade|age)[- ]level\b|\b(?:significant|moderate|mild)\s+(?:need|deficit|concern)s?\b"
);
pattern!(RE_GE_PERCENTILE, r"\b(?:grade[- ]equivalent|age[- ]equivalent|percentile|grade[- ]level)\b");
pattern!(
    RE_BEHAVIOR_VOCAB,
    r"\b(?:behavior\w*|attention|engagement|on[- ]task|self[- ]regulation|social|emotional|compliance)\b"
);
pattern!(RE_STRENGTHS, r"\b(?:strengths?|strong|excels?|proficient)\b");
pattern!(RE_NEEDS, r"\b(?:needs?|deficits?|weakness(?:es)?|difficult(?:y|ies)|struggles?|area of concern)\b");

static QUANTITATIVE_PATTERNS: [&Pattern; 6] = [
    &RE_Q_PERCENT,
    &RE_Q_RATIO,
    &RE_Q_GRADE_LEVEL,
    &RE_Q_AGE_LEVEL,
    &RE_Q_STANDARD_SCORE,
    &RE_Q_PERCENTILE,
];
static MEASURE_PATTERNS: [&Pattern; 4] = [&RE_M_RATE, &RE_M_BASELINE, &RE_M_ADMINISTERED, &RE_M_SUBTEST];
static CONTEXT_PATTERNS: [&Pattern; 4] = [&RE_C_WHEN_GIVEN, &RE_C_SETTING, &RE_C_SUPPORT, &RE_C_ACROSS];

static INDICATOR_GROUPS: [&[&Pattern]; 3] = [&QUANTITATIVE_PATTERNS, &MEASURE_PATTERNS, &CONTEXT_PATTERNS];

/// Scores how concretely generated text is grounded in data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificityScorer;

impl SpecificityScorer {
    /// Create a new scorer.
    pub fn new() -> Self {
        Self
    }

    /// Score every section and the use of quantified data.
    ///
    /// `threshold` is the minimum overall specificity (0..1).
    pub fn score(
        &self,
        generated: &GeneratedContent,
        quantified: &QuantifiedData,
        threshold: f64,
    ) -> SpecificityResult {
        let mut section_scores = BTreeMap::new();
        let mut vague_sections = Vec::new();

        for (section, body) in generated.iter() {
            let score = section_specificity(body);
            if score < VAGUE_SECTION_LEVEL {
                vague_sections.push(section.to_string());
            }
            section_scores.insert(section.to_string(), score);
        }

        let values: Vec<f64> = section_scores.values().copied().collect();
        let overall = text::mean(&values);
        let passes_threshold = overall >= threshold;

        let corpus = generated.joined("\n").to_lowercase();
        let data_integration_score = data_integration(&corpus, quantified);
        let score = specificity_score(overall, threshold, data_integration_score);

        tracing::debug!(
            specificity = overall,
            integration = data_integration_score,
            vague = vague_sections.len(),
            "Specificity analysis complete"
        );

        let suggestions = suggestions(
            overall,
            threshold,
            &vague_sections,
            &section_scores,
            data_integration_score,
        );

        SpecificityResult {
            overall_specificity: overall,
            passes_threshold,
            vague_sections,
            section_scores,
            data_integration_score,
            score,
            suggestions,
        }
    }
}

/// Mean of the three indicator-group densities for one section, in [0, 1].
pub fn section_specificity(body: &str) -> f64 {
    let words = text::word_count(body);
    if words == 0 {
        return 0.0;
    }
    let expected = words as f64 / WORDS_PER_INDICATOR;
    let lowered = body.to_lowercase();

    let densities: Vec<f64> = INDICATOR_GROUPS
        .iter()
        .map(|group| (patterns::total_matches(group, &lowered) as f64 / expected).clamp(0.0, 1.0))
        .collect();
    text::mean(&densities)
}

/// How well the text references the quantified data that was supplied.
///
/// Each domain present in the data contributes a partial score; the result
/// is their mean, or [`NEUTRAL_INTEGRATION`] when nothing can be checked.
pub fn data_integration(corpus: &str, quantified: &QuantifiedData) -> f64 {
    let has = |p: &Pattern| if patterns::is_match(p, corpus) { 1.0 } else { 0.0 };
    let mut domain_scores = Vec::new();

    if quantified.has("academic_metrics") {
        let mentioned = mentioned_fraction(corpus, &quantified.domain_names("academic_metrics"));
        domain_scores.push(0.6 * mentioned + 0.2 * has(&RE_RATING_MENTION) + 0.2 * has(&RE_GE_PERCENTILE));
    }
    if quantified.has("behavioral_metrics") {
        let mentioned = mentioned_fraction(corpus, &quantified.domain_names("behavioral_metrics"));
        domain_scores.push(0.6 * mentioned + 0.2 * has(&RE_RATING_MENTION) + 0.2 * has(&RE_BEHAVIOR_VOCAB));
    }
    if quantified.has("grade_level_performance") {
        domain_scores.push(has(&RE_GE_PERCENTILE));
    }
    if ["strengths", "needs", "areas_of_need"].iter().any(|k| quantified.has(k)) {
        domain_scores.push(0.5 * has(&RE_STRENGTHS) + 0.5 * has(&RE_NEEDS));
    }

    if domain_scores.is_empty() {
        NEUTRAL_INTEGRATION
    } else {
        text::mean(&domain_scores)
    }
}

/// Fraction of domain names (underscores read as spaces) mentioned as whole words.
fn mentioned_fraction(corpus: &str, domains: &[String]) -> f64 {
    if domains.is_empty() {
        return 0.0;
    }
    let mentioned = domains
        .iter()
        .filter(|domain| {
            let phrase = domain.replace('_', " ").to_lowercase();
            Regex::new(&format!(r"\b{}\b", regex::escape(phrase.trim())))
                .map(|re| re.is_match(corpus))
                .unwrap_or(false)
        })
        .count();
    mentioned as f64 / domains.len() as f64
}

/// Map raw specificity to a quality contribution, plus the integration bonus.
pub fn specificity_score(specificity: f64, threshold: f64, integration: f64) -> f64 {
    let base = if specificity >= threshold {
        let headroom = 1.0 - threshold;
        if headroom > 0.0 {
            0.7 + 0.3 * (specificity - threshold) / headroom
        } else {
            1.0
        }
    } else {
        (specificity / threshold * 0.7).max(0.2)
    };
    (base + integration * INTEGRATION_BONUS_WEIGHT).min(1.0)
}

fn suggestions(
    specificity: f64,
    threshold: f64,
    vague: &[String],
    section_scores: &BTreeMap<String, f64>,
    integration: f64,
) -> Vec<String> {
    let mut out = Vec::new();
    if specificity < threshold {
        out.push(format!(
            "Increase specificity with concrete data: current {:.1}% (target: {:.1}%).",
            specificity * 100.0,
            threshold * 100.0
        ));
    }
    if !vague.is_empty() {
        let listed: Vec<String> = vague
            .iter()
            .map(|name| {
                let score = section_scores.get(name).copied().unwrap_or_default();
                format!("{} ({:.0}%)", name, score * 100.0)
            })
            .collect();
        out.push(format!(
            "Add scores, percentiles, rates, and settings to vague sections: {} (each below {:.0}% specificity).",
            listed.join(", "),
            VAGUE_SECTION_LEVEL * 100.0
        ));
    }
    if integration < NEUTRAL_INTEGRATION {
        out.push(format!(
            "Reference more of the quantified assessment data: data integration {:.0}% (target: {:.0}%); \
             cite domain names, ratings, and percentiles.",
            integration * 100.0,
            NEUTRAL_INTEGRATION * 100.0
        ));
    }
    out
}
