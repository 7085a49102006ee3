//! SMART goal compliance scoring.
//!
//! Goal statements are pulled from goal-like sections and scored on each
//! SMART dimension: the fraction of that dimension's patterns present, plus
//! dimension-specific bonuses, clamped to [0, 1].

use iep_qa_core::{
    CriterionScores, GeneratedContent, GoalScore, QuantifiedData, SectionGoalAnalysis,
    SmartCriteriaResult, SmartCriterion,
};
use std::collections::BTreeMap;

use crate::patterns::{self, pattern, Pattern};
use crate::text;

/// Section names containing any of these hold goal statements.
pub const GOAL_SECTION_KEYWORDS: [&str; 6] = ["goal", "objective", "will", "shall", "target", "outcome"];

/// Goal statements must be longer than this.
pub const MIN_GOAL_CHARS: usize = 30;

/// Criteria averaging below this across all goals are reported missing.
pub const MISSING_CRITERION_LEVEL: f64 = 0.5;

// ── Goal segmentation ─────────────────────────────────────────────────────
pattern!(RE_LIST_MARKER, r"(?m)^[ \t]*(?:\d+[.)]|[-*•])[ \t]+");
pattern!(RE_GOAL_HEADER, r"(?i)\b(?:goal|objective)\s*#?\d*\s*:");
pattern!(RE_GOAL_SENTENCE_BREAK, r#"(?i)[a-z%)"'](\.)\s+(?:the\s+)?[a-z]+\s+(?:will|shall)\b"#);
// "will"/"shall" are stop words for similarity (text::tokenize) but goal markers here.
pattern!(RE_WILL_SHALL, r"(?i)\b(?:will|shall)\b");

// ── Specific ──────────────────────────────────────────────────────────────
pattern!(RE_ACTION_AFTER_WILL, r"\b(?:will|shall)\s+(?:be\s+able\s+to\s+)?[a-z]+");
pattern!(
    RE_SKILL_DOMAIN,
    r"\b(?:reading|read|writing|written|math(?:ematics)?|spelling|comprehension|fluency|decoding|phonics|phonemic|vocabulary|computation|calculation|problem[- ]solving|behavior(?:al)?|social|communication|expressive|receptive|articulation|language|motor|self[- ]regulation|attention|organization)\b"
);
pattern!(
    RE_OBSERVABLE_VERB,
    r"\b(?:identif|read|writ|solv|comput|complet|demonstrat|answer|decod|spell|produc|use|initiat|respond|follow|improv|increas|decreas|reduc|state|name|retell|summariz|request)\w*\b"
);
pattern!(RE_CONDITION, r"\b(?:when given|given|when presented with|during|using|with)\b");
pattern!(
    RE_SKILL_OBJECT,
    r"\b(?:words|sentences|passages?|problems|tasks?|questions|paragraphs?|letters|sounds|skills?|assignments?|directions|steps|text)\b"
);

// ── Measurable ────────────────────────────────────────────────────────────
pattern!(RE_PERCENT, r"\d+(?:\.\d+)?\s*%|\bpercent\b");
pattern!(RE_RATIO, r"\b\d+\s*(?:/|out of)\s*\d+\b");
pattern!(RE_ACCURACY, r"\b(?:accuracy|accurately|correct(?:ly)?)\b");
pattern!(
    RE_RATE_COUNT,
    r"\b(?:words (?:correct )?per minute|wcpm|wpm|per minute|fluency|trials|opportunities|occasions|instances|consecutive)\b"
);
pattern!(
    RE_MEASUREMENT_VOCAB,
    r"\b(?:measured|assessed|monitored|evaluated|data collection|probes?|rubrics?|checklists?|observations?|curriculum[- ]based|progress monitoring)\b"
);

// ── Achievable ────────────────────────────────────────────────────────────
pattern!(
    RE_SUPPORT,
    r"\bwith(?:out)?\s+(?:\w+\s+)?(?:support|assistance|prompts?|prompting|cues?|accommodations?|scaffolds?|scaffolding|modeling)\b"
);
pattern!(RE_GROWTH, r"\b(?:improv|increas|progress|maintain|develop|build|strengthen)\w*\b");
pattern!(RE_BASELINE, r"\b(?:baseline|currently|from (?:a )?current|present level)\b");
pattern!(RE_INDEPENDENCE, r"\b(?:independently|minimal|moderate|gradual(?:ly)?|fading|reduced)\b");

// ── Relevant ──────────────────────────────────────────────────────────────
pattern!(
    RE_SETTING,
    r"\b(?:in the classroom|classroom|general education|school setting|across settings|resource room|instructional setting|school|small[- ]group)\b"
);
pattern!(
    RE_CURRICULUM,
    r"\b(?:grade[- ]level|curriculum|standards?|functional|academic|independence|post[- ]?secondary|transition)\b"
);
pattern!(RE_NEED, r"\b(?:needs?|area of need|access|participat\w*)\b");

// ── Time-bound ────────────────────────────────────────────────────────────
pattern!(
    RE_EXPLICIT_DEADLINE,
    r"\b(?:by|within)\s+(?:\d+|one|two|three|four|five|six|eight|nine|ten|twelve|eighteen|thirty[- ]six)\s+(?:instructional\s+|school\s+)?(?:weeks?|months?|days?)\b"
);
pattern!(
    RE_END_OF_PERIOD,
    r"\b(?:by the end of|by)\s+(?:the\s+)?(?:first\s+|second\s+|third\s+|fourth\s+)?(?:school year|iep year|semester|quarter|trimester|grading period|marking period|annual review|iep)\b"
);
pattern!(
    RE_FREQUENCY,
    r"\b(?:weekly|monthly|daily|biweekly|quarterly|each week|per week|every \w+ weeks)\b"
);
pattern!(
    RE_CALENDAR,
    r"\b(?:annual(?:ly)?|iep (?:period|year)|school year|semester|quarter|trimester|grading period|marking period|by (?:january|february|march|april|may|june|july|august|september|october|november|december))\b"
);

static SPECIFIC_PATTERNS: [&Pattern; 5] = [
    &RE_ACTION_AFTER_WILL,
    &RE_SKILL_DOMAIN,
    &RE_OBSERVABLE_VERB,
    &RE_CONDITION,
    &RE_SKILL_OBJECT,
];
static MEASURABLE_PATTERNS: [&Pattern; 5] = [
    &RE_PERCENT,
    &RE_RATIO,
    &RE_ACCURACY,
    &RE_RATE_COUNT,
    &RE_MEASUREMENT_VOCAB,
];
static ACHIEVABLE_PATTERNS: [&Pattern; 4] = [&RE_SUPPORT, &RE_GROWTH, &RE_BASELINE, &RE_INDEPENDENCE];
static RELEVANT_PATTERNS: [&Pattern; 4] = [&RE_SKILL_DOMAIN, &RE_SETTING, &RE_CURRICULUM, &RE_NEED];
static TIME_BOUND_PATTERNS: [&Pattern; 4] = [
    &RE_EXPLICIT_DEADLINE,
    &RE_END_OF_PERIOD,
    &RE_FREQUENCY,
    &RE_CALENDAR,
];

/// Scores goal statements against the SMART rubric.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartCriteriaValidator;

impl SmartCriteriaValidator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Score every goal found in goal-like sections.
    ///
    /// `threshold` is the minimum overall compliance (0..1). Quantified data
    /// is accepted for interface symmetry; the rubric is purely textual.
    pub fn validate(
        &self,
        generated: &GeneratedContent,
        _quantified: &QuantifiedData,
        threshold: f64,
    ) -> SmartCriteriaResult {
        let mut goal_analysis = BTreeMap::new();
        let mut all_goals: Vec<CriterionScores> = Vec::new();

        for (section, body) in generated.iter() {
            if !is_goal_section(section) {
                continue;
            }
            let goals: Vec<GoalScore> = extract_goals(body).into_iter().map(score_goal).collect();
            if goals.is_empty() {
                continue;
            }

            let compliances: Vec<f64> = goals.iter().map(|g| g.compliance).collect();
            all_goals.extend(goals.iter().map(|g| g.criteria));
            goal_analysis.insert(
                section.to_string(),
                SectionGoalAnalysis {
                    goal_count: goals.len(),
                    compliance: text::mean(&compliances),
                    goals,
                },
            );
        }

        if all_goals.is_empty() {
            tracing::warn!("No goal statements found; SMART compliance defaults to zero");
            return Self::no_goals_result(threshold);
        }

        let section_compliances: Vec<f64> = goal_analysis.values().map(|s| s.compliance).collect();
        let overall = text::mean(&section_compliances);
        let passes_threshold = overall >= threshold;
        let criterion_averages = average_criteria(&all_goals);
        let missing_criteria: Vec<SmartCriterion> = SmartCriterion::ALL
            .into_iter()
            .filter(|c| criterion_averages.get(*c) < MISSING_CRITERION_LEVEL)
            .collect();

        tracing::debug!(
            compliance = overall,
            goals = all_goals.len(),
            missing = missing_criteria.len(),
            "SMART criteria analysis complete"
        );

        let suggestions = suggestions(overall, threshold, &missing_criteria, &criterion_averages);

        SmartCriteriaResult {
            compliance_percentage: overall * 100.0,
            overall_compliance: overall,
            passes_threshold,
            missing_criteria,
            criterion_averages,
            goal_analysis,
            total_goals: all_goals.len(),
            score: smart_score(overall, threshold),
            suggestions,
        }
    }

    fn no_goals_result(threshold: f64) -> SmartCriteriaResult {
        SmartCriteriaResult {
            compliance_percentage: 0.0,
            overall_compliance: 0.0,
            passes_threshold: false,
            missing_criteria: SmartCriterion::ALL.to_vec(),
            criterion_averages: CriterionScores::default(),
            goal_analysis: BTreeMap::new(),
            total_goals: 0,
            score: 0.0,
            suggestions: vec![format!(
                "No goal statements found: add annual goals phrased as 'Student will...' with a \
                 measurable target and a timeframe (SMART compliance 0.0%, target: {:.1}%).",
                threshold * 100.0
            )],
        }
    }
}

/// Whether a section name marks goal content.
pub fn is_goal_section(name: &str) -> bool {
    let name = name.to_lowercase();
    GOAL_SECTION_KEYWORDS.iter().any(|k| name.contains(k))
}

/// Split a goal section into candidate goal statements.
///
/// Breaks at list markers, `Goal N:` / `Objective N:` headers, and at a
/// period followed by a new "... will/shall" sentence. Keeps fragments
/// longer than [`MIN_GOAL_CHARS`] that contain "will" or "shall".
pub fn extract_goals(body: &str) -> Vec<String> {
    let mut boundaries = vec![0, body.len()];
    for re in [&RE_LIST_MARKER, &RE_GOAL_HEADER].into_iter().filter_map(|p| p.as_ref()) {
        boundaries.extend(re.find_iter(body).map(|m| m.start()));
    }
    if let Some(re) = RE_GOAL_SENTENCE_BREAK.as_ref() {
        // Cut just after the period.
        boundaries.extend(re.captures_iter(body).filter_map(|c| c.get(1)).map(|m| m.end()));
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    boundaries
        .windows(2)
        .map(|w| body[w[0]..w[1]].trim())
        .filter(|fragment| {
            fragment.chars().count() > MIN_GOAL_CHARS && patterns::is_match(&RE_WILL_SHALL, fragment)
        })
        .map(|fragment| fragment.to_string())
        .collect()
}

/// Score one goal statement on all five criteria.
pub fn score_goal(goal: String) -> GoalScore {
    let lowered = goal.to_lowercase();
    let mut criteria = CriterionScores::default();
    for criterion in SmartCriterion::ALL {
        criteria.set(criterion, criterion_score(criterion, &lowered));
    }
    GoalScore {
        compliance: criteria.mean(),
        criteria,
        text: goal,
    }
}

/// Base pattern fraction plus bonuses for one criterion, clamped to [0, 1].
/// Expects lowercased text.
pub fn criterion_score(criterion: SmartCriterion, goal: &str) -> f64 {
    let set: &[&Pattern] = match criterion {
        SmartCriterion::Specific => &SPECIFIC_PATTERNS,
        SmartCriterion::Measurable => &MEASURABLE_PATTERNS,
        SmartCriterion::Achievable => &ACHIEVABLE_PATTERNS,
        SmartCriterion::Relevant => &RELEVANT_PATTERNS,
        SmartCriterion::TimeBound => &TIME_BOUND_PATTERNS,
    };
    let base = patterns::matched_patterns(set, goal) as f64 / set.len() as f64;

    let has = |p: &Pattern| patterns::is_match(p, goal);
    let bonus = match criterion {
        SmartCriterion::Specific => {
            if has(&RE_SKILL_DOMAIN) && has(&RE_OBSERVABLE_VERB) {
                0.2
            } else {
                0.0
            }
        }
        SmartCriterion::Measurable => {
            let mut bonus = 0.0;
            if has(&RE_PERCENT) || has(&RE_RATIO) {
                bonus += 0.4;
            }
            if has(&RE_MEASUREMENT_VOCAB) {
                bonus += 0.2;
            }
            bonus
        }
        SmartCriterion::Achievable => {
            if has(&RE_SUPPORT) {
                0.3
            } else {
                0.0
            }
        }
        SmartCriterion::Relevant => {
            if has(&RE_SETTING) {
                0.3
            } else {
                0.0
            }
        }
        SmartCriterion::TimeBound => {
            let mut bonus = 0.0;
            if has(&RE_EXPLICIT_DEADLINE) {
                bonus += 0.4;
            }
            if has(&RE_CALENDAR) || has(&RE_END_OF_PERIOD) {
                bonus += 0.3;
            }
            bonus
        }
    };

    (base + bonus).clamp(0.0, 1.0)
}

/// Map raw compliance to a quality contribution.
pub fn smart_score(compliance: f64, threshold: f64) -> f64 {
    if compliance >= threshold {
        (0.8 + (compliance - threshold) * 2.0).min(1.0)
    } else {
        (compliance / threshold * 0.8).max(0.2)
    }
}

fn average_criteria(goals: &[CriterionScores]) -> CriterionScores {
    let mut averages = CriterionScores::default();
    for criterion in SmartCriterion::ALL {
        let values: Vec<f64> = goals.iter().map(|g| g.get(criterion)).collect();
        averages.set(criterion, text::mean(&values));
    }
    averages
}

fn criterion_hint(criterion: SmartCriterion) -> &'static str {
    match criterion {
        SmartCriterion::Specific => "name the exact skill and observable action (e.g. 'decode multisyllabic words')",
        SmartCriterion::Measurable => "state a quantifiable target such as '80% accuracy' or '4 out of 5 trials'",
        SmartCriterion::Achievable => "describe the supports and expected growth from baseline (e.g. 'with visual prompts')",
        SmartCriterion::Relevant => "tie the goal to the area of need and an educational setting (e.g. 'in the general education classroom')",
        SmartCriterion::TimeBound => "add an explicit timeframe such as 'within 12 weeks' or 'by the end of the IEP year'",
    }
}

fn suggestions(
    compliance: f64,
    threshold: f64,
    missing: &[SmartCriterion],
    averages: &CriterionScores,
) -> Vec<String> {
    let mut out = Vec::new();
    if compliance < threshold {
        out.push(format!(
            "Strengthen SMART goal compliance: current {:.1}% (target: {:.1}%).",
            compliance * 100.0,
            threshold * 100.0
        ));
    }
    for criterion in missing {
        out.push(format!(
            "Goals are commonly missing the {} criterion (average {:.0}%, target {:.0}%): {}.",
            criterion,
            averages.get(*criterion) * 100.0,
            MISSING_CRITERION_LEVEL * 100.0,
            criterion_hint(*criterion)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SATURATED_GOAL: &str = "The student will improve reading fluency to 80% accuracy with support \
        in the classroom within 12 weeks.";

    #[test]
    fn test_goal_section_detection() {
        assert!(is_goal_section("annual_goals"));
        assert!(is_goal_section("Short-Term Objectives"));
        assert!(is_goal_section("postsecondary_outcomes"));
        assert!(!is_goal_section("present_levels"));
    }

    #[test]
    fn test_extract_numbered_goals() {
        let body = "1. Student will read grade-level passages at 90 words per minute.\n\
                    2. Student will solve two-step word problems with 80% accuracy.\n\
                    3. Short note.";
        let goals = extract_goals(body);
        assert_eq!(goals.len(), 2);
        assert!(goals[0].starts_with("1. Student will read"));
        assert!(goals[1].contains("word problems"));
    }

    #[test]
    fn test_extract_goals_split_on_sentence_break() {
        let body = "Maria will write a five-sentence paragraph using a graphic organizer. \
                    Maria will edit her paragraph for capitalization and punctuation errors.";
        let goals = extract_goals(body);
        assert_eq!(goals.len(), 2);
        assert!(goals[1].starts_with("Maria will edit"));
    }

    #[test]
    fn test_extract_goals_with_headers() {
        let body = "Goal 1: Student will answer inferential questions about grade-level text. \
                    Objective 2: Student shall request breaks using a visual card in class.";
        let goals = extract_goals(body);
        assert_eq!(goals.len(), 2);
        assert!(goals[1].starts_with("Objective 2:"));
    }

    #[test]
    fn test_sentence_break_after_multibyte_char() {
        // U+212A KELVIN SIGN case-folds to 'k' and is three bytes wide.
        let body = "Student will read passages at reading level \u{212A}. Student will write five \
                    sentences daily in class.";
        let goals = extract_goals(body);
        assert_eq!(goals.len(), 2);
        assert!(goals[0].ends_with("\u{212A}."));
        assert!(goals[1].starts_with("Student will write"));

        let validator = SmartCriteriaValidator::new();
        let content = GeneratedContent::new().with_section("goals", body);
        let result = validator.validate(&content, &QuantifiedData::default(), 0.9);
        assert_eq!(result.total_goals, 2);
    }

    #[test]
    fn test_fragments_without_will_are_dropped() {
        assert!(extract_goals("Reading instruction is provided daily in a small group setting.").is_empty());
    }

    #[test]
    fn test_saturated_goal_scores_high() {
        let scored = score_goal(SATURATED_GOAL.to_string());
        assert!(scored.compliance >= 0.8, "compliance was {}", scored.compliance);
        assert_eq!(scored.criteria.specific, 1.0);
        assert_eq!(scored.criteria.measurable, 1.0);
        assert!(scored.criteria.time_bound > 0.6);
    }

    #[test]
    fn test_vague_goal_scores_low() {
        let scored = score_goal("The student will do better in school this year overall.".to_string());
        assert!(scored.compliance < 0.5, "compliance was {}", scored.compliance);
        assert_eq!(scored.criteria.measurable, 0.0);
    }

    #[test]
    fn test_no_goal_sections_fail_with_zero() {
        let validator = SmartCriteriaValidator::new();
        let content = GeneratedContent::new().with_section("present_levels", "Reads at a second grade level.");
        let result = validator.validate(&content, &QuantifiedData::default(), 0.9);
        assert!(!result.passes_threshold);
        assert_eq!(result.overall_compliance, 0.0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.missing_criteria.len(), 5);
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn test_section_and_overall_means() {
        let validator = SmartCriteriaValidator::new();
        let content = GeneratedContent::new()
            .with_section("annual_goals", SATURATED_GOAL)
            .with_section("objectives", "The student will do better in school this year overall.");
        let result = validator.validate(&content, &QuantifiedData::default(), 0.9);

        assert_eq!(result.total_goals, 2);
        let a = result.goal_analysis["annual_goals"].compliance;
        let b = result.goal_analysis["objectives"].compliance;
        assert!((result.overall_compliance - (a + b) / 2.0).abs() < 1e-12);
        assert!((result.compliance_percentage - result.overall_compliance * 100.0).abs() < 1e-9);
        assert!(!result.passes_threshold);
    }

    #[test]
    fn test_missing_criteria_reported() {
        let validator = SmartCriteriaValidator::new();
        let content = GeneratedContent::new().with_section(
            "goals",
            "The student will use coping strategies when frustrated during independent work.",
        );
        let result = validator.validate(&content, &QuantifiedData::default(), 0.9);
        assert!(result.missing_criteria.contains(&SmartCriterion::Measurable));
        assert!(result.missing_criteria.contains(&SmartCriterion::TimeBound));
        assert!(result.suggestions.iter().any(|s| s.contains("Time-bound")));
    }

    #[test]
    fn test_score_mapping() {
        assert!((smart_score(0.95, 0.9) - 0.9).abs() < 1e-9);
        assert!((smart_score(1.0, 0.9) - 1.0).abs() < 1e-9);
        assert!((smart_score(0.45, 0.9) - 0.4).abs() < 1e-9);
        assert_eq!(smart_score(0.1, 0.9), 0.2);
    }
}
