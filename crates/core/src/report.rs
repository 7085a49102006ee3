//! Verdict model - per-analyzer results, gates, and the validation report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four independent analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    /// Source-copy detection
    Regurgitation,
    /// SMART goal compliance
    SmartCriteria,
    /// Professional vocabulary usage
    Terminology,
    /// Grounding in quantitative data
    Specificity,
}

impl AnalyzerKind {
    /// All analyzers in report order.
    pub const ALL: [AnalyzerKind; 4] = [
        AnalyzerKind::Regurgitation,
        AnalyzerKind::SmartCriteria,
        AnalyzerKind::Terminology,
        AnalyzerKind::Specificity,
    ];

    /// Stable key used in serialized reports.
    pub fn key(&self) -> &'static str {
        match self {
            AnalyzerKind::Regurgitation => "regurgitation",
            AnalyzerKind::SmartCriteria => "smart_criteria",
            AnalyzerKind::Terminology => "terminology",
            AnalyzerKind::Specificity => "specificity",
        }
    }
}

impl std::fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Final decision handed to the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Every quality gate passed
    Approved,
    /// At least one gate failed
    RequiresRevision,
}

/// Direction of a gate comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateComparison {
    /// `actual < threshold`
    LessThan,
    /// `actual >= threshold`
    AtLeast,
}

/// One hard pass/fail check on a raw metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGate {
    /// Analyzer whose metric is gated
    pub gate: AnalyzerKind,

    /// Raw metric value
    pub actual: f64,

    /// Threshold it is compared against
    pub threshold: f64,

    /// Comparison direction
    pub comparison: GateComparison,

    /// Outcome
    pub passed: bool,
}

impl QualityGate {
    /// Evaluate a gate.
    pub fn check(gate: AnalyzerKind, actual: f64, threshold: f64, comparison: GateComparison) -> Self {
        let passed = match comparison {
            GateComparison::LessThan => actual < threshold,
            GateComparison::AtLeast => actual >= threshold,
        };
        Self {
            gate,
            actual,
            threshold,
            comparison,
            passed,
        }
    }
}

/// How a flagged passage was cut from its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassageKind {
    /// A full sentence
    Sentence,
    /// A sliding word window
    Chunk,
}

/// A generated passage too close to the source material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedPassage {
    /// Section the passage came from
    pub section: String,

    /// Passage text as generated
    pub text: String,

    /// Similarity to the best-matching source span (0..1)
    pub similarity: f64,

    /// Sentence or chunk
    pub kind: PassageKind,
}

/// Regurgitation analyzer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegurgitationResult {
    /// Mean section similarity (0..100)
    pub similarity_percentage: f64,

    /// Mean section similarity (0..1), the gated metric
    pub overall_similarity: f64,

    /// Whether similarity stayed under the maximum
    pub passes_threshold: bool,

    /// Passages to paraphrase, most similar first
    pub flagged_passages: Vec<FlaggedPassage>,

    /// Scored sections -> similarity (0..100)
    pub section_similarities: BTreeMap<String, f64>,

    /// Quality contribution (0..1)
    pub score: f64,

    /// Human-readable fixes
    pub suggestions: Vec<String>,
}

/// The five SMART dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmartCriterion {
    /// Names a concrete skill and action
    Specific,
    /// Has a quantifiable target
    Measurable,
    /// Framed with supports and a realistic change
    Achievable,
    /// Tied to a need and a setting
    Relevant,
    /// Has a deadline
    TimeBound,
}

impl SmartCriterion {
    /// All criteria in rubric order.
    pub const ALL: [SmartCriterion; 5] = [
        SmartCriterion::Specific,
        SmartCriterion::Measurable,
        SmartCriterion::Achievable,
        SmartCriterion::Relevant,
        SmartCriterion::TimeBound,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            SmartCriterion::Specific => "Specific",
            SmartCriterion::Measurable => "Measurable",
            SmartCriterion::Achievable => "Achievable",
            SmartCriterion::Relevant => "Relevant",
            SmartCriterion::TimeBound => "Time-bound",
        }
    }
}

impl std::fmt::Display for SmartCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Score per SMART criterion (each 0..1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionScores {
    /// Specific
    pub specific: f64,
    /// Measurable
    pub measurable: f64,
    /// Achievable
    pub achievable: f64,
    /// Relevant
    pub relevant: f64,
    /// Time-bound
    pub time_bound: f64,
}

impl CriterionScores {
    /// Score for one criterion.
    pub fn get(&self, criterion: SmartCriterion) -> f64 {
        match criterion {
            SmartCriterion::Specific => self.specific,
            SmartCriterion::Measurable => self.measurable,
            SmartCriterion::Achievable => self.achievable,
            SmartCriterion::Relevant => self.relevant,
            SmartCriterion::TimeBound => self.time_bound,
        }
    }

    /// Set the score for one criterion.
    pub fn set(&mut self, criterion: SmartCriterion, value: f64) {
        match criterion {
            SmartCriterion::Specific => self.specific = value,
            SmartCriterion::Measurable => self.measurable = value,
            SmartCriterion::Achievable => self.achievable = value,
            SmartCriterion::Relevant => self.relevant = value,
            SmartCriterion::TimeBound => self.time_bound = value,
        }
    }

    /// Unweighted mean of the five scores.
    pub fn mean(&self) -> f64 {
        SmartCriterion::ALL.iter().map(|c| self.get(*c)).sum::<f64>() / SmartCriterion::ALL.len() as f64
    }
}

/// One extracted goal statement and its rubric scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalScore {
    /// Goal statement text
    pub text: String,

    /// Per-criterion scores
    pub criteria: CriterionScores,

    /// Mean of the criteria
    pub compliance: f64,
}

/// Goals found in one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGoalAnalysis {
    /// Number of goal statements
    pub goal_count: usize,

    /// Mean goal compliance
    pub compliance: f64,

    /// Individual goals
    pub goals: Vec<GoalScore>,
}

/// SMART criteria analyzer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartCriteriaResult {
    /// Overall compliance (0..100)
    pub compliance_percentage: f64,

    /// Overall compliance (0..1), the gated metric
    pub overall_compliance: f64,

    /// Whether compliance met the minimum
    pub passes_threshold: bool,

    /// Criteria averaging below 0.5 across all goals
    pub missing_criteria: Vec<SmartCriterion>,

    /// Average of each criterion across all goals
    pub criterion_averages: CriterionScores,

    /// Goal section -> analysis
    pub goal_analysis: BTreeMap<String, SectionGoalAnalysis>,

    /// Goal statements found across all sections
    pub total_goals: usize,

    /// Quality contribution (0..1)
    pub score: f64,

    /// Human-readable fixes
    pub suggestions: Vec<String>,
}

/// Professional vocabulary categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    /// Testing and evaluation vocabulary
    Assessment,
    /// IDEA / IEP process vocabulary
    SpecialEducation,
    /// Academic skill vocabulary
    Academic,
    /// Behavior and social-emotional vocabulary
    Behavioral,
    /// Instruction and support vocabulary
    Intervention,
}

impl TermCategory {
    /// All categories.
    pub const ALL: [TermCategory; 5] = [
        TermCategory::Assessment,
        TermCategory::SpecialEducation,
        TermCategory::Academic,
        TermCategory::Behavioral,
        TermCategory::Intervention,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            TermCategory::Assessment => "assessment",
            TermCategory::SpecialEducation => "special education",
            TermCategory::Academic => "academic",
            TermCategory::Behavioral => "behavioral",
            TermCategory::Intervention => "intervention",
        }
    }
}

impl std::fmt::Display for TermCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Term usage within one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUsage {
    /// Total occurrences
    pub count: usize,

    /// Term -> occurrences (matched terms only)
    pub matched_terms: BTreeMap<String, usize>,
}

/// Terminology analyzer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminologyResult {
    /// Occurrences across all categories, the gated metric
    pub total_professional_terms: usize,

    /// Distinct terms matched
    pub unique_terms: usize,

    /// Whether the minimum count was reached
    pub passes_threshold: bool,

    /// Category -> usage
    pub category_breakdown: BTreeMap<TermCategory, CategoryUsage>,

    /// Quality contribution (0..1)
    pub score: f64,

    /// Human-readable fixes
    pub suggestions: Vec<String>,
}

/// Specificity analyzer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificityResult {
    /// Mean section specificity (0..1), the gated metric
    pub overall_specificity: f64,

    /// Whether specificity met the minimum
    pub passes_threshold: bool,

    /// Sections scoring below 0.5
    pub vague_sections: Vec<String>,

    /// Section -> specificity (0..1)
    pub section_scores: BTreeMap<String, f64>,

    /// How well quantified data is referenced (0..1)
    pub data_integration_score: f64,

    /// Quality contribution (0..1)
    pub score: f64,

    /// Human-readable fixes
    pub suggestions: Vec<String>,
}

/// One result per analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedResults {
    /// Regurgitation
    pub regurgitation: RegurgitationResult,
    /// SMART criteria
    pub smart_criteria: SmartCriteriaResult,
    /// Terminology
    pub terminology: TerminologyResult,
    /// Specificity
    pub specificity: SpecificityResult,
}

impl DetailedResults {
    /// Blended score of one analyzer.
    pub fn score(&self, kind: AnalyzerKind) -> f64 {
        match kind {
            AnalyzerKind::Regurgitation => self.regurgitation.score,
            AnalyzerKind::SmartCriteria => self.smart_criteria.score,
            AnalyzerKind::Terminology => self.terminology.score,
            AnalyzerKind::Specificity => self.specificity.score,
        }
    }

    /// Suggestions of one analyzer.
    pub fn suggestions(&self, kind: AnalyzerKind) -> &[String] {
        match kind {
            AnalyzerKind::Regurgitation => &self.regurgitation.suggestions,
            AnalyzerKind::SmartCriteria => &self.smart_criteria.suggestions,
            AnalyzerKind::Terminology => &self.terminology.suggestions,
            AnalyzerKind::Specificity => &self.specificity.suggestions,
        }
    }
}

/// Structured verdict on one batch of generated content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Mean of the four analyzer scores
    pub overall_quality_score: f64,

    /// AND of the four raw-metric gates
    pub passes_quality_gates: bool,

    /// Per-analyzer results
    pub detailed_results: DetailedResults,

    /// Raw-metric gate checks, in analyzer order
    pub quality_gates: Vec<QualityGate>,

    /// Ordered fixes for the author
    pub recommendations: Vec<String>,

    /// Approval decision
    pub approval_status: ApprovalStatus,
}

impl ValidationReport {
    /// Whether the content may go to review as-is.
    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }

    /// Gates that did not pass.
    pub fn failed_gates(&self) -> Vec<AnalyzerKind> {
        self.quality_gates
            .iter()
            .filter(|g| !g.passed)
            .map(|g| g.gate)
            .collect()
    }
}
