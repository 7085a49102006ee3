//! Quality assurance engine.

use async_trait::async_trait;
use iep_qa_core::{
    AnalyzerKind, ApprovalStatus, DetailedResults, GeneratedContent, QaError, QualityThresholds,
    QuantifiedData, Result, SourceDocuments, ValidationReport, ValidationRequest,
};
use std::sync::Arc;

use crate::gate::{all_passed, evaluate_gates};
use crate::regurgitation::RegurgitationDetector;
use crate::smart::SmartCriteriaValidator;
use crate::specificity::SpecificityScorer;
use crate::terminology::TerminologyAnalyzer;
use crate::text;

/// Recommendation emitted when every gate passes.
pub const ALL_GATES_PASSED: &str = "Content meets all quality gates and is ready for review.";

/// Validates generated content.
#[async_trait]
pub trait ContentValidator: Send + Sync {
    /// Run every analyzer over one request and aggregate the verdict.
    async fn validate(&self, request: &ValidationRequest) -> Result<ValidationReport>;
}

/// Runs the four analyzers and aggregates their results into one report.
#[derive(Debug, Clone)]
pub struct QualityAssuranceEngine {
    thresholds: QualityThresholds,
    regurgitation: RegurgitationDetector,
    smart: SmartCriteriaValidator,
    terminology: Arc<TerminologyAnalyzer>,
    specificity: SpecificityScorer,
}

impl QualityAssuranceEngine {
    /// Create an engine with the given thresholds.
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self {
            thresholds,
            regurgitation: RegurgitationDetector::new(),
            smart: SmartCriteriaValidator::new(),
            terminology: Arc::new(TerminologyAnalyzer::new()),
            specificity: SpecificityScorer::new(),
        }
    }

    /// Create an engine after validating the thresholds.
    pub fn with_thresholds(thresholds: QualityThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self::new(thresholds))
    }

    /// Thresholds this engine gates on.
    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Validate generated sections against sources and quantified data.
    pub fn validate_generated_content(
        &self,
        generated: &GeneratedContent,
        sources: &SourceDocuments,
        quantified: &QuantifiedData,
    ) -> ValidationReport {
        let t = &self.thresholds;
        let detailed = DetailedResults {
            regurgitation: self.regurgitation.detect(generated, sources, t.regurgitation_max),
            smart_criteria: self.smart.validate(generated, quantified, t.smart_criteria_min),
            terminology: self.terminology.analyze(generated, t.professional_terms_min),
            specificity: self.specificity.score(generated, quantified, t.specificity_min),
        };
        self.assemble(detailed)
    }

    /// Validate a decoded request synchronously.
    pub fn validate_request(&self, request: &ValidationRequest) -> ValidationReport {
        self.validate_generated_content(
            &request.generated_sections,
            &request.source_documents,
            &request.quantified_data,
        )
    }

    /// Combine per-analyzer results into the final report.
    fn assemble(&self, detailed: DetailedResults) -> ValidationReport {
        let quality_gates = evaluate_gates(&detailed, &self.thresholds);
        let passes_quality_gates = all_passed(&quality_gates);

        let scores: Vec<f64> = AnalyzerKind::ALL.iter().map(|k| detailed.score(*k)).collect();
        let overall_quality_score = text::mean(&scores).clamp(0.0, 1.0);

        let mut recommendations = Vec::new();
        if passes_quality_gates {
            recommendations.push(ALL_GATES_PASSED.to_string());
        }
        for kind in AnalyzerKind::ALL {
            recommendations.extend(detailed.suggestions(kind).iter().cloned());
        }

        let approval_status = if passes_quality_gates {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::RequiresRevision
        };

        tracing::info!(
            overall_score = overall_quality_score,
            passed = passes_quality_gates,
            failed_gates = quality_gates.iter().filter(|g| !g.passed).count(),
            "Content validation complete"
        );

        ValidationReport {
            overall_quality_score,
            passes_quality_gates,
            detailed_results: detailed,
            quality_gates,
            recommendations,
            approval_status,
        }
    }
}

impl Default for QualityAssuranceEngine {
    fn default() -> Self {
        Self::new(QualityThresholds::default())
    }
}

fn worker_error(kind: AnalyzerKind) -> impl FnOnce(tokio::task::JoinError) -> QaError {
    move |e| QaError::Worker(format!("{} analyzer did not complete: {}", kind, e))
}

#[async_trait]
impl ContentValidator for QualityAssuranceEngine {
    async fn validate(&self, request: &ValidationRequest) -> Result<ValidationReport> {
        tracing::debug!(
            sections = request.generated_sections.len(),
            sources = request.source_documents.len(),
            "Running analyzers concurrently"
        );

        let request = Arc::new(request.clone());
        let t = self.thresholds;

        let regurgitation = {
            let request = Arc::clone(&request);
            let detector = self.regurgitation.clone();
            tokio::task::spawn_blocking(move || {
                detector.detect(&request.generated_sections, &request.source_documents, t.regurgitation_max)
            })
        };
        let smart = {
            let request = Arc::clone(&request);
            let validator = self.smart;
            tokio::task::spawn_blocking(move || {
                validator.validate(&request.generated_sections, &request.quantified_data, t.smart_criteria_min)
            })
        };
        let terminology = {
            let request = Arc::clone(&request);
            let analyzer = Arc::clone(&self.terminology);
            tokio::task::spawn_blocking(move || {
                analyzer.analyze(&request.generated_sections, t.professional_terms_min)
            })
        };
        let specificity = {
            let request = Arc::clone(&request);
            let scorer = self.specificity;
            tokio::task::spawn_blocking(move || {
                scorer.score(&request.generated_sections, &request.quantified_data, t.specificity_min)
            })
        };

        let (regurgitation, smart, terminology, specificity) =
            tokio::join!(regurgitation, smart, terminology, specificity);

        let detailed = DetailedResults {
            regurgitation: regurgitation.map_err(worker_error(AnalyzerKind::Regurgitation))?,
            smart_criteria: smart.map_err(worker_error(AnalyzerKind::SmartCriteria))?,
            terminology: terminology.map_err(worker_error(AnalyzerKind::Terminology))?,
            specificity: specificity.map_err(worker_error(AnalyzerKind::Specificity))?,
        };
        Ok(self.assemble(detailed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STRONG_GOAL: &str = "The student will improve reading fluency to 80% accuracy with support \
        in the classroom within 12 weeks.";

    fn sample_content() -> GeneratedContent {
        GeneratedContent::new()
            .with_section(
                "present_levels",
                "On a standardized assessment, Jordan earned a standard score of 82 in reading \
                 comprehension (12th percentile) when given grade-level text in a small-group setting.",
            )
            .with_section("goals", STRONG_GOAL)
    }

    #[test]
    fn test_default_thresholds() {
        let engine = QualityAssuranceEngine::default();
        assert_eq!(*engine.thresholds(), QualityThresholds::default());
    }

    #[test]
    fn test_with_thresholds_rejects_invalid() {
        let bad = QualityThresholds {
            regurgitation_max: 0.0,
            ..QualityThresholds::default()
        };
        assert!(matches!(
            QualityAssuranceEngine::with_thresholds(bad),
            Err(QaError::InvalidThresholds(_))
        ));
    }

    #[test]
    fn test_report_shape() {
        let engine = QualityAssuranceEngine::default();
        let report = engine.validate_generated_content(
            &sample_content(),
            &SourceDocuments::new(),
            &QuantifiedData::default(),
        );

        let gates: Vec<AnalyzerKind> = report.quality_gates.iter().map(|g| g.gate).collect();
        assert_eq!(gates, AnalyzerKind::ALL.to_vec());
        assert!(report.detailed_results.regurgitation.passes_threshold);
        assert!((0.0..=1.0).contains(&report.overall_quality_score));

        let mean = AnalyzerKind::ALL
            .iter()
            .map(|k| report.detailed_results.score(*k))
            .sum::<f64>()
            / 4.0;
        assert!((report.overall_quality_score - mean).abs() < 1e-12);
    }

    #[test]
    fn test_gates_use_raw_metrics() {
        let engine = QualityAssuranceEngine::default();
        let report = engine.validate_generated_content(
            &sample_content(),
            &SourceDocuments::new(),
            &QuantifiedData::default(),
        );

        let terminology = &report.quality_gates[2];
        assert_eq!(terminology.gate, AnalyzerKind::Terminology);
        assert_eq!(
            terminology.actual,
            report.detailed_results.terminology.total_professional_terms as f64
        );
        assert_eq!(terminology.threshold, 15.0);
        assert!(!terminology.passed);
        assert!(!report.passes_quality_gates);
        assert_eq!(report.approval_status, ApprovalStatus::RequiresRevision);
        assert!(report.failed_gates().contains(&AnalyzerKind::Terminology));
    }

    #[test]
    fn test_recommendations_follow_analyzer_order() {
        let engine = QualityAssuranceEngine::default();
        let report = engine.validate_generated_content(
            &GeneratedContent::new().with_section("summary", "Jordan likes school."),
            &SourceDocuments::new(),
            &QuantifiedData::default(),
        );

        let smart_at = report
            .recommendations
            .iter()
            .position(|r| r.contains("No goal statements"))
            .unwrap();
        let terminology_at = report
            .recommendations
            .iter()
            .position(|r| r.contains("professional terminology"))
            .unwrap();
        let specificity_at = report
            .recommendations
            .iter()
            .position(|r| r.contains("Increase specificity"))
            .unwrap();
        assert!(smart_at < terminology_at);
        assert!(terminology_at < specificity_at);
        assert!(!report.recommendations.iter().any(|r| r == ALL_GATES_PASSED));
    }

    #[test]
    fn test_lenient_thresholds_approve() {
        let thresholds = QualityThresholds {
            regurgitation_max: 1.0,
            smart_criteria_min: 0.01,
            professional_terms_min: 0,
            specificity_min: 0.0,
        };
        let engine = QualityAssuranceEngine::with_thresholds(thresholds).unwrap();
        let report = engine.validate_generated_content(
            &sample_content(),
            &SourceDocuments::new(),
            &QuantifiedData::new(json!({"academic_metrics": {"reading": {"overall_rating": 3}}})),
        );
        assert!(report.passes_quality_gates);
        assert!(report.is_approved());
        assert_eq!(report.recommendations[0], ALL_GATES_PASSED);
        assert!(report.failed_gates().is_empty());
    }

    #[tokio::test]
    async fn test_async_matches_sync() {
        let engine = QualityAssuranceEngine::default();
        let request = ValidationRequest::new(
            sample_content(),
            ["Jordan enjoys drawing and building with blocks at home with an older sibling."]
                .into_iter()
                .collect(),
            QuantifiedData::new(json!({"academic_metrics": {"reading": {}}})),
        );

        let sync_report = engine.validate_request(&request);
        let async_report = engine.validate(&request).await.unwrap();
        assert_eq!(sync_report, async_report);
    }

    #[tokio::test]
    async fn test_validator_as_trait_object() {
        let validator: Arc<dyn ContentValidator> = Arc::new(QualityAssuranceEngine::default());
        let report = validator.validate(&ValidationRequest::default()).await.unwrap();
        assert!(!report.passes_quality_gates);
        assert_eq!(report.detailed_results.regurgitation.score, 1.0);
        assert_eq!(report.detailed_results.smart_criteria.score, 0.0);
    }
}
