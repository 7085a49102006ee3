//! Raw-metric quality gates.
//!
//! Gates compare each analyzer's domain number (similarity ratio, compliance
//! ratio, term count, specificity ratio) against its threshold. Blended
//! scores never take part in gating.

use iep_qa_core::{AnalyzerKind, DetailedResults, GateComparison, QualityGate, QualityThresholds};

/// Evaluate the four raw-metric gates, in analyzer order.
pub fn evaluate_gates(results: &DetailedResults, thresholds: &QualityThresholds) -> Vec<QualityGate> {
    AnalyzerKind::ALL
        .into_iter()
        .map(|kind| evaluate_gate(kind, results, thresholds))
        .collect()
}

/// Evaluate a single analyzer's gate.
pub fn evaluate_gate(kind: AnalyzerKind, results: &DetailedResults, thresholds: &QualityThresholds) -> QualityGate {
    match kind {
        AnalyzerKind::Regurgitation => QualityGate::check(
            kind,
            results.regurgitation.overall_similarity,
            thresholds.regurgitation_max,
            GateComparison::LessThan,
        ),
        AnalyzerKind::SmartCriteria => QualityGate::check(
            kind,
            results.smart_criteria.overall_compliance,
            thresholds.smart_criteria_min,
            GateComparison::AtLeast,
        ),
        AnalyzerKind::Terminology => QualityGate::check(
            kind,
            results.terminology.total_professional_terms as f64,
            thresholds.professional_terms_min as f64,
            GateComparison::AtLeast,
        ),
        AnalyzerKind::Specificity => QualityGate::check(
            kind,
            results.specificity.overall_specificity,
            thresholds.specificity_min,
            GateComparison::AtLeast,
        ),
    }
}

/// True when every gate passed.
pub fn all_passed(gates: &[QualityGate]) -> bool {
    gates.iter().all(|g| g.passed)
}
