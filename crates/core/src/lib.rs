//! IEP content quality assurance core data models.
//!
//! This crate defines the inputs, configuration, and verdict structures
//! shared by the quality analyzers and the orchestrating engine.

#![warn(missing_docs)]

// Inputs
mod content;

// Configuration
mod thresholds;

// Verdicts
mod report;
mod error;

// Re-exports
pub use content::{GeneratedContent, SourceDocuments, QuantifiedData, ValidationRequest};
pub use thresholds::QualityThresholds;
pub use report::{
    AnalyzerKind, ApprovalStatus, ValidationReport, DetailedResults,
    QualityGate, GateComparison,
    RegurgitationResult, FlaggedPassage, PassageKind,
    SmartCriteriaResult, SmartCriterion, CriterionScores, GoalScore, SectionGoalAnalysis,
    TerminologyResult, TermCategory, CategoryUsage,
    SpecificityResult,
};
pub use error::{QaError, Result};
