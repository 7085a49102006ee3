//! IEP content quality analyzers.
//!
//! Four independent analyzers (regurgitation, SMART goals, terminology,
//! specificity) and the engine that gates and aggregates them.

#![warn(missing_docs)]

// Shared building blocks; `patterns` first so its macro is in scope.
pub mod patterns;
pub mod text;
pub mod similarity;

// Analyzers
pub mod regurgitation;
pub mod smart;
pub mod terminology;
pub mod specificity;

// Aggregation
pub mod gate;
pub mod engine;

pub use engine::{ContentValidator, QualityAssuranceEngine, ALL_GATES_PASSED};
pub use gate::{all_passed, evaluate_gates};
pub use regurgitation::RegurgitationDetector;
pub use similarity::SimilarityScorer;
pub use smart::SmartCriteriaValidator;
pub use specificity::SpecificityScorer;
pub use terminology::TerminologyAnalyzer;
