//! Scenario analysis pipeline for incident reports.
//!
//! Validated incident text flows through a short stage graph: the classifier
//! is the sole root, policy analysis and risk assessment each read only its
//! output, and the explanation generator and recommendation engine consume
//! all three earlier results before the bundle is assembled.

pub mod cache;
pub mod catalog;
pub mod classifier;
pub mod completion;
pub mod domain;
pub mod explain;
pub mod intake;
pub mod policy;
pub mod recommend;
pub mod risk;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::MemoStore;
pub use catalog::{ExpectedCoverage, PolicyCatalog};
pub use classifier::{ClassificationError, ScenarioClassifier};
pub use completion::{
    ChatCompletionClient, CompletionError, CompletionFuture, CompletionRequest, CompletionService,
};
pub use domain::{
    Classification, CoverageGap, DrivingRecord, Explanation, FinancialImpact, GapKind,
    IncidentCategory, PolicyAnalysis, PolicyId, PolicyMetadata, Priority, Recommendation,
    RecommendationKind, ResultBundle, RiskAssessment, RiskFactor, RiskLevel, ScenarioId, Severity,
    UserPolicy, UserProfile,
};
pub use explain::ExplanationGenerator;
pub use intake::{ScenarioText, ValidationError};
pub use policy::PolicyAnalyzer;
pub use recommend::{ClaimsTrendArchive, HistoricalClaims, RecommendationEngine};
pub use risk::{RiskAssessor, RiskConfig};
pub use router::analysis_router;
pub use service::{AnalysisCaches, AnalysisError, AnalysisRequest, AnalysisService};
