use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::cache::MemoStore;
use super::catalog::PolicyCatalog;
use super::classifier::ScenarioClassifier;
use super::completion::CompletionService;
use super::domain::{
    Classification, Explanation, Recommendation, ResultBundle, ScenarioId, UserPolicy, UserProfile,
};
use super::explain::ExplanationGenerator;
use super::intake::{ScenarioText, ValidationError};
use super::policy::PolicyAnalyzer;
use super::recommend::{HistoricalClaims, RecommendationEngine};
use super::risk::{RiskAssessor, RiskConfig};

/// Errors that abort an analysis request. Every other failure inside the
/// pipeline degrades into a documented fallback and never reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("analysis produced a structurally invalid result: {0}")]
    Structural(String),
}

/// The memoization stores shared by every request, created once at process
/// start and handed to the stages that cache. Clearable as a unit so test
/// runs can start cold.
#[derive(Debug)]
pub struct AnalysisCaches {
    pub classifications: Arc<MemoStore<Classification>>,
    pub explanations: Arc<MemoStore<Explanation>>,
    pub recommendations: Arc<MemoStore<Vec<Recommendation>>>,
}

impl AnalysisCaches {
    pub fn new() -> Self {
        Self {
            classifications: Arc::new(MemoStore::new()),
            explanations: Arc::new(MemoStore::new()),
            recommendations: Arc::new(MemoStore::new()),
        }
    }

    pub fn clear(&self) {
        self.classifications.clear();
        self.explanations.clear();
        self.recommendations.clear();
    }
}

impl Default for AnalysisCaches {
    fn default() -> Self {
        Self::new()
    }
}

fn default_true() -> bool {
    true
}

/// A single analysis request. Explanation and recommendations are produced
/// unless explicitly declined.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub scenario_text: String,
    #[serde(default = "default_true")]
    pub include_explanation: bool,
    #[serde(default = "default_true")]
    pub include_recommendations: bool,
    #[serde(default)]
    pub user_policy: Option<UserPolicy>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

impl AnalysisRequest {
    /// Full bundle for the given text, no customer context.
    pub fn for_text(scenario_text: impl Into<String>) -> Self {
        Self {
            scenario_text: scenario_text.into(),
            include_explanation: true,
            include_recommendations: true,
            user_policy: None,
            user_profile: None,
        }
    }
}

static SCENARIO_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_scenario_id() -> ScenarioId {
    let id = SCENARIO_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ScenarioId(format!("scn-{id:06}"))
}

/// Service composing the five pipeline stages into one analysis pass.
///
/// The classifier is the sole root of the stage graph; policy analysis and
/// risk assessment each read only its output, and the two tail stages consume
/// all three earlier results.
pub struct AnalysisService<C, H> {
    classifier: ScenarioClassifier<C>,
    policies: PolicyAnalyzer,
    risk: RiskAssessor,
    explainer: ExplanationGenerator<C>,
    recommender: RecommendationEngine<H>,
}

impl<C, H> AnalysisService<C, H>
where
    C: CompletionService,
    H: HistoricalClaims,
{
    pub fn new(
        completion: Arc<C>,
        historical: Option<Arc<H>>,
        catalog: Arc<PolicyCatalog>,
        risk_config: RiskConfig,
        caches: AnalysisCaches,
    ) -> Self {
        Self {
            classifier: ScenarioClassifier::new(
                completion.clone(),
                caches.classifications.clone(),
            ),
            policies: PolicyAnalyzer::new(catalog),
            risk: RiskAssessor::new(risk_config),
            explainer: ExplanationGenerator::new(completion, caches.explanations.clone()),
            recommender: RecommendationEngine::new(historical, caches.recommendations.clone()),
        }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<ResultBundle, AnalysisError> {
        let started = Instant::now();
        let scenario = ScenarioText::parse(&request.scenario_text)?;

        let classification = self.classifier.classify(&scenario).await?;
        let policy_analysis = self
            .policies
            .analyze(&classification, request.user_policy.as_ref());
        let risk_assessment = self.risk.assess(&classification, &scenario);

        let (explanation, recommendations) = tokio::join!(
            async {
                if request.include_explanation {
                    Some(
                        self.explainer
                            .explain(&classification, &policy_analysis, &risk_assessment)
                            .await,
                    )
                } else {
                    None
                }
            },
            async {
                if request.include_recommendations {
                    Some(self.recommender.recommend(
                        &classification,
                        &policy_analysis,
                        &risk_assessment,
                        request.user_profile.as_ref(),
                    ))
                } else {
                    None
                }
            },
        );

        let bundle = ResultBundle {
            scenario_id: next_scenario_id(),
            analyzed_at: Utc::now(),
            scenario_text: scenario.into_inner(),
            classification,
            policy_analysis,
            risk_assessment,
            explanation,
            recommendations,
            processing_time: round4(started.elapsed().as_secs_f64()),
        };

        info!(
            scenario_id = %bundle.scenario_id.0,
            category = bundle.classification.category.label(),
            risk_level = bundle.risk_assessment.risk_level.label(),
            rule_based_fallback = bundle.classification.rule_based_fallback,
            "scenario analysis complete"
        );

        Ok(bundle)
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
