use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::analysis::cache::MemoStore;
use crate::analysis::catalog::PolicyCatalog;
use crate::analysis::completion::{
    CompletionError, CompletionFuture, CompletionRequest, CompletionService,
};
use crate::analysis::domain::{
    Classification, DrivingRecord, FinancialImpact, IncidentCategory, PolicyId, RiskAssessment,
    RiskFactor, RiskLevel, UserProfile,
};
use crate::analysis::intake::ScenarioText;
use crate::analysis::policy::PolicyAnalyzer;
use crate::analysis::recommend::{ClaimsTrendArchive, RecommendationEngine};
use crate::analysis::risk::{RiskAssessor, RiskConfig};
use crate::analysis::service::{AnalysisCaches, AnalysisService};

pub(super) const REAR_END_SCENARIO: &str = "I was stopped at a red light when another driver \
     rear-ended my car. There was visible damage to my rear bumper, and I'm experiencing some \
     neck pain. The incident occurred on a clear day with good visibility. The other driver \
     admitted fault and we exchanged insurance information.";

pub(super) const STOLEN_CAR_SCENARIO: &str = "My car was stolen from outside my apartment \
     building last night. I parked it at around 9 PM and discovered it was missing at 7 AM when \
     I was leaving for work. I've filed a police report, and they said there have been several \
     similar thefts in the area recently.";

pub(super) fn scenario(text: &str) -> ScenarioText {
    ScenarioText::parse(text).expect("valid scenario text")
}

/// Completion stub that replays queued responses in order and counts calls.
/// An exhausted script reports the service as unavailable.
#[derive(Default)]
pub(super) struct ScriptedCompletion {
    responses: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedCompletion {
    pub(super) fn with_responses(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|response| response.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionService for ScriptedCompletion {
    fn complete(&self, _request: CompletionRequest) -> CompletionFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut responses = self.responses.lock().expect("responses mutex poisoned");
            if responses.is_empty() {
                None
            } else {
                Some(responses.remove(0))
            }
        };
        Box::pin(async move {
            next.ok_or_else(|| CompletionError::Unconfigured("script exhausted".to_string()))
        })
    }
}

/// Completion stub that always reports the remote service as unavailable.
pub(super) struct FailingCompletion;

impl CompletionService for FailingCompletion {
    fn complete(&self, _request: CompletionRequest) -> CompletionFuture<'_> {
        Box::pin(async { Err(CompletionError::Unconfigured("offline".to_string())) })
    }
}

pub(super) fn remote_payload(category: &str, confidence: f64, policies: &[&str]) -> String {
    serde_json::json!({
        "category": category,
        "confidence": confidence,
        "relevant_policies": policies,
        "reasoning": "Model classification",
    })
    .to_string()
}

pub(super) fn classification(
    category: IncidentCategory,
    confidence: f64,
    policies: &[&str],
) -> Classification {
    Classification {
        category,
        confidence,
        relevant_policies: policies.iter().map(|policy| PolicyId::new(*policy)).collect(),
        reasoning: "fixture reasoning".to_string(),
        rule_based_fallback: false,
        processing_time: 0.0,
    }
}

pub(super) fn assessment(
    level: RiskLevel,
    score: f64,
    identified: &[RiskFactor],
) -> RiskAssessment {
    RiskAssessment {
        risk_score: score,
        risk_level: level,
        risk_factors: identified.iter().map(|factor| (*factor, true)).collect(),
        identified_factors: identified.to_vec(),
        confidence: 0.8,
        primary_concerns: vec!["fixture concern".to_string()],
        financial_impact_estimate: FinancialImpact {
            low_estimate: 700.0,
            median_estimate: 1000.0,
            high_estimate: 1300.0,
            currency: "USD".to_string(),
        },
    }
}

pub(super) fn analyzer() -> PolicyAnalyzer {
    PolicyAnalyzer::new(Arc::new(PolicyCatalog::standard()))
}

pub(super) fn assessor() -> RiskAssessor {
    RiskAssessor::new(RiskConfig::standard())
}

pub(super) fn engine_without_history() -> RecommendationEngine<ClaimsTrendArchive> {
    RecommendationEngine::new(None, Arc::new(MemoStore::new()))
}

pub(super) fn engine_with_history() -> RecommendationEngine<ClaimsTrendArchive> {
    RecommendationEngine::new(Some(Arc::new(ClaimsTrendArchive)), Arc::new(MemoStore::new()))
}

pub(super) fn profile(
    other_policies: &[&str],
    years_as_customer: u32,
    accidents: u32,
    violations: u32,
) -> UserProfile {
    UserProfile {
        id: "user123".to_string(),
        other_policies: other_policies.iter().map(|policy| policy.to_string()).collect(),
        years_as_customer,
        driving_record: DrivingRecord {
            accidents,
            violations,
        },
    }
}

pub(super) fn service_with<C: CompletionService + 'static>(
    completion: Arc<C>,
) -> AnalysisService<C, ClaimsTrendArchive> {
    AnalysisService::new(
        completion,
        Some(Arc::new(ClaimsTrendArchive)),
        Arc::new(PolicyCatalog::standard()),
        RiskConfig::standard(),
        AnalysisCaches::new(),
    )
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn details_of(details: &BTreeMap<String, String>, key: &str) -> String {
    details.get(key).cloned().unwrap_or_default()
}
