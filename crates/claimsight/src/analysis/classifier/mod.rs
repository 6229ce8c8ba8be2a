mod rules;

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::cache::MemoStore;
use super::completion::{CompletionError, CompletionRequest, CompletionService};
use super::domain::{Classification, IncidentCategory, PolicyId};
use super::intake::ScenarioText;
use super::service::AnalysisError;

const CLASSIFY_SYSTEM_PROMPT: &str = "You are an auto insurance claims classifier. \
     Analyze the scenario and provide a JSON response with the following structure: \
     {\"category\": \"collision|parking_damage|weather_damage|theft|vandalism|medical\", \
     \"confidence\": 0.0-1.0, \
     \"relevant_policies\": [\"policy_type1\", \"policy_type2\"], \
     \"reasoning\": \"Brief explanation of classification reasoning\"}";
const CLASSIFY_TEMPERATURE: f32 = 0.3;
const CLASSIFY_MAX_TOKENS: u32 = 150;

/// Remote confidence at or below this triggers the rule-based comparison.
const REMOTE_CONFIDENCE_FLOOR: f64 = 0.7;

const DEFAULT_REASONING: &str = "Classification based on scenario characteristics";

/// Remote classification failures. Always recovered locally via the rule
/// tables; never surfaced past the classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("completion service unavailable: {0}")]
    Completion(#[from] CompletionError),
    #[error("failed to parse classification payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("classification payload named unknown category '{0}'")]
    UnknownCategory(String),
}

/// Candidate result from either source, before validation and stamping.
struct ClassificationDraft {
    category: IncidentCategory,
    confidence: f64,
    relevant_policies: Vec<PolicyId>,
    reasoning: Option<String>,
}

#[derive(Deserialize)]
struct RemotePayload {
    category: String,
    confidence: f64,
    #[serde(deserialize_with = "policy_id_or_list")]
    relevant_policies: Vec<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// The completion service sometimes returns a lone policy string instead of a
/// list; the coercion happens here, once, at the boundary.
fn policy_id_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(policy) => vec![policy],
        OneOrMany::Many(policies) => policies,
    })
}

/// Hybrid scenario classifier: a remote model call combined with a local
/// keyword-rule fallback, memoized by exact scenario text.
pub struct ScenarioClassifier<C> {
    completion: Arc<C>,
    cache: Arc<MemoStore<Classification>>,
}

impl<C: CompletionService> ScenarioClassifier<C> {
    pub fn new(completion: Arc<C>, cache: Arc<MemoStore<Classification>>) -> Self {
        Self { completion, cache }
    }

    pub async fn classify(&self, scenario: &ScenarioText) -> Result<Classification, AnalysisError> {
        let started = Instant::now();

        if let Some(cached) = self.cache.get(scenario.as_str()) {
            return Ok(cached);
        }

        let mut rule_based_fallback = false;
        let draft = match self.remote_classification(scenario).await {
            Ok(remote) if remote.confidence > REMOTE_CONFIDENCE_FLOOR => remote,
            Ok(remote) => {
                let local = rule_draft(scenario);
                if local.confidence > remote.confidence {
                    rule_based_fallback = true;
                    local
                } else {
                    remote
                }
            }
            Err(error) => {
                debug!(%error, "remote classification unavailable, using rule tables");
                rule_based_fallback = true;
                rule_draft(scenario)
            }
        };

        let classification = finalize(draft, rule_based_fallback, started.elapsed().as_secs_f64())?;
        self.cache
            .store(scenario.as_str(), classification.clone());
        Ok(classification)
    }

    async fn remote_classification(
        &self,
        scenario: &ScenarioText,
    ) -> Result<ClassificationDraft, ClassificationError> {
        let content = self
            .completion
            .complete(CompletionRequest {
                system: CLASSIFY_SYSTEM_PROMPT.to_string(),
                user: scenario.as_str().to_string(),
                temperature: CLASSIFY_TEMPERATURE,
                max_tokens: CLASSIFY_MAX_TOKENS,
            })
            .await?;

        let payload: RemotePayload = serde_json::from_str(&content)?;
        let category = IncidentCategory::from_label(&payload.category)
            .ok_or(ClassificationError::UnknownCategory(payload.category))?;

        Ok(ClassificationDraft {
            category,
            confidence: payload.confidence,
            relevant_policies: payload.relevant_policies.into_iter().map(PolicyId).collect(),
            reasoning: payload.reasoning,
        })
    }
}

fn rule_draft(scenario: &ScenarioText) -> ClassificationDraft {
    let local = rules::classify(scenario);
    ClassificationDraft {
        category: local.category,
        confidence: local.confidence,
        relevant_policies: local.relevant_policies,
        reasoning: Some(local.reasoning),
    }
}

/// Validate the chosen result, normalize confidence into [0, 1], and stamp
/// the request metadata. An empty policy set at this point is structural and
/// fatal to the request.
fn finalize(
    draft: ClassificationDraft,
    rule_based_fallback: bool,
    processing_time: f64,
) -> Result<Classification, AnalysisError> {
    if draft.relevant_policies.is_empty() {
        return Err(AnalysisError::Structural(
            "classification carries no relevant policies".to_string(),
        ));
    }

    Ok(Classification {
        category: draft.category,
        confidence: draft.confidence.clamp(0.0, 1.0),
        relevant_policies: draft.relevant_policies,
        reasoning: draft
            .reasoning
            .filter(|reasoning| !reasoning.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REASONING.to_string()),
        rule_based_fallback,
        processing_time,
    })
}
