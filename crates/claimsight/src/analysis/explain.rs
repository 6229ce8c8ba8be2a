use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::cache::MemoStore;
use super::completion::{CompletionError, CompletionRequest, CompletionService};
use super::domain::{Classification, Explanation, PolicyAnalysis, RiskAssessment, RiskLevel};

const NARRATIVE_SYSTEM_PROMPT: &str = "You are an insurance expert assistant. Generate a \
     natural, cohesive explanation of the insurance scenario analysis provided. Explain the \
     classification, policy implications, risk assessment, and financial impact in a clear, \
     professional, and informative way. Keep your explanation concise but comprehensive \
     (3-4 paragraphs).";
const NARRATIVE_TEMPERATURE: f32 = 0.3;
const NARRATIVE_MAX_TOKENS: u32 = 400;

/// Classification confidence below this routes the detailed narrative through
/// the completion service; a high risk level does the same.
const CONFIDENT_THRESHOLD: f64 = 0.7;

/// Produces the templated explanation fragments and, for complex scenarios,
/// a model-generated narrative. Memoized by (category, primary coverage,
/// risk level).
pub struct ExplanationGenerator<C> {
    completion: Arc<C>,
    cache: Arc<MemoStore<Explanation>>,
}

impl<C: CompletionService> ExplanationGenerator<C> {
    pub fn new(completion: Arc<C>, cache: Arc<MemoStore<Explanation>>) -> Self {
        Self { completion, cache }
    }

    pub async fn explain(
        &self,
        classification: &Classification,
        policy_analysis: &PolicyAnalysis,
        risk_assessment: &RiskAssessment,
    ) -> Explanation {
        let cache_key = cache_key(classification, policy_analysis, risk_assessment);
        if let Some(cached) = self.cache.get(&cache_key) {
            return cached;
        }

        let classification_explanation = classification_fragment(classification);
        let policy_explanation = policy_fragment(policy_analysis);
        let risk_explanation = risk_fragment(risk_assessment);
        let financial_explanation = financial_fragment(risk_assessment);

        let concatenated = [
            classification_explanation.as_str(),
            policy_explanation.as_str(),
            risk_explanation.as_str(),
            financial_explanation.as_str(),
        ]
        .join("\n\n");

        let complex_scenario = classification.confidence < CONFIDENT_THRESHOLD
            || risk_assessment.risk_level == RiskLevel::High;

        let detailed_explanation = if complex_scenario {
            match self
                .narrative(classification, policy_analysis, risk_assessment)
                .await
            {
                Ok(narrative) => narrative,
                Err(error) => {
                    debug!(%error, "narrative generation unavailable, using templated fragments");
                    concatenated.clone()
                }
            }
        } else {
            concatenated.clone()
        };

        let explanation = Explanation {
            summary: summary_line(classification, policy_analysis, risk_assessment),
            classification_explanation,
            policy_explanation,
            risk_explanation,
            financial_explanation,
            detailed_explanation,
            complex_scenario,
        };

        self.cache.store(cache_key, explanation.clone());
        explanation
    }

    async fn narrative(
        &self,
        classification: &Classification,
        policy_analysis: &PolicyAnalysis,
        risk_assessment: &RiskAssessment,
    ) -> Result<String, CompletionError> {
        let context = json!({
            "classification": {
                "category": classification.category.label(),
                "confidence": classification.confidence,
                "reasoning": &classification.reasoning,
            },
            "policy_analysis": {
                "primary_coverage": &policy_analysis.primary_coverage,
                "coverage_gaps": policy_analysis
                    .coverage_gaps
                    .iter()
                    .map(|gap| gap.description.clone())
                    .collect::<Vec<_>>(),
            },
            "risk_assessment": {
                "risk_level": risk_assessment.risk_level,
                "risk_score": risk_assessment.risk_score,
                "primary_concerns": &risk_assessment.primary_concerns,
                "financial_impact": &risk_assessment.financial_impact_estimate,
            },
        });

        self.completion
            .complete(CompletionRequest {
                system: NARRATIVE_SYSTEM_PROMPT.to_string(),
                user: format!("Generate an explanation based on this analysis: {context}"),
                temperature: NARRATIVE_TEMPERATURE,
                max_tokens: NARRATIVE_MAX_TOKENS,
            })
            .await
    }
}

fn cache_key(
    classification: &Classification,
    policy_analysis: &PolicyAnalysis,
    risk_assessment: &RiskAssessment,
) -> String {
    format!(
        "{}|{}|{}",
        classification.category.label(),
        policy_analysis
            .primary_coverage
            .as_ref()
            .map(|policy| policy.as_str())
            .unwrap_or("none"),
        risk_assessment.risk_level.label()
    )
}

fn classification_fragment(classification: &Classification) -> String {
    format!(
        "The incident has been classified as a {} scenario with {:.0}% confidence. This \
         classification is based on {}.",
        classification.category.display_name(),
        classification.confidence * 100.0,
        classification.reasoning
    )
}

fn policy_fragment(policy_analysis: &PolicyAnalysis) -> String {
    let Some(primary) = &policy_analysis.primary_coverage else {
        return "No applicable insurance policies were identified for this scenario.".to_string();
    };

    let description = policy_analysis
        .policy_details
        .get(primary)
        .map(|metadata| metadata.description.as_str())
        .unwrap_or("provides relevant coverage");

    let gap_explanation = if policy_analysis.coverage_gaps.is_empty() {
        String::new()
    } else {
        format!(
            "However, there may be coverage gaps: {}",
            policy_analysis
                .coverage_gaps
                .iter()
                .map(|gap| gap.description.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    };

    format!(
        "Based on this classification, the primary applicable policy is {}, which {}. {}",
        primary.display_name(),
        description,
        gap_explanation
    )
}

fn risk_fragment(risk_assessment: &RiskAssessment) -> String {
    let concerns = if risk_assessment.primary_concerns.is_empty() {
        String::new()
    } else {
        format!(
            "Key concerns include: {}",
            risk_assessment.primary_concerns.join(", ")
        )
    };

    format!(
        "The risk level for this scenario is assessed as {} with a score of {:.2}. {}",
        risk_assessment.risk_level.label(),
        risk_assessment.risk_score,
        concerns
    )
}

fn financial_fragment(risk_assessment: &RiskAssessment) -> String {
    let estimate = &risk_assessment.financial_impact_estimate;
    if estimate.median_estimate <= 0.0 {
        return String::new();
    }

    format!(
        "The estimated financial impact ranges from ${} to ${}, with a median estimate of ${}.",
        format_usd(estimate.low_estimate),
        format_usd(estimate.high_estimate),
        format_usd(estimate.median_estimate)
    )
}

fn summary_line(
    classification: &Classification,
    policy_analysis: &PolicyAnalysis,
    risk_assessment: &RiskAssessment,
) -> String {
    let primary = policy_analysis
        .primary_coverage
        .as_ref()
        .map(|policy| policy.display_name())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "This {} incident has a {} risk level. Primary coverage: {}.",
        classification.category.display_name(),
        risk_assessment.risk_level.label(),
        primary
    )
}

/// Dollar rendering with thousands separators and two decimals.
fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::format_usd;

    #[test]
    fn formats_dollar_amounts_with_separators() {
        assert_eq!(format_usd(8487.5), "8,487.50");
        assert_eq!(format_usd(950.0), "950.00");
        assert_eq!(format_usd(1_000_000.0), "1,000,000.00");
        assert_eq!(format_usd(0.05), "0.05");
    }
}
