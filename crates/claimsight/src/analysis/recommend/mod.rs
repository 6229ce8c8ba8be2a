mod rules;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use rules::{RuleCondition, RuleSpec, GLOBAL_RULES};

use super::cache::MemoStore;
use super::domain::{
    Classification, IncidentCategory, PolicyAnalysis, PolicyId, Priority, Recommendation,
    RecommendationKind, RiskAssessment, RiskFactor, RiskLevel, UserProfile,
};

const RULE_CONFIDENCE: f64 = 0.85;
const GLOBAL_RULE_CONFIDENCE: f64 = 0.75;

/// Optional historical-claims collaborator behind the data-driven source.
/// When absent the source is skipped without error.
pub trait HistoricalClaims: Send + Sync {
    fn recommendations_for(
        &self,
        category: IncidentCategory,
        risk: &RiskAssessment,
    ) -> Vec<Recommendation>;
}

/// Historical-claims source backed by the aggregate claim studies bundled
/// with the service.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaimsTrendArchive;

impl HistoricalClaims for ClaimsTrendArchive {
    fn recommendations_for(
        &self,
        category: IncidentCategory,
        risk: &RiskAssessment,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if category == IncidentCategory::Collision
            && matches!(risk.risk_level, RiskLevel::High | RiskLevel::VeryHigh)
        {
            recommendations.push(Recommendation {
                id: None,
                kind: RecommendationKind::DataDriven,
                action: "consider_umbrella_policy".to_string(),
                policy: PolicyId::new("umbrella"),
                reason: "70% of similar high-risk collision claims exceeded standard liability \
                     limits"
                    .to_string(),
                details: details(&[
                    ("supporting_data", "Analysis of 2,500 similar claims"),
                    ("suggested_coverage", "$1,000,000"),
                ]),
                priority: Priority::Medium,
                confidence: 0.82,
            });
        }

        if category == IncidentCategory::Theft
            && risk.identified_factors.contains(&RiskFactor::HighCrimeArea)
        {
            recommendations.push(Recommendation {
                id: None,
                kind: RecommendationKind::DataDriven,
                action: "consider_security_system".to_string(),
                policy: PolicyId::new("security_discount"),
                reason: "Vehicles with security systems in high-crime areas show 60% lower theft \
                     rates"
                    .to_string(),
                details: details(&[
                    ("supporting_data", "Analysis of theft claims in similar areas"),
                    ("potential_discount", "10-15% on comprehensive premium"),
                ]),
                priority: Priority::High,
                confidence: 0.88,
            });
        }

        recommendations
    }
}

/// Combines rule-based, global, data-driven, and personalized recommendation
/// sources, then deduplicates, ranks, and stamps display ids. Results are
/// memoized by (category, risk level, profile id).
pub struct RecommendationEngine<H> {
    historical: Option<Arc<H>>,
    cache: Arc<MemoStore<Vec<Recommendation>>>,
}

impl<H: HistoricalClaims> RecommendationEngine<H> {
    pub fn new(historical: Option<Arc<H>>, cache: Arc<MemoStore<Vec<Recommendation>>>) -> Self {
        Self { historical, cache }
    }

    pub fn recommend(
        &self,
        classification: &Classification,
        policy_analysis: &PolicyAnalysis,
        risk_assessment: &RiskAssessment,
        user_profile: Option<&UserProfile>,
    ) -> Vec<Recommendation> {
        let cache_key = cache_key(
            classification.category,
            risk_assessment.risk_level,
            user_profile,
        );
        if let Some(cached) = self.cache.get(&cache_key) {
            return cached;
        }

        let mut candidates = rule_based(classification.category, policy_analysis, risk_assessment);
        candidates.extend(global_rules(risk_assessment));

        if let Some(historical) = &self.historical {
            candidates.extend(
                historical.recommendations_for(classification.category, risk_assessment),
            );
        }

        if let Some(profile) = user_profile {
            candidates.extend(personalized(profile));
        }

        let mut ranked = deduplicate(candidates);
        rank(&mut ranked);
        stamp_ids(&mut ranked, classification.category);

        debug!(
            category = classification.category.label(),
            risk_level = risk_assessment.risk_level.label(),
            count = ranked.len(),
            "recommendations generated"
        );

        self.cache.store(cache_key, ranked.clone());
        ranked
    }
}

fn cache_key(
    category: IncidentCategory,
    risk_level: RiskLevel,
    user_profile: Option<&UserProfile>,
) -> String {
    let mut key = format!("recommendation_{}_{}", category.label(), risk_level.label());
    if let Some(profile) = user_profile {
        key.push('_');
        key.push_str(&profile.id);
    }
    key
}

fn rule_based(
    category: IncidentCategory,
    policy_analysis: &PolicyAnalysis,
    risk_assessment: &RiskAssessment,
) -> Vec<Recommendation> {
    rules::category_rules(category, risk_assessment.risk_level)
        .iter()
        .filter(|rule| condition_met(rule, policy_analysis))
        .map(|rule| Recommendation {
            id: None,
            kind: RecommendationKind::RuleBased,
            action: rule.action.to_string(),
            policy: PolicyId::new(rule.policy),
            reason: rule.reason.to_string(),
            details: details(rule.details),
            priority: rule_priority(rule.action, risk_assessment.risk_level),
            confidence: RULE_CONFIDENCE,
        })
        .collect()
}

fn condition_met(rule: &RuleSpec, policy_analysis: &PolicyAnalysis) -> bool {
    match rule.condition {
        Some(RuleCondition::PolicyNotPresent) => !policy_analysis
            .policy_details
            .contains_key(&PolicyId::new(rule.policy)),
        None => true,
    }
}

/// Priority is a function of the rule's action kind and the assessed risk:
/// coverage additions under high risk outrank everything else.
fn rule_priority(action: &str, risk_level: RiskLevel) -> Priority {
    match risk_level {
        RiskLevel::High | RiskLevel::VeryHigh => {
            if matches!(action, "add_coverage" | "increase_coverage") {
                Priority::High
            } else {
                Priority::Medium
            }
        }
        RiskLevel::Moderate => {
            if action == "add_coverage" {
                Priority::Medium
            } else {
                Priority::Low
            }
        }
        RiskLevel::Low => Priority::Low,
    }
}

fn global_rules(risk_assessment: &RiskAssessment) -> Vec<Recommendation> {
    GLOBAL_RULES
        .iter()
        .filter(|rule| risk_assessment.identified_factors.contains(&rule.gate))
        .map(|rule| Recommendation {
            id: None,
            kind: RecommendationKind::GlobalRule,
            action: rule.action.to_string(),
            policy: PolicyId::new(rule.policy),
            reason: rule.reason.to_string(),
            details: BTreeMap::new(),
            priority: Priority::Medium,
            confidence: GLOBAL_RULE_CONFIDENCE,
        })
        .collect()
}

fn personalized(profile: &UserProfile) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if !profile
        .other_policies
        .iter()
        .any(|policy| policy == "home_insurance")
    {
        recommendations.push(Recommendation {
            id: None,
            kind: RecommendationKind::Personalized,
            action: "consider_bundling".to_string(),
            policy: PolicyId::new("home_and_auto"),
            reason: "Bundling home and auto insurance typically saves 10-15% on premiums"
                .to_string(),
            details: details(&[
                ("estimated_savings", "10-15%"),
                (
                    "additional_benefits",
                    "Simplified claims process, single deductible options",
                ),
            ]),
            priority: Priority::Medium,
            confidence: 0.75,
        });
    }

    if profile.years_as_customer >= 3 {
        recommendations.push(Recommendation {
            id: None,
            kind: RecommendationKind::Personalized,
            action: "review_loyalty_benefits".to_string(),
            policy: PolicyId::new("all"),
            reason: format!(
                "As a {}-year customer, you may qualify for additional loyalty discounts",
                profile.years_as_customer
            ),
            details: details(&[
                ("estimated_savings", "5-10%"),
                ("qualification", "Based on customer tenure"),
            ]),
            priority: Priority::Low,
            confidence: 0.9,
        });
    }

    if profile.driving_record.accidents == 0 && profile.driving_record.violations == 0 {
        recommendations.push(Recommendation {
            id: None,
            kind: RecommendationKind::Personalized,
            action: "consider_program".to_string(),
            policy: PolicyId::new("safe_driver_discount"),
            reason: "Your clean driving record qualifies you for safe driver discounts"
                .to_string(),
            details: details(&[
                ("estimated_savings", "Up to 20%"),
                ("qualification", "Based on driving history"),
            ]),
            priority: Priority::Medium,
            confidence: 0.85,
        });
    }

    recommendations
}

/// Collapse candidates sharing an (action, policy) pair, keeping the one with
/// the higher numeric priority. First occurrence keeps its position.
pub(crate) fn deduplicate(candidates: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut unique: Vec<Recommendation> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match unique.iter_mut().find(|existing| {
            existing.action == candidate.action && existing.policy == candidate.policy
        }) {
            Some(existing) => {
                if candidate.priority.value() > existing.priority.value() {
                    *existing = candidate;
                }
            }
            None => unique.push(candidate),
        }
    }
    unique
}

/// Stable descending sort: priority dominates, confidence breaks ties.
pub(crate) fn rank(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| {
        b.priority
            .value()
            .cmp(&a.priority.value())
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });
}

fn stamp_ids(recommendations: &mut [Recommendation], category: IncidentCategory) {
    for (index, recommendation) in recommendations.iter_mut().enumerate() {
        recommendation.id = Some(format!("REC-{}-{}", category.label(), index + 1));
    }
}

fn details(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
