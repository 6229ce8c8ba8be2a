use super::super::catalog::LIABILITY;
use super::super::domain::{IncidentCategory, PolicyId};
use super::super::intake::ScenarioText;

pub(crate) struct CategoryRule {
    pub(crate) category: IncidentCategory,
    pub(crate) keywords: &'static [&'static str],
    pub(crate) policies: &'static [&'static str],
}

/// Keyword tables for the local classifier. Order matters: ties between
/// categories resolve to the earlier entry.
pub(crate) const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: IncidentCategory::Collision,
        keywords: &["rear-ended", "hit", "crash", "collision", "accident"],
        policies: &["liability", "collision"],
    },
    CategoryRule {
        category: IncidentCategory::ParkingDamage,
        keywords: &["parked", "parking", "dent", "scratch"],
        policies: &["comprehensive", "collision"],
    },
    CategoryRule {
        category: IncidentCategory::WeatherDamage,
        keywords: &["storm", "hail", "flood", "weather"],
        policies: &["comprehensive"],
    },
    CategoryRule {
        category: IncidentCategory::Theft,
        keywords: &["stolen", "theft", "break-in", "stole"],
        policies: &["comprehensive"],
    },
    CategoryRule {
        category: IncidentCategory::Vandalism,
        keywords: &["vandalized", "keyed", "graffiti", "damaged"],
        policies: &["comprehensive"],
    },
    CategoryRule {
        category: IncidentCategory::Medical,
        keywords: &["injury", "hurt", "hospital", "pain", "medical"],
        policies: &["medical_payments", "personal_injury_protection"],
    },
];

const MAX_RULE_CONFIDENCE: f64 = 0.9;
const BASE_RULE_CONFIDENCE: f64 = 0.5;

pub(crate) struct RuleClassification {
    pub(crate) category: IncidentCategory,
    pub(crate) confidence: f64,
    pub(crate) relevant_policies: Vec<PolicyId>,
    pub(crate) reasoning: String,
}

/// Deterministic keyword classification: the category with the most substring
/// matches wins; zero matches falls back to the general bucket at exactly 0.5
/// confidence.
pub(crate) fn classify(scenario: &ScenarioText) -> RuleClassification {
    let lower = scenario.as_str().to_lowercase();

    let mut best: Option<(&CategoryRule, usize)> = None;
    for rule in CATEGORY_RULES {
        let matches = rule
            .keywords
            .iter()
            .filter(|keyword| lower.contains(**keyword))
            .count();
        if matches > best.map(|(_, count)| count).unwrap_or(0) {
            best = Some((rule, matches));
        }
    }

    match best {
        Some((rule, matches)) => RuleClassification {
            category: rule.category,
            confidence: (BASE_RULE_CONFIDENCE + 0.1 * matches as f64).min(MAX_RULE_CONFIDENCE),
            relevant_policies: rule.policies.iter().map(|id| PolicyId::new(*id)).collect(),
            reasoning: format!(
                "Rule-based classification identified {matches} keyword matches for category '{}'",
                rule.category.label()
            ),
        },
        None => RuleClassification {
            category: IncidentCategory::GeneralIncident,
            confidence: BASE_RULE_CONFIDENCE,
            relevant_policies: vec![PolicyId::new(LIABILITY)],
            reasoning: "Rule-based classification identified 0 keyword matches for category \
                 'general_incident'"
                .to_string(),
        },
    }
}
