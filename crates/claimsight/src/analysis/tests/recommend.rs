use std::collections::BTreeMap;

use super::common::*;
use crate::analysis::domain::{
    IncidentCategory, PolicyId, Priority, Recommendation, RecommendationKind, RiskFactor,
    RiskLevel,
};
use crate::analysis::recommend;

fn ordered_invariants(recommendations: &[Recommendation]) {
    let mut seen = Vec::new();
    for recommendation in recommendations {
        let key = (recommendation.action.clone(), recommendation.policy.clone());
        assert!(!seen.contains(&key), "duplicate (action, policy) pair: {key:?}");
        seen.push(key);
    }

    for pair in recommendations.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        assert!(left.priority.value() >= right.priority.value());
        if left.priority.value() == right.priority.value() {
            assert!(left.confidence >= right.confidence);
        }
    }
}

#[test]
fn coverage_rules_fire_only_when_the_policy_is_absent() {
    // Fresh engines: the memo key only carries (category, risk level) and
    // would otherwise replay the first result.
    let held = classification(
        IncidentCategory::Collision,
        0.9,
        &["liability", "medical_payments"],
    );
    let analysis = analyzer().analyze(&held, None);
    let risk = assessment(RiskLevel::Moderate, 0.5, &[]);

    let recommendations = engine_without_history().recommend(&held, &analysis, &risk, None);
    assert!(!recommendations
        .iter()
        .any(|recommendation| recommendation.action == "consider_coverage"
            && recommendation.policy.as_str() == "medical_payments"));

    let missing = classification(IncidentCategory::Collision, 0.9, &["liability"]);
    let analysis = analyzer().analyze(&missing, None);
    let recommendations = engine_without_history().recommend(&missing, &analysis, &risk, None);
    assert!(recommendations
        .iter()
        .any(|recommendation| recommendation.action == "consider_coverage"
            && recommendation.policy.as_str() == "medical_payments"));
}

#[test]
fn priority_follows_action_kind_and_risk_level() {
    let engine = engine_without_history();
    let classification = classification(IncidentCategory::Collision, 0.9, &["liability"]);
    let analysis = analyzer().analyze(&classification, None);

    let high = engine.recommend(
        &classification,
        &analysis,
        &assessment(RiskLevel::High, 0.77, &[]),
        None,
    );
    let increase = high
        .iter()
        .find(|recommendation| recommendation.action == "increase_coverage")
        .expect("liability increase present");
    assert_eq!(increase.priority, Priority::High);
    assert_eq!(increase.confidence, 0.85);

    let low = engine.recommend(
        &classification,
        &analysis,
        &assessment(RiskLevel::Low, 0.2, &[]),
        None,
    );
    let maintain = low
        .iter()
        .find(|recommendation| recommendation.action == "maintain_coverage")
        .expect("maintain rule present");
    assert_eq!(maintain.priority, Priority::Low);
}

#[test]
fn very_high_risk_shares_the_high_band_rules() {
    let engine = engine_without_history();
    let classification = classification(IncidentCategory::Collision, 0.9, &["liability"]);
    let analysis = analyzer().analyze(&classification, None);

    let recommendations = engine.recommend(
        &classification,
        &analysis,
        &assessment(RiskLevel::VeryHigh, 0.9, &[]),
        None,
    );

    assert!(recommendations
        .iter()
        .any(|recommendation| recommendation.action == "increase_coverage"
            && recommendation.policy.as_str() == "liability"));
}

#[test]
fn global_rules_gate_on_identified_factors() {
    let classification = classification(IncidentCategory::Collision, 0.9, &["liability"]);
    let analysis = analyzer().analyze(&classification, None);

    let without = engine_without_history().recommend(
        &classification,
        &analysis,
        &assessment(RiskLevel::Moderate, 0.5, &[]),
        None,
    );
    assert!(!without
        .iter()
        .any(|recommendation| recommendation.policy.as_str() == "gap_insurance"));

    let with_factor = engine_without_history().recommend(
        &classification,
        &analysis,
        &assessment(RiskLevel::Moderate, 0.5, &[RiskFactor::HighValueVehicle]),
        None,
    );
    let gap_insurance = with_factor
        .iter()
        .find(|recommendation| recommendation.policy.as_str() == "gap_insurance")
        .expect("gap insurance suggested");
    assert_eq!(gap_insurance.kind, RecommendationKind::GlobalRule);
    assert_eq!(gap_insurance.priority, Priority::Medium);
    assert_eq!(gap_insurance.confidence, 0.75);
}

#[test]
fn historical_data_augments_high_risk_collisions() {
    let classification = classification(IncidentCategory::Collision, 0.9, &["liability"]);
    let analysis = analyzer().analyze(&classification, None);
    let risk = assessment(RiskLevel::VeryHigh, 0.9, &[]);

    let without_history = engine_without_history().recommend(&classification, &analysis, &risk, None);
    assert!(!without_history
        .iter()
        .any(|recommendation| recommendation.policy.as_str() == "umbrella"));

    let with_history = engine_with_history().recommend(&classification, &analysis, &risk, None);
    let umbrella = with_history
        .iter()
        .find(|recommendation| recommendation.policy.as_str() == "umbrella")
        .expect("umbrella suggestion present");
    assert_eq!(umbrella.kind, RecommendationKind::DataDriven);
    assert_eq!(umbrella.confidence, 0.82);
    assert_eq!(
        details_of(&umbrella.details, "suggested_coverage"),
        "$1,000,000"
    );
}

#[test]
fn historical_data_reacts_to_high_crime_theft() {
    let classification = classification(IncidentCategory::Theft, 0.8, &["comprehensive"]);
    let analysis = analyzer().analyze(&classification, None);

    let calm_area = engine_with_history().recommend(
        &classification,
        &analysis,
        &assessment(RiskLevel::High, 0.7, &[]),
        None,
    );
    assert!(!calm_area
        .iter()
        .any(|recommendation| recommendation.policy.as_str() == "security_discount"));

    let high_crime = engine_with_history().recommend(
        &classification,
        &analysis,
        &assessment(RiskLevel::High, 0.78, &[RiskFactor::HighCrimeArea]),
        None,
    );
    let security = high_crime
        .iter()
        .find(|recommendation| recommendation.policy.as_str() == "security_discount")
        .expect("security system suggestion present");
    assert_eq!(security.priority, Priority::High);
    assert_eq!(security.confidence, 0.88);
}

#[test]
fn personalized_sources_follow_the_profile() {
    let engine = engine_without_history();
    let classification = classification(IncidentCategory::Collision, 0.9, &["liability"]);
    let analysis = analyzer().analyze(&classification, None);
    let risk = assessment(RiskLevel::Moderate, 0.5, &[]);

    let mut new_customer = profile(&[], 1, 0, 1);
    new_customer.id = "user456".to_string();
    let recommendations = engine.recommend(&classification, &analysis, &risk, Some(&new_customer));
    assert!(recommendations
        .iter()
        .any(|recommendation| recommendation.action == "consider_bundling"));
    assert!(!recommendations
        .iter()
        .any(|recommendation| recommendation.action == "review_loyalty_benefits"));
    assert!(!recommendations
        .iter()
        .any(|recommendation| recommendation.action == "consider_program"));

    let loyal_clean = profile(&["home_insurance"], 5, 0, 0);
    let recommendations = engine.recommend(&classification, &analysis, &risk, Some(&loyal_clean));
    assert!(!recommendations
        .iter()
        .any(|recommendation| recommendation.action == "consider_bundling"));
    let loyalty = recommendations
        .iter()
        .find(|recommendation| recommendation.action == "review_loyalty_benefits")
        .expect("loyalty suggestion present");
    assert!(loyalty.reason.contains("5-year customer"));
    assert!(recommendations
        .iter()
        .any(|recommendation| recommendation.policy.as_str() == "safe_driver_discount"));
}

#[test]
fn results_are_unique_ranked_and_id_stamped() {
    let classification = classification(IncidentCategory::Theft, 0.8, &["liability"]);
    let analysis = analyzer().analyze(&classification, None);
    let risk = assessment(RiskLevel::High, 0.78, &[RiskFactor::HighCrimeArea]);
    let customer = profile(&[], 4, 0, 0);

    let recommendations =
        engine_with_history().recommend(&classification, &analysis, &risk, Some(&customer));

    assert!(!recommendations.is_empty());
    ordered_invariants(&recommendations);

    for (index, recommendation) in recommendations.iter().enumerate() {
        assert_eq!(
            recommendation.id.as_deref(),
            Some(format!("REC-theft-{}", index + 1).as_str())
        );
    }
}

#[test]
fn cache_key_distinguishes_profiles() {
    let engine = engine_without_history();
    let classification = classification(IncidentCategory::Collision, 0.9, &["liability"]);
    let analysis = analyzer().analyze(&classification, None);
    let risk = assessment(RiskLevel::Moderate, 0.5, &[]);
    let customer = profile(&[], 4, 0, 0);

    let with_profile = engine.recommend(&classification, &analysis, &risk, Some(&customer));
    let anonymous = engine.recommend(&classification, &analysis, &risk, None);

    assert!(with_profile
        .iter()
        .any(|recommendation| recommendation.kind == RecommendationKind::Personalized));
    assert!(!anonymous
        .iter()
        .any(|recommendation| recommendation.kind == RecommendationKind::Personalized));

    // Same inputs come back from the cache unchanged.
    let replay = engine.recommend(&classification, &analysis, &risk, Some(&customer));
    assert_eq!(with_profile, replay);
}

#[test]
fn deduplication_keeps_the_higher_priority_instance() {
    let low = Recommendation {
        id: None,
        kind: RecommendationKind::RuleBased,
        action: "add_coverage".to_string(),
        policy: PolicyId::new("comprehensive"),
        reason: "first".to_string(),
        details: BTreeMap::new(),
        priority: Priority::Low,
        confidence: 0.85,
    };
    let high = Recommendation {
        priority: Priority::High,
        reason: "second".to_string(),
        ..low.clone()
    };
    let other = Recommendation {
        action: "review_deductible".to_string(),
        ..low.clone()
    };

    let unique = recommend::deduplicate(vec![low.clone(), other.clone(), high.clone()]);

    assert_eq!(unique.len(), 2);
    assert_eq!(unique[0].reason, "second");
    assert_eq!(unique[0].priority, Priority::High);
    assert_eq!(unique[1].action, "review_deductible");
}

#[test]
fn ranking_breaks_priority_ties_by_confidence() {
    let template = Recommendation {
        id: None,
        kind: RecommendationKind::RuleBased,
        action: "a".to_string(),
        policy: PolicyId::new("liability"),
        reason: String::new(),
        details: BTreeMap::new(),
        priority: Priority::Medium,
        confidence: 0.5,
    };

    let mut recommendations = vec![
        Recommendation {
            action: "low_confidence".to_string(),
            confidence: 0.6,
            ..template.clone()
        },
        Recommendation {
            action: "top".to_string(),
            priority: Priority::High,
            confidence: 0.1,
            ..template.clone()
        },
        Recommendation {
            action: "high_confidence".to_string(),
            confidence: 0.9,
            ..template.clone()
        },
    ];

    recommend::rank(&mut recommendations);

    let order: Vec<&str> = recommendations
        .iter()
        .map(|recommendation| recommendation.action.as_str())
        .collect();
    assert_eq!(order, vec!["top", "high_confidence", "low_confidence"]);
}
