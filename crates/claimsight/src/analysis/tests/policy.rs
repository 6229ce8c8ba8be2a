use super::common::*;
use crate::analysis::domain::{
    IncidentCategory, PolicyId, Priority, RecommendationKind, Severity, UserPolicy,
};

#[test]
fn collision_without_collision_policy_emits_a_high_severity_gap() {
    let analysis = analyzer().analyze(
        &classification(IncidentCategory::Collision, 0.9, &["liability"]),
        None,
    );

    assert_eq!(analysis.coverage_gaps.len(), 1);
    let gap = &analysis.coverage_gaps[0];
    assert_eq!(gap.policy.as_str(), "collision");
    assert_eq!(gap.severity, Severity::High);

    assert_eq!(analysis.recommendations.len(), 1);
    let recommendation = &analysis.recommendations[0];
    assert_eq!(recommendation.action, "add_coverage");
    assert_eq!(recommendation.policy.as_str(), "collision");
    assert_eq!(recommendation.kind, RecommendationKind::RuleBased);
    assert_eq!(recommendation.priority, Priority::High);
    assert_eq!(recommendation.confidence, 0.9);
}

#[test]
fn collision_with_collision_policy_has_no_gap() {
    let analysis = analyzer().analyze(
        &classification(IncidentCategory::Collision, 0.9, &["liability", "collision"]),
        None,
    );

    assert!(analysis.coverage_gaps.is_empty());
    assert!(analysis.recommendations.is_empty());
}

#[test]
fn user_held_policy_satisfies_the_expected_family() {
    let user_policy = UserPolicy {
        policies: vec![PolicyId::new("collision")],
    };

    let analysis = analyzer().analyze(
        &classification(IncidentCategory::Collision, 0.9, &["liability"]),
        Some(&user_policy),
    );

    assert!(analysis.coverage_gaps.is_empty());
    assert!(analysis
        .policy_details
        .contains_key(&PolicyId::new("collision")));
    // The held policy does not change the coverage split from the classifier.
    assert_eq!(
        analysis.primary_coverage.as_ref().map(|p| p.as_str()),
        Some("liability")
    );
}

#[test]
fn empty_policy_set_substitutes_catalog_defaults() {
    let analysis = analyzer().analyze(&classification(IncidentCategory::Theft, 0.8, &[]), None);

    assert_eq!(
        analysis.primary_coverage.as_ref().map(|p| p.as_str()),
        Some("comprehensive")
    );
    assert!(analysis.secondary_coverage.is_empty());
    assert!(analysis.coverage_gaps.is_empty());
}

#[test]
fn primary_and_secondary_preserve_classifier_order() {
    let analysis = analyzer().analyze(
        &classification(
            IncidentCategory::Collision,
            0.85,
            &["liability", "collision", "medical_payments"],
        ),
        None,
    );

    assert_eq!(
        analysis.primary_coverage.as_ref().map(|p| p.as_str()),
        Some("liability")
    );
    let secondary: Vec<&str> = analysis
        .secondary_coverage
        .iter()
        .map(|policy| policy.as_str())
        .collect();
    assert_eq!(secondary, vec!["collision", "medical_payments"]);
}

#[test]
fn unrecognized_policies_are_carried_without_details() {
    let analysis = analyzer().analyze(
        &classification(
            IncidentCategory::Collision,
            0.9,
            &["collision", "track_day_cover"],
        ),
        None,
    );

    assert_eq!(
        analysis.secondary_coverage[0].as_str(),
        "track_day_cover"
    );
    assert!(!analysis
        .policy_details
        .contains_key(&PolicyId::new("track_day_cover")));
    assert!(analysis
        .policy_details
        .contains_key(&PolicyId::new("collision")));
}

#[test]
fn medical_gap_is_satisfied_by_either_family_member() {
    let with_pip = analyzer().analyze(
        &classification(
            IncidentCategory::Medical,
            0.8,
            &["personal_injury_protection"],
        ),
        None,
    );
    assert!(with_pip.coverage_gaps.is_empty());

    let without_family = analyzer().analyze(
        &classification(IncidentCategory::Medical, 0.8, &["liability"]),
        None,
    );
    assert_eq!(without_family.coverage_gaps.len(), 1);
    assert_eq!(
        without_family.coverage_gaps[0].policy.as_str(),
        "medical_payments"
    );
}

#[test]
fn general_incident_has_no_expected_family() {
    let analysis = analyzer().analyze(
        &classification(IncidentCategory::GeneralIncident, 0.5, &["liability"]),
        None,
    );

    assert!(analysis.coverage_gaps.is_empty());
}
