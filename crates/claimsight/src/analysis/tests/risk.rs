use super::common::*;
use crate::analysis::domain::{IncidentCategory, RiskFactor, RiskLevel};

#[test]
fn fault_and_injury_signals_raise_collision_risk() {
    let result = assessor().assess(
        &classification(IncidentCategory::Collision, 0.9, &["liability", "collision"]),
        &scenario(REAR_END_SCENARIO),
    );

    assert_eq!(result.risk_factors.get(&RiskFactor::AtFault), Some(&true));
    assert!(result.identified_factors.contains(&RiskFactor::AtFault));
    assert!(result.identified_factors.contains(&RiskFactor::Injuries));

    // Base 0.6 plus the at-fault (0.8) and injury (0.9) weights at 0.1 each.
    assert_eq!(result.risk_score, 0.77);
    assert_eq!(result.risk_level, RiskLevel::High);
}

#[test]
fn secure_storage_phrasing_clears_the_unsecured_flag() {
    let classification = classification(IncidentCategory::ParkingDamage, 0.8, &["comprehensive"]);

    let secured = assessor().assess(
        &classification,
        &scenario(
            "My car was parked in my private garage overnight and I found a deep scratch on \
             the driver's door this morning.",
        ),
    );
    assert_eq!(
        secured.risk_factors.get(&RiskFactor::UnsecuredLocation),
        Some(&false)
    );
    assert!(!secured
        .identified_factors
        .contains(&RiskFactor::UnsecuredLocation));

    let unsecured = assessor().assess(
        &classification,
        &scenario(
            "My car was parked on the street overnight and I found a deep scratch on the \
             driver's door this morning.",
        ),
    );
    assert_eq!(
        unsecured.risk_factors.get(&RiskFactor::UnsecuredLocation),
        Some(&true)
    );
    assert!(unsecured
        .identified_factors
        .contains(&RiskFactor::UnsecuredLocation));
    // The fired flag lifts the parking base 0.4 by the 0.4 weight at 0.1.
    assert_eq!(unsecured.risk_score, 0.44);
    assert_eq!(unsecured.risk_level, RiskLevel::Moderate);
}

#[test]
fn scores_stay_clamped_and_consistent_with_their_band() {
    let scenarios = [
        (
            classification(IncidentCategory::Collision, 0.9, &["liability"]),
            REAR_END_SCENARIO,
        ),
        (
            classification(IncidentCategory::Theft, 0.8, &["comprehensive"]),
            STOLEN_CAR_SCENARIO,
        ),
        (
            classification(IncidentCategory::Medical, 0.8, &["medical_payments"]),
            "Two passengers were hurt and taken to the hospital with severe pain after the \
             incident on the highway.",
        ),
        (
            classification(IncidentCategory::GeneralIncident, 0.5, &["liability"]),
            "Something odd happened near my vehicle last evening in the lot.",
        ),
    ];

    for (classification, text) in scenarios {
        let result = assessor().assess(&classification, &scenario(text));

        assert!((0.0..=1.0).contains(&result.risk_score));
        let expected_level = if result.risk_score < 0.3 {
            RiskLevel::Low
        } else if result.risk_score < 0.6 {
            RiskLevel::Moderate
        } else if result.risk_score < 0.8 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        };
        assert_eq!(result.risk_level, expected_level);
    }
}

#[test]
fn high_crime_mentions_push_theft_toward_the_top_band() {
    let result = assessor().assess(
        &classification(IncidentCategory::Theft, 0.8, &["comprehensive"]),
        &scenario(
            "My car was stolen from a dangerous neighborhood known as a high crime area; police \
             said break-ins are common there.",
        ),
    );

    assert!(result.identified_factors.contains(&RiskFactor::HighCrimeArea));
    assert_eq!(result.risk_score, 0.78);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert!(result
        .primary_concerns
        .iter()
        .any(|concern| concern.contains("future theft")));
}

#[test]
fn financial_estimate_scales_with_the_score_and_keeps_ratios() {
    let result = assessor().assess(
        &classification(IncidentCategory::Collision, 0.9, &["liability"]),
        &scenario(REAR_END_SCENARIO),
    );
    let impact = &result.financial_impact_estimate;

    // 3500 × (0.5 + 0.77 × 2.5)
    assert_eq!(impact.median_estimate, 8487.5);
    assert!(impact.low_estimate <= impact.median_estimate);
    assert!(impact.median_estimate <= impact.high_estimate);
    assert!((impact.low_estimate - 0.7 * impact.median_estimate).abs() < 0.01);
    assert!((impact.high_estimate - 1.3 * impact.median_estimate).abs() < 0.01);
    assert!(impact.median_estimate > 0.0);
}

#[test]
fn concerns_are_never_empty() {
    let result = assessor().assess(
        &classification(IncidentCategory::GeneralIncident, 0.5, &["liability"]),
        &scenario("Something odd happened near my vehicle last evening in the lot."),
    );

    assert_eq!(
        result.primary_concerns,
        vec!["Standard general incident risk assessment".to_string()]
    );
}

#[test]
fn assessment_confidence_mirrors_the_classification() {
    let result = assessor().assess(
        &classification(IncidentCategory::Collision, 0.65, &["liability"]),
        &scenario(REAR_END_SCENARIO),
    );

    assert_eq!(result.confidence, 0.65);
}
