mod config;
mod factors;

pub use config::RiskConfig;

use super::domain::{
    Classification, FinancialImpact, IncidentCategory, RiskAssessment, RiskFactor, RiskLevel,
};
use super::intake::ScenarioText;

/// Severity multiplier slope applied on top of the category base cost.
const SEVERITY_MULTIPLIER_BASE: f64 = 0.5;
const SEVERITY_MULTIPLIER_SLOPE: f64 = 2.5;
const LOW_ESTIMATE_RATIO: f64 = 0.7;
const HIGH_ESTIMATE_RATIO: f64 = 1.3;

/// Weighted risk scoring over extracted text signals, plus a financial-impact
/// estimate. Pure and synchronous; both inputs come from earlier stages.
pub struct RiskAssessor {
    config: RiskConfig,
}

impl RiskAssessor {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn assess(&self, classification: &Classification, scenario: &ScenarioText) -> RiskAssessment {
        let category = classification.category;
        let risk_factors = factors::extract(category, scenario);

        let mut score = self.config.base_score(category);
        for (factor, present) in &risk_factors {
            if !present {
                continue;
            }
            if let Some(weight) = self.config.weight(category, *factor) {
                score += weight * 0.1;
            }
        }
        let score = score.clamp(0.0, 1.0);

        let identified_factors: Vec<RiskFactor> = risk_factors
            .iter()
            .filter(|(_, present)| **present)
            .map(|(factor, _)| *factor)
            .collect();

        let fired = |factor: RiskFactor| risk_factors.get(&factor).copied().unwrap_or(false);
        let primary_concerns = primary_concerns(category, &fired);
        let financial_impact_estimate = self.estimate_financial_impact(category, score);

        RiskAssessment {
            risk_score: round2(score),
            risk_level: risk_level_for(score),
            risk_factors,
            identified_factors,
            confidence: classification.confidence,
            primary_concerns,
            financial_impact_estimate,
        }
    }

    fn estimate_financial_impact(&self, category: IncidentCategory, score: f64) -> FinancialImpact {
        let base_cost = self.config.base_cost(category);
        let severity_multiplier = SEVERITY_MULTIPLIER_BASE + score * SEVERITY_MULTIPLIER_SLOPE;
        let median_estimate = base_cost * severity_multiplier;

        FinancialImpact {
            low_estimate: round2(median_estimate * LOW_ESTIMATE_RATIO),
            median_estimate: round2(median_estimate),
            high_estimate: round2(median_estimate * HIGH_ESTIMATE_RATIO),
            currency: "USD".to_string(),
        }
    }
}

/// Band cuts are inclusive on the lower side of each band.
fn risk_level_for(score: f64) -> RiskLevel {
    if score < 0.3 {
        RiskLevel::Low
    } else if score < 0.6 {
        RiskLevel::Moderate
    } else if score < 0.8 {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}

fn primary_concerns(
    category: IncidentCategory,
    fired: &dyn Fn(RiskFactor) -> bool,
) -> Vec<String> {
    let mut concerns = Vec::new();

    match category {
        IncidentCategory::Collision => {
            if fired(RiskFactor::AtFault) {
                concerns.push("Potential liability for damages".to_string());
            }
            if fired(RiskFactor::Injuries) {
                concerns.push("Potential medical claims".to_string());
            }
            if fired(RiskFactor::MultipleVehicles) {
                concerns.push("Multiple vehicle involvement increases complexity".to_string());
            }
        }
        IncidentCategory::ParkingDamage => {
            if fired(RiskFactor::UnsecuredLocation) {
                concerns.push("Unsecured location increases risk of recurrence".to_string());
            }
        }
        IncidentCategory::WeatherDamage => {
            if fired(RiskFactor::SevereWeather) {
                concerns.push("Severe weather caused extensive damage".to_string());
            }
        }
        IncidentCategory::Theft => {
            if fired(RiskFactor::HighCrimeArea) {
                concerns.push("High crime area increases risk of future theft".to_string());
            }
        }
        IncidentCategory::Vandalism
        | IncidentCategory::Medical
        | IncidentCategory::GeneralIncident => {}
    }

    if concerns.is_empty() {
        concerns.push(format!(
            "Standard {} risk assessment",
            category.display_name()
        ));
    }

    concerns
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
