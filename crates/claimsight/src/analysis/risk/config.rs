use std::collections::BTreeMap;

use super::super::domain::{IncidentCategory, RiskFactor};

/// Immutable risk tables: base scores, per-category factor weights, and base
/// repair/replacement costs. Decoupled from the assessor so tests can
/// substitute their own tables.
#[derive(Debug, Clone)]
pub struct RiskConfig {
    base_scores: BTreeMap<IncidentCategory, f64>,
    factor_weights: BTreeMap<IncidentCategory, BTreeMap<RiskFactor, f64>>,
    base_costs: BTreeMap<IncidentCategory, f64>,
}

impl RiskConfig {
    const DEFAULT_BASE_SCORE: f64 = 0.5;
    const DEFAULT_BASE_COST: f64 = 2500.0;

    pub fn standard() -> Self {
        let mut base_scores = BTreeMap::new();
        base_scores.insert(IncidentCategory::Collision, 0.6);
        base_scores.insert(IncidentCategory::ParkingDamage, 0.4);
        base_scores.insert(IncidentCategory::WeatherDamage, 0.5);
        base_scores.insert(IncidentCategory::Theft, 0.7);
        base_scores.insert(IncidentCategory::Vandalism, 0.5);
        base_scores.insert(IncidentCategory::Medical, 0.8);
        base_scores.insert(IncidentCategory::GeneralIncident, 0.5);

        let mut factor_weights = BTreeMap::new();
        factor_weights.insert(
            IncidentCategory::Collision,
            weights(&[
                (RiskFactor::AtFault, 0.8),
                (RiskFactor::MultipleVehicles, 0.6),
                (RiskFactor::Injuries, 0.9),
                (RiskFactor::WeatherConditions, 0.5),
                (RiskFactor::VehicleSpeed, 0.7),
            ]),
        );
        factor_weights.insert(
            IncidentCategory::ParkingDamage,
            weights(&[
                (RiskFactor::UnsecuredLocation, 0.4),
                (RiskFactor::ExtentOfDamage, 0.6),
                (RiskFactor::ClaimFrequency, 0.5),
            ]),
        );
        factor_weights.insert(
            IncidentCategory::WeatherDamage,
            weights(&[
                (RiskFactor::SevereWeather, 0.7),
                (RiskFactor::ExtentOfDamage, 0.8),
                (RiskFactor::VehicleStorage, 0.5),
            ]),
        );
        factor_weights.insert(
            IncidentCategory::Theft,
            weights(&[
                (RiskFactor::HighCrimeArea, 0.8),
                (RiskFactor::HighValueVehicle, 0.7),
                (RiskFactor::SecurityMeasures, 0.6),
            ]),
        );
        factor_weights.insert(
            IncidentCategory::Vandalism,
            weights(&[
                (RiskFactor::HighCrimeArea, 0.7),
                (RiskFactor::ExtentOfDamage, 0.5),
                (RiskFactor::UnsecuredLocation, 0.5),
            ]),
        );
        factor_weights.insert(
            IncidentCategory::Medical,
            weights(&[
                (RiskFactor::InjurySeverity, 0.9),
                (RiskFactor::InjuredCount, 0.7),
                (RiskFactor::TreatmentRequired, 0.8),
            ]),
        );

        let mut base_costs = BTreeMap::new();
        base_costs.insert(IncidentCategory::Collision, 3500.0);
        base_costs.insert(IncidentCategory::ParkingDamage, 1200.0);
        base_costs.insert(IncidentCategory::WeatherDamage, 2800.0);
        base_costs.insert(IncidentCategory::Theft, 8000.0);
        base_costs.insert(IncidentCategory::Vandalism, 1800.0);
        base_costs.insert(IncidentCategory::Medical, 5000.0);
        base_costs.insert(IncidentCategory::GeneralIncident, 2500.0);

        Self {
            base_scores,
            factor_weights,
            base_costs,
        }
    }

    pub fn base_score(&self, category: IncidentCategory) -> f64 {
        self.base_scores
            .get(&category)
            .copied()
            .unwrap_or(Self::DEFAULT_BASE_SCORE)
    }

    pub fn weight(&self, category: IncidentCategory, factor: RiskFactor) -> Option<f64> {
        self.factor_weights
            .get(&category)
            .and_then(|weights| weights.get(&factor))
            .copied()
    }

    pub fn base_cost(&self, category: IncidentCategory) -> f64 {
        self.base_costs
            .get(&category)
            .copied()
            .unwrap_or(Self::DEFAULT_BASE_COST)
    }
}

fn weights(entries: &[(RiskFactor, f64)]) -> BTreeMap<RiskFactor, f64> {
    entries.iter().copied().collect()
}
