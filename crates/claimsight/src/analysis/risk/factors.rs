use std::collections::BTreeMap;

use super::super::domain::{IncidentCategory, RiskFactor};
use super::super::intake::ScenarioText;

/// Extract boolean risk signals by substring search in lower-cased text.
/// Common factors apply to every category; the rest are category-gated.
pub(crate) fn extract(
    category: IncidentCategory,
    scenario: &ScenarioText,
) -> BTreeMap<RiskFactor, bool> {
    let lower = scenario.as_str().to_lowercase();
    let mentions = |phrases: &[&str]| phrases.iter().any(|phrase| lower.contains(phrase));

    let mut factors = BTreeMap::new();

    if mentions(&["fault", "responsible", "caused", "my fault"]) {
        factors.insert(RiskFactor::AtFault, true);
    }
    if mentions(&["multiple", "several", "many", "two", "three"])
        && mentions(&["vehicles", "cars", "trucks"])
    {
        factors.insert(RiskFactor::MultipleVehicles, true);
    }
    if mentions(&["injury", "injuries", "hurt", "pain", "hospital"]) {
        factors.insert(RiskFactor::Injuries, true);
    }

    match category {
        IncidentCategory::Collision => {
            if mentions(&["fast", "speed", "speeding"]) {
                factors.insert(RiskFactor::VehicleSpeed, true);
            }
            if mentions(&["rain", "snow", "ice", "wet"]) {
                factors.insert(RiskFactor::WeatherConditions, true);
            }
        }
        IncidentCategory::ParkingDamage => {
            // Inverted on purpose: secure phrasing clears the flag, its
            // absence sets it.
            factors.insert(
                RiskFactor::UnsecuredLocation,
                !mentions(&["secure", "garage", "private"]),
            );
            if mentions(&["significant", "extensive", "substantial"]) {
                factors.insert(RiskFactor::ExtentOfDamage, true);
            }
        }
        IncidentCategory::WeatherDamage => {
            if mentions(&["severe", "major", "strong", "hurricane"]) {
                factors.insert(RiskFactor::SevereWeather, true);
            }
        }
        IncidentCategory::Theft | IncidentCategory::Vandalism => {
            if mentions(&["high crime", "dangerous", "unsafe"]) {
                factors.insert(RiskFactor::HighCrimeArea, true);
            }
        }
        IncidentCategory::Medical | IncidentCategory::GeneralIncident => {}
    }

    factors
}
