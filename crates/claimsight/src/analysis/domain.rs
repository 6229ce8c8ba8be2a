use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for analyzed scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioId(pub String);

/// Identifier for an insurance product referenced by an analysis.
///
/// Left open-ended (rather than a closed enum) because the completion service
/// may name products outside the catalog; unrecognized ids are carried through
/// coverage lists without metadata.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(pub String);

impl PolicyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-facing rendering ("personal_injury_protection" reads as
    /// "personal injury protection" in explanations).
    pub fn display_name(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification bucket assigned to a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentCategory {
    Collision,
    ParkingDamage,
    WeatherDamage,
    Theft,
    Vandalism,
    Medical,
    GeneralIncident,
}

impl IncidentCategory {
    pub const fn label(self) -> &'static str {
        match self {
            IncidentCategory::Collision => "collision",
            IncidentCategory::ParkingDamage => "parking_damage",
            IncidentCategory::WeatherDamage => "weather_damage",
            IncidentCategory::Theft => "theft",
            IncidentCategory::Vandalism => "vandalism",
            IncidentCategory::Medical => "medical",
            IncidentCategory::GeneralIncident => "general_incident",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            IncidentCategory::Collision => "collision",
            IncidentCategory::ParkingDamage => "parking damage",
            IncidentCategory::WeatherDamage => "weather damage",
            IncidentCategory::Theft => "theft",
            IncidentCategory::Vandalism => "vandalism",
            IncidentCategory::Medical => "medical",
            IncidentCategory::GeneralIncident => "general incident",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "collision" => Some(IncidentCategory::Collision),
            "parking_damage" => Some(IncidentCategory::ParkingDamage),
            "weather_damage" => Some(IncidentCategory::WeatherDamage),
            "theft" => Some(IncidentCategory::Theft),
            "vandalism" => Some(IncidentCategory::Vandalism),
            "medical" => Some(IncidentCategory::Medical),
            "general_incident" => Some(IncidentCategory::GeneralIncident),
            _ => None,
        }
    }
}

/// Output of the classification stage, cached by exact scenario text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: IncidentCategory,
    pub confidence: f64,
    pub relevant_policies: Vec<PolicyId>,
    pub reasoning: String,
    pub rule_based_fallback: bool,
    pub processing_time: f64,
}

/// Catalog metadata describing a known insurance product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtypes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub typical_limits: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub typical_deductibles: Vec<String>,
    pub required: bool,
    pub coverage_details: String,
}

/// Severity scale shared by coverage gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    MissingCoverage,
}

/// A policy expected for the classified category but absent from the analyzed
/// set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    #[serde(rename = "type")]
    pub kind: GapKind,
    pub policy: PolicyId,
    pub description: String,
    pub severity: Severity,
}

/// Output of the policy analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyAnalysis {
    pub primary_coverage: Option<PolicyId>,
    pub secondary_coverage: Vec<PolicyId>,
    pub policy_details: BTreeMap<PolicyId, PolicyMetadata>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub recommendations: Vec<Recommendation>,
}

/// Boolean signal extracted from scenario text that influences the risk score.
///
/// `UnsecuredLocation` keeps the inverted polarity of the original rule set:
/// true means the vehicle was NOT kept somewhere secure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    AtFault,
    MultipleVehicles,
    Injuries,
    VehicleSpeed,
    WeatherConditions,
    UnsecuredLocation,
    ExtentOfDamage,
    ClaimFrequency,
    SevereWeather,
    VehicleStorage,
    HighCrimeArea,
    HighValueVehicle,
    SecurityMeasures,
    InjurySeverity,
    InjuredCount,
    TreatmentRequired,
}

impl RiskFactor {
    pub const fn label(self) -> &'static str {
        match self {
            RiskFactor::AtFault => "at_fault",
            RiskFactor::MultipleVehicles => "multiple_vehicles",
            RiskFactor::Injuries => "injuries",
            RiskFactor::VehicleSpeed => "vehicle_speed",
            RiskFactor::WeatherConditions => "weather_conditions",
            RiskFactor::UnsecuredLocation => "unsecured_location",
            RiskFactor::ExtentOfDamage => "extent_of_damage",
            RiskFactor::ClaimFrequency => "claim_frequency",
            RiskFactor::SevereWeather => "severe_weather",
            RiskFactor::VehicleStorage => "vehicle_storage",
            RiskFactor::HighCrimeArea => "high_crime_area",
            RiskFactor::HighValueVehicle => "high_value_vehicle",
            RiskFactor::SecurityMeasures => "security_measures",
            RiskFactor::InjurySeverity => "injury_severity",
            RiskFactor::InjuredCount => "injured_count",
            RiskFactor::TreatmentRequired => "treatment_required",
        }
    }
}

/// Banding applied to the clamped risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }
}

/// Dollar range attached to a risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialImpact {
    pub low_estimate: f64,
    pub median_estimate: f64,
    pub high_estimate: f64,
    pub currency: String,
}

/// Output of the risk assessment stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: BTreeMap<RiskFactor, bool>,
    pub identified_factors: Vec<RiskFactor>,
    pub confidence: f64,
    pub primary_concerns: Vec<String>,
    pub financial_impact_estimate: FinancialImpact,
}

/// Which source produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    RuleBased,
    GlobalRule,
    DataDriven,
    Personalized,
}

/// Ranking weight for recommendations; higher value sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn value(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl From<Severity> for Priority {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::High => Priority::High,
            Severity::Moderate => Priority::Medium,
            Severity::Low => Priority::Low,
        }
    }
}

/// A single prioritized suggestion in the final bundle.
///
/// The (action, policy) pair is unique after deduplication; display ids are
/// stamped in final rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub action: String,
    pub policy: PolicyId,
    pub reason: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
    pub priority: Priority,
    pub confidence: f64,
}

/// Narrative output of the explanation stage, cached by
/// (category, primary coverage, risk level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub classification_explanation: String,
    pub policy_explanation: String,
    pub risk_explanation: String,
    pub financial_explanation: String,
    pub detailed_explanation: String,
    pub complex_scenario: bool,
}

/// Coverages the customer already holds, merged into the analyzed policy set
/// before gap detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPolicy {
    #[serde(default)]
    pub policies: Vec<PolicyId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrivingRecord {
    #[serde(default)]
    pub accidents: u32,
    #[serde(default)]
    pub violations: u32,
}

/// Customer profile consumed by the personalized recommendation source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub other_policies: Vec<String>,
    #[serde(default)]
    pub years_as_customer: u32,
    #[serde(default)]
    pub driving_record: DrivingRecord,
}

/// Aggregate produced once per analysis request and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub scenario_id: ScenarioId,
    pub analyzed_at: DateTime<Utc>,
    pub scenario_text: String,
    pub classification: Classification,
    pub policy_analysis: PolicyAnalysis,
    pub risk_assessment: RiskAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    pub processing_time: f64,
}
