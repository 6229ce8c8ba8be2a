use super::super::domain::{IncidentCategory, RiskFactor, RiskLevel};

/// Only condition kind the rule tables currently use: the named policy must
/// be absent from the analyzed policy set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RuleCondition {
    PolicyNotPresent,
}

pub(crate) struct RuleSpec {
    pub(crate) action: &'static str,
    pub(crate) policy: &'static str,
    pub(crate) condition: Option<RuleCondition>,
    pub(crate) reason: &'static str,
    pub(crate) details: &'static [(&'static str, &'static str)],
}

/// Category-independent rules gated on derived risk factors.
pub(crate) struct GlobalRuleSpec {
    pub(crate) gate: RiskFactor,
    pub(crate) action: &'static str,
    pub(crate) policy: &'static str,
    pub(crate) reason: &'static str,
}

/// Risk levels collapse to three rule bands; very high risk shares the high
/// band's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RiskBand {
    High,
    Moderate,
    Low,
}

impl RiskBand {
    fn from_level(level: RiskLevel) -> Self {
        match level {
            RiskLevel::High | RiskLevel::VeryHigh => RiskBand::High,
            RiskLevel::Moderate => RiskBand::Moderate,
            RiskLevel::Low => RiskBand::Low,
        }
    }
}

pub(crate) fn category_rules(category: IncidentCategory, level: RiskLevel) -> &'static [RuleSpec] {
    match (category, RiskBand::from_level(level)) {
        (IncidentCategory::Collision, RiskBand::High) => COLLISION_HIGH,
        (IncidentCategory::Collision, RiskBand::Moderate) => COLLISION_MODERATE,
        (IncidentCategory::Collision, RiskBand::Low) => COLLISION_LOW,
        (IncidentCategory::ParkingDamage, RiskBand::High) => PARKING_HIGH,
        (IncidentCategory::ParkingDamage, RiskBand::Moderate) => PARKING_MODERATE,
        (IncidentCategory::WeatherDamage, RiskBand::High) => WEATHER_HIGH,
        (IncidentCategory::WeatherDamage, RiskBand::Moderate) => WEATHER_MODERATE,
        (IncidentCategory::Theft, RiskBand::High) => THEFT_HIGH,
        (IncidentCategory::Theft, RiskBand::Moderate) => THEFT_MODERATE,
        (IncidentCategory::Vandalism, RiskBand::High) => VANDALISM_HIGH,
        (IncidentCategory::Vandalism, RiskBand::Moderate) => VANDALISM_MODERATE,
        (IncidentCategory::Medical, RiskBand::High) => MEDICAL_HIGH,
        (IncidentCategory::Medical, RiskBand::Moderate) => MEDICAL_MODERATE,
        _ => &[],
    }
}

const COLLISION_HIGH: &[RuleSpec] = &[
    RuleSpec {
        action: "increase_coverage",
        policy: "liability",
        condition: None,
        reason: "Higher liability limits provide better protection in serious collision scenarios",
        details: &[("min_amount", "$100,000/$300,000")],
    },
    RuleSpec {
        action: "add_coverage",
        policy: "uninsured_motorist",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Uninsured motorist coverage protects you when the at-fault driver has no insurance",
        details: &[],
    },
];

const COLLISION_MODERATE: &[RuleSpec] = &[
    RuleSpec {
        action: "review_deductible",
        policy: "collision",
        condition: None,
        reason: "Optimizing your deductible can balance premium costs with out-of-pocket expenses",
        details: &[("suggestion", "evaluate_optimal")],
    },
    RuleSpec {
        action: "consider_coverage",
        policy: "medical_payments",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Medical payments coverage provides additional protection for injury expenses",
        details: &[],
    },
];

const COLLISION_LOW: &[RuleSpec] = &[RuleSpec {
    action: "maintain_coverage",
    policy: "liability",
    condition: None,
    reason: "Your current liability coverage appears appropriate for this risk level",
    details: &[],
}];

const PARKING_HIGH: &[RuleSpec] = &[
    RuleSpec {
        action: "add_coverage",
        policy: "comprehensive",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Comprehensive coverage would protect against future parking damage incidents",
        details: &[],
    },
    RuleSpec {
        action: "decrease_deductible",
        policy: "comprehensive",
        condition: None,
        reason: "A lower deductible reduces out-of-pocket expenses for frequent claims",
        details: &[("max_amount", "$250")],
    },
];

const PARKING_MODERATE: &[RuleSpec] = &[
    RuleSpec {
        action: "add_coverage",
        policy: "comprehensive",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Comprehensive coverage protects against damage while parked",
        details: &[],
    },
    RuleSpec {
        action: "review_deductible",
        policy: "comprehensive",
        condition: None,
        reason: "Consider your deductible based on the frequency of claims and premium costs",
        details: &[("suggestion", "evaluate_optimal")],
    },
];

const WEATHER_HIGH: &[RuleSpec] = &[
    RuleSpec {
        action: "add_coverage",
        policy: "comprehensive",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Comprehensive coverage is essential for weather-related damage protection",
        details: &[],
    },
    RuleSpec {
        action: "review_coverage_limits",
        policy: "comprehensive",
        condition: None,
        reason: "Higher coverage limits provide better protection against severe weather damage",
        details: &[("suggestion", "increase")],
    },
];

const WEATHER_MODERATE: &[RuleSpec] = &[
    RuleSpec {
        action: "add_coverage",
        policy: "comprehensive",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Comprehensive coverage protects against weather damage to your vehicle",
        details: &[],
    },
    RuleSpec {
        action: "consider_coverage",
        policy: "roadside_assistance",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Roadside assistance can help in weather-related breakdown situations",
        details: &[],
    },
];

const THEFT_HIGH: &[RuleSpec] = &[
    RuleSpec {
        action: "add_coverage",
        policy: "comprehensive",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Comprehensive coverage is essential for theft protection",
        details: &[],
    },
    RuleSpec {
        action: "consider_coverage",
        policy: "rental_reimbursement",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Rental reimbursement provides transportation while your vehicle is being replaced",
        details: &[],
    },
];

const THEFT_MODERATE: &[RuleSpec] = &[RuleSpec {
    action: "add_coverage",
    policy: "comprehensive",
    condition: Some(RuleCondition::PolicyNotPresent),
    reason: "Comprehensive coverage includes theft protection",
    details: &[],
}];

const VANDALISM_HIGH: &[RuleSpec] = &[
    RuleSpec {
        action: "add_coverage",
        policy: "comprehensive",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Comprehensive coverage protects against vandalism damage",
        details: &[],
    },
    RuleSpec {
        action: "decrease_deductible",
        policy: "comprehensive",
        condition: None,
        reason: "A lower deductible reduces out-of-pocket expenses for vandalism claims",
        details: &[("max_amount", "$500")],
    },
];

const VANDALISM_MODERATE: &[RuleSpec] = &[RuleSpec {
    action: "add_coverage",
    policy: "comprehensive",
    condition: Some(RuleCondition::PolicyNotPresent),
    reason: "Comprehensive coverage includes protection against vandalism",
    details: &[],
}];

const MEDICAL_HIGH: &[RuleSpec] = &[
    RuleSpec {
        action: "increase_coverage",
        policy: "medical_payments",
        condition: None,
        reason: "Higher medical payments limits provide better protection for serious injuries",
        details: &[("min_amount", "$10,000")],
    },
    RuleSpec {
        action: "add_coverage",
        policy: "personal_injury_protection",
        condition: Some(RuleCondition::PolicyNotPresent),
        reason: "Personal injury protection provides broader medical coverage and lost wages",
        details: &[],
    },
];

const MEDICAL_MODERATE: &[RuleSpec] = &[RuleSpec {
    action: "review_coverage_limits",
    policy: "medical_payments",
    condition: None,
    reason: "Ensure your medical coverage limits match potential medical expenses",
    details: &[("suggestion", "evaluate")],
}];

pub(crate) const GLOBAL_RULES: &[GlobalRuleSpec] = &[
    GlobalRuleSpec {
        gate: RiskFactor::HighValueVehicle,
        action: "consider_coverage",
        policy: "gap_insurance",
        reason: "Gap insurance covers the difference between your car's value and what you owe \
             if it's totaled",
    },
    GlobalRuleSpec {
        gate: RiskFactor::ClaimFrequency,
        action: "review_deductible",
        policy: "all",
        reason: "With multiple claims, optimizing your deductible can reduce overall costs",
    },
];
