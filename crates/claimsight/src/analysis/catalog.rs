use std::collections::BTreeMap;

use super::domain::{IncidentCategory, PolicyId, PolicyMetadata};

pub(crate) const LIABILITY: &str = "liability";
pub(crate) const COLLISION: &str = "collision";
pub(crate) const COMPREHENSIVE: &str = "comprehensive";
pub(crate) const MEDICAL_PAYMENTS: &str = "medical_payments";
pub(crate) const PERSONAL_INJURY_PROTECTION: &str = "personal_injury_protection";

/// Coverage family a category expects; any member satisfies the expectation
/// and `suggested` is the policy named when the family is absent.
#[derive(Debug, Clone)]
pub struct ExpectedCoverage {
    pub suggested: PolicyId,
    pub satisfied_by: Vec<PolicyId>,
    pub description: String,
}

/// Static mapping from policy identifiers to descriptive metadata and from
/// incident categories to default policy sets. Loaded once at process start
/// and read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct PolicyCatalog {
    policies: BTreeMap<PolicyId, PolicyMetadata>,
    category_defaults: BTreeMap<IncidentCategory, Vec<PolicyId>>,
    expected_coverage: BTreeMap<IncidentCategory, ExpectedCoverage>,
}

impl PolicyCatalog {
    pub fn standard() -> Self {
        let mut policies = BTreeMap::new();
        policies.insert(
            PolicyId::new(LIABILITY),
            PolicyMetadata {
                description: "Covers damage you cause to others".to_string(),
                subtypes: vec!["bodily_injury".to_string(), "property_damage".to_string()],
                typical_limits: vec![
                    "$25,000/$50,000/$25,000".to_string(),
                    "$50,000/$100,000/$50,000".to_string(),
                ],
                typical_deductibles: Vec::new(),
                required: true,
                coverage_details: "Liability coverage helps pay for the costs of the other \
                     driver's property and bodily injuries if you're found at fault in an \
                     accident."
                    .to_string(),
            },
        );
        policies.insert(
            PolicyId::new(COLLISION),
            PolicyMetadata {
                description: "Covers damage to your vehicle from a collision".to_string(),
                subtypes: vec!["standard".to_string(), "broad_form".to_string()],
                typical_limits: Vec::new(),
                typical_deductibles: vec![
                    "$250".to_string(),
                    "$500".to_string(),
                    "$1000".to_string(),
                ],
                required: false,
                coverage_details: "Collision coverage helps pay for damage to your vehicle \
                     after an accident, regardless of who is at fault."
                    .to_string(),
            },
        );
        policies.insert(
            PolicyId::new(COMPREHENSIVE),
            PolicyMetadata {
                description: "Covers non-collision damage to your vehicle".to_string(),
                subtypes: vec!["standard".to_string(), "named_perils".to_string()],
                typical_limits: Vec::new(),
                typical_deductibles: vec![
                    "$0".to_string(),
                    "$250".to_string(),
                    "$500".to_string(),
                    "$1000".to_string(),
                ],
                required: false,
                coverage_details: "Comprehensive coverage helps pay for damage to your car \
                     caused by events other than collision, such as theft, vandalism, or \
                     natural disasters."
                    .to_string(),
            },
        );
        policies.insert(
            PolicyId::new(MEDICAL_PAYMENTS),
            PolicyMetadata {
                description: "Covers medical expenses regardless of fault".to_string(),
                subtypes: Vec::new(),
                typical_limits: vec![
                    "$1,000".to_string(),
                    "$5,000".to_string(),
                    "$10,000".to_string(),
                ],
                typical_deductibles: Vec::new(),
                required: false,
                coverage_details: "Medical payments coverage helps pay for medical expenses \
                     for you and your passengers after an accident, regardless of who is at \
                     fault."
                    .to_string(),
            },
        );
        policies.insert(
            PolicyId::new(PERSONAL_INJURY_PROTECTION),
            PolicyMetadata {
                description: "Covers medical expenses, lost wages, and other costs".to_string(),
                subtypes: Vec::new(),
                typical_limits: vec![
                    "$10,000".to_string(),
                    "$25,000".to_string(),
                    "$50,000".to_string(),
                ],
                typical_deductibles: Vec::new(),
                required: false,
                coverage_details: "Personal injury protection (PIP) helps cover medical \
                     expenses, lost wages, and other costs associated with injuries sustained \
                     in an accident, regardless of fault."
                    .to_string(),
            },
        );

        let mut category_defaults = BTreeMap::new();
        category_defaults.insert(
            IncidentCategory::Collision,
            policy_ids(&[LIABILITY, COLLISION, MEDICAL_PAYMENTS]),
        );
        category_defaults.insert(
            IncidentCategory::ParkingDamage,
            policy_ids(&[COMPREHENSIVE, COLLISION]),
        );
        category_defaults.insert(IncidentCategory::WeatherDamage, policy_ids(&[COMPREHENSIVE]));
        category_defaults.insert(IncidentCategory::Theft, policy_ids(&[COMPREHENSIVE]));
        category_defaults.insert(IncidentCategory::Vandalism, policy_ids(&[COMPREHENSIVE]));
        category_defaults.insert(
            IncidentCategory::Medical,
            policy_ids(&[MEDICAL_PAYMENTS, PERSONAL_INJURY_PROTECTION]),
        );

        let mut expected_coverage = BTreeMap::new();
        expected_coverage.insert(
            IncidentCategory::Collision,
            ExpectedCoverage {
                suggested: PolicyId::new(COLLISION),
                satisfied_by: policy_ids(&[COLLISION]),
                description: "Collision coverage not present but recommended for collision \
                     scenarios"
                    .to_string(),
            },
        );
        for category in [
            IncidentCategory::WeatherDamage,
            IncidentCategory::Theft,
            IncidentCategory::Vandalism,
        ] {
            expected_coverage.insert(
                category,
                ExpectedCoverage {
                    suggested: PolicyId::new(COMPREHENSIVE),
                    satisfied_by: policy_ids(&[COMPREHENSIVE]),
                    description: format!(
                        "Comprehensive coverage not present but recommended for {}",
                        category.display_name()
                    ),
                },
            );
        }
        expected_coverage.insert(
            IncidentCategory::Medical,
            ExpectedCoverage {
                suggested: PolicyId::new(MEDICAL_PAYMENTS),
                satisfied_by: policy_ids(&[MEDICAL_PAYMENTS, PERSONAL_INJURY_PROTECTION]),
                description: "Medical payments or personal injury protection coverage not \
                     present but recommended for medical expenses"
                    .to_string(),
            },
        );

        Self {
            policies,
            category_defaults,
            expected_coverage,
        }
    }

    pub fn metadata(&self, policy: &PolicyId) -> Option<&PolicyMetadata> {
        self.policies.get(policy)
    }

    pub fn defaults_for(&self, category: IncidentCategory) -> Option<&[PolicyId]> {
        self.category_defaults
            .get(&category)
            .map(|policies| policies.as_slice())
    }

    pub fn expected_for(&self, category: IncidentCategory) -> Option<&ExpectedCoverage> {
        self.expected_coverage.get(&category)
    }
}

fn policy_ids(ids: &[&str]) -> Vec<PolicyId> {
    ids.iter().map(|id| PolicyId::new(*id)).collect()
}
