use std::collections::BTreeMap;
use std::sync::Arc;

use super::catalog::PolicyCatalog;
use super::domain::{
    Classification, CoverageGap, GapKind, PolicyAnalysis, Priority, Recommendation,
    RecommendationKind, Severity, UserPolicy,
};

/// Pure coverage breakdown over the catalog: primary/secondary split, policy
/// metadata, category-driven gap detection, and one add-coverage suggestion
/// per gap. No I/O and no caching; the analysis is cheap to recompute.
pub struct PolicyAnalyzer {
    catalog: Arc<PolicyCatalog>,
}

impl PolicyAnalyzer {
    pub fn new(catalog: Arc<PolicyCatalog>) -> Self {
        Self { catalog }
    }

    pub fn analyze(
        &self,
        classification: &Classification,
        user_policy: Option<&UserPolicy>,
    ) -> PolicyAnalysis {
        let mut relevant = classification.relevant_policies.clone();
        if relevant.is_empty() {
            if let Some(defaults) = self.catalog.defaults_for(classification.category) {
                relevant = defaults.to_vec();
            }
        }

        let primary_coverage = relevant.first().cloned();
        let secondary_coverage: Vec<_> = relevant.iter().skip(1).cloned().collect();

        let mut policy_details = BTreeMap::new();
        for policy in &relevant {
            if let Some(metadata) = self.catalog.metadata(policy) {
                policy_details.insert(policy.clone(), metadata.clone());
            }
        }

        // Coverages the customer already holds count toward gap detection.
        if let Some(user_policy) = user_policy {
            for policy in &user_policy.policies {
                if let Some(metadata) = self.catalog.metadata(policy) {
                    policy_details
                        .entry(policy.clone())
                        .or_insert_with(|| metadata.clone());
                }
            }
        }

        let coverage_gaps = self.identify_gaps(classification, &policy_details);
        let recommendations = gap_recommendations(&coverage_gaps, classification.confidence);

        PolicyAnalysis {
            primary_coverage,
            secondary_coverage,
            policy_details,
            coverage_gaps,
            recommendations,
        }
    }

    fn identify_gaps(
        &self,
        classification: &Classification,
        policy_details: &BTreeMap<super::domain::PolicyId, super::domain::PolicyMetadata>,
    ) -> Vec<CoverageGap> {
        let Some(expected) = self.catalog.expected_for(classification.category) else {
            return Vec::new();
        };

        let satisfied = expected
            .satisfied_by
            .iter()
            .any(|policy| policy_details.contains_key(policy));
        if satisfied {
            return Vec::new();
        }

        vec![CoverageGap {
            kind: GapKind::MissingCoverage,
            policy: expected.suggested.clone(),
            description: expected.description.clone(),
            severity: Severity::High,
        }]
    }
}

fn gap_recommendations(gaps: &[CoverageGap], confidence: f64) -> Vec<Recommendation> {
    gaps.iter()
        .map(|gap| Recommendation {
            id: None,
            kind: RecommendationKind::RuleBased,
            action: "add_coverage".to_string(),
            policy: gap.policy.clone(),
            reason: gap.description.clone(),
            details: BTreeMap::new(),
            priority: Priority::from(gap.severity),
            confidence,
        })
        .collect()
}
