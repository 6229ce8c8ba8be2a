use crate::infra::build_analysis_service;
use clap::Args;
use claimsight::analysis::{AnalysisRequest, DrivingRecord, ResultBundle, UserProfile};
use claimsight::config::AppConfig;
use claimsight::error::AppError;

const SAMPLE_SCENARIOS: &[(&str, &str)] = &[
    (
        "Rear-End Collision",
        "I was stopped at a red light when another driver rear-ended my car. There was visible \
         damage to my rear bumper, and I'm experiencing some neck pain. The incident occurred \
         on a clear day with good visibility. The other driver admitted fault and we exchanged \
         insurance information.",
    ),
    (
        "Parking Lot Damage",
        "While my car was parked at the grocery store, someone scratched the driver's side \
         door. The scratch is deep and goes across both doors. I was only in the store for \
         about 30 minutes. There were no witnesses and no note was left.",
    ),
    (
        "Weather Damage",
        "My car was damaged during a severe hailstorm last night. There are multiple dents on \
         the hood and roof of the vehicle. I had parked on the street because my garage was \
         full. The weather service had issued a severe weather warning for our area.",
    ),
    (
        "Vehicle Theft",
        "My car was stolen from outside my apartment building last night. I parked it at \
         around 9 PM and discovered it was missing at 7 AM when I was leaving for work. I've \
         filed a police report, and they said there have been several similar thefts in the \
         area recently.",
    ),
];

fn sample_profile() -> UserProfile {
    UserProfile {
        id: "user123".to_string(),
        other_policies: vec!["home_insurance".to_string()],
        years_as_customer: 4,
        driving_record: DrivingRecord {
            accidents: 0,
            violations: 1,
        },
    }
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Scenario text to analyze
    #[arg(long)]
    pub(crate) text: String,
    /// Print the full result bundle as JSON instead of the readable summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip the explanation stage
    #[arg(long)]
    pub(crate) no_explanation: bool,
    /// Skip the recommendation stage
    #[arg(long)]
    pub(crate) no_recommendations: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Attach the sample customer profile so personalized suggestions appear
    #[arg(long)]
    pub(crate) with_profile: bool,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    warn_when_offline(&config);

    let service = build_analysis_service(&config.completion)?;
    let request = AnalysisRequest {
        scenario_text: args.text,
        include_explanation: !args.no_explanation,
        include_recommendations: !args.no_recommendations,
        user_policy: None,
        user_profile: None,
    };

    let bundle = service.analyze(request).await?;

    if args.json {
        match serde_json::to_string_pretty(&bundle) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("result bundle unavailable: {err}"),
        }
    } else {
        render_bundle(&bundle);
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    warn_when_offline(&config);

    let service = build_analysis_service(&config.completion)?;
    let profile = args.with_profile.then(sample_profile);

    println!("Scenario analysis demo");
    for (title, text) in SAMPLE_SCENARIOS {
        println!("\n{title}");

        let request = AnalysisRequest {
            user_profile: profile.clone(),
            ..AnalysisRequest::for_text(*text)
        };
        match service.analyze(request).await {
            Ok(bundle) => render_bundle(&bundle),
            Err(err) => println!("  Analysis unavailable: {err}"),
        }
    }

    Ok(())
}

fn warn_when_offline(config: &AppConfig) {
    if config.completion.api_key.is_none() {
        eprintln!(
            "note: COMPLETION_API_KEY not set; classification and explanations use the local \
             rule tables"
        );
    }
}

fn render_bundle(bundle: &ResultBundle) {
    println!(
        "- Scenario {} classified as {} ({:.0}% confidence{})",
        bundle.scenario_id.0,
        bundle.classification.category.display_name(),
        bundle.classification.confidence * 100.0,
        if bundle.classification.rule_based_fallback {
            ", rule-based"
        } else {
            ""
        }
    );
    println!(
        "  Risk: {} (score {:.2})",
        bundle.risk_assessment.risk_level.label(),
        bundle.risk_assessment.risk_score
    );

    if let Some(primary) = &bundle.policy_analysis.primary_coverage {
        println!("  Primary coverage: {}", primary.display_name());
    }
    for gap in &bundle.policy_analysis.coverage_gaps {
        println!(
            "  Coverage gap [{}]: {}",
            gap.severity.label(),
            gap.description
        );
    }

    let impact = &bundle.risk_assessment.financial_impact_estimate;
    println!(
        "  Estimated impact: ${:.2} - ${:.2} (median ${:.2})",
        impact.low_estimate, impact.high_estimate, impact.median_estimate
    );

    if let Some(explanation) = &bundle.explanation {
        println!("  Summary: {}", explanation.summary);
    }

    if let Some(recommendations) = &bundle.recommendations {
        if !recommendations.is_empty() {
            println!("  Recommendations:");
            for recommendation in recommendations {
                println!(
                    "    - [{}] {} ({}): {}",
                    recommendation.priority.label(),
                    recommendation.action,
                    recommendation.policy,
                    recommendation.reason
                );
            }
        }
    }

    println!("  Processed in {:.4}s", bundle.processing_time);
}
