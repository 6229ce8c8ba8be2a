use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use claimsight::analysis::{
    AnalysisCaches, AnalysisService, ChatCompletionClient, ClaimsTrendArchive, PolicyCatalog,
    RiskConfig,
};
use claimsight::config::CompletionConfig;
use claimsight::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the pipeline with the in-process collaborators: the chat completion
/// client (degrading to rule-based paths when no key is configured) and the
/// bundled claims-trend archive.
pub(crate) fn build_analysis_service(
    config: &CompletionConfig,
) -> Result<AnalysisService<ChatCompletionClient, ClaimsTrendArchive>, AppError> {
    let completion = Arc::new(ChatCompletionClient::from_config(config)?);

    Ok(AnalysisService::new(
        completion,
        Some(Arc::new(ClaimsTrendArchive)),
        Arc::new(PolicyCatalog::standard()),
        RiskConfig::standard(),
        AnalysisCaches::new(),
    ))
}
