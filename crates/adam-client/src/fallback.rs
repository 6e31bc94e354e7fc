//! One failure policy for every request: log it, show canned data.
//!
//! The error never reaches the data layer; the outcome only records that it
//! came from the fallback so the renderer can say so.

use crate::client::ScoringService;
use adam_capture::CapturedImage;
use adam_core::catalog::{self, ModelInfo};
use adam_core::{mock, Outcome, ResultSource};

/// Analyze a front/side pair, substituting the mock result on any failure.
pub async fn analyze_or_mock<S: ScoringService + ?Sized>(
    service: &S,
    front: &CapturedImage,
    side: &CapturedImage,
    model: &str,
) -> Outcome {
    match service.analyze(front, side, model).await {
        Ok(resp) => {
            tracing::info!(
                model,
                score = resp.data.score,
                tier = %resp.data.tier,
                served_at = ?resp.timestamp,
                "analysis complete"
            );
            Outcome::Analysis {
                result: resp.data,
                source: ResultSource::Live,
            }
        }
        Err(e) => {
            tracing::warn!(model, code = e.code().unwrap_or("-"), error = %e, "analysis failed; showing mock result");
            Outcome::Analysis {
                result: mock::mock_analysis(),
                source: ResultSource::Fallback,
            }
        }
    }
}

/// Front-only analysis with the same policy.
pub async fn quick_or_mock<S: ScoringService + ?Sized>(
    service: &S,
    front: &CapturedImage,
    model: &str,
) -> Outcome {
    match service.analyze_quick(front, model).await {
        Ok(resp) => {
            tracing::info!(model, score = resp.data.score, served_at = ?resp.timestamp, "quick analysis complete");
            Outcome::Analysis {
                result: resp.data,
                source: ResultSource::Live,
            }
        }
        Err(e) => {
            tracing::warn!(model, code = e.code().unwrap_or("-"), error = %e, "quick analysis failed; showing mock result");
            Outcome::Analysis {
                result: mock::mock_analysis(),
                source: ResultSource::Fallback,
            }
        }
    }
}

/// Multi-model comparison; a whole-request failure yields the mock comparison.
///
/// Individual model failures inside a successful response are kept as-is.
pub async fn compare_or_mock<S: ScoringService + ?Sized>(
    service: &S,
    front: &CapturedImage,
    side: Option<&CapturedImage>,
) -> Outcome {
    match service.compare(front, side).await {
        Ok(resp) => {
            tracing::info!(
                models = resp.result.model_results.len(),
                succeeded = resp.result.success_count(),
                served_at = ?resp.timestamp,
                "comparison complete"
            );
            Outcome::Comparison {
                result: resp.result,
                source: ResultSource::Live,
            }
        }
        Err(e) => {
            tracing::warn!(code = e.code().unwrap_or("-"), error = %e, "comparison failed; showing mock comparison");
            Outcome::Comparison {
                result: mock::mock_comparison(),
                source: ResultSource::Fallback,
            }
        }
    }
}

/// Ask the service for its models, falling back to the compiled-in catalog.
pub async fn models_or_builtin<S: ScoringService + ?Sized>(service: &S) -> (Vec<ModelInfo>, ResultSource) {
    match service.models().await {
        Ok(models) if !models.is_empty() => (models, ResultSource::Live),
        Ok(_) => {
            tracing::warn!("service listed no models; using built-in catalog");
            (catalog::builtin_models(), ResultSource::Fallback)
        }
        Err(e) => {
            tracing::warn!(error = %e, "model listing failed; using built-in catalog");
            (catalog::builtin_models(), ResultSource::Fallback)
        }
    }
}
