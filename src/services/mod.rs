pub mod answers;
pub mod composition;
pub mod evaluations;
pub mod gradings;
pub mod registrations;
pub mod stats;

pub use answers::AnswerService;
pub use composition::CompositionService;
pub use evaluations::EvaluationService;
pub use gradings::GradingService;
pub use registrations::RegistrationService;
pub use stats::StatsService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use tracing::debug;

use crate::cache::ObjectCache;
use crate::errors::EvalSystemError;
use crate::middlewares::RequireJWT;
use crate::models::evaluations::entities::{Evaluation, EvaluationStatus};
use crate::models::users::entities::CurrentUser;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 统计概览的缓存键
pub(crate) fn overview_cache_key(evaluation_id: &str) -> String {
    format!("evaluation:{evaluation_id}:overview")
}

pub(crate) fn get_cache(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|cache| cache.get_ref().clone())
}

/// 组卷、作答、批改或阶段变化后清除统计缓存
pub(crate) async fn invalidate_overview(request: &HttpRequest, evaluation_id: &str) {
    if let Some(cache) = get_cache(request) {
        cache.remove(&overview_cache_key(evaluation_id)).await;
        debug!("Invalidated overview cache for evaluation {}", evaluation_id);
    }
}

pub(crate) fn current_user(request: &HttpRequest) -> Result<CurrentUser, HttpResponse> {
    RequireJWT::extract_current_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unable to get user information",
        ))
    })
}

pub(crate) fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message))
}

pub(crate) fn internal_error(context: &str, err: EvalSystemError) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {err}"),
    ))
}

pub(crate) async fn load_evaluation(
    storage: &Arc<dyn Storage>,
    evaluation_id: &str,
) -> Result<Evaluation, HttpResponse> {
    match storage.get_evaluation(evaluation_id).await {
        Ok(Some(evaluation)) => Ok(evaluation),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => Err(internal_error("Failed to get evaluation", e)),
    }
}

/// 读取评测并拒绝已归档的评测
pub(crate) async fn load_active_evaluation(
    storage: &Arc<dyn Storage>,
    evaluation_id: &str,
) -> Result<Evaluation, HttpResponse> {
    let evaluation = load_evaluation(storage, evaluation_id).await?;
    if evaluation.status == EvaluationStatus::Archived {
        return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::EvaluationArchived,
            "Evaluation is archived",
        )));
    }
    Ok(evaluation)
}
