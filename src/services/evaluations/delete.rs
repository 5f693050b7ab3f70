use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{info, warn};

use super::EvaluationService;
use crate::models::evaluations::entities::{EvaluationStatus, Phase};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, invalidate_overview, load_active_evaluation, load_evaluation};

/// 归档：ACTIVE -> ARCHIVED，归档后不可再修改
pub async fn archive_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let mut evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    evaluation.status = EvaluationStatus::Archived;
    evaluation.updated_at = Utc::now();

    match storage.update_evaluation(evaluation).await {
        Ok(Some(archived)) => {
            info!("Evaluation {} archived", archived.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(archived, "Evaluation archived successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => Ok(internal_error("Failed to archive evaluation", e)),
    }
}

/// 只有已归档或仍处于 SETTINGS 的评测可以删除
pub async fn delete_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let evaluation = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if evaluation.status != EvaluationStatus::Archived && evaluation.phase != Phase::Settings {
        warn!(
            "Refusing to delete evaluation {} in phase {}",
            evaluation.id, evaluation.phase
        );
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Only archived evaluations or evaluations in SETTINGS can be deleted",
        )));
    }

    match storage.delete_evaluation(evaluation_id).await {
        Ok(true) => {
            info!("Evaluation {} deleted", evaluation_id);
            invalidate_overview(request, evaluation_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Evaluation deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => Ok(internal_error("Failed to delete evaluation", e)),
    }
}
