use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CompositionService;
use crate::domain::composition::ensure_unlocked;
use crate::errors::EvalSystemError;
use crate::models::common::response::error_response;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, invalidate_overview, load_active_evaluation};

pub async fn remove_question(
    service: &CompositionService,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Err(e) = ensure_unlocked(evaluation.phase) {
        return Ok(error_response(&EvalSystemError::from(e)));
    }

    match storage.remove_question(evaluation_id, question_id).await {
        Ok(true) => {
            info!(
                "Question {} removed from evaluation {}",
                question_id, evaluation_id
            );
            invalidate_overview(request, evaluation_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Question removed successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        ))),
        Err(e) => Ok(internal_error("Failed to remove question", e)),
    }
}
