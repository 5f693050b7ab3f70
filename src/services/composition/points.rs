use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CompositionService;
use crate::domain::composition::{ensure_unlocked, validate_points};
use crate::errors::EvalSystemError;
use crate::models::common::response::error_response;
use crate::models::questions::requests::UpdatePointsRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, invalidate_overview, load_active_evaluation};

pub async fn update_points(
    service: &CompositionService,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
    data: UpdatePointsRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Err(e) = ensure_unlocked(evaluation.phase).and_then(|_| validate_points(data.points)) {
        return Ok(error_response(&EvalSystemError::from(e)));
    }

    match storage
        .update_question_points(evaluation_id, question_id, data.points)
        .await
    {
        Ok(Some(link)) => {
            info!(
                "Question {} in evaluation {} now worth {} points",
                question_id, evaluation_id, link.points
            );
            invalidate_overview(request, evaluation_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(link, "Points updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        ))),
        Err(e) => Ok(internal_error("Failed to update points", e)),
    }
}
