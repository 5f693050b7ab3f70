use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StatsService;
use crate::domain::stats::type_specific_stats;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, load_evaluation};

pub async fn get_question_stats(
    service: &StatsService,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_evaluation(&storage, evaluation_id).await {
        return Ok(resp);
    }

    let links = match storage.list_composition(evaluation_id).await {
        Ok(links) => links,
        Err(e) => return Ok(internal_error("Failed to get composition", e)),
    };

    match links.iter().find(|link| link.question_id == question_id) {
        Some(link) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            type_specific_stats(&link.question),
            "Question stats retrieved successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        ))),
    }
}
