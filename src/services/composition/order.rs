use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CompositionService;
use crate::domain::composition::{self, CompositionError, ensure_unlocked};
use crate::errors::EvalSystemError;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::questions::requests::{MoveQuestionRequest, ReorderCompositionRequest};
use crate::services::{internal_error, invalidate_overview, load_active_evaluation};

/// 计算新顺序并整体写回
async fn apply_order<F>(
    service: &CompositionService,
    request: &HttpRequest,
    evaluation_id: &str,
    compute: F,
) -> ActixResult<HttpResponse>
where
    F: FnOnce(&[String]) -> Result<Vec<(String, u32)>, CompositionError>,
{
    let storage = service.get_storage(request);

    let evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Err(e) = ensure_unlocked(evaluation.phase) {
        return Ok(error_response(&EvalSystemError::from(e)));
    }

    let current: Vec<String> = match storage.list_composition(evaluation_id).await {
        Ok(links) => links.into_iter().map(|link| link.question_id).collect(),
        Err(e) => return Ok(internal_error("Failed to get composition", e)),
    };

    let order = match compute(&current) {
        Ok(order) => order,
        Err(e) => return Ok(error_response(&EvalSystemError::from(e))),
    };

    if let Err(e) = storage.save_composition_order(evaluation_id, order).await {
        return Ok(internal_error("Failed to save question order", e));
    }
    info!("Composition of evaluation {} reordered", evaluation_id);
    invalidate_overview(request, evaluation_id).await;

    match storage.list_composition(evaluation_id).await {
        Ok(links) => Ok(HttpResponse::Ok().json(ApiResponse::success(links, "Question order updated successfully"))),
        Err(e) => Ok(internal_error("Failed to get composition", e)),
    }
}

pub async fn reorder_composition(
    service: &CompositionService,
    request: &HttpRequest,
    evaluation_id: &str,
    data: ReorderCompositionRequest,
) -> ActixResult<HttpResponse> {
    apply_order(service, request, evaluation_id, |current| {
        composition::reorder(current, &data.question_ids)
    })
    .await
}

pub async fn move_question(
    service: &CompositionService,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
    data: MoveQuestionRequest,
) -> ActixResult<HttpResponse> {
    apply_order(service, request, evaluation_id, |current| {
        composition::move_question(current, question_id, data.index)
    })
    .await
}
