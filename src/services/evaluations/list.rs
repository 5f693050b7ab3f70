use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::ApiResponse;
use crate::models::evaluations::requests::EvaluationListParams;
use crate::models::evaluations::responses::EvaluationListResponse;
use crate::services::internal_error;

pub async fn list_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
    params: EvaluationListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_evaluations(params).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EvaluationListResponse { items },
            "Evaluations retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list evaluations", e)),
    }
}
