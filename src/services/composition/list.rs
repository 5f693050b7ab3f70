use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CompositionService;
use crate::models::ApiResponse;
use crate::services::{internal_error, load_evaluation};

pub async fn list_composition(
    service: &CompositionService,
    request: &HttpRequest,
    evaluation_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_evaluation(&storage, evaluation_id).await {
        return Ok(resp);
    }

    match storage.list_composition(evaluation_id).await {
        Ok(links) => Ok(HttpResponse::Ok().json(ApiResponse::success(links, "Composition retrieved successfully"))),
        Err(e) => Ok(internal_error("Failed to get composition", e)),
    }
}
