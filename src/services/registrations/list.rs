use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RegistrationService;
use crate::models::ApiResponse;
use crate::services::{internal_error, load_evaluation};

pub async fn list_participants(
    service: &RegistrationService,
    request: &HttpRequest,
    evaluation_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_evaluation(&storage, evaluation_id).await {
        return Ok(resp);
    }

    match storage.list_registrations(evaluation_id).await {
        Ok(registrations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            registrations,
            "Participants retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list participants", e)),
    }
}
