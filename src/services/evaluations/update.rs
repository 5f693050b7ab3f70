use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::EvaluationService;
use crate::domain::access::normalize_email;
use crate::models::evaluations::requests::UpdateEvaluationRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, internal_error, invalidate_overview, load_active_evaluation};
use crate::utils::validate::{validate_access_list, validate_label};

pub async fn update_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: &str,
    data: UpdateEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let mut evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Some(label) = data.label {
        if let Err(msg) = validate_label(&label) {
            return Ok(bad_request(msg));
        }
        evaluation.label = label.trim().to_string();
    }

    if let Some(conditions) = data.conditions {
        evaluation.conditions = Some(conditions).filter(|c| !c.trim().is_empty());
    }

    if let Some(access_mode) = data.access_mode {
        evaluation.access_mode = access_mode;
    }

    if let Some(access_list) = data.access_list {
        if let Err(msg) = validate_access_list(&access_list) {
            return Ok(bad_request(msg));
        }
        // 统一小写并去重，保留首次出现的顺序
        let mut normalized: Vec<String> = Vec::with_capacity(access_list.len());
        for email in access_list.iter().map(|email| normalize_email(email)) {
            if !normalized.contains(&email) {
                normalized.push(email);
            }
        }
        evaluation.access_list = normalized;
    }

    if let Some(active) = data.duration_active {
        evaluation.schedule.duration_active = active;
    }
    if let Some(hours) = data.duration_hours {
        evaluation.schedule.duration_hours = hours;
    }
    if let Some(mins) = data.duration_mins {
        if mins >= 60 {
            return Ok(bad_request("Duration minutes must be less than 60"));
        }
        evaluation.schedule.duration_mins = mins;
    }

    evaluation.updated_at = Utc::now();

    match storage.update_evaluation(evaluation).await {
        Ok(Some(updated)) => {
            info!("Evaluation {} settings updated", updated.id);
            invalidate_overview(request, &updated.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Evaluation updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => Ok(internal_error("Failed to update evaluation", e)),
    }
}
