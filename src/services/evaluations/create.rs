use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::EvaluationService;
use crate::config::AppConfig;
use crate::models::evaluations::entities::{
    AccessMode, Evaluation, EvaluationSchedule, EvaluationStatus, Phase,
};
use crate::models::evaluations::requests::CreateEvaluationRequest;
use crate::models::ApiResponse;
use crate::services::{bad_request, internal_error};
use crate::utils::validate::{validate_group_scope, validate_label};

pub async fn create_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    data: CreateEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_label(&data.label) {
        return Ok(bad_request(msg));
    }

    // 未指定分组时使用默认分组
    let group_scope = data
        .group_scope
        .map(|scope| scope.trim().to_string())
        .filter(|scope| !scope.is_empty())
        .unwrap_or_else(|| AppConfig::get().evaluation.default_group_scope.clone());
    if let Err(msg) = validate_group_scope(&group_scope) {
        return Ok(bad_request(msg));
    }

    let now = Utc::now();
    let evaluation = Evaluation {
        id: Uuid::new_v4().to_string(),
        group_scope,
        label: data.label.trim().to_string(),
        conditions: data.conditions,
        phase: Phase::Settings,
        access_mode: AccessMode::LinkOnly,
        access_list: Vec::new(),
        schedule: EvaluationSchedule::default(),
        status: EvaluationStatus::Active,
        created_at: now,
        updated_at: now,
    };

    match storage.create_evaluation(evaluation).await {
        Ok(evaluation) => {
            info!(
                "Evaluation {} created in group {}",
                evaluation.id, evaluation.group_scope
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(evaluation, "Evaluation created successfully")))
        }
        Err(e) => Ok(internal_error("Failed to create evaluation", e)),
    }
}
