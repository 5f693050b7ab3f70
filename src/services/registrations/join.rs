use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{info, warn};

use super::RegistrationService;
use crate::domain::access::{can_join, session_changed};
use crate::errors::EvalSystemError;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::registrations::entities::{UserOnEvaluation, UserOnEvaluationStatus};
use crate::models::registrations::requests::JoinEvaluationRequest;
use crate::services::{current_user, internal_error, invalidate_overview, load_evaluation};

pub async fn join_evaluation(
    service: &RegistrationService,
    request: &HttpRequest,
    evaluation_id: &str,
    data: JoinEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let evaluation = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Err(e) = can_join(&evaluation, &user.email) {
        info!(
            "User {} cannot join evaluation {}: {}",
            user.email, evaluation_id, e
        );
        return Ok(error_response(&EvalSystemError::from(e)));
    }

    let session_id = data.session_id.filter(|id| !id.trim().is_empty());

    // 重复加入时只做会话变化检测
    let existing = match storage.get_registration(evaluation_id, &user.email).await {
        Ok(existing) => existing,
        Err(e) => return Ok(internal_error("Failed to get registration", e)),
    };

    if let Some(mut registration) = existing {
        if !registration.has_session_changed
            && session_changed(&registration, session_id.as_deref())
        {
            warn!(
                "Session change detected for {} in evaluation {}",
                user.email, evaluation_id
            );
            registration.has_session_changed = true;
            registration.session_change_detected_at = Some(Utc::now());
            registration = match storage.update_registration(registration).await {
                Ok(updated) => updated,
                Err(e) => return Ok(internal_error("Failed to update registration", e)),
            };
            invalidate_overview(request, evaluation_id).await;
        }
        return Ok(HttpResponse::Ok().json(ApiResponse::success(registration, "Already joined evaluation")));
    }

    let registration = UserOnEvaluation {
        evaluation_id: evaluation_id.to_string(),
        user_email: user.email.clone(),
        status: UserOnEvaluationStatus::InProgress,
        registered_at: Utc::now(),
        original_session_id: session_id,
        has_session_changed: false,
        session_change_detected_at: None,
    };

    match storage.register_participant(registration).await {
        Ok(registration) => {
            info!("User {} joined evaluation {}", user.email, evaluation_id);
            invalidate_overview(request, evaluation_id).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(registration, "Joined evaluation successfully")))
        }
        Err(e) => Ok(internal_error("Failed to join evaluation", e)),
    }
}
