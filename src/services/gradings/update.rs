use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradingService, apply_to_grading};
use crate::domain::grading::regrade;
use crate::models::answers::requests::UpdateGradingRequest;
use crate::services::current_user;

pub async fn update_grading(
    service: &GradingService,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
    user_email: &str,
    data: UpdateGradingRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    info!(
        "{} regrading question {} for {}",
        user.email, question_id, user_email
    );

    apply_to_grading(
        &storage,
        request,
        evaluation_id,
        question_id,
        user_email,
        |grading, max_points| regrade(grading, data.points_obtained, data.comment, max_points),
    )
    .await
}
