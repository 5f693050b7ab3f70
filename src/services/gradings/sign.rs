use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradingService, SignAction, apply_to_grading};
use crate::domain::grading::{sign_off, toggle, unsign};
use crate::services::current_user;

pub async fn sign_grading(
    service: &GradingService,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
    user_email: &str,
    action: SignAction,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    info!(
        "{} applying {:?} to question {} for {}",
        user.email, action, question_id, user_email
    );

    let signer = user.email.as_str();
    apply_to_grading(
        &storage,
        request,
        evaluation_id,
        question_id,
        user_email,
        |grading, max_points| match action {
            SignAction::Sign => sign_off(grading, signer, max_points),
            SignAction::Unsign => unsign(grading),
            SignAction::Toggle => toggle(grading, signer, max_points),
        },
    )
    .await
}
