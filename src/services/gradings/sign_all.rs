use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::future::join_all;
use tracing::{info, warn};

use super::{GradingService, load_grading_evaluation};
use crate::domain::grading::sign_off_all_autograded;
use crate::models::ApiResponse;
use crate::models::answers::responses::SignAllResponse;
use crate::services::{current_user, internal_error, invalidate_overview};

/// 批量签署：逐条并发写入，不回滚，返回成功与失败的条数
pub async fn sign_all_autograded(
    service: &GradingService,
    request: &HttpRequest,
    evaluation_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = load_grading_evaluation(&storage, evaluation_id).await {
        return Ok(resp);
    }

    let links = match storage.list_composition(evaluation_id).await {
        Ok(links) => links,
        Err(e) => return Ok(internal_error("Failed to get composition", e)),
    };

    let gradings = links.iter().flat_map(|link| {
        link.question.student_answer.iter().filter_map(move |answer| {
            answer.student_grading.as_ref().map(move |grading| {
                (
                    (link.question_id.as_str(), answer.user_email.as_str()),
                    grading,
                )
            })
        })
    });
    let changed = sign_off_all_autograded(gradings, &user.email);

    let writes = changed
        .into_iter()
        .map(|((question_id, user_email), grading)| {
            let storage = storage.clone();
            async move {
                let result = storage.update_grading(question_id, user_email, grading).await;
                (question_id, user_email, result)
            }
        });

    let mut signed = 0u32;
    let mut failed = 0u32;
    for (question_id, user_email, result) in join_all(writes).await {
        match result {
            Ok(Some(_)) => signed += 1,
            Ok(None) => {
                failed += 1;
                warn!(
                    "Sign-all skipped missing answer of {} on question {}",
                    user_email, question_id
                );
            }
            Err(e) => {
                failed += 1;
                warn!(
                    "Sign-all failed for {} on question {}: {}",
                    user_email, question_id, e
                );
            }
        }
    }

    info!(
        "{} signed {} autograded gradings in evaluation {} ({} failed)",
        user.email, signed, evaluation_id, failed
    );
    invalidate_overview(request, evaluation_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SignAllResponse { signed, failed },
        "Bulk sign-off finished",
    )))
}
