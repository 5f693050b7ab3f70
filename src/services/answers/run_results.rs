use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AnswerService;
use crate::domain::access::normalize_email;
use crate::models::answers::requests::RecordRunResultsRequest;
use crate::models::common::response::error_response;
use crate::models::evaluations::entities::Phase;
use crate::models::questions::entities::QuestionKind;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, internal_error, invalidate_overview, load_active_evaluation};

/// 执行器回写代码题或数据库题的运行结果，进入 GRADING 时据此自动批改
pub async fn record_run_results(
    service: &AnswerService,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
    user_email: &str,
    data: RecordRunResultsRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if evaluation.phase != Phase::InProgress {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AnswerNotAllowed,
            format!("Run results are not accepted in phase {}", evaluation.phase),
        )));
    }

    let links = match storage.list_composition(evaluation_id).await {
        Ok(links) => links,
        Err(e) => return Ok(internal_error("Failed to get composition", e)),
    };
    let Some(link) = links.iter().find(|link| link.question_id == question_id) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        )));
    };
    if !matches!(
        link.question.kind,
        QuestionKind::Code { .. } | QuestionKind::Database { .. }
    ) {
        return Ok(bad_request(format!(
            "Question type {} has no run results",
            link.question.kind.type_name()
        )));
    }

    let user_email = normalize_email(user_email);
    match storage
        .record_run_results(question_id, &user_email, data)
        .await
    {
        Ok(Some(answer)) => {
            info!(
                "Recorded run results for {} on question {} of evaluation {}",
                user_email, question_id, evaluation_id
            );
            invalidate_overview(request, evaluation_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                answer,
                "Run results recorded successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnswerNotFound,
            "Answer not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
