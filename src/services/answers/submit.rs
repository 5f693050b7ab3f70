use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{debug, info};

use super::AnswerService;
use crate::models::answers::entities::{StudentAnswer, StudentAnswerStatus};
use crate::models::answers::requests::SubmitAnswerRequest;
use crate::models::evaluations::entities::Phase;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    bad_request, current_user, internal_error, invalidate_overview, load_active_evaluation,
};

pub async fn submit_answer(
    service: &AnswerService,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
    data: SubmitAnswerRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if evaluation.phase != Phase::InProgress {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AnswerNotAllowed,
            format!("Answers are not accepted in phase {}", evaluation.phase),
        )));
    }

    // 限时评测到点后不再接收作答
    if let Some(end_at) = evaluation.schedule.end_at
        && Utc::now() > end_at
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AnswerNotAllowed,
            "Answering time is over",
        )));
    }

    match storage.get_registration(evaluation_id, &user.email).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ParticipantNotFound,
                "You have not joined this evaluation",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get registration", e)),
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

    let expected = link.question.kind.type_name();
    if data.payload.type_name() != expected {
        return Ok(bad_request(format!(
            "Answer type {} does not match question type {}",
            data.payload.type_name(),
            expected
        )));
    }

    let status = data.status.unwrap_or(StudentAnswerStatus::Submitted);
    if status == StudentAnswerStatus::Missing {
        return Ok(bad_request("Answer status cannot be MISSING"));
    }

    // 运行结果只认执行器写入的记录
    let previous = match storage.get_answer(question_id, &user.email).await {
        Ok(previous) => previous,
        Err(e) => return Ok(internal_error("Failed to get answer", e)),
    };
    let payload = data
        .payload
        .with_recorded_results(previous.as_ref().and_then(|answer| answer.payload.as_ref()));

    let answer = StudentAnswer {
        user_email: user.email.clone(),
        status,
        payload: Some(payload),
        student_grading: None,
        updated_at: Utc::now(),
    };

    match storage.upsert_answer(question_id, answer).await {
        Ok(saved) => {
            if saved.status == StudentAnswerStatus::Submitted {
                info!(
                    "User {} submitted question {} of evaluation {}",
                    user.email, question_id, evaluation_id
                );
            } else {
                debug!("User {} saved progress on question {}", user.email, question_id);
            }
            invalidate_overview(request, evaluation_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Answer saved successfully")))
        }
        Err(e) => Ok(internal_error("Failed to save answer", e)),
    }
}
