use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnswerService;
use crate::domain::stats::{obtained_points, total_points};
use crate::models::answers::responses::{ParticipantResultsResponse, QuestionResult};
use crate::models::evaluations::entities::Phase;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error, load_evaluation};

/// 评测结束后学生查看自己的逐题得分
pub async fn get_my_results(
    service: &AnswerService,
    request: &HttpRequest,
    evaluation_id: &str,
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

    if evaluation.phase != Phase::Finished {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Evaluation has not finished yet",
        )));
    }

    match storage.get_registration(evaluation_id, &user.email).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ParticipantNotFound,
                "You did not take part in this evaluation",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get registration", e)),
    }

    let links = match storage.list_composition(evaluation_id).await {
        Ok(links) => links,
        Err(e) => return Ok(internal_error("Failed to get composition", e)),
    };

    let questions = links
        .iter()
        .map(|link| QuestionResult {
            question_id: link.question_id.clone(),
            order: link.order,
            points: link.points,
            grading: link
                .question
                .student_answer
                .iter()
                .find(|answer| answer.user_email == user.email)
                .and_then(|answer| answer.student_grading.clone()),
        })
        .collect();

    let response = ParticipantResultsResponse {
        obtained_points: obtained_points(&links, &user.email),
        total_points: total_points(&links),
        user_email: user.email,
        questions,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Results retrieved successfully")))
}
