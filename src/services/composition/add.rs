use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::CompositionService;
use crate::domain::composition::{ensure_unlocked, validate_points};
use crate::errors::EvalSystemError;
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::models::questions::entities::{Question, QuestionKind};
use crate::models::questions::requests::AddQuestionRequest;
use crate::services::{
    bad_request, internal_error, invalidate_overview, load_active_evaluation,
};

pub async fn add_question(
    service: &CompositionService,
    request: &HttpRequest,
    evaluation_id: &str,
    data: AddQuestionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Err(e) = ensure_unlocked(evaluation.phase).and_then(|_| validate_points(data.points)) {
        return Ok(error_response(&EvalSystemError::from(e)));
    }

    if data.title.trim().is_empty() {
        return Ok(bad_request("Question title is required"));
    }

    if let QuestionKind::MultipleChoice { options } = &data.kind
        && options.is_empty()
    {
        return Ok(bad_request("Multiple choice questions need at least one option"));
    }

    let question = Question {
        id: Uuid::new_v4().to_string(),
        title: data.title.trim().to_string(),
        content: data.content,
        kind: data.kind,
        student_answer: Vec::new(),
    };

    match storage.add_question(evaluation_id, question, data.points).await {
        Ok(link) => {
            info!(
                "Question {} added to evaluation {} at position {}",
                link.question_id, evaluation_id, link.order
            );
            invalidate_overview(request, evaluation_id).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(link, "Question added successfully")))
        }
        Err(e) => Ok(internal_error("Failed to add question", e)),
    }
}
