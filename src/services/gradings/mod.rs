pub mod sign;
pub mod sign_all;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::domain::access::normalize_email;
use crate::models::answers::entities::StudentGrading;
use crate::models::answers::requests::UpdateGradingRequest;
use crate::models::evaluations::entities::{Evaluation, Phase};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, invalidate_overview, load_active_evaluation};
use crate::storage::Storage;

/// 签署动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignAction {
    Sign,
    Unsign,
    Toggle,
}

pub struct GradingService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradingService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 修改得分与评语
    pub async fn update_grading(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        question_id: &str,
        user_email: &str,
        data: UpdateGradingRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grading(self, request, evaluation_id, question_id, user_email, data).await
    }

    pub async fn sign_grading(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        question_id: &str,
        user_email: &str,
        action: SignAction,
    ) -> ActixResult<HttpResponse> {
        sign::sign_grading(self, request, evaluation_id, question_id, user_email, action).await
    }

    // 签署所有未签署的自动批改
    pub async fn sign_all_autograded(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
    ) -> ActixResult<HttpResponse> {
        sign_all::sign_all_autograded(self, request, evaluation_id).await
    }
}

/// 只有批改阶段允许修改批改
pub(crate) async fn load_grading_evaluation(
    storage: &Arc<dyn Storage>,
    evaluation_id: &str,
) -> Result<Evaluation, HttpResponse> {
    let evaluation = load_active_evaluation(storage, evaluation_id).await?;
    if evaluation.phase != Phase::Grading {
        return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("Gradings cannot be changed in phase {}", evaluation.phase),
        )));
    }
    Ok(evaluation)
}

/// 对单条批改做一次变换并写回
pub(crate) async fn apply_to_grading<F>(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    evaluation_id: &str,
    question_id: &str,
    user_email: &str,
    change: F,
) -> ActixResult<HttpResponse>
where
    F: FnOnce(&StudentGrading, f64) -> StudentGrading,
{
    if let Err(resp) = load_grading_evaluation(storage, evaluation_id).await {
        return Ok(resp);
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

    let user_email = normalize_email(user_email);
    let Some(answer) = link
        .question
        .student_answer
        .iter()
        .find(|answer| answer.user_email == user_email)
    else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnswerNotFound,
            "Answer not found",
        )));
    };
    let Some(grading) = &answer.student_grading else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradingNotFound,
            "Grading not found",
        )));
    };

    let updated = change(grading, link.points);

    match storage
        .update_grading(question_id, &user_email, updated)
        .await
    {
        Ok(Some(answer)) => {
            invalidate_overview(request, evaluation_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(answer, "Grading updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnswerNotFound,
            "Answer not found",
        ))),
        Err(e) => Ok(internal_error("Failed to update grading", e)),
    }
}
