use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::EvaluationService;
use crate::domain::autograde::autograde;
use crate::domain::phase::{
    EVALUATION_PHASES, PhaseGraph, phase_details, phase_label, validate_leaving,
};
use crate::errors::{EvalSystemError, Result};
use crate::models::answers::entities::StudentAnswer;
use crate::models::common::response::error_response;
use crate::models::evaluations::entities::Phase;
use crate::models::evaluations::requests::{PhaseInfoParams, PhaseTransitionRequest};
use crate::models::evaluations::responses::PhaseInfoResponse;
use crate::models::registrations::entities::UserOnEvaluationStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    current_user, internal_error, invalidate_overview, load_active_evaluation, load_evaluation,
};
use crate::storage::Storage;

pub async fn transition_phase(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: &str,
    data: PhaseTransitionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let mut evaluation = match load_active_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    let current = evaluation.phase;
    let requested = data.phase;

    // 只能推进到紧邻的下一阶段
    if let Err(e) = EVALUATION_PHASES.validate_transition(current, requested) {
        info!(
            "Rejected phase transition {} -> {} for evaluation {}: {}",
            current, requested, evaluation_id, e
        );
        return Ok(error_response(&EvalSystemError::from(e)));
    }

    let links = match storage.list_composition(evaluation_id).await {
        Ok(links) => links,
        Err(e) => return Ok(internal_error("Failed to get composition", e)),
    };

    if let Err(e) = validate_leaving(current, &evaluation.label, links.len()) {
        return Ok(error_response(&EvalSystemError::from(e)));
    }

    let now = Utc::now();
    match requested {
        Phase::InProgress => {
            if let Some(duration) = evaluation.schedule.duration() {
                evaluation.schedule.start_at = Some(now);
                evaluation.schedule.end_at = Some(now + duration);
            }
        }
        Phase::Grading => match prepare_grading(&storage, evaluation_id).await {
            Ok(graded) => debug!(
                "Prepared {} gradings for evaluation {}",
                graded, evaluation_id
            ),
            Err(e) => return Ok(internal_error("Failed to prepare gradings", e)),
        },
        _ => {}
    }

    evaluation.phase = requested;
    evaluation.updated_at = now;

    match storage.update_evaluation(evaluation).await {
        Ok(Some(updated)) => {
            info!(
                "Evaluation {} moved from {} to {} by {}",
                updated.id, current, requested, user.email
            );
            // 切换前最后一刻保存的作答在这里补上批改
            if requested == Phase::Grading {
                match prepare_grading(&storage, evaluation_id).await {
                    Ok(0) => {}
                    Ok(late) => debug!(
                        "Graded {} answers saved during phase change of evaluation {}",
                        late, evaluation_id
                    ),
                    Err(e) => error!(
                        "Failed to grade late answers of evaluation {}: {}",
                        evaluation_id, e
                    ),
                }
            }
            invalidate_overview(request, &updated.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Phase changed successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => Ok(internal_error("Failed to change phase", e)),
    }
}

/// 进入批改阶段：为没有作答的参与者补齐缺考作答，对尚无批改的作答自动批改
///
/// 只写批改或补插缺考记录，不覆盖作答内容，可以重复执行。
async fn prepare_grading(storage: &Arc<dyn Storage>, evaluation_id: &str) -> Result<usize> {
    let links = storage.list_composition(evaluation_id).await?;
    let registrations = storage.list_registrations(evaluation_id).await?;
    let mut graded = 0;

    for link in &links {
        let kind = &link.question.kind;
        let answers = &link.question.student_answer;

        for answer in answers.iter().filter(|answer| answer.student_grading.is_none()) {
            let grading = autograde(kind, answer, link.points);
            if storage
                .update_grading(&link.question_id, &answer.user_email, grading)
                .await?
                .is_some()
            {
                graded += 1;
            }
        }

        for registration in &registrations {
            if answers
                .iter()
                .any(|answer| answer.user_email == registration.user_email)
            {
                continue;
            }
            let mut missing = StudentAnswer::missing(registration.user_email.clone());
            missing.student_grading = Some(autograde(kind, &missing, link.points));
            // 返回 false 说明学生刚好提交了作答，留给下一轮
            if storage.insert_answer(&link.question_id, missing).await? {
                graded += 1;
            }
        }
    }

    for mut registration in registrations {
        if registration.status == UserOnEvaluationStatus::InProgress {
            registration.status = UserOnEvaluationStatus::Finished;
            storage.update_registration(registration).await?;
        }
    }

    Ok(graded)
}

pub async fn get_phase_info(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: &str,
    params: PhaseInfoParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let evaluation = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    let graph = PhaseGraph::for_kind(params.graph.unwrap_or_default());
    let details = phase_details(evaluation.phase);
    let response = PhaseInfoResponse {
        phase: evaluation.phase,
        label: phase_label(&graph, Some(evaluation.phase)).to_string(),
        menu_key: details.menu_key.to_string(),
        next_phase: graph.next(evaluation.phase),
        next_action_label: details.next_action_label.map(str::to_string),
        composition_locked: graph.greater_than(evaluation.phase, Phase::Composition),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Phase info retrieved successfully")))
}
