use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::ApiResponse;
use crate::services::{current_user, load_evaluation};

pub async fn get_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let mut evaluation = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    // 学生看不到访问名单
    if !user.is_staff() {
        evaluation.access_list.clear();
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, "Evaluation retrieved successfully")))
}
