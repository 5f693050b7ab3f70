use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::answers::requests::{RecordRunResultsRequest, SubmitAnswerRequest};
use crate::models::users::entities::UserRole;
use crate::services::AnswerService;

// 懒加载的全局 ANSWER_SERVICE 实例
static ANSWER_SERVICE: Lazy<AnswerService> = Lazy::new(AnswerService::new_lazy);

pub async fn submit_answer(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    data: web::Json<SubmitAnswerRequest>,
) -> ActixResult<HttpResponse> {
    let (evaluation_id, question_id) = path.into_inner();
    ANSWER_SERVICE
        .submit_answer(&req, &evaluation_id, &question_id, data.into_inner())
        .await
}

pub async fn get_my_results(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ANSWER_SERVICE.get_my_results(&req, &evaluation_id).await
}

pub async fn record_run_results(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    data: web::Json<RecordRunResultsRequest>,
) -> ActixResult<HttpResponse> {
    let (evaluation_id, question_id, user_email) = path.into_inner();
    ANSWER_SERVICE
        .record_run_results(
            &req,
            &evaluation_id,
            &question_id,
            &user_email,
            data.into_inner(),
        )
        .await
}

// 配置路由（学生作答与查看成绩，教师回写运行结果）
pub fn configure_answers_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations/{evaluation_id}/answers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/me").route(
                    web::get()
                        .to(get_my_results)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            )
            .service(
                web::resource("/{question_id}").route(
                    web::put()
                        .to(submit_answer)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            )
            .service(
                web::resource("/{question_id}/{user_email}/results").route(
                    web::put()
                        .to(record_run_results)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            ),
    );
}
