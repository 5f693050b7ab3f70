use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::registrations::requests::JoinEvaluationRequest;
use crate::models::users::entities::UserRole;
use crate::services::RegistrationService;

// 懒加载的全局 REGISTRATION_SERVICE 实例
static REGISTRATION_SERVICE: Lazy<RegistrationService> = Lazy::new(RegistrationService::new_lazy);

pub async fn join_evaluation(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
    data: Option<web::Json<JoinEvaluationRequest>>,
) -> ActixResult<HttpResponse> {
    let data = data.map(|data| data.into_inner()).unwrap_or_default();
    REGISTRATION_SERVICE
        .join_evaluation(&req, &evaluation_id, data)
        .await
}

pub async fn list_participants(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    REGISTRATION_SERVICE
        .list_participants(&req, &evaluation_id)
        .await
}

// 配置路由
pub fn configure_registrations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations/{evaluation_id}/participants")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_participants)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/join").route(
                    web::post()
                        .to(join_evaluation)
                        // 只有学生可以加入评测
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            ),
    );
}
