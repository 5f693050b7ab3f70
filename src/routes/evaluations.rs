use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluations::requests::{
    CreateEvaluationRequest, EvaluationListParams, PhaseInfoParams, PhaseTransitionRequest,
    RedirectParams, UpdateEvaluationRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EvaluationService;

// 懒加载的全局 EVALUATION_SERVICE 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// HTTP处理程序
pub async fn list_evaluations(
    req: HttpRequest,
    query: web::Query<EvaluationListParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_evaluations(&req, query.into_inner())
        .await
}

pub async fn create_evaluation(
    req: HttpRequest,
    data: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .create_evaluation(&req, data.into_inner())
        .await
}

pub async fn get_evaluation(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_evaluation(&req, &evaluation_id).await
}

pub async fn update_evaluation(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
    data: web::Json<UpdateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .update_evaluation(&req, &evaluation_id, data.into_inner())
        .await
}

pub async fn delete_evaluation(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .delete_evaluation(&req, &evaluation_id)
        .await
}

pub async fn archive_evaluation(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .archive_evaluation(&req, &evaluation_id)
        .await
}

pub async fn get_phase_info(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
    query: web::Query<PhaseInfoParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_phase_info(&req, &evaluation_id, query.into_inner())
        .await
}

pub async fn transition_phase(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
    data: web::Json<PhaseTransitionRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .transition_phase(&req, &evaluation_id, data.into_inner())
        .await
}

pub async fn resolve_redirect(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
    query: web::Query<RedirectParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .resolve_redirect(&req, &evaluation_id, query.into_inner())
        .await
}

// 配置路由
pub fn configure_evaluations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_evaluations)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_evaluation)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{evaluation_id}")
                    // 学生也可以查看评测信息（不含访问名单）
                    .route(web::get().to(get_evaluation))
                    .route(
                        web::put()
                            .to(update_evaluation)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_evaluation)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{evaluation_id}/archive").route(
                    web::post()
                        .to(archive_evaluation)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/{evaluation_id}/phase")
                    .route(web::get().to(get_phase_info))
                    .route(
                        web::patch()
                            .to(transition_phase)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(web::resource("/{evaluation_id}/redirect").route(web::get().to(resolve_redirect))),
    );
}
