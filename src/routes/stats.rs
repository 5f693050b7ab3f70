use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::StatsService;

// 懒加载的全局 STATS_SERVICE 实例
static STATS_SERVICE: Lazy<StatsService> = Lazy::new(StatsService::new_lazy);

pub async fn get_overview(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    STATS_SERVICE.get_overview(&req, &evaluation_id).await
}

pub async fn get_question_stats(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (evaluation_id, question_id) = path.into_inner();
    STATS_SERVICE
        .get_question_stats(&req, &evaluation_id, &question_id)
        .await
}

// 配置路由
pub fn configure_stats_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations/{evaluation_id}/stats")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(get_overview)))
            .service(
                web::resource("/questions/{question_id}").route(web::get().to(get_question_stats)),
            ),
    );
}
