use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::questions::requests::{
    AddQuestionRequest, MoveQuestionRequest, ReorderCompositionRequest, UpdatePointsRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CompositionService;

// 懒加载的全局 COMPOSITION_SERVICE 实例
static COMPOSITION_SERVICE: Lazy<CompositionService> = Lazy::new(CompositionService::new_lazy);

pub async fn list_composition(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    COMPOSITION_SERVICE
        .list_composition(&req, &evaluation_id)
        .await
}

pub async fn add_question(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
    data: web::Json<AddQuestionRequest>,
) -> ActixResult<HttpResponse> {
    COMPOSITION_SERVICE
        .add_question(&req, &evaluation_id, data.into_inner())
        .await
}

pub async fn reorder_composition(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
    data: web::Json<ReorderCompositionRequest>,
) -> ActixResult<HttpResponse> {
    COMPOSITION_SERVICE
        .reorder_composition(&req, &evaluation_id, data.into_inner())
        .await
}

pub async fn move_question(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    data: web::Json<MoveQuestionRequest>,
) -> ActixResult<HttpResponse> {
    let (evaluation_id, question_id) = path.into_inner();
    COMPOSITION_SERVICE
        .move_question(&req, &evaluation_id, &question_id, data.into_inner())
        .await
}

pub async fn update_points(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    data: web::Json<UpdatePointsRequest>,
) -> ActixResult<HttpResponse> {
    let (evaluation_id, question_id) = path.into_inner();
    COMPOSITION_SERVICE
        .update_points(&req, &evaluation_id, &question_id, data.into_inner())
        .await
}

pub async fn remove_question(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (evaluation_id, question_id) = path.into_inner();
    COMPOSITION_SERVICE
        .remove_question(&req, &evaluation_id, &question_id)
        .await
}

// 配置路由（组卷只对教师开放）
pub fn configure_composition_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations/{evaluation_id}/composition")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_composition))
                    .route(web::post().to(add_question)),
            )
            .service(web::resource("/order").route(web::put().to(reorder_composition)))
            .service(web::resource("/{question_id}").route(web::delete().to(remove_question)))
            .service(web::resource("/{question_id}/points").route(web::put().to(update_points)))
            .service(web::resource("/{question_id}/position").route(web::put().to(move_question))),
    );
}
