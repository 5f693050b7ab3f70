use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::answers::requests::UpdateGradingRequest;
use crate::models::users::entities::UserRole;
use crate::services::GradingService;
use crate::services::gradings::SignAction;

// 懒加载的全局 GRADING_SERVICE 实例
static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);

pub async fn update_grading(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    data: web::Json<UpdateGradingRequest>,
) -> ActixResult<HttpResponse> {
    let (evaluation_id, question_id, user_email) = path.into_inner();
    GRADING_SERVICE
        .update_grading(
            &req,
            &evaluation_id,
            &question_id,
            &user_email,
            data.into_inner(),
        )
        .await
}

async fn sign_with(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    action: SignAction,
) -> ActixResult<HttpResponse> {
    let (evaluation_id, question_id, user_email) = path.into_inner();
    GRADING_SERVICE
        .sign_grading(&req, &evaluation_id, &question_id, &user_email, action)
        .await
}

pub async fn sign_grading(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
) -> ActixResult<HttpResponse> {
    sign_with(req, path, SignAction::Sign).await
}

pub async fn unsign_grading(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
) -> ActixResult<HttpResponse> {
    sign_with(req, path, SignAction::Unsign).await
}

pub async fn toggle_grading(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
) -> ActixResult<HttpResponse> {
    sign_with(req, path, SignAction::Toggle).await
}

pub async fn sign_all_autograded(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .sign_all_autograded(&req, &evaluation_id)
        .await
}

// 配置路由（批改只对教师开放）
pub fn configure_gradings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations/{evaluation_id}/gradings")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/sign-all").route(web::post().to(sign_all_autograded)))
            .service(
                web::resource("/{question_id}/{user_email}")
                    .route(web::patch().to(update_grading)),
            )
            .service(
                web::resource("/{question_id}/{user_email}/sign")
                    .route(web::post().to(sign_grading))
                    .route(web::delete().to(unsign_grading)),
            )
            .service(
                web::resource("/{question_id}/{user_email}/toggle")
                    .route(web::post().to(toggle_grading)),
            ),
    );
}
