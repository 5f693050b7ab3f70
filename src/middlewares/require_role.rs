/*!
 * 基于角色的访问控制中间件
 *
 * 必须放在 RequireJWT 之内（actix 中后注册的 wrap 先执行），从请求扩展中读取 `CurrentUser`。
 *
 * ## 使用方法
 *
 * 整个子资源只对教师开放：
 *
 * ```rust,ignore
 * web::scope("/api/v1/evaluations/{evaluation_id}/gradings")
 *     .wrap(RequireRole::new_any(UserRole::staff_roles()))
 *     .wrap(RequireJWT)
 *     .service(web::resource("/sign-all").route(web::post().to(sign_all_autograded)))
 * ```
 *
 * 同一作用域下按路由区分角色：
 *
 * ```rust,ignore
 * web::scope("/api/v1/evaluations/{evaluation_id}/answers")
 *     .wrap(RequireJWT)
 *     .service(web::resource("/{question_id}").route(
 *         web::put()
 *             .to(submit_answer)
 *             .wrap(RequireRole::new(&UserRole::Student)),
 *     ))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{CurrentUser, UserRole},
};

use super::create_error_response;

/// 允许访问的角色集合，用户角色属于其中之一即可通过
#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    /// 只允许单一角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: Rc::from([role.clone()]),
        }
    }

    /// 允许任一角色，例如 `UserRole::staff_roles()`
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|role| (*role).clone()).collect(),
        }
    }

    fn permits(&self, user: &CurrentUser) -> bool {
        self.allowed.contains(&user.role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    policy: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let current_user = req.extensions().get::<CurrentUser>().cloned();

            let (status, code, message) = match current_user {
                Some(user) if policy.permits(&user) => {
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
                Some(user) => {
                    info!(
                        "Access denied for {} with role {}, allowed: {:?}",
                        user.email,
                        user.role,
                        policy.allowed
                    );
                    (StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied.")
                }
                // RequireJWT 没有先执行
                None => (
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Authentication required",
                ),
            };

            Ok(req.into_response(
                create_error_response(status, code, message).map_into_right_body(),
            ))
        })
    }
}
