use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::domain::redirect::{Audience, Navigator, RouteContext, canonical_route, redirect};
use crate::models::ApiResponse;
use crate::models::evaluations::requests::{RedirectAudience, RedirectParams};
use crate::models::evaluations::responses::RedirectResponse;
use crate::services::{current_user, internal_error, load_evaluation};

/// 记录跳转目标，由客户端执行实际导航
#[derive(Default)]
struct ResponseNavigator {
    href: Option<String>,
}

impl Navigator for ResponseNavigator {
    fn navigate(&mut self, href: &str) {
        self.href = Some(href.to_string());
    }
}

impl From<RedirectAudience> for Audience {
    fn from(audience: RedirectAudience) -> Self {
        match audience {
            RedirectAudience::Staff => Audience::Staff,
            RedirectAudience::Student => Audience::Student,
        }
    }
}

pub async fn resolve_redirect(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: &str,
    params: RedirectParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let evaluation = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    // 学生只能查看学生视角
    let audience = if user.is_staff() {
        Audience::from(params.audience)
    } else {
        Audience::Student
    };

    let registrations = match storage.list_registrations(evaluation_id).await {
        Ok(registrations) => registrations,
        Err(e) => return Ok(internal_error("Failed to get registration", e)),
    };
    let registered = registrations
        .iter()
        .any(|registration| registration.user_email == user.email);

    let ctx = RouteContext {
        evaluation_id: &evaluation.id,
        group_scope: &evaluation.group_scope,
        first_participant: registrations
            .first()
            .map(|registration| registration.user_email.as_str()),
        registered,
    };

    let mut navigator = ResponseNavigator::default();
    redirect(
        audience,
        Some(evaluation.phase),
        &params.current,
        &ctx,
        &mut navigator,
    );

    let response = RedirectResponse {
        phase: evaluation.phase,
        canonical: navigator
            .href
            .clone()
            .or_else(|| canonical_route(audience, evaluation.phase, &ctx)),
        redirect: navigator.href.is_some(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Redirect resolved successfully")))
}
