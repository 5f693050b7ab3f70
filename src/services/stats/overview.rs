use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::StatsService;
use crate::cache::{get_json, insert_json};
use crate::config::AppConfig;
use crate::domain::stats::evaluation_overview;
use crate::models::ApiResponse;
use crate::models::stats::responses::EvaluationOverview;
use crate::services::{get_cache, internal_error, load_evaluation, overview_cache_key};

pub async fn get_overview(
    service: &StatsService,
    request: &HttpRequest,
    evaluation_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = get_cache(request);
    let cache_key = overview_cache_key(evaluation_id);

    if let Some(cache) = &cache
        && let Some(overview) = get_json::<EvaluationOverview>(cache.as_ref(), &cache_key).await
    {
        debug!("Overview cache hit for evaluation {}", evaluation_id);
        return Ok(HttpResponse::Ok().json(ApiResponse::success(overview, "Overview retrieved successfully")));
    }

    let evaluation = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    let links = match storage.list_composition(evaluation_id).await {
        Ok(links) => links,
        Err(e) => return Ok(internal_error("Failed to get composition", e)),
    };

    let participants: Vec<String> = match storage.list_registrations(evaluation_id).await {
        Ok(registrations) => registrations
            .into_iter()
            .map(|registration| registration.user_email)
            .collect(),
        Err(e) => return Ok(internal_error("Failed to list participants", e)),
    };

    let overview = evaluation_overview(&evaluation.id, evaluation.phase, &links, &participants);

    if let Some(cache) = &cache {
        insert_json(
            cache.as_ref(),
            &cache_key,
            &overview,
            AppConfig::get().cache.default_ttl,
        )
        .await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(overview, "Overview retrieved successfully")))
}
