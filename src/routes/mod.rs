pub mod answers;

pub mod composition;

pub mod evaluations;

pub mod gradings;

pub mod registrations;

pub mod stats;

pub use answers::configure_answers_routes;
pub use composition::configure_composition_routes;
pub use evaluations::configure_evaluations_routes;
pub use gradings::configure_gradings_routes;
pub use registrations::configure_registrations_routes;
pub use stats::configure_stats_routes;

use actix_web::web;

/// 注册全部 API 路由
///
/// 子资源的 scope 必须先于 `/api/v1/evaluations` 注册，否则会被前缀匹配吞掉。
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    configure_composition_routes(cfg);
    configure_registrations_routes(cfg);
    configure_answers_routes(cfg);
    configure_gradings_routes(cfg);
    configure_stats_routes(cfg);
    configure_evaluations_routes(cfg);
}
