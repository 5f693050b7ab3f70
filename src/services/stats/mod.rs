pub mod overview;
pub mod question;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct StatsService {
    storage: Option<Arc<dyn Storage>>,
}

impl StatsService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 评测统计概览（带缓存）
    pub async fn get_overview(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
    ) -> ActixResult<HttpResponse> {
        overview::get_overview(self, request, evaluation_id).await
    }

    pub async fn get_question_stats(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        question_id: &str,
    ) -> ActixResult<HttpResponse> {
        question::get_question_stats(self, request, evaluation_id, question_id).await
    }
}
