pub mod join;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::registrations::requests::JoinEvaluationRequest;
use crate::storage::Storage;

pub struct RegistrationService {
    storage: Option<Arc<dyn Storage>>,
}

impl RegistrationService {
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

    // 学生加入评测
    pub async fn join_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        data: JoinEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        join::join_evaluation(self, request, evaluation_id, data).await
    }

    pub async fn list_participants(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
    ) -> ActixResult<HttpResponse> {
        list::list_participants(self, request, evaluation_id).await
    }
}
