pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod phase;
pub mod redirect;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::evaluations::requests::{
    CreateEvaluationRequest, EvaluationListParams, PhaseInfoParams, PhaseTransitionRequest,
    RedirectParams, UpdateEvaluationRequest,
};
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
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

    // 获取评测列表
    pub async fn list_evaluations(
        &self,
        request: &HttpRequest,
        params: EvaluationListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluations(self, request, params).await
    }

    pub async fn create_evaluation(
        &self,
        request: &HttpRequest,
        data: CreateEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_evaluation(self, request, data).await
    }

    pub async fn get_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
    ) -> ActixResult<HttpResponse> {
        detail::get_evaluation(self, request, evaluation_id).await
    }

    pub async fn update_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        data: UpdateEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_evaluation(self, request, evaluation_id, data).await
    }

    pub async fn archive_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
    ) -> ActixResult<HttpResponse> {
        delete::archive_evaluation(self, request, evaluation_id).await
    }

    pub async fn delete_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
    ) -> ActixResult<HttpResponse> {
        delete::delete_evaluation(self, request, evaluation_id).await
    }

    // 推进到下一阶段
    pub async fn transition_phase(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        data: PhaseTransitionRequest,
    ) -> ActixResult<HttpResponse> {
        phase::transition_phase(self, request, evaluation_id, data).await
    }

    pub async fn get_phase_info(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        params: PhaseInfoParams,
    ) -> ActixResult<HttpResponse> {
        phase::get_phase_info(self, request, evaluation_id, params).await
    }

    // 计算当前页面是否需要跳转
    pub async fn resolve_redirect(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        params: RedirectParams,
    ) -> ActixResult<HttpResponse> {
        redirect::resolve_redirect(self, request, evaluation_id, params).await
    }
}
