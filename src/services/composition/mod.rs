pub mod add;
pub mod list;
pub mod order;
pub mod points;
pub mod remove;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::questions::requests::{
    AddQuestionRequest, MoveQuestionRequest, ReorderCompositionRequest, UpdatePointsRequest,
};
use crate::storage::Storage;

pub struct CompositionService {
    storage: Option<Arc<dyn Storage>>,
}

impl CompositionService {
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

    pub async fn list_composition(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
    ) -> ActixResult<HttpResponse> {
        list::list_composition(self, request, evaluation_id).await
    }

    // 追加题目到组卷末尾
    pub async fn add_question(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        data: AddQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        add::add_question(self, request, evaluation_id, data).await
    }

    pub async fn reorder_composition(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        data: ReorderCompositionRequest,
    ) -> ActixResult<HttpResponse> {
        order::reorder_composition(self, request, evaluation_id, data).await
    }

    pub async fn move_question(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        question_id: &str,
        data: MoveQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        order::move_question(self, request, evaluation_id, question_id, data).await
    }

    pub async fn update_points(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        question_id: &str,
        data: UpdatePointsRequest,
    ) -> ActixResult<HttpResponse> {
        points::update_points(self, request, evaluation_id, question_id, data).await
    }

    pub async fn remove_question(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        question_id: &str,
    ) -> ActixResult<HttpResponse> {
        remove::remove_question(self, request, evaluation_id, question_id).await
    }
}
