pub mod results;
pub mod run_results;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::answers::requests::{RecordRunResultsRequest, SubmitAnswerRequest};
use crate::storage::Storage;

pub struct AnswerService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnswerService {
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

    // 学生提交或保存作答
    pub async fn submit_answer(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        question_id: &str,
        data: SubmitAnswerRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_answer(self, request, evaluation_id, question_id, data).await
    }

    // 学生查看自己的成绩
    pub async fn get_my_results(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
    ) -> ActixResult<HttpResponse> {
        results::get_my_results(self, request, evaluation_id).await
    }

    // 执行器回写运行结果
    pub async fn record_run_results(
        &self,
        request: &HttpRequest,
        evaluation_id: &str,
        question_id: &str,
        user_email: &str,
        data: RecordRunResultsRequest,
    ) -> ActixResult<HttpResponse> {
        run_results::record_run_results(
            self,
            request,
            evaluation_id,
            question_id,
            user_email,
            data,
        )
        .await
    }
}
