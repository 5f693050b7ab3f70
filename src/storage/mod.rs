use std::sync::Arc;

use crate::models::{
    answers::{
        entities::{StudentAnswer, StudentGrading},
        requests::RecordRunResultsRequest,
    },
    evaluations::{entities::Evaluation, requests::EvaluationListParams},
    questions::entities::{EvaluationToQuestion, Question},
    registrations::entities::UserOnEvaluation,
};

use crate::errors::Result;

pub mod memory_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 评测管理方法
    // 创建评测
    async fn create_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation>;
    // 通过ID获取评测
    async fn get_evaluation(&self, id: &str) -> Result<Option<Evaluation>>;
    // 列出评测（按创建时间倒序）
    async fn list_evaluations(&self, params: EvaluationListParams) -> Result<Vec<Evaluation>>;
    // 整体写回评测
    async fn update_evaluation(&self, evaluation: Evaluation) -> Result<Option<Evaluation>>;
    // 删除评测，级联删除组卷、作答与报名
    async fn delete_evaluation(&self, id: &str) -> Result<bool>;

    /// 组卷方法
    // 按顺序列出组卷，题目中带有全部作答
    async fn list_composition(&self, evaluation_id: &str) -> Result<Vec<EvaluationToQuestion>>;
    // 追加题目到末尾
    async fn add_question(
        &self,
        evaluation_id: &str,
        question: Question,
        points: f64,
    ) -> Result<EvaluationToQuestion>;
    // 一次性写入全部题目的新顺序
    async fn save_composition_order(
        &self,
        evaluation_id: &str,
        order: Vec<(String, u32)>,
    ) -> Result<()>;
    // 修改分值
    async fn update_question_points(
        &self,
        evaluation_id: &str,
        question_id: &str,
        points: f64,
    ) -> Result<Option<EvaluationToQuestion>>;
    // 移除题目，剩余题目重新编号
    async fn remove_question(&self, evaluation_id: &str, question_id: &str) -> Result<bool>;

    /// 报名方法
    async fn register_participant(&self, registration: UserOnEvaluation)
    -> Result<UserOnEvaluation>;
    async fn get_registration(
        &self,
        evaluation_id: &str,
        user_email: &str,
    ) -> Result<Option<UserOnEvaluation>>;
    // 按报名时间排序
    async fn list_registrations(&self, evaluation_id: &str) -> Result<Vec<UserOnEvaluation>>;
    async fn update_registration(&self, registration: UserOnEvaluation)
    -> Result<UserOnEvaluation>;

    /// 作答与批改方法
    // 新增或覆盖作答
    async fn upsert_answer(&self, question_id: &str, answer: StudentAnswer)
    -> Result<StudentAnswer>;
    // 仅在该用户没有作答时写入，返回是否写入
    async fn insert_answer(&self, question_id: &str, answer: StudentAnswer) -> Result<bool>;
    async fn get_answer(&self, question_id: &str, user_email: &str)
    -> Result<Option<StudentAnswer>>;
    // 只写入批改，不改动作答内容
    async fn update_grading(
        &self,
        question_id: &str,
        user_email: &str,
        grading: StudentGrading,
    ) -> Result<Option<StudentAnswer>>;
    // 在原作答上写入运行结果
    async fn record_run_results(
        &self,
        question_id: &str,
        user_email: &str,
        results: RecordRunResultsRequest,
    ) -> Result<Option<StudentAnswer>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = memory_storage::MemoryStorage::new_async().await?;
    Ok(Arc::new(storage))
}
