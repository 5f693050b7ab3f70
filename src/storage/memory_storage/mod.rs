//! 内存存储实现
//!
//! 基于 DashMap 的进程内存储，重启后数据丢失。单条评测的组卷列表存放在同一个
//! 条目里，调整顺序时持有该条目的写锁，因此对调用方而言是原子的。

mod answers;
mod composition;
mod evaluations;
mod registrations;

use std::collections::BTreeMap;

use dashmap::DashMap;
use tracing::info;

use crate::errors::Result;
use crate::models::{
    answers::entities::StudentAnswer, evaluations::entities::Evaluation,
    questions::entities::Question, registrations::entities::UserOnEvaluation,
};

/// 组卷条目（不含题目内容）
#[derive(Debug, Clone)]
pub(crate) struct CompositionEntry {
    pub question_id: String,
    pub order: u32,
    pub points: f64,
}

/// 内存存储实现
#[derive(Default)]
pub struct MemoryStorage {
    pub(crate) evaluations: DashMap<String, Evaluation>,
    // evaluation_id -> 按 order 排序的组卷
    pub(crate) compositions: DashMap<String, Vec<CompositionEntry>>,
    // question_id -> 题目（不含作答）
    pub(crate) questions: DashMap<String, Question>,
    // question_id -> (user_email -> 作答)
    pub(crate) answers: DashMap<String, BTreeMap<String, StudentAnswer>>,
    // evaluation_id -> (user_email -> 报名记录)
    pub(crate) registrations: DashMap<String, BTreeMap<String, UserOnEvaluation>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建新的内存存储实例
    pub async fn new_async() -> Result<Self> {
        info!("内存存储初始化完成");
        Ok(Self::new())
    }
}

// Storage trait 实现
use crate::models::{
    answers::entities::StudentGrading, answers::requests::RecordRunResultsRequest,
    evaluations::requests::EvaluationListParams,
    questions::entities::EvaluationToQuestion,
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for MemoryStorage {
    // 评测模块
    async fn create_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation> {
        self.create_evaluation_impl(evaluation).await
    }

    async fn get_evaluation(&self, id: &str) -> Result<Option<Evaluation>> {
        self.get_evaluation_impl(id).await
    }

    async fn list_evaluations(&self, params: EvaluationListParams) -> Result<Vec<Evaluation>> {
        self.list_evaluations_impl(params).await
    }

    async fn update_evaluation(&self, evaluation: Evaluation) -> Result<Option<Evaluation>> {
        self.update_evaluation_impl(evaluation).await
    }

    async fn delete_evaluation(&self, id: &str) -> Result<bool> {
        self.delete_evaluation_impl(id).await
    }

    // 组卷模块
    async fn list_composition(&self, evaluation_id: &str) -> Result<Vec<EvaluationToQuestion>> {
        self.list_composition_impl(evaluation_id).await
    }

    async fn add_question(
        &self,
        evaluation_id: &str,
        question: Question,
        points: f64,
    ) -> Result<EvaluationToQuestion> {
        self.add_question_impl(evaluation_id, question, points).await
    }

    async fn save_composition_order(
        &self,
        evaluation_id: &str,
        order: Vec<(String, u32)>,
    ) -> Result<()> {
        self.save_composition_order_impl(evaluation_id, order).await
    }

    async fn update_question_points(
        &self,
        evaluation_id: &str,
        question_id: &str,
        points: f64,
    ) -> Result<Option<EvaluationToQuestion>> {
        self.update_question_points_impl(evaluation_id, question_id, points)
            .await
    }

    async fn remove_question(&self, evaluation_id: &str, question_id: &str) -> Result<bool> {
        self.remove_question_impl(evaluation_id, question_id).await
    }

    // 报名模块
    async fn register_participant(
        &self,
        registration: UserOnEvaluation,
    ) -> Result<UserOnEvaluation> {
        self.register_participant_impl(registration).await
    }

    async fn get_registration(
        &self,
        evaluation_id: &str,
        user_email: &str,
    ) -> Result<Option<UserOnEvaluation>> {
        self.get_registration_impl(evaluation_id, user_email).await
    }

    async fn list_registrations(&self, evaluation_id: &str) -> Result<Vec<UserOnEvaluation>> {
        self.list_registrations_impl(evaluation_id).await
    }

    async fn update_registration(
        &self,
        registration: UserOnEvaluation,
    ) -> Result<UserOnEvaluation> {
        self.update_registration_impl(registration).await
    }

    // 作答模块
    async fn upsert_answer(&self, question_id: &str, answer: StudentAnswer) -> Result<StudentAnswer> {
        self.upsert_answer_impl(question_id, answer).await
    }

    async fn insert_answer(&self, question_id: &str, answer: StudentAnswer) -> Result<bool> {
        self.insert_answer_impl(question_id, answer).await
    }

    async fn get_answer(
        &self,
        question_id: &str,
        user_email: &str,
    ) -> Result<Option<StudentAnswer>> {
        self.get_answer_impl(question_id, user_email).await
    }

    async fn update_grading(
        &self,
        question_id: &str,
        user_email: &str,
        grading: StudentGrading,
    ) -> Result<Option<StudentAnswer>> {
        self.update_grading_impl(question_id, user_email, grading)
            .await
    }

    async fn record_run_results(
        &self,
        question_id: &str,
        user_email: &str,
        results: RecordRunResultsRequest,
    ) -> Result<Option<StudentAnswer>> {
        self.record_run_results_impl(question_id, user_email, results)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::answers::entities::{GradingStatus, StudentAnswerStatus};
    use crate::models::evaluations::entities::{
        AccessMode, Evaluation, EvaluationSchedule, EvaluationStatus, Phase,
    };
    use crate::models::questions::entities::QuestionKind;
    use crate::models::registrations::entities::{UserOnEvaluation, UserOnEvaluationStatus};

    use super::*;

    fn evaluation(id: &str, scope: &str) -> Evaluation {
        let now = chrono::Utc::now();
        Evaluation {
            id: id.to_string(),
            group_scope: scope.to_string(),
            label: "Midterm".to_string(),
            conditions: None,
            phase: Phase::Composition,
            access_mode: AccessMode::LinkOnly,
            access_list: Vec::new(),
            schedule: EvaluationSchedule::default(),
            status: EvaluationStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            title: format!("Question {id}"),
            content: None,
            kind: QuestionKind::Essay,
            student_answer: Vec::new(),
        }
    }

    async fn seeded() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.create_evaluation(evaluation("ev1", "algo")).await.unwrap();
        for id in ["q1", "q2", "q3"] {
            storage.add_question("ev1", question(id), 2.0).await.unwrap();
        }
        storage
    }

    fn orders(links: &[crate::models::questions::entities::EvaluationToQuestion]) -> Vec<(String, u32)> {
        links
            .iter()
            .map(|link| (link.question_id.clone(), link.order))
            .collect()
    }

    #[tokio::test]
    async fn test_add_question_appends() {
        let storage = seeded().await;
        let links = storage.list_composition("ev1").await.unwrap();
        assert_eq!(
            orders(&links),
            vec![
                ("q1".to_string(), 0),
                ("q2".to_string(), 1),
                ("q3".to_string(), 2)
            ]
        );
        assert!(storage.add_question("missing", question("q9"), 1.0).await.is_err());
        assert!(storage.add_question("ev1", question("q1"), 1.0).await.is_err());
    }

    #[tokio::test]
    async fn test_save_order_and_remove_renumbers() {
        let storage = seeded().await;
        storage
            .save_composition_order(
                "ev1",
                vec![
                    ("q3".to_string(), 0),
                    ("q1".to_string(), 1),
                    ("q2".to_string(), 2),
                ],
            )
            .await
            .unwrap();
        assert!(
            storage
                .save_composition_order("ev1", vec![("q3".to_string(), 0)])
                .await
                .is_err()
        );
        for bad in [
            vec![("q3", 0), ("q1", 0), ("q2", 1)],
            vec![("q3", 0), ("q1", 1), ("q2", 5)],
            vec![("q3", 0), ("q1", 1), ("q1", 2)],
        ] {
            let bad = bad
                .into_iter()
                .map(|(id, order)| (id.to_string(), order))
                .collect();
            assert!(storage.save_composition_order("ev1", bad).await.is_err());
        }
        let links = storage.list_composition("ev1").await.unwrap();
        assert_eq!(
            orders(&links),
            vec![
                ("q3".to_string(), 0),
                ("q1".to_string(), 1),
                ("q2".to_string(), 2)
            ]
        );

        assert!(storage.remove_question("ev1", "q1").await.unwrap());
        let links = storage.list_composition("ev1").await.unwrap();
        assert_eq!(
            orders(&links),
            vec![("q3".to_string(), 0), ("q2".to_string(), 1)]
        );
        assert!(!storage.remove_question("ev1", "q1").await.unwrap());
    }

    #[tokio::test]
    async fn test_answers_are_nested_in_composition() {
        let storage = seeded().await;
        let answer = StudentAnswer {
            status: StudentAnswerStatus::Submitted,
            ..StudentAnswer::missing("bob@example.com")
        };
        storage.upsert_answer("q2", answer).await.unwrap();
        assert!(
            storage
                .upsert_answer("nope", StudentAnswer::missing("bob@example.com"))
                .await
                .is_err()
        );

        let grading = StudentGrading {
            points_obtained: 1.0,
            status: GradingStatus::Graded,
            ..StudentGrading::default()
        };
        let updated = storage
            .update_grading("q2", "bob@example.com", grading)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, StudentAnswerStatus::Submitted);
        assert!(
            storage
                .update_grading("q2", "alice@example.com", StudentGrading::default())
                .await
                .unwrap()
                .is_none()
        );

        let links = storage.list_composition("ev1").await.unwrap();
        assert_eq!(links[1].question.student_answer.len(), 1);
        assert_eq!(
            links[1].question.student_answer[0]
                .student_grading
                .as_ref()
                .map(|g| g.points_obtained),
            Some(1.0)
        );
    }

    #[tokio::test]
    async fn test_insert_answer_keeps_existing() {
        let storage = seeded().await;
        let submitted = StudentAnswer {
            status: StudentAnswerStatus::Submitted,
            ..StudentAnswer::missing("bob@example.com")
        };
        storage.upsert_answer("q1", submitted).await.unwrap();

        assert!(
            !storage
                .insert_answer("q1", StudentAnswer::missing("bob@example.com"))
                .await
                .unwrap()
        );
        assert!(
            storage
                .insert_answer("q1", StudentAnswer::missing("alice@example.com"))
                .await
                .unwrap()
        );
        let bob = storage.get_answer("q1", "bob@example.com").await.unwrap().unwrap();
        assert_eq!(bob.status, StudentAnswerStatus::Submitted);
    }

    #[tokio::test]
    async fn test_record_run_results_patches_payload() {
        use crate::models::answers::entities::AnswerPayload;

        let storage = seeded().await;
        let answer = StudentAnswer {
            status: StudentAnswerStatus::Submitted,
            payload: Some(AnswerPayload::Code {
                all_test_cases_passed: None,
            }),
            ..StudentAnswer::missing("bob@example.com")
        };
        storage.upsert_answer("q1", answer).await.unwrap();

        let results = RecordRunResultsRequest {
            all_test_cases_passed: Some(true),
            queries: Vec::new(),
        };
        let updated = storage
            .record_run_results("q1", "bob@example.com", results.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            updated.payload,
            Some(AnswerPayload::Code {
                all_test_cases_passed: Some(true)
            })
        );
        assert!(
            storage
                .record_run_results("q1", "alice@example.com", results.clone())
                .await
                .unwrap()
                .is_none()
        );

        storage
            .upsert_answer("q2", StudentAnswer::missing("bob@example.com"))
            .await
            .unwrap();
        assert!(
            storage
                .record_run_results("q2", "bob@example.com", results)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let storage = seeded().await;
        let registration = UserOnEvaluation {
            evaluation_id: "ev1".to_string(),
            user_email: "bob@example.com".to_string(),
            status: UserOnEvaluationStatus::InProgress,
            registered_at: chrono::Utc::now(),
            original_session_id: Some("s1".to_string()),
            has_session_changed: false,
            session_change_detected_at: None,
        };
        storage.register_participant(registration.clone()).await.unwrap();
        let again = storage
            .register_participant(UserOnEvaluation {
                original_session_id: Some("s2".to_string()),
                ..registration
            })
            .await
            .unwrap();
        assert_eq!(again.original_session_id.as_deref(), Some("s1"));
        assert_eq!(storage.list_registrations("ev1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_and_delete_evaluations() {
        let storage = seeded().await;
        storage.create_evaluation(evaluation("ev2", "db")).await.unwrap();

        let scoped = storage
            .list_evaluations(EvaluationListParams {
                group_scope: Some("db".to_string()),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].id, "ev2");

        assert!(storage.delete_evaluation("ev1").await.unwrap());
        assert!(storage.get_evaluation("ev1").await.unwrap().is_none());
        assert!(storage.list_composition("ev1").await.unwrap().is_empty());
        assert!(storage.get_answer("q1", "bob@example.com").await.unwrap().is_none());
        assert!(!storage.delete_evaluation("ev1").await.unwrap());
    }
}
