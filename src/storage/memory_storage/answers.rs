//! 作答与批改存储操作

use super::MemoryStorage;
use crate::errors::{EvalSystemError, Result};
use crate::models::answers::entities::{StudentAnswer, StudentGrading};
use crate::models::answers::requests::RecordRunResultsRequest;

impl MemoryStorage {
    /// 新增或覆盖作答
    pub async fn upsert_answer_impl(
        &self,
        question_id: &str,
        answer: StudentAnswer,
    ) -> Result<StudentAnswer> {
        if !self.questions.contains_key(question_id) {
            return Err(EvalSystemError::not_found(format!(
                "题目不存在: {question_id}"
            )));
        }
        self.answers
            .entry(question_id.to_string())
            .or_default()
            .insert(answer.user_email.clone(), answer.clone());
        Ok(answer)
    }

    /// 已有作答时不写入
    pub async fn insert_answer_impl(&self, question_id: &str, answer: StudentAnswer) -> Result<bool> {
        if !self.questions.contains_key(question_id) {
            return Err(EvalSystemError::not_found(format!(
                "题目不存在: {question_id}"
            )));
        }
        let mut answers = self.answers.entry(question_id.to_string()).or_default();
        if answers.contains_key(&answer.user_email) {
            return Ok(false);
        }
        answers.insert(answer.user_email.clone(), answer);
        Ok(true)
    }

    pub async fn get_answer_impl(
        &self,
        question_id: &str,
        user_email: &str,
    ) -> Result<Option<StudentAnswer>> {
        Ok(self
            .answers
            .get(question_id)
            .and_then(|answers| answers.get(user_email).cloned()))
    }

    /// 只替换批改部分
    pub async fn update_grading_impl(
        &self,
        question_id: &str,
        user_email: &str,
        grading: StudentGrading,
    ) -> Result<Option<StudentAnswer>> {
        let Some(mut answers) = self.answers.get_mut(question_id) else {
            return Ok(None);
        };
        Ok(answers.get_mut(user_email).map(|answer| {
            answer.student_grading = Some(grading);
            answer.clone()
        }))
    }

    /// 持有写锁修改作答内容中的运行结果
    pub async fn record_run_results_impl(
        &self,
        question_id: &str,
        user_email: &str,
        results: RecordRunResultsRequest,
    ) -> Result<Option<StudentAnswer>> {
        let Some(mut answers) = self.answers.get_mut(question_id) else {
            return Ok(None);
        };
        let Some(answer) = answers.get_mut(user_email) else {
            return Ok(None);
        };
        let Some(payload) = answer.payload.as_mut() else {
            return Err(EvalSystemError::validation("作答没有内容"));
        };
        if !payload.apply_run_results(&results) {
            return Err(EvalSystemError::validation("该题型没有运行结果"));
        }
        Ok(Some(answer.clone()))
    }
}
