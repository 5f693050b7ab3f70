//! 评测存储操作

use super::MemoryStorage;
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::{entities::Evaluation, requests::EvaluationListParams};

impl MemoryStorage {
    /// 创建评测
    pub async fn create_evaluation_impl(&self, evaluation: Evaluation) -> Result<Evaluation> {
        if self.evaluations.contains_key(&evaluation.id) {
            return Err(EvalSystemError::conflict(format!(
                "评测已存在: {}",
                evaluation.id
            )));
        }
        self.evaluations
            .insert(evaluation.id.clone(), evaluation.clone());
        self.compositions.insert(evaluation.id.clone(), Vec::new());
        Ok(evaluation)
    }

    /// 通过 ID 获取评测
    pub async fn get_evaluation_impl(&self, id: &str) -> Result<Option<Evaluation>> {
        Ok(self.evaluations.get(id).map(|entry| entry.value().clone()))
    }

    /// 列出评测
    pub async fn list_evaluations_impl(
        &self,
        params: EvaluationListParams,
    ) -> Result<Vec<Evaluation>> {
        let mut items: Vec<Evaluation> = self
            .evaluations
            .iter()
            .filter(|entry| {
                params
                    .group_scope
                    .as_ref()
                    .is_none_or(|scope| &entry.group_scope == scope)
            })
            .filter(|entry| params.status.is_none_or(|status| entry.status == status))
            .map(|entry| entry.value().clone())
            .collect();

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    /// 写回评测
    pub async fn update_evaluation_impl(&self, evaluation: Evaluation) -> Result<Option<Evaluation>> {
        match self.evaluations.get_mut(&evaluation.id) {
            Some(mut entry) => {
                *entry = evaluation.clone();
                Ok(Some(evaluation))
            }
            None => Ok(None),
        }
    }

    /// 删除评测及其组卷、题目、作答和报名
    pub async fn delete_evaluation_impl(&self, id: &str) -> Result<bool> {
        if self.evaluations.remove(id).is_none() {
            return Ok(false);
        }

        if let Some((_, entries)) = self.compositions.remove(id) {
            for entry in entries {
                self.questions.remove(&entry.question_id);
                self.answers.remove(&entry.question_id);
            }
        }
        self.registrations.remove(id);
        Ok(true)
    }
}
