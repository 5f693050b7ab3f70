//! 组卷存储操作

use std::collections::HashMap;

use super::{CompositionEntry, MemoryStorage};
use crate::domain::composition::renumber;
use crate::errors::{EvalSystemError, Result};
use crate::models::questions::entities::{EvaluationToQuestion, Question};

impl MemoryStorage {
    fn link_for(&self, evaluation_id: &str, entry: &CompositionEntry) -> Option<EvaluationToQuestion> {
        let mut question = self.questions.get(&entry.question_id)?.value().clone();
        question.student_answer = self
            .answers
            .get(&entry.question_id)
            .map(|answers| answers.values().cloned().collect())
            .unwrap_or_default();

        Some(EvaluationToQuestion {
            evaluation_id: evaluation_id.to_string(),
            question_id: entry.question_id.clone(),
            order: entry.order,
            points: entry.points,
            question,
        })
    }

    /// 按顺序列出组卷
    pub async fn list_composition_impl(
        &self,
        evaluation_id: &str,
    ) -> Result<Vec<EvaluationToQuestion>> {
        // 先复制条目再读取题目，避免同时持有多个分片锁
        let entries = self
            .compositions
            .get(evaluation_id)
            .map(|entries| entries.value().clone())
            .unwrap_or_default();

        Ok(entries
            .iter()
            .filter_map(|entry| self.link_for(evaluation_id, entry))
            .collect())
    }

    /// 追加题目
    pub async fn add_question_impl(
        &self,
        evaluation_id: &str,
        mut question: Question,
        points: f64,
    ) -> Result<EvaluationToQuestion> {
        if self.questions.contains_key(&question.id) {
            return Err(EvalSystemError::conflict(format!(
                "题目已存在: {}",
                question.id
            )));
        }
        question.student_answer.clear();

        let entry = {
            let mut entries = self.compositions.get_mut(evaluation_id).ok_or_else(|| {
                EvalSystemError::not_found(format!("评测不存在: {evaluation_id}"))
            })?;
            let entry = CompositionEntry {
                question_id: question.id.clone(),
                order: entries.len() as u32,
                points,
            };
            entries.push(entry.clone());
            entry
        };

        let link = EvaluationToQuestion {
            evaluation_id: evaluation_id.to_string(),
            question_id: entry.question_id,
            order: entry.order,
            points: entry.points,
            question: question.clone(),
        };
        self.questions.insert(question.id.clone(), question);
        Ok(link)
    }

    /// 写入新顺序，必须覆盖全部题目
    pub async fn save_composition_order_impl(
        &self,
        evaluation_id: &str,
        order: Vec<(String, u32)>,
    ) -> Result<()> {
        let mut entries = self.compositions.get_mut(evaluation_id).ok_or_else(|| {
            EvalSystemError::not_found(format!("评测不存在: {evaluation_id}"))
        })?;

        let new_orders: HashMap<&str, u32> = order
            .iter()
            .map(|(question_id, order)| (question_id.as_str(), *order))
            .collect();
        if order.len() != entries.len()
            || new_orders.len() != entries.len()
            || entries
                .iter()
                .any(|entry| !new_orders.contains_key(entry.question_id.as_str()))
        {
            return Err(EvalSystemError::validation("题目顺序必须包含全部题目"));
        }
        let mut orders: Vec<u32> = new_orders.values().copied().collect();
        orders.sort_unstable();
        if orders.iter().zip(0u32..).any(|(order, expected)| *order != expected) {
            return Err(EvalSystemError::validation("题目顺序必须为 0..N-1 的连续编号"));
        }

        for entry in entries.iter_mut() {
            if let Some(order) = new_orders.get(entry.question_id.as_str()) {
                entry.order = *order;
            }
        }
        entries.sort_by_key(|entry| entry.order);
        Ok(())
    }

    /// 修改分值
    pub async fn update_question_points_impl(
        &self,
        evaluation_id: &str,
        question_id: &str,
        points: f64,
    ) -> Result<Option<EvaluationToQuestion>> {
        let updated = {
            let Some(mut entries) = self.compositions.get_mut(evaluation_id) else {
                return Ok(None);
            };
            let Some(entry) = entries
                .iter_mut()
                .find(|entry| entry.question_id == question_id)
            else {
                return Ok(None);
            };
            entry.points = points;
            entry.clone()
        };
        Ok(self.link_for(evaluation_id, &updated))
    }

    /// 移除题目并重新编号
    pub async fn remove_question_impl(&self, evaluation_id: &str, question_id: &str) -> Result<bool> {
        {
            let Some(mut entries) = self.compositions.get_mut(evaluation_id) else {
                return Ok(false);
            };
            let before = entries.len();
            entries.retain(|entry| entry.question_id != question_id);
            if entries.len() == before {
                return Ok(false);
            }

            let ids: Vec<String> = entries.iter().map(|e| e.question_id.clone()).collect();
            for (entry, (_, order)) in entries.iter_mut().zip(renumber(&ids)) {
                entry.order = order;
            }
        }

        self.questions.remove(question_id);
        self.answers.remove(question_id);
        Ok(true)
    }
}
