//! 报名存储操作

use super::MemoryStorage;
use crate::errors::{EvalSystemError, Result};
use crate::models::registrations::entities::UserOnEvaluation;

impl MemoryStorage {
    /// 报名，已报名时返回已有记录
    pub async fn register_participant_impl(
        &self,
        registration: UserOnEvaluation,
    ) -> Result<UserOnEvaluation> {
        let mut registrations = self
            .registrations
            .entry(registration.evaluation_id.clone())
            .or_default();
        let stored = registrations
            .entry(registration.user_email.clone())
            .or_insert(registration);
        Ok(stored.clone())
    }

    pub async fn get_registration_impl(
        &self,
        evaluation_id: &str,
        user_email: &str,
    ) -> Result<Option<UserOnEvaluation>> {
        Ok(self
            .registrations
            .get(evaluation_id)
            .and_then(|registrations| registrations.get(user_email).cloned()))
    }

    /// 按报名时间排序列出
    pub async fn list_registrations_impl(
        &self,
        evaluation_id: &str,
    ) -> Result<Vec<UserOnEvaluation>> {
        let mut items: Vec<UserOnEvaluation> = self
            .registrations
            .get(evaluation_id)
            .map(|registrations| registrations.values().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.user_email.cmp(&b.user_email))
        });
        Ok(items)
    }

    pub async fn update_registration_impl(
        &self,
        registration: UserOnEvaluation,
    ) -> Result<UserOnEvaluation> {
        let mut registrations = self
            .registrations
            .get_mut(&registration.evaluation_id)
            .ok_or_else(|| EvalSystemError::not_found("报名记录不存在"))?;
        let stored = registrations
            .get_mut(&registration.user_email)
            .ok_or_else(|| EvalSystemError::not_found("报名记录不存在"))?;
        *stored = registration.clone();
        Ok(registration)
    }
}
