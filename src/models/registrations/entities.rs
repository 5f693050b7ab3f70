use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 参与状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub enum UserOnEvaluationStatus {
    InProgress,
    Finished,
}

/// 学生在评测中的报名记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub struct UserOnEvaluation {
    pub evaluation_id: String,
    pub user_email: String,
    pub status: UserOnEvaluationStatus,
    pub registered_at: DateTime<Utc>,
    // 首次加入时的会话标识
    pub original_session_id: Option<String>,
    pub has_session_changed: bool,
    pub session_change_detected_at: Option<DateTime<Utc>>,
}
