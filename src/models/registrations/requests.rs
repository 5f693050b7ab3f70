use serde::Deserialize;
use ts_rs::TS;

/// 加入评测请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub struct JoinEvaluationRequest {
    pub session_id: Option<String>,
}
