use serde::Deserialize;
use ts_rs::TS;

use crate::models::evaluations::entities::{AccessMode, EvaluationStatus, Phase};

/// 创建评测请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CreateEvaluationRequest {
    pub label: String,
    pub group_scope: Option<String>,
    pub conditions: Option<String>,
}

/// 更新评测设置请求（SETTINGS 及之后均可修改，字段均可选）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct UpdateEvaluationRequest {
    pub label: Option<String>,
    pub conditions: Option<String>,
    pub access_mode: Option<AccessMode>,
    pub access_list: Option<Vec<String>>,
    pub duration_active: Option<bool>,
    pub duration_hours: Option<u32>,
    pub duration_mins: Option<u32>,
}

/// 阶段切换请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct PhaseTransitionRequest {
    pub phase: Phase,
}

/// 评测列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListParams {
    pub group_scope: Option<String>,
    pub status: Option<EvaluationStatus>,
}

/// 页面视角
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum RedirectAudience {
    Staff,
    Student,
}

/// 页面重定向查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct RedirectParams {
    pub audience: RedirectAudience,
    // 当前页面路径（可包含查询字符串）
    pub current: String,
}

/// 阶段序列
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum PhaseGraphKind {
    #[default]
    Evaluation,
    JamSession,
}

/// 阶段信息查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct PhaseInfoParams {
    pub graph: Option<PhaseGraphKind>,
}
