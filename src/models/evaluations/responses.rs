use serde::Serialize;
use ts_rs::TS;

use crate::models::evaluations::entities::{Evaluation, Phase};

/// 评测列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
}

/// 阶段信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct PhaseInfoResponse {
    pub phase: Phase,
    pub label: String,
    pub menu_key: String,
    pub next_phase: Option<Phase>,
    pub next_action_label: Option<String>,
    pub composition_locked: bool,
}

/// 页面重定向结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct RedirectResponse {
    pub phase: Phase,
    // 阶段对应的规范页面，未配置页面的阶段为 None
    pub canonical: Option<String>,
    pub redirect: bool,
}
