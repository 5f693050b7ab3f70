use serde::Deserialize;
use ts_rs::TS;

use crate::models::questions::entities::QuestionKind;

/// 向评测添加题目
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct AddQuestionRequest {
    pub title: String,
    pub content: Option<String>,
    pub kind: QuestionKind,
    pub points: f64,
}

/// 调整题目顺序（完整的题目 ID 排列）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct ReorderCompositionRequest {
    pub question_ids: Vec<String>,
}

/// 修改题目分值
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct UpdatePointsRequest {
    pub points: f64,
}

/// 把一道题移动到新位置（从 0 开始）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct MoveQuestionRequest {
    pub index: usize,
}
