use serde::Deserialize;
use ts_rs::TS;

use crate::models::answers::entities::{AnswerPayload, LintStatus, StudentAnswerStatus};

/// 学生提交作答
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct SubmitAnswerRequest {
    pub payload: AnswerPayload,
    // 缺省为 SUBMITTED；前端自动保存时传 IN_PROGRESS
    pub status: Option<StudentAnswerStatus>,
}

/// 教师修改批改结果
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct UpdateGradingRequest {
    pub points_obtained: Option<f64>,
    pub comment: Option<String>,
}

/// 数据库题单条查询的运行结果
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct QueryRunResult {
    pub order: u32,
    pub test_passed: Option<bool>,
    pub lint_result: Option<LintStatus>,
}

/// 代码执行器回写运行结果，学生提交中的同名字段会被忽略
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct RecordRunResultsRequest {
    pub all_test_cases_passed: Option<bool>,
    #[serde(default)]
    pub queries: Vec<QueryRunResult>,
}
