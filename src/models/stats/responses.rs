use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::evaluations::entities::Phase;

/// 计数及其占参与人数的百分比
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct StatCount {
    pub count: u32,
    pub percentage: u32,
}

/// 批改进度计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct GradingStats {
    pub total_gradings: u32,
    pub total_signed: u32,
    pub total_autograded_unsigned: u32,
}

/// 选择题单个选项的统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct OptionStat {
    pub option_id: String,
    pub text: String,
    pub chosen: u32,
    pub percentage: u32,
}

/// 数据库题单条查询的通过情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct QueryStat {
    pub order: u32,
    pub title: Option<String>,
    pub passed: StatCount,
    pub failed: StatCount,
}

/// 按题型区分的统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub enum TypeSpecificStats {
    TrueFalse {
        true_answers: StatCount,
        false_answers: StatCount,
    },
    MultipleChoice {
        options: Vec<OptionStat>,
    },
    Essay {
        submitted: StatCount,
        missing: StatCount,
    },
    Code {
        success: StatCount,
        failure: StatCount,
        no_runs: StatCount,
    },
    Web {
        submitted: StatCount,
        missing: StatCount,
    },
    Database {
        test_queries: Vec<QueryStat>,
        lint_queries: Vec<QueryStat>,
    },
}

/// 单题统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct QuestionStats {
    pub question_id: String,
    pub total_participants: u32,
    pub breakdown: TypeSpecificStats,
}

/// 概览中的单题行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct QuestionOverviewRow {
    pub question_id: String,
    pub order: u32,
    pub title: String,
    pub question_type: String,
    pub points: f64,
    pub success_rate: u32,
    pub submitted: StatCount,
    pub stats: QuestionStats,
}

/// 概览中的参与者行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct ParticipantOverviewRow {
    pub user_email: String,
    pub obtained_points: f64,
    pub total_points: f64,
    pub submission_rate: u32,
}

/// 评测统计概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct EvaluationOverview {
    pub evaluation_id: String,
    pub phase: Phase,
    pub total_points: f64,
    pub signed_success_rate: u32,
    pub grading: GradingStats,
    pub questions: Vec<QuestionOverviewRow>,
    pub participants: Vec<ParticipantOverviewRow>,
}
