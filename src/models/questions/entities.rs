use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::answers::entities::StudentAnswer;

/// 选择题选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

/// 数据库题中的一条查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct DatabaseQuery {
    // 在题目中的顺序（从 1 开始）
    pub order: u32,
    pub title: Option<String>,
    // 该查询的输出是否参与测试比对
    pub test_query: bool,
    // 是否启用 SQL lint
    pub lint_active: bool,
}

/// 题目类型及其专属数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum QuestionKind {
    TrueFalse { is_true: bool },
    MultipleChoice { options: Vec<QuestionOption> },
    Essay,
    Code { language: Option<String> },
    Web,
    Database { queries: Vec<DatabaseQuery> },
}

impl QuestionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::TrueFalse { .. } => "trueFalse",
            QuestionKind::MultipleChoice { .. } => "multipleChoice",
            QuestionKind::Essay => "essay",
            QuestionKind::Code { .. } => "code",
            QuestionKind::Web => "web",
            QuestionKind::Database { .. } => "database",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub kind: QuestionKind,
    // 每位参与者至多一条作答
    #[serde(default)]
    pub student_answer: Vec<StudentAnswer>,
}

/// 评测与题目的组卷关系
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct EvaluationToQuestion {
    pub evaluation_id: String,
    pub question_id: String,
    // 0..N-1 连续且唯一
    pub order: u32,
    // 分值（正数）
    pub points: f64,
    pub question: Question,
}
