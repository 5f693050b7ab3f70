use serde::Serialize;
use ts_rs::TS;

use crate::models::answers::entities::StudentGrading;

/// 批量签署结果（逐条写入，不保证原子性）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct SignAllResponse {
    pub signed: u32,
    pub failed: u32,
}

/// 学生个人成绩中的一题
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct QuestionResult {
    pub question_id: String,
    pub order: u32,
    pub points: f64,
    pub grading: Option<StudentGrading>,
}

/// 学生个人成绩
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct ParticipantResultsResponse {
    pub user_email: String,
    pub obtained_points: f64,
    pub total_points: f64,
    pub questions: Vec<QuestionResult>,
}
