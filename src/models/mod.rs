pub mod answers;
pub mod common;
pub mod evaluations;
pub mod questions;
pub mod registrations;
pub mod stats;
pub mod users;

pub use common::response::ApiResponse;

use serde::Serialize;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 评测相关
    EvaluationNotFound = 2001,
    EvaluationArchived = 2002,
    PhaseTransitionInvalid = 2003,
    CompositionLocked = 2004,

    // 题目与作答
    QuestionNotFound = 3001,
    AnswerNotFound = 3002,
    AnswerNotAllowed = 3003,

    // 报名
    ParticipantNotFound = 4001,
    AccessDenied = 4002,

    // 批改
    GradingNotFound = 5001,
}
