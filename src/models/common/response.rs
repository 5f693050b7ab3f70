use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::EvalSystemError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 将领域错误映射为 HTTP 响应
pub fn error_response(err: &EvalSystemError) -> HttpResponse {
    let (status, code) = match err {
        EvalSystemError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
        EvalSystemError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        EvalSystemError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        EvalSystemError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        EvalSystemError::AccessDenied(_) => (StatusCode::FORBIDDEN, ErrorCode::AccessDenied),
        EvalSystemError::PhaseTransition(_) => {
            (StatusCode::CONFLICT, ErrorCode::PhaseTransitionInvalid)
        }
        EvalSystemError::CompositionLocked(_) => {
            (StatusCode::CONFLICT, ErrorCode::CompositionLocked)
        }
        EvalSystemError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        EvalSystemError::CacheConnection(_)
        | EvalSystemError::CachePluginNotFound(_)
        | EvalSystemError::StorageOperation(_)
        | EvalSystemError::Serialization(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    };
    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
}
