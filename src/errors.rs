//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_evalsystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EvalSystemError {
            $($variant(String),)*
        }

        impl EvalSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EvalSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EvalSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EvalSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EvalSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EvalSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_evalsystem_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    StorageOperation("E003", "Storage Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Serialization("E006", "Serialization Error"),
    Authentication("E007", "Authentication Error"),
    Authorization("E008", "Authorization Error"),
    PhaseTransition("E009", "Phase Transition Error"),
    CompositionLocked("E010", "Composition Locked"),
    AccessDenied("E011", "Access Denied"),
    Conflict("E012", "Conflict"),
}

impl EvalSystemError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EvalSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EvalSystemError {}

// 为常见的错误类型实现 From trait
impl From<serde_json::Error> for EvalSystemError {
    fn from(err: serde_json::Error) -> Self {
        EvalSystemError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for EvalSystemError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        EvalSystemError::Authentication(err.to_string())
    }
}

impl From<crate::domain::phase::PhaseTransitionError> for EvalSystemError {
    fn from(err: crate::domain::phase::PhaseTransitionError) -> Self {
        EvalSystemError::PhaseTransition(err.to_string())
    }
}

impl From<crate::domain::composition::CompositionError> for EvalSystemError {
    fn from(err: crate::domain::composition::CompositionError) -> Self {
        match err {
            crate::domain::composition::CompositionError::Locked(_) => {
                EvalSystemError::CompositionLocked(err.to_string())
            }
            _ => EvalSystemError::Validation(err.to_string()),
        }
    }
}

impl From<crate::domain::access::AccessError> for EvalSystemError {
    fn from(err: crate::domain::access::AccessError) -> Self {
        EvalSystemError::AccessDenied(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvalSystemError>;
