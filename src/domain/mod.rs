//! 评测核心规则：阶段、重定向、统计、批改、组卷与访问控制，均为纯函数

pub mod access;
pub mod autograde;
pub mod composition;
pub mod grading;
pub mod phase;
pub mod redirect;
pub mod stats;
