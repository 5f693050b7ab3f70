//! 配置管理
//!
//! 配置来源优先级（从低到高）：`config.toml` < `config.{APP_ENV}.toml` <
//! `EVALSYSTEM_*` 环境变量 < 显式环境变量覆盖（`RUST_LOG`、`SERVER_PORT` 等）。

#[path = "impl.rs"]
mod loader;
mod structs;

pub use structs::*;
