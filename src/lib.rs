//! EvalSystem - 在线评测平台后端服务
//!
//! 基于 Actix Web 构建，负责评测的阶段流转、组卷、作答、批改签署与统计。
//!
//! # 架构
//! - `cache`: 缓存层（Moka）
//! - `config`: 配置管理
//! - `domain`: 阶段图、页面重定向、统计与批改规则（纯函数）
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（内存）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod domain;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
