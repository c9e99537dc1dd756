//! # Asset Batch Runner
//!
//! 按配方模板批量调用外部 Worker 处理资产目录的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（操作系统进程），只暴露能力
//! - `WorkerCommand` - 启动 Worker、等待结束、超时与取消
//! - `CancelSignal` - 运行级取消信号
//!
//! ### ② 数据层（Models）
//! - `Recipe` - 一次运行共享的配方基线，按条目生成独立副本
//! - `IgnoreSet` / `ScanMatch` / `RunTimestamp`
//! - `loaders/` - 配方模板（JSON）与忽略列表（TOML）加载
//!
//! ### ③ 业务能力层（Services）
//! - `AssetTreeScanner` - 带排除规则的深度优先遍历
//! - `JobDispatcher` - 构造条目配方并分发给 Worker
//! - `RunLogDirectory` - 时间戳日志目录
//! - `FailureWriter` - 写 failures.txt 能力
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - 批量运行器，管理资源和顺序调度
//! - `orchestrator/run_report` - 运行报告
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{CancelSignal, WorkerCommand};
pub use models::{IgnoreSet, Recipe, RecipeStore, ScanMatch};
pub use orchestrator::{BatchRunner, RunReport};
pub use services::{AssetTreeScanner, JobDispatcher, RunLogDirectory};
