//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次批处理运行的资源管理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_runner` - 批量运行器
//! - 加载配方、忽略列表，创建运行日志目录
//! - 驱动扫描器，顺序分发每个命中
//! - 收集失败条目，输出全局统计
//!
//! ### `run_report` - 运行报告
//! - 汇总分发 / 成功 / 失败 / 遍历异常
//!
//! ## 层次关系
//!
//! ```text
//! batch_runner (处理整棵目录树)
//!     ↓
//! services::AssetTreeScanner (产出 ScanMatch)
//!     ↓
//! services::JobDispatcher (处理单个 ScanMatch)
//!     ↓
//! infrastructure (基础设施：WorkerCommand)
//! ```

pub mod batch_runner;
pub mod run_report;

// 重新导出主要类型
pub use batch_runner::BatchRunner;
pub use run_report::{ItemFailure, RunReport};
