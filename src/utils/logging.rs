/// 日志工具模块
///
/// 提供日志初始化、运行日志文件和格式化输出的辅助函数
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{RunTimestamp, ScanMatch};
use crate::orchestrator::RunReport;

/// 初始化 tracing 订阅者
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 初始化运行日志文件
///
/// 同一秒内启动的运行共用一个日志目录，因此表头以追加方式写入，
/// 已有的内容（上一次运行的表头与汇总）保持不变
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `timestamp`: 本次运行时间戳
pub fn init_log_file(log_file_path: &Path, timestamp: &RunTimestamp) -> AppResult<()> {
    if log_file_path.exists() {
        warn!(
            "⚠️ 日志文件已存在（同一秒内的另一次运行），追加写入: {}",
            log_file_path.display()
        );
    }
    let log_header = format!(
        "{}\n批量资产处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        timestamp,
        "=".repeat(60)
    );
    append_log(log_file_path, &log_header)
}

/// 追加写入运行日志文件
pub fn append_log(log_file_path: &Path, text: &str) -> AppResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|source| AppError::write_failed(log_file_path, source))?;
    file.write_all(text.as_bytes())
        .map_err(|source| AppError::write_failed(log_file_path, source))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量资产处理模式（顺序分发）");
    info!("📄 配方模板: {}", config.recipe_path);
    info!("📁 日志根目录: {}", config.logs_root);
    match config.worker_timeout() {
        Some(limit) => info!("⏱️ Worker 超时: {:?}", limit),
        None => info!("⏱️ Worker 超时: 不限制"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录扫描开始信息
pub fn log_scan_start(root: &Path, filter: &str, ignored: usize) {
    info!("\n📁 正在扫描: {}", root.display());
    info!("🔍 文件名过滤: \"{}\" | 忽略条目: {} 个", filter, ignored);
}

/// 记录单次分发开始
pub fn log_dispatch_start(scan_match: &ScanMatch) {
    info!("{}", "─".repeat(60));
    info!("📦 开始分发 {}", scan_match);
}

/// 打印最终统计信息
pub fn print_final_stats(report: &RunReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.succeeded, report.dispatched);
    info!("❌ 失败: {}", report.failed());
    for failure in &report.failures {
        warn!("   - {}", failure);
    }
    if !report.anomalies.is_empty() {
        warn!("⚠️ 遍历异常: {}", report.anomalies.len());
    }
    if report.cancelled {
        warn!("⛔ 运行已被取消，剩余条目未处理");
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", report.log_dir.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
