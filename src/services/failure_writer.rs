//! 失败记录服务 - 业务能力层
//!
//! 只负责"把失败的条目追加写入 failures.txt"能力，不关心流程

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::ScanMatch;

/// 失败记录文件名
pub const FAILURES_FILE_NAME: &str = "failures.txt";

/// 失败记录服务
///
/// 职责：
/// - 将分发失败的条目写入运行日志目录下的 failures.txt
/// - 只处理单个条目
/// - 不决定是否继续批次
pub struct FailureWriter {
    failures_path: PathBuf,
}

impl FailureWriter {
    /// 在运行日志目录下创建
    pub fn new(log_dir: &Path) -> Self {
        Self {
            failures_path: log_dir.join(FAILURES_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.failures_path
    }

    /// 追加一条失败记录
    pub fn write(&self, scan_match: &ScanMatch, reason: &str) -> AppResult<()> {
        debug!("写入失败记录: {} | {}", scan_match, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.failures_path)
            .map_err(|source| AppError::write_failed(&self.failures_path, source))?;

        let line = format!(
            "条目 {} | 文件 {} | 原因: {}\n",
            scan_match.item.as_deref().unwrap_or("-"),
            scan_match.file_path().display(),
            reason
        );

        file.write_all(line.as_bytes())
            .map_err(|source| AppError::write_failed(&self.failures_path, source))?;

        Ok(())
    }
}
