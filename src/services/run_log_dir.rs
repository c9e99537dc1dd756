use std::fs;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::models::RunTimestamp;

/// 运行日志目录
///
/// 每次运行在日志根目录下创建一个以时间戳命名的子目录，
/// 只创建不清理，保留策略交给外部运维
#[derive(Debug, Clone)]
pub struct RunLogDirectory {
    base_dir: PathBuf,
}

impl RunLogDirectory {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 确保本次运行的日志目录存在（幂等，会创建缺失的父目录）
    pub fn ensure(&self, timestamp: &RunTimestamp) -> AppResult<PathBuf> {
        self.ensure_named(&timestamp.to_string())
    }

    /// 按已格式化的时间戳创建目录
    pub fn ensure_named(&self, timestamp: &str) -> AppResult<PathBuf> {
        let path = self.base_dir.join(timestamp);
        fs::create_dir_all(&path).map_err(|source| AppError::create_dir_failed(&path, source))?;
        Ok(path)
    }
}
