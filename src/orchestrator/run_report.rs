use std::fmt::Display;
use std::path::PathBuf;

use crate::models::ScanMatch;
use crate::services::ScanAnomaly;

/// 单个失败条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub ordinal: usize,
    pub item: Option<String>,
    pub file: PathBuf,
    pub error: String,
}

impl ItemFailure {
    pub fn new(scan_match: &ScanMatch, error: impl Display) -> Self {
        Self {
            ordinal: scan_match.ordinal,
            item: scan_match.item.clone(),
            file: scan_match.file_path(),
            error: error.to_string(),
        }
    }
}

impl Display for ItemFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} [{}] {}: {}",
            self.ordinal + 1,
            self.item.as_deref().unwrap_or("-"),
            self.file.display(),
            self.error
        )
    }
}

/// 运行报告
///
/// 单个条目失败不会中断批次，所有结果汇总在这里，运行结束后统一输出
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// 本次运行时间戳
    pub timestamp: String,
    /// 本次运行日志目录
    pub log_dir: PathBuf,
    /// 已分发数量
    pub dispatched: usize,
    /// 成功数量
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
    pub anomalies: Vec<ScanAnomaly>,
    /// 是否被取消（取消后剩余命中不再分发）
    pub cancelled: bool,
}

impl RunReport {
    pub fn new(timestamp: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            timestamp: timestamp.into(),
            log_dir: log_dir.into(),
            ..Default::default()
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// 进程应以非零状态退出时的原因
    ///
    /// 取消优先：被取消时正在运行的条目也记为失败，但退出原因是取消
    pub fn exit_reason(&self) -> Option<String> {
        if self.cancelled {
            return Some(format!(
                "运行已取消（已分发 {}，失败 {}），详见 {}",
                self.dispatched,
                self.failed(),
                self.log_dir.display()
            ));
        }
        if self.has_failures() {
            return Some(format!(
                "{} 个条目处理失败，详见 {}",
                self.failed(),
                self.log_dir.display()
            ));
        }
        None
    }

    /// 写入运行日志文件的汇总文本
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{}\n运行 {} 汇总\n已分发: {}\n成功: {}\n失败: {}\n遍历异常: {}\n已取消: {}\n",
            "=".repeat(60),
            self.timestamp,
            self.dispatched,
            self.succeeded,
            self.failed(),
            self.anomalies.len(),
            if self.cancelled { "是" } else { "否" }
        );
        for failure in &self.failures {
            text.push_str(&format!("  - {}\n", failure));
        }
        for anomaly in &self.anomalies {
            text.push_str(&format!(
                "  ! {}: {}\n",
                anomaly
                    .path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                anomaly.message
            ));
        }
        text
    }
}
