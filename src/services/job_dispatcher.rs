//! 任务分发 - 业务能力层
//!
//! 对每个扫描命中：基于共享配方构造该条目的配方副本，序列化为 JSON，
//! 以其作为最后一个参数启动 Worker 并等待结束。同一时刻最多一个 Worker 在运行

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::WorkerError;
use crate::infrastructure::{CancelSignal, WorkerCommand, WorkerOutput};
use crate::models::{Recipe, ScanMatch};
use crate::utils::logging::truncate_text;

/// 单次分发成功的结果
#[derive(Debug)]
pub struct DispatchSuccess {
    pub elapsed: Duration,
    /// 捕获输出时对应的日志文件
    pub output_log: Option<PathBuf>,
}

/// 任务分发器
pub struct JobDispatcher {
    command: WorkerCommand,
    timeout: Option<Duration>,
    /// 捕获 Worker 输出时写入的目录；为 None 时继承当前进程的标准输出/错误
    capture_dir: Option<PathBuf>,
    cancel: CancelSignal,
}

impl JobDispatcher {
    pub fn new(command: WorkerCommand) -> Self {
        Self {
            command,
            timeout: None,
            capture_dir: None,
            cancel: CancelSignal::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_output_capture(mut self, capture_dir: Option<PathBuf>) -> Self {
        self.capture_dir = capture_dir;
        self
    }

    pub fn with_cancel_signal(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// 构造并序列化该条目的配方
    pub fn build_payload(&self, baseline: &Recipe, scan_match: &ScanMatch) -> Result<String, WorkerError> {
        baseline
            .with_item(scan_match.item.as_deref(), scan_match.directory())
            .to_json()
    }

    /// 分发一个扫描命中，阻塞直到 Worker 结束
    pub async fn dispatch(&self, baseline: &Recipe, scan_match: &ScanMatch) -> Result<DispatchSuccess, WorkerError> {
        let payload = self.build_payload(baseline, scan_match)?;
        debug!("{} 配方: {}", scan_match, truncate_text(&payload, 300));

        let output = self
            .command
            .run(
                &payload,
                self.timeout,
                self.capture_dir.is_some(),
                &self.cancel,
            )
            .await?;

        let output_log = self.save_output(scan_match, &output);
        let elapsed = output.elapsed;
        output.into_result()?;

        info!("{} ✓ Worker 完成, 耗时 {:.1}s", scan_match, elapsed.as_secs_f64());
        Ok(DispatchSuccess { elapsed, output_log })
    }

    /// 把捕获的输出写入日志目录；写入失败只记录警告
    fn save_output(&self, scan_match: &ScanMatch, output: &WorkerOutput) -> Option<PathBuf> {
        let dir = self.capture_dir.as_deref()?;
        let path = dir.join(output_log_name(scan_match));

        let mut content = Vec::with_capacity(output.stdout.len() + output.stderr.len() + 64);
        content.extend_from_slice(format!("# status: {}\n# stdout\n", output.status).as_bytes());
        content.extend_from_slice(&output.stdout);
        content.extend_from_slice(b"\n# stderr\n");
        content.extend_from_slice(&output.stderr);

        match std::fs::write(&path, content) {
            Ok(()) => Some(path),
            Err(e) => {
                warn!("⚠️ 无法写入 Worker 输出 {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// `<序号>_<条目>_<文件名>.log`，路径分隔符等字符替换为下划线
fn output_log_name(scan_match: &ScanMatch) -> String {
    let raw = format!(
        "{:04}_{}_{}",
        scan_match.ordinal,
        scan_match.item.as_deref().unwrap_or("none"),
        scan_match.file_name
    );
    let sanitized: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    format!("{}.log", sanitized)
}
