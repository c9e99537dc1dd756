//! Worker 进程 - 基础设施层
//!
//! 唯一直接接触操作系统进程的地方，只暴露"用一段配方 JSON 跑一次 Worker"的能力

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

use crate::error::WorkerError;
use crate::infrastructure::CancelSignal;

/// Worker 调用模板
///
/// 进程参数为：固定前缀参数 + 序列化后的配方（最后一个位置参数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    executable: PathBuf,
    leading_args: Vec<String>,
}

impl WorkerCommand {
    pub fn new<I, S>(executable: impl Into<PathBuf>, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            executable: executable.into(),
            leading_args: leading_args.into_iter().map(Into::into).collect(),
        }
    }

    /// Blender 后台模式：`--background --python <script> -- <recipe>`
    pub fn blender(executable: impl Into<PathBuf>, script_path: impl AsRef<Path>) -> Self {
        Self::new(
            executable,
            [
                "--background".to_string(),
                "--python".to_string(),
                script_path.as_ref().to_string_lossy().into_owned(),
                "--".to_string(),
            ],
        )
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn leading_args(&self) -> &[String] {
        &self.leading_args
    }

    /// 启动一次 Worker 并等待结束
    ///
    /// 进程正常退出（无论退出码）返回 `Ok`；启动失败、超时、取消返回 `Err`。
    /// 超时或取消时子进程随 future 一起被丢弃并强制结束
    pub async fn run(
        &self,
        payload: &str,
        timeout: Option<Duration>,
        capture_output: bool,
        cancel: &CancelSignal,
    ) -> Result<WorkerOutput, WorkerError> {
        let mut command = Command::new(&self.executable);
        command
            .args(&self.leading_args)
            .arg(payload)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if capture_output {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let started = Instant::now();
        let child = command.spawn().map_err(|source| WorkerError::LaunchFailed {
            executable: self.executable.display().to_string(),
            source,
        })?;
        debug!("Worker 已启动: pid {:?}", child.id());

        let wait = child.wait_with_output();
        let bounded = async {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, wait)
                    .await
                    .map_err(|_| WorkerError::TimedOut { after: limit }),
                None => Ok(wait.await),
            }
        };

        let output = tokio::select! {
            waited = bounded => waited?.map_err(|source| WorkerError::WaitFailed { source })?,
            _ = cancel.cancelled() => return Err(WorkerError::Cancelled),
        };

        Ok(WorkerOutput {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
            elapsed: started.elapsed(),
        })
    }
}

/// 已结束的 Worker 进程
#[derive(Debug)]
pub struct WorkerOutput {
    pub status: ExitStatus,
    /// 仅在捕获输出时有内容
    pub stdout: Vec<u8>,
    /// 仅在捕获输出时有内容
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

/// stderr 摘录的最大字节数
pub const STDERR_EXCERPT_BYTES: usize = 2000;

impl WorkerOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// stderr 末尾摘录
    pub fn stderr_excerpt(&self) -> String {
        let start = self.stderr.len().saturating_sub(STDERR_EXCERPT_BYTES);
        String::from_utf8_lossy(&self.stderr[start..]).trim().to_string()
    }

    /// 将非零退出转换为错误
    pub fn into_result(self) -> Result<WorkerOutput, WorkerError> {
        if self.success() {
            return Ok(self);
        }
        let stderr_excerpt = self.stderr_excerpt();
        match self.status.code() {
            Some(code) => Err(WorkerError::NonZeroExit {
                code,
                stderr_excerpt,
            }),
            None => Err(WorkerError::Terminated { stderr_excerpt }),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> WorkerCommand {
        WorkerCommand::new("sh", ["-c", script, "worker"])
    }

    #[test]
    fn test_blender_argument_template() {
        let cmd = WorkerCommand::blender("/opt/blender", "worker/convert_asset.py");
        assert_eq!(
            cmd.leading_args(),
            ["--background", "--python", "worker/convert_asset.py", "--"]
        );
    }

    #[tokio::test]
    async fn test_payload_is_last_argument() {
        let output = sh("printf '%s' \"$1\"")
            .run("{\"a\":1}", None, true, &CancelSignal::new())
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, b"{\"a\":1}");
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr_excerpt() {
        let output = sh("echo broken >&2; exit 7")
            .run("{}", None, true, &CancelSignal::new())
            .await
            .unwrap();
        match output.into_result() {
            Err(WorkerError::NonZeroExit {
                code,
                stderr_excerpt,
            }) => {
                assert_eq!(code, 7);
                assert_eq!(stderr_excerpt, "broken");
            }
            other => panic!("期望非零退出, 实际: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_launch_failure() {
        let result = WorkerCommand::new("/definitely/not/a/worker", Vec::<String>::new())
            .run("{}", None, false, &CancelSignal::new())
            .await;
        assert!(matches!(result, Err(WorkerError::LaunchFailed { .. })));
    }

    #[tokio::test]
    async fn test_timeout_kills_hanging_worker() {
        let started = Instant::now();
        let result = sh("sleep 30")
            .run("{}", Some(Duration::from_millis(200)), false, &CancelSignal::new())
            .await;
        assert!(matches!(result, Err(WorkerError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_cancel_stops_running_worker() {
        let cancel = CancelSignal::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result = sh("sleep 30").run("{}", None, false, &cancel).await;
        assert!(matches!(result, Err(WorkerError::Cancelled)));
    }
}
