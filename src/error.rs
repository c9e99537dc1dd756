use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（配方模板、忽略列表、环境配置）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件系统错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// Worker 进程调用错误
    #[error("Worker错误: {0}")]
    Worker(#[from] WorkerError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件不存在
    #[error("配置文件不存在: {}", .path.display())]
    NotFound { path: PathBuf },
    /// 配方模板不是合法的 JSON
    #[error("配方解析失败 ({}): {source}", .path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// 忽略列表不是合法的 TOML
    #[error("忽略列表解析失败 ({}): {source}", .path.display())]
    IgnoreListParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 配方缺少必需字段
    #[error("配方缺少必需字段: {field}")]
    MissingField { field: String },
    /// 配方字段类型不正确
    #[error("配方字段 {field} 类型错误, 期望 {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
    /// 程序配置校验失败
    #[error("配置项 {name} 无效: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("创建目录失败 ({}): {source}", .path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 读取目录失败
    #[error("读取目录失败 ({}): {source}", .path.display())]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Worker 进程调用错误
///
/// 单个条目的失败只会被记录到运行报告中，不会中断整个批次
#[derive(Debug, Error)]
pub enum WorkerError {
    /// 无法启动进程（可执行文件不存在、权限不足等）
    #[error("无法启动 Worker ({executable}): {source}")]
    LaunchFailed {
        executable: String,
        #[source]
        source: std::io::Error,
    },
    /// 进程以非零状态码退出
    #[error("Worker 退出码 {code}{}", format_excerpt(.stderr_excerpt))]
    NonZeroExit { code: i32, stderr_excerpt: String },
    /// 进程被信号终止
    #[error("Worker 被信号终止{}", format_excerpt(.stderr_excerpt))]
    Terminated { stderr_excerpt: String },
    /// 超时被强制结束
    #[error("Worker 超时 ({:?}) 已被终止", .after)]
    TimedOut { after: Duration },
    /// 运行被取消
    #[error("运行已取消, Worker 已被终止")]
    Cancelled,
    /// 等待进程结束失败
    #[error("等待 Worker 结束失败: {source}")]
    WaitFailed {
        #[source]
        source: std::io::Error,
    },
    /// 配方序列化失败
    #[error("配方序列化失败: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },
}

fn format_excerpt(excerpt: &str) -> String {
    if excerpt.is_empty() {
        String::new()
    } else {
        format!(", stderr: {}", excerpt)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建配置校验错误
    pub fn invalid_config(name: &'static str, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::Invalid {
            name,
            reason: reason.into(),
        })
    }

    /// 创建目录创建错误
    pub fn create_dir_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::CreateDirFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
