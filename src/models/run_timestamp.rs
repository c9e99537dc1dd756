use chrono::{DateTime, Utc};
use std::fmt::Display;

/// 运行时间戳格式（UTC，秒级精度），同时用作日志目录名
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H%M%SZ";

/// 一次批处理运行的时间戳
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTimestamp(DateTime<Utc>);

impl RunTimestamp {
    /// 当前 UTC 时间
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Display for RunTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(RUN_TIMESTAMP_FORMAT))
    }
}
