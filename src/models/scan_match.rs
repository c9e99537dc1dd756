use std::fmt::Display;
use std::path::{Path, PathBuf};

/// 扫描命中
///
/// "这个目录下的这个文件需要处理"，由扫描器产生后立即交给分发器，不做持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMatch {
    /// 在本次遍历中的序号（从 0 开始）
    pub ordinal: usize,
    /// 文件所在目录
    pub directory: PathBuf,
    /// 文件名
    pub file_name: String,
    /// 当前条目上下文
    pub item: Option<String>,
}

impl ScanMatch {
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Display for ScanMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[#{} 条目 {} 文件 {}]",
            self.ordinal + 1,
            self.item.as_deref().unwrap_or("-"),
            self.file_path().display()
        )
    }
}
