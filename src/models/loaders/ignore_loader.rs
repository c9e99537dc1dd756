use crate::error::{AppResult, ConfigError, FileError};
use crate::models::IgnoreSet;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// 忽略列表文件格式
///
/// ```toml
/// ignore = ["Barbara", "Paimon"]
/// ```
#[derive(Debug, Deserialize)]
struct IgnoreListFile {
    #[serde(default)]
    ignore: Vec<String>,
}

/// 从 TOML 文件加载忽略列表
pub async fn load_ignore_set(path: &Path) -> AppResult<IgnoreSet> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        Err(source) => {
            return Err(FileError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }
            .into());
        }
    };

    let parsed: IgnoreListFile =
        toml::from_str(&content).map_err(|source| ConfigError::IgnoreListParseFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let set = IgnoreSet::new(parsed.ignore);
    tracing::info!("✓ 已加载忽略列表: {} 个条目", set.len());
    Ok(set)
}
