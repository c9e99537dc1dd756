use crate::error::{AppResult, ConfigError, FileError};
use crate::models::{Recipe, RunTimestamp};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// 配方存储
///
/// 从模板文件加载配方并写入本次运行的时间戳，不关心任何具体条目
#[derive(Debug, Clone)]
pub struct RecipeStore {
    template_path: PathBuf,
}

impl RecipeStore {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    /// 加载配方并写入当前 UTC 时间戳
    pub async fn load(&self) -> AppResult<Recipe> {
        self.load_stamped(RunTimestamp::now()).await
    }

    /// 加载配方并写入指定时间戳（覆盖模板中已有的时间戳）
    pub async fn load_stamped(&self, timestamp: RunTimestamp) -> AppResult<Recipe> {
        let path = &self.template_path;
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::NotFound { path: path.clone() }.into());
            }
            Err(source) => {
                return Err(FileError::ReadFailed {
                    path: path.clone(),
                    source,
                }
                .into());
            }
        };

        let mut recipe: Recipe = serde_json::from_str(&content).map_err(|source| {
            ConfigError::ParseFailed {
                path: path.clone(),
                source,
            }
        })?;
        recipe.validate()?;
        recipe.stamp(timestamp);

        tracing::info!(
            "✓ 已加载配方: {} (时间戳 {})",
            path.display(),
            timestamp
        );

        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::{TimeZone, Utc};

    const TEMPLATE: &str = r#"{
        "blender_executable_path": "/opt/blender/blender",
        "characters_folder_file_path": "/data/characters",
        "destination_folder": "/data/out",
        "file_extension_search": ".fbx",
        "timestamp": "from-template"
    }"#;

    #[tokio::test]
    async fn test_load_overwrites_template_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipe.json");
        std::fs::write(&path, TEMPLATE).unwrap();

        let at = RunTimestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let recipe = RecipeStore::new(&path).load_stamped(at).await.unwrap();

        assert_eq!(recipe.timestamp(), Some("2024-01-02T030405Z"));
        assert_eq!(recipe.extension_filter().unwrap(), ".fbx");
    }

    #[tokio::test]
    async fn test_load_missing_template_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = RecipeStore::new(dir.path().join("absent.json")).load().await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_load_malformed_template_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipe.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = RecipeStore::new(&path).load().await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_template_without_required_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipe.json");
        std::fs::write(&path, r#"{ "blender_executable_path": "blender" }"#).unwrap();

        let result = RecipeStore::new(&path).load().await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingField { .. }))
        ));
    }
}
