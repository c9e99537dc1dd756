//! 配方（Recipe）
//!
//! 一次运行共享的作业基线配置，加载一次后只读使用；
//! 每个条目通过 [`Recipe::with_item`] 得到独立的副本，避免条目之间互相污染

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

use crate::error::{AppResult, ConfigError, WorkerError};
use crate::models::RunTimestamp;

/// Worker 可执行文件路径
pub const EXECUTABLE_KEY: &str = "blender_executable_path";
/// 扫描根目录
pub const SCAN_ROOT_KEY: &str = "characters_folder_file_path";
/// 输出目录
pub const DESTINATION_KEY: &str = "destination_folder";
/// 文件名过滤子串
pub const EXTENSION_FILTER_KEY: &str = "file_extension_search";
/// 运行时间戳
pub const TIMESTAMP_KEY: &str = "timestamp";
/// 运行日志目录
pub const LOGS_FOLDER_KEY: &str = "logs_folder";
/// 当前条目名称（每次分发覆盖）
pub const ITEM_KEY: &str = "character_name";
/// 当前源目录（每次分发覆盖）
pub const SOURCE_FOLDER_KEY: &str = "source_folder";

/// 配方模板中必须存在的字符串字段
pub const REQUIRED_FIELDS: [&str; 4] = [
    EXECUTABLE_KEY,
    SCAN_ROOT_KEY,
    DESTINATION_KEY,
    EXTENSION_FILTER_KEY,
];

/// 配方文档
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe {
    fields: Map<String, JsonValue>,
}

impl Recipe {
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// 写入字段，已存在时覆盖
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// 读取必需的字符串字段
    pub fn require_str(&self, key: &str) -> Result<&str, ConfigError> {
        match self.fields.get(key) {
            None | Some(JsonValue::Null) => Err(ConfigError::MissingField {
                field: key.to_string(),
            }),
            Some(JsonValue::String(value)) => Ok(value.as_str()),
            Some(_) => Err(ConfigError::InvalidField {
                field: key.to_string(),
                expected: "string",
            }),
        }
    }

    /// 校验模板中的必需字段
    pub fn validate(&self) -> AppResult<()> {
        for field in REQUIRED_FIELDS {
            self.require_str(field)?;
        }
        Ok(())
    }

    pub fn executable_path(&self) -> AppResult<PathBuf> {
        Ok(PathBuf::from(self.require_str(EXECUTABLE_KEY)?))
    }

    pub fn scan_root(&self) -> AppResult<PathBuf> {
        Ok(PathBuf::from(self.require_str(SCAN_ROOT_KEY)?))
    }

    pub fn extension_filter(&self) -> AppResult<&str> {
        Ok(self.require_str(EXTENSION_FILTER_KEY)?)
    }

    pub fn stamp(&mut self, timestamp: RunTimestamp) {
        self.set(TIMESTAMP_KEY, timestamp.to_string());
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.fields.get(TIMESTAMP_KEY).and_then(|v| v.as_str())
    }

    /// 基于基线构造单个条目的配方
    ///
    /// 只覆盖当前条目名称与当前源目录两个字段；没有条目上下文时写入 null
    pub fn with_item(&self, item: Option<&str>, source_folder: &Path) -> Recipe {
        let mut recipe = self.clone();
        recipe.set(
            ITEM_KEY,
            item.map_or(JsonValue::Null, JsonValue::from),
        );
        recipe.set(
            SOURCE_FOLDER_KEY,
            source_folder.to_string_lossy().into_owned(),
        );
        recipe
    }

    /// 序列化为传给 Worker 的 JSON 文本
    pub fn to_json(&self) -> Result<String, WorkerError> {
        serde_json::to_string(&self.fields).map_err(|source| WorkerError::SerializeFailed { source })
    }
}
