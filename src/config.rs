use std::time::Duration;

use crate::error::{AppError, AppResult};

/// 程序配置
///
/// 作业级别的参数（Worker 路径、扫描根目录、扩展名过滤）来自配方模板，
/// 这里只保存编排器自身的运行参数
#[derive(Clone, Debug)]
pub struct Config {
    /// 配方模板（JSON）路径
    pub recipe_path: String,
    /// 忽略列表（TOML）路径，未设置时不忽略任何条目
    pub ignore_list_path: Option<String>,
    /// 运行日志根目录
    pub logs_root: String,
    /// Worker 入口脚本路径
    pub worker_script_path: String,
    /// 材质子目录标记（路径包含该子串时跳过匹配）
    pub material_marker: String,
    /// 单个 Worker 的超时秒数，0 或未设置表示不限制
    pub worker_timeout_secs: Option<u64>,
    /// 是否捕获 Worker 的标准输出/错误并写入运行日志目录
    pub capture_worker_output: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipe_path: "recipe.json".to_string(),
            ignore_list_path: None,
            logs_root: "logs".to_string(),
            worker_script_path: "worker/convert_asset.py".to_string(),
            material_marker: "Material".to_string(),
            worker_timeout_secs: None,
            capture_worker_output: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            recipe_path: std::env::var("RECIPE_PATH").unwrap_or(default.recipe_path),
            ignore_list_path: std::env::var("IGNORE_LIST_PATH").ok().or(default.ignore_list_path),
            logs_root: std::env::var("LOGS_ROOT").unwrap_or(default.logs_root),
            worker_script_path: std::env::var("WORKER_SCRIPT_PATH").unwrap_or(default.worker_script_path),
            material_marker: std::env::var("MATERIAL_MARKER").unwrap_or(default.material_marker),
            worker_timeout_secs: std::env::var("WORKER_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).or(default.worker_timeout_secs),
            capture_worker_output: std::env::var("CAPTURE_WORKER_OUTPUT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.capture_worker_output),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        let required = [
            ("recipe_path", &self.recipe_path),
            ("logs_root", &self.logs_root),
            ("worker_script_path", &self.worker_script_path),
            ("material_marker", &self.material_marker),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::invalid_config(name, "不能为空"));
            }
        }
        Ok(())
    }

    /// Worker 超时时间
    pub fn worker_timeout(&self) -> Option<Duration> {
        self.worker_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
