//! 批量运行器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次批处理运行的资源准备与调度。
//!
//! ## 核心功能
//!
//! 1. **加载配方**：读取模板并写入本次运行的时间戳
//! 2. **准备日志目录**：分发开始前创建以时间戳命名的日志目录
//! 3. **遍历调度**：驱动扫描器，把每个命中交给分发器
//! 4. **失败汇总**：单个条目失败只记录，不中断批次
//! 5. **全局统计**：运行结束后输出 [`RunReport`]
//!
//! ## 设计特点
//!
//! - **严格顺序**：同一时刻最多一个 Worker 在运行
//! - **不重试**：扫描序列耗尽即视为运行完成
//! - **可取消**：取消信号会终止当前 Worker 并停止后续分发

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, WorkerError};
use crate::infrastructure::{CancelSignal, WorkerCommand};
use crate::models::recipe::LOGS_FOLDER_KEY;
use crate::models::{load_ignore_set, IgnoreSet, Recipe, RecipeStore, RunTimestamp};
use crate::orchestrator::run_report::{ItemFailure, RunReport};
use crate::services::{AssetTreeScanner, FailureWriter, JobDispatcher, RunLogDirectory};
use crate::utils::logging;

/// 编排器自身的日志文件名
pub const ORCHESTRATOR_LOG_NAME: &str = "orchestrator.log";

/// 批量运行器
pub struct BatchRunner {
    config: Config,
    timestamp: RunTimestamp,
    recipe: Recipe,
    ignore: IgnoreSet,
    log_dir: PathBuf,
    scanner: AssetTreeScanner,
    dispatcher: JobDispatcher,
    failure_writer: FailureWriter,
    cancel: CancelSignal,
}

impl BatchRunner {
    /// 初始化运行器
    ///
    /// 配置、配方、忽略列表或日志目录出错时直接返回错误，此时尚未启动任何 Worker
    pub async fn initialize(config: Config) -> AppResult<Self> {
        Self::initialize_at(config, RunTimestamp::now()).await
    }

    /// 以指定的运行时间戳初始化
    pub async fn initialize_at(config: Config, timestamp: RunTimestamp) -> AppResult<Self> {
        config.validate()?;
        logging::log_startup(&config);

        let mut recipe = RecipeStore::new(&config.recipe_path)
            .load_stamped(timestamp)
            .await?;

        let ignore = match &config.ignore_list_path {
            Some(path) => load_ignore_set(Path::new(path)).await?,
            None => IgnoreSet::default(),
        };

        let log_dir = RunLogDirectory::new(&config.logs_root).ensure(&timestamp)?;
        logging::init_log_file(&log_dir.join(ORCHESTRATOR_LOG_NAME), &timestamp)?;
        recipe.set(LOGS_FOLDER_KEY, log_dir.to_string_lossy().into_owned());
        info!("📁 运行日志目录: {}", log_dir.display());

        let cancel = CancelSignal::new();
        let command = WorkerCommand::blender(recipe.executable_path()?, &config.worker_script_path);
        let dispatcher = build_dispatcher(&config, command, &log_dir, &cancel);

        Ok(Self {
            scanner: AssetTreeScanner::new(config.material_marker.clone()),
            failure_writer: FailureWriter::new(&log_dir),
            config,
            timestamp,
            recipe,
            ignore,
            log_dir,
            dispatcher,
            cancel,
        })
    }

    /// 替换 Worker 调用模板（默认为 Blender 后台模式）
    pub fn with_worker_command(mut self, command: WorkerCommand) -> Self {
        self.dispatcher = build_dispatcher(&self.config, command, &self.log_dir, &self.cancel);
        self
    }

    /// 取消信号，触发后停止后续分发
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// 运行一次完整批处理
    pub async fn run(&self) -> AppResult<RunReport> {
        let root = self.recipe.scan_root()?;
        let filter = self.recipe.extension_filter()?;
        logging::log_scan_start(&root, filter, self.ignore.len());

        let mut report = RunReport::new(self.timestamp.to_string(), &self.log_dir);
        let mut scan = self.scanner.scan(&root, &self.ignore, filter)?;

        for scan_match in scan.by_ref() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            logging::log_dispatch_start(&scan_match);
            report.dispatched += 1;

            match self.dispatcher.dispatch(&self.recipe, &scan_match).await {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    let cancelled = matches!(e, WorkerError::Cancelled);
                    error!("{} ❌ 分发失败: {}", scan_match, e);
                    if let Err(write_err) = self.failure_writer.write(&scan_match, &e.to_string()) {
                        warn!("⚠️ 写入失败记录失败: {}", write_err);
                    }
                    report.failures.push(ItemFailure::new(&scan_match, &e));
                    if cancelled {
                        report.cancelled = true;
                        break;
                    }
                }
            }
        }

        report.anomalies = scan.anomalies().to_vec();
        logging::print_final_stats(&report);

        let orchestrator_log = self.log_dir.join(ORCHESTRATOR_LOG_NAME);
        if let Err(e) = logging::append_log(&orchestrator_log, &report.summary()) {
            warn!("⚠️ 写入运行汇总失败: {}", e);
        }

        Ok(report)
    }
}

fn build_dispatcher(
    config: &Config,
    command: WorkerCommand,
    log_dir: &Path,
    cancel: &CancelSignal,
) -> JobDispatcher {
    JobDispatcher::new(command)
        .with_timeout(config.worker_timeout())
        .with_output_capture(config.capture_worker_output.then(|| log_dir.to_path_buf()))
        .with_cancel_signal(cancel.clone())
}
