use anyhow::Result;
use asset_batch_runner::utils::logging;
use asset_batch_runner::{BatchRunner, Config};
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化运行器
    let runner = BatchRunner::initialize(config).await?;

    // Ctrl-C 终止当前 Worker 并停止后续分发
    let cancel = runner.cancel_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⛔ 收到中断信号，正在取消运行...");
            cancel.cancel();
        }
    });

    let report = runner.run().await?;

    if let Some(reason) = report.exit_reason() {
        anyhow::bail!(reason);
    }

    Ok(())
}
