pub mod asset_scanner;
pub mod failure_writer;
pub mod job_dispatcher;
pub mod run_log_dir;

pub use asset_scanner::{AssetScan, AssetTreeScanner, ScanAnomaly};
pub use failure_writer::FailureWriter;
pub use job_dispatcher::{DispatchSuccess, JobDispatcher};
pub use run_log_dir::RunLogDirectory;
