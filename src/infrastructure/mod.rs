pub mod cancel;
pub mod worker_process;

pub use cancel::CancelSignal;
pub use worker_process::{WorkerCommand, WorkerOutput};
