use std::sync::OnceLock;

use log::debug;
use tokio::runtime::Runtime;

use crate::error::{ForgeError, Result};

static GLOBAL_RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn build_runtime() -> std::io::Result<Runtime> {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2);
    let threads = std::cmp::max(threads, 2);
    debug!("Initializing global runtime with {} threads", threads);
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(threads)
        .enable_all()
        .build()
}

/// The runtime that drives core futures for callers without their own executor.
pub fn global_runtime() -> Result<&'static Runtime> {
    if let Some(runtime) = GLOBAL_RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = build_runtime()
        .map_err(|e| ForgeError::Runtime(e.to_string()))?;
    // A concurrent caller may have won the race; its runtime is kept and ours dropped.
    Ok(GLOBAL_RUNTIME.get_or_init(|| runtime))
}
