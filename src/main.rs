// File: src/main.rs
use anyhow::Result;
use remedix::paths::AppPaths;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns stdout, so logs go to a file instead.
    if let Some(log_path) = AppPaths::get_log_path()
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
    {
        let filter = EnvFilter::try_from_env("REMEDIX_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }

    remedix::tui::run().await
}
