use chrono::Utc;
use std::time::Duration;
use tracing::info;
use tracing::Level;

/// Installs the fmt subscriber; a second call is a no-op
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// One line per filter run, in access-log style
pub fn log_filter_run(query: &str, total: usize, matched: usize, elapsed: Duration) {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    info!(
        target: "filter_log",
        "{} \"{}\" {}/{} {}ms",
        timestamp,
        query,
        matched,
        total,
        elapsed.as_millis()
    );
}
