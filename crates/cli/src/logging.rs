use anyhow::{anyhow, Result};
use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

/// Installs the global subscriber, writing to `log_file` if any, stderr otherwise.
///
/// The returned guard must be kept alive until exit for the file logs to be flushed.
pub fn init(max_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let max_level = max_level.parse().unwrap_or(tracing::Level::WARN);

    let Some(log_path) = log_file else {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(max_level)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(None);
    };

    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("no file name in {log_path:?}"))?;

    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Some(guard))
}
