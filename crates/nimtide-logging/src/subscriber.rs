// ABOUTME: Tracing subscriber initialization and layer composition
// ABOUTME: Combines console and rolling-file layers with level filtering

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the level filter for the given configuration.
pub fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::new(format!("{}", config.level.0));

    for (module, level) in &config.module_levels {
        filter = filter.add_directive(format!("{}={}", module, level.0).parse()?);
    }

    Ok(filter)
}

/// Initialize the global tracing subscriber with the given configuration.
pub fn init_subscriber(config: LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

    let env_filter = create_env_filter(&config).context("Failed to create environment filter")?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match (&config.file, config.console) {
        (Some(path), console) => {
            let file_writer = file_writer_for(path)?;

            if console {
                registry
                    .with(fmt::layer().with_target(true).with_writer(std::io::stdout))
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_thread_ids(true)
                            .with_file(true)
                            .with_line_number(true)
                            .with_writer(file_writer),
                    )
                    .try_init()?;
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_thread_ids(true)
                            .with_file(true)
                            .with_line_number(true)
                            .with_writer(file_writer),
                    )
                    .try_init()?;
            }
        }
        (None, _) => {
            registry.with(fmt::layer().with_target(true)).try_init()?;
        }
    }

    tracing::info!(
        log_level = %config.level.0,
        console_output = config.console,
        file_path = ?config.file,
        "Nimtide logging initialized"
    );

    Ok(())
}

/// Non-blocking daily-rolling writer for the given log file path.
fn file_writer_for(path: &Path) -> Result<tracing_appender::non_blocking::NonBlocking> {
    let parent = path
        .parent()
        .context("Log file path has no parent directory")?;
    std::fs::create_dir_all(parent).context(format!(
        "Failed to create log directory: {}",
        parent.display()
    ))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Invalid log file path")?;

    let file_appender = tracing_appender::rolling::daily(parent, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    // The writer stops flushing once its guard drops; keep it for the
    // lifetime of the process.
    std::mem::forget(guard);

    Ok(file_writer)
}
