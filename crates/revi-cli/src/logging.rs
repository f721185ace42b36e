use anyhow::Result;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, registry::LookupSpan, EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingConfig};

const DEFAULT_FILTER: &str = "info,revi=debug,revi_cli=debug,revi_client=debug";

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// File logging, plus warnings on stderr when `console` is set.
///
/// The TUI owns stdout, so the chat screen runs with `console = false`.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_logger(config: &LoggingConfig, console: bool) -> Result<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(config, console)?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}

fn build_subscriber(config: &LoggingConfig, console: bool) -> Result<(BoxedSubscriber, WorkerGuard)> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    // logs/revi.YYYY-MM-DD.log
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(&config.directory)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber: BoxedSubscriber = match config.format {
        LogFormat::Json => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(file_writer)
                        .with_target(true)
                        .with_level(true)
                        .with_thread_ids(true),
                )
                .with(console_layer(console)),
        ),
        LogFormat::Pretty => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(file_writer)
                        .with_target(true)
                        .with_level(true)
                        .with_ansi(false), // No colors in file
                )
                .with(console_layer(console)),
        ),
    };

    Ok((subscriber, guard))
}

// Typed per stack, so each format arm gets its own instance
fn console_layer<S>(console: bool) -> Option<impl Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(LevelFilter::WARN)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_writes_file_for_each_format() {
        for format in [LogFormat::Pretty, LogFormat::Json] {
            let dir = tempfile::tempdir().unwrap();
            let config = LoggingConfig {
                directory: dir.path().to_string_lossy().into_owned(),
                file_prefix: "revi".into(),
                format,
            };

            let (subscriber, guard) = build_subscriber(&config, true).unwrap();
            tracing::subscriber::with_default(subscriber, || {
                tracing::warn!("upload rejected");
            });
            drop(guard);

            let files: Vec<_> = std::fs::read_dir(dir.path())
                .unwrap()
                .map(|e| e.unwrap().path())
                .collect();
            assert_eq!(files.len(), 1, "{:?}", format);

            let written = std::fs::read_to_string(&files[0]).unwrap();
            assert!(written.contains("upload rejected"), "{:?}", format);
        }
    }
}
