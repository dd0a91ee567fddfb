use std::any::Any;
use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Log file used when `RUST_LOG_FILE` is unset.
pub const DEFAULT_LOG_FILE: &str = "logs/cubelight.log";

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Default directive when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Split the `RUST_LOG_FILE` value into the rolling appender's directory and
/// file prefix. An empty value turns file logging off.
pub fn log_file_target(value: Option<&str>) -> Option<(PathBuf, OsString)> {
    let value = value.unwrap_or(DEFAULT_LOG_FILE).trim();
    if value.is_empty() {
        return None;
    }
    let path = Path::new(value);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = path.file_name()?.to_os_string();
    Some((dir, file))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}

/// Install the global subscriber: stderr always, plus a daily rolling file
/// unless `RUST_LOG_FILE` is set to an empty string.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let file_setting = env::var("RUST_LOG_FILE").ok();
    let file_layer = log_file_target(file_setting.as_deref()).map(|(dir, file)| {
        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file));
        let _ = FILE_GUARD.set(guard);
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    // Panics go through tracing so they also land in the log file
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "<unknown>".to_string());
        let backtrace = std::backtrace::Backtrace::force_capture();
        tracing::error!(
            "panic at {location}: {}\nBacktrace:\n{backtrace}",
            panic_message(info.payload())
        );
    }));
}
