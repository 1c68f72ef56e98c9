use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// `-v` enables info, `-vv` or `--debug` enables debug.
    pub fn from_verbosity(verbose: u8, debug: bool) -> Self {
        match (debug, verbose) {
            (true, _) | (_, 2..) => LogLevel::Debug,
            (_, 1) => LogLevel::Info,
            _ => LogLevel::Warn,
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);
static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();

pub fn init(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Send log lines to `path` instead of stderr. Only the first call installs a
/// file; later calls just update the level.
pub fn init_with_file(level: LogLevel, path: &Path) -> eyre::Result<()> {
    init(level);
    if LOG_FILE.get().is_some() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = LOG_FILE.set(Mutex::new(file));
    Ok(())
}

pub fn enabled(level: LogLevel) -> bool {
    LOG_LEVEL.load(Ordering::Relaxed) >= level as u8
}

pub fn error(message: impl AsRef<str>) {
    log(LogLevel::Error, "error", message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    log(LogLevel::Warn, "warn", message.as_ref());
}

pub fn info(message: impl AsRef<str>) {
    log(LogLevel::Info, "info", message.as_ref());
}

pub fn debug(message: impl AsRef<str>) {
    log(LogLevel::Debug, "debug", message.as_ref());
}

fn log(level: LogLevel, label: &str, message: &str) {
    if !enabled(level) {
        return;
    }

    let line = format!(
        "{} [{}] {}",
        Local::now().format("%H:%M:%S%.3f"),
        label,
        message
    );
    match LOG_FILE.get() {
        Some(file) => {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", line);
            }
        }
        None => eprintln!("{}", line),
    }
}
