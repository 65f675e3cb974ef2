use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::fmt::MakeWriter;

use crate::utils::app_paths::AppPaths;

/// Filter for the log file, independent of console verbosity
const FILE_FILTER: &str = "debug,hyper=info,reqwest=info";

/// Per-run log files kept in the log directory
const MAX_LOG_FILES: usize = 10;

/// Global file logger instance
static FILE_LOGGER: OnceLock<FileLogger> = OnceLock::new();

/// Appends timestamped log lines to a per-run file
pub struct FileLogger {
    log_file: Mutex<File>,
    log_path: PathBuf,
}

impl FileLogger {
    pub fn create(log_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(log_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("langcurl_{}.log", timestamp));
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        prune_old_logs(log_dir, MAX_LOG_FILES);

        #[cfg(unix)]
        {
            let latest_path = log_dir.join("latest.log");
            let _ = std::fs::remove_file(&latest_path);
            let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
        }

        Ok(Self {
            log_file: Mutex::new(log_file),
            log_path,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn write_line(&self, message: &str) {
        let message = message.trim_end();
        if message.is_empty() {
            return;
        }
        if let Ok(mut file) = self.log_file.lock() {
            let _ = writeln!(
                file,
                "[{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                message
            );
        }
    }

    pub fn flush(&self) {
        if let Ok(mut file) = self.log_file.lock() {
            let _ = file.flush();
        }
    }
}

/// Delete all but the newest `keep` run logs. Names embed the start time,
/// so lexical order is chronological.
pub fn prune_old_logs(log_dir: &Path, keep: usize) {
    let Ok(entries) = std::fs::read_dir(log_dir) else {
        return;
    };
    let mut logs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with("langcurl_") && name.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();
    if logs.len() <= keep {
        return;
    }
    logs.sort();
    let excess = logs.len() - keep;
    for path in logs.drain(..excess) {
        let _ = std::fs::remove_file(path);
    }
}

/// tracing writer that forwards formatted events to a `FileLogger`
#[derive(Clone, Copy)]
pub struct FileWriter {
    logger: &'static FileLogger,
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logger.write_line(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.logger.flush();
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

/// Console filter directive for a `-v` count
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing: compact stderr output filtered by `RUST_LOG` or the
/// verbosity level, plus a debug-level log file when the log directory is
/// usable. Returns the log file path.
pub fn init_tracing(verbosity: u8) -> Option<PathBuf> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .without_time()
        .compact()
        .with_filter(console_filter);

    let file_logger = AppPaths::log_dir()
        .ok()
        .and_then(|dir| FileLogger::create(&dir).ok())
        .map(|logger| FILE_LOGGER.get_or_init(|| logger));

    let file_layer = file_logger.map(|logger| {
        fmt::layer()
            .with_writer(FileWriter { logger })
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .without_time() // We add our own timestamps
            .compact()
            .with_filter(EnvFilter::new(FILE_FILTER))
    });

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();

    tracing::debug!(target: "langcurl", "Logging initialized");

    file_logger.map(|logger| logger.log_path().to_path_buf())
}
