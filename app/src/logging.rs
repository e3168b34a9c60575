//! FILENAME: app/src/logging.rs
// PURPOSE: Unified logging for the host and the library crates.
// FORMAT: seq|level|category|message

use once_cell::sync::Lazy;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Global log file handle; `None` means console only
pub static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Whether lines are echoed to stderr as well
static ECHO_CONSOLE: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(false));

/// Default log file name, created in the working directory
pub const DEFAULT_LOG_FILE: &str = "datatable.log";

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

/// Initialize the log file, truncating any previous session.
pub fn init_log_file(path: &Path) -> Result<PathBuf, String> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create log dir at {:?}: {}", dir, e))?;
        }
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| format!("Failed to create log file {:?}: {}", path, e))?;

    let mut log_file = LOG_FILE.lock().map_err(|e| format!("Lock error: {}", e))?;
    *log_file = Some(file);
    drop(log_file);

    write_log_raw(&format!(
        "# session started {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    Ok(path.to_path_buf())
}

/// Echo every log line to stderr (used when no file is configured).
pub fn set_console_echo(enabled: bool) {
    if let Ok(mut guard) = ECHO_CONSOLE.lock() {
        *guard = enabled;
    }
}

/// Write a log line in unified format
pub fn write_log(level: &str, category: &str, message: &str) {
    let seq = next_seq();
    let line = format!("{}|{}|{}|{}", seq, level, category, message);
    write_log_raw(&line);
}

/// Write an ENTER log line for function entry
pub fn write_log_enter(level: &str, category: &str, func_name: &str, params: &str) {
    let message = if params.is_empty() {
        format!("ENTER {}", func_name)
    } else {
        format!("ENTER {} {}", func_name, params)
    };
    write_log(level, category, &message);
}

/// Write an EXIT log line for function exit
pub fn write_log_exit(level: &str, category: &str, func_name: &str, result: &str) {
    let message = if result.is_empty() {
        format!("EXIT {}", func_name)
    } else {
        format!("EXIT {} {}", func_name, result)
    };
    write_log(level, category, &message);
}

/// Write raw message
pub fn write_log_raw(message: &str) {
    let mut written = false;
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            if let Err(e) = writeln!(file, "{}", message) {
                eprintln!("[LOG_ERROR] Failed to write: {}", e);
            }
            let _ = file.flush();
            written = true;
        }
    }
    let echo = ECHO_CONSOLE.lock().map(|g| *g).unwrap_or(false);
    if echo || !written {
        eprintln!("{}", message);
    }
}

// ============================================================================
// `log` FACADE BRIDGE
// ============================================================================

/// Routes `log::` records from the library crates into the unified log.
pub struct UnifiedLogger;

static UNIFIED_LOGGER: UnifiedLogger = UnifiedLogger;

impl log::Log for UnifiedLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            log::Level::Error => "E",
            log::Level::Warn => "W",
            log::Level::Info => "I",
            log::Level::Debug | log::Level::Trace => "D",
        };
        let category = record.target().split("::").next().unwrap_or("LIB");
        write_log(level, category, &record.args().to_string());
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

/// Install the bridge. Safe to call more than once.
pub fn install_log_bridge(max_level: log::LevelFilter) {
    if log::set_logger(&UNIFIED_LOGGER).is_ok() {
        log::set_max_level(max_level);
    }
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("D", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("I", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("W", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("E", $cat, &format!($($arg)*))
    };
}

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_enter("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_enter("D", $cat, $func, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_exit("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_exit("D", $cat, $func, &format!($($arg)*))
    };
}

// Re-export the macros so they can be imported via `use crate::logging::log_info;`
pub use log_debug;
pub use log_enter;
pub use log_error;
pub use log_exit;
pub use log_info;
pub use log_warn;
