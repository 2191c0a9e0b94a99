//! Extension logging
//!
//! Timestamped log lines written to `~/FoA-BepInEx/logs/` and echoed to the
//! console, with a short environment header at the top of every file.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

static LOGGER: OnceLock<Arc<Mutex<ExtLogger>>> = OnceLock::new();
static CONSOLE_ECHO: AtomicBool = AtomicBool::new(true);

// ============================================================================
// Environment Header
// ============================================================================

#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub app_version: String,
    pub os: String,
    pub distro: String,
    pub kernel: String,
}

impl SystemInfo {
    pub fn detect() -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            distro: detect_distro(),
            kernel: detect_kernel(),
        }
    }

    pub fn to_log_header(&self) -> String {
        format!(
r#"================================================================================
FoA BepInEx Log - {}
================================================================================
Extension:     foa-bepinex v{}
System Info:
  OS:          {}
  Distro:      {}
  Kernel:      {}
================================================================================
"#,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.app_version,
            self.os,
            self.distro,
            self.kernel,
        )
    }
}

fn detect_distro() -> String {
    if let Ok(file) = File::open("/etc/os-release") {
        let reader = BufReader::new(file);
        for line in reader.lines().map_while(Result::ok) {
            if let Some(name) = line.strip_prefix("PRETTY_NAME=") {
                return name.trim_matches('"').to_string();
            }
        }
    }
    "Unknown".to_string()
}

fn detect_kernel() -> String {
    if let Ok(output) = Command::new("uname").arg("-r").output() {
        if output.status.success() {
            return String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
    }
    "Unknown".to_string()
}

// ============================================================================
// Log Levels
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Debug,
    Info,
    Detect, // Build / loader classification results
    Install,
    Warning,
    Error,
}

impl LogLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Info => "[INFO]",
            LogLevel::Detect => "[DETECT]",
            LogLevel::Install => "[INSTALL]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

// ============================================================================
// Logger
// ============================================================================

pub struct ExtLogger {
    log_file: Option<File>,
}

impl ExtLogger {
    pub fn new() -> Self {
        let log_dir = crate::ext_path!("logs");
        let _ = fs::create_dir_all(&log_dir);

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("foa_{}.log", timestamp));

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok();

        let mut logger = Self { log_file };
        let header = SystemInfo::detect().to_log_header();
        logger.write_raw(&header);

        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.log_file {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }

        if CONSOLE_ECHO.load(Ordering::Relaxed) {
            println!("{}", msg);
        }
    }

    pub fn log(&mut self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        let formatted = format!("[{}] {} {}", timestamp, level.prefix(), message);
        self.write_raw(&formatted);
    }
}

impl Default for ExtLogger {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Global Logger Access
// ============================================================================

/// Initialize the global logger (call once at startup)
pub fn init_logger() {
    LOGGER.get_or_init(|| Arc::new(Mutex::new(ExtLogger::new())));
}

/// Turn console echo on or off. File output is unaffected.
pub fn set_console_echo(enabled: bool) {
    CONSOLE_ECHO.store(enabled, Ordering::Relaxed);
}

fn logger() -> Arc<Mutex<ExtLogger>> {
    LOGGER
        .get_or_init(|| Arc::new(Mutex::new(ExtLogger::new())))
        .clone()
}

fn log_at(level: LogLevel, message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(level, message);
    }
}

// ============================================================================
// Convenience Logging Functions
// ============================================================================

pub fn log_debug(message: &str) {
    log_at(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_at(LogLevel::Info, message);
}

pub fn log_detect(message: &str) {
    log_at(LogLevel::Detect, message);
}

pub fn log_install(message: &str) {
    log_at(LogLevel::Install, message);
}

pub fn log_warning(message: &str) {
    log_at(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_at(LogLevel::Error, message);
}
