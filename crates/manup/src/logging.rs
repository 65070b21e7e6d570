//! File logging for the gate crates, configured from [`GateSettings`].

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use manup_platform::AppPaths;
#[cfg(debug_assertions)]
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use simplelog::{CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, WriteLogger};

use crate::settings::GateSettings;

/// Appends to the log file and reopens it when the file is deleted while
/// the process is running.
struct ReopeningLogFile {
    path: PathBuf,
    file: File,
}

impl ReopeningLogFile {
    fn open(path: PathBuf) -> io::Result<Self> {
        let file = open_for_append(&path)?;
        Ok(Self { path, file })
    }
}

impl Write for ReopeningLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.path.exists() {
            self.file = open_for_append(&self.path)?;
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_for_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Drop the older half of the log once it grows past `max_bytes`, cutting at
/// a line boundary. Returns whether the file was shortened.
fn shrink_log(path: &Path, max_bytes: u64) -> io::Result<bool> {
    let size = match std::fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(error) => return Err(error),
    };
    if size <= max_bytes {
        return Ok(false);
    }

    let contents = std::fs::read(path)?;
    let middle = contents.len() / 2;
    let start = contents[middle..]
        .iter()
        .position(|&byte| byte == b'\n')
        .map_or(middle, |offset| middle + offset + 1);
    std::fs::write(path, &contents[start..])?;
    Ok(true)
}

/// Create the log directory and bring an oversized log back under
/// `settings.max_log_size_bytes`. Returns the log file path.
fn prepare_log_file(paths: &AppPaths, settings: &GateSettings) -> io::Result<PathBuf> {
    let log_path = paths.log_file();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    shrink_log(&log_path, settings.max_log_size_bytes)?;
    Ok(log_path)
}

fn gate_log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("manup")
        .build()
}

/// Install the process logger for the gate: records from the `manup` crates
/// go to the app's `debug.log`, and to the terminal in debug builds.
///
/// `settings.debug_logging` picks the level. Returns the log file path, or
/// `None` when the file could not be prepared. Only the first call in a
/// process installs a logger.
pub fn init_logging(paths: &AppPaths, settings: &GateSettings) -> Option<PathBuf> {
    let config = gate_log_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    #[cfg(debug_assertions)]
    loggers.push(TermLogger::new(
        LevelFilter::Debug,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));

    let log_path = prepare_log_file(paths, settings)
        .and_then(|path| ReopeningLogFile::open(path.clone()).map(|file| (path, file)))
        .ok()
        .map(|(path, file)| {
            loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
            path
        });

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
    set_logging_enabled(settings.debug_logging);

    if let Some(path) = &log_path {
        log::debug!("Update gate logging to {}", path.display());
    }
    log_path
}

/// Debug logging records everything; otherwise only warnings and errors
/// from the gate reach the log.
pub fn set_logging_enabled(enabled: bool) {
    log::set_max_level(if enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use manup_platform::AppPaths;

    use super::{ReopeningLogFile, prepare_log_file, set_logging_enabled, shrink_log};
    use crate::settings::GateSettings;

    fn temp_paths(root: &std::path::Path) -> AppPaths {
        AppPaths {
            config_dir: root.join("config"),
            cache_dir: root.join("cache"),
            data_dir: root.join("data"),
        }
    }

    #[test]
    fn log_file_is_reopened_after_deletion() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");
        let mut log = ReopeningLogFile::open(log_path.clone()).expect("log file should open");

        log.write_all(b"before\n").expect("first write should succeed");
        std::fs::remove_file(&log_path).expect("log file should be removable");
        log.write_all(b"after\n").expect("write should reopen the file");

        let contents = std::fs::read_to_string(&log_path).expect("log file should be readable");
        assert_eq!(contents, "after\n");
    }

    #[test]
    fn oversized_log_keeps_its_newest_lines() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");
        std::fs::write(&log_path, "check-1\ncheck-2\ncheck-3\ncheck-4\ncheck-5\n")
            .expect("log file should be written");

        assert!(shrink_log(&log_path, 10).expect("shrinking should succeed"));

        let contents = std::fs::read_to_string(&log_path).expect("log file should be readable");
        assert!(!contents.contains("check-1"));
        assert!(contents.ends_with("check-5\n"));
        assert!(contents.starts_with("check-"));
    }

    #[test]
    fn small_or_missing_log_is_untouched() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");

        assert!(!shrink_log(&log_path, 10).expect("missing file is fine"));
        std::fs::write(&log_path, "short\n").expect("log file should be written");
        assert!(!shrink_log(&log_path, 1024).expect("small file is fine"));
        assert_eq!(
            std::fs::read_to_string(&log_path).expect("log file should be readable"),
            "short\n"
        );
    }

    #[test]
    fn prepare_log_file_applies_configured_size_limit() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let paths = temp_paths(temp_dir.path());
        std::fs::create_dir_all(&paths.data_dir).expect("data dir should be created");
        let lines: Vec<String> = ["a", "b", "c", "d"]
            .iter()
            .map(|letter| letter.repeat(30) + "\n")
            .collect();
        std::fs::write(paths.log_file(), lines.concat()).expect("log file should be written");
        let settings = GateSettings {
            max_log_size_bytes: 100,
            ..GateSettings::default()
        };

        let log_path = prepare_log_file(&paths, &settings).expect("log file should be prepared");

        assert_eq!(log_path, paths.log_file());
        let contents = std::fs::read_to_string(&log_path).expect("log file should be readable");
        assert!(contents.len() <= 100);
        assert_eq!(contents, lines[3]);
    }

    #[test]
    fn prepare_log_file_creates_the_data_directory() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let paths = temp_paths(temp_dir.path());

        prepare_log_file(&paths, &GateSettings::default()).expect("log file should be prepared");

        assert!(paths.data_dir.is_dir());
    }

    #[test]
    fn set_logging_enabled_updates_global_level() {
        set_logging_enabled(true);
        assert_eq!(log::max_level(), log::LevelFilter::Debug);

        set_logging_enabled(false);
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
    }
}
