use std::{
    env,
    fs::File,
    path::{Path, PathBuf},
};

use log::{info, LevelFilter, Log, Metadata, Record};

/// Forwards every record to all loggers that want it.
struct Tee {
    loggers: Vec<env_logger::Logger>,
}

impl Log for Tee {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.loggers.iter().any(|logger| logger.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        for logger in self.loggers.iter().filter(|l| l.enabled(record.metadata())) {
            logger.log(record);
        }
    }

    fn flush(&self) {
        self.loggers.iter().for_each(Log::flush);
    }
}

/// Points the user at the full log unless disarmed after a successful run.
pub struct Guard {
    file: Option<PathBuf>,
}

impl Guard {
    pub fn disarm(&mut self) {
        if let Some(file) = self.file.take() {
            info!("Full log stored in {file:?}");
        }
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        if let Some(file) = self.file.as_ref() {
            eprintln!("Full log stored in {file:?}");
        }
    }
}

fn file_path() -> PathBuf {
    env::var_os("UNICTL_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("unictl.log"))
}

fn file_logger(path: &Path) -> Option<env_logger::Logger> {
    let target = env_logger::Target::Pipe(Box::new(File::create(path).ok()?));
    Some(
        env_logger::Builder::new()
            .filter_level(LevelFilter::Trace)
            .target(target)
            .build(),
    )
}

fn stderr_logger() -> env_logger::Logger {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .build()
}

/// Log everything to a file and warnings, or whatever `RUST_LOG` asks for, to stderr.
///
/// If the log file cannot be created only stderr is used.
pub fn init() -> Guard {
    let path = file_path();
    let mut loggers = vec![stderr_logger()];
    let file = match file_logger(&path) {
        Some(logger) => {
            loggers.push(logger);
            Some(path)
        }
        None => None,
    };

    let max_level = loggers
        .iter()
        .map(|logger| logger.filter())
        .max()
        .unwrap_or(LevelFilter::Off);
    if log::set_boxed_logger(Box::new(Tee { loggers })).is_ok() {
        log::set_max_level(max_level);
    }

    if let Some(file) = file.as_ref() {
        info!("Logging to {file:?}");
    }
    Guard { file }
}
