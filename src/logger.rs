use {
    crate::utils::errorfmt::ErrorFmt,
    backtrace::Backtrace,
    log::{Level, LevelFilter, Log, Metadata, Record},
    parking_lot::Mutex,
    std::{
        fmt::Write as _,
        fs::{DirBuilder, OpenOptions},
        io::{self, Write},
        path::{Path, PathBuf},
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering::Relaxed},
        },
        time::SystemTime,
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Could not create the log directory {0}")]
    CreateDir(PathBuf, #[source] io::Error),
    #[error("Could not create a log file in {0}")]
    CreateFile(PathBuf, #[source] io::Error),
    #[error("A logger has already been installed")]
    AlreadyInstalled,
}

pub struct Logger {
    level: AtomicUsize,
    path: Option<PathBuf>,
    file: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    pub fn install_stderr(level: LevelFilter) -> Result<Arc<Self>, LoggerError> {
        Self::install(level, None, Box::new(io::stderr()))
    }

    /// Logs into a new file `wl-shell-<time>-<n>.txt` inside `dir`.
    pub fn install_file(level: LevelFilter, dir: &Path) -> Result<Arc<Self>, LoggerError> {
        if let Err(e) = DirBuilder::new().recursive(true).create(dir) {
            return Err(LoggerError::CreateDir(dir.to_path_buf(), e));
        }
        let now = humantime::format_rfc3339_millis(SystemTime::now());
        let mut i = 0;
        let (path, file) = loop {
            let path = dir.join(format!("wl-shell-{}-{}.txt", now, i));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => break (path, f),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => i += 1,
                Err(e) => return Err(LoggerError::CreateFile(dir.to_path_buf(), e)),
            }
        };
        Self::install(level, Some(path), Box::new(file) as Box<dyn Write + Send>)
    }

    fn install(
        level: LevelFilter,
        path: Option<PathBuf>,
        file: Box<dyn Write + Send>,
    ) -> Result<Arc<Self>, LoggerError> {
        let slf = Self::new(level, path, file);
        let res = log::set_boxed_logger(Box::new(LogWrapper {
            logger: slf.clone(),
        }));
        if res.is_err() {
            return Err(LoggerError::AlreadyInstalled);
        }
        log::set_max_level(level);
        Ok(slf)
    }

    fn new(level: LevelFilter, path: Option<PathBuf>, file: Box<dyn Write + Send>) -> Arc<Self> {
        Arc::new(Self {
            level: AtomicUsize::new(level as usize),
            path,
            file: Mutex::new(file),
        })
    }

    pub fn level(&self) -> LevelFilter {
        LevelFilter::iter()
            .nth(self.level.load(Relaxed))
            .unwrap_or(LevelFilter::Trace)
    }

    pub fn set_level(&self, level: LevelFilter) {
        self.level.store(level as usize, Relaxed);
        log::set_max_level(level);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn enabled(&self, level: Level) -> bool {
        level as usize <= self.level.load(Relaxed)
    }
}

/// Routes panics through the log before the process aborts.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|p| {
        if let Some(loc) = p.location() {
            log::error!(
                "Panic at {} line {} column {}",
                loc.file(),
                loc.line(),
                loc.column()
            );
        } else {
            log::error!("Panic at unknown location");
        }
        if let Some(msg) = p.payload().downcast_ref::<&str>() {
            log::error!("Message: {}", msg);
        }
        if let Some(msg) = p.payload().downcast_ref::<String>() {
            log::error!("Message: {}", msg);
        }
        log::error!("Backtrace:\n{:?}", Backtrace::new());
    }));
}

pub fn format_record(record: &Record, now: SystemTime) -> String {
    let mut line = String::new();
    let _ = match record.module_path() {
        Some(mp) => writeln!(
            line,
            "[{} {:5} {}] {}",
            humantime::format_rfc3339_millis(now),
            record.level(),
            mp,
            record.args(),
        ),
        None => writeln!(
            line,
            "[{} {:5}] {}",
            humantime::format_rfc3339_millis(now),
            record.level(),
            record.args(),
        ),
    };
    line
}

struct LogWrapper {
    logger: Arc<Logger>,
}

impl Log for LogWrapper {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.logger.enabled(metadata.level())
    }

    fn log(&self, record: &Record) {
        if !self.logger.enabled(record.level()) {
            return;
        }
        let line = format_record(record, SystemTime::now());
        let mut file = self.logger.file.lock();
        if let Err(e) = file.write_all(line.as_bytes()) {
            let _ = writeln!(io::stderr(), "Could not write log line: {}", ErrorFmt(e));
        }
    }

    fn flush(&self) {
        let _ = self.logger.file.lock().flush();
    }
}
