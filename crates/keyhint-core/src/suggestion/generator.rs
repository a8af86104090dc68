// Keyhint Suggestions - External Generator
// Runs the suggestion command and reads back its single output line

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

pub const DEFAULT_COMMAND: &str = "python";
pub const DEFAULT_SCRIPT: &str = "process_input.py";
pub const DEFAULT_OUTPUT_FILE: &str = "python_output.txt";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Environment variable carrying the event log path to the command
pub const LOG_FILE_ENV: &str = "KEYHINT_LOG_FILE";

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Generator command not found: {0}")]
    NotFound(String),

    #[error("Failed to start generator: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Generator exited with code {0:?}")]
    Failed(Option<i32>),

    #[error("Generator timed out after {0:?}")]
    Timeout(Duration),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Generator panicked: {0}")]
    Panicked(String),

    #[error("Could not read generator output {path}: {source}")]
    OutputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Generator I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces one line of suggestion text (possibly empty).
///
/// Runs on the generation worker thread. Implementations should return
/// `GeneratorError::Cancelled` promptly once `cancel` becomes true.
pub trait SuggestionGenerator: Send + 'static {
    fn generate(&self, cancel: &AtomicBool) -> Result<String, GeneratorError>;
}

impl<F> SuggestionGenerator for F
where
    F: Fn(&AtomicBool) -> Result<String, GeneratorError> + Send + 'static,
{
    fn generate(&self, cancel: &AtomicBool) -> Result<String, GeneratorError> {
        self(cancel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Directory the command runs in; the event log is expected here.
    /// `None` means the current directory.
    pub working_dir: Option<PathBuf>,
    /// Resolved against `working_dir` when relative
    pub output_file: PathBuf,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            args: vec![DEFAULT_SCRIPT.to_string()],
            working_dir: None,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl GeneratorConfig {
    pub fn output_path(&self) -> PathBuf {
        match &self.working_dir {
            Some(dir) if self.output_file.is_relative() => dir.join(&self.output_file),
            _ => self.output_file.clone(),
        }
    }
}

/// Runs an external command; exit code 0 means the output file holds the
/// suggestion on its first line.
#[derive(Debug, Clone, Default)]
pub struct ProcessGenerator {
    config: GeneratorConfig,
    log_file: Option<PathBuf>,
}

impl ProcessGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            log_file: None,
        }
    }

    /// Export the event log path to the command as `KEYHINT_LOG_FILE`
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Directory the command runs in
    pub fn run_dir(&self) -> Option<PathBuf> {
        match &self.config.working_dir {
            Some(dir) => Some(dir.clone()),
            None => std::env::current_dir().ok(),
        }
    }

    fn remove_stale_output(path: &Path) -> Result<(), GeneratorError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GeneratorError::Io(e)),
        }
    }

    fn read_first_line(path: &Path) -> Result<String, GeneratorError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| GeneratorError::OutputUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(contents.lines().next().unwrap_or_default().to_string())
    }
}

impl SuggestionGenerator for ProcessGenerator {
    fn generate(&self, cancel: &AtomicBool) -> Result<String, GeneratorError> {
        let output_path = self.config.output_path();
        Self::remove_stale_output(&output_path)?;

        let mut command = Command::new(&self.config.command);
        command.args(&self.config.args).stdin(Stdio::null());
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        if let Some(log_file) = &self.log_file {
            command.env(LOG_FILE_ENV, log_file);
        }

        log::debug!(
            "Starting generator: {} {:?}",
            self.config.command,
            self.config.args
        );
        let mut child = command.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                GeneratorError::NotFound(self.config.command.clone())
            } else {
                GeneratorError::Spawn(e)
            }
        })?;

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            let stop = if cancel.load(Ordering::SeqCst) {
                Some(GeneratorError::Cancelled)
            } else if started.elapsed() >= self.config.timeout {
                Some(GeneratorError::Timeout(self.config.timeout))
            } else {
                None
            };
            if let Some(err) = stop {
                log::warn!("Stopping generator (pid {}): {}", child.id(), err);
                let _ = child.kill();
                let _ = child.wait();
                return Err(err);
            }
            thread::sleep(self.config.poll_interval);
        };

        if !status.success() {
            return Err(GeneratorError::Failed(status.code()));
        }
        log::debug!("Generator finished in {:?}", started.elapsed());
        Self::read_first_line(&output_path)
    }
}
