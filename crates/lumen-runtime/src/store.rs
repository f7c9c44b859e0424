#![forbid(unsafe_code)]

//! Run persistence port and the bundled stores.
//!
//! Stores only ever append. Writes are serialized behind a mutex, so the
//! persisted order matches call order.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | I/O error on save | `StoreError::Io`; the caller decides whether it is fatal |
//! | Unreadable line on load | `StoreError::Corrupt` naming the 1-based line |
//! | Poisoned lock | the inner value is recovered; appends stay line-atomic |

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use lumen_core::Run;

/// Host-implemented run persistence.
pub trait RunStore: Send + Sync {
    /// Persist one run after the ones already stored.
    fn save(&self, run: &Run) -> Result<(), StoreError>;

    /// Every stored run, in the order they were saved.
    fn load_history(&self) -> Result<Vec<Run>, StoreError>;
}

/// A shared store, so the host can keep reading what a tracker writes.
impl<S: RunStore + ?Sized> RunStore for Arc<S> {
    fn save(&self, run: &Run) -> Result<(), StoreError> {
        (**self).save(run)
    }

    fn load_history(&self) -> Result<Vec<Run>, StoreError> {
        (**self).load_history()
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    /// A run could not be encoded.
    Encode(String),
    /// A stored record could not be decoded.
    Corrupt { line: usize, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "run store I/O error: {err}"),
            Self::Encode(reason) => write!(f, "run could not be encoded: {reason}"),
            Self::Corrupt { line, reason } => {
                write!(f, "stored run on line {line} is unreadable: {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(_) | Self::Corrupt { .. } => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// In-process store, mostly for tests and short-lived hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    runs: Mutex<Vec<Run>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RunStore for MemoryStore {
    fn save(&self, run: &Run) -> Result<(), StoreError> {
        self.runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(run.clone());
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<Run>, StoreError> {
        Ok(self
            .runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[cfg(feature = "jsonl-store")]
pub use jsonl::JsonlStore;

#[cfg(feature = "jsonl-store")]
mod jsonl {
    use std::fs::{File, OpenOptions};
    use std::io::{BufRead, BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex, PoisonError};

    use lumen_core::Run;
    use tracing::debug;

    use super::{RunStore, StoreError};

    /// Append-only JSON Lines file, one run per line.
    #[derive(Debug)]
    pub struct JsonlStore {
        path: PathBuf,
        writer: Mutex<BufWriter<File>>,
    }

    impl JsonlStore {
        /// Open `path` for appending, creating it if needed.
        pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
            let path = path.into();
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            Ok(Self {
                path,
                writer: Mutex::new(BufWriter::new(file)),
            })
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl RunStore for JsonlStore {
        fn save(&self, run: &Run) -> Result<(), StoreError> {
            let line =
                serde_json::to_string(run).map_err(|e| StoreError::Encode(e.to_string()))?;
            let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            debug!(path = %self.path.display(), timestamp = %run.timestamp, "run persisted");
            Ok(())
        }

        fn load_history(&self) -> Result<Vec<Run>, StoreError> {
            let reader = BufReader::new(File::open(&self.path)?);
            let mut runs = Vec::new();
            for (index, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let run = serde_json::from_str(&line).map_err(|e| StoreError::Corrupt {
                    line: index + 1,
                    reason: e.to_string(),
                })?;
                runs.push(run);
            }
            Ok(runs)
        }
    }
}
