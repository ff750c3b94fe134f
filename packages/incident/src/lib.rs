#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session incident log mirrored to a CSV file.
//!
//! The in-memory sequence is the source of truth for the session. The CSV
//! file (`timestamp,status,location,notes`) is re-derived in full on every
//! append and is only read once, when the session starts. There is no file
//! locking: if two processes write the same log the last full rewrite wins.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, SubsecRound};
use iridm_incident_models::{IncidentStatus, InvalidStatusError, LogEntry};
use thiserror::Error;

/// Errors that can occur while appending to or loading the incident log.
#[derive(Debug, Error)]
pub enum LogError {
    /// The status text does not name a known [`IncidentStatus`].
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatusError),

    /// The entry location was empty.
    #[error("Incident location must not be empty")]
    EmptyLocation,

    /// The entry was recorded in memory but the CSV rewrite failed.
    ///
    /// The session log is still authoritative; the next successful append
    /// rewrites the full sequence.
    #[error(
        "Logged {} at {} but failed to write {}: {source}",
        .entry.status,
        .entry.location,
        .path.display()
    )]
    PersistenceWrite {
        /// The entry that was appended in memory.
        entry: Box<LogEntry>,
        /// Path of the persisted log.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The persisted log exists but could not be parsed.
    #[error("Incident log {} is malformed at line {line}: {reason}", .path.display())]
    Malformed {
        /// Path of the persisted log.
        path: PathBuf,
        /// 1-based line number of the offending record.
        line: u64,
        /// Description of what went wrong.
        reason: String,
    },

    /// The persisted log exists but could not be read.
    #[error("Failed to read incident log {}: {source}", .path.display())]
    Io {
        /// Path of the persisted log.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl LogError {
    /// Whether the in-memory log is intact despite this error, so the
    /// caller should warn and carry on.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::PersistenceWrite { .. })
    }
}

/// Source of log timestamps.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

/// Append-only journal of incident events for one session.
pub struct IncidentLog {
    path: PathBuf,
    entries: Vec<LogEntry>,
    loaded: bool,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for IncidentLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncidentLog")
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl IncidentLog {
    /// Creates an uninitialised log persisted at `path`, timestamped by the
    /// system clock.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }

    /// Creates an uninitialised log with a custom timestamp source.
    #[must_use]
    pub fn with_clock(path: impl Into<PathBuf>, clock: impl Clock + 'static) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            loaded: false,
            clock: Box::new(clock),
        }
    }

    /// Path of the persisted CSV mirror.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seeds the session from the persisted log on first call. Later calls
    /// are no-ops and return the current sequence.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] or [`LogError::Malformed`] if the persisted
    /// file exists but cannot be read. The log stays uninitialised so a
    /// later call can retry.
    pub fn load(&mut self) -> Result<&[LogEntry], LogError> {
        if !self.loaded {
            if self.path.exists() {
                self.entries = read_log(&self.path)?;
                log::info!(
                    "Loaded {} incident log entries from {}",
                    self.entries.len(),
                    self.path.display()
                );
            }
            self.loaded = true;
        }
        Ok(&self.entries)
    }

    /// Appends an event and rewrites the persisted log.
    ///
    /// Initialises the session from the persisted log first if [`load`]
    /// has not run yet, so earlier history is never overwritten.
    ///
    /// [`load`]: Self::load
    ///
    /// # Errors
    ///
    /// * [`LogError::EmptyLocation`] if `location` is blank.
    /// * Any error from [`load`](Self::load).
    /// * [`LogError::PersistenceWrite`] if the rewrite fails. The entry has
    ///   still been appended in memory and is carried in the error.
    pub fn append(
        &mut self,
        status: IncidentStatus,
        location: &str,
        notes: &str,
    ) -> Result<LogEntry, LogError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(LogError::EmptyLocation);
        }
        self.load()?;

        let mut timestamp = self.clock.now().trunc_subsecs(0);
        if let Some(last) = self.entries.last() {
            timestamp = timestamp.max(last.timestamp);
        }

        let entry = LogEntry {
            timestamp,
            status,
            location: location.to_string(),
            notes: notes.trim().to_string(),
        };
        self.entries.push(entry.clone());
        log::info!(
            "Logged {} at {} ({})",
            entry.status,
            entry.location,
            entry.timestamp_string()
        );

        if let Err(source) = write_log(&self.path, &self.entries) {
            log::warn!(
                "Failed to persist incident log to {}: {source}",
                self.path.display()
            );
            return Err(LogError::PersistenceWrite {
                entry: Box::new(entry),
                path: self.path.clone(),
                source,
            });
        }

        Ok(entry)
    }

    /// Like [`append`](Self::append), parsing the status from text.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidStatus`] for an unknown status, otherwise
    /// the same errors as [`append`](Self::append).
    pub fn append_raw(
        &mut self,
        status: &str,
        location: &str,
        notes: &str,
    ) -> Result<LogEntry, LogError> {
        let status = IncidentStatus::parse(status)?;
        self.append(status, location, notes)
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn all(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries most recent first, for display. Entries sharing a timestamp
    /// list the later append first.
    #[must_use]
    pub fn newest_first(&self) -> Vec<LogEntry> {
        let mut entries: Vec<LogEntry> = self.entries.iter().rev().cloned().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Number of entries in the session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the session has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ends the session, returning the journal.
    #[must_use]
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

/// Reads a persisted incident log.
///
/// # Errors
///
/// Returns [`LogError::Io`] if the file cannot be opened and
/// [`LogError::Malformed`] if any record fails to parse or has an empty
/// location.
pub fn read_log(path: &Path) -> Result<Vec<LogEntry>, LogError> {
    let file = std::fs::File::open(path).map_err(|e| LogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let malformed = |line: u64, reason: String| LogError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let headers = reader
        .headers()
        .map_err(|e| malformed(1, e.to_string()))?
        .clone();

    let mut entries = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(|e| {
        let line = e.position().map_or(0, csv::Position::line);
        malformed(line, e.to_string())
    })? {
        // Quoted notes may span lines, so take the line from the record.
        let line = record.position().map_or(0, csv::Position::line);
        let entry: LogEntry = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(line, e.to_string()))?;
        if entry.location.is_empty() {
            return Err(malformed(line, "empty location".to_string()));
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Rewrites the persisted log with `entries`.
///
/// Writes to a sibling temporary file and renames it over the target so a
/// failed write never leaves a truncated log behind.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created or the file
/// cannot be written.
pub fn write_log(path: &Path, entries: &[LogEntry]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut writer = csv::Writer::from_path(&tmp_path)?;
    if entries.is_empty() {
        writer.write_record(["timestamp", "status", "location", "notes"])?;
    }
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    drop(writer);

    std::fs::rename(&tmp_path, path)
}
