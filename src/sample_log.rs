//! Bounded, append-only CSV log of sensor readings on flash.
//!
//! One line per reading:
//!
//! ```text
//! sequence,primary_temp_c,secondary_temp_c,secondary_humidity_pct
//! 1,21.500000,22.000000,45.000000
//! ```
//!
//! The log holds at most `max_entries` lines.  The append that would
//! exceed that wipes the file first and restarts numbering at 1; there is
//! no sliding window.
//!
//! The file is touched from the main loop and from HTTP handlers running
//! on the server task, so the log lives behind a [`SharedLog`] mutex and
//! every file operation happens with the lock held.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{info, warn};

use crate::app::ports::FileStorePort;
use crate::config::SystemConfig;
use crate::error::IoFailure;
use crate::sensors::SensorSample;

/// A sample that has been assigned its place in the log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub sequence: u32,
    pub primary_temp_c: f32,
    pub secondary_temp_c: f32,
    pub secondary_humidity_pct: f32,
}

impl Reading {
    pub fn new(sequence: u32, sample: SensorSample) -> Self {
        Self {
            sequence,
            primary_temp_c: sample.primary_temp_c,
            secondary_temp_c: sample.secondary_temp_c,
            secondary_humidity_pct: sample.secondary_humidity_pct,
        }
    }

    /// Newline-terminated CSV line, six decimals per value.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{:.6},{:.6},{:.6}\n",
            self.sequence, self.primary_temp_c, self.secondary_temp_c, self.secondary_humidity_pct
        )
    }
}

/// Log shared between the main loop and the HTTP handlers.
pub type SharedLog<S> = Arc<Mutex<SampleLog<S>>>;

/// Lock the shared log.  A handler that panicked mid-request leaves the
/// counter and file consistent, so a poisoned lock is simply taken over.
pub fn lock<S>(log: &SharedLog<S>) -> MutexGuard<'_, SampleLog<S>> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SampleLog<S> {
    store: S,
    path: heapless::String<32>,
    entry_count: u32,
    max_entries: u32,
}

impl<S: FileStorePort> SampleLog<S> {
    pub fn new(store: S, config: &SystemConfig) -> Self {
        Self {
            store,
            path: config.log_path.clone(),
            entry_count: 0,
            max_entries: config.max_log_entries,
        }
    }

    /// Wrap into a [`SharedLog`].
    pub fn into_shared(self) -> SharedLog<S> {
        Arc::new(Mutex::new(self))
    }

    /// Append one sample and return it with its sequence number.
    ///
    /// The counter is bumped before the file is opened, so a failed
    /// append still consumes a sequence number and counts toward the
    /// rollover limit.
    pub fn append(&mut self, sample: SensorSample) -> Result<Reading, IoFailure> {
        if self.entry_count >= self.max_entries {
            match self.store.remove(&self.path) {
                Ok(()) | Err(IoFailure::NotFound) => {}
                // Numbering still restarts; the stale lines stay until the
                // next rollover manages to clear the file.
                Err(e) => warn!("LOG: rollover could not clear {}: {}", self.path, e),
            }
            self.entry_count = 0;
            info!("LOG: {} entries reached, log restarted", self.max_entries);
        }

        self.entry_count += 1;
        let reading = Reading::new(self.entry_count, sample);

        if let Err(e) = self.store.append(&self.path, reading.to_csv_line().as_bytes()) {
            warn!("LOG: append #{} to {} failed: {}", reading.sequence, self.path, e);
            return Err(e);
        }
        Ok(reading)
    }

    /// Delete the log file.
    ///
    /// Leaves `entry_count` untouched: the next append starts a fresh
    /// one-line file but continues the numbering.
    pub fn reset(&mut self) -> Result<(), IoFailure> {
        if !self.store.exists(&self.path) {
            warn!("LOG: remove requested but {} does not exist", self.path);
            return Err(IoFailure::NotFound);
        }
        match self.store.remove(&self.path) {
            Ok(()) => {
                info!("LOG: {} removed", self.path);
                Ok(())
            }
            Err(e) => {
                warn!("LOG: failed to remove {}: {}", self.path, e);
                Err(IoFailure::RemoveFailed)
            }
        }
    }

    /// Whole file, for download.
    pub fn contents(&self) -> Result<Vec<u8>, IoFailure> {
        self.store.read(&self.path)
    }

    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
