//! Flash file store adapter.
//!
//! Implements [`FileStorePort`] on top of `std::fs`.  On ESP-IDF the
//! SPIFFS partition is registered with the VFS at the configured mount
//! point (see `hw_init::mount_spiffs`), so ordinary file calls reach
//! flash.  On the host the same code runs against any directory, which
//! is what the tests use.
//!
//! Logical paths such as `/data.csv` are resolved under the root.  Every
//! call opens, operates and drops its handle before returning.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use log::warn;

use crate::app::ports::FileStorePort;
use crate::error::IoFailure;

pub struct FlashFs {
    root: PathBuf,
}

impl FlashFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl FileStorePort for FlashFs {
    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), IoFailure> {
        let full = self.resolve(path);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .map_err(|e| {
                warn!("FlashFs: open {} failed: {}", full.display(), e);
                IoFailure::OpenFailed
            })?;
        file.write_all(data).map_err(|e| {
            warn!("FlashFs: write {} failed: {}", full.display(), e);
            IoFailure::WriteFailed
        })
    }

    fn remove(&mut self, path: &str) -> Result<(), IoFailure> {
        let full = self.resolve(path);
        fs::remove_file(&full).map_err(|e| match e.kind() {
            ErrorKind::NotFound => IoFailure::NotFound,
            _ => {
                warn!("FlashFs: remove {} failed: {}", full.display(), e);
                IoFailure::RemoveFailed
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, IoFailure> {
        let full = self.resolve(path);
        fs::read(&full).map_err(|e| match e.kind() {
            ErrorKind::NotFound => IoFailure::NotFound,
            _ => {
                warn!("FlashFs: read {} failed: {}", full.display(), e);
                IoFailure::ReadFailed
            }
        })
    }
}
