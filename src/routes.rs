//! HTTP routes served while the download service is running.
//!
//! | Path        | Success                         | Failure                         |
//! |-------------|---------------------------------|---------------------------------|
//! | `/download` | 200 `text/csv`, log contents    | 404 / 500 `text/plain`          |
//! | `/remove`   | 200 `text/plain` "File removed" | 404 "File not found", 500 "Failed to remove file" |
//!
//! Handlers are transport-agnostic: they return a [`Response`] and the
//! HTTP adapter copies it onto the wire.  Both take the shared log lock,
//! so a download never sees a half-written line.

use log::info;

use crate::app::ports::FileStorePort;
use crate::error::IoFailure;
use crate::sample_log::{self, SharedLog};

pub const DOWNLOAD_PATH: &str = "/download";
pub const REMOVE_PATH: &str = "/remove";

/// Every path the router must register.
pub const ROUTE_PATHS: [&str; 2] = [DOWNLOAD_PATH, REMOVE_PATH];

pub const CONTENT_TYPE_CSV: &str = "text/csv";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

pub const MSG_REMOVED: &str = "File removed";
pub const MSG_REMOVE_FAILED: &str = "Failed to remove file";
pub const MSG_NOT_FOUND: &str = "File not found";
pub const MSG_READ_FAILED: &str = "Failed to read file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    fn text(status: u16, msg: &str) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_TEXT,
            body: msg.as_bytes().to_vec(),
        }
    }
}

/// Route table bound to the shared log.
pub struct Routes<S> {
    log: SharedLog<S>,
}

impl<S> Clone for Routes<S> {
    fn clone(&self) -> Self {
        Self {
            log: self.log.clone(),
        }
    }
}

impl<S: FileStorePort> Routes<S> {
    pub fn new(log: SharedLog<S>) -> Self {
        Self { log }
    }

    /// Dispatch a request URI (query string ignored).  `None` for unknown paths.
    pub fn handle(&self, uri: &str) -> Option<Response> {
        let path = uri.split('?').next().unwrap_or(uri);
        match path {
            DOWNLOAD_PATH => Some(self.download()),
            REMOVE_PATH => Some(self.remove()),
            _ => None,
        }
    }

    pub fn download(&self) -> Response {
        let log = sample_log::lock(&self.log);
        match log.contents() {
            Ok(body) => {
                info!("HTTP: serving {} ({} bytes)", log.path(), body.len());
                Response {
                    status: 200,
                    content_type: CONTENT_TYPE_CSV,
                    body,
                }
            }
            Err(IoFailure::NotFound) => Response::text(404, MSG_NOT_FOUND),
            Err(_) => Response::text(500, MSG_READ_FAILED),
        }
    }

    pub fn remove(&self) -> Response {
        match sample_log::lock(&self.log).reset() {
            Ok(()) => Response::text(200, MSG_REMOVED),
            Err(IoFailure::NotFound) => Response::text(404, MSG_NOT_FOUND),
            Err(_) => Response::text(500, MSG_REMOVE_FAILED),
        }
    }
}
