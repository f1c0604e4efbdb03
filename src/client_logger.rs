//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all API interactions passing through the [`Gemini`](crate::Gemini)
//! client, and [`JsonLinesLogger`], which appends them to a file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde_json::json;

use crate::error::{Error, Result};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging Gemini client operations.
///
/// Every call to `generate_content` produces one `log_request` followed by
/// exactly one of `log_response` or `log_error`.
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log a successfully decoded response.
    fn log_response(&self, model: &Model, response: &GenerateContentResponse);

    /// Log a failed request.
    fn log_error(&self, model: &Model, error: &Error);
}

/// Appends one JSON object per event to a file.
pub struct JsonLinesLogger {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesLogger {
    /// Open `path` for appending, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|err| Error::io("failed to open log file", err))?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    fn write_event(&self, event: serde_json::Value) {
        // A poisoned lock or failed write must never take the chat down.
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{event}");
            let _ = writer.flush();
        }
    }
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
        self.write_event(json!({
            "event": "request",
            "model": model,
            "request": request,
        }));
    }

    fn log_response(&self, model: &Model, response: &GenerateContentResponse) {
        self.write_event(json!({
            "event": "response",
            "model": model,
            "response": response,
        }));
    }

    fn log_error(&self, model: &Model, error: &Error) {
        self.write_event(json!({
            "event": "error",
            "model": model,
            "error": error.to_string(),
        }));
    }
}
