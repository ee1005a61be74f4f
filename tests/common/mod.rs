//! Shared fixtures for the integration tests: in-memory PDFs and a log
//! capture that records what the component reports through `tracing`.

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Level;

// ── PDF fixtures ─────────────────────────────────────────────────────────────

#[path = "../../src/testing.rs"]
mod pdf_fixtures;

pub use pdf_fixtures::{pdf_with_pages, pdf_without_text};

/// Write `bytes` to `name` inside `dir` and return the full path.
pub fn write_pdf(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

// ── Log capture ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a WARN-level subscriber installed on this thread and return
/// its result together with everything that was logged.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let writer = CaptureWriter::default();
    let buf = Arc::clone(&writer.0);
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(Level::WARN)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buf.lock().unwrap()).into_owned();
    (out, logs)
}
