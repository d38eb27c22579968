#![allow(dead_code)]

use httpmock::MockServer;
use nationalize_cli::{HttpPredictionSource, Settings, SubmissionHandler, TerminalView};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

pub type TestHandler = SubmissionHandler<HttpPredictionSource, TerminalView<Vec<u8>>>;

pub const NAMES_PATH: &str = "/api/v1/names/";

pub fn settings_for(server: &MockServer) -> Settings {
    Settings {
        base_url: server.base_url(),
        ..Settings::default()
    }
}

pub fn handler_with(settings: &Settings) -> TestHandler {
    let source = HttpPredictionSource::new(settings).unwrap();
    SubmissionHandler::new(source, TerminalView::new(Vec::new()))
}

pub fn handler_for(server: &MockServer) -> TestHandler {
    handler_with(&settings_for(server))
}

/// One line of `tracing_subscriber`'s JSON output.
#[derive(Debug, Deserialize)]
pub struct LoggedEvent {
    pub level: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl LoggedEvent {
    pub fn message_contains(&self, pat: &str) -> bool {
        self.fields
            .get("message")
            .and_then(Value::as_str)
            .is_some_and(|message| message.contains(pat))
    }
}

#[derive(Clone, Default)]
struct CapturedWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for CapturedWriter {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Collects this crate's log events for the current thread while alive.
///
/// `#[tokio::test]` runs on a single thread, so events from spawned tasks
/// are captured too.
pub struct LogWatcher {
    writer: CapturedWriter,
    _guard: DefaultGuard,
}

impl LogWatcher {
    pub fn install() -> Self {
        let writer = CapturedWriter::default();
        let layer_writer = writer.clone();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("nationalize_cli=debug"))
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(move || layer_writer.clone()),
            );

        Self {
            writer,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub fn events(&self) -> Vec<LoggedEvent> {
        let buf = self.writer.buf.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|_| panic!("Bad JSON in log line: {}", line))
            })
            .collect()
    }

    /// True if any event at `level` carries a message containing `pat`.
    pub fn has(&self, level: &str, pat: &str) -> bool {
        self.events()
            .iter()
            .any(|event| event.level == level && event.message_contains(pat))
    }
}
