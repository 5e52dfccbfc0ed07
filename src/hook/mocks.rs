//! Test doubles for the hook ports.
//!
//! Recording doubles share their buffers across clones, so a test can keep
//! one handle and give the other to the dispatcher.

use chrono::{DateTime, Utc};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::{Broadcaster, Clock, LogSink};

/// Captures every payload it is asked to send
#[derive(Debug, Clone, Default)]
pub struct RecordingBroadcaster {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("RecordingBroadcaster mutex poisoned").clone()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn name(&self) -> &str {
        "recording"
    }

    fn send(&self, json: &str) -> eyre::Result<()> {
        self.sent
            .lock()
            .expect("RecordingBroadcaster mutex poisoned")
            .push(json.to_string());
        Ok(())
    }
}

/// Fails every send with a fixed message
#[derive(Debug, Clone)]
pub struct FailingBroadcaster {
    message: String,
}

impl FailingBroadcaster {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Broadcaster for FailingBroadcaster {
    fn name(&self) -> &str {
        "failing"
    }

    fn send(&self, _json: &str) -> eyre::Result<()> {
        Err(eyre::eyre!("{}", self.message))
    }
}

/// Captures host log lines
#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    lines: Arc<Mutex<Vec<(log::Level, String)>>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(log::Level, String)> {
        self.lines.lock().expect("RecordingLog mutex poisoned").clone()
    }

    pub fn at(&self, level: log::Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line)
            .collect()
    }
}

impl LogSink for RecordingLog {
    fn log(&self, level: log::Level, message: &str) {
        self.lines
            .lock()
            .expect("RecordingLog mutex poisoned")
            .push((level, message.to_string()));
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Answer exactly one HTTP request on a local port.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and a handle that yields
/// the raw request text once the response has been written.
pub fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let url = format!("http://{}", listener.local_addr().expect("listener address"));
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let request = read_request(&mut stream);
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush response");
        request
    });

    (url, handle)
}

/// Read headers plus a `Content-Length` body
fn read_request(stream: &mut impl Read) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
