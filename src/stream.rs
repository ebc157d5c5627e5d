// file: src/stream.rs
// version: 1.0.0
// guid: 3c200ce4-2b7c-48ed-b9f7-97ad32d97ff6

//! Output stream multiplexing
//!
//! Each child output pipe gets its own reader task. Every line a reader sees
//! is classified into a [`Channel`] and appended to one shared, ordered log.
//! Appends happen under a single lock and draw their sequence number from an
//! atomic counter while holding it, so sequence numbers are unique, gap-free
//! and match log order. A clone of every event is also forwarded to an
//! optional live feed.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Output classification of a captured record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Error,
    Warning,
    Information,
    Verbose,
    Debug,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Error => "error",
            Channel::Warning => "warning",
            Channel::Information => "information",
            Channel::Verbose => "verbose",
            Channel::Debug => "debug",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipe a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Stdout,
    Stderr,
}

/// One classified output record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub channel: Channel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub sequence: u64,
}

/// Receiving end of the live event feed
pub type EventFeed = mpsc::UnboundedReceiver<Event>;

const STREAM_PREFIXES: &[(&str, Channel)] = &[
    ("ERROR:", Channel::Error),
    ("WARNING:", Channel::Warning),
    ("VERBOSE:", Channel::Verbose),
    ("DEBUG:", Channel::Debug),
    ("INFORMATION:", Channel::Information),
    ("INFO:", Channel::Information),
];

fn diagnostic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|[\s)]):\s*(?P<kind>error|warning)(?:\s+[A-Za-z]*\d+)?\s*:")
            .expect("diagnostic pattern is valid")
    })
}

/// Attribute a raw line to a channel. Lines that match nothing are
/// Information; nothing is ever dropped.
pub fn classify(source: Source, line: &str) -> (Channel, String) {
    if source == Source::Stderr {
        return (Channel::Error, line.to_string());
    }

    for (prefix, channel) in STREAM_PREFIXES {
        let matched = line
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matched {
            return (*channel, line[prefix.len()..].trim_start().to_string());
        }
    }

    if let Some(caps) = diagnostic_pattern().captures(line) {
        let channel = match &caps["kind"] {
            "error" => Channel::Error,
            _ => Channel::Warning,
        };
        return (channel, line.to_string());
    }

    (Channel::Information, line.to_string())
}

struct Log {
    events: Vec<Event>,
    feed: Option<mpsc::UnboundedSender<Event>>,
}

struct Shared {
    next_sequence: AtomicU64,
    log: Mutex<Log>,
}

/// Append-only, ordered event log shared by the reader tasks of one invocation
#[derive(Clone)]
pub struct StreamMultiplexer {
    shared: Arc<Shared>,
}

impl StreamMultiplexer {
    /// Multiplexer without a live feed
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Multiplexer that also forwards every event to the returned feed
    pub fn with_feed() -> (Self, EventFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::build(Some(tx)), rx)
    }

    fn build(feed: Option<mpsc::UnboundedSender<Event>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                next_sequence: AtomicU64::new(1),
                log: Mutex::new(Log {
                    events: Vec::new(),
                    feed,
                }),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Log> {
        // A panicking reader cannot leave the Vec half-written
        self.shared
            .log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append an already classified record
    pub fn record(&self, channel: Channel, message: impl Into<String>) -> Event {
        let mut log = self.lock();
        let event = Event {
            channel,
            message: message.into(),
            timestamp: Utc::now(),
            sequence: self.shared.next_sequence.fetch_add(1, Ordering::SeqCst),
        };
        log.events.push(event.clone());

        // A dropped receiver only stops live observation
        let receiver_gone = log
            .feed
            .as_ref()
            .is_some_and(|feed| feed.send(event.clone()).is_err());
        if receiver_gone {
            trace!("Live feed receiver dropped; event {} kept in log", event.sequence);
            log.feed = None;
        }

        event
    }

    /// Classify and append a raw line from `source`
    pub fn record_line(&self, source: Source, line: &str) -> Event {
        let (channel, message) = classify(source, line);
        self.record(channel, message)
    }

    /// Spawn a task that reads `reader` line by line into the log until EOF
    pub fn attach<R>(&self, source: Source, reader: R) -> JoinHandle<std::io::Result<u64>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let mux = self.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();
            let mut lines = 0u64;

            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf).await? == 0 {
                    break;
                }
                let text = String::from_utf8_lossy(&buf);
                let line = text.trim_end_matches(['\n', '\r']);
                mux.record_line(source, line);
                lines += 1;
            }

            debug!("{:?} reader finished after {} lines", source, lines);
            Ok(lines)
        })
    }

    /// Stop forwarding to the live feed, ending it once drained
    pub fn close_feed(&self) {
        self.lock().feed = None;
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the definitive event sequence and close the feed
    pub fn take_events(&self) -> Vec<Event> {
        let mut log = self.lock();
        log.feed = None;
        std::mem::take(&mut log.events)
    }
}

impl Default for StreamMultiplexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_stderr_is_error() {
        assert_eq!(
            classify(Source::Stderr, "something broke"),
            (Channel::Error, "something broke".to_string())
        );
    }

    #[test]
    fn test_classify_stream_prefixes() {
        assert_eq!(
            classify(Source::Stdout, "WARNING: low disk"),
            (Channel::Warning, "low disk".to_string())
        );
        assert_eq!(
            classify(Source::Stdout, "verbose: resolving"),
            (Channel::Verbose, "resolving".to_string())
        );
        assert_eq!(classify(Source::Stdout, "DEBUG: x").0, Channel::Debug);
        assert_eq!(classify(Source::Stdout, "ERROR: y").0, Channel::Error);
        assert_eq!(classify(Source::Stdout, "INFO: z").0, Channel::Information);
    }

    #[test]
    fn test_classify_msbuild_diagnostics() {
        // Arrange
        let error = "Program.cs(10,5): error CS1002: ; expected [/src/App.csproj]";
        let warning = "/src/App.csproj : warning NU1603: App depends on X";
        let tool = "MSBUILD : error MSB1009: Project file does not exist.";

        // Act & Assert
        assert_eq!(classify(Source::Stdout, error), (Channel::Error, error.to_string()));
        assert_eq!(classify(Source::Stdout, warning).0, Channel::Warning);
        assert_eq!(classify(Source::Stdout, tool).0, Channel::Error);
    }

    #[test]
    fn test_classify_unknown_defaults_to_information() {
        assert_eq!(
            classify(Source::Stdout, "  Determining projects to restore..."),
            (
                Channel::Information,
                "  Determining projects to restore...".to_string()
            )
        );
        assert_eq!(classify(Source::Stdout, "").0, Channel::Information);
        assert_eq!(classify(Source::Stdout, "0 Error(s)").0, Channel::Information);
    }

    #[test]
    fn test_record_assigns_increasing_sequence() {
        // Arrange
        let mux = StreamMultiplexer::new();

        // Act
        let a = mux.record(Channel::Information, "a");
        let b = mux.record(Channel::Warning, "b");

        // Assert
        assert_eq!(a.sequence + 1, b.sequence);
        assert_eq!(mux.len(), 2);
        assert_eq!(mux.take_events()[1].message, "b");
    }

    #[test]
    fn test_concurrent_records_are_unique_and_ordered() {
        // Arrange
        let mux = StreamMultiplexer::new();

        // Act
        std::thread::scope(|scope| {
            for t in 0..4 {
                let mux = mux.clone();
                scope.spawn(move || {
                    for i in 0..250 {
                        mux.record(Channel::Information, format!("{}-{}", t, i));
                    }
                });
            }
        });

        // Assert
        let events = mux.take_events();
        assert_eq!(events.len(), 1000);
        for pair in events.windows(2) {
            assert_eq!(pair[0].sequence + 1, pair[1].sequence);
        }
    }

    #[tokio::test]
    async fn test_live_feed_sees_events_in_order() {
        // Arrange
        let (mux, mut feed) = StreamMultiplexer::with_feed();

        // Act
        mux.record(Channel::Information, "one");
        mux.record(Channel::Debug, "two");
        mux.close_feed();

        // Assert
        let mut seen = Vec::new();
        while let Some(event) = feed.recv().await {
            seen.push(event.message);
        }
        assert_eq!(seen, vec!["one", "two"]);
        assert_eq!(mux.len(), 2);
    }

    #[tokio::test]
    async fn test_attach_reads_lines_until_eof() {
        // Arrange
        let mux = StreamMultiplexer::new();
        let input: &[u8] = b"first\r\nWARNING: second\nthird";

        // Act
        let lines = mux.attach(Source::Stdout, input).await.unwrap().unwrap();

        // Assert
        assert_eq!(lines, 3);
        let events = mux.take_events();
        let summary: Vec<(Channel, &str)> = events
            .iter()
            .map(|e| (e.channel, e.message.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Channel::Information, "first"),
                (Channel::Warning, "second"),
                (Channel::Information, "third"),
            ]
        );
    }

    #[test]
    fn test_dropped_feed_keeps_logging() {
        let (mux, feed) = StreamMultiplexer::with_feed();
        drop(feed);

        mux.record(Channel::Error, "still kept");

        assert_eq!(mux.len(), 1);
    }
}
