//! Finite chunk producers for the streaming endpoint.
//!
//! Every [`StreamKind`] yields `count` chunks with `interval` between them
//! (none before the first). Blocking kinds come out of [`BlockingFeed`], a
//! plain iterator that sleeps the current thread; async kinds come out of
//! [`async_feed`], which only suspends the task.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Sse,
    Bytes,
    Iterator,
    Json,
    AsyncIterator,
}

impl StreamKind {
    pub const ALL: [StreamKind; 5] = [
        StreamKind::Sse,
        StreamKind::Bytes,
        StreamKind::Iterator,
        StreamKind::Json,
        StreamKind::AsyncIterator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Sse => "sse",
            StreamKind::Bytes => "bytes",
            StreamKind::Iterator => "iterator",
            StreamKind::Json => "json",
            StreamKind::AsyncIterator => "async_iterator",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            StreamKind::Sse => "text/event-stream",
            StreamKind::Bytes => "application/octet-stream",
            StreamKind::Iterator | StreamKind::AsyncIterator => "text/plain",
            StreamKind::Json => "application/x-ndjson",
        }
    }

    /// Whether chunks are produced by a thread-sleeping iterator
    pub fn is_blocking(&self) -> bool {
        matches!(self, StreamKind::Iterator | StreamKind::Json)
    }

    /// Render chunk `index`. `timestamp` is seconds since the Unix epoch and
    /// only appears in the JSON-bearing kinds.
    pub fn encode(&self, index: u32, timestamp: f64) -> String {
        match self {
            StreamKind::Sse => {
                let data = json!({ "message": format!("SSE message {index}"), "timestamp": timestamp });
                format!("data: {data}\n\n")
            }
            StreamKind::Bytes => format!("Bytes chunk {index}"),
            StreamKind::Iterator => format!("Iterator message {index}"),
            StreamKind::Json => {
                let data = json!({ "message": format!("JSON message {index}"), "timestamp": timestamp });
                format!("{data}\n")
            }
            StreamKind::AsyncIterator => format!("Async Iterator message {index}"),
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length and pacing of one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub count: u32,
    pub interval: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            count: 5,
            interval: Duration::from_secs(1),
        }
    }
}

/// Seconds since the Unix epoch with sub-second precision
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// Thread-sleeping producer. Call from a thread that may block.
#[derive(Debug)]
pub struct BlockingFeed {
    kind: StreamKind,
    settings: FeedSettings,
    next: u32,
}

impl BlockingFeed {
    pub fn new(kind: StreamKind, settings: FeedSettings) -> Self {
        Self {
            kind,
            settings,
            next: 0,
        }
    }
}

impl Iterator for BlockingFeed {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.settings.count {
            return None;
        }
        if self.next > 0 && !self.settings.interval.is_zero() {
            std::thread::sleep(self.settings.interval);
        }
        let chunk = self.kind.encode(self.next, unix_timestamp());
        self.next += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.settings.count.saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

/// Task-suspending producer
#[cfg(feature = "rt")]
pub fn async_feed(
    kind: StreamKind,
    settings: FeedSettings,
) -> impl futures::Stream<Item = String> + Send + 'static {
    futures::stream::unfold(0u32, move |index| async move {
        if index >= settings.count {
            return None;
        }
        if index > 0 && !settings.interval.is_zero() {
            tokio::time::sleep(settings.interval).await;
        }
        Some((kind.encode(index, unix_timestamp()), index + 1))
    })
}
