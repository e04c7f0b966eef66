//! Named output channels.
//!
//! Each logical destination (for example the `Epinio` log channel) gets one
//! shared buffer. Opening the same name twice returns the same buffer.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Name of the channel application logs are written to.
pub const DEFAULT_CHANNEL: &str = "Epinio";

/// A shared, append-only text buffer.
#[derive(Debug, Default)]
pub struct OutputChannel {
    name: String,
    buffer: Mutex<String>,
}

impl OutputChannel {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), buffer: Mutex::new(String::new()) }
    }

    /// Channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append text as-is.
    pub fn append(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }

    /// Append text followed by a newline.
    pub fn append_line(&self, text: &str) {
        let mut buffer = self.buffer.lock();
        buffer.push_str(text);
        buffer.push('\n');
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    /// Snapshot of the buffer.
    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }
}

/// Registry of open channels keyed by name.
#[derive(Debug, Default)]
pub struct OutputChannels {
    channels: Mutex<HashMap<String, Arc<OutputChannel>>>,
}

impl OutputChannels {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a channel, reusing the existing one with the same name.
    pub fn open(&self, name: &str) -> Arc<OutputChannel> {
        Arc::clone(
            self.channels
                .lock()
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(OutputChannel::new(name))),
        )
    }

    /// Close a channel. The next `open` of that name starts empty.
    pub fn close(&self, name: &str) -> bool {
        self.channels.lock().remove(name).is_some()
    }

    /// Number of open channels.
    pub fn len(&self) -> usize {
        self.channels.lock().len()
    }

    /// Whether no channel is open.
    pub fn is_empty(&self) -> bool {
        self.channels.lock().is_empty()
    }
}
