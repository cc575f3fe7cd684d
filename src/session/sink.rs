//! Host-facing event and message channels

use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::models::HostEvent;

/// Receives one event per completed property check
pub trait EventSink: Send + Sync {
    fn handle(&self, event: HostEvent);

    /// Human-readable report line for the same check
    fn log(&self, _line: &str) {}
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<HostEvent>>,
    lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl EventSink for CollectingSink {
    fn handle(&self, event: HostEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn log(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Forwards events to an async consumer
impl EventSink for UnboundedSender<HostEvent> {
    fn handle(&self, event: HostEvent) {
        if self.send(event).is_err() {
            warn!("Event receiver dropped; event discarded");
        }
    }
}

/// Delivers runner messages from a worker to the coordinator
pub trait MessageChannel: Send + Sync {
    fn send(&self, message: String);
}

impl MessageChannel for UnboundedSender<String> {
    fn send(&self, message: String) {
        if UnboundedSender::send(self, message).is_err() {
            warn!("Coordinator channel closed; message discarded");
        }
    }
}

impl MessageChannel for Mutex<Vec<String>> {
    fn send(&self, message: String) {
        if let Ok(mut messages) = self.lock() {
            messages.push(message);
        }
    }
}
