//! Abstraction for polled MIDI input sources.
//!
//! The run loop services every source in turn, so implementations must
//! return immediately when nothing is pending. A silent controller must never
//! starve the sequencing source.

use crate::error::{Error, Result};
use crate::MidiEvent;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Non-blocking MIDI input.
pub trait MidiSource: Send {
    fn name(&self) -> &str;

    /// Return the next pending event, or `None` immediately if there is none.
    ///
    /// An `Err` means the source is gone (device unplugged) and the caller
    /// should stop polling it.
    fn poll(&mut self) -> Result<Option<MidiEvent>>;

    /// Release the underlying device. Idempotent.
    fn close(&mut self) {}
}

impl<S: MidiSource + ?Sized> MidiSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn poll(&mut self) -> Result<Option<MidiEvent>> {
        (**self).poll()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    queue: VecDeque<MidiEvent>,
    disconnected: bool,
    closed: bool,
    polls: usize,
}

/// Scripted in-memory source.
///
/// Clones share the same queue, so a test can hand one clone to the run loop
/// and keep another to push events or inspect whether it was closed.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: Arc<str>,
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    pub fn with_events(self, events: impl IntoIterator<Item = MidiEvent>) -> Self {
        self.state.lock().queue.extend(events);
        self
    }

    pub fn push(&self, event: MidiEvent) {
        self.state.lock().queue.push_back(event);
    }

    /// Simulate an unplugged device. Events already queued are still
    /// delivered; the poll after the queue drains fails.
    pub fn disconnect(&self) {
        self.state.lock().disconnected = true;
    }

    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of times `poll` has been called across all clones.
    pub fn poll_count(&self) -> usize {
        self.state.lock().polls
    }
}

impl MidiSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self) -> Result<Option<MidiEvent>> {
        let mut state = self.state.lock();
        state.polls += 1;
        if state.closed {
            return Ok(None);
        }
        match state.queue.pop_front() {
            Some(event) => Ok(Some(event)),
            None if state.disconnected => Err(Error::Disconnected(self.name.to_string())),
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.state.lock().closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_in_order_then_empty() {
        let mut source = MemorySource::new("keys").with_events([
            MidiEvent::note_on(0, 60, 100),
            MidiEvent::note_off(0, 60, 0),
        ]);
        assert_eq!(source.poll().unwrap(), Some(MidiEvent::note_on(0, 60, 100)));
        assert_eq!(source.poll().unwrap(), Some(MidiEvent::note_off(0, 60, 0)));
        assert_eq!(source.poll().unwrap(), None);
        assert_eq!(source.poll_count(), 3);
    }

    #[test]
    fn test_clones_share_queue() {
        let source = MemorySource::new("keys");
        let mut handle = source.clone();
        source.push(MidiEvent::control_change(0, 14, 64));
        assert_eq!(handle.pending(), 1);
        assert!(handle.poll().unwrap().is_some());
        assert_eq!(source.pending(), 0);
    }

    #[test]
    fn test_disconnect_after_drain() {
        let mut source = MemorySource::new("pads").with_events([MidiEvent::note_on(9, 36, 90)]);
        source.disconnect();
        assert!(source.poll().unwrap().is_some());
        let err = source.poll().unwrap_err();
        assert!(matches!(err, Error::Disconnected(name) if name == "pads"));
    }

    #[test]
    fn test_close_is_idempotent_and_silences() {
        let mut source = MemorySource::new("keys").with_events([MidiEvent::note_on(0, 60, 1)]);
        source.close();
        source.close();
        assert!(source.is_closed());
        assert_eq!(source.poll().unwrap(), None);
    }

    #[test]
    fn test_boxed_source() {
        let memory = MemorySource::new("boxed").with_events([MidiEvent::note_on(0, 1, 1)]);
        let mut boxed: Box<dyn MidiSource> = Box::new(memory.clone());
        assert_eq!(boxed.name(), "boxed");
        assert!(boxed.poll().unwrap().is_some());
        boxed.close();
        assert!(memory.is_closed());
    }
}
