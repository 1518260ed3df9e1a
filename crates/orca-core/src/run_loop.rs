//! Single-threaded polling driver.
//!
//! Each pass polls every source once, in the order they were added, and
//! routes at most one event per source. Sources are closed on every exit
//! path: normal stop, source failure, or drop.

use crate::error::Result;
use crate::router::{EventRouter, SourceRole};
use crate::sink::CommandSink;
use orca_midi::MidiSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Clonable stop signal for a running loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct RunLoop<S> {
    router: EventRouter<S>,
    sources: Vec<(SourceRole, Box<dyn MidiSource>)>,
    stop: StopHandle,
    idle_sleep: Duration,
}

impl<S: CommandSink> RunLoop<S> {
    pub fn new(router: EventRouter<S>) -> Self {
        Self {
            router,
            sources: Vec::new(),
            stop: StopHandle::new(),
            idle_sleep: DEFAULT_IDLE_SLEEP,
        }
    }

    pub fn with_source(mut self, role: SourceRole, source: impl MidiSource + 'static) -> Self {
        self.add_source(role, Box::new(source));
        self
    }

    pub fn add_source(&mut self, role: SourceRole, source: Box<dyn MidiSource>) {
        tracing::debug!("Added {} source '{}'", role, source.name());
        self.sources.push((role, source));
    }

    /// How long to sleep after a pass that found no events.
    pub fn idle_sleep(mut self, sleep: Duration) -> Self {
        self.idle_sleep = sleep;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn router(&self) -> &EventRouter<S> {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut EventRouter<S> {
        &mut self.router
    }

    /// Poll every source once. Returns the number of events routed.
    pub fn pass(&mut self) -> Result<usize> {
        let mut handled = 0;
        for (role, source) in self.sources.iter_mut() {
            let event = match source.poll() {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!("{} source '{}' failed: {}", role, source.name(), e);
                    return Err(e.into());
                }
            };
            if let Some(event) = event {
                self.router.handle(*role, &event);
                handled += 1;
            }
        }
        Ok(handled)
    }

    /// Run until stopped or a source fails, then close all sources.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Polling {} source(s)", self.sources.len());
        let result = self.drive();
        self.close_sources();
        result
    }

    fn drive(&mut self) -> Result<()> {
        while !self.stop.is_stopped() {
            if self.pass()? == 0 {
                std::thread::sleep(self.idle_sleep);
            }
        }
        tracing::info!("Stop requested");
        Ok(())
    }

    pub fn close_sources(&mut self) {
        for (_, source) in self.sources.iter_mut() {
            source.close();
        }
    }
}

impl<S> Drop for RunLoop<S> {
    fn drop(&mut self) {
        for (_, source) in self.sources.iter_mut() {
            source.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SequencerConfig;
    use crate::sink::CommandLog;
    use orca_midi::{MemorySource, MidiEvent, PortSelector};

    fn run_loop() -> (RunLoop<CommandLog>, CommandLog) {
        let config = SequencerConfig::builder()
            .sequencing_port(PortSelector::Index(0))
            .build()
            .unwrap();
        let log = CommandLog::new();
        let router = EventRouter::new(Arc::new(config), log.clone());
        (RunLoop::new(router).idle_sleep(Duration::ZERO), log)
    }

    #[test]
    fn test_one_event_per_source_per_pass() {
        let sequencing = MemorySource::new("keys").with_events([
            MidiEvent::note_off(0, 60, 100),
            MidiEvent::note_off(0, 62, 100),
        ]);
        let controller = MemorySource::new("pads").with_events([MidiEvent::note_on(0, 36, 100)]);
        let (run_loop, _log) = run_loop();
        let mut run_loop = run_loop
            .with_source(SourceRole::Sequencing, sequencing.clone())
            .with_source(SourceRole::Controller, controller.clone());

        assert_eq!(run_loop.pass().unwrap(), 2);
        assert_eq!(sequencing.pending(), 1);
        assert_eq!(controller.pending(), 0);
        assert_eq!(run_loop.pass().unwrap(), 1);
        assert_eq!(run_loop.pass().unwrap(), 0);
    }

    #[test]
    fn test_silent_source_does_not_starve_other() {
        let silent = MemorySource::new("pads");
        let keys = MemorySource::new("keys").with_events([MidiEvent::note_off(0, 60, 100)]);
        let (run_loop, log) = run_loop();
        let mut run_loop = run_loop
            .with_source(SourceRole::Controller, silent.clone())
            .with_source(SourceRole::Sequencing, keys);

        assert_eq!(run_loop.pass().unwrap(), 1);
        assert_eq!(log.len(), 1);
        assert_eq!(silent.poll_count(), 1);
    }

    #[test]
    fn test_disconnect_stops_and_closes() {
        let keys = MemorySource::new("keys").with_events([MidiEvent::note_off(0, 60, 100)]);
        let pads = MemorySource::new("pads");
        keys.disconnect();
        let (run_loop, log) = run_loop();
        let mut run_loop = run_loop
            .with_source(SourceRole::Sequencing, keys.clone())
            .with_source(SourceRole::Controller, pads.clone());

        assert!(run_loop.run().is_err());
        assert_eq!(log.commands(), vec!["write::04Cr0"]);
        assert!(keys.is_closed());
        assert!(pads.is_closed());
    }

    #[test]
    fn test_stop_handle_ends_run() {
        let keys = MemorySource::new("keys");
        let (run_loop, _log) = run_loop();
        let mut run_loop = run_loop.with_source(SourceRole::Sequencing, keys.clone());
        let stop = run_loop.stop_handle();

        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            stop.stop();
        });
        run_loop.run().unwrap();
        stopper.join().unwrap();
        assert!(keys.is_closed());
    }

    #[test]
    fn test_drop_closes_sources() {
        let keys = MemorySource::new("keys");
        let (run_loop, _log) = run_loop();
        let run_loop = run_loop.with_source(SourceRole::Sequencing, keys.clone());
        drop(run_loop);
        assert!(keys.is_closed());
    }
}
