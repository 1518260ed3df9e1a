//! Bridge that wires MIDI sources through the router to the grid.

use crate::{BridgeBuilder, Result};
use orca_core::{CommandSink, RunLoop, SequencerConfig, StopHandle};
use std::sync::Arc;

/// A configured MIDI-to-grid session.
///
/// Owns the run loop and therefore every opened source; dropping the bridge
/// releases them.
pub struct Bridge {
    config: Arc<SequencerConfig>,
    run_loop: RunLoop<Box<dyn CommandSink>>,
    started: bool,
}

impl Bridge {
    pub fn builder(config: SequencerConfig) -> BridgeBuilder {
        BridgeBuilder::new(config)
    }

    pub(crate) fn new(config: Arc<SequencerConfig>, run_loop: RunLoop<Box<dyn CommandSink>>) -> Self {
        Self {
            config,
            run_loop,
            started: false,
        }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Handle for stopping [`run`](Self::run) from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.run_loop.stop_handle()
    }

    /// Announce tempo and CC offset, and start playback unless quiet.
    /// Only the first call sends anything.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        tracing::info!(
            "Sequencing from {} at {} bpm",
            self.config.sequencing_port,
            self.config.bpm
        );
        self.run_loop.router_mut().announce();
    }

    /// Poll every source once. Starts the session if needed.
    pub fn pass(&mut self) -> Result<usize> {
        self.start();
        Ok(self.run_loop.pass()?)
    }

    /// Run until the stop handle fires or a source fails. Sources are closed
    /// on return either way.
    pub fn run(&mut self) -> Result<()> {
        self.start();
        self.run_loop.run()?;
        Ok(())
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
