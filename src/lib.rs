//! # orca-midi-in - Sequence the Orca grid from MIDI
//!
//! Play a MIDI controller and have notes and knobs written live onto the
//! Orca grid as text commands over UDP.
//!
//! ## Architecture
//!
//! orca-midi-in is an umbrella crate that coordinates:
//! - **orca-midi** - MIDI input (events, polled sources, hardware ports)
//! - **orca-core** - Glyph encoding, cursor locations, event routing, run loop
//!
//! ## Quick Start
//!
//! ```ignore
//! use orca_midi_in::prelude::*;
//!
//! let config = SequencerConfig::builder()
//!     .sequencing_port(PortSelector::Index(0))
//!     .cc_variable(14, "a")
//!     .location("3;4;16".parse()?)
//!     .build()?;
//!
//! let mut bridge = Bridge::builder(config).build()?;
//! let stop = bridge.stop_handle();
//! bridge.run()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Hardware MIDI input
//! - `midi-io` - Hardware MIDI input via midir

/// Re-export of orca-core for direct access
pub use orca_core as core;

/// Re-export of orca-midi for direct access
pub use orca_midi as midi;

pub use orca_core::{
    Bindings, CommandLog, CommandSink, Dispatch, EventRouter, Location, LocationManager,
    NoteAction, NoteFields, OrcaCommand, RunLoop, SequencerConfig, SequencerConfigBuilder,
    SourceRole, StopHandle, UdpSink,
};

pub use orca_midi::{MemorySource, MidiEvent, MidiEventKind, MidiInputDevice, MidiSource, PortSelector};

#[cfg(feature = "midi-io")]
pub use orca_midi::{enumerate_ports, HardwareInput};

mod error;
pub use error::{Error, Result};

mod bridge;
mod builder;

pub use bridge::Bridge;
pub use builder::BridgeBuilder;

pub mod cli;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Bridge, BridgeBuilder};

    pub use crate::core::{CommandLog, Location, SequencerConfig, StopHandle};

    pub use crate::midi::{MemorySource, MidiEvent, MidiSource, PortSelector};
}
