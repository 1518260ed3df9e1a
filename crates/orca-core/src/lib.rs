//! Routing core for sequencing the Orca grid from MIDI.
//!
//! # Primary API
//!
//! - [`SequencerConfig`] / [`SequencerConfigBuilder`]: Immutable startup configuration
//! - [`EventRouter`]: Turns MIDI events into grid commands
//! - [`RunLoop`] / [`StopHandle`]: Polls sources and feeds the router
//! - [`LocationManager`]: Write-cursor state across grid locations
//! - [`CommandSink`]: Where commands go ([`UdpSink`], [`CommandLog`])
//!
//! # Example
//!
//! ```ignore
//! use orca_core::{CommandLog, EventRouter, RunLoop, SequencerConfig, SourceRole};
//! use orca_midi::{MemorySource, MidiEvent, PortSelector};
//! use std::sync::Arc;
//!
//! let config = SequencerConfig::builder()
//!     .sequencing_port(PortSelector::Index(0))
//!     .cc_variable(14, "a")
//!     .build()?;
//!
//! let keys = MemorySource::new("keys").with_events([MidiEvent::control_change(0, 14, 64)]);
//! let mut run_loop = RunLoop::new(EventRouter::new(Arc::new(config), CommandLog::new()))
//!     .with_source(SourceRole::Sequencing, keys);
//!
//! run_loop.pass()?; // find:aV, write:aVh
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod number;
pub use number::{to_base36_digit, to_frame_digit};

pub mod glyph;

pub(crate) mod location;
pub use location::{Location, LocationManager, DEFAULT_HEIGHT, SCROLL_UP_ABOVE};

pub(crate) mod config;
pub use config::{
    parse_cc_binding, parse_location, Bindings, NoteAction, SequencerConfig,
    SequencerConfigBuilder, DEFAULT_BPM,
};

pub(crate) mod command;
pub use command::OrcaCommand;

pub(crate) mod encoder;
pub use encoder::{encode_control, encode_note, CommandEncoder, NoteFields, PLACEHOLDER};

pub(crate) mod sink;
pub use sink::{CommandLog, CommandSink, UdpSink, DEFAULT_DESTINATION};

pub(crate) mod router;
pub use router::{Dispatch, EventRouter, SourceRole};

pub(crate) mod run_loop;
pub use run_loop::{RunLoop, StopHandle};
