//! MIDI input subsystem for orca-midi-in.
//!
//! Provides the note/CC event model, the polled [`MidiSource`] abstraction,
//! port enumeration and selection, and hardware input.
//!
//! Feature gates: `midi-io` (hardware input via midir).
//!
//! # Example
//!
//! ```ignore
//! use orca_midi::{enumerate_ports, HardwareInput, MidiSource, PortSelector};
//!
//! let devices = enumerate_ports()?;
//! let device = PortSelector::Name("Keystep".into()).resolve(&devices)?;
//! let mut input = HardwareInput::open(device)?;
//!
//! if let Some(event) = input.poll()? {
//!     println!("{event}");
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

pub(crate) mod event;
pub use event::{MidiEvent, MidiEventKind};

pub(crate) mod port;
pub use port::{MidiInputDevice, PortSelector};

pub(crate) mod source;
pub use source::{MemorySource, MidiSource};

#[cfg(feature = "midi-io")]
pub(crate) mod io;

#[cfg(feature = "midi-io")]
pub use io::{enumerate_ports, HardwareInput};
