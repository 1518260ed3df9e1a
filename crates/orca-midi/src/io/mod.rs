//! Hardware MIDI input.
//!
//! Device enumeration and real-time input via midir.
//! Requires the `midi-io` feature.

mod input;

pub use input::{enumerate_ports, HardwareInput};
