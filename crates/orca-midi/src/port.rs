//! Input port table and port selection.

use crate::error::{Error, Result};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An available MIDI input device, as enumerated at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiInputDevice {
    /// Device index (for connection)
    pub index: usize,
    pub name: String,
}

impl fmt::Display for MidiInputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.name)
    }
}

/// How the user refers to a port: by its enumeration index, or by a
/// case-insensitive substring of its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PortSelector {
    Index(usize),
    Name(String),
}

impl PortSelector {
    /// Look the selector up in a port table. Name matches pick the first device.
    pub fn resolve<'a>(&self, devices: &'a [MidiInputDevice]) -> Result<&'a MidiInputDevice> {
        let found = match self {
            PortSelector::Index(index) => devices.iter().find(|d| d.index == *index),
            PortSelector::Name(name) => {
                let needle = name.to_lowercase();
                devices
                    .iter()
                    .find(|d| d.name.to_lowercase().contains(&needle))
            }
        };
        found.ok_or_else(|| Error::PortNotFound(self.to_string()))
    }
}

impl FromStr for PortSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<usize>() {
            Ok(index) => PortSelector::Index(index),
            Err(_) => PortSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for PortSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSelector::Index(index) => write!(f, "port {}", index),
            PortSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}
