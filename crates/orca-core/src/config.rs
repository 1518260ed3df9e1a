//! Sequencer configuration, built once at startup and read-only afterwards.

use crate::encoder::NoteFields;
use crate::error::{Error, Result};
use crate::location::{Location, LocationManager};
use crate::sink::DEFAULT_DESTINATION;
use orca_midi::PortSelector;
use std::collections::BTreeMap;
use std::net::SocketAddr;

pub const DEFAULT_BPM: u32 = 120;

/// Actions a controller note can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    NextLocation,
    PreviousLocation,
    Play,
    Stop,
}

/// Controller keys bound to actions. Notes for everything except
/// `scroll_location`, which is a CC number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bindings {
    pub next_location: Option<u8>,
    pub previous_location: Option<u8>,
    pub scroll_location: Option<u8>,
    pub play: Option<u8>,
    pub stop: Option<u8>,
}

impl Bindings {
    fn note_bindings(&self) -> [(Option<u8>, NoteAction); 4] {
        [
            (self.next_location, NoteAction::NextLocation),
            (self.previous_location, NoteAction::PreviousLocation),
            (self.play, NoteAction::Play),
            (self.stop, NoteAction::Stop),
        ]
    }

    /// First action bound to `key`.
    pub fn note_action(&self, key: u8) -> Option<NoteAction> {
        self.note_bindings()
            .into_iter()
            .find(|(bound, _)| *bound == Some(key))
            .map(|(_, action)| action)
    }

    pub fn is_empty(&self) -> bool {
        *self == Bindings::default()
    }

    fn uses_locations(&self) -> bool {
        self.next_location.is_some()
            || self.previous_location.is_some()
            || self.scroll_location.is_some()
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SequencerConfig {
    pub sequencing_port: PortSelector,
    pub controller_port: Option<PortSelector>,
    pub note_fields: NoteFields,
    /// Prefix CC values with the `!` operator.
    pub cc_operator: bool,
    /// CC numbers whose values update a variable declaration instead.
    pub cc_variables: BTreeMap<u8, String>,
    pub bindings: Bindings,
    pub locations: Vec<Location>,
    pub reset_indices_on_switch: bool,
    pub carry_over_indices_on_switch: bool,
    pub bpm: u32,
    pub channel: u8,
    pub cc_offset: u8,
    pub destination: SocketAddr,
    /// Don't start playback on connect.
    pub quiet: bool,
}

impl SequencerConfig {
    pub fn builder() -> SequencerConfigBuilder {
        SequencerConfigBuilder::default()
    }

    /// Fresh cursor state over the configured locations, if there are any.
    pub fn location_manager(&self) -> Option<LocationManager> {
        LocationManager::new(self.locations.clone())
            .ok()
            .map(|manager| {
                manager
                    .reset_indices_on_switch(self.reset_indices_on_switch)
                    .carry_over_indices_on_switch(self.carry_over_indices_on_switch)
            })
    }

    pub fn cc_variable(&self, control: u8) -> Option<&str> {
        self.cc_variables.get(&control).map(String::as_str)
    }
}

pub struct SequencerConfigBuilder {
    sequencing_port: Option<PortSelector>,
    controller_port: Option<PortSelector>,
    note_fields: NoteFields,
    cc_operator: bool,
    cc_variables: Vec<(u8, String)>,
    bindings: Bindings,
    locations: Vec<Location>,
    reset_indices_on_switch: bool,
    carry_over_indices_on_switch: bool,
    bpm: u32,
    channel: u8,
    cc_offset: u8,
    destination: SocketAddr,
    quiet: bool,
}

impl Default for SequencerConfigBuilder {
    fn default() -> Self {
        Self {
            sequencing_port: None,
            controller_port: None,
            note_fields: NoteFields::default(),
            cc_operator: true,
            cc_variables: Vec::new(),
            bindings: Bindings::default(),
            locations: Vec::new(),
            reset_indices_on_switch: false,
            carry_over_indices_on_switch: true,
            bpm: DEFAULT_BPM,
            channel: 0,
            cc_offset: 0,
            destination: DEFAULT_DESTINATION,
            quiet: false,
        }
    }
}

impl SequencerConfigBuilder {
    pub fn sequencing_port(mut self, port: PortSelector) -> Self {
        self.sequencing_port = Some(port);
        self
    }

    pub fn controller_port(mut self, port: PortSelector) -> Self {
        self.controller_port = Some(port);
        self
    }

    pub fn note_fields(mut self, fields: NoteFields) -> Self {
        self.note_fields = fields;
        self
    }

    pub fn cc_operator(mut self, enabled: bool) -> Self {
        self.cc_operator = enabled;
        self
    }

    pub fn cc_variable(mut self, control: u8, name: impl Into<String>) -> Self {
        self.cc_variables.push((control, name.into()));
        self
    }

    pub fn bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.locations.extend(locations);
        self
    }

    pub fn reset_indices_on_switch(mut self, enabled: bool) -> Self {
        self.reset_indices_on_switch = enabled;
        self
    }

    pub fn carry_over_indices_on_switch(mut self, enabled: bool) -> Self {
        self.carry_over_indices_on_switch = enabled;
        self
    }

    pub fn bpm(mut self, bpm: u32) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn cc_offset(mut self, offset: u8) -> Self {
        self.cc_offset = offset;
        self
    }

    pub fn destination(mut self, destination: SocketAddr) -> Self {
        self.destination = destination;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn build(self) -> Result<SequencerConfig> {
        let sequencing_port = self
            .sequencing_port
            .ok_or_else(|| Error::config("a sequencing MIDI port is required"))?;

        if self.bpm == 0 {
            return Err(Error::config("bpm must be greater than 0"));
        }
        if self.channel >= 16 {
            return Err(Error::config(format!(
                "MIDI channel {} is out of range (0-15)",
                self.channel
            )));
        }
        if self.controller_port.as_ref() == Some(&sequencing_port) {
            return Err(Error::config(format!(
                "controller {} is also the sequencing port",
                sequencing_port
            )));
        }

        let mut cc_variables = BTreeMap::new();
        for (control, name) in self.cc_variables {
            if control > 127 {
                return Err(Error::config(format!("CC {} is out of range (0-127)", control)));
            }
            if name.is_empty() {
                return Err(Error::config(format!("CC {} has no variable name", control)));
            }
            if let Some(existing) = cc_variables.insert(control, name) {
                return Err(Error::config(format!(
                    "CC {} is bound more than once (first to '{}')",
                    control, existing
                )));
            }
        }

        if !self.bindings.is_empty() && self.controller_port.is_none() {
            return Err(Error::config("controller bindings need a --controller port"));
        }
        for location in &self.locations {
            location.validate()?;
        }
        if self.bindings.uses_locations() && self.locations.is_empty() {
            return Err(Error::config("location bindings need at least one location"));
        }
        let notes = self.bindings.note_bindings();
        for (i, (key, action)) in notes.iter().enumerate() {
            let Some(key) = key else { continue };
            if let Some((_, other)) = notes[i + 1..].iter().find(|(k, _)| k == &Some(*key)) {
                return Err(Error::config(format!(
                    "note {} is bound to both {:?} and {:?}",
                    key, action, other
                )));
            }
        }

        Ok(SequencerConfig {
            sequencing_port,
            controller_port: self.controller_port,
            note_fields: self.note_fields,
            cc_operator: self.cc_operator,
            cc_variables,
            bindings: self.bindings,
            locations: self.locations,
            reset_indices_on_switch: self.reset_indices_on_switch,
            carry_over_indices_on_switch: self.carry_over_indices_on_switch,
            bpm: self.bpm,
            channel: self.channel,
            cc_offset: self.cc_offset,
            destination: self.destination,
            quiet: self.quiet,
        })
    }
}

/// Parse a `--cc` binding of the form `ID:VAR`.
pub fn parse_cc_binding(s: &str) -> Result<(u8, String)> {
    let (id, name) = s
        .split_once(':')
        .ok_or_else(|| Error::config(format!("CC binding '{}': expected ID:VAR", s)))?;
    let id: u32 = id
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("CC binding '{}': '{}' is not a number", s, id)))?;
    if id > 127 {
        return Err(Error::config(format!("CC {} is out of range (0-127)", id)));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::config(format!("CC binding '{}' has no variable name", s)));
    }
    Ok((id as u8, name.to_string()))
}

/// Parse a `-l` location of the form `X;Y[;HEIGHT]`.
pub fn parse_location(s: &str) -> Result<Location> {
    s.parse()
}
