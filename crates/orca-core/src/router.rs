//! Event routing: decides, per MIDI event, which commands to emit and where.
//!
//! Routing is a closed table over `(SourceRole, MidiEventKind)`:
//!
//! ```text
//! Sequencing  NoteOn         no-op
//! Sequencing  NoteOff        write note at cursor, scroll current location, select
//! Sequencing  ControlChange  bound variable: find + write, else write CC operator
//! Controller  NoteOn         bound action: next / previous location, play, stop
//! Controller  NoteOff        no-op
//! Controller  ControlChange  scroll binding: scroll current location, select
//! ```
//!
//! Anything without a matching binding is ignored; the router never fails on
//! input. Transmission errors are logged and dropped.

use crate::command::OrcaCommand;
use crate::config::{NoteAction, SequencerConfig};
use crate::encoder::CommandEncoder;
use crate::location::LocationManager;
use crate::sink::CommandSink;
use orca_midi::{MidiEvent, MidiEventKind};
use std::fmt;
use std::sync::Arc;

/// Which input an event arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRole {
    /// Notes and CCs to sequence onto the grid.
    Sequencing,
    /// Performance controls bound to actions.
    Controller,
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceRole::Sequencing => "sequencing",
            SourceRole::Controller => "controller",
        })
    }
}

/// What the router did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Ignored,
    Note,
    Variable,
    Control,
    Action(NoteAction),
    Scroll,
}

pub struct EventRouter<S> {
    config: Arc<SequencerConfig>,
    encoder: CommandEncoder,
    locations: Option<LocationManager>,
    sink: S,
}

impl<S: CommandSink> EventRouter<S> {
    pub fn new(config: Arc<SequencerConfig>, sink: S) -> Self {
        Self {
            encoder: CommandEncoder::new(&config),
            locations: config.location_manager(),
            config,
            sink,
        }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn locations(&self) -> Option<&LocationManager> {
        self.locations.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Push tempo and CC offset, place the cursor, and start playback unless quiet.
    pub fn announce(&mut self) {
        self.emit(OrcaCommand::Bpm(self.config.bpm));
        self.emit(OrcaCommand::CcOffset(self.config.cc_offset));
        if let Some(position) = self.current_position() {
            self.emit(OrcaCommand::select(position));
        }
        if !self.config.quiet {
            self.emit(OrcaCommand::Play);
        }
    }

    pub fn handle(&mut self, role: SourceRole, event: &MidiEvent) -> Dispatch {
        tracing::debug!("{} <- {}", role, event);
        let dispatch = match (role, event.kind) {
            (SourceRole::Sequencing, MidiEventKind::NoteOn) => Dispatch::Ignored,
            (SourceRole::Sequencing, MidiEventKind::NoteOff) => self.sequence_note(event),
            (SourceRole::Sequencing, MidiEventKind::ControlChange) => {
                self.sequence_control(event)
            }
            (SourceRole::Controller, MidiEventKind::NoteOn) => self.trigger(event),
            (SourceRole::Controller, MidiEventKind::NoteOff) => Dispatch::Ignored,
            (SourceRole::Controller, MidiEventKind::ControlChange) => self.scroll(event),
        };
        if dispatch == Dispatch::Ignored {
            tracing::debug!("No route for {} {} {}", role, event.kind, event.key);
        }
        dispatch
    }

    fn sequence_note(&mut self, event: &MidiEvent) -> Dispatch {
        self.emit(OrcaCommand::write(self.encoder.note(event)));
        let position = self.locations.as_mut().map(|manager| {
            manager.current_mut().scroll(1);
            manager.current().position()
        });
        if let Some(position) = position {
            self.emit(OrcaCommand::select(position));
        }
        Dispatch::Note
    }

    fn sequence_control(&mut self, event: &MidiEvent) -> Dispatch {
        let config = Arc::clone(&self.config);
        match config.cc_variable(event.key) {
            Some(name) => {
                // find must land before the overwrite
                self.emit(OrcaCommand::find(format!("{}V", name)));
                self.emit(OrcaCommand::write(self.encoder.variable(name, event)));
                Dispatch::Variable
            }
            None => {
                self.emit(OrcaCommand::write(self.encoder.control(event)));
                Dispatch::Control
            }
        }
    }

    fn trigger(&mut self, event: &MidiEvent) -> Dispatch {
        // Zero-velocity note-on is a release on most controllers.
        if event.value == 0 {
            return Dispatch::Ignored;
        }
        let Some(action) = self.config.bindings.note_action(event.key) else {
            return Dispatch::Ignored;
        };
        match action {
            NoteAction::NextLocation | NoteAction::PreviousLocation => {
                let Some(manager) = self.locations.as_mut() else {
                    return Dispatch::Ignored;
                };
                let location = if action == NoteAction::NextLocation {
                    manager.next()
                } else {
                    manager.previous()
                };
                let position = location.position();
                self.emit(OrcaCommand::select(position));
            }
            NoteAction::Play => self.emit(OrcaCommand::Play),
            NoteAction::Stop => self.emit(OrcaCommand::Stop),
        }
        Dispatch::Action(action)
    }

    fn scroll(&mut self, event: &MidiEvent) -> Dispatch {
        if self.config.bindings.scroll_location != Some(event.key) {
            return Dispatch::Ignored;
        }
        let Some(manager) = self.locations.as_mut() else {
            return Dispatch::Ignored;
        };
        manager.current_mut().scroll_by_control(event.value);
        let position = manager.current().position();
        self.emit(OrcaCommand::select(position));
        Dispatch::Scroll
    }

    fn current_position(&self) -> Option<(u32, u32)> {
        self.locations
            .as_ref()
            .map(|manager| manager.current().position())
    }

    fn emit(&mut self, command: OrcaCommand) {
        tracing::info!("{}", command);
        if let Err(e) = self.sink.send(&command) {
            tracing::warn!("Failed to send '{}': {}", command, e);
        }
    }
}

impl<S> fmt::Debug for EventRouter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("encoder", &self.encoder)
            .field("locations", &self.locations)
            .finish_non_exhaustive()
    }
}
