//! Note and controller events decoded from raw MIDI bytes.

use midi_msg::{Channel, ChannelVoiceMsg, ControlChange, MidiMsg};
use std::fmt;

/// Channel-voice messages the sequencer reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MidiEventKind {
    NoteOn,
    NoteOff,
    ControlChange,
}

impl fmt::Display for MidiEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MidiEventKind::NoteOn => "note_on",
            MidiEventKind::NoteOff => "note_off",
            MidiEventKind::ControlChange => "control_change",
        })
    }
}

/// A single MIDI gesture, created per poll and consumed once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MidiEvent {
    pub kind: MidiEventKind,
    /// MIDI channel (0-15).
    pub channel: u8,
    /// Note number for note events, controller number for CC.
    pub key: u8,
    /// Velocity for note events, controller value for CC.
    pub value: u8,
    /// Seconds since the previous event on the same source.
    pub time_delta: f64,
}

impl MidiEvent {
    #[inline]
    pub fn new(kind: MidiEventKind, channel: u8, key: u8, value: u8) -> Self {
        Self {
            kind,
            channel: channel & 0x0F,
            key: key & 0x7F,
            value: value & 0x7F,
            time_delta: 0.0,
        }
    }

    #[inline]
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(MidiEventKind::NoteOn, channel, note, velocity)
    }

    #[inline]
    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(MidiEventKind::NoteOff, channel, note, velocity)
    }

    #[inline]
    pub fn control_change(channel: u8, control: u8, value: u8) -> Self {
        Self::new(MidiEventKind::ControlChange, channel, control, value)
    }

    #[inline]
    pub fn with_time_delta(mut self, seconds: f64) -> Self {
        self.time_delta = seconds.max(0.0);
        self
    }

    /// Decode a raw message. Only note-on, note-off and control change are
    /// recognised; everything else (clock, sysex, pitch bend...) is `None`.
    ///
    /// A note-on with velocity 0 is kept as `NoteOn` with value 0.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (msg, _len) = MidiMsg::from_midi(bytes).ok()?;
        Self::from_midi_msg(&msg)
    }

    pub fn from_midi_msg(msg: &MidiMsg) -> Option<Self> {
        let MidiMsg::ChannelVoice { channel, msg } = msg else {
            return None;
        };
        let channel = *channel as u8;
        match *msg {
            ChannelVoiceMsg::NoteOn { note, velocity } => {
                Some(Self::note_on(channel, note, velocity))
            }
            ChannelVoiceMsg::NoteOff { note, velocity } => {
                Some(Self::note_off(channel, note, velocity))
            }
            ChannelVoiceMsg::ControlChange {
                control: ControlChange::CC { control, value },
            } => Some(Self::control_change(channel, control, value)),
            _ => None,
        }
    }

    pub fn to_midi_msg(&self) -> MidiMsg {
        let msg = match self.kind {
            MidiEventKind::NoteOn => ChannelVoiceMsg::NoteOn {
                note: self.key,
                velocity: self.value,
            },
            MidiEventKind::NoteOff => ChannelVoiceMsg::NoteOff {
                note: self.key,
                velocity: self.value,
            },
            MidiEventKind::ControlChange => ChannelVoiceMsg::ControlChange {
                control: ControlChange::CC {
                    control: self.key,
                    value: self.value,
                },
            },
        };
        MidiMsg::ChannelVoice {
            channel: Channel::from_u8(self.channel),
            msg,
        }
    }

    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_midi_msg().to_midi()
    }
}

impl fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, value) = match self.kind {
            MidiEventKind::ControlChange => ("control", "value"),
            _ => ("note", "velocity"),
        };
        write!(
            f,
            "{} channel={} {}={} {}={} time={:.3}",
            self.kind, self.channel, key, self.key, value, self.value, self.time_delta
        )
    }
}
