//! Glyph strings for notes and controller values.

use crate::config::SequencerConfig;
use crate::glyph;
use crate::number::{self, DEFAULT_FRAMES_PER_BEAT};
use orca_midi::MidiEvent;

/// Written in place of a disabled field that still has enabled fields after it.
pub const PLACEHOLDER: char = '.';

/// Per-field toggles for note operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteFields {
    /// The leading `:<channel>` prefix. Without it only the pitch glyph is written.
    pub midi_operator: bool,
    pub octave: bool,
    pub velocity: bool,
    pub length: bool,
}

impl Default for NoteFields {
    fn default() -> Self {
        Self {
            midi_operator: true,
            octave: true,
            velocity: true,
            length: true,
        }
    }
}

/// Encode a note as `:<channel><octave><pitch><velocity><length>`.
///
/// Disabled fields become [`PLACEHOLDER`] so later fields keep their column.
/// Disabled fields at the end are dropped to leave neighbouring cells alone.
pub fn encode_note(event: &MidiEvent, fields: NoteFields, channel: u8, bpm: u32) -> String {
    let pitch = glyph::pitch_glyph(event.key);
    if !fields.midi_operator {
        return pitch.to_string();
    }

    let slots = [
        fields.octave.then(|| glyph::octave_digit(event.key)),
        Some(pitch),
        fields
            .velocity
            .then(|| number::to_base36_digit(event.value, 1)),
        fields
            .length
            .then(|| number::to_frame_digit(event.time_delta, bpm, DEFAULT_FRAMES_PER_BEAT)),
    ];
    let end = slots.iter().rposition(Option::is_some).map_or(0, |i| i + 1);

    let mut out = String::with_capacity(2 + end);
    out.push(':');
    out.push(number::digit(usize::from(channel)));
    out.extend(slots[..end].iter().map(|slot| slot.unwrap_or(PLACEHOLDER)));
    out
}

/// Encode a controller value, optionally as a `!<channel><knob><value>` operator.
pub fn encode_control(event: &MidiEvent, channel: u8, with_operator_prefix: bool) -> String {
    let value = number::to_base36_digit(event.value, 0);
    if !with_operator_prefix {
        return value.to_string();
    }
    let knob = number::digit(usize::from(event.key) % 36);
    format!("!{}{}{}", number::digit(usize::from(channel)), knob, value)
}

/// Encoder bound to one configuration.
#[derive(Debug, Clone, Copy)]
pub struct CommandEncoder {
    fields: NoteFields,
    cc_operator: bool,
    channel: u8,
    bpm: u32,
}

impl CommandEncoder {
    pub fn new(config: &SequencerConfig) -> Self {
        Self {
            fields: config.note_fields,
            cc_operator: config.cc_operator,
            channel: config.channel,
            bpm: config.bpm,
        }
    }

    pub fn note(&self, event: &MidiEvent) -> String {
        encode_note(event, self.fields, self.channel, self.bpm)
    }

    pub fn control(&self, event: &MidiEvent) -> String {
        encode_control(event, self.channel, self.cc_operator)
    }

    /// `<V>V<digit>`: a variable declaration holding a controller value.
    pub fn variable(&self, name: &str, event: &MidiEvent) -> String {
        format!("{}V{}", name, number::to_base36_digit(event.value, 0))
    }
}
