//! Pitch-class glyphs and octaves for the grid's note alphabet.
//!
//! Naturals are uppercase, sharps lowercase, starting from A (MIDI 21).

use crate::number;

/// Pitch-class glyphs indexed by `(note - 21) mod 12`.
pub const GLYPHS: [char; 12] = ['A', 'a', 'B', 'C', 'c', 'D', 'd', 'E', 'F', 'f', 'G', 'g'];

#[inline]
pub fn pitch_glyph(note: u8) -> char {
    GLYPHS[(i32::from(note) - 21).rem_euclid(12) as usize]
}

/// Octave of a MIDI note, `-1` for the lowest twelve notes.
#[inline]
pub fn octave(note: u8) -> i32 {
    -1 + i32::from(note - note % 12) / 12
}

/// Octave as a single grid digit. Octave `-1` has no cell representation
/// and is written as `'0'`.
#[inline]
pub fn octave_digit(note: u8) -> char {
    number::digit(octave(note).max(0) as usize)
}
