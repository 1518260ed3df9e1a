//! Base-36 number encoding for single grid cells.
//!
//! The grid has one character per cell, so every magnitude is squeezed into
//! `0-9a-z`. `'0'` is reserved for a true zero.

/// The grid's 36-symbol numeric alphabet.
pub const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Highest index into [`ALPHABET`].
pub const MAX_DIGIT: usize = 35;

/// Grid frames per beat used for note lengths.
pub const DEFAULT_FRAMES_PER_BEAT: u32 = 8;

/// Alphabet symbol at `index`, clamped to `'z'`.
#[inline]
pub fn digit(index: usize) -> char {
    ALPHABET[index.min(MAX_DIGIT)] as char
}

/// Compress a MIDI magnitude (0-127) into one base-36 digit.
///
/// Zero always maps to `'0'`. Any other value maps to
/// `floor(n / 127 * 36) - 1`, floored at `min`, so callers can keep quiet
/// non-zero values away from the silence digit.
pub fn to_base36_digit(n: u8, min: usize) -> char {
    if n == 0 {
        return '0';
    }
    let scaled = usize::from(n) * 36 / 127;
    digit(scaled.saturating_sub(1).max(min))
}

/// Quantize a duration into grid frames at the given tempo, clamped to `'z'`.
pub fn to_frame_digit(seconds: f64, bpm: u32, frames_per_beat: u32) -> char {
    let fps = f64::from(bpm) / 60.0 * f64::from(frames_per_beat);
    let frames = (seconds * fps).floor();
    if frames.is_nan() || frames <= 0.0 {
        return digit(0);
    }
    digit(frames.min(MAX_DIGIT as f64) as usize)
}
