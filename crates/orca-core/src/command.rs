//! Text commands understood by the grid's UDP listener.
//!
//! One command per datagram, rendered by [`OrcaCommand`]'s `Display`:
//!
//! ```text
//! find:<string>
//! select:<x>;<y>;<width>;<height>
//! write:<glyphs>            write:<glyphs>;<x>;<y>
//! bpm:<n>
//! cc:<n>
//! play
//! stop
//! ```

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrcaCommand {
    /// Move the cursor to the first match of a string.
    Find(String),
    Select {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Write glyphs at the cursor, or at explicit coordinates.
    Write {
        glyphs: String,
        at: Option<(u32, u32)>,
    },
    Bpm(u32),
    /// Announce the CC offset.
    CcOffset(u8),
    Play,
    Stop,
}

impl OrcaCommand {
    pub fn find(text: impl Into<String>) -> Self {
        OrcaCommand::Find(text.into())
    }

    /// Select a single cell.
    pub fn select((x, y): (u32, u32)) -> Self {
        OrcaCommand::Select {
            x,
            y,
            width: 0,
            height: 0,
        }
    }

    pub fn write(glyphs: impl Into<String>) -> Self {
        OrcaCommand::Write {
            glyphs: glyphs.into(),
            at: None,
        }
    }

    pub fn write_at(glyphs: impl Into<String>, at: (u32, u32)) -> Self {
        OrcaCommand::Write {
            glyphs: glyphs.into(),
            at: Some(at),
        }
    }
}

impl fmt::Display for OrcaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrcaCommand::Find(text) => write!(f, "find:{}", text),
            OrcaCommand::Select {
                x,
                y,
                width,
                height,
            } => write!(f, "select:{};{};{};{}", x, y, width, height),
            OrcaCommand::Write { glyphs, at: None } => write!(f, "write:{}", glyphs),
            OrcaCommand::Write {
                glyphs,
                at: Some((x, y)),
            } => write!(f, "write:{};{};{}", glyphs, x, y),
            OrcaCommand::Bpm(bpm) => write!(f, "bpm:{}", bpm),
            OrcaCommand::CcOffset(offset) => write!(f, "cc:{}", offset),
            OrcaCommand::Play => f.write_str("play"),
            OrcaCommand::Stop => f.write_str("stop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_wire_format() {
        assert_snapshot!(OrcaCommand::find("aV"), @"find:aV");
        assert_snapshot!(OrcaCommand::select((3, 12)), @"select:3;12;0;0");
        assert_snapshot!(OrcaCommand::write(":04Cr4"), @"write::04Cr4");
        assert_snapshot!(OrcaCommand::write_at("C", (3, 12)), @"write:C;3;12");
        assert_snapshot!(OrcaCommand::Bpm(120), @"bpm:120");
        assert_snapshot!(OrcaCommand::CcOffset(0), @"cc:0");
        assert_snapshot!(OrcaCommand::Play, @"play");
        assert_snapshot!(OrcaCommand::Stop, @"stop");
    }

    #[test]
    fn test_select_with_area() {
        let select = OrcaCommand::Select {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        };
        assert_eq!(select.to_string(), "select:1;2;3;4");
    }
}
