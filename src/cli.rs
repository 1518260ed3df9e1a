//! Command-line surface of the `orca-midi-in` binary.

use crate::Result;
use clap::{ArgAction, Parser};
use orca_core::{
    parse_cc_binding, parse_location, Bindings, NoteFields, SequencerConfig, DEFAULT_BPM,
};
use orca_midi::PortSelector;
use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Multi-letter single-dash flags and their long forms. clap would read
/// `-ln 36` as `-l n`, so these are rewritten before parsing.
const SHORT_ALIASES: [(&str, &str); 8] = [
    ("-nm", "--pitch-only"),
    ("-nc", "--val-only"),
    ("-nl", "--no-length"),
    ("-no", "--no-octave"),
    ("-nv", "--no-velocity"),
    ("-ln", "--next-location"),
    ("-lp", "--previous-location"),
    ("-ls", "--scroll-location"),
];

/// Sequence the Orca grid live from a MIDI controller.
#[derive(Parser, Debug)]
#[command(name = "orca-midi-in", version)]
pub struct Cli {
    /// MIDI input port to sequence from (index or name)
    #[arg(required_unless_present = "list_devices")]
    pub midi_port: Option<PortSelector>,

    /// MIDI input port for performance controls (index or name)
    #[arg(long)]
    pub controller: Option<PortSelector>,

    /// List MIDI input devices and exit
    #[arg(short = 'd', long = "devices")]
    pub list_devices: bool,

    /// Increase verbosity: once logs commands, twice also logs MIDI events
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbosity: u8,

    /// Map CC numbers to grid variables, e.g. --cc 14:a
    #[arg(long, value_name = "ID:VAR", num_args = 1..)]
    pub cc: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_BPM)]
    pub bpm: u32,

    /// Write only the note glyph, without the MIDI operator (-nm)
    #[arg(long)]
    pub pitch_only: bool,

    /// Write only the CC value, without the CC operator (-nc)
    #[arg(long)]
    pub val_only: bool,

    /// Leave note length out of MIDI operators (-nl)
    #[arg(long)]
    pub no_length: bool,

    /// Leave octave out of MIDI operators (-no)
    #[arg(long)]
    pub no_octave: bool,

    /// Leave velocity out of MIDI operators (-nv)
    #[arg(long)]
    pub no_velocity: bool,

    /// Grid locations to write at, in order
    #[arg(short = 'l', long = "location", value_name = "X;Y[;HEIGHT]", num_args = 1..)]
    pub locations: Vec<String>,

    /// Controller note that jumps to the next location (-ln)
    #[arg(long, value_name = "NOTE", value_parser = clap::value_parser!(u8).range(0..=127))]
    pub next_location: Option<u8>,

    /// Controller note that jumps to the previous location (-lp)
    #[arg(long, value_name = "NOTE", value_parser = clap::value_parser!(u8).range(0..=127))]
    pub previous_location: Option<u8>,

    /// Controller CC that scrolls the current location (-ls)
    #[arg(long, value_name = "CC", value_parser = clap::value_parser!(u8).range(0..=127))]
    pub scroll_location: Option<u8>,

    /// Controller note that starts playback
    #[arg(short = 'p', long, value_name = "NOTE", value_parser = clap::value_parser!(u8).range(0..=127))]
    pub play: Option<u8>,

    /// Controller note that stops playback
    #[arg(short = 's', long, value_name = "NOTE", value_parser = clap::value_parser!(u8).range(0..=127))]
    pub stop: Option<u8>,

    /// Don't start playback on connect
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// MIDI channel written into operators (0-15)
    #[arg(long, default_value_t = 0)]
    pub channel: u8,

    #[arg(long, default_value_t = 0)]
    pub cc_offset: u8,

    /// Address of the grid's UDP listener
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    #[arg(long, default_value_t = 49160)]
    pub port: u16,

    /// Rewind a location's cursor when switching away from it
    #[arg(long)]
    pub reset_indices: bool,

    /// Don't carry the cursor offset over to the next location
    #[arg(long)]
    pub no_carry_over: bool,
}

impl Cli {
    /// Parse process arguments, accepting the single-dash multi-letter flags.
    pub fn try_parse_normalized<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Cli::try_parse_from(normalize_args(args))
    }

    /// Log filter directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "error",
            1 => "info",
            _ => "debug",
        }
    }

    pub fn to_config(&self) -> Result<SequencerConfig> {
        let mut builder = SequencerConfig::builder()
            .note_fields(NoteFields {
                midi_operator: !self.pitch_only,
                octave: !self.no_octave,
                velocity: !self.no_velocity,
                length: !self.no_length,
            })
            .cc_operator(!self.val_only)
            .bindings(Bindings {
                next_location: self.next_location,
                previous_location: self.previous_location,
                scroll_location: self.scroll_location,
                play: self.play,
                stop: self.stop,
            })
            .reset_indices_on_switch(self.reset_indices)
            .carry_over_indices_on_switch(!self.no_carry_over)
            .bpm(self.bpm)
            .channel(self.channel)
            .cc_offset(self.cc_offset)
            .destination(SocketAddr::new(self.host, self.port))
            .quiet(self.quiet);

        if let Some(port) = &self.midi_port {
            builder = builder.sequencing_port(port.clone());
        }
        if let Some(port) = &self.controller {
            builder = builder.controller_port(port.clone());
        }
        for binding in &self.cc {
            let (control, name) = parse_cc_binding(binding)?;
            builder = builder.cc_variable(control, name);
        }
        for location in &self.locations {
            builder = builder.location(parse_location(location)?);
        }

        Ok(builder.build()?)
    }
}

/// Rewrite single-dash multi-letter flags to their long forms. Arguments
/// after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match SHORT_ALIASES.iter().find(|(short, _)| arg == *short) {
                Some((_, long)) => OsString::from(*long),
                None => arg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_args() {
        let args = normalize_args(["orca-midi-in", "0", "-ln", "36", "-nv", "-l", "3;4", "--", "-no"]);
        assert_eq!(
            args,
            vec![
                "orca-midi-in",
                "0",
                "--next-location",
                "36",
                "--no-velocity",
                "-l",
                "3;4",
                "--",
                "-no"
            ]
        );
    }

    #[test]
    fn test_log_level() {
        let levels: Vec<_> = [vec!["x", "0"], vec!["x", "0", "-v"], vec!["x", "0", "-vvv"]]
            .into_iter()
            .map(|args| Cli::try_parse_normalized(args).unwrap().log_level())
            .collect();
        assert_eq!(levels, vec!["error", "info", "debug"]);
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
