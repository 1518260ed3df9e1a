//! Builder for configuring and constructing a `Bridge`.

use crate::{Bridge, Result};
use orca_core::{CommandSink, EventRouter, RunLoop, SequencerConfig, SourceRole, UdpSink};
use orca_midi::{MidiInputDevice, MidiSource, PortSelector};
use std::sync::Arc;
use std::time::Duration;

/// Sources and sink left unset are opened from the configuration: ports are
/// enumerated once, selectors resolved against that table, and commands go
/// over UDP to the configured destination.
///
/// # Example
///
/// ```ignore
/// use orca_midi_in::prelude::*;
///
/// let config = SequencerConfig::builder()
///     .sequencing_port(PortSelector::Name("Keystep".into()))
///     .build()?;
///
/// let mut bridge = Bridge::builder(config).build()?;
/// bridge.run()?;
/// ```
pub struct BridgeBuilder {
    config: SequencerConfig,
    sequencing: Option<Box<dyn MidiSource>>,
    controller: Option<Box<dyn MidiSource>>,
    sink: Option<Box<dyn CommandSink>>,
    idle_sleep: Option<Duration>,
}

impl BridgeBuilder {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            sequencing: None,
            controller: None,
            sink: None,
            idle_sleep: None,
        }
    }

    /// Use this source instead of opening the configured sequencing port.
    pub fn sequencing_source(mut self, source: impl MidiSource + 'static) -> Self {
        self.sequencing = Some(Box::new(source));
        self
    }

    /// Use this source instead of opening the configured controller port.
    /// Also enables the controller role when no controller port is configured.
    pub fn controller_source(mut self, source: impl MidiSource + 'static) -> Self {
        self.controller = Some(Box::new(source));
        self
    }

    /// Send commands here instead of over UDP.
    pub fn sink(mut self, sink: impl CommandSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Default: 1 ms
    pub fn idle_sleep(mut self, sleep: Duration) -> Self {
        self.idle_sleep = Some(sleep);
        self
    }

    pub fn build(self) -> Result<Bridge> {
        let sequencing_port = match self.sequencing {
            Some(_) => None,
            None => Some(&self.config.sequencing_port),
        };
        let controller_port = match self.controller {
            Some(_) => None,
            None => self.config.controller_port.as_ref(),
        };
        let devices = if sequencing_port.is_some() || controller_port.is_some() {
            enumerate_ports()?
        } else {
            Vec::new()
        };
        let (sequencing_device, controller_device) =
            resolve_ports(sequencing_port, controller_port, &devices)?;

        let sequencing = match (self.sequencing, sequencing_device) {
            (Some(source), _) => source,
            (None, Some(device)) => open_port(device)?,
            (None, None) => {
                return Err(orca_midi::Error::PortNotFound(
                    self.config.sequencing_port.to_string(),
                )
                .into())
            }
        };
        let controller = match (self.controller, controller_device) {
            (Some(source), _) => Some(source),
            (None, Some(device)) => Some(open_port(device)?),
            (None, None) => None,
        };
        let sink = match self.sink {
            Some(sink) => sink,
            None => Box::new(UdpSink::connect(self.config.destination)?),
        };

        let config = Arc::new(self.config);
        let router = EventRouter::new(Arc::clone(&config), sink);
        let mut run_loop = RunLoop::new(router);
        if let Some(sleep) = self.idle_sleep {
            run_loop = run_loop.idle_sleep(sleep);
        }
        run_loop.add_source(SourceRole::Sequencing, sequencing);
        if let Some(controller) = controller {
            run_loop.add_source(SourceRole::Controller, controller);
        }

        Ok(Bridge::new(config, run_loop))
    }
}

/// Look up the ports still to be opened. Two selectors naming the same
/// device are rejected, since opening it twice would route every event
/// under both roles.
fn resolve_ports<'a>(
    sequencing: Option<&PortSelector>,
    controller: Option<&PortSelector>,
    devices: &'a [MidiInputDevice],
) -> Result<(Option<&'a MidiInputDevice>, Option<&'a MidiInputDevice>)> {
    let sequencing = sequencing
        .map(|selector| selector.resolve(devices))
        .transpose()?;
    let controller = controller
        .map(|selector| selector.resolve(devices))
        .transpose()?;
    if let (Some(seq), Some(ctl)) = (sequencing, controller) {
        if seq.index == ctl.index {
            return Err(orca_core::Error::InvalidConfig(format!(
                "controller and sequencing port both resolve to {}",
                seq
            ))
            .into());
        }
    }
    Ok((sequencing, controller))
}

#[cfg(feature = "midi-io")]
fn enumerate_ports() -> Result<Vec<MidiInputDevice>> {
    let devices = orca_midi::enumerate_ports()?;
    tracing::debug!("Found {} MIDI input port(s)", devices.len());
    Ok(devices)
}

#[cfg(not(feature = "midi-io"))]
fn enumerate_ports() -> Result<Vec<MidiInputDevice>> {
    Err(orca_midi::Error::MidiDevice(
        "cannot open MIDI ports without the midi-io feature".into(),
    )
    .into())
}

#[cfg(feature = "midi-io")]
fn open_port(device: &MidiInputDevice) -> Result<Box<dyn MidiSource>> {
    tracing::info!("Opening MIDI input {}", device);
    Ok(Box::new(orca_midi::HardwareInput::open(device)?))
}

#[cfg(not(feature = "midi-io"))]
fn open_port(device: &MidiInputDevice) -> Result<Box<dyn MidiSource>> {
    Err(orca_midi::Error::MidiDevice(format!(
        "cannot open {} without the midi-io feature",
        device
    ))
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn table() -> Vec<MidiInputDevice> {
        vec![
            MidiInputDevice {
                index: 0,
                name: "Arturia KeyStep 32".into(),
            },
            MidiInputDevice {
                index: 1,
                name: "Arturia BeatStep".into(),
            },
        ]
    }

    #[test]
    fn test_distinct_ports_resolve() {
        let devices = table();
        let keys = PortSelector::Name("keystep".into());
        let pads = PortSelector::Index(1);
        let (seq, ctl) = resolve_ports(Some(&keys), Some(&pads), &devices).unwrap();
        assert_eq!(seq.map(|d| d.index), Some(0));
        assert_eq!(ctl.map(|d| d.index), Some(1));
    }

    #[test]
    fn test_same_device_under_two_selectors_rejected() {
        let devices = table();
        let by_index = PortSelector::Index(0);
        let by_name = PortSelector::Name("KEYSTEP".into());
        let err = resolve_ports(Some(&by_index), Some(&by_name), &devices).unwrap_err();
        assert!(matches!(
            err,
            Error::Core(orca_core::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_supplied_source_skips_resolution() {
        let devices = table();
        let pads = PortSelector::Index(0);
        let (seq, ctl) = resolve_ports(None, Some(&pads), &devices).unwrap();
        assert!(seq.is_none());
        assert_eq!(ctl.map(|d| d.index), Some(0));
    }

    #[test]
    fn test_unknown_port_is_an_error() {
        let devices = table();
        let missing = PortSelector::Name("launchpad".into());
        assert!(resolve_ports(Some(&missing), None, &devices).is_err());
    }
}
