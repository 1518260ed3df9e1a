//! MIDI Input via midir
//!
//! The driver callback runs on a midir-owned thread and only decodes bytes and
//! pushes them into an SPSC ring buffer. The run loop thread is the single
//! consumer and never blocks on it.

use crate::error::{Error, Result};
use crate::{MidiEvent, MidiInputDevice, MidiSource};
use midir::{Ignore, MidiInput, MidiInputConnection};
use ringbuf::{
    traits::{Consumer, Producer, Split},
    HeapCons, HeapRb,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const CLIENT_NAME: &str = "orca-midi-in";
const FIFO_SIZE: usize = 1024;
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Event paired with the driver timestamp in microseconds.
type Stamped = (MidiEvent, u64);

/// Enumerate MIDI input ports once. Indices are only stable until the next
/// device is plugged in, so callers should resolve selectors against a single
/// snapshot.
pub fn enumerate_ports() -> Result<Vec<MidiInputDevice>> {
    let midi_input = MidiInput::new("orca-midi-in-enumerate")?;
    let devices = midi_input
        .ports()
        .iter()
        .enumerate()
        .map(|(index, port)| MidiInputDevice {
            index,
            name: midi_input
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index)),
        })
        .collect();
    Ok(devices)
}

/// An open hardware input port.
///
/// The midir connection is released on [`MidiSource::close`] or on drop,
/// whichever comes first.
pub struct HardwareInput {
    device: MidiInputDevice,
    connection: Option<MidiInputConnection<()>>,
    consumer: HeapCons<Stamped>,
    last_timestamp: Option<u64>,
    last_health_check: Instant,
}

impl HardwareInput {
    pub fn open(device: &MidiInputDevice) -> Result<Self> {
        let mut midi_input = MidiInput::new(CLIENT_NAME)?;
        midi_input.ignore(Ignore::All);

        let ports = midi_input.ports();
        let port = ports
            .get(device.index)
            .ok_or_else(|| Error::PortNotFound(device.to_string()))?;

        let (mut producer, consumer) = HeapRb::<Stamped>::new(FIFO_SIZE).split();
        let label = device.name.clone();

        let connection = midi_input.connect(
            port,
            "orca-midi-in-input",
            move |timestamp, message, _| match MidiEvent::from_bytes(message) {
                Some(event) => {
                    if producer.try_push((event, timestamp)).is_err() {
                        debug!("MIDI input ring buffer full on {}, dropping event", label);
                    }
                }
                None => {
                    debug!("Ignoring unsupported MIDI message {:02X?}", message);
                }
            },
            (),
        )?;

        info!("Opened MIDI input {}", device);
        Ok(Self {
            device: device.clone(),
            connection: Some(connection),
            consumer,
            last_timestamp: None,
            last_health_check: Instant::now(),
        })
    }

    pub fn device(&self) -> &MidiInputDevice {
        &self.device
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// midir has no disconnect callback, so an idle source re-enumerates
    /// the port table at most once per interval and fails if its port is gone.
    fn check_health(&mut self) -> Result<()> {
        if self.last_health_check.elapsed() < HEALTH_CHECK_INTERVAL {
            return Ok(());
        }
        self.last_health_check = Instant::now();
        let present = enumerate_ports()?
            .iter()
            .any(|d| d.name == self.device.name);
        if present {
            Ok(())
        } else {
            Err(Error::Disconnected(self.device.name.clone()))
        }
    }
}

impl MidiSource for HardwareInput {
    fn name(&self) -> &str {
        &self.device.name
    }

    fn poll(&mut self) -> Result<Option<MidiEvent>> {
        if self.connection.is_none() {
            return Ok(None);
        }
        if let Some((event, timestamp)) = self.consumer.try_pop() {
            let delta = self
                .last_timestamp
                .map_or(0.0, |prev| timestamp.saturating_sub(prev) as f64 / 1_000_000.0);
            self.last_timestamp = Some(timestamp);
            return Ok(Some(event.with_time_delta(delta)));
        }
        self.check_health()?;
        Ok(None)
    }

    fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
            info!("Closed MIDI input {}", self.device);
        }
    }
}

impl Drop for HardwareInput {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for HardwareInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HardwareInput")
            .field("device", &self.device)
            .field("open", &self.is_open())
            .finish()
    }
}
