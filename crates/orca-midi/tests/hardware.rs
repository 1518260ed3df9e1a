//! Hardware tests against a real MIDI input.
//!
//! All tests are `#[ignore]` so CI doesn't fail without hardware.
//! Play a few notes on the first input port while the test runs.
//!
//! Run with:
//!   cargo test -p orca-midi --test hardware -- --ignored --test-threads=1

#![cfg(feature = "midi-io")]

use orca_midi::{enumerate_ports, HardwareInput, MidiSource, PortSelector};
use std::thread;
use std::time::{Duration, Instant};

const LISTEN_FOR: Duration = Duration::from_secs(5);

#[test]
#[ignore]
fn test_list_devices() {
    let devices = enumerate_ports().expect("Failed to enumerate MIDI inputs");
    for device in &devices {
        println!("  {}", device);
    }
}

#[test]
#[ignore]
fn test_open_poll_close() {
    let devices = enumerate_ports().expect("Failed to enumerate MIDI inputs");
    let device = PortSelector::Index(0)
        .resolve(&devices)
        .expect("No MIDI input available");
    let mut input = HardwareInput::open(device).expect("Failed to open MIDI input");

    let started = Instant::now();
    let mut received = 0;
    while started.elapsed() < LISTEN_FOR {
        match input.poll().expect("MIDI input failed") {
            Some(event) => {
                println!("{}", event);
                assert!(event.time_delta >= 0.0);
                received += 1;
            }
            None => thread::sleep(Duration::from_millis(1)),
        }
    }
    println!("received {} events", received);

    input.close();
    assert!(!input.is_open());
    assert_eq!(input.poll().unwrap(), None);
}
