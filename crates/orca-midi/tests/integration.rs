//! Integration tests for orca-midi.
//!
//! These tests exercise the public surface without hardware MIDI devices.

use orca_midi::{
    Error, MemorySource, MidiEvent, MidiEventKind, MidiInputDevice, MidiSource, PortSelector,
};

// ---------------------------------------------------------------------------
// 1. Raw bytes → events → polled source
// ---------------------------------------------------------------------------

/// Simulate a driver callback decoding a burst, then poll it back out.
#[test]
fn test_decoded_burst_flows_through_source() {
    let burst: [&[u8]; 5] = [
        &[0x90, 60, 100], // note on
        &[0xF8],          // clock, dropped
        &[0x80, 60, 0],   // note off
        &[0xE0, 0, 64],   // pitch bend, dropped
        &[0xB0, 14, 64],  // cc
    ];

    let source = MemorySource::new("Keyboard");
    for bytes in burst {
        if let Some(event) = MidiEvent::from_bytes(bytes) {
            source.push(event);
        }
    }
    assert_eq!(source.pending(), 3);

    let mut polled = source.clone();
    let kinds: Vec<_> = std::iter::from_fn(|| polled.poll().unwrap())
        .map(|event| event.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            MidiEventKind::NoteOn,
            MidiEventKind::NoteOff,
            MidiEventKind::ControlChange
        ]
    );
}

/// A disconnected source keeps failing once its queue is drained.
#[test]
fn test_disconnect_is_sticky() {
    let mut source = MemorySource::new("Pads");
    source.disconnect();
    assert!(matches!(source.poll(), Err(Error::Disconnected(_))));
    assert!(matches!(source.poll(), Err(Error::Disconnected(_))));
}

// ---------------------------------------------------------------------------
// 2. Port selection against a snapshot
// ---------------------------------------------------------------------------

#[test]
fn test_selectors_from_cli_strings() {
    let devices = vec![
        MidiInputDevice {
            index: 0,
            name: "Midi Through".into(),
        },
        MidiInputDevice {
            index: 1,
            name: "Launchkey Mini MK3 MIDI".into(),
        },
    ];

    let by_index: PortSelector = "1".parse().unwrap();
    let by_name: PortSelector = "launchkey".parse().unwrap();
    assert_eq!(by_index.resolve(&devices).unwrap(), &devices[1]);
    assert_eq!(by_name.resolve(&devices).unwrap(), &devices[1]);

    let err = "7".parse::<PortSelector>().unwrap().resolve(&devices).unwrap_err();
    assert_eq!(err.to_string(), "No MIDI input port matches port 7");
}
