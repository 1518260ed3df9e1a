//! Bridge lifecycle with scripted sources and an in-memory sink.

use orca_midi_in::prelude::*;
use orca_midi_in::Bindings;
use std::net::{Ipv4Addr, UdpSocket};
use std::time::Duration;

fn keys_only() -> SequencerConfig {
    SequencerConfig::builder()
        .sequencing_port(PortSelector::Name("keys".into()))
        .cc_variable(14, "a")
        .build()
        .unwrap()
}

#[test]
fn start_announces_once() {
    let log = CommandLog::new();
    let mut bridge = Bridge::builder(keys_only())
        .sequencing_source(MemorySource::new("keys"))
        .sink(log.clone())
        .build()
        .unwrap();

    bridge.start();
    bridge.start();
    assert_eq!(log.commands(), vec!["bpm:120", "cc:0", "play"]);
}

#[test]
fn pass_routes_sequencing_events() {
    let log = CommandLog::new();
    let keys = MemorySource::new("keys").with_events([MidiEvent::control_change(0, 14, 64)]);
    let mut bridge = Bridge::builder(keys_only())
        .sequencing_source(keys)
        .sink(log.clone())
        .build()
        .unwrap();

    assert_eq!(bridge.pass().unwrap(), 1);
    assert_eq!(
        log.commands(),
        vec!["bpm:120", "cc:0", "play", "find:aV", "write:aVh"]
    );
}

#[test]
fn controller_source_override() {
    let config = SequencerConfig::builder()
        .sequencing_port(PortSelector::Index(0))
        .controller_port(PortSelector::Index(1))
        .bindings(Bindings {
            stop: Some(46),
            ..Bindings::default()
        })
        .quiet(true)
        .build()
        .unwrap();
    let log = CommandLog::new();
    let pads = MemorySource::new("pads").with_events([MidiEvent::note_on(9, 46, 127)]);
    let mut bridge = Bridge::builder(config)
        .sequencing_source(MemorySource::new("keys"))
        .controller_source(pads)
        .sink(log.clone())
        .build()
        .unwrap();

    bridge.pass().unwrap();
    assert_eq!(log.commands(), vec!["bpm:120", "cc:0", "stop"]);
}

#[test]
fn run_until_stopped_releases_sources() {
    let keys = MemorySource::new("keys");
    let mut bridge = Bridge::builder(keys_only())
        .sequencing_source(keys.clone())
        .sink(CommandLog::new())
        .idle_sleep(Duration::from_millis(1))
        .build()
        .unwrap();
    let stop = bridge.stop_handle();

    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        stop.stop();
    });
    bridge.run().unwrap();
    stopper.join().unwrap();
    assert!(keys.is_closed());
}

#[test]
fn disconnect_ends_run_with_error() {
    let keys = MemorySource::new("keys");
    keys.disconnect();
    let mut bridge = Bridge::builder(keys_only())
        .sequencing_source(keys.clone())
        .sink(CommandLog::new())
        .build()
        .unwrap();

    let err = bridge.run().unwrap_err();
    assert!(err.to_string().contains("disconnected"));
    assert!(keys.is_closed());
}

#[test]
fn default_sink_sends_udp() {
    let listener = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    listener
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let config = SequencerConfig::builder()
        .sequencing_port(PortSelector::Index(0))
        .destination(listener.local_addr().unwrap())
        .bpm(140)
        .quiet(true)
        .build()
        .unwrap();
    let mut bridge = Bridge::builder(config)
        .sequencing_source(MemorySource::new("keys"))
        .build()
        .unwrap();

    bridge.start();
    let mut buf = [0u8; 64];
    let n = listener.recv(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"bpm:140");
    let n = listener.recv(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"cc:0");
}
