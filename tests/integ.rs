mod utils;

use midi_file::core::{Channel, NoteNumber, Velocity};
use midi_file::file::{
    Division, Event, Format, MetaEvent, QuartersPerMinute, Track,
};
use midi_file::MidiFile;
use utils::{enable_logging, smf1, END_OF_TRACK};

/// A note-on with velocity 0 on the wire must be handed back to the caller as a note-off with
/// velocity 64, per the SMF running-status convention.
#[test]
fn note_on_velocity_zero_normalizes_to_note_off() {
    enable_logging();
    let mut body = vec![0x00, 0x90, 0x3C, 0x40];
    body.extend_from_slice(&[0x0A, 0x3C, 0x00]); // running status, vel 0
    body.extend_from_slice(&END_OF_TRACK);
    let bytes = smf1(96, &[&body]);

    let parsed = MidiFile::read(bytes.as_slice()).unwrap();
    let track = parsed.track(0).unwrap();
    assert_eq!(track.events_len(), 3);

    let mut expected = Track::default();
    expected
        .push_note_on(0, Channel::new(0), NoteNumber::new(60), Velocity::new(64))
        .unwrap();
    expected
        .push_note_off(10, Channel::new(0), NoteNumber::new(60), Velocity::new(64))
        .unwrap();
    expected
        .push_event(0, Event::Meta(MetaEvent::EndOfTrack))
        .unwrap();

    assert_eq!(track, &expected);
}

/// Consecutive channel-voice events of the same kind and channel must share one status byte.
#[test]
fn running_status_omits_repeated_status_byte() {
    enable_logging();
    let ch = Channel::new(0);
    let mut track = Track::default();
    track
        .push_note_on(0, ch, NoteNumber::new(60), Velocity::new(100))
        .unwrap();
    track
        .push_note_on(5, ch, NoteNumber::new(64), Velocity::new(100))
        .unwrap();
    track
        .push_note_off(5, ch, NoteNumber::new(60), Velocity::new(100))
        .unwrap();
    track
        .push_note_off(0, ch, NoteNumber::new(64), Velocity::new(100))
        .unwrap();
    track
        .push_event(0, Event::Meta(MetaEvent::EndOfTrack))
        .unwrap();

    let mut midi_file = MidiFile::new(Format::Multi, Division::with_metrical(96));
    midi_file.push_track(track);
    let mut bytes = Vec::new();
    midi_file.write(&mut bytes).unwrap();

    // all data bytes are < 0x80, so any 0x90/0x80 byte found is a real status byte, not data.
    let note_on_statuses = bytes.iter().filter(|&&b| b == 0x90).count();
    let note_off_statuses = bytes.iter().filter(|&&b| b == 0x80).count();
    assert_eq!(note_on_statuses, 1);
    assert_eq!(note_off_statuses, 1);
}

/// A note-off with velocity 64 immediately following a note-on on the same channel is written as
/// a note-on with velocity 0 under running status, exactly mirroring what the reader produces.
#[test]
fn note_off_velocity_64_reuses_running_note_on_status() {
    enable_logging();
    let ch = Channel::new(0);
    let key = NoteNumber::new(60);
    let mut track = Track::default();
    track
        .push_note_on(0, ch, key, Velocity::new(100))
        .unwrap();
    track.push_note_off(5, ch, key, Velocity::new(64)).unwrap();
    track
        .push_event(0, Event::Meta(MetaEvent::EndOfTrack))
        .unwrap();

    let mut midi_file = MidiFile::new(Format::Multi, Division::with_metrical(96));
    midi_file.push_track(track.clone());
    let mut bytes = Vec::new();
    midi_file.write(&mut bytes).unwrap();

    let status_bytes = bytes.iter().filter(|&&b| b == 0x90 || b == 0x80).count();
    assert_eq!(status_bytes, 1, "note-off should not force a new status byte");

    let reloaded = MidiFile::read(bytes.as_slice()).unwrap();
    assert_eq!(reloaded.track(0).unwrap(), &track);
}

/// Running status never crosses a track chunk boundary: a bare data byte at the start of a new
/// track (with no status byte of its own) is an error, even if the previous track ended with an
/// active channel-voice status.
#[test]
fn running_status_does_not_cross_track_boundary() {
    enable_logging();
    let mut track_a = vec![0x00, 0x90, 0x3C, 0x40];
    track_a.extend_from_slice(&END_OF_TRACK);
    // no status byte: this is only legal if running status survived from track_a.
    let track_b = vec![0x00, 0x3C, 0x40];
    let bytes = smf1(96, &[&track_a, &track_b]);

    let result = MidiFile::read(bytes.as_slice());
    assert!(result.is_err());
}

/// A meta event resets running status: a channel-voice event following one may not omit its
/// status byte even if it matches the kind/channel of the event before the meta event.
#[test]
fn meta_event_interrupts_running_status() {
    enable_logging();
    let mut body = vec![0x00, 0x90, 0x3C, 0x40];
    body.extend_from_slice(&[0x00, 0xFF, 0x01, 0x01, 0x41]); // text meta "A"
    body.extend_from_slice(&[0x00, 0x3C, 0x40]); // bare data bytes, no status
    let bytes = smf1(96, &[&body]);

    let result = MidiFile::read(bytes.as_slice());
    assert!(result.is_err());
}

/// S3: round-trip a 3-track format-1 file with an 82 BPM conductor track.
#[test]
fn round_trip_three_track_82_bpm() {
    enable_logging();
    let ch = Channel::new(0);
    let key = NoteNumber::new(60);
    let vel = Velocity::new(100);

    let mut conductor = Track::default();
    conductor.set_name("Unnamed").unwrap();
    conductor
        .push_tempo(0, QuartersPerMinute::new(82))
        .unwrap();
    conductor
        .push_event(0, Event::Meta(MetaEvent::EndOfTrack))
        .unwrap();

    let mut track1 = Track::default();
    track1.push_note_on(0, ch, key, vel).unwrap();
    track1.push_note_off(10, ch, key, vel).unwrap();
    track1
        .push_event(0, Event::Meta(MetaEvent::EndOfTrack))
        .unwrap();

    let mut track2 = Track::default();
    track2
        .push_note_on(0, Channel::new(1), NoteNumber::new(64), vel)
        .unwrap();
    track2
        .push_note_off(20, Channel::new(1), NoteNumber::new(64), vel)
        .unwrap();
    track2
        .push_event(0, Event::Meta(MetaEvent::EndOfTrack))
        .unwrap();

    let mut midi_file = MidiFile::new(Format::Multi, Division::with_metrical(96));
    midi_file.push_track(conductor);
    midi_file.push_track(track1);
    midi_file.push_track(track2);

    let mut bytes = Vec::new();
    midi_file.write(&mut bytes).unwrap();
    let reloaded = MidiFile::read(bytes.as_slice()).unwrap();
    assert_eq!(midi_file, reloaded);

    let conductor = reloaded.track(0).unwrap();
    let microsec_per_quarter = conductor
        .events()
        .find_map(|e| match e.event() {
            Event::Meta(MetaEvent::SetTempo(m)) => Some(m.get()),
            _ => None,
        })
        .unwrap();
    assert_eq!(microsec_per_quarter, 731707);
    assert_eq!(60_000_000 / microsec_per_quarter, 82);

    // writing twice must produce byte-identical output: serialization is deterministic.
    let mut bytes2 = Vec::new();
    midi_file.write(&mut bytes2).unwrap();
    assert_eq!(bytes, bytes2);
}

#[test]
fn malformed_header_reports_bad_cookie() {
    enable_logging();
    let bytes = b"not a midi file at all".to_vec();
    let result = MidiFile::read(bytes.as_slice());
    assert!(result.is_err());
}

#[test]
fn track_chunk_shorter_than_declared_is_truncated_error() {
    enable_logging();
    // a declared length of 10 but only 4 bytes of body is a truncated-chunk style failure.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&96u16.to_be_bytes());
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&10u32.to_be_bytes());
    bytes.extend_from_slice(&END_OF_TRACK);

    let result = MidiFile::read(bytes.as_slice());
    assert!(result.is_err());
}

#[test]
fn unknown_channel_voice_status_is_unknown_event_not_fatal() {
    enable_logging();
    // reserved system real-time byte with no defined channel-voice meaning here: 0xf1.
    let mut body = vec![0x00, 0xF1];
    body.extend_from_slice(&END_OF_TRACK);
    let bytes = smf1(96, &[&body]);
    let parsed = MidiFile::read(bytes.as_slice());
    assert!(parsed.is_ok());
}

/// A track-end event that lands before the chunk's declared length is exhausted still ends the
/// track; the remaining declared bytes are consumed and discarded rather than treated as an error.
#[test]
fn trailing_bytes_after_early_track_end_are_discarded() {
    enable_logging();
    let mut body = Vec::new();
    body.extend_from_slice(&END_OF_TRACK);
    // padding the declared chunk length past the track-end event with bytes that are not
    // themselves a valid event; if these were parsed as such, reading would fail.
    body.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
    let bytes = smf1(96, &[&body]);

    let parsed = MidiFile::read(bytes.as_slice()).unwrap();
    let track = parsed.track(0).unwrap();
    assert_eq!(track.events_len(), 1);
    assert!(matches!(
        track.events().next().unwrap().event(),
        Event::Meta(MetaEvent::EndOfTrack)
    ));
}
