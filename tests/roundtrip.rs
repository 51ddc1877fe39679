mod utils;

use midi_file::core::{Channel, GeneralMidi, NoteNumber, PitchBendValue, Velocity};
use midi_file::file::{Division, Event, Format, MetaEvent, Track};
use midi_file::{event_kind, filter_events, EventKind, MidiFile};
use utils::{enable_logging, smf0, END_OF_TRACK};

fn finish(track: &mut Track) {
    track
        .push_event(0, Event::Meta(MetaEvent::EndOfTrack))
        .unwrap();
}

/// A file built entirely through the public API round-trips through write/read to an equal
/// value: the decoded event list is unchanged, as required even though the bytes need not be
/// (invariant 3).
#[test]
fn rich_track_round_trips_through_bytes() {
    enable_logging();
    let ch = Channel::new(2);

    let mut track = Track::default();
    track.set_name("Oboe").unwrap();
    track.set_instrument_name("Solo Oboe").unwrap();
    track
        .set_general_midi(ch, GeneralMidi::Oboe)
        .unwrap();
    track
        .push_note_on(0, ch, NoteNumber::new(69), Velocity::new(90))
        .unwrap();
    track
        .push_pitch_bend(5, ch, PitchBendValue::new(9000))
        .unwrap();
    track
        .push_note_off(15, ch, NoteNumber::new(69), Velocity::new(64))
        .unwrap();
    track.push_lyric(0, "la").unwrap();
    finish(&mut track);

    let mut midi_file = MidiFile::new(Format::Multi, Division::with_metrical(480));
    midi_file.push_track(track);

    let mut bytes = Vec::new();
    midi_file.write(&mut bytes).unwrap();
    let reloaded = MidiFile::read(bytes.as_slice()).unwrap();
    assert_eq!(midi_file, reloaded);
}

/// Serialization is deterministic: writing the same value twice produces identical bytes.
#[test]
fn writing_is_deterministic() {
    enable_logging();
    let ch = Channel::new(0);
    let mut track = Track::default();
    track
        .push_note_on(0, ch, NoteNumber::new(60), Velocity::new(100))
        .unwrap();
    track
        .push_note_on(0, ch, NoteNumber::new(64), Velocity::new(100))
        .unwrap();
    track
        .push_note_off(10, ch, NoteNumber::new(60), Velocity::new(64))
        .unwrap();
    track
        .push_note_off(0, ch, NoteNumber::new(64), Velocity::new(64))
        .unwrap();
    finish(&mut track);

    let mut midi_file = MidiFile::new(Format::Multi, Division::with_metrical(96));
    midi_file.push_track(track);

    let mut first = Vec::new();
    let mut second = Vec::new();
    midi_file.write(&mut first).unwrap();
    midi_file.write(&mut second).unwrap();
    assert_eq!(first, second);
}

/// A format-0 file is normalized on read into a conductor track (meta-only) and a content track,
/// and is always written back out declaring format 1.
#[test]
fn format_zero_is_normalized_to_two_tracks_on_read() {
    enable_logging();
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0xFF, 0x03, 0x04]); // track name, len 4
    body.extend_from_slice(b"Song");
    body.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]); // set tempo 500000
    body.extend_from_slice(&[0x00, 0x90, 0x3C, 0x64]); // note on
    body.extend_from_slice(&[0x0A, 0x80, 0x3C, 0x40]); // note off
    body.extend_from_slice(&END_OF_TRACK);
    let bytes = smf0(96, &body);

    let midi_file = MidiFile::read(bytes.as_slice()).unwrap();
    assert_eq!(*midi_file.header().format(), Format::Multi);
    assert_eq!(midi_file.tracks_len(), 2);

    let conductor = midi_file.track(0).unwrap();
    assert!(conductor.events().all(|e| matches!(e.event(), Event::Meta(_))));
    let content = midi_file.track(1).unwrap();
    assert!(content
        .events()
        .any(|e| matches!(e.event(), Event::Midi(_))));

    let mut written = Vec::new();
    midi_file.write(&mut written).unwrap();
    // the write always declares format 1 regardless of how the file was read.
    assert_eq!(u16::from_be_bytes([written[8], written[9]]), 1);
}

/// Filtering out an event kind conserves the absolute time of every event that survives.
#[test]
fn filter_preserves_absolute_time_of_surviving_events() {
    enable_logging();
    let ch = Channel::new(0);
    let mut track = Track::default();
    track
        .push_note_on(0, ch, NoteNumber::new(60), Velocity::new(100))
        .unwrap();
    track
        .push_pitch_bend(10, ch, PitchBendValue::new(9000))
        .unwrap();
    track
        .push_pitch_bend(20, ch, PitchBendValue::new(9500))
        .unwrap();
    track
        .push_note_off(5, ch, NoteNumber::new(60), Velocity::new(64))
        .unwrap();
    finish(&mut track);

    let mut midi_file = MidiFile::new(Format::Multi, Division::with_metrical(96));
    midi_file.push_track(track);

    let filtered = filter_events(&midi_file, 0, EventKind::PitchBend).unwrap();
    let remaining = filtered.track(0).unwrap();
    assert_eq!(remaining.events_len(), 3); // note-on, note-off, end-of-track

    let mut absolute = 0u32;
    let mut absolutes = Vec::new();
    for event in remaining.events() {
        absolute += event.delta_time();
        absolutes.push(absolute);
    }
    // note-on is still at tick 0; note-off absorbed both dropped pitch-bend deltas and is still
    // at the same absolute tick (0 + 10 + 20 + 5 = 35) it occupied before filtering.
    assert_eq!(absolutes[0], 0);
    assert_eq!(absolutes[1], 35);

    assert!(remaining.events().all(|e| event_kind(e.event()) != EventKind::PitchBend));
}

#[test]
fn filter_events_on_missing_track_is_an_error() {
    enable_logging();
    let midi_file = MidiFile::new(Format::Multi, Division::with_metrical(96));
    assert!(filter_events(&midi_file, 0, EventKind::PitchBend).is_err());
}
