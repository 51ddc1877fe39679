//! Note-pairing, per-note editing, and sonority reconstruction.
//!
//! This is the only part of the codec that reasons about *logical* notes rather than raw
//! note-on/note-off events: it pairs a note-on with the note-off (or velocity-0 note-on) that
//! closes it, and builds two things on top of that pairing: [`process_notes`], which edits the
//! underlying event stream while preserving every other event's timing, and
//! [`track_to_sonorities`], which collapses a track into a chronological sequence of rests, notes,
//! and chords.

use crate::core::{Channel, Message, NoteMessage, NoteNumber, Velocity};
use crate::error::LibResult;
use crate::file::{Event, Track, TrackEvent};
use crate::{MidiFile, Result};
use std::collections::HashMap;

/// A logical note, reconstructed by pairing a note-on with the event that closes it. This is a
/// derived view over a track's events, not something stored directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    channel: Channel,
    key_number: NoteNumber,
    start_tick: u64,
    end_tick: u64,
    on_velocity: Velocity,
}

impl Note {
    /// The channel the note sounded on.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The key (pitch) that was struck.
    pub fn key_number(&self) -> NoteNumber {
        self.key_number
    }

    /// The absolute tick, within the track, at which the note-on occurred.
    pub fn start_tick(&self) -> u64 {
        self.start_tick
    }

    /// The absolute tick, within the track, at which the note was closed.
    pub fn end_tick(&self) -> u64 {
        self.end_tick
    }

    /// `end_tick - start_tick`.
    pub fn duration_ticks(&self) -> u64 {
        self.end_tick.saturating_sub(self.start_tick)
    }

    /// The velocity the note-on carried.
    pub fn on_velocity(&self) -> Velocity {
        self.on_velocity
    }
}

/// A paired note together with the indices, into the originating event vector, of the note-on and
/// (if one was found) note-off event that produced it.
struct PairedNote {
    on_index: usize,
    off_index: Option<usize>,
    note: Note,
}

/// Pairs note-on and note-off events in `events` into logical notes.
///
/// Scans in order, maintaining absolute time as a running sum of delta-times. A note-on with
/// velocity greater than zero opens a note at `(channel, key_number)`; a note-off, or a note-on
/// with velocity zero, closes the most recently opened note at that `(channel, key_number)` (an
/// unmatched note-off is discarded silently). Any note left open when the stream ends is closed at
/// the stream's final absolute time, or at tick `0` if the stream has no events at all. The
/// returned list is in note-off order, with end-of-stream closures appended in the order their
/// note-on events appeared.
fn pair_notes(events: &[TrackEvent]) -> Vec<PairedNote> {
    let mut open: HashMap<(u8, u8), (usize, u64, Velocity)> = HashMap::new();
    let mut result = Vec::new();
    let mut absolute: u64 = 0;

    for (index, event) in events.iter().enumerate() {
        absolute += u64::from(event.delta_time());
        match event.event() {
            Event::Midi(Message::NoteOn(nm)) if nm.velocity.get() > 0 => {
                open.insert(
                    (nm.channel.get(), nm.note_number.get()),
                    (index, absolute, nm.velocity),
                );
            }
            Event::Midi(Message::NoteOn(nm)) => {
                close_note(&mut open, &mut result, nm.channel, nm.note_number, index, absolute);
            }
            Event::Midi(Message::NoteOff(nm)) => {
                close_note(&mut open, &mut result, nm.channel, nm.note_number, index, absolute);
            }
            _ => {}
        }
    }

    // any note still open at end-of-stream is closed at the final absolute time (0 if the stream
    // was empty). closures are emitted in the order their note-ons were first seen so that output
    // is deterministic despite the hash map's unordered iteration.
    let mut dangling: Vec<(usize, u64, Velocity, (u8, u8))> = open
        .into_iter()
        .map(|(key, (on_index, start, vel))| (on_index, start, vel, key))
        .collect();
    dangling.sort_unstable_by_key(|(on_index, ..)| *on_index);
    for (on_index, start, vel, (channel, key)) in dangling {
        result.push(PairedNote {
            on_index,
            off_index: None,
            note: Note {
                channel: Channel::new(channel),
                key_number: NoteNumber::new(key),
                start_tick: start,
                end_tick: absolute,
                on_velocity: vel,
            },
        });
    }

    result
}

fn close_note(
    open: &mut HashMap<(u8, u8), (usize, u64, Velocity)>,
    result: &mut Vec<PairedNote>,
    channel: Channel,
    key_number: NoteNumber,
    off_index: usize,
    absolute: u64,
) {
    if let Some((on_index, start, velocity)) = open.remove(&(channel.get(), key_number.get())) {
        result.push(PairedNote {
            on_index,
            off_index: Some(off_index),
            note: Note {
                channel,
                key_number,
                start_tick: start,
                end_tick: absolute,
                on_velocity: velocity,
            },
        });
    }
    // an unmatched note-off has nothing to close; it is discarded silently, per spec.
}

/// The edit [`process_notes`] applies to every note that matches its predicate.
#[derive(Clone, Copy, Debug)]
pub enum NoteOp {
    /// Excise both the note-on and its matching note-off from the event stream, preserving
    /// delta-times exactly as [`crate::filter_events`] does.
    Remove,
    /// Add `semitones` to the key number of both the note-on and note-off, clamping the result to
    /// `0..=127`.
    ShiftPitch(i32),
    /// Change the note-on's velocity; the matching note-off's velocity is left alone.
    SetVelocity(VelocityOp),
}

/// The new velocity [`NoteOp::SetVelocity`] assigns to a note-on.
#[derive(Clone, Copy)]
pub enum VelocityOp {
    /// Every matched note-on gets this velocity, clamped to `0..=127`.
    Constant(u8),
    /// Every matched note-on's velocity is computed from the full paired note record (so the
    /// function can see the note's duration, original velocity, etc.), then clamped to `0..=127`.
    Dynamic(fn(&Note) -> u8),
}

impl std::fmt::Debug for VelocityOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VelocityOp::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            VelocityOp::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Returns a copy of `seq` in which every paired note in the track at `track_index` satisfying
/// `predicate` has had `op` applied. Fails with `TrackOutOfRange` if `track_index` is out of
/// range; otherwise total (clamping, silent discard of unmatched note-offs, sentinel-closed
/// unmatched note-ons, as documented on [`pair_notes`]).
pub fn process_notes<F>(
    seq: &MidiFile,
    track_index: usize,
    predicate: F,
    op: NoteOp,
) -> Result<MidiFile>
where
    F: Fn(&Note) -> bool,
{
    Ok(process_notes_inner(seq, track_index, predicate, op)?)
}

fn process_notes_inner<F>(
    seq: &MidiFile,
    track_index: usize,
    predicate: F,
    op: NoteOp,
) -> LibResult<MidiFile>
where
    F: Fn(&Note) -> bool,
{
    let track = match seq.track(track_index) {
        Some(track) => track,
        None => {
            return crate::error::TrackOutOfRange {
                site: site!(),
                index: track_index,
                len: seq.tracks_len(),
            }
            .fail()
        }
    };
    let events: Vec<TrackEvent> = track.events().cloned().collect();
    let paired = pair_notes(&events);
    let matched: Vec<&PairedNote> = paired.iter().filter(|p| predicate(&p.note)).collect();

    let new_events = match op {
        NoteOp::Remove => apply_remove(&events, &matched),
        NoteOp::ShiftPitch(semitones) => apply_shift_pitch(&events, &matched, semitones),
        NoteOp::SetVelocity(vel_op) => apply_set_velocity(&events, &matched, vel_op),
    };

    seq.replace_track(track_index, Track::from_events(new_events))
}

fn apply_remove(events: &[TrackEvent], matched: &[&PairedNote]) -> Vec<TrackEvent> {
    let mut dropped = vec![false; events.len()];
    for p in matched {
        dropped[p.on_index] = true;
        if let Some(off) = p.off_index {
            dropped[off] = true;
        }
    }
    let mut result = Vec::with_capacity(events.len());
    let mut carried = 0u32;
    for (index, event) in events.iter().enumerate() {
        if dropped[index] {
            carried = carried.saturating_add(event.delta_time());
        } else {
            result.push(TrackEvent::new(
                event.delta_time().saturating_add(carried),
                event.event().clone(),
            ));
            carried = 0;
        }
    }
    result
}

fn apply_shift_pitch(
    events: &[TrackEvent],
    matched: &[&PairedNote],
    semitones: i32,
) -> Vec<TrackEvent> {
    let mut new_keys: HashMap<usize, NoteNumber> = HashMap::new();
    for p in matched {
        let shifted = (i32::from(p.note.key_number.get()) + semitones).clamp(0, 127) as u8;
        let key = NoteNumber::new(shifted);
        new_keys.insert(p.on_index, key);
        if let Some(off) = p.off_index {
            new_keys.insert(off, key);
        }
    }
    events
        .iter()
        .enumerate()
        .map(|(index, event)| match new_keys.get(&index) {
            Some(&key) => TrackEvent::new(event.delta_time(), with_key(event.event(), key)),
            None => event.clone(),
        })
        .collect()
}

fn apply_set_velocity(
    events: &[TrackEvent],
    matched: &[&PairedNote],
    vel_op: VelocityOp,
) -> Vec<TrackEvent> {
    let mut new_velocities: HashMap<usize, Velocity> = HashMap::new();
    for p in matched {
        let raw = match vel_op {
            VelocityOp::Constant(v) => v,
            VelocityOp::Dynamic(f) => f(&p.note),
        };
        new_velocities.insert(p.on_index, Velocity::new(raw.min(127)));
    }
    events
        .iter()
        .enumerate()
        .map(|(index, event)| match new_velocities.get(&index) {
            Some(&velocity) => {
                TrackEvent::new(event.delta_time(), with_velocity(event.event(), velocity))
            }
            None => event.clone(),
        })
        .collect()
}

fn with_key(event: &Event, key_number: NoteNumber) -> Event {
    match event {
        Event::Midi(Message::NoteOn(nm)) => Event::Midi(Message::NoteOn(NoteMessage {
            channel: nm.channel,
            note_number: key_number,
            velocity: nm.velocity,
        })),
        Event::Midi(Message::NoteOff(nm)) => Event::Midi(Message::NoteOff(NoteMessage {
            channel: nm.channel,
            note_number: key_number,
            velocity: nm.velocity,
        })),
        other => other.clone(),
    }
}

fn with_velocity(event: &Event, velocity: Velocity) -> Event {
    match event {
        Event::Midi(Message::NoteOn(nm)) => Event::Midi(Message::NoteOn(NoteMessage {
            channel: nm.channel,
            note_number: nm.note_number,
            velocity,
        })),
        other => other.clone(),
    }
}

/// A duration, in whichever unit [`SonorityOptions::ppqn`] selects: raw ticks if no ppqn was
/// given, beats (`ticks / ppqn`) if one was.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Duration {
    /// A duration expressed in raw ticks.
    Ticks(u64),
    /// A duration expressed in beats (quarter notes).
    Beats(f64),
}

/// A single pitch within a [`Sonority::Note`] or [`Sonority::Chord`]. Letter-name and enharmonic
/// spelling are left to an external music-theory collaborator (see the crate's module docs); this
/// crate always has the raw key number and the octave it falls in (middle C, key 60, is octave 4).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SonorityPitch {
    channel: Channel,
    key_number: NoteNumber,
    octave: i8,
    velocity: Velocity,
}

impl SonorityPitch {
    /// The channel the note sounded on.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The raw MIDI key number, `0..=127`.
    pub fn key_number(&self) -> NoteNumber {
        self.key_number
    }

    /// The octave the key falls in, using the convention that middle C (key 60) is octave 4.
    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// The velocity the note-on carried.
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }
}

fn to_sonority_pitch(note: &Note) -> SonorityPitch {
    SonorityPitch {
        channel: note.channel,
        key_number: note.key_number,
        octave: (i32::from(note.key_number.get()) / 12 - 1) as i8,
        velocity: note.on_velocity,
    }
}

/// A musical unit occupying one segment of a track's timeline: silence, a single pitch, or a
/// group of pitches sounding together.
#[derive(Clone, Debug, PartialEq)]
pub enum Sonority {
    /// No note is sounding during this segment.
    Rest(Duration),
    /// Exactly one note is sounding during this segment.
    Note(SonorityPitch, Duration),
    /// Two or more notes are sounding together during this segment.
    Chord(Vec<SonorityPitch>, Duration),
}

impl Sonority {
    /// The duration of this sonority.
    pub fn duration(&self) -> Duration {
        match self {
            Sonority::Rest(d) | Sonority::Note(_, d) | Sonority::Chord(_, d) => *d,
        }
    }
}

/// Options controlling [`track_to_sonorities`].
#[derive(Clone, Copy, Debug)]
pub struct SonorityOptions {
    /// Notes whose start ticks fall within this many ticks of a segment's start are still
    /// considered part of the chord at that segment, even if they didn't start at exactly the
    /// same tick. Defaults to `0`.
    pub chord_tolerance: u32,
    /// If supplied, durations are expressed in beats (`ticks / ppqn`) instead of raw ticks.
    pub ppqn: Option<u16>,
}

impl Default for SonorityOptions {
    fn default() -> Self {
        Self {
            chord_tolerance: 0,
            ppqn: None,
        }
    }
}

/// Reconstructs `track` as a chronological sequence of [`Sonority`] values: a rest wherever no
/// note sounds, a `Note` wherever exactly one does, and a `Chord` wherever two or more overlap.
///
/// Notes are paired as in [`process_notes`]. The distinct start and end ticks of every paired note
/// are collected into a sorted set, then ticks within `chord_tolerance` of the preceding kept tick
/// are merged into it — this is what lets a staggered chord's starts collapse onto a single
/// segment boundary instead of each fencing off its own sliver of a segment. Each consecutive pair
/// of the resulting boundaries defines a segment, and the sonority for that segment is determined
/// by which notes are active across its full span (a note is active if it starts no later than
/// `chord_tolerance` ticks after the segment's start, and ends no earlier than the segment's end).
/// Segments of zero duration are skipped; given the same notes and tolerance the output is always
/// the same sequence.
pub fn track_to_sonorities(track: &Track, opts: SonorityOptions) -> Vec<Sonority> {
    let events: Vec<TrackEvent> = track.events().cloned().collect();
    let notes: Vec<Note> = pair_notes(&events).into_iter().map(|p| p.note).collect();
    if notes.is_empty() {
        return Vec::new();
    }

    let mut raw_ticks: Vec<u64> = Vec::with_capacity(notes.len() * 2);
    for note in &notes {
        raw_ticks.push(note.start_tick);
        raw_ticks.push(note.end_tick);
    }
    raw_ticks.sort_unstable();
    raw_ticks.dedup();

    let tolerance = u64::from(opts.chord_tolerance);
    let mut ticks: Vec<u64> = Vec::with_capacity(raw_ticks.len());
    for tick in raw_ticks {
        match ticks.last() {
            Some(&last) if tick - last <= tolerance => {}
            _ => ticks.push(tick),
        }
    }

    let mut result = Vec::new();
    for window in ticks.windows(2) {
        let (segment_start, segment_end) = (window[0], window[1]);
        if segment_end <= segment_start {
            continue;
        }
        let active: Vec<&Note> = notes
            .iter()
            .filter(|n| n.start_tick <= segment_start + tolerance && n.end_tick >= segment_end)
            .collect();
        let duration = match opts.ppqn {
            Some(ppqn) if ppqn > 0 => {
                Duration::Beats((segment_end - segment_start) as f64 / f64::from(ppqn))
            }
            _ => Duration::Ticks(segment_end - segment_start),
        };
        let sonority = match active.len() {
            0 => Sonority::Rest(duration),
            1 => Sonority::Note(to_sonority_pitch(active[0]), duration),
            _ => Sonority::Chord(active.iter().map(|n| to_sonority_pitch(n)).collect(), duration),
        };
        result.push(sonority);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Channel, NoteNumber, Velocity};
    use crate::file::{Event, TrackEvent};

    fn on(delta: u32, channel: u8, key: u8, velocity: u8) -> TrackEvent {
        TrackEvent::new(
            delta,
            Event::Midi(Message::NoteOn(NoteMessage {
                channel: Channel::new(channel),
                note_number: NoteNumber::new(key),
                velocity: Velocity::new(velocity),
            })),
        )
    }

    fn off(delta: u32, channel: u8, key: u8) -> TrackEvent {
        TrackEvent::new(
            delta,
            Event::Midi(Message::NoteOff(NoteMessage {
                channel: Channel::new(channel),
                note_number: NoteNumber::new(key),
                velocity: Velocity::new(0),
            })),
        )
    }

    #[test]
    fn pairs_simple_note() {
        let events = vec![on(0, 0, 60, 100), off(100, 0, 60)];
        let paired = pair_notes(&events);
        assert_eq!(1, paired.len());
        assert_eq!(0, paired[0].note.start_tick());
        assert_eq!(100, paired[0].note.end_tick());
        assert_eq!(100, paired[0].note.on_velocity().get());
    }

    #[test]
    fn velocity_zero_note_on_closes_a_note() {
        let events = vec![on(0, 0, 60, 100), on(50, 0, 60, 0)];
        let paired = pair_notes(&events);
        assert_eq!(1, paired.len());
        assert_eq!(50, paired[0].note.end_tick());
    }

    #[test]
    fn unmatched_note_off_is_discarded() {
        let events = vec![off(10, 0, 60)];
        assert!(pair_notes(&events).is_empty());
    }

    #[test]
    fn unmatched_note_on_closes_at_stream_end() {
        let events = vec![on(0, 0, 60, 100), off(10, 0, 61)];
        let paired = pair_notes(&events);
        assert_eq!(1, paired.len());
        assert_eq!(0, paired[0].note.start_tick());
        assert_eq!(10, paired[0].note.end_tick());
    }

    #[test]
    fn empty_stream_pairs_to_nothing() {
        assert!(pair_notes(&[]).is_empty());
    }

    // S5: process_notes(Remove) removes a key-60 note and preserves the other note's timing.
    #[test]
    fn process_notes_remove_excises_matched_pair() {
        let mut seq = MidiFile::new(crate::file::Format::Multi, crate::file::Division::default());
        let track = Track::from_events(vec![
            on(0, 0, 60, 100),
            on(0, 0, 64, 100),
            off(100, 0, 60),
            off(100, 0, 64),
        ]);
        seq.push_track(track);

        let result = process_notes(
            &seq,
            0,
            |note| note.key_number().get() == 60,
            NoteOp::Remove,
        )
        .unwrap();
        let remaining: Vec<TrackEvent> = result.track(0).unwrap().events().cloned().collect();
        assert_eq!(2, remaining.len());
        assert_eq!(0, remaining[0].delta_time());
        assert!(matches!(
            remaining[0].event(),
            Event::Midi(Message::NoteOn(nm)) if nm.note_number().get() == 64
        ));
        assert_eq!(200, remaining[1].delta_time());
        assert!(matches!(
            remaining[1].event(),
            Event::Midi(Message::NoteOff(nm)) if nm.note_number().get() == 64
        ));
    }

    // S6: ShiftPitch clamps at 127.
    #[test]
    fn process_notes_shift_pitch_clamps() {
        let mut seq = MidiFile::new(crate::file::Format::Multi, crate::file::Division::default());
        let track = Track::from_events(vec![on(0, 0, 120, 100), off(10, 0, 120)]);
        seq.push_track(track);

        let result = process_notes(&seq, 0, |_| true, NoteOp::ShiftPitch(20)).unwrap();
        let events: Vec<TrackEvent> = result.track(0).unwrap().events().cloned().collect();
        assert!(matches!(
            events[0].event(),
            Event::Midi(Message::NoteOn(nm)) if nm.note_number().get() == 127
        ));
        assert!(matches!(
            events[1].event(),
            Event::Midi(Message::NoteOff(nm)) if nm.note_number().get() == 127
        ));
    }

    #[test]
    fn process_notes_set_velocity_leaves_note_off_alone() {
        let mut seq = MidiFile::new(crate::file::Format::Multi, crate::file::Division::default());
        let track = Track::from_events(vec![on(0, 0, 60, 50), off(10, 0, 60)]);
        seq.push_track(track);

        let result = process_notes(
            &seq,
            0,
            |_| true,
            NoteOp::SetVelocity(VelocityOp::Constant(200)),
        )
        .unwrap();
        let events: Vec<TrackEvent> = result.track(0).unwrap().events().cloned().collect();
        assert!(matches!(
            events[0].event(),
            Event::Midi(Message::NoteOn(nm)) if nm.velocity().get() == 127
        ));
        assert!(matches!(events[1].event(), Event::Midi(Message::NoteOff(_))));
    }

    #[test]
    fn process_notes_rejects_bad_track_index() {
        let seq = MidiFile::new(crate::file::Format::Multi, crate::file::Division::default());
        assert!(process_notes(&seq, 0, |_| true, NoteOp::Remove).is_err());
    }

    // S7: a three-note chord with staggered starts is grouped when tolerance covers the stagger,
    // and splits into separate sonorities without it.
    #[test]
    fn track_to_sonorities_groups_chord_within_tolerance() {
        let events = vec![
            on(0, 0, 60, 100),
            on(5, 0, 64, 100),
            on(5, 0, 67, 100),
            off(90, 0, 60),
            off(0, 0, 64),
            off(0, 0, 67),
        ];
        let track = Track::from_events(events);
        let sonorities = track_to_sonorities(
            &track,
            SonorityOptions {
                chord_tolerance: 10,
                ppqn: Some(480),
            },
        );
        assert_eq!(1, sonorities.len());
        match &sonorities[0] {
            Sonority::Chord(pitches, Duration::Beats(beats)) => {
                assert_eq!(3, pitches.len());
                assert!((beats - 100.0 / 480.0).abs() < 1e-9);
            }
            other => panic!("expected a chord, got {:?}", other),
        }
    }

    #[test]
    fn track_to_sonorities_without_tolerance_splits_the_stagger() {
        let events = vec![
            on(0, 0, 60, 100),
            on(5, 0, 64, 100),
            on(5, 0, 67, 100),
            off(90, 0, 60),
            off(0, 0, 64),
            off(0, 0, 67),
        ];
        let track = Track::from_events(events);
        let sonorities = track_to_sonorities(&track, SonorityOptions::default());
        assert!(sonorities.len() >= 2);
        let total_ticks: u64 = sonorities
            .iter()
            .map(|s| match s.duration() {
                Duration::Ticks(t) => t,
                Duration::Beats(_) => unreachable!(),
            })
            .sum();
        assert_eq!(100, total_ticks);
    }

    #[test]
    fn track_to_sonorities_rest_where_nothing_sounds() {
        let events = vec![on(0, 0, 60, 100), off(10, 0, 60), on(10, 0, 62, 100), off(10, 0, 62)];
        let track = Track::from_events(events);
        let sonorities = track_to_sonorities(&track, SonorityOptions::default());
        assert_eq!(3, sonorities.len());
        assert!(matches!(sonorities[0], Sonority::Note(..)));
        assert!(matches!(sonorities[1], Sonority::Rest(..)));
        assert!(matches!(sonorities[2], Sonority::Note(..)));
    }

    #[test]
    fn track_to_sonorities_empty_track_is_empty() {
        let track = Track::from_events(vec![]);
        assert!(track_to_sonorities(&track, SonorityOptions::default()).is_empty());
    }
}
