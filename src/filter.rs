//! Track-level event filtering that conserves the total delta-time of a track even as individual
//! events are dropped from it.

use crate::core::Message;
use crate::error::LibResult;
use crate::file::{Event, Track, TrackEvent};
use crate::{MidiFile, Result};

/// The coarse kind of an event, as distinguished by its status byte. This is the granularity at
/// which [`filter_events`] selects events for removal; it does not distinguish between, for
/// example, different meta event types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    NoteOff,
    NoteOn,
    PolyPressure,
    Controller,
    ProgramChange,
    ChannelPressure,
    PitchBend,
    ChannelMode,
    Sysex,
    Meta,
}

/// Classifies `event` into its coarse [`EventKind`].
pub fn event_kind(event: &Event) -> EventKind {
    match event {
        Event::Midi(Message::NoteOff(_)) => EventKind::NoteOff,
        Event::Midi(Message::NoteOn(_)) => EventKind::NoteOn,
        Event::Midi(Message::PolyPressure(_)) => EventKind::PolyPressure,
        Event::Midi(Message::Control(_)) => EventKind::Controller,
        Event::Midi(Message::ProgramChange(_)) => EventKind::ProgramChange,
        Event::Midi(Message::ChannelPressure(_)) => EventKind::ChannelPressure,
        Event::Midi(Message::PitchBend(_)) => EventKind::PitchBend,
        Event::Midi(_) => EventKind::ChannelMode,
        Event::Sysex(_) => EventKind::Sysex,
        Event::Meta(_) => EventKind::Meta,
    }
}

/// Returns a copy of `events` containing only the events for which `keep` returns `true`. Every
/// dropped event's delta-time is added to the delta-time of the next kept event (or, if no kept
/// event follows, it is simply lost) so that the sum of delta-times of the surviving run, and the
/// absolute time of every kept event, is unchanged.
///
/// Callers that need the final event (typically a track-end) to survive must make sure their
/// `keep` predicate says so explicitly; this function has no special knowledge of track-end.
pub fn preserve_delta_times<F>(events: &[TrackEvent], mut keep: F) -> Vec<TrackEvent>
where
    F: FnMut(&TrackEvent) -> bool,
{
    let mut result = Vec::with_capacity(events.len());
    let mut carried = 0u32;
    for event in events {
        if keep(event) {
            result.push(TrackEvent::new(
                event.delta_time().saturating_add(carried),
                event.event().clone(),
            ));
            carried = 0;
        } else {
            carried = carried.saturating_add(event.delta_time());
        }
    }
    result
}

fn filter_track(track: &Track, kind: EventKind) -> Track {
    let events: Vec<TrackEvent> = track.events().cloned().collect();
    let kept = preserve_delta_times(&events, |e| event_kind(e.event()) != kind);
    Track::from_events(kept)
}

/// Returns a new [`MidiFile`] in which every event of the given `kind` has been removed from the
/// track at `track_index`, conserving that track's total delta-time. Fails with
/// [`crate::Error`] (wrapping `TrackOutOfRange`) if `track_index` is out of range.
pub fn filter_events(seq: &MidiFile, track_index: usize, kind: EventKind) -> Result<MidiFile> {
    Ok(filter_events_inner(seq, track_index, kind)?)
}

fn filter_events_inner(seq: &MidiFile, track_index: usize, kind: EventKind) -> LibResult<MidiFile> {
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
    let filtered = filter_track(track, kind);
    seq.replace_track(track_index, filtered)
}

#[cfg(test)]
mod filter_tests {
    use super::*;
    use crate::core::{Channel, NoteNumber, PitchBendValue, Velocity};
    use crate::file::{Event, TrackEvent};

    fn note_on(delta: u32) -> TrackEvent {
        TrackEvent::new(
            delta,
            Event::Midi(Message::NoteOn(crate::core::NoteMessage {
                channel: Channel::new(0),
                note_number: NoteNumber::new(60),
                velocity: Velocity::new(100),
            })),
        )
    }

    fn note_off(delta: u32) -> TrackEvent {
        TrackEvent::new(
            delta,
            Event::Midi(Message::NoteOff(crate::core::NoteMessage {
                channel: Channel::new(0),
                note_number: NoteNumber::new(60),
                velocity: Velocity::new(0),
            })),
        )
    }

    fn pitch_bend(delta: u32) -> TrackEvent {
        TrackEvent::new(
            delta,
            Event::Midi(Message::PitchBend(crate::core::PitchBendMessage {
                channel: Channel::new(0),
                pitch_bend: PitchBendValue::new(8192),
            })),
        )
    }

    #[test]
    fn preserves_total_delta_time() {
        // deltas [10, 20, 30, 40, 50, 60], kinds [on, bend, bend, off, bend, on]
        let events = vec![
            note_on(10),
            pitch_bend(20),
            pitch_bend(30),
            note_off(40),
            pitch_bend(50),
            note_on(60),
        ];
        let kept = preserve_delta_times(&events, |e| event_kind(e.event()) != EventKind::PitchBend);
        let deltas: Vec<u32> = kept.iter().map(TrackEvent::delta_time).collect();
        assert_eq!(vec![10, 90, 110], deltas);
        let total: u32 = deltas.iter().sum();
        let original_total: u32 = events.iter().map(TrackEvent::delta_time).sum();
        assert_eq!(original_total, total);
    }

    #[test]
    fn filter_events_rejects_bad_track_index() {
        let seq = MidiFile::new(crate::file::Format::Multi, crate::file::Division::default());
        assert!(filter_events(&seq, 0, EventKind::PitchBend).is_err());
    }
}
