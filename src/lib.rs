#![allow(dead_code)]

//! A library for reading and writing Standard MIDI Files (`.mid`), and for editing the event
//! streams they contain.
//!
//! ```no_run
//! use midi_file::MidiFile;
//!
//! let midi_file = MidiFile::load("beethoven.mid").unwrap();
//! for track in midi_file.tracks() {
//!     println!("track has {} events", track.events_len());
//! }
//! ```

#[macro_use]
mod error;
#[macro_use]
mod clamp;
#[macro_use]
mod macros;

mod byte_iter;
pub mod core;
pub mod file;
mod filter;
mod notes;
mod scribe;
mod text;
pub mod vlq;

use crate::byte_iter::ByteIter;
use crate::error::LibResult;
use crate::file::{ensure_end_of_track, Division, Event, Format, Header, MetaEvent, Track, TrackEvent};
use crate::scribe::{Scribe, ScribeSettings};
use log::trace;
use snafu::ResultExt;
use std::io::{Read, Write};
use std::path::Path;

pub use error::{Error, Result};
pub use filter::{event_kind, filter_events, preserve_delta_times, EventKind};
pub use notes::{
    process_notes, track_to_sonorities, Duration, Note, NoteOp, Sonority, SonorityOptions,
    SonorityPitch, VelocityOp,
};
pub use text::Text;

// https://www.music.mcgill.ca/~gary/306/week9/smf.html
// https://github.com/Shkyrockett/midi-unit-test-cases

/// A Standard MIDI File, held in memory: a header (format and time-basis) plus the tracks it
/// contains.
///
/// Files read with [`MidiFile::read`]/[`MidiFile::load`] are always normalized to format 1 on the
/// way in: a format 0 file's single track is split into a conductor track (carrying the track
/// name, tempo, time signature, key signature, and end-of-track events) and a content track
/// (carrying everything else), with each given a synthetic end-of-track event if it lacks one. On
/// the way back out, [`MidiFile::write`]/[`MidiFile::save`] always declare format 1, regardless of
/// how the file was constructed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Creates a new, empty MIDI file with the given format and time-basis. Tracks must be added
    /// with [`MidiFile::push_track`].
    pub fn new(format: Format, division: Division) -> Self {
        Self {
            header: Header::new(format, division),
            tracks: Vec::new(),
        }
    }

    /// The file's header (format and division/time-basis).
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The number of tracks in the file.
    pub fn tracks_len(&self) -> usize {
        self.tracks.len()
    }

    /// An iterator over the file's tracks, in order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// The track at `index`, if any.
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Appends a track to the end of the file.
    pub fn push_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Reads a MIDI file from `r`.
    pub fn read<R: Read>(r: R) -> Result<Self> {
        Ok(Self::read_inner(r)?)
    }

    /// Reads a MIDI file from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let iter = ByteIter::new_file(path).context(io!())?;
        Ok(Self::parse(iter)?)
    }

    /// Writes the file, as a Standard MIDI File, to `w`.
    pub fn write<W: Write>(&self, w: W) -> Result<()> {
        Ok(self.write_inner(w)?)
    }

    /// Writes the file, as a Standard MIDI File, to the file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let f = std::fs::File::create(path.as_ref()).context(wr!())?;
        self.write_inner(f)
    }

    fn read_inner<R: Read>(r: R) -> LibResult<Self> {
        let iter = ByteIter::new(r.bytes()).context(io!())?;
        Self::parse(iter)
    }

    fn parse<R: Read>(mut iter: ByteIter<R>) -> LibResult<Self> {
        trace!("scanning for 'MThd' cookie");
        consume_mthd_cookie(&mut iter)?;
        let chunk_length = iter.read_u32().context(io!())?;
        if chunk_length < 6 {
            return crate::error::TruncatedChunk {
                site: site!(),
                declared: chunk_length,
            }
            .fail();
        }
        iter.set_size_limit(chunk_length as u64);
        let format = Format::from_u16(iter.read_u16().context(io!())?)?;
        let ntracks = iter.read_u16().context(io!())?;
        let division = Division::from_u16(iter.read_u16().context(io!())?)?;
        if chunk_length > 6 {
            // some files pad the header chunk beyond the 6 bytes we understand.
            iter.read_n((chunk_length - 6) as usize).context(io!())?;
        }
        iter.clear_size_limit();

        let mut tracks = Vec::with_capacity(ntracks as usize);
        for i in 0..ntracks {
            trace!("parsing track chunk {} (zero-based) of {}", i, ntracks);
            tracks.push(Track::parse(&mut iter)?);
        }

        let header = Header::new(format, division);
        Self { header, tracks }.normalize()
    }

    /// Normalizes a freshly-parsed file to format 1: a format 0 file's single track is split into
    /// a conductor track and a content track.
    fn normalize(self) -> LibResult<Self> {
        match self.header.format() {
            Format::Single => {
                if self.tracks.len() != 1 {
                    invalid_file!(
                        "a format 0 file must contain exactly one track, found {}",
                        self.tracks.len()
                    );
                }
                let original = self.tracks.into_iter().next().expect("checked above");
                let events: Vec<TrackEvent> = original.events().cloned().collect();
                let conductor_events =
                    filter::preserve_delta_times(&events, |e| is_conductor_event(e.event()));
                let content_events =
                    filter::preserve_delta_times(&events, |e| !is_conductor_event(e.event()));
                let conductor = ensure_end_of_track(Track::from_events(conductor_events))?;
                let content = ensure_end_of_track(Track::from_events(content_events))?;
                Ok(Self {
                    header: Header::new(Format::Multi, *self.header.division()),
                    tracks: vec![conductor, content],
                })
            }
            Format::Multi | Format::Sequential => Ok(self),
        }
    }

    fn write_inner<W: Write>(&self, w: W) -> LibResult<()> {
        debug_assert!(self.tracks.len() <= u16::MAX as usize);
        let ntracks = self.tracks.len() as u16;
        let mut scribe = Scribe::new(w, ScribeSettings::default());
        // on write, the format word is always 1: the normalization that happens on read means a
        // constructed-from-scratch MidiFile is always in one-or-more-simultaneous-tracks shape.
        let header = Header::new(Format::Multi, *self.header.division());
        header.write(&mut scribe, ntracks)?;
        for track in &self.tracks {
            track.write(&mut scribe)?;
        }
        Ok(())
    }

    /// Returns a copy of this file with the track at `index` replaced by `track`. Fails with
    /// `TrackOutOfRange` if `index` is out of range.
    pub(crate) fn replace_track(&self, index: usize, track: Track) -> LibResult<Self> {
        if index >= self.tracks.len() {
            return crate::error::TrackOutOfRange {
                site: site!(),
                index,
                len: self.tracks.len(),
            }
            .fail();
        }
        let mut tracks = self.tracks.clone();
        tracks[index] = track;
        Ok(Self {
            header: self.header,
            tracks,
        })
    }
}

/// Scans forward, one byte at a time, until the `MThd` cookie is found and consumes it. Some
/// files carry leading bytes (an ID3 tag, a shebang, etc.) before the header chunk, so the cookie
/// is not assumed to start at the first byte of the stream.
fn consume_mthd_cookie<R: Read>(iter: &mut ByteIter<R>) -> LibResult<()> {
    while iter.read().context(io!())?.is_some() {
        if iter.is_tag("MThd") {
            // `current` already holds 'M'; consume the remaining three bytes of the tag.
            iter.read().context(io!())?;
            iter.read().context(io!())?;
            iter.read().context(io!())?;
            return Ok(());
        }
    }
    crate::error::BadCookie { site: site!() }.fail()
}

/// The meta events that belong on the conductor track when normalizing a format 0 file.
fn is_conductor_event(event: &Event) -> bool {
    matches!(
        event,
        Event::Meta(MetaEvent::TrackName(_))
            | Event::Meta(MetaEvent::SetTempo(_))
            | Event::Meta(MetaEvent::TimeSignature(_))
            | Event::Meta(MetaEvent::KeySignature(_))
            | Event::Meta(MetaEvent::EndOfTrack)
    )
}
