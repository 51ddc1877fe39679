use crate::byte_iter::ByteIter;
use crate::error::LibResult;
use crate::scribe::Scribe;
use crate::vlq::Vlq;
use snafu::ResultExt;
use std::convert::TryFrom;
use std::io::{Read, Write};

/// A raw MIDI system exclusive message, stored as an opaque byte payload. This library does not
/// interpret sysex contents; it only preserves them across a read/write round trip.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct SysexEvent {
    t: SysexEventType,
    data: Vec<u8>,
}

impl SysexEvent {
    /// Creates a new sysex event of the given type, wrapping the given raw payload bytes. The
    /// payload does not include the leading `F0`/`F7` byte or the varlen length prefix.
    pub fn new(t: SysexEventType, data: Vec<u8>) -> Self {
        Self { t, data }
    }

    /// The sysex event type, `F0` or `F7`.
    pub fn event_type(&self) -> SysexEventType {
        self.t
    }

    /// The raw payload bytes, not including the leading status byte or varlen length.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn parse<R: Read>(first_byte: u8, iter: &mut ByteIter<R>) -> LibResult<Self> {
        // consume the F0/F7 byte that the caller peeked at.
        iter.read_or_die().context(io!())?;
        let t = SysexEventType::try_from(first_byte)?;
        let len = iter.read_vlq_u32().context(io!())?;
        let data = iter.read_n(len as usize).context(io!())?;
        Ok(Self { t, data })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut Scribe<W>) -> LibResult<()> {
        write_u8!(w, self.t as u8)?;
        let len = Vlq::new(self.data.len() as u32)
            .context(crate::error::Varlen { site: site!() })?
            .to_bytes();
        w.write_all(&len).context(wr!())?;
        w.write_all(&self.data).context(wr!())?;
        Ok(())
    }
}

/// `<sysex event>` is used to specify a MIDI system exclusive message, either as one unit or in
/// packets, or as an "escape" to specify any arbitrary bytes to be transmitted. See Appendix 1 -
/// MIDI Messages. A normal complete system exclusive message is stored in a MIDI File in this way:
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, Default)]
pub enum SysexEventType {
    /// F0 `<length>` `<bytes to be transmitted after F0>`
    ///
    /// The length is stored as a variable-length quantity. It specifies the number of bytes which
    /// follow it, not including the F0 or the length itself. For instance, the transmitted message
    /// `F0 43 12 00 07 F7` would be stored in a MIDI File as `F0 05 43 12 00 07 F7`. It is required
    /// to include the `F7` at the end so that the reader of the MIDI File knows that it has read
    /// the entire message.
    #[default]
    F0 = 0xf0,

    /// F7 <length> <all bytes to be transmitted>
    ///
    /// Unfortunately, some synthesiser manufacturers specify that their system exclusive messages
    /// are to be transmitted as little packets. Each packet is only part of an entire syntactical
    /// system exclusive message, but the times they are transmitted are important. Examples of this
    /// are the bytes sent in a CZ patch dump, or the FB-01's "system exclusive mode" in which
    /// microtonal data can be transmitted. The F0 and F7 sysex events may be used together to break
    /// up syntactically complete system exclusive messages into timed packets.
    ///
    /// An F0 sysex event is used for the first packet in a series -- it is a message in which the
    /// F0 should be transmitted. An F7 sysex event is used for the remainder of the packets, which
    /// do not begin with F0. (Of course, the F7 is not considered part of the system exclusive
    /// message).
    ///
    /// A syntactic system exclusive message must always end with an F7, even if the real-life
    /// device didn't send one, so that you know when you've reached the end of an entire sysex
    /// message without looking ahead to the next event in the MIDI File. If it's stored in one
    /// complete F0 sysex event, the last byte must be an F7. There also must not be any
    /// transmittable MIDI events in between the packets of a multi-packet system exclusive message.
    F7 = 0xf7,
}

impl TryFrom<u8> for SysexEventType {
    type Error = crate::Error;

    fn try_from(value: u8) -> crate::Result<Self> {
        match value {
            0xf0 => Ok(SysexEventType::F0),
            0xf7 => Ok(SysexEventType::F7),
            _ => Ok(invalid_file_r!("unrecognized sysex event type {:#x}", value)?),
        }
    }
}

#[cfg(test)]
mod sysex_tests {
    use super::*;
    use crate::byte_iter::ByteIter;
    use crate::scribe::ScribeSettings;

    #[test]
    fn round_trips_an_f0_message() {
        let event = SysexEvent::new(SysexEventType::F0, vec![0x43, 0x12, 0x00, 0x07, 0xf7]);
        let mut buf = Vec::new();
        {
            let mut scribe = Scribe::new(&mut buf, ScribeSettings::default());
            event.write(&mut scribe).unwrap();
        }
        assert_eq!(&[0xf0, 0x05, 0x43, 0x12, 0x00, 0x07, 0xf7], buf.as_slice());

        let mut iter = ByteIter::new(std::io::Cursor::new(buf).bytes()).unwrap();
        let parsed = SysexEvent::parse(0xf0, &mut iter).unwrap();
        assert_eq!(event, parsed);
    }
}
