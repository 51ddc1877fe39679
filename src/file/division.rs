use crate::error::{self, LibResult};
use crate::scribe::Scribe;
use crate::Error;
use snafu::{ensure, ResultExt};
use std::convert::TryFrom;
use std::io::Write;

clamp!(
    /// The allowable values for [`Division`] when using the quarter note method. Bit 15 of the
    /// division word marks the SMPTE arm, so the remaining 15 bits (`1..=32767`) are available to
    /// ppqn. The default value is 1024.
    QuarterNoteDivision,
    u16,
    1,
    32767,
    1024,
    pub
);

/// Specifies the meaning of the delta-times. It has two formats, one for metrical time, and one for
/// time-code-based time:
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Division {
    /// If bit 15 of <division> is a zero, the bits 14 thru 0 represent the number of delta-time
    /// "ticks" which make up a quarter-note. For instance, if <division> is 96, then a time
    /// interval of an eighth-note between two events in the file would be 48.
    QuarterNote(QuarterNoteDivision),
    /// Frame rate and resolution within the frame, for syncing to video or audio timecode.
    Smpte(SmpteRate),
}

impl Default for Division {
    fn default() -> Self {
        Division::QuarterNote(QuarterNoteDivision::default())
    }
}

const DIVISION_TYPE_BIT: u16 = 0b1000000000000000;

impl Division {
    /// Creates a metrical division from a ticks-per-quarter-note value.
    pub fn with_metrical(ppqn: u16) -> Self {
        Division::QuarterNote(QuarterNoteDivision::new(ppqn))
    }

    /// Creates a SMPTE division from a frame rate (one of `-24, -25, -29, -30`) and a
    /// ticks-per-frame resolution. Returns `None` if `fps` is not a recognized SMPTE frame rate.
    pub fn with_smpte(fps: i8, ticks_per_frame: u8) -> Option<Self> {
        let frame_rate = FrameRate::from_fps(fps)?;
        Some(Division::Smpte(SmpteRate {
            frame_rate,
            ticks_per_frame,
        }))
    }

    /// Returns the ticks-per-quarter-note value if this is a metrical division.
    pub fn ppqn(&self) -> Option<u16> {
        match self {
            Division::QuarterNote(q) => Some(q.get()),
            Division::Smpte(_) => None,
        }
    }

    /// Returns the SMPTE frame rate (`-24, -25, -29, or -30`) if this is a SMPTE division.
    pub fn smpte_fps(&self) -> Option<i8> {
        match self {
            Division::QuarterNote(_) => None,
            Division::Smpte(rate) => Some(rate.frame_rate.fps()),
        }
    }

    /// Returns the ticks-per-frame resolution if this is a SMPTE division.
    pub fn smpte_tpf(&self) -> Option<u8> {
        match self {
            Division::QuarterNote(_) => None,
            Division::Smpte(rate) => Some(rate.ticks_per_frame),
        }
    }

    /// Returns `true` if this is a metrical (quarter-note) division.
    pub fn is_metrical(&self) -> bool {
        matches!(self, Division::QuarterNote(_))
    }

    /// Returns `true` if this is a SMPTE (timecode) division.
    pub fn is_smpte(&self) -> bool {
        matches!(self, Division::Smpte(_))
    }

    pub(crate) fn from_u16(value: u16) -> LibResult<Self> {
        if value & DIVISION_TYPE_BIT == DIVISION_TYPE_BIT {
            let frame_rate_bits = ((value >> 8) & 0x7f) as u8;
            let ticks_per_frame = (value & 0xff) as u8;
            let frame_rate = FrameRate::from_bits(frame_rate_bits, value)?;
            ensure!(ticks_per_frame > 0, error::Other { site: site!() });
            Ok(Division::Smpte(SmpteRate {
                frame_rate,
                ticks_per_frame,
            }))
        } else {
            Ok(Division::QuarterNote(QuarterNoteDivision::new(value)))
        }
    }

    pub(crate) fn write<W: Write>(&self, w: &mut Scribe<W>) -> LibResult<()> {
        match self {
            Division::QuarterNote(q) => Ok(w.write_all(&q.get().to_be_bytes()).context(wr!())?),
            Division::Smpte(rate) => {
                let word = DIVISION_TYPE_BIT
                    | ((rate.frame_rate.to_bits() as u16) << 8)
                    | rate.ticks_per_frame as u16;
                Ok(w.write_all(&word.to_be_bytes()).context(wr!())?)
            }
        }
    }
}

impl TryFrom<u16> for Division {
    type Error = Error;

    fn try_from(value: u16) -> crate::Result<Self> {
        Ok(Division::from_u16(value)?)
    }
}

/// <division> Bits 14 thru 8 contain one of the four values -24, -25, -29, or -30, corresponding to
/// the four standard SMPTE and MIDI time code formats (-29 corresponds to 30 drop frame), and
/// represents the number of frames per second. These negative numbers are stored in two's
/// complement form.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum FrameRate {
    /// 24 frames per second
    N24,
    /// 25 frames per second
    N25,
    /// 30 drop frame
    N29,
    /// 30 frames per second
    N30,
}

impl Default for FrameRate {
    fn default() -> Self {
        FrameRate::N24
    }
}

impl FrameRate {
    const BITS_N24: u8 = 0b1101000;
    const BITS_N25: u8 = 0b1100111;
    const BITS_N29: u8 = 0b1100011;
    const BITS_N30: u8 = 0b1100010;

    fn from_bits(bits: u8, word: u16) -> LibResult<Self> {
        match bits {
            Self::BITS_N24 => Ok(FrameRate::N24),
            Self::BITS_N25 => Ok(FrameRate::N25),
            Self::BITS_N29 => Ok(FrameRate::N29),
            Self::BITS_N30 => Ok(FrameRate::N30),
            _ => crate::error::UnknownSmpteFps {
                site: site!(),
                word,
            }
            .fail(),
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            FrameRate::N24 => Self::BITS_N24,
            FrameRate::N25 => Self::BITS_N25,
            FrameRate::N29 => Self::BITS_N29,
            FrameRate::N30 => Self::BITS_N30,
        }
    }

    fn from_fps(fps: i8) -> Option<Self> {
        match fps {
            -24 => Some(FrameRate::N24),
            -25 => Some(FrameRate::N25),
            -29 => Some(FrameRate::N29),
            -30 => Some(FrameRate::N30),
            _ => None,
        }
    }

    fn fps(self) -> i8 {
        match self {
            FrameRate::N24 => -24,
            FrameRate::N25 => -25,
            FrameRate::N29 => -29,
            FrameRate::N30 => -30,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct SmpteRate {
    /// The number of frames per second.
    frame_rate: FrameRate,
    /// The <division> second byte (stored positive) is the resolution within a frame: typical
    /// values may be 4 (MIDI time code resolution), 8, 10, 80 (bit resolution), or 100. This system
    /// allows exact specification of time-code-based tracks, but also allows millisecond-based
    /// tracks by specifying 25 frames/sec and a resolution of 40 units per frame. If the events in
    /// a file are stored with bit resolution of thirty-frame time code, the division word would be
    /// E250 hex.
    ticks_per_frame: u8,
}

impl Default for SmpteRate {
    fn default() -> Self {
        // This is the 'millisecond-based tracks' example given by the spec.
        SmpteRate {
            frame_rate: FrameRate::N25,
            ticks_per_frame: 40,
        }
    }
}

#[cfg(test)]
mod division_tests {
    use super::*;

    #[test]
    fn metrical_round_trips() {
        let division = Division::from_u16(0x01E0).unwrap();
        assert_eq!(Some(480), division.ppqn());
        let mut buf = Vec::new();
        {
            let mut scribe = Scribe::new(&mut buf, crate::scribe::ScribeSettings::default());
            division.write(&mut scribe).unwrap();
        }
        assert_eq!(&[0x01, 0xE0], buf.as_slice());
    }

    #[test]
    fn smpte_round_trips() {
        let division = Division::from_u16(0xE728).unwrap();
        assert_eq!(Some(-25), division.smpte_fps());
        assert_eq!(Some(40), division.smpte_tpf());
        let mut buf = Vec::new();
        {
            let mut scribe = Scribe::new(&mut buf, crate::scribe::ScribeSettings::default());
            division.write(&mut scribe).unwrap();
        }
        assert_eq!(&[0xE7, 0x28], buf.as_slice());
    }

    #[test]
    fn with_smpte_matches_from_u16() {
        let division = Division::with_smpte(-25, 40).unwrap();
        assert_eq!(Division::from_u16(0xE728).unwrap(), division);
    }

    #[test]
    fn unrecognized_frame_rate_is_an_error() {
        // bits 8-14 = 0b1111111, not one of the four recognized negative frame rates.
        assert!(Division::from_u16(0xFF00).is_err());
    }
}
