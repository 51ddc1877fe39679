use snafu::Snafu;

/// The public Error type for this library.
#[derive(Debug, Snafu)]
pub struct Error(LibError);

/// The public Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// The internal Result type for this library.
pub(crate) type LibResult<T> = std::result::Result<T, LibError>;

/// The internal Error type for this library.
#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub(crate) enum LibError {
    #[snafu(display("Error while reading bytes: {}", source))]
    Io {
        site: String,
        source: crate::byte_iter::ByteError,
    },

    #[snafu(display("Error while writing bytes: {}", source))]
    Write {
        site: String,
        source: std::io::Error,
    },

    #[snafu(display("{}: The MIDI file is invalid: {}", site, description))]
    InvalidFile { site: String, description: String },

    #[snafu(display("{}: a track is too long to encode its chunk length: {}", site, source))]
    TrackTooLong {
        site: String,
        source: std::num::TryFromIntError,
    },

    #[snafu(display("{}: text is too long to encode its varlen length: {}", site, source))]
    StringTooLong {
        site: String,
        source: std::num::TryFromIntError,
    },

    #[snafu(display("{}: a varlen-length value could not be encoded: {}", site, source))]
    Varlen {
        site: String,
        source: crate::vlq::VlqError,
    },

    #[snafu(display("{}: running status was implied, but no previous status byte was recorded", site))]
    RunningStatus { site: String },

    #[snafu(display("{}: division word {:#06x} uses an unrecognized SMPTE frame rate", site, word))]
    UnknownSmpteFps { site: String, word: u16 },

    #[snafu(display("{}: track index {} is out of range, there are {} tracks", site, index, len))]
    TrackOutOfRange {
        site: String,
        index: usize,
        len: usize,
    },

    #[snafu(display("{}: no 'MThd' cookie was found", site))]
    BadCookie { site: String },

    #[snafu(display("{}: a chunk declared a length of {} bytes, which is too short", site, declared))]
    TruncatedChunk { site: String, declared: u32 },

    #[snafu(display("{} unknown error", site))]
    Other { site: String },
}

macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

macro_rules! io {
    () => {
        crate::error::Io { site: site!() }
    };
}

macro_rules! wr {
    () => {
        crate::error::Write { site: site!() }
    };
}

macro_rules! noimpl {
    ($what:expr) => {
        return invalid_file_r!(concat!("not implemented: ", $what));
    };
}

macro_rules! invalid_file_s {
    () => {
        crate::error::InvalidFile {
            site: site!(),
            description: "[no description]",
        }
    };
    ($msg:expr) => {
        crate::error::InvalidFile {
            site: site!(),
            description: $msg,
        }
    };
    ($fmt:expr, $($arg:expr),+) => {
        crate::error::InvalidFile {
            site: site!(),
            description: format!($fmt, $($arg),+),
        }
    };
}

macro_rules! invalid_file_e {
    () => {
        invalid_file_s!().build()
    };
    ($msg:expr) => {
        invalid_file_s!($msg).build()
    };
    ($fmt:expr, $($arg:expr),+) => {
        invalid_file_s!($fmt, $($arg),+).build()
    };
}

macro_rules! invalid_file_r {
    () => {
        Err(invalid_file_e!())
    };
    ($msg:expr) => {
        Err(invalid_file_e!($msg))
    };
    ($fmt:expr, $($arg:expr),+) => {
        Err(invalid_file_e!($fmt, $($arg),+))
    };
}

macro_rules! invalid_file {
    () => {
        return invalid_file_r!();
    };
    ($msg:expr) => {
        return invalid_file_r!($msg)
    };
    ($fmt:expr, $($arg:expr),+) => {
        return invalid_file_r!($fmt, $($arg),+)
    };
}

#[test]
fn site_test() {
    let line = line!() + 1;
    let site = site!();
    assert!(site.contains("error.rs"));
    assert!(site.contains(format!("{}", line).as_str()));
}

#[test]
fn invalid_file_macros_test_no_message() {
    fn foo() -> LibResult<u64> {
        invalid_file!();
    }
    let result = foo();
    assert!(result.is_err());
    let message = format!("{}", result.err().unwrap());
    assert!(message.as_str().contains("The MIDI file is invalid"));
}

#[test]
fn invalid_file_macros_test_message() {
    fn foo() -> LibResult<u64> {
        let flerbin = String::from("flerbin");
        invalid_file!(flerbin);
    }
    let result = foo();
    assert!(result.is_err());
    let message = format!("{}", result.err().unwrap());
    assert!(message.as_str().contains("flerbin"));
}

#[test]
fn invalid_file_macros_test_fmt() {
    fn foo() -> LibResult<u64> {
        invalid_file!("hello {}, {}", "world", String::from("foo"));
    }
    let result = foo();
    assert!(result.is_err());
    let message = format!("{}", result.err().unwrap());
    assert!(message.as_str().contains("hello world, foo"));
}
