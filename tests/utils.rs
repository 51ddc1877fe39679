#![allow(dead_code)]

use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static LOGGER: Once = Once::new();

pub fn enable_logging() {
    LOGGER.call_once(logger_init)
}

fn logger_init() {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Warn)
        .init();
}

/// Wraps raw event bytes (delta/status/data, already hand-encoded) in an `MTrk` chunk.
pub fn mtrk(event_bytes: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(b"MTrk");
    v.extend_from_slice(&(event_bytes.len() as u32).to_be_bytes());
    v.extend_from_slice(event_bytes);
    v
}

/// Builds a format-1 Standard MIDI File byte image from raw `MTrk` event bodies, one per track,
/// at the given metrical division (ticks per quarter note).
pub fn smf1(ppqn: u16, tracks: &[&[u8]]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(b"MThd");
    v.extend_from_slice(&6u32.to_be_bytes());
    v.extend_from_slice(&1u16.to_be_bytes());
    v.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    v.extend_from_slice(&ppqn.to_be_bytes());
    for t in tracks {
        v.extend_from_slice(&mtrk(t));
    }
    v
}

/// The canonical end-of-track bytes: delta 0, `FF 2F 00`.
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Builds a format-0 Standard MIDI File byte image (a single track) at the given metrical
/// division.
pub fn smf0(ppqn: u16, track: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(b"MThd");
    v.extend_from_slice(&6u32.to_be_bytes());
    v.extend_from_slice(&0u16.to_be_bytes());
    v.extend_from_slice(&1u16.to_be_bytes());
    v.extend_from_slice(&ppqn.to_be_bytes());
    v.extend_from_slice(&mtrk(track));
    v
}
