//! Minutes:seconds:frames addressing.
//!
//! A CD plays 75 frames per second. MSF is the player-facing form of a
//! frame count; raw data sectors also carry it in BCD inside their header.

use std::fmt;

/// Frames per second of CD playback.
pub const FRAMES_PER_SECOND: u32 = 75;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// A frame count split into minutes, seconds and frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Msf {
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl Msf {
    pub fn new(minutes: u32, seconds: u32, frames: u32) -> Self {
        Self {
            minutes,
            seconds,
            frames,
        }
    }

    /// Split an absolute frame count.
    pub fn from_frames(frames: u32) -> Self {
        let per_minute = SECONDS_PER_MINUTE * FRAMES_PER_SECOND;
        Self {
            minutes: frames / per_minute,
            seconds: (frames / FRAMES_PER_SECOND) % SECONDS_PER_MINUTE,
            frames: frames % FRAMES_PER_SECOND,
        }
    }

    /// Total frame count.
    pub fn to_frames(self) -> u32 {
        (self.minutes * SECONDS_PER_MINUTE + self.seconds) * FRAMES_PER_SECOND + self.frames
    }

    /// The three BCD bytes stored in a raw sector header.
    ///
    /// Minutes beyond 99 wrap, as a two-digit BCD byte cannot hold them.
    pub fn to_bcd(self) -> [u8; 3] {
        [
            to_bcd(self.minutes),
            to_bcd(self.seconds),
            to_bcd(self.frames),
        ]
    }
}

impl fmt::Display for Msf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minutes, self.seconds, self.frames)
    }
}

fn to_bcd(value: u32) -> u8 {
    ((((value / 10) % 10) << 4) | (value % 10)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_frame_counts() {
        assert_eq!(Msf::from_frames(0), Msf::new(0, 0, 0));
        assert_eq!(Msf::from_frames(74), Msf::new(0, 0, 74));
        assert_eq!(Msf::from_frames(75), Msf::new(0, 1, 0));
        assert_eq!(Msf::from_frames(4500), Msf::new(1, 0, 0));
        assert_eq!(Msf::from_frames(4500 + 150 + 3), Msf::new(1, 2, 3));
    }

    #[test]
    fn frames_survive_a_split() {
        for frames in [0, 1, 149, 150, 4499, 4500, 333_000] {
            assert_eq!(Msf::from_frames(frames).to_frames(), frames);
        }
    }

    #[test]
    fn displays_as_two_digit_fields() {
        assert_eq!(Msf::from_frames(0).to_string(), "00:00:00");
        assert_eq!(Msf::from_frames(4500 * 12 + 75 * 34 + 56).to_string(), "12:34:56");
    }

    #[test]
    fn encodes_bcd() {
        assert_eq!(Msf::new(12, 34, 56).to_bcd(), [0x12, 0x34, 0x56]);
        assert_eq!(Msf::new(0, 2, 0).to_bcd(), [0x00, 0x02, 0x00]);
        assert_eq!(Msf::new(79, 59, 74).to_bcd(), [0x79, 0x59, 0x74]);
    }
}
