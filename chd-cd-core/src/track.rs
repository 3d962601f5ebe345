//! CD track descriptors.
//!
//! A [`TrackInfo`] is built from one parsed track record and carries the
//! byte sizes the sector reader needs, derived once from fixed tables.

use serde::{Deserialize, Serialize};

use crate::error::{CdError, CdResult};
use crate::metadata::{GapFields, TrackFields, TrackRecord};

/// Maximum number of tracks on a CD-ROM.
pub const MAX_TRACKS: u32 = 99;

/// Largest main-channel sector payload.
pub const MAX_SECTOR_DATASIZE: u32 = 2352;

/// Largest subcode payload per sector.
pub const MAX_SUBCODE_DATASIZE: u32 = 96;

/// One frame slot in a CD CHD: sector data plus subcode.
pub const FRAME_SIZE: u32 = MAX_SECTOR_DATASIZE + MAX_SUBCODE_DATASIZE;

/// CHD pads every track to a multiple of this many frames.
pub const TRACK_PADDING: u32 = 4;

/// Track number that addresses the start of the lead-out.
pub const LEAD_OUT_TRACK: u32 = 0xAA;

/// Sector layout of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackType {
    /// MODE1 user data only (2048 bytes)
    Mode1,
    /// MODE1 raw sector (2352 bytes)
    Mode1Raw,
    /// MODE2 without sync/header (2336 bytes)
    Mode2,
    /// MODE2 FORM1 user data (2048 bytes)
    Mode2Form1,
    /// MODE2 FORM2 user data (2324 bytes)
    Mode2Form2,
    /// MODE2 with subheader, mixed forms (2336 bytes)
    Mode2FormMix,
    /// MODE2 raw sector (2352 bytes)
    Mode2Raw,
    /// Red Book audio (2352 bytes)
    Audio,
}

impl TrackType {
    /// Bytes of sector data stored per frame for this type.
    pub fn data_size(&self) -> u32 {
        match self {
            Self::Mode1 => 2048,
            Self::Mode1Raw => 2352,
            Self::Mode2 => 2336,
            Self::Mode2Form1 => 2048,
            Self::Mode2Form2 => 2324,
            Self::Mode2FormMix => 2336,
            Self::Mode2Raw => 2352,
            Self::Audio => 2352,
        }
    }

    /// Canonical name as written in CHD metadata.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mode1 => "MODE1",
            Self::Mode1Raw => "MODE1_RAW",
            Self::Mode2 => "MODE2",
            Self::Mode2Form1 => "MODE2_FORM1",
            Self::Mode2Form2 => "MODE2_FORM2",
            Self::Mode2FormMix => "MODE2_FORM_MIX",
            Self::Mode2Raw => "MODE2_RAW",
            Self::Audio => "AUDIO",
        }
    }

    /// Decode a metadata token, accepting both the symbolic and the
    /// `MODEn/size` spellings.
    ///
    /// `MODE2/2336` is listed twice in the historical table, first as MODE2
    /// and then as MODE2_FORM_MIX; the later entry is the one that applies.
    pub fn from_metadata(token: &str) -> Option<Self> {
        let track_type = match token {
            "MODE1" | "MODE1/2048" => Self::Mode1,
            "MODE1_RAW" | "MODE1/2352" => Self::Mode1Raw,
            "MODE2" => Self::Mode2,
            "MODE2_FORM1" | "MODE2/2048" => Self::Mode2Form1,
            "MODE2_FORM2" | "MODE2/2324" => Self::Mode2Form2,
            "MODE2_FORM_MIX" | "MODE2/2336" => Self::Mode2FormMix,
            "MODE2_RAW" | "MODE2/2352" => Self::Mode2Raw,
            "AUDIO" => Self::Audio,
            _ => return None,
        };
        Some(track_type)
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string cannot be parsed into a `TrackType`.
#[derive(Debug, Clone)]
pub struct TrackTypeParseError(pub String);

impl std::fmt::Display for TrackTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown track type: '{}'", self.0)
    }
}

impl std::error::Error for TrackTypeParseError {}

impl std::str::FromStr for TrackType {
    type Err = TrackTypeParseError;

    /// Parse any spelling accepted in metadata, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_metadata(&s.to_ascii_uppercase()).ok_or_else(|| TrackTypeParseError(s.to_string()))
    }
}

/// Subcode channel data stored alongside each sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubcodeType {
    None,
    /// Cooked R-W subcode
    Normal,
    /// Raw interleaved R-W subcode
    Raw,
}

impl SubcodeType {
    pub fn data_size(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Normal | Self::Raw => 96,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Normal => "RW",
            Self::Raw => "RW_RAW",
        }
    }

    pub fn from_metadata(token: &str) -> Option<Self> {
        match token {
            "NONE" => Some(Self::None),
            "RW" => Some(Self::Normal),
            "RW_RAW" => Some(Self::Raw),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubcodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A validated CD track with its derived sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Track number, starting at 1
    pub track: u32,
    pub track_type: TrackType,
    pub subtype: SubcodeType,
    /// Frames of main data, pregap included when it is stored
    pub frames: u32,
    /// GD-ROM padding frames
    pub pad_frames: u32,
    pub pregap_frames: u32,
    pub pregap_type: TrackType,
    pub pregap_subtype: SubcodeType,
    pub postgap_frames: u32,
    /// Frames added after the track to reach the 4-frame hunk alignment
    pub extra_frames: u32,
    pub data_size: u32,
    pub subcode_size: u32,
    /// Zero when the pregap has no backing bytes in the image
    pub pregap_data_size: u32,
    pub pregap_subcode_size: u32,
}

impl TrackInfo {
    /// Build and validate a track from a parsed metadata record.
    pub fn from_record(record: &TrackRecord) -> CdResult<Self> {
        let (base, pad_frames, gaps) = match record {
            TrackRecord::CdTrack { base } => (base, 0, None),
            TrackRecord::CdTrackPregap { base, gaps } => (base, 0, Some(gaps)),
            TrackRecord::GdTrack {
                base,
                pad_frames,
                gaps,
            } => (base, *pad_frames, Some(gaps)),
        };
        Self::build(base, pad_frames, gaps)
    }

    fn build(base: &TrackFields, pad_frames: u32, gaps: Option<&GapFields>) -> CdResult<Self> {
        if !(1..=MAX_TRACKS).contains(&base.track) {
            return Err(CdError::parsing(format!(
                "track number out of range: {}",
                base.track
            )));
        }

        let extra = extra_frames(base.frames);
        if base.frames.checked_add(extra).is_none() {
            return Err(CdError::parsing(format!(
                "track {} has too many frames: {}",
                base.track, base.frames
            )));
        }

        let gaps = gaps.copied().unwrap_or_default();
        let (pregap_data_size, pregap_subcode_size) = if gaps.pregap_stored {
            (
                gaps.pregap_type.data_size(),
                gaps.pregap_subtype.data_size(),
            )
        } else {
            (0, 0)
        };

        Ok(Self {
            track: base.track,
            track_type: base.track_type,
            subtype: base.subtype,
            frames: base.frames,
            pad_frames,
            pregap_frames: gaps.pregap,
            pregap_type: gaps.pregap_type,
            pregap_subtype: gaps.pregap_subtype,
            postgap_frames: gaps.postgap,
            extra_frames: extra,
            data_size: base.track_type.data_size(),
            subcode_size: base.subtype.data_size(),
            pregap_data_size,
            pregap_subcode_size,
        })
    }

    /// Whether the pregap occupies frames in the image.
    pub fn pregap_stored(&self) -> bool {
        self.pregap_data_size != 0
    }

    /// Frames the track occupies in the CHD, alignment padding included.
    /// `build` rejects tracks where this overflows.
    pub fn chd_frames(&self) -> u32 {
        self.frames + self.extra_frames
    }
}

/// Frames needed to pad `frames` up to the next multiple of [`TRACK_PADDING`].
pub fn extra_frames(frames: u32) -> u32 {
    (TRACK_PADDING - frames % TRACK_PADDING) % TRACK_PADDING
}

#[cfg(test)]
#[path = "tests/track_tests.rs"]
mod tests;
