//! CHD metadata records.
//!
//! Each metadata entry carries a four-character tag and a short text
//! payload. CD-ROM and GD-ROM images describe every track with one entry:
//!
//! | Tag  | Layout                                                                             |
//! |------|------------------------------------------------------------------------------------|
//! | CHTR | `TRACK:%d TYPE:%s SUBTYPE:%s FRAMES:%d`                                            |
//! | CHT2 | `TRACK:%d TYPE:%s SUBTYPE:%s FRAMES:%d PREGAP:%d PGTYPE:%s PGSUB:%s POSTGAP:%d`    |
//! | CHGD | `TRACK:%d TYPE:%s SUBTYPE:%s FRAMES:%d PAD:%d PREGAP:%d PGTYPE:%s PGSUB:%s POSTGAP:%d` |
//!
//! Fields appear in this exact order, separated by whitespace. A `V` in
//! front of the pregap type means the pregap sectors are stored in the image.

use crate::error::{CdError, CdResult};
use crate::track::{SubcodeType, TrackType};

/// Metadata entry tags known to the CHD format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataTag {
    /// Hard disk geometry (`GDDD`)
    HardDisk,
    /// Hard disk identify sector (`IDNT`)
    HardDiskIdent,
    /// Hard disk key (`KEY `)
    HardDiskKey,
    /// PCMCIA CIS (`CIS `)
    PcmciaCis,
    /// CD-ROM track (`CHTR`)
    CdromTrack,
    /// CD-ROM track with pregap and postgap (`CHT2`)
    CdromTrackPregap,
    /// GD-ROM track (`CHGD`)
    GdromTrack,
    /// Audio/video (`AVAV`)
    Av,
    /// Audio/video laserdisc (`AVLD`)
    AvLaserDisc,
    /// Whole-disc CD-ROM TOC from old CHD versions (`CHCD`)
    CdromOld,
    /// GD-ROM track from old CHD versions (`CHGT`)
    GdromOld,
}

const ALL_TAGS: &[MetadataTag] = &[
    MetadataTag::HardDisk,
    MetadataTag::HardDiskIdent,
    MetadataTag::HardDiskKey,
    MetadataTag::PcmciaCis,
    MetadataTag::CdromTrack,
    MetadataTag::CdromTrackPregap,
    MetadataTag::GdromTrack,
    MetadataTag::Av,
    MetadataTag::AvLaserDisc,
    MetadataTag::CdromOld,
    MetadataTag::GdromOld,
];

impl MetadataTag {
    /// The four ASCII bytes of the tag.
    pub fn code(&self) -> &'static [u8; 4] {
        match self {
            Self::HardDisk => b"GDDD",
            Self::HardDiskIdent => b"IDNT",
            Self::HardDiskKey => b"KEY ",
            Self::PcmciaCis => b"CIS ",
            Self::CdromTrack => b"CHTR",
            Self::CdromTrackPregap => b"CHT2",
            Self::GdromTrack => b"CHGD",
            Self::Av => b"AVAV",
            Self::AvLaserDisc => b"AVLD",
            Self::CdromOld => b"CHCD",
            Self::GdromOld => b"CHGT",
        }
    }

    /// Tag packed big-endian, as stored in the CHD metadata chain.
    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(*self.code())
    }

    /// Look up a tag from its packed form.
    pub fn from_u32(value: u32) -> Option<Self> {
        ALL_TAGS.iter().copied().find(|tag| tag.as_u32() == value)
    }

    /// Whether entries with this tag describe CD or GD tracks.
    pub fn is_cdrom(&self) -> bool {
        matches!(
            self,
            Self::CdromTrack
                | Self::CdromTrackPregap
                | Self::GdromTrack
                | Self::CdromOld
                | Self::GdromOld
        )
    }

    pub fn all() -> &'static [MetadataTag] {
        ALL_TAGS
    }
}

impl std::fmt::Display for MetadataTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.code()))
    }
}

/// Metadata flag bit: the entry participates in the image checksum.
pub const METADATA_FLAG_CHECKSUM: u8 = 0x01;

/// Decoded metadata entry flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetadataFlags {
    pub checksum: bool,
}

impl MetadataFlags {
    /// Decode raw flag bits, rejecting any bit this reader does not know.
    pub fn from_bits(bits: u8) -> CdResult<Self> {
        if bits & !METADATA_FLAG_CHECKSUM != 0 {
            return Err(CdError::parsing(format!(
                "unsupported metadata flag (0x{:x}), please fill a bug report",
                bits
            )));
        }
        Ok(Self {
            checksum: bits & METADATA_FLAG_CHECKSUM != 0,
        })
    }
}

/// A metadata entry as handed out by a hunk store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMetadata {
    pub text: String,
    pub flags: u8,
}

impl RawMetadata {
    pub fn new(text: impl Into<String>, flags: u8) -> Self {
        Self {
            text: text.into(),
            flags,
        }
    }

    /// Build from raw entry bytes; the payload is NUL-terminated ASCII.
    pub fn from_bytes(bytes: &[u8], flags: u8) -> Self {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Self {
            text: String::from_utf8_lossy(&bytes[..end]).into_owned(),
            flags,
        }
    }
}

/// Fields shared by every track record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackFields {
    pub track: u32,
    pub track_type: TrackType,
    pub subtype: SubcodeType,
    pub frames: u32,
}

/// Pregap and postgap description carried by `CHT2` and `CHGD` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapFields {
    pub pregap: u32,
    pub pregap_type: TrackType,
    /// The pregap type was written with a `V` prefix
    pub pregap_stored: bool,
    pub pregap_subtype: SubcodeType,
    pub postgap: u32,
}

impl Default for GapFields {
    fn default() -> Self {
        Self {
            pregap: 0,
            pregap_type: TrackType::Mode1,
            pregap_stored: false,
            pregap_subtype: SubcodeType::None,
            postgap: 0,
        }
    }
}

/// A parsed track record, one variant per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRecord {
    CdTrack {
        base: TrackFields,
    },
    CdTrackPregap {
        base: TrackFields,
        gaps: GapFields,
    },
    GdTrack {
        base: TrackFields,
        pad_frames: u32,
        gaps: GapFields,
    },
}

impl TrackRecord {
    pub fn base(&self) -> &TrackFields {
        match self {
            Self::CdTrack { base }
            | Self::CdTrackPregap { base, .. }
            | Self::GdTrack { base, .. } => base,
        }
    }

    pub fn tag(&self) -> MetadataTag {
        match self {
            Self::CdTrack { .. } => MetadataTag::CdromTrack,
            Self::CdTrackPregap { .. } => MetadataTag::CdromTrackPregap,
            Self::GdTrack { .. } => MetadataTag::GdromTrack,
        }
    }
}

/// A track record together with its entry flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMetadata {
    pub record: TrackRecord,
    pub flags: MetadataFlags,
}

/// Parse a metadata entry of the given tag.
///
/// Only the three track layouts are decoded; other tags are reported as
/// unsupported.
pub fn parse(raw: &RawMetadata, tag: MetadataTag) -> CdResult<ParsedMetadata> {
    let flags = MetadataFlags::from_bits(raw.flags)?;
    let record = parse_track_record(&raw.text, tag)?;
    Ok(ParsedMetadata { record, flags })
}

/// Parse the text of a `CHTR`, `CHT2` or `CHGD` entry.
pub fn parse_track_record(text: &str, tag: MetadataTag) -> CdResult<TrackRecord> {
    let mut scanner = FieldScanner::new(text);
    let record = match tag {
        MetadataTag::CdromTrack => TrackRecord::CdTrack {
            base: scan_track_fields(&mut scanner)?,
        },
        MetadataTag::CdromTrackPregap => {
            let base = scan_track_fields(&mut scanner)?;
            let gaps = scan_gap_fields(&mut scanner)?;
            TrackRecord::CdTrackPregap { base, gaps }
        }
        MetadataTag::GdromTrack => {
            let base = scan_track_fields(&mut scanner)?;
            let pad_frames = scanner.uint("PAD")?;
            let gaps = scan_gap_fields(&mut scanner)?;
            TrackRecord::GdTrack {
                base,
                pad_frames,
                gaps,
            }
        }
        other => {
            return Err(CdError::not_supported(format!(
                "metadata '{}' is not a track record",
                other
            )));
        }
    };
    scanner.finish()?;
    Ok(record)
}

fn scan_track_fields(scanner: &mut FieldScanner<'_>) -> CdResult<TrackFields> {
    let track = scanner.uint("TRACK")?;
    let track_type = decode_track_type(scanner.word("TYPE")?)?;
    let subtype = decode_subtype(scanner.word("SUBTYPE")?)?;
    let frames = scanner.uint("FRAMES")?;
    Ok(TrackFields {
        track,
        track_type,
        subtype,
        frames,
    })
}

fn scan_gap_fields(scanner: &mut FieldScanner<'_>) -> CdResult<GapFields> {
    let pregap = scanner.uint("PREGAP")?;
    let pgtype = scanner.word("PGTYPE")?;
    let (pgtype, pregap_stored) = match pgtype.strip_prefix('V') {
        Some(rest) => (rest, true),
        None => (pgtype, false),
    };
    let pregap_type = decode_track_type(pgtype)?;
    let pregap_subtype = decode_subtype(scanner.word("PGSUB")?)?;
    let postgap = scanner.uint("POSTGAP")?;
    Ok(GapFields {
        pregap,
        pregap_type,
        pregap_stored,
        pregap_subtype,
        postgap,
    })
}

fn decode_track_type(token: &str) -> CdResult<TrackType> {
    TrackType::from_metadata(token).ok_or_else(|| {
        CdError::parsing(format!("unable to decode track description: '{}'", token))
    })
}

fn decode_subtype(token: &str) -> CdResult<SubcodeType> {
    SubcodeType::from_metadata(token).ok_or_else(|| {
        CdError::parsing(format!("unable to decode track description: '{}'", token))
    })
}

fn layout_error() -> CdError {
    CdError::parsing("failed to parse track")
}

/// Walks the `KEY:value` fields of a record in order.
struct FieldScanner<'a> {
    fields: std::str::SplitAsciiWhitespace<'a>,
}

impl<'a> FieldScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            fields: text.trim_end_matches('\0').split_ascii_whitespace(),
        }
    }

    /// Value of the next field, which must be named `key`.
    fn value(&mut self, key: &str) -> CdResult<&'a str> {
        let field = self.fields.next().ok_or_else(layout_error)?;
        let value = field
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(layout_error)?;
        if value.is_empty() {
            return Err(layout_error());
        }
        Ok(value)
    }

    fn uint(&mut self, key: &str) -> CdResult<u32> {
        let value = self.value(key)?;
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(layout_error());
        }
        value
            .parse()
            .map_err(|_| CdError::parsing(format!("{} value too large: {}", key, value)))
    }

    fn word(&mut self, key: &str) -> CdResult<&'a str> {
        let value = self.value(key)?;
        if !value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'/')
        {
            return Err(layout_error());
        }
        Ok(value)
    }

    /// Fail if any field is left over.
    fn finish(mut self) -> CdResult<()> {
        match self.fields.next() {
            Some(_) => Err(layout_error()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "tests/metadata_tests.rs"]
mod tests;
