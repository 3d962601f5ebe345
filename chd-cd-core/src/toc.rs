//! Table of contents assembly from CHD metadata.

use serde::{Deserialize, Serialize};

use crate::error::{CdError, CdResult};
use crate::metadata::{self, MetadataTag};
use crate::store::HunkStore;
use crate::track::{FRAME_SIZE, MAX_TRACKS, TrackInfo};

/// Disc-level properties discovered while reading the TOC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TocFlags {
    /// At least one track came from a GD-ROM record
    pub gdrom: bool,
}

/// Ordered tracks of a disc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toc {
    tracks: Vec<TrackInfo>,
    flags: TocFlags,
}

impl Toc {
    /// Assemble a TOC, checking that tracks are numbered `1..=N` in order.
    pub fn new(tracks: Vec<TrackInfo>, flags: TocFlags) -> CdResult<Self> {
        if tracks.len() > MAX_TRACKS as usize {
            return Err(CdError::parsing(format!(
                "too many tracks: {}",
                tracks.len()
            )));
        }
        let ordered = tracks
            .iter()
            .enumerate()
            .all(|(index, info)| info.track as usize == index + 1);
        if !ordered {
            return Err(CdError::parsing("unordered tracks"));
        }
        Ok(Self { tracks, flags })
    }

    pub fn tracks(&self) -> &[TrackInfo] {
        &self.tracks
    }

    pub fn flags(&self) -> TocFlags {
        self.flags
    }

    pub fn is_gdrom(&self) -> bool {
        self.flags.gdrom
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track by its 1-based number.
    pub fn track(&self, number: u32) -> Option<&TrackInfo> {
        let index = number.checked_sub(1)?;
        self.tracks.get(index as usize)
    }
}

/// Whether the store is shaped like a CD image: whole frames per hunk and
/// one frame per unit.
pub fn has_cd_geometry<S: HunkStore + ?Sized>(store: &S) -> bool {
    let hunk_bytes = store.hunk_bytes();
    hunk_bytes != 0 && hunk_bytes % FRAME_SIZE == 0 && store.unit_bytes() == FRAME_SIZE
}

/// Read the table of contents from the store's metadata.
///
/// Returns `Ok(None)` when the store geometry is not that of a CD image.
pub fn read_toc<S: HunkStore + ?Sized>(store: &S) -> CdResult<Option<Toc>> {
    if !has_cd_geometry(store) {
        log::debug!(
            "hunk size {} / unit size {} is not CD-shaped, no TOC",
            store.hunk_bytes(),
            store.unit_bytes()
        );
        return Ok(None);
    }

    let mut flags = TocFlags::default();
    let mut tracks = Vec::new();

    while (tracks.len() as u32) < MAX_TRACKS {
        let index = tracks.len() as u32;
        let (tag, raw) = if let Some(raw) = store.metadata(index, MetadataTag::CdromTrack)? {
            (MetadataTag::CdromTrack, raw)
        } else if let Some(raw) = store.metadata(index, MetadataTag::CdromTrackPregap)? {
            (MetadataTag::CdromTrackPregap, raw)
        } else if store.metadata(index, MetadataTag::GdromOld)?.is_some() {
            return Err(CdError::not_supported(
                "legacy GD-ROM track metadata, upgrade your CHD to a more recent version",
            ));
        } else if let Some(raw) = store.metadata(index, MetadataTag::GdromTrack)? {
            flags.gdrom = true;
            (MetadataTag::GdromTrack, raw)
        } else {
            break;
        };

        let parsed = metadata::parse(&raw, tag)?;
        let info = TrackInfo::from_record(&parsed.record)?;
        log::debug!(
            "{} track {}: {} {} frames={} pregap={} postgap={}",
            tag,
            info.track,
            info.track_type,
            info.subtype,
            info.frames,
            info.pregap_frames,
            info.postgap_frames
        );
        tracks.push(info);
    }

    if tracks.is_empty() {
        if store.metadata(0, MetadataTag::CdromOld)?.is_some() {
            return Err(CdError::not_supported(
                "legacy CD-ROM metadata, upgrade your CHD to a more recent version",
            ));
        }
        return Err(CdError::not_found("provided CHD is not a CD-ROM"));
    }

    let toc = Toc::new(tracks, flags)?;
    log::debug!(
        "read TOC with {} track(s){}",
        toc.len(),
        if toc.is_gdrom() { " (GD-ROM)" } else { "" }
    );
    Ok(Some(toc))
}

#[cfg(test)]
#[path = "tests/toc_tests.rs"]
mod tests;
