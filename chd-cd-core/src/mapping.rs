//! Frame offsets of every track in the three address spaces.
//!
//! - physical: frames as recorded, one after another
//! - CHD: physical frames plus the per-track padding to 4-frame alignment
//! - logical: what a drive reports, including pregaps that are not stored
//!   and postgaps

use serde::{Deserialize, Serialize};

use crate::error::{CdError, CdResult};
use crate::toc::Toc;
use crate::track::TrackInfo;

/// Which frame numbering an address is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressSpace {
    #[default]
    Logical,
    Physical,
}

/// Offsets of one track, or of the lead-out for the last entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MappingEntry {
    pub physical_frame_offset: u32,
    pub chd_frame_offset: u32,
    pub logical_frame_offset: u32,
    pub logical_frame_count: u32,
}

impl MappingEntry {
    pub fn frame_offset(&self, space: AddressSpace) -> u32 {
        match space {
            AddressSpace::Logical => self.logical_frame_offset,
            AddressSpace::Physical => self.physical_frame_offset,
        }
    }
}

/// Running sums while walking the track list.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    physical: u32,
    chd: u32,
    logical: u32,
}

impl Totals {
    fn entry_for(self, track: &TrackInfo) -> CdResult<MappingEntry> {
        Ok(MappingEntry {
            physical_frame_offset: self.physical,
            chd_frame_offset: self.chd,
            logical_frame_offset: sum(track, &[self.logical, unstored_pregap(track)])?,
            logical_frame_count: track.frames.saturating_sub(track.pregap_frames),
        })
    }

    fn advance(self, track: &TrackInfo) -> CdResult<Self> {
        Ok(Self {
            physical: sum(track, &[self.physical, track.frames])?,
            chd: sum(track, &[self.chd, track.chd_frames()])?,
            logical: sum(
                track,
                &[
                    self.logical,
                    unstored_pregap(track),
                    track.frames,
                    track.postgap_frames,
                ],
            )?,
        })
    }

    fn lead_out(self) -> MappingEntry {
        MappingEntry {
            physical_frame_offset: self.physical,
            chd_frame_offset: self.chd,
            logical_frame_offset: self.logical,
            logical_frame_count: 0,
        }
    }
}

/// Pregap frames that exist only in the logical address space.
fn unstored_pregap(track: &TrackInfo) -> u32 {
    if track.pregap_stored() {
        0
    } else {
        track.pregap_frames
    }
}

/// Frame total up to `track`; the disc must fit 32-bit frame numbers.
fn sum(track: &TrackInfo, terms: &[u32]) -> CdResult<u32> {
    terms
        .iter()
        .try_fold(0u32, |total, &term| total.checked_add(term))
        .ok_or_else(|| {
            CdError::parsing(format!(
                "frame count overflows at track {}",
                track.track
            ))
        })
}

/// Per-track offsets followed by a lead-out entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMap {
    entries: Vec<MappingEntry>,
    /// First logical frame of each track, unstored pregap included
    logical_starts: Vec<u32>,
}

impl AddressMap {
    pub fn build(toc: &Toc) -> CdResult<Self> {
        let tracks = toc.tracks();
        let initial = (Vec::with_capacity(tracks.len() + 1), Totals::default());
        let (mut entries, totals) = tracks.iter().try_fold(
            initial,
            |(mut entries, totals): (Vec<_>, Totals), track| -> CdResult<_> {
                entries.push(totals.entry_for(track)?);
                Ok((entries, totals.advance(track)?))
            },
        )?;
        entries.push(totals.lead_out());

        let logical_starts = tracks
            .iter()
            .zip(&entries)
            .map(|(track, entry)| entry.logical_frame_offset - unstored_pregap(track))
            .collect();

        Ok(Self {
            entries,
            logical_starts,
        })
    }

    /// All entries, the lead-out last.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Number of entries, lead-out included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry of the track at `index` (0-based).
    pub fn entry(&self, index: usize) -> Option<&MappingEntry> {
        self.entries.get(index)
    }

    pub fn lead_out(&self) -> &MappingEntry {
        // build() always pushes the lead-out
        &self.entries[self.entries.len() - 1]
    }

    /// Index of the track containing `address`, or `None` at or past the
    /// lead-out.
    ///
    /// In logical space a track's range starts at its unstored pregap, so
    /// those addresses belong to the track they precede.
    pub fn locate(&self, address: u32, space: AddressSpace) -> Option<usize> {
        if address >= self.lead_out().frame_offset(space) {
            return None;
        }
        let track_count = self.entries.len() - 1;
        let found = match space {
            AddressSpace::Logical => self.logical_starts.partition_point(|&start| start <= address),
            AddressSpace::Physical => self.entries[..track_count]
                .partition_point(|entry| entry.physical_frame_offset <= address),
        };
        found.checked_sub(1)
    }
}

#[cfg(test)]
#[path = "tests/mapping_tests.rs"]
mod tests;
