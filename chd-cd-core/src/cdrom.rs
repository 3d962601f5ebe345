//! Read access to a CD-ROM / GD-ROM stored in a CHD image.

use crate::error::{CdError, CdResult};
use crate::mapping::{AddressMap, AddressSpace, MappingEntry};
use crate::sector::SectorConversion;
use crate::store::HunkStore;
use crate::toc::{self, Toc};
use crate::track::{FRAME_SIZE, LEAD_OUT_TRACK, TrackInfo, TrackType};

/// Options for a sector read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Format to return; `None` returns the track's stored format.
    pub datatype: Option<TrackType>,

    /// Address frames physically (track after track, no gaps) instead of
    /// logically. Physical reads see stored pregaps in place.
    pub physical: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn datatype(mut self, datatype: TrackType) -> Self {
        self.datatype = Some(datatype);
        self
    }

    pub fn physical(mut self, physical: bool) -> Self {
        self.physical = physical;
        self
    }

    pub fn address_space(&self) -> AddressSpace {
        if self.physical {
            AddressSpace::Physical
        } else {
            AddressSpace::Logical
        }
    }
}

/// A CD-ROM or GD-ROM image opened over a hunk store.
///
/// The TOC and address map are computed once in [`CdRom::new`] and never
/// change; reads only borrow `self`.
#[derive(Debug)]
pub struct CdRom<S> {
    store: S,
    toc: Toc,
    mapping: AddressMap,
}

impl<S: HunkStore> CdRom<S> {
    /// Read the TOC from `store` and build the address map.
    pub fn new(store: S) -> CdResult<Self> {
        let toc = toc::read_toc(&store)?.ok_or_else(|| {
            CdError::not_found("image geometry is not that of a CD-ROM, no TOC")
        })?;
        let mapping = AddressMap::build(&toc)?;
        Ok(Self {
            store,
            toc,
            mapping,
        })
    }

    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    pub fn tracks(&self) -> &[TrackInfo] {
        self.toc.tracks()
    }

    pub fn track_count(&self) -> usize {
        self.toc.len()
    }

    pub fn is_gdrom(&self) -> bool {
        self.toc.is_gdrom()
    }

    pub fn mapping(&self) -> &AddressMap {
        &self.mapping
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// First frame of `track` (1-based), or of the lead-out for `0xAA`.
    pub fn track_start(&self, track: u32, physical: bool) -> CdResult<u32> {
        let space = ReadOptions::new().physical(physical).address_space();
        if track == LEAD_OUT_TRACK {
            return Ok(self.mapping.lead_out().frame_offset(space));
        }
        let count = self.toc.len();
        match self.mapping_for_track(track) {
            Some(entry) => Ok(entry.frame_offset(space)),
            None => Err(CdError::range(format!(
                "track must be in 1..{}, got {}",
                count, track
            ))),
        }
    }

    fn mapping_for_track(&self, track: u32) -> Option<&MappingEntry> {
        if track == 0 || track as usize > self.toc.len() {
            return None;
        }
        self.mapping.entry(track as usize - 1)
    }

    /// The track containing `address`.
    pub fn track_at(&self, address: u32, physical: bool) -> Option<&TrackInfo> {
        let space = ReadOptions::new().physical(physical).address_space();
        let index = self.mapping.locate(address, space)?;
        self.toc.tracks().get(index)
    }

    /// Read one sector.
    ///
    /// `datatype` selects the returned format (the stored one when `None`);
    /// `physical` selects the address space of `address`.
    pub fn read_sector(
        &self,
        address: u32,
        datatype: Option<TrackType>,
        physical: bool,
    ) -> CdResult<Vec<u8>> {
        let options = ReadOptions {
            datatype,
            physical,
        };
        self.read_sector_with(address, &options)
    }

    /// Read one sector as described by `options`.
    pub fn read_sector_with(&self, address: u32, options: &ReadOptions) -> CdResult<Vec<u8>> {
        let space = options.address_space();
        let index = self.mapping.locate(address, space).ok_or_else(|| {
            CdError::range(format!(
                "sector {} is past the lead-out at {}",
                address,
                self.mapping.lead_out().frame_offset(space)
            ))
        })?;
        let track = &self.toc.tracks()[index];
        let entry = &self.mapping.entries()[index];
        let conversion = SectorConversion::resolve(track.track_type, options.datatype, address)?;
        let track_offset = entry.frame_offset(space);
        let mut rel = u64::from(address.saturating_sub(track_offset));

        if space == AddressSpace::Logical {
            if track.pregap_stored() {
                // Logical addresses start at index 1, after the stored pregap.
                rel += u64::from(track.pregap_frames);
            } else if address < track_offset {
                log::trace!(
                    "sector {} lies in the unstored pregap of track {}",
                    address,
                    track.track
                );
                return Ok(vec![0u8; conversion.output_len()]);
            }
            // The postgap, and the frames a stored pregap shifts past the
            // track's end, have no bytes in the image.
            if rel >= u64::from(track.frames) {
                log::trace!(
                    "sector {} lies past the stored frames of track {}",
                    address,
                    track.track
                );
                return Ok(vec![0u8; conversion.output_len()]);
            }
        }
        let chd_sector = u64::from(entry.chd_frame_offset) + rel;

        let byte_offset = chd_sector * u64::from(FRAME_SIZE) + u64::from(conversion.offset);
        log::trace!(
            "sector {} -> track {} chd frame {} (+{} bytes, {} bytes)",
            address,
            track.track,
            chd_sector,
            conversion.offset,
            conversion.length
        );
        let mut data = vec![0u8; conversion.length as usize];
        self.store.read_bytes(byte_offset, &mut data)?;
        Ok(conversion.assemble(data))
    }
}
