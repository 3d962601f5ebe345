//! CD-ROM and GD-ROM structure of CHD disc images.
//!
//! The CHD container stores fixed-size hunks plus a list of tagged metadata
//! entries. For CD images each entry describes one track. This crate turns
//! those entries into a table of contents, derives the physical, logical and
//! CHD frame offsets of every track, and serves single sectors with format
//! conversion (e.g. MODE1 user data out of raw MODE1 frames).
//!
//! Decompression is not done here: anything implementing [`HunkStore`] can
//! back a [`CdRom`]. The `chd-cd` crate provides one over the `chd` crate,
//! and [`MemoryStore`] covers uncompressed images held in memory.

pub mod cdrom;
pub mod error;
pub mod mapping;
pub mod metadata;
pub mod msf;
pub mod sector;
pub mod store;
pub mod toc;
pub mod track;

pub use cdrom::{CdRom, ReadOptions};
pub use error::{CdError, CdResult, StoreError};
pub use mapping::{AddressMap, AddressSpace, MappingEntry};
pub use metadata::{MetadataFlags, MetadataTag, RawMetadata, TrackRecord};
pub use msf::Msf;
pub use sector::SectorConversion;
pub use store::{HunkStore, MemoryStore};
pub use toc::{Toc, TocFlags, read_toc};
pub use track::{
    FRAME_SIZE, LEAD_OUT_TRACK, MAX_SECTOR_DATASIZE, MAX_SUBCODE_DATASIZE, MAX_TRACKS,
    SubcodeType, TrackInfo, TrackType, TrackTypeParseError,
};
