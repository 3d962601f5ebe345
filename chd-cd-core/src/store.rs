//! The hunk store seam.
//!
//! Everything below the CD layer (container header, hunk map, codecs, CRCs)
//! lives behind [`HunkStore`]. Reads are positional and take `&self`, so a
//! store that keeps decompression state must guard it itself; the CD layer
//! never relies on a cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{CdError, CdResult};
use crate::metadata::{MetadataTag, RawMetadata};

/// Random-access view over the uncompressed contents of a CHD image.
pub trait HunkStore {
    /// Bytes per hunk.
    fn hunk_bytes(&self) -> u32;

    /// Bytes per unit (one CD frame for CD images).
    fn unit_bytes(&self) -> u32;

    /// Fill `buf` from the uncompressed stream starting at `offset`.
    ///
    /// Fails if the range extends past the logical end of the image.
    fn read_bytes(&self, offset: u64, buf: &mut [u8]) -> CdResult<()>;

    /// The `index`-th metadata entry carrying `tag`, if there is one.
    fn metadata(&self, index: u32, tag: MetadataTag) -> CdResult<Option<RawMetadata>>;
}

impl<S: HunkStore + ?Sized> HunkStore for &S {
    fn hunk_bytes(&self) -> u32 {
        (**self).hunk_bytes()
    }

    fn unit_bytes(&self) -> u32 {
        (**self).unit_bytes()
    }

    fn read_bytes(&self, offset: u64, buf: &mut [u8]) -> CdResult<()> {
        (**self).read_bytes(offset, buf)
    }

    fn metadata(&self, index: u32, tag: MetadataTag) -> CdResult<Option<RawMetadata>> {
        (**self).metadata(index, tag)
    }
}

/// A [`HunkStore`] over an uncompressed image held in memory.
///
/// Counts the reads it serves, which makes it handy to check that a code
/// path never touches the image.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Vec<u8>,
    hunk_bytes: u32,
    unit_bytes: u32,
    metadata: Vec<(MetadataTag, RawMetadata)>,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new(data: Vec<u8>, hunk_bytes: u32, unit_bytes: u32) -> Self {
        Self {
            data,
            hunk_bytes,
            unit_bytes,
            metadata: Vec::new(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Append a metadata entry; entries keep their insertion order per tag.
    pub fn with_metadata(mut self, tag: MetadataTag, text: impl Into<String>, flags: u8) -> Self {
        self.metadata.push((tag, RawMetadata::new(text, flags)));
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of successful `read_bytes` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl HunkStore for MemoryStore {
    fn hunk_bytes(&self) -> u32 {
        self.hunk_bytes
    }

    fn unit_bytes(&self) -> u32 {
        self.unit_bytes
    }

    fn read_bytes(&self, offset: u64, buf: &mut [u8]) -> CdResult<()> {
        let start = usize::try_from(offset)
            .map_err(|_| CdError::range(format!("offset {} out of range", offset)))?;
        let end = start
            .checked_add(buf.len())
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                CdError::range(format!(
                    "read of {} bytes at {} past end of image ({} bytes)",
                    buf.len(),
                    offset,
                    self.data.len()
                ))
            })?;
        buf.copy_from_slice(&self.data[start..end]);
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn metadata(&self, index: u32, tag: MetadataTag) -> CdResult<Option<RawMetadata>> {
        Ok(self
            .metadata
            .iter()
            .filter(|(entry_tag, _)| *entry_tag == tag)
            .nth(index as usize)
            .map(|(_, raw)| raw.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_is_indexed_per_tag() {
        let store = MemoryStore::new(Vec::new(), 2448, 2448)
            .with_metadata(MetadataTag::CdromTrack, "first", 0)
            .with_metadata(MetadataTag::HardDisk, "other", 0)
            .with_metadata(MetadataTag::CdromTrack, "second", 1);

        let first = store.metadata(0, MetadataTag::CdromTrack).unwrap().unwrap();
        assert_eq!(first.text, "first");
        let second = store.metadata(1, MetadataTag::CdromTrack).unwrap().unwrap();
        assert_eq!(second, RawMetadata::new("second", 1));
        assert!(store.metadata(2, MetadataTag::CdromTrack).unwrap().is_none());
        assert!(store.metadata(0, MetadataTag::GdromTrack).unwrap().is_none());
    }

    #[test]
    fn reads_are_bounds_checked() {
        let store = MemoryStore::new((0u8..16).collect(), 16, 16);
        let mut buf = [0u8; 4];
        store.read_bytes(12, &mut buf).unwrap();
        assert_eq!(buf, [12, 13, 14, 15]);
        assert_eq!(store.reads(), 1);

        let err = store.read_bytes(13, &mut buf).unwrap_err();
        assert!(matches!(err, CdError::Range(_)));
        assert_eq!(store.reads(), 1);
    }
}
