//! [`HunkStore`] over a compressed CHD file, backed by the `chd` crate.

use std::io::{Read, Seek};
use std::sync::{Mutex, MutexGuard};

use chd::Chd;
use chd::iter::LendingIterator;
use chd_cd_core::{CdError, CdResult, CdRom, HunkStore, MetadataTag, RawMetadata};

/// Source of whole decompressed hunks.
trait HunkDecoder {
    /// Decompress hunk `number` into `out`, which is one hunk long.
    fn decompress(&mut self, number: u32, out: &mut Vec<u8>) -> CdResult<()>;
}

/// The open CHD file and its compressed-data scratch buffer.
struct ChdDecoder<F: Read + Seek> {
    chd: Chd<F>,
    compressed: Vec<u8>,
}

impl<F: Read + Seek> HunkDecoder for ChdDecoder<F> {
    fn decompress(&mut self, number: u32, out: &mut Vec<u8>) -> CdResult<()> {
        let mut hunk = self.chd.hunk(number).map_err(CdError::store)?;
        self.compressed.clear();
        hunk.read_hunk_in(&mut self.compressed, out)
            .map_err(CdError::store)?;
        Ok(())
    }
}

/// The part of a read that falls inside one hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HunkSpan {
    hunk: u64,
    /// Byte offset inside the hunk
    within: usize,
    count: usize,
}

/// Split `len` bytes starting at `offset` into per-hunk spans, in order.
fn hunk_spans(offset: u64, len: usize, hunk_bytes: u32) -> impl Iterator<Item = HunkSpan> {
    let hunk_bytes = u64::from(hunk_bytes);
    let end = offset.saturating_add(len as u64);
    let mut position = offset;
    std::iter::from_fn(move || {
        if position >= end || hunk_bytes == 0 {
            return None;
        }
        let within = position % hunk_bytes;
        let count = (hunk_bytes - within).min(end - position);
        let span = HunkSpan {
            hunk: position / hunk_bytes,
            within: within as usize,
            count: count as usize,
        };
        position += count;
        Some(span)
    })
}

/// Fail unless `len` bytes at `offset` lie inside an image of `logical_bytes`.
fn check_range(offset: u64, len: usize, logical_bytes: u64) -> CdResult<()> {
    match offset.checked_add(len as u64) {
        Some(end) if end <= logical_bytes => Ok(()),
        _ => Err(CdError::range(format!(
            "read of {} bytes at {} past end of image ({} bytes)",
            len, offset, logical_bytes
        ))),
    }
}

/// Decompression state: the decoder and the last hunk read.
struct HunkCache<D> {
    decoder: D,
    hunk_bytes: u32,
    hunk: Vec<u8>,
    current: Option<u32>,
}

impl<D: HunkDecoder> HunkCache<D> {
    fn new(decoder: D, hunk_bytes: u32) -> Self {
        Self {
            decoder,
            hunk_bytes,
            hunk: vec![0; hunk_bytes as usize],
            current: None,
        }
    }

    /// Make `number` the cached hunk, decompressing it if needed.
    fn load(&mut self, number: u32) -> CdResult<&[u8]> {
        if self.current != Some(number) {
            // A failed read leaves the buffer half-written.
            self.current = None;
            self.decoder.decompress(number, &mut self.hunk)?;
            self.current = Some(number);
            log::trace!("decompressed hunk {}", number);
        }
        Ok(&self.hunk)
    }

    /// Fill `buf` with the bytes starting at `offset`.
    fn read(&mut self, offset: u64, buf: &mut [u8]) -> CdResult<()> {
        let mut filled = 0;
        for span in hunk_spans(offset, buf.len(), self.hunk_bytes) {
            let number = u32::try_from(span.hunk)
                .map_err(|_| CdError::range(format!("hunk {} out of range", span.hunk)))?;
            let hunk = self.load(number)?;
            let bytes = hunk
                .get(span.within..span.within + span.count)
                .ok_or_else(|| CdError::range(format!("hunk {} is short", number)))?;
            buf[filled..filled + span.count].copy_from_slice(bytes);
            filled += span.count;
        }
        Ok(())
    }
}

/// A CHD file opened for CD reads.
///
/// Metadata is read once when opening. Hunks are decompressed on demand and
/// the most recent one is kept, so sequential sector reads mostly hit the
/// cache. The decoder sits behind a mutex: reads from several threads are
/// safe but serialized.
pub struct ChdStore<F: Read + Seek> {
    cache: Mutex<HunkCache<ChdDecoder<F>>>,
    metadata: Vec<(u32, RawMetadata)>,
    hunk_bytes: u32,
    unit_bytes: u32,
    hunk_count: u32,
    logical_bytes: u64,
}

impl<F: Read + Seek> ChdStore<F> {
    /// Open a CHD stream. Parent (delta) images are not supported.
    pub fn open(stream: F) -> CdResult<Self> {
        let mut chd = Chd::open(stream, None).map_err(CdError::store)?;

        let mut metadata = Vec::new();
        let mut entries = chd.metadata();
        while let Some(mut entry) = entries.next() {
            let meta = entry.read().map_err(CdError::store)?;
            metadata.push((meta.metatag, RawMetadata::from_bytes(&meta.value, meta.flags)));
        }

        let header = chd.header();
        let hunk_bytes = header.hunk_size();
        let unit_bytes = header.unit_bytes();
        let hunk_count = header.hunk_count();
        let logical_bytes = header.logical_bytes();
        log::debug!(
            "opened CHD: {} hunks of {} bytes, {} bytes per unit, {} metadata entries",
            hunk_count,
            hunk_bytes,
            unit_bytes,
            metadata.len()
        );

        let decoder = ChdDecoder {
            chd,
            compressed: Vec::with_capacity(hunk_bytes as usize),
        };
        Ok(Self {
            cache: Mutex::new(HunkCache::new(decoder, hunk_bytes)),
            metadata,
            hunk_bytes,
            unit_bytes,
            hunk_count,
            logical_bytes,
        })
    }

    pub fn hunk_count(&self) -> u32 {
        self.hunk_count
    }

    /// Size of the uncompressed image in bytes.
    pub fn logical_bytes(&self) -> u64 {
        self.logical_bytes
    }

    /// Every metadata entry of the file, in file order, as `(tag, entry)`.
    pub fn metadata_entries(&self) -> &[(u32, RawMetadata)] {
        &self.metadata
    }

    fn lock(&self) -> MutexGuard<'_, HunkCache<ChdDecoder<F>>> {
        // `current` is cleared before each decompression, so a poisoned
        // cache is still consistent.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<F: Read + Seek> HunkStore for ChdStore<F> {
    fn hunk_bytes(&self) -> u32 {
        self.hunk_bytes
    }

    fn unit_bytes(&self) -> u32 {
        self.unit_bytes
    }

    fn read_bytes(&self, offset: u64, buf: &mut [u8]) -> CdResult<()> {
        check_range(offset, buf.len(), self.logical_bytes)?;
        if buf.is_empty() {
            return Ok(());
        }
        self.lock().read(offset, buf)
    }

    fn metadata(&self, index: u32, tag: MetadataTag) -> CdResult<Option<RawMetadata>> {
        Ok(find_metadata(&self.metadata, index, tag).cloned())
    }
}

/// The `index`-th entry tagged `tag`, counting only entries with that tag.
fn find_metadata(entries: &[(u32, RawMetadata)], index: u32, tag: MetadataTag) -> Option<&RawMetadata> {
    let code = tag.as_u32();
    entries
        .iter()
        .filter(|(entry_tag, _)| *entry_tag == code)
        .nth(index as usize)
        .map(|(_, raw)| raw)
}

impl<F: Read + Seek> std::fmt::Debug for ChdStore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChdStore")
            .field("hunk_bytes", &self.hunk_bytes)
            .field("unit_bytes", &self.unit_bytes)
            .field("hunk_count", &self.hunk_count)
            .field("logical_bytes", &self.logical_bytes)
            .field("metadata", &self.metadata.len())
            .finish()
    }
}

/// Open a CHD stream and read its CD-ROM table of contents.
pub fn open_cdrom<F: Read + Seek>(stream: F) -> CdResult<CdRom<ChdStore<F>>> {
    CdRom::new(ChdStore::open(stream)?)
}

#[cfg(test)]
#[path = "tests/chd_store_tests.rs"]
mod tests;
