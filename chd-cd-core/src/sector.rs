//! Sector format conversion.
//!
//! A track stores sectors in one format; callers may ask for another. The
//! rules below say which byte range of the stored frame to return, and for
//! the single promotion case, which header to put in front of it.
//!
//! Raw sector layout (2352 bytes):
//!
//! ```text
//! MODE1:      sync(12) header(4) data(2048) edc/ecc(288)
//! MODE2 FORM1: sync(12) header(4) subheader(8) data(2048) edc/ecc(280)
//! ```

use crate::error::{CdError, CdResult};
use crate::msf::Msf;
use crate::track::{MAX_SECTOR_DATASIZE, TrackType};

/// Sync pattern at the start of every raw data sector.
pub const SYNC_BYTES: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

/// Sync pattern plus the MSF/mode header.
pub const RAW_HEADER_SIZE: usize = 16;

/// Byte range to read from a stored frame, plus an optional header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorConversion {
    /// Offset of the first returned byte within the stored sector
    pub offset: u32,
    /// Number of stored bytes to return
    pub length: u32,
    /// Header synthesized in front of the data when promoting to raw
    pub header: Option<[u8; RAW_HEADER_SIZE]>,
}

impl SectorConversion {
    /// Resolve how to produce `requested` data from a `stored` track.
    ///
    /// `address` is the sector address as requested; it only feeds the MSF
    /// of a synthesized header.
    pub fn resolve(
        stored: TrackType,
        requested: Option<TrackType>,
        address: u32,
    ) -> CdResult<Self> {
        use TrackType::*;

        let requested = match requested {
            None => return Ok(Self::plain(0, stored.data_size())),
            Some(requested) if requested == stored => {
                return Ok(Self::plain(0, stored.data_size()));
            }
            Some(requested) => requested,
        };

        let conversion = match (requested, stored) {
            (Mode1, Mode1Raw) => Self::plain(16, 2048),
            (Mode1Raw, Mode1) => {
                log::warn!("promotion of MODE1/FORM1 sector to MODE1 RAW is incomplete");
                Self {
                    offset: 0,
                    length: 2048,
                    header: Some(raw_mode1_header(address)),
                }
            }
            (Mode1, Mode2Form1 | Mode2Raw) => Self::plain(24, 2048),
            (Mode1, Mode2FormMix) => Self::plain(8, 2048),
            (Mode2, Mode1Raw | Mode2Raw) => Self::plain(16, 2336),
            _ => {
                return Err(CdError::not_supported(format!(
                    "conversion from type {} to type {} not supported",
                    stored, requested
                )));
            }
        };
        Ok(conversion)
    }

    fn plain(offset: u32, length: u32) -> Self {
        Self {
            offset,
            length,
            header: None,
        }
    }

    /// Whether the conversion fabricates bytes that were never stored.
    ///
    /// Promoted sectors carry a synthesized header and zeroed EDC/ECC.
    pub fn is_incomplete(&self) -> bool {
        self.header.is_some()
    }

    /// Size of the sector handed back to the caller.
    pub fn output_len(&self) -> usize {
        if self.header.is_some() {
            MAX_SECTOR_DATASIZE as usize
        } else {
            self.length as usize
        }
    }

    /// Turn the bytes read from the store into the returned sector.
    pub fn assemble(&self, data: Vec<u8>) -> Vec<u8> {
        match self.header {
            None => data,
            Some(header) => {
                let mut sector = Vec::with_capacity(self.output_len());
                sector.extend_from_slice(&header);
                sector.extend_from_slice(&data);
                sector.resize(self.output_len(), 0);
                sector
            }
        }
    }
}

/// Sync pattern, BCD MSF of `address` and mode byte 1.
pub fn raw_mode1_header(address: u32) -> [u8; RAW_HEADER_SIZE] {
    let mut header = [0u8; RAW_HEADER_SIZE];
    header[..12].copy_from_slice(&SYNC_BYTES);
    header[12..15].copy_from_slice(&Msf::from_frames(address).to_bcd());
    header[15] = 1;
    header
}

#[cfg(test)]
#[path = "tests/sector_tests.rs"]
mod tests;
