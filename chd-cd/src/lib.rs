//! CD-ROM and GD-ROM access to CHD files.
//!
//! Pairs the CD layer of [`chd_cd_core`] with the `chd` crate's decoder:
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = BufReader::new(File::open("game.chd")?);
//! let cd = chd_cd::open_cdrom(file)?;
//! for track in cd.tracks() {
//!     println!("{:02} {} {} frames", track.track, track.track_type, track.frames);
//! }
//! let sector = cd.read_sector(16, Some(chd_cd::TrackType::Mode1), false)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chd_store;

pub use chd_cd_core::*;
pub use chd_store::{ChdStore, open_cdrom};
