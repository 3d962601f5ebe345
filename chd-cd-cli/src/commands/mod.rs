pub(crate) mod meta;
pub(crate) mod read;
pub(crate) mod toc;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chd_cd::{CdRom, ChdStore};

use crate::error::CliError;

/// Open a CHD file as a CD-ROM.
pub(crate) fn open_disc(path: &Path) -> Result<CdRom<ChdStore<BufReader<File>>>, CliError> {
    let file = BufReader::new(File::open(path)?);
    log::debug!("opening {}", path.display());
    Ok(chd_cd::open_cdrom(file)?)
}
