use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use chd_cd::{ChdStore, HunkStore, MetadataFlags, MetadataTag, RawMetadata};

use crate::error::CliError;

/// Dump every metadata entry of a CHD file, CD or not.
pub(crate) fn run_meta(path: &Path) -> Result<(), CliError> {
    let store = ChdStore::open(BufReader::new(File::open(path)?))?;

    println!(
        "{}: {} hunks of {} bytes, {} bytes per unit, {} bytes total",
        path.display().if_supports_color(Stdout, |t| t.bold()),
        store.hunk_count(),
        store.hunk_bytes(),
        store.unit_bytes(),
        store.logical_bytes(),
    );
    for (tag, raw) in store.metadata_entries() {
        println!("{}", entry_line(*tag, raw));
    }
    Ok(())
}

/// Four-character tag, flags and text of one entry.
fn entry_line(tag: u32, raw: &RawMetadata) -> String {
    let code = match MetadataTag::from_u32(tag) {
        Some(known) => known.to_string(),
        None => tag
            .to_be_bytes()
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect(),
    };
    let flags = match MetadataFlags::from_bits(raw.flags) {
        Ok(flags) if flags.checksum => "checksum".to_string(),
        Ok(_) => "-".to_string(),
        Err(_) => format!("unknown {:#04x}", raw.flags),
    };
    format!("  {} [{}] {}", code, flags, raw.text)
}
