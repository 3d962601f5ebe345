use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use chd_cd::{CdRom, HunkStore, ReadOptions};

use crate::error::CliError;

/// Bytes shown per hex dump line.
const DUMP_WIDTH: usize = 16;

/// Read `count` sectors starting at `first`.
pub(crate) fn run_read(
    path: &Path,
    first: u32,
    count: u32,
    options: ReadOptions,
    output: Option<&Path>,
) -> Result<(), CliError> {
    if count == 0 {
        return Err(CliError::argument("sector count must be at least 1"));
    }
    let last = first
        .checked_add(count - 1)
        .ok_or_else(|| CliError::argument("sector range overflows"))?;
    let cd = super::open_disc(path)?;

    match output {
        Some(output) => {
            let mut out = BufWriter::new(File::create(output)?);
            let written = copy_sectors(&cd, first..=last, &options, &mut out)?;
            out.flush()?;
            log::info!("wrote {} bytes to {}", written, output.display());
        }
        None => {
            for address in first..=last {
                let sector = cd.read_sector_with(address, &options)?;
                let track = cd
                    .track_at(address, options.physical)
                    .map(|t| format!("track {:02} {}", t.track, t.track_type))
                    .unwrap_or_default();
                println!(
                    "{}",
                    format!("sector {} ({}, {} bytes)", address, track, sector.len())
                        .if_supports_color(Stdout, |t| t.bold())
                );
                print!("{}", hex_dump(&sector));
            }
        }
    }
    Ok(())
}

/// Write the sectors in `addresses` back to back; returns the byte count.
fn copy_sectors<S: HunkStore>(
    cd: &CdRom<S>,
    addresses: impl IntoIterator<Item = u32>,
    options: &ReadOptions,
    out: &mut impl Write,
) -> Result<u64, CliError> {
    let mut written = 0u64;
    for address in addresses {
        let sector = cd.read_sector_with(address, options)?;
        out.write_all(&sector)?;
        written += sector.len() as u64;
    }
    Ok(written)
}

fn hex_dump(data: &[u8]) -> String {
    let mut dump = String::new();
    for (line, chunk) in data.chunks(DUMP_WIDTH).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        let text: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        dump.push_str(&format!(
            "{:08x}  {:<width$}  |{}|\n",
            line * DUMP_WIDTH,
            hex.join(" "),
            text,
            width = DUMP_WIDTH * 3 - 1
        ));
    }
    dump
}

#[cfg(test)]
mod tests {
    use super::*;
    use chd_cd::{FRAME_SIZE, MemoryStore, MetadataTag, TrackType};

    #[test]
    fn hex_dump_lines() {
        let mut data = b"CD001".to_vec();
        data.extend_from_slice(&[0x00, 0xff]);
        let dump = hex_dump(&data);
        assert_eq!(
            dump,
            format!("00000000  {:<47}  |CD001..|\n", "43 44 30 30 31 00 ff")
        );

        let dump = hex_dump(&[0x41; 20]);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("00000010  41 41 41 41 "));
    }

    #[test]
    fn copies_converted_sectors() {
        let mut image = vec![0u8; (FRAME_SIZE * 4) as usize];
        for frame in 0..4 {
            let start = (frame * FRAME_SIZE) as usize + 16;
            image[start..start + 2048].fill(frame as u8 + 1);
        }
        let store = MemoryStore::new(image, FRAME_SIZE * 4, FRAME_SIZE).with_metadata(
            MetadataTag::CdromTrack,
            "TRACK:1 TYPE:MODE1_RAW SUBTYPE:NONE FRAMES:4",
            0,
        );
        let cd = CdRom::new(store).unwrap();

        let mut out = Vec::new();
        let options = ReadOptions::new().datatype(TrackType::Mode1);
        let written = copy_sectors(&cd, 1..=2, &options, &mut out).unwrap();
        assert_eq!(written, 4096);
        assert!(out[..2048].iter().all(|&b| b == 2));
        assert!(out[2048..].iter().all(|&b| b == 3));
    }
}
