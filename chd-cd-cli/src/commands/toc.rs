use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use chd_cd::{CdRom, HunkStore, LEAD_OUT_TRACK, MappingEntry, Msf, TrackInfo};

use crate::error::CliError;

/// Print the table of contents of a CHD file.
pub(crate) fn run_toc(path: &Path, json: bool) -> Result<(), CliError> {
    let cd = super::open_disc(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&toc_json(&cd)?)?);
        return Ok(());
    }

    println!(
        "{} {}, {} track(s)",
        path.display().if_supports_color(Stdout, |t| t.bold()),
        if cd.is_gdrom() { "GD-ROM" } else { "CD-ROM" },
        cd.track_count(),
    );
    println!(
        "{}",
        header_row().if_supports_color(Stdout, |t| t.dimmed())
    );
    for (track, entry) in cd.tracks().iter().zip(cd.mapping().entries()) {
        println!("{}", track_row(track, entry));
    }
    println!(
        "{}",
        lead_out_row(cd.mapping().lead_out()).if_supports_color(Stdout, |t| t.cyan())
    );
    Ok(())
}

/// TOC plus the address map, as exported by `toc --json`.
fn toc_json<S: HunkStore>(cd: &CdRom<S>) -> Result<serde_json::Value, CliError> {
    let mut value = serde_json::to_value(cd.toc())?;
    value["mapping"] = serde_json::to_value(cd.mapping().entries())?;
    Ok(value)
}

fn header_row() -> String {
    format!(
        "{:>3} {:<15} {:<6} {:>7} {:>7} {:>7} {:>8} {:>9}",
        "#", "TYPE", "SUB", "FRAMES", "PREGAP", "POSTGAP", "START", "MSF"
    )
}

fn track_row(track: &TrackInfo, entry: &MappingEntry) -> String {
    let pregap = if track.pregap_stored() {
        format!("V{}", track.pregap_frames)
    } else {
        track.pregap_frames.to_string()
    };
    format!(
        "{:>3} {:<15} {:<6} {:>7} {:>7} {:>7} {:>8} {:>9}",
        format!("{:02}", track.track),
        track.track_type.name(),
        track.subtype.name(),
        track.frames,
        pregap,
        track.postgap_frames,
        entry.logical_frame_offset,
        Msf::from_frames(entry.logical_frame_offset).to_string(),
    )
}

fn lead_out_row(entry: &MappingEntry) -> String {
    format!(
        "{:>3} {:<15} {:<6} {:>7} {:>7} {:>7} {:>8} {:>9}",
        format!("{:02X}", LEAD_OUT_TRACK),
        "lead-out",
        "",
        "",
        "",
        "",
        entry.logical_frame_offset,
        Msf::from_frames(entry.logical_frame_offset).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chd_cd::{FRAME_SIZE, MemoryStore, MetadataTag};

    fn disc() -> CdRom<MemoryStore> {
        let store = MemoryStore::new(Vec::new(), FRAME_SIZE * 4, FRAME_SIZE)
            .with_metadata(
                MetadataTag::CdromTrackPregap,
                "TRACK:1 TYPE:MODE1_RAW SUBTYPE:NONE FRAMES:1000 PREGAP:0 PGTYPE:MODE1 PGSUB:NONE POSTGAP:0",
                0,
            )
            .with_metadata(
                MetadataTag::CdromTrackPregap,
                "TRACK:2 TYPE:AUDIO SUBTYPE:NONE FRAMES:2000 PREGAP:150 PGTYPE:VAUDIO PGSUB:NONE POSTGAP:0",
                0,
            );
        CdRom::new(store).unwrap()
    }

    #[test]
    fn rows_show_stored_pregaps_and_msf() {
        let cd = disc();
        let row = track_row(&cd.tracks()[1], &cd.mapping().entries()[1]);
        assert!(row.starts_with(" 02 AUDIO"), "{}", row);
        assert!(row.contains("V150"), "{}", row);
        assert!(row.ends_with("00:13:25"), "{}", row);

        let lead_out = lead_out_row(cd.mapping().lead_out());
        assert!(lead_out.starts_with(" AA lead-out"), "{}", lead_out);
        assert!(lead_out.ends_with("00:40:00"), "{}", lead_out);
        assert_eq!(lead_out.len(), header_row().len());
    }

    #[test]
    fn json_export_includes_mapping() {
        let value = toc_json(&disc()).unwrap();
        assert_eq!(value["tracks"][1]["track_type"], "AUDIO");
        assert_eq!(value["flags"]["gdrom"], false);
        assert_eq!(value["mapping"].as_array().unwrap().len(), 3);
        assert_eq!(value["mapping"][2]["logical_frame_offset"], 3000);
    }
}
