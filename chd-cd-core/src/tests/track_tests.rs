use super::*;
use crate::metadata::{MetadataTag, parse_track_record};

fn track_from(text: &str, tag: MetadataTag) -> CdResult<TrackInfo> {
    let record = parse_track_record(text, tag)?;
    TrackInfo::from_record(&record)
}

#[test]
fn plain_track_gets_defaults() {
    let info = track_from(
        "TRACK:1 TYPE:MODE1 SUBTYPE:NONE FRAMES:100",
        MetadataTag::CdromTrack,
    )
    .unwrap();

    assert_eq!(info.track, 1);
    assert_eq!(info.track_type, TrackType::Mode1);
    assert_eq!(info.subtype, SubcodeType::None);
    assert_eq!(info.frames, 100);
    assert_eq!(info.pad_frames, 0);
    assert_eq!(info.pregap_frames, 0);
    assert_eq!(info.postgap_frames, 0);
    assert_eq!(info.pregap_type, TrackType::Mode1);
    assert_eq!(info.pregap_subtype, SubcodeType::None);
    assert_eq!(info.extra_frames, 0);
    assert_eq!(info.data_size, 2048);
    assert_eq!(info.subcode_size, 0);
    assert!(!info.pregap_stored());
}

#[test]
fn extra_frames_align_to_four() {
    for frames in 0..64 {
        let extra = extra_frames(frames);
        assert!(extra < 4, "extra {} for {} frames", extra, frames);
        assert_eq!((frames + extra) % 4, 0, "frames {}", frames);
    }
    assert_eq!(extra_frames(1), 3);
    assert_eq!(extra_frames(2), 2);
    assert_eq!(extra_frames(3), 1);
    assert_eq!(extra_frames(4), 0);
}

#[test]
fn derived_sizes_follow_types() {
    let info = track_from(
        "TRACK:2 TYPE:AUDIO SUBTYPE:RW_RAW FRAMES:1001 PREGAP:150 PGTYPE:VAUDIO PGSUB:RW POSTGAP:0",
        MetadataTag::CdromTrackPregap,
    )
    .unwrap();

    assert_eq!(info.data_size, 2352);
    assert_eq!(info.subcode_size, 96);
    assert_eq!(info.extra_frames, 3);
    assert_eq!(info.chd_frames(), 1004);
    assert_eq!(info.pregap_frames, 150);
    assert_eq!(info.pregap_data_size, 2352);
    assert_eq!(info.pregap_subcode_size, 96);
    assert!(info.pregap_stored());
    assert_eq!(info.track_type, TrackType::Audio);
}

#[test]
fn pregap_without_v_prefix_is_not_stored() {
    let info = track_from(
        "TRACK:1 TYPE:MODE2_RAW SUBTYPE:NONE FRAMES:500 PREGAP:150 PGTYPE:MODE2_RAW PGSUB:NONE POSTGAP:0",
        MetadataTag::CdromTrackPregap,
    )
    .unwrap();

    assert_eq!(info.pregap_type, TrackType::Mode2Raw);
    assert_eq!(info.pregap_data_size, 0);
    assert_eq!(info.pregap_subcode_size, 0);
    assert!(!info.pregap_stored());
}

#[test]
fn gdrom_record_keeps_padding() {
    let info = track_from(
        "TRACK:3 TYPE:MODE1_RAW SUBTYPE:NONE FRAMES:9000 PAD:2 PREGAP:0 PGTYPE:MODE1 PGSUB:NONE POSTGAP:0",
        MetadataTag::GdromTrack,
    )
    .unwrap();

    assert_eq!(info.track, 3);
    assert_eq!(info.pad_frames, 2);
    assert_eq!(info.data_size, 2352);
}

#[test]
fn track_number_must_be_in_range() {
    for bad in ["0", "100", "170"] {
        let text = format!("TRACK:{} TYPE:MODE1 SUBTYPE:NONE FRAMES:10", bad);
        let err = track_from(&text, MetadataTag::CdromTrack).unwrap_err();
        assert!(matches!(err, CdError::Parsing(_)), "track {}: {:?}", bad, err);
    }

    let info = track_from(
        "TRACK:99 TYPE:MODE1 SUBTYPE:NONE FRAMES:10",
        MetadataTag::CdromTrack,
    )
    .unwrap();
    assert_eq!(info.track, 99);
}

#[test]
fn type_names_round_trip() {
    let all = [
        TrackType::Mode1,
        TrackType::Mode1Raw,
        TrackType::Mode2,
        TrackType::Mode2Form1,
        TrackType::Mode2Form2,
        TrackType::Mode2FormMix,
        TrackType::Mode2Raw,
        TrackType::Audio,
    ];
    for track_type in all {
        assert_eq!(TrackType::from_metadata(track_type.name()), Some(track_type));
        assert!(track_type.data_size() <= MAX_SECTOR_DATASIZE);
    }
    for subtype in [SubcodeType::None, SubcodeType::Normal, SubcodeType::Raw] {
        assert_eq!(SubcodeType::from_metadata(subtype.name()), Some(subtype));
        assert!(subtype.data_size() <= MAX_SUBCODE_DATASIZE);
    }
}

#[test]
fn size_aliases_decode() {
    let cases = [
        ("MODE1/2048", TrackType::Mode1),
        ("MODE1/2352", TrackType::Mode1Raw),
        ("MODE2/2048", TrackType::Mode2Form1),
        ("MODE2/2324", TrackType::Mode2Form2),
        ("MODE2/2336", TrackType::Mode2FormMix),
        ("MODE2/2352", TrackType::Mode2Raw),
    ];
    for (token, expected) in cases {
        assert_eq!(TrackType::from_metadata(token), Some(expected), "{}", token);
    }
    assert_eq!(TrackType::from_metadata("mode1"), None);
}

#[test]
fn frame_size_is_sector_plus_subcode() {
    assert_eq!(FRAME_SIZE, 2448);
    assert_eq!(LEAD_OUT_TRACK, 170);
}

#[test]
fn parses_track_type_names_ignoring_case() {
    assert_eq!("mode1".parse::<TrackType>().unwrap(), TrackType::Mode1);
    assert_eq!("Mode2_Form_Mix".parse::<TrackType>().unwrap(), TrackType::Mode2FormMix);
    assert_eq!("mode2/2352".parse::<TrackType>().unwrap(), TrackType::Mode2Raw);

    let err = "cdda".parse::<TrackType>().unwrap_err();
    assert_eq!(err.to_string(), "unknown track type: 'cdda'");
}

#[test]
fn frame_count_that_cannot_be_padded_is_rejected() {
    let err = track_from(
        "TRACK:1 TYPE:MODE1 SUBTYPE:NONE FRAMES:4294967295",
        MetadataTag::CdromTrack,
    )
    .unwrap_err();
    assert!(matches!(err, CdError::Parsing(_)), "{err}");

    // Already aligned, so no padding is needed.
    let info = track_from(
        "TRACK:1 TYPE:MODE1 SUBTYPE:NONE FRAMES:4294967292",
        MetadataTag::CdromTrack,
    )
    .unwrap();
    assert_eq!(info.chd_frames(), 4294967292);
}
