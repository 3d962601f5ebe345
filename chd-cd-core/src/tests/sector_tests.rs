use super::*;

const ALL_TYPES: [TrackType; 8] = [
    TrackType::Mode1,
    TrackType::Mode1Raw,
    TrackType::Mode2,
    TrackType::Mode2Form1,
    TrackType::Mode2Form2,
    TrackType::Mode2FormMix,
    TrackType::Mode2Raw,
    TrackType::Audio,
];

#[test]
fn native_format_reads_whole_sector() {
    for stored in ALL_TYPES {
        for requested in [None, Some(stored)] {
            let conversion = SectorConversion::resolve(stored, requested, 0).unwrap();
            assert_eq!(conversion.offset, 0);
            assert_eq!(conversion.length, stored.data_size());
            assert_eq!(conversion.header, None);
            assert_eq!(conversion.output_len(), stored.data_size() as usize);
            assert!(!conversion.is_incomplete());
        }
    }
}

#[test]
fn extraction_rules() {
    let cases = [
        (TrackType::Mode1, TrackType::Mode1Raw, 16, 2048),
        (TrackType::Mode1, TrackType::Mode2Form1, 24, 2048),
        (TrackType::Mode1, TrackType::Mode2Raw, 24, 2048),
        (TrackType::Mode1, TrackType::Mode2FormMix, 8, 2048),
        (TrackType::Mode2, TrackType::Mode1Raw, 16, 2336),
        (TrackType::Mode2, TrackType::Mode2Raw, 16, 2336),
    ];
    for (requested, stored, offset, length) in cases {
        let conversion = SectorConversion::resolve(stored, Some(requested), 0).unwrap();
        assert_eq!(
            (conversion.offset, conversion.length, conversion.header),
            (offset, length, None),
            "{} from {}",
            requested,
            stored
        );
    }
}

#[test]
fn promotion_synthesizes_header() {
    // 1 minute, 2 seconds, 3 frames
    let address = 4500 + 150 + 3;
    let conversion =
        SectorConversion::resolve(TrackType::Mode1, Some(TrackType::Mode1Raw), address).unwrap();

    assert_eq!(conversion.offset, 0);
    assert_eq!(conversion.length, 2048);
    assert!(conversion.is_incomplete());
    let header = conversion.header.unwrap();
    assert_eq!(header[..12], SYNC_BYTES);
    assert_eq!(header[12..15], [0x01, 0x02, 0x03]);
    assert_eq!(header[15], 1);
    assert_eq!(conversion.output_len(), 2352);
}

#[test]
fn assemble_pads_promoted_sector() {
    let conversion =
        SectorConversion::resolve(TrackType::Mode1, Some(TrackType::Mode1Raw), 16).unwrap();
    let sector = conversion.assemble(vec![0xAB; 2048]);

    assert_eq!(sector.len(), 2352);
    assert_eq!(sector[..16], raw_mode1_header(16));
    assert!(sector[16..16 + 2048].iter().all(|&b| b == 0xAB));
    assert!(sector[16 + 2048..].iter().all(|&b| b == 0));
}

#[test]
fn assemble_passes_plain_data_through() {
    let conversion = SectorConversion::resolve(TrackType::Audio, None, 0).unwrap();
    let data: Vec<u8> = (0..2352).map(|i| i as u8).collect();
    assert_eq!(conversion.assemble(data.clone()), data);
}

#[test]
fn unsupported_pairs_name_both_types() {
    let cases = [
        (TrackType::Audio, TrackType::Mode1),
        (TrackType::Mode1, TrackType::Mode2),
        (TrackType::Mode2Form2, TrackType::Mode1),
        (TrackType::Mode2Raw, TrackType::Mode1Raw),
        (TrackType::Mode1Raw, TrackType::Audio),
    ];
    for (stored, requested) in cases {
        let err = SectorConversion::resolve(stored, Some(requested), 0).unwrap_err();
        match err {
            CdError::NotSupported(msg) => {
                assert_eq!(
                    msg,
                    format!(
                        "conversion from type {} to type {} not supported",
                        stored, requested
                    )
                );
            }
            other => panic!("expected not supported, got {:?}", other),
        }
    }
}

#[test]
fn header_msf_follows_address() {
    for address in [0u32, 74, 75, 4499, 4500, 333_000] {
        let header = raw_mode1_header(address);
        assert_eq!(header[12..15], Msf::from_frames(address).to_bcd());
    }
}
