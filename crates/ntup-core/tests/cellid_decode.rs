use ntup_core::{CellIdDecoder, DetectorLayer, NtupError};

const TRACKER_ENCODING: &str = "system:5,side:-2,layer:6,module:11,sensor:8";

fn pack(system: u64, side: i64, layer: u64, module: u64, sensor: u64) -> u64 {
    let side_bits = (side as u64) & 0b11;
    system | (side_bits << 5) | (layer << 7) | (module << 13) | (sensor << 24)
}

#[test]
fn tracker_encoding_layout() {
    let decoder = CellIdDecoder::parse(TRACKER_ENCODING).expect("parse");
    let offsets: Vec<_> = decoder
        .fields()
        .iter()
        .map(|f| (f.name.as_str(), f.offset, f.width, f.signed))
        .collect();
    assert_eq!(
        offsets,
        vec![
            ("system", 0, 5, false),
            ("side", 5, 2, true),
            ("layer", 7, 6, false),
            ("module", 13, 11, false),
            ("sensor", 24, 8, false),
        ]
    );
    assert_eq!(decoder.encoding(), TRACKER_ENCODING);
}

#[test]
fn decodes_system_layer_and_signed_side() {
    let decoder = CellIdDecoder::parse(TRACKER_ENCODING).expect("parse");
    let raw = pack(3, -1, 4, 17, 2);
    assert_eq!(
        decoder.detector_layer(raw).expect("decode"),
        DetectorLayer { system: 3, layer: 4 }
    );
    let all = decoder.decode(raw);
    assert_eq!(all["side"], -1);
    assert_eq!(all["module"], 17);
    assert_eq!(all["sensor"], 2);

    let positive = pack(5, 1, 0, 0, 0);
    assert_eq!(decoder.field(positive, "side").unwrap(), 1);
}

#[test]
fn unknown_field_is_decode_error() {
    let decoder = CellIdDecoder::parse("system:5,module:11").expect("parse");
    match decoder.detector_layer(0) {
        Err(NtupError::Decode(info)) => {
            assert_eq!(info.code, "unknown_field");
            assert_eq!(info.context["field"], "layer");
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn malformed_encodings_are_rejected() {
    let cases = [
        ("", "empty_encoding"),
        ("system", "bad_field"),
        ("system:x", "bad_width"),
        ("system:0", "field_out_of_range"),
        ("system:40,layer:30", "field_out_of_range"),
        ("system:4294967295:5,layer:6", "field_out_of_range"),
        ("system:60:-2147483648", "field_out_of_range"),
        ("system:5,system:3", "duplicate_field"),
        ("system:0:8,layer:4:8", "overlapping_field"),
    ];
    for (encoding, code) in cases {
        match CellIdDecoder::parse(encoding) {
            Err(NtupError::Decode(info)) => assert_eq!(info.code, code, "encoding {encoding:?}"),
            other => panic!("encoding {encoding:?} should fail, got {other:?}"),
        }
    }
}

#[test]
fn offset_near_u32_max_is_rejected_not_wrapped() {
    match CellIdDecoder::parse("system:4294967295:5,layer:6") {
        Err(NtupError::Decode(info)) => {
            assert_eq!(info.code, "field_out_of_range");
            assert_eq!(info.context["encoding"], "system:4294967295:5,layer:6");
        }
        other => panic!("expected out-of-range field, got {other:?}"),
    }
}
