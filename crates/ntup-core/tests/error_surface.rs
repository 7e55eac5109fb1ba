use ntup_core::errors::{ErrorInfo, NtupError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message).in_collection("SiTracks").at_event(3)
}

#[test]
fn input_error_surface() {
    let err = NtupError::Input(sample_info("missing_collection", "collection not present"));
    assert_eq!(err.info().code, "missing_collection");
    assert!(err.info().context.contains_key("collection"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = NtupError::Decode(sample_info("unknown_field", "no such field").with_hint("check encoding"));
    let rendered = err.to_string();
    assert_eq!(
        rendered,
        "decode error: [unknown_field] no such field at collection=SiTracks event=3; hint: check encoding"
    );
}

#[test]
fn display_without_location_is_code_and_message() {
    let err = NtupError::State(ErrorInfo::new("zero_bins", "histogram needs at least one bin"));
    assert_eq!(err.to_string(), "state error: [zero_bins] histogram needs at least one bin");
}

#[test]
fn location_helpers_use_stable_keys() {
    let info = ErrorInfo::new("malformed_event", "bad json")
        .at_path("events.jsonl")
        .at_line(12)
        .expected_found(6, 5);
    let keys: Vec<_> = info.context.keys().map(String::as_str).collect();
    assert_eq!(keys, ["expected", "found", "line", "path"]);
    assert_eq!(info.context["line"], "12");
    assert_eq!(info.context["expected"], "6");
}

#[test]
fn io_helper_records_path() {
    let err = NtupError::io("open_input", "/tmp/missing.jsonl", "not found");
    match &err {
        NtupError::Io(info) => {
            assert_eq!(info.code, "open_input");
            assert_eq!(info.context["path"], "/tmp/missing.jsonl");
        }
        other => panic!("unexpected family {other:?}"),
    }
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = NtupError::State(ErrorInfo::new("finalized", "accumulator already finalized"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "State");
    assert_eq!(json["detail"]["code"], "finalized");
    let back: NtupError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, err);
}
