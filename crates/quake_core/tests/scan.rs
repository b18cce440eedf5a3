use std::sync::Once;

use quake_core::{scan_first, DocEvent, EventError, ReadError, ScanResult};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(quake_logging::initialize_for_tests);
}

fn start(name: &str) -> Result<DocEvent, EventError> {
    Ok(DocEvent::StartElement(name.to_string()))
}

fn end(name: &str) -> Result<DocEvent, EventError> {
    Ok(DocEvent::EndElement(name.to_string()))
}

fn text(content: &str) -> Result<DocEvent, EventError> {
    Ok(DocEvent::Text(content.to_string()))
}

fn eod() -> Result<DocEvent, EventError> {
    Ok(DocEvent::EndDocument)
}

#[test]
fn finds_text_of_target_element() {
    init_logging();
    let events = vec![
        start("properties"),
        start("text"),
        text("5.2 km NE of Testville"),
        end("text"),
        end("properties"),
        eod(),
    ];

    let result = scan_first(events, "text").unwrap();
    assert_eq!(result, ScanResult::Found("5.2 km NE of Testville".to_string()));
}

#[test]
fn document_without_target_is_not_found() {
    let events = vec![start("feed"), eod()];
    assert_eq!(scan_first(events, "text").unwrap(), ScanResult::NotFound);
}

#[test]
fn empty_stream_is_not_found() {
    assert_eq!(scan_first(vec![eod()], "text").unwrap(), ScanResult::NotFound);
    assert_eq!(
        scan_first(Vec::<Result<DocEvent, EventError>>::new(), "text").unwrap(),
        ScanResult::NotFound
    );
}

#[test]
fn returns_first_of_several_matches() {
    let events = vec![
        start("feed"),
        start("text"),
        text("first"),
        end("text"),
        start("text"),
        text("second"),
        end("text"),
        end("feed"),
        eod(),
    ];
    assert_eq!(
        scan_first(events, "text").unwrap(),
        ScanResult::Found("first".to_string())
    );
}

#[test]
fn stops_pulling_events_after_the_match() {
    let prefix = vec![start("feed"), start("text"), text("near the front")];
    let consumed = std::cell::Cell::new(0usize);
    let events = prefix
        .into_iter()
        .chain(std::iter::from_fn(|| -> Option<Result<DocEvent, EventError>> {
            panic!("scanner read past the match")
        }))
        .inspect(|_| consumed.set(consumed.get() + 1));

    let result = scan_first(events, "text").unwrap();
    assert_eq!(result, ScanResult::Found("near the front".to_string()));
    assert_eq!(consumed.get(), 3);
}

#[test]
fn target_followed_by_non_text_is_malformed() {
    let events = vec![start("text"), start("b"), text("bold"), end("b"), end("text"), eod()];
    assert_eq!(scan_first(events, "text").unwrap(), ScanResult::MalformedInput);

    let events = vec![start("text"), end("text"), eod()];
    assert_eq!(scan_first(events, "text").unwrap(), ScanResult::MalformedInput);
}

#[test]
fn truncated_target_is_malformed_not_missing() {
    let truncated = vec![start("feed"), start("text")];
    let empty = vec![eod()];

    assert_eq!(scan_first(truncated, "text").unwrap(), ScanResult::MalformedInput);
    assert_eq!(scan_first(empty, "text").unwrap(), ScanResult::NotFound);

    let ends_at_target = vec![start("feed"), start("text"), eod()];
    assert_eq!(
        scan_first(ends_at_target, "text").unwrap(),
        ScanResult::MalformedInput
    );
}

#[test]
fn matching_is_exact_and_case_sensitive() {
    let events = vec![
        start("Text"),
        text("upper"),
        end("Text"),
        start("q:text"),
        text("prefixed"),
        end("q:text"),
        start("texts"),
        text("plural"),
        end("texts"),
        eod(),
    ];
    assert_eq!(scan_first(events, "text").unwrap(), ScanResult::NotFound);
}

#[test]
fn structural_error_before_match_is_malformed() {
    let events = vec![
        start("feed"),
        Err(EventError::Malformed("mismatched end tag".to_string())),
        start("text"),
        text("never reached"),
    ];
    assert_eq!(scan_first(events, "text").unwrap(), ScanResult::MalformedInput);
}

#[test]
fn structural_error_instead_of_text_is_malformed() {
    let events = vec![
        start("text"),
        Err(EventError::Malformed("bad escape".to_string())),
    ];
    assert_eq!(scan_first(events, "text").unwrap(), ScanResult::MalformedInput);
}

#[test]
fn read_failure_is_returned_as_error() {
    let events = vec![
        start("feed"),
        Err(EventError::Read(ReadError::new("connection reset"))),
    ];
    let err = scan_first(events, "text").unwrap_err();
    assert_eq!(err, ReadError::new("connection reset"));
}

#[test]
fn scanning_with_other_target_tag() {
    let events = vec![
        start("event"),
        start("time"),
        start("value"),
        text("2024-01-01T00:00:00Z"),
        end("value"),
        end("time"),
        end("event"),
        eod(),
    ];
    assert_eq!(
        scan_first(events, "value").unwrap(),
        ScanResult::Found("2024-01-01T00:00:00Z".to_string())
    );
}
