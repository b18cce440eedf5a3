use crate::event::{DocEvent, EventError, ReadError};

/// Outcome of scanning one document for a target element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    Found(String),
    NotFound,
    MalformedInput,
}

/// Returns the text of the first element named `target`.
///
/// Events are pulled strictly one at a time. Once a `StartElement(target)` is
/// seen, exactly one more event is pulled: it must be `Text`, otherwise the
/// document is reported as malformed. Nothing past that event is consumed.
///
/// Element names are compared by exact, case-sensitive equality. Read failures
/// of the underlying source are returned as `Err` so the caller can tell them
/// apart from document defects.
pub fn scan_first<I>(events: I, target: &str) -> Result<ScanResult, ReadError>
where
    I: IntoIterator<Item = Result<DocEvent, EventError>>,
{
    let mut events = events.into_iter();
    while let Some(event) = events.next() {
        match event {
            Ok(DocEvent::StartElement(name)) if name == target => {
                return match events.next() {
                    Some(Ok(DocEvent::Text(content))) => Ok(ScanResult::Found(content)),
                    Some(Ok(_)) | None => Ok(ScanResult::MalformedInput),
                    Some(Err(err)) => classify(err),
                };
            }
            Ok(DocEvent::EndDocument) => return Ok(ScanResult::NotFound),
            Ok(_) => {}
            Err(err) => return classify(err),
        }
    }
    Ok(ScanResult::NotFound)
}

fn classify(err: EventError) -> Result<ScanResult, ReadError> {
    match err {
        EventError::Malformed(_) => Ok(ScanResult::MalformedInput),
        EventError::Read(err) => Err(err),
    }
}
