use std::io::BufRead;
use std::iter::FusedIterator;

use quake_core::{scan_first, DocEvent, EventError, ReadError, ScanResult};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Pulls structural events out of an XML byte stream, one at a time.
///
/// Only the current event is held in memory. Self-closing elements are
/// reported as a start immediately followed by an end, CDATA sections as
/// text, and declarations, comments, processing instructions and doctypes are
/// skipped. Element names are reported exactly as written, prefix included.
pub struct XmlEvents<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    depth: usize,
    queued_end: Option<String>,
    done: bool,
}

impl<R: BufRead> XmlEvents<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = true;
        Self {
            reader,
            buf: Vec::new(),
            depth: 0,
            queued_end: None,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for XmlEvents<R> {
    type Item = Result<DocEvent, EventError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(name) = self.queued_end.take() {
            return Some(Ok(DocEvent::EndElement(name)));
        }
        if self.done {
            return None;
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    self.done = true;
                    return Some(Err(map_xml_error(err)));
                }
            };

            let item = match event {
                Event::Start(start) => {
                    self.depth += 1;
                    utf8(start.name().as_ref()).map(DocEvent::StartElement)
                }
                Event::Empty(start) => utf8(start.name().as_ref()).map(|name| {
                    self.queued_end = Some(name.clone());
                    DocEvent::StartElement(name)
                }),
                Event::End(end) => {
                    self.depth = self.depth.saturating_sub(1);
                    utf8(end.name().as_ref()).map(DocEvent::EndElement)
                }
                Event::Text(text) => text
                    .unescape()
                    .map(|content| DocEvent::Text(content.into_owned()))
                    .map_err(|err| EventError::Malformed(err.to_string())),
                Event::CData(cdata) => utf8(&cdata).map(DocEvent::Text),
                Event::Eof => {
                    self.done = true;
                    if self.depth > 0 {
                        Err(EventError::Malformed(format!(
                            "document ended with {} unclosed element(s)",
                            self.depth
                        )))
                    } else {
                        Ok(DocEvent::EndDocument)
                    }
                }
                _ => continue,
            };

            if item.is_err() {
                self.done = true;
                self.queued_end = None;
            }
            return Some(item);
        }
    }
}

impl<R: BufRead> FusedIterator for XmlEvents<R> {}

/// Scans an XML byte stream for the text of the first `target` element.
pub fn scan_reader<R: BufRead>(source: R, target: &str) -> Result<ScanResult, ReadError> {
    scan_first(XmlEvents::new(source), target)
}

fn utf8(bytes: &[u8]) -> Result<String, EventError> {
    std::str::from_utf8(bytes)
        .map(ToOwned::to_owned)
        .map_err(|err| EventError::Malformed(err.to_string()))
}

fn map_xml_error(err: quick_xml::Error) -> EventError {
    match err {
        quick_xml::Error::Io(io) => EventError::Read(ReadError::new(io.to_string())),
        other => EventError::Malformed(other.to_string()),
    }
}
