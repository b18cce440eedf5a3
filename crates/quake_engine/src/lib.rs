//! Quake engine: network collaborator, XML event adapter and the fetch coordinator.
mod coordinator;
mod fetch;
mod listener;
mod types;
mod xml;

pub use coordinator::{CoordinatorConfig, QuakeFetcher, DEFAULT_TARGET_TAG};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_BASE_URL, DEFAULT_ENDPOINT};
pub use listener::{ChannelListener, QuakeListener, QuakeReport};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, ResponseBody};
pub use xml::{scan_reader, XmlEvents};
