//! Quake core: document scanning and the fetch coordinator's pure state machine.
mod effect;
mod event;
mod msg;
mod query;
mod scan;
mod state;
mod update;

pub use effect::Effect;
pub use event::{DocEvent, EventError, ReadError};
pub use msg::Msg;
pub use query::{QueryParams, ResponseFormat};
pub use scan::{scan_first, ScanResult};
pub use state::{FailureCause, FetchPhase, FetchState};
pub use update::update;
