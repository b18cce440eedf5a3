use crate::ScanResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<L> {
    /// Caller asked for the value; served from cache when possible.
    Request(L),
    /// Caller asked for a fresh value, bypassing the cache.
    Refresh(L),
    /// The response body was scanned.
    ResponseScanned(ScanResult),
    /// The network collaborator could not deliver a body.
    TransportFailed,
}
