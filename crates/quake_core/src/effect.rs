use crate::FailureCause;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<L> {
    /// Issue exactly one outbound query.
    SendQuery,
    NotifySuccess { listener: L, value: String },
    NotifyFailure { listener: L, cause: FailureCause },
}
