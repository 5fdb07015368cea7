//! Core domain types for Vow.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used without pulling in the runtime crate.

use thiserror::Error;

/// The outcome of one unit of launched work.
///
/// Produced exactly once per task and immutable after delivery. Callers must
/// branch on the error before trusting the value.
pub type TaskResult<T, E> = Result<T, PromiseError<E>>;

/// Everything that can go wrong between launching work and settling its handle.
///
/// `E` is the caller's own error type, carried through verbatim; the other
/// variants are synthesized by the library itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromiseError<E> {
    /// The error value returned by the launched closure.
    #[error("{0}")]
    Task(E),

    /// The delivery channel closed before a result was ever sent.
    ///
    /// Signals an internal consistency failure (external interference or
    /// runtime teardown mid-task), not a failure of the work itself.
    #[error("result channel unexpectedly closed")]
    ChannelClosed,

    /// The launched closure panicked; the panic was intercepted at the task
    /// boundary and converted into this synthetic result.
    #[error("task panicked: {0}")]
    Panicked(String),
}

impl<E> PromiseError<E> {
    /// Returns the caller's error value, if this is a task error.
    pub fn into_task_error(self) -> Option<E> {
        match self {
            Self::Task(error) => Some(error),
            Self::ChannelClosed | Self::Panicked(_) => None,
        }
    }
}
