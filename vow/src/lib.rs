//! Deferred results over Tokio.
//!
//! [`launch`] runs a closure on an independently scheduled task and returns a
//! [`Promise`] handle immediately; [`Promise::result`] suspends until the
//! work's value or error is available and serves the cached outcome on every
//! later call. [`all`] aggregates many handles into one, preserving input
//! order and short-circuiting on the first error; [`launch_all`] is the
//! launch-then-aggregate convenience.
//!
//! Errors are data: every await yields a [`TaskResult`], and callers branch
//! on it rather than catching anything. There is no cancellation, timeout, or
//! retry machinery; once launched, work runs to completion.
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use vow::{all, launch};
//!
//! let fast = launch(|| Ok::<_, String>(2));
//! let slow = launch(|| {
//!     std::thread::sleep(std::time::Duration::from_millis(10));
//!     Ok::<_, String>(3)
//! });
//!
//! // Input order is kept even though `slow` finishes last.
//! let combined = all(vec![fast, slow]);
//! assert_eq!(combined.result().await, Ok(vec![2, 3]));
//! # }
//! ```

mod aggregate;
mod promise;

pub use aggregate::{all, launch_all};
pub use promise::{Promise, launch};

// Re-export from the types crate for public API
pub use vow_types::{PromiseError, TaskResult};
