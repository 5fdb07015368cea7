//! Deferred result handles.
//!
//! [`launch`] starts a closure on the blocking pool and hands back a
//! [`Promise`] immediately; [`Promise::result`] suspends until the closure's
//! outcome has been delivered, then serves the cached outcome forever after.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, oneshot};
use tokio::task;

use vow_types::{PromiseError, TaskResult};

/// Handle to one unit of launched work.
///
/// Cheap to clone; every clone observes the same settled result. Awaiting an
/// unsettled handle suspends only the calling task.
pub struct Promise<T, E> {
    inner: Arc<Inner<T, E>>,
}

struct Inner<T, E> {
    /// One-shot delivery channel. The `Option` guarantees at most one reader
    /// ever drains it; everyone else is served from `settled`.
    channel: Mutex<Option<oneshot::Receiver<TaskResult<T, E>>>>,
    /// First settler wins; the stored result is definitive for the handle's
    /// remaining lifetime.
    settled: OnceCell<TaskResult<T, E>>,
}

impl<T, E> Promise<T, E> {
    pub(crate) fn from_channel(receiver: oneshot::Receiver<TaskResult<T, E>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                channel: Mutex::new(Some(receiver)),
                settled: OnceCell::new(),
            }),
        }
    }

    /// A handle that is already settled with `value`.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        Self::settled_with(Ok(value))
    }

    /// A handle that is already settled with `error`.
    #[must_use]
    pub fn rejected(error: PromiseError<E>) -> Self {
        Self::settled_with(Err(error))
    }

    fn settled_with(result: TaskResult<T, E>) -> Self {
        Self {
            inner: Arc::new(Inner {
                channel: Mutex::new(None),
                settled: OnceCell::new_with(Some(result)),
            }),
        }
    }

    /// Whether a result has been retrieved and cached yet.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.inner.settled.initialized()
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone,
    E: Clone,
{
    /// Waits for the work's outcome.
    ///
    /// The first caller drains the delivery channel; once a result has been
    /// cached, every call (including concurrent ones racing the first) gets a
    /// clone of that same result without touching the channel again. If the
    /// channel closes without ever delivering, the outcome is
    /// [`PromiseError::ChannelClosed`].
    pub async fn result(&self) -> TaskResult<T, E> {
        self.inner
            .settled
            .get_or_init(|| async {
                let receiver = self.inner.channel.lock().await.take();
                match receiver {
                    Some(receiver) => match receiver.await {
                        Ok(result) => result,
                        Err(_) => {
                            tracing::warn!("result channel closed before delivering a result");
                            Err(PromiseError::ChannelClosed)
                        }
                    },
                    // Receiver gone without a cached result: treat as closed.
                    None => Err(PromiseError::ChannelClosed),
                }
            })
            .await
            .clone()
    }
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("settled", &self.is_settled())
            .finish_non_exhaustive()
    }
}

/// Starts `work` on an independently scheduled task and returns its handle
/// without waiting.
///
/// Must be called from within a Tokio runtime. The closure runs on the
/// blocking pool, so it may compute or block freely. Exactly one result is
/// delivered through the handle; a panic inside `work` is intercepted at the
/// task boundary and settles the handle as [`PromiseError::Panicked`] instead
/// of crashing the process. There is no way to cancel the work once launched.
#[must_use]
pub fn launch<T, E, F>(work: F) -> Promise<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let worker = task::spawn_blocking(work);

    tokio::spawn(async move {
        let outcome = match worker.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(PromiseError::Task(error)),
            Err(join_error) if join_error.is_panic() => {
                let message = panic_message(join_error.into_panic());
                tracing::warn!("launched task panicked: {message}");
                Err(PromiseError::Panicked(message))
            }
            // Runtime is tearing down; dropping `tx` closes the channel and
            // any remaining awaiter observes `ChannelClosed`.
            Err(_) => return,
        };
        let _ = tx.send(outcome);
    });

    Promise::from_channel(rx)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
