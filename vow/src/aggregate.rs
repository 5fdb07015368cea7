//! Order-preserving aggregation of deferred results.
//!
//! One waiter task per input handle funnels settled results, tagged with
//! their input slot, into a shared channel; a single reducer assembles the
//! combined outcome and fails fast on the first error it sees.

use tokio::sync::{mpsc, oneshot};

use vow_types::{PromiseError, TaskResult};

use crate::promise::{Promise, launch};

/// A settled input result tagged with the slot it belongs to.
struct IndexedResult<T, E> {
    index: usize,
    result: TaskResult<T, E>,
}

/// Waits for every input handle and combines their outcomes.
///
/// The combined value keeps input order: slot `i` holds the value awaited
/// from `promises[i]`, no matter which input finished first. The first error
/// to arrive (in delivery order, not index order) becomes the combined error
/// and stops further accumulation; sibling tasks still run to completion,
/// their results simply go unread. An empty input settles immediately with an
/// empty vector.
///
/// The returned handle behaves exactly like any other [`Promise`], so
/// aggregates compose: the output of one `all` can feed a further `all`.
#[must_use]
pub fn all<T, E>(promises: Vec<Promise<T, E>>) -> Promise<Vec<T>, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let count = promises.len();
    if count == 0 {
        return Promise::resolved(Vec::new());
    }

    // Capacity `count` means a publish never blocks, even once the reducer
    // has stopped consuming.
    let (agg_tx, agg_rx) = mpsc::channel(count);
    for (index, promise) in promises.into_iter().enumerate() {
        let agg_tx = agg_tx.clone();
        tokio::spawn(async move {
            let result = promise.result().await;
            let _ = agg_tx.send(IndexedResult { index, result }).await;
        });
    }
    drop(agg_tx);

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(reduce(agg_rx, count).await);
    });
    Promise::from_channel(rx)
}

/// Launches every closure in order and aggregates the resulting handles.
///
/// Convenience composition of [`launch`] and [`all`]; no semantics of its own.
#[must_use]
pub fn launch_all<T, E, F>(works: Vec<F>) -> Promise<Vec<T>, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    all(works.into_iter().map(launch).collect())
}

async fn reduce<T, E>(
    mut results: mpsc::Receiver<IndexedResult<T, E>>,
    count: usize,
) -> TaskResult<Vec<T>, E> {
    let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
    let mut filled = 0;

    while let Some(indexed) = results.recv().await {
        match indexed.result {
            Err(error) => {
                tracing::debug!(
                    index = indexed.index,
                    "aggregation short-circuiting on first error"
                );
                return Err(error);
            }
            Ok(value) => {
                slots[indexed.index] = Some(value);
                filled += 1;
                if filled == count {
                    return Ok(slots
                        .into_iter()
                        .map(|slot| slot.expect("each input slot is filled exactly once"))
                        .collect());
                }
            }
        }
    }

    // Every publisher hung up before the tally completed.
    tracing::warn!(filled, count, "aggregation channel drained early");
    Err(PromiseError::ChannelClosed)
}
