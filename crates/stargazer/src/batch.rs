//! Bounded parallel batches with fixed inter-batch pacing.
//!
//! Every fan-out stage in the sync pipeline runs the same shape: split the
//! work into fixed-size chunks, run one chunk concurrently, wait for the whole
//! chunk, then pause before the next one to stay inside external rate limits.

use std::future::Future;
use std::time::Duration;

/// Run `f` over `items` in fixed-size parallel batches.
///
/// Results come back in input order regardless of per-item completion order.
/// `on_item` is invoked for each result as its batch settles, which lets
/// callers report progress without threading a callback into spawned tasks.
///
/// A pause of `pause` is inserted between batches, but not after the last one.
pub async fn map_batched<T, R, F, Fut, C>(
    items: Vec<T>,
    batch_size: usize,
    pause: Duration,
    f: F,
    mut on_item: C,
) -> Vec<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
    C: FnMut(&R),
{
    let batch_size = batch_size.max(1);
    let total = items.len();
    let mut results = Vec::with_capacity(total);
    let mut remaining = items.into_iter();

    loop {
        let batch: Vec<T> = remaining.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }

        let handles: Vec<_> = batch
            .into_iter()
            .map(|item| tokio::spawn(f(item)))
            .collect();

        for handle in handles {
            let result = handle.await.expect("batch task panicked");
            on_item(&result);
            results.push(result);
        }

        if results.len() < total {
            tokio::time::sleep(pause).await;
        }
    }

    results
}
