//! Concurrency-limited, order-preserving parallel mapping.
//!
//! Wraps rayon's `par_iter` to process items in parallel while limiting
//! the number of items in flight at once. Results always come back in input
//! order. A [`CancelToken`] is polled between chunks; a cancelled run keeps
//! the ordered prefix of completed chunks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

/// Shared cancellation flag. Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Ordered results of a possibly cancelled map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOutcome<R> {
    /// Results for `items[..results.len()]`, in input order.
    pub results: Vec<R>,
    pub cancelled: bool,
}

/// Maps `f` over `items` in parallel, with at most `max_concurrent` items in flight.
///
/// # Panics
///
/// Panics if `max_concurrent` is 0.
pub fn par_map_limited<T, R, F>(items: &[T], max_concurrent: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    par_map_cancellable(items, max_concurrent, None, f).results
}

/// Like [`par_map_limited`], but stops before the next chunk once `cancel` is set.
///
/// # Panics
///
/// Panics if `max_concurrent` is 0.
pub fn par_map_cancellable<T, R, F>(
    items: &[T],
    max_concurrent: usize,
    cancel: Option<&CancelToken>,
    f: F,
) -> MapOutcome<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    assert!(max_concurrent > 0, "max_concurrent must be > 0");

    let mut results = Vec::with_capacity(items.len());
    for (chunk_idx, chunk) in items.chunks(max_concurrent).enumerate() {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return MapOutcome {
                results,
                cancelled: true,
            };
        }

        let offset = chunk_idx * max_concurrent;
        let chunk_results: Vec<R> = chunk
            .par_iter()
            .enumerate()
            .map(|(i, item)| f(offset + i, item))
            .collect();
        results.extend(chunk_results);
    }

    MapOutcome {
        results,
        cancelled: false,
    }
}
