//! Batch pipeline assembly.

use std::sync::Arc;
use std::time::Duration;

use crate::error_handling::SaverError;
use crate::metrics::FlushObserver;
use crate::storage::batch::{Flusher, Notifier, Saver};
use crate::storage::OfferRepository;

/// Builds and starts a [`Saver`] writing through `repo`.
///
/// Flush outcomes are reported to `observer`. The returned saver is already
/// initialized and must be closed with [`Saver::close`] to persist its buffer.
///
/// # Errors
///
/// - `SaverError::ZeroCapacity` if `capacity` is zero
/// - `SaverError::ZeroGroupCount` if `flush_group_count` is zero
/// - `SaverError::Notifier` if `flush_interval` is zero
pub fn init_saver(
    capacity: usize,
    flush_group_count: usize,
    flush_interval: Duration,
    repo: Arc<dyn OfferRepository>,
    observer: Arc<dyn FlushObserver>,
) -> Result<Arc<Saver>, SaverError> {
    let notifier = Notifier::new(flush_interval)?;
    let flusher = Flusher::new(flush_group_count, repo).with_observer(observer);
    let saver = Arc::new(Saver::new(capacity, flusher, notifier)?);
    saver.init()?;

    log::info!(
        "Batch pipeline started: capacity {}, {} groups per flush, every {:?}",
        capacity,
        flush_group_count,
        flush_interval
    );
    Ok(saver)
}
