//! Batch flushing logic.

use std::sync::Arc;

use crate::error_handling::FlushError;
use crate::metrics::FlushObserver;
use crate::models::Offer;
use crate::storage::OfferRepository;
use crate::utils::split_into_batches;

/// Result of a flush: the offers that were not persisted, and why.
///
/// `remaining` is always a contiguous suffix of the flushed input: everything
/// from the first failing batch to the end.
#[derive(Debug)]
pub struct FlushOutcome {
    pub remaining: Vec<Offer>,
    pub error: Option<FlushError>,
}

impl FlushOutcome {
    fn done() -> Self {
        FlushOutcome {
            remaining: Vec::new(),
            error: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Writes offers to the repository in batches, stopping at the first failure.
pub struct Flusher {
    group_count: usize,
    repo: Arc<dyn OfferRepository>,
    observer: Option<Arc<dyn FlushObserver>>,
}

impl Flusher {
    /// Creates a flusher that splits each flush into at most `group_count` batches.
    ///
    /// A zero `group_count` is accepted here and reported by every `flush`,
    /// which then persists nothing. [`Saver::new`](super::Saver::new) refuses
    /// such a flusher.
    pub fn new(group_count: usize, repo: Arc<dyn OfferRepository>) -> Self {
        Flusher {
            group_count,
            repo,
            observer: None,
        }
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Reports every flush outcome to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn FlushObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Persists `offers` batch by batch, in order.
    ///
    /// Each batch is handed to `multi_create_offer` exactly once. When a batch
    /// fails, it and every later batch are returned in `remaining` together with
    /// the error; earlier batches are considered stored. If splitting fails the
    /// input is returned untouched.
    pub async fn flush(&self, mut offers: Vec<Offer>) -> FlushOutcome {
        if offers.is_empty() && self.group_count > 0 {
            return FlushOutcome::done();
        }

        let batches = match split_into_batches(&offers, self.group_count) {
            Ok(batches) => batches,
            Err(e) => {
                self.observe(0, offers.len());
                return FlushOutcome {
                    remaining: offers,
                    error: Some(e.into()),
                };
            }
        };

        let total = offers.len();
        // Number of offers in batches that were stored
        let mut pos = 0;

        for batch in batches {
            if let Err(e) = self.repo.multi_create_offer(&batch).await {
                let remaining = offers.split_off(pos);
                log::warn!(
                    "Flush stopped after {} of {} offers: {}",
                    pos,
                    total,
                    e
                );
                self.observe(pos, remaining.len());
                return FlushOutcome {
                    remaining,
                    error: Some(FlushError::Persist {
                        batch_len: batch.len(),
                        source: e,
                    }),
                };
            }
            pos += batch.len();
        }

        log::debug!("Successfully flushed {} offers", total);
        self.observe(total, 0);
        FlushOutcome::done()
    }

    fn observe(&self, persisted: usize, retained: usize) {
        if let Some(observer) = &self.observer {
            observer.on_flush(persisted, retained);
        }
    }
}
