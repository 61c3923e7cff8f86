//! Service counters.
//!
//! Counters live in a [`ServiceMetrics`] value that is created once at startup
//! and handed to the components that update it. The batch pipeline only sees
//! the narrower [`FlushObserver`] trait.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives flush outcomes from the batch pipeline.
pub trait FlushObserver: Send + Sync {
    /// `persisted` offers were written; `retained` offers remain buffered.
    fn on_flush(&self, persisted: usize, retained: usize);
}

/// Counters exposed on the status server's metrics endpoint.
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    requests: AtomicUsize,
    created: AtomicUsize,
    updated: AtomicUsize,
    removed: AtomicUsize,
    flushed_offers: AtomicUsize,
    flush_failures: AtomicUsize,
    retained_offers: AtomicUsize,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_created(&self, count: usize) {
        self.created.fetch_add(count, Ordering::SeqCst);
    }

    pub fn record_updated(&self) {
        self.updated.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_removed(&self) {
        self.removed.fetch_add(1, Ordering::SeqCst);
    }

    /// Requests routed to the offer API.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn updated(&self) -> usize {
        self.updated.load(Ordering::SeqCst)
    }

    pub fn removed(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }

    /// Total offers written by the batch pipeline.
    pub fn flushed_offers(&self) -> usize {
        self.flushed_offers.load(Ordering::SeqCst)
    }

    /// Number of flushes that left offers behind.
    pub fn flush_failures(&self) -> usize {
        self.flush_failures.load(Ordering::SeqCst)
    }

    /// Offers left buffered by the most recent flush.
    pub fn retained_offers(&self) -> usize {
        self.retained_offers.load(Ordering::SeqCst)
    }
}

impl FlushObserver for ServiceMetrics {
    fn on_flush(&self, persisted: usize, retained: usize) {
        self.flushed_offers.fetch_add(persisted, Ordering::SeqCst);
        self.retained_offers.store(retained, Ordering::SeqCst);
        if retained > 0 {
            self.flush_failures.fetch_add(1, Ordering::SeqCst);
        }
    }
}
