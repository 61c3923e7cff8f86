//! Shared test helpers for storage and pipeline tests.
//!
//! This module provides common utilities for database setup and an in-memory
//! repository whose bulk insert can be made to fail on demand.

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::error_handling::DatabaseError;
#[cfg(test)]
use crate::models::{Offer, PaginationInfo, PaginationInput};
#[cfg(test)]
use crate::storage::{run_migrations, OfferRepository};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Builds `count` distinct unpersisted offers (user ids 1..=count).
#[cfg(test)]
pub fn make_offers(count: usize) -> Vec<Offer> {
    (1..=count as u64).map(|i| Offer::new(i, 1, i)).collect()
}

/// Repository that records every bulk insert and fails the calls listed in
/// `fail_on` (1-indexed call numbers) or every call when `always_fail` is set.
/// Each bulk insert first sleeps for `delay`.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingRepository {
    pub calls: Mutex<Vec<Vec<Offer>>>,
    pub call_count: AtomicUsize,
    pub fail_on: Vec<usize>,
    pub always_fail: bool,
    pub delay: Duration,
}

#[cfg(test)]
impl RecordingRepository {
    pub fn failing_on(fail_on: Vec<usize>) -> Self {
        RecordingRepository {
            fail_on,
            ..Default::default()
        }
    }

    pub fn always_failing() -> Self {
        RecordingRepository {
            always_fail: true,
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        RecordingRepository {
            delay,
            ..Default::default()
        }
    }

    /// Batches that were successfully persisted, in call order.
    pub fn persisted(&self) -> Vec<Vec<Offer>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
fn injected_failure() -> DatabaseError {
    DatabaseError::SqlError(sqlx::Error::Protocol("injected failure".into()))
}

#[cfg(test)]
#[async_trait]
impl OfferRepository for RecordingRepository {
    async fn create_offer(&self, offer: &Offer) -> Result<u64, DatabaseError> {
        self.multi_create_offer(std::slice::from_ref(offer)).await
    }

    async fn multi_create_offer(&self, offers: &[Offer]) -> Result<u64, DatabaseError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.always_fail || self.fail_on.contains(&call) {
            return Err(injected_failure());
        }
        self.calls.lock().unwrap().push(offers.to_vec());
        Ok(offers.len() as u64)
    }

    async fn describe_offer(&self, offer_id: u64) -> Result<Offer, DatabaseError> {
        Err(DatabaseError::OfferNotFound(offer_id))
    }

    async fn list_offers(
        &self,
        pagination: PaginationInput,
    ) -> Result<(Vec<Offer>, PaginationInfo), DatabaseError> {
        Ok((Vec::new(), pagination.pagination_info(0, 0)))
    }

    async fn update_offer(&self, offer: &Offer) -> Result<(), DatabaseError> {
        Err(DatabaseError::OfferNotFound(offer.id))
    }

    async fn remove_offer(&self, offer_id: u64) -> Result<(), DatabaseError> {
        Err(DatabaseError::OfferNotFound(offer_id))
    }
}
