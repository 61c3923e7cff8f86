// Shared test helpers for database setup and failure injection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use offer_api::error_handling::DatabaseError;
use offer_api::{run_migrations, Offer, OfferRepository, PaginationInfo, PaginationInput, SqliteOfferRepository};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

#[allow(dead_code)]
pub async fn create_test_repo() -> Arc<SqliteOfferRepository> {
    Arc::new(SqliteOfferRepository::new(create_test_pool().await))
}

/// SQLite repository whose bulk inserts fail for the listed call numbers
/// (1-indexed), or always when `fail_on` is `None`.
#[allow(dead_code)]
pub struct FlakyRepository {
    pub inner: Arc<SqliteOfferRepository>,
    pub fail_on: Option<Vec<usize>>,
    pub bulk_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FlakyRepository {
    pub fn failing_on(inner: Arc<SqliteOfferRepository>, calls: Vec<usize>) -> Self {
        FlakyRepository {
            inner,
            fail_on: Some(calls),
            bulk_calls: AtomicUsize::new(0),
        }
    }

    pub fn always_failing(inner: Arc<SqliteOfferRepository>) -> Self {
        FlakyRepository {
            inner,
            fail_on: None,
            bulk_calls: AtomicUsize::new(0),
        }
    }

    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OfferRepository for FlakyRepository {
    async fn create_offer(&self, offer: &Offer) -> Result<u64, DatabaseError> {
        self.inner.create_offer(offer).await
    }

    async fn multi_create_offer(&self, offers: &[Offer]) -> Result<u64, DatabaseError> {
        let call = self.bulk_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let fail = match &self.fail_on {
            Some(calls) => calls.contains(&call),
            None => true,
        };
        if fail {
            return Err(DatabaseError::SqlError(sqlx::Error::PoolTimedOut));
        }
        self.inner.multi_create_offer(offers).await
    }

    async fn describe_offer(&self, offer_id: u64) -> Result<Offer, DatabaseError> {
        self.inner.describe_offer(offer_id).await
    }

    async fn list_offers(
        &self,
        pagination: PaginationInput,
    ) -> Result<(Vec<Offer>, PaginationInfo), DatabaseError> {
        self.inner.list_offers(pagination).await
    }

    async fn update_offer(&self, offer: &Offer) -> Result<(), DatabaseError> {
        self.inner.update_offer(offer).await
    }

    async fn remove_offer(&self, offer_id: u64) -> Result<(), DatabaseError> {
        self.inner.remove_offer(offer_id).await
    }
}

/// All live offers, oldest first.
#[allow(dead_code)]
pub async fn all_offers(repo: &SqliteOfferRepository) -> Vec<Offer> {
    repo.list_offers(PaginationInput {
        take: 10_000,
        skip: 0,
    })
    .await
    .expect("list offers")
    .0
}
