//! SQLite-backed offer repository.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::models::{Offer, PaginationInfo, PaginationInput};
use crate::utils::now_millis;

use super::repository::OfferRepository;

const SELECT_COLUMNS: &str = "id, user_id, team_id, grade, is_deleted";

/// Offer repository over a SQLite pool.
#[derive(Clone)]
pub struct SqliteOfferRepository {
    pool: SqlitePool,
}

impl SqliteOfferRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteOfferRepository { pool }
    }

    /// Underlying pool, shared with migrations and health checks.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Converts an id or counter to the signed integer SQLite stores.
fn to_sql_int(value: u64) -> Result<i64, DatabaseError> {
    i64::try_from(value).map_err(|_| DatabaseError::ValueOutOfRange(value))
}

fn offer_from_row(row: &SqliteRow) -> Result<Offer, sqlx::Error> {
    Ok(Offer {
        id: row.try_get::<i64, _>("id")? as u64,
        user_id: row.try_get::<i64, _>("user_id")? as u64,
        team_id: row.try_get::<i64, _>("team_id")? as u64,
        grade: row.try_get::<i64, _>("grade")? as u64,
        is_deleted: row.try_get::<bool, _>("is_deleted")?,
    })
}

const INSERT_OFFER: &str = "INSERT INTO offers (user_id, team_id, grade, is_deleted, created_at_ms, updated_at_ms)
     VALUES (?, ?, ?, 0, ?, ?)
     RETURNING id";

#[async_trait]
impl OfferRepository for SqliteOfferRepository {
    async fn create_offer(&self, offer: &Offer) -> Result<u64, DatabaseError> {
        let now = now_millis();
        let id: i64 = sqlx::query_scalar(INSERT_OFFER)
            .bind(to_sql_int(offer.user_id)?)
            .bind(to_sql_int(offer.team_id)?)
            .bind(to_sql_int(offer.grade)?)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        log::debug!("Created offer {} for user {}", id, offer.user_id);
        Ok(id as u64)
    }

    async fn multi_create_offer(&self, offers: &[Offer]) -> Result<u64, DatabaseError> {
        if offers.is_empty() {
            return Ok(0);
        }

        let now = now_millis();
        let mut tx = self.pool.begin().await?;

        for offer in offers {
            sqlx::query(INSERT_OFFER)
                .bind(to_sql_int(offer.user_id)?)
                .bind(to_sql_int(offer.team_id)?)
                .bind(to_sql_int(offer.grade)?)
                .bind(now)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
        }

        // Dropping the transaction on any early return above rolls it back.
        tx.commit().await?;

        log::debug!("Inserted batch of {} offers", offers.len());
        Ok(offers.len() as u64)
    }

    async fn describe_offer(&self, offer_id: u64) -> Result<Offer, DatabaseError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM offers WHERE id = ? AND is_deleted = 0"
        ))
        .bind(to_sql_int(offer_id)?)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DatabaseError::OfferNotFound(offer_id))?;

        Ok(offer_from_row(&row)?)
    }

    async fn list_offers(
        &self,
        pagination: PaginationInput,
    ) -> Result<(Vec<Offer>, PaginationInfo), DatabaseError> {
        if pagination.take == 0 {
            return Err(DatabaseError::ZeroPageSize);
        }

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offers WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM offers
             WHERE is_deleted = 0
             ORDER BY id
             LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(pagination.take))
        .bind(to_sql_int(pagination.skip)?)
        .fetch_all(&self.pool)
        .await?;

        let offers = rows
            .iter()
            .map(offer_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let info = pagination.pagination_info(offers.len() as u32, total as u64);
        Ok((offers, info))
    }

    async fn update_offer(&self, offer: &Offer) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE offers
             SET user_id = ?, team_id = ?, grade = ?, updated_at_ms = ?
             WHERE id = ? AND is_deleted = 0",
        )
        .bind(to_sql_int(offer.user_id)?)
        .bind(to_sql_int(offer.team_id)?)
        .bind(to_sql_int(offer.grade)?)
        .bind(now_millis())
        .bind(to_sql_int(offer.id)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::OfferNotFound(offer.id));
        }
        Ok(())
    }

    async fn remove_offer(&self, offer_id: u64) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE offers SET is_deleted = 1, updated_at_ms = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(now_millis())
        .bind(to_sql_int(offer_id)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::OfferNotFound(offer_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::create_test_pool;

    async fn repo() -> SqliteOfferRepository {
        SqliteOfferRepository::new(create_test_pool().await)
    }

    #[tokio::test]
    async fn test_create_and_describe() {
        let repo = repo().await;
        let id = repo
            .create_offer(&Offer::new(7, 3, 5))
            .await
            .expect("Failed to create offer");
        assert!(id > 0);

        let offer = repo.describe_offer(id).await.expect("Failed to describe");
        assert_eq!(offer.id, id);
        assert_eq!(offer.user_id, 7);
        assert_eq!(offer.team_id, 3);
        assert_eq!(offer.grade, 5);
        assert!(!offer.is_deleted);
    }

    #[tokio::test]
    async fn test_describe_missing_offer() {
        let repo = repo().await;
        let err = repo.describe_offer(42).await.unwrap_err();
        assert!(matches!(err, DatabaseError::OfferNotFound(42)));
    }

    #[tokio::test]
    async fn test_multi_create_inserts_all() {
        let repo = repo().await;
        let offers: Vec<Offer> = (1..=5).map(|i| Offer::new(i, 1, i)).collect();
        assert_eq!(repo.multi_create_offer(&offers).await.unwrap(), 5);

        let (listed, info) = repo
            .list_offers(PaginationInput { take: 10, skip: 0 })
            .await
            .unwrap();
        assert_eq!(listed.len(), 5);
        assert_eq!(info.total_items, 5);
        let users: Vec<u64> = listed.iter().map(|o| o.user_id).collect();
        assert_eq!(users, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_multi_create_is_atomic() {
        let repo = repo().await;
        let mut offers = vec![Offer::new(1, 1, 1), Offer::new(2, 2, 2)];
        // Out of range for SQLite INTEGER: fails after the first row was inserted
        offers.push(Offer::new(u64::MAX, 1, 1));

        let err = repo.multi_create_offer(&offers).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ValueOutOfRange(_)));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offers")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(count, 0, "partial batch must be rolled back");
    }

    #[tokio::test]
    async fn test_multi_create_empty_is_noop() {
        let repo = repo().await;
        assert_eq!(repo.multi_create_offer(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let repo = repo().await;
        let offers: Vec<Offer> = (1..=25).map(|i| Offer::new(i, 1, 1)).collect();
        repo.multi_create_offer(&offers).await.unwrap();

        let (page, info) = repo
            .list_offers(PaginationInput { take: 10, skip: 20 })
            .await
            .unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].user_id, 21);
        assert_eq!(info.page, 3);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.per_page, 5);
        assert!(info.has_previous_page);
        assert!(!info.has_next_page);
    }

    #[tokio::test]
    async fn test_list_rejects_zero_take() {
        let repo = repo().await;
        let err = repo
            .list_offers(PaginationInput { take: 0, skip: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::ZeroPageSize));
    }

    #[tokio::test]
    async fn test_update_offer() {
        let repo = repo().await;
        let id = repo.create_offer(&Offer::new(1, 1, 1)).await.unwrap();

        let updated = Offer {
            id,
            user_id: 9,
            team_id: 8,
            grade: 7,
            is_deleted: false,
        };
        repo.update_offer(&updated).await.unwrap();
        assert_eq!(repo.describe_offer(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_offer() {
        let repo = repo().await;
        let offer = Offer {
            id: 100,
            ..Offer::new(1, 1, 1)
        };
        let err = repo.update_offer(&offer).await.unwrap_err();
        assert!(matches!(err, DatabaseError::OfferNotFound(100)));
    }

    #[tokio::test]
    async fn test_remove_is_soft_delete() {
        let repo = repo().await;
        let id = repo.create_offer(&Offer::new(1, 1, 1)).await.unwrap();
        repo.remove_offer(id).await.unwrap();

        assert!(matches!(
            repo.describe_offer(id).await,
            Err(DatabaseError::OfferNotFound(_))
        ));
        assert!(matches!(
            repo.remove_offer(id).await,
            Err(DatabaseError::OfferNotFound(_))
        ));

        let deleted: bool = sqlx::query_scalar("SELECT is_deleted FROM offers WHERE id = ?")
            .bind(id as i64)
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert!(deleted, "row stays in the table with the flag set");

        let (listed, info) = repo
            .list_offers(PaginationInput { take: 10, skip: 0 })
            .await
            .unwrap();
        assert!(listed.is_empty());
        assert_eq!(info.total_items, 0);
    }
}
