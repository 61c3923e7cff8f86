//! Offer repository abstraction.
//!
//! The HTTP layer and the batch pipeline talk to storage only through
//! [`OfferRepository`], so tests can substitute an in-memory implementation.

use async_trait::async_trait;

use crate::error_handling::DatabaseError;
use crate::models::{Offer, PaginationInfo, PaginationInput};

/// CRUD operations over offers.
///
/// Soft-deleted offers are invisible to every read and write except
/// `multi_create_offer`/`create_offer`, which always insert new rows.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Inserts one offer and returns its new id.
    async fn create_offer(&self, offer: &Offer) -> Result<u64, DatabaseError>;

    /// Inserts all `offers` atomically and returns how many were inserted.
    ///
    /// Either every offer in the slice is stored or none is; the batch pipeline
    /// relies on this to compute what remains unflushed.
    async fn multi_create_offer(&self, offers: &[Offer]) -> Result<u64, DatabaseError>;

    /// Fetches a live offer by id.
    async fn describe_offer(&self, offer_id: u64) -> Result<Offer, DatabaseError>;

    /// Lists live offers ordered by id.
    async fn list_offers(
        &self,
        pagination: PaginationInput,
    ) -> Result<(Vec<Offer>, PaginationInfo), DatabaseError>;

    /// Replaces the mutable fields of a live offer.
    async fn update_offer(&self, offer: &Offer) -> Result<(), DatabaseError>;

    /// Marks a live offer as deleted.
    async fn remove_offer(&self, offer_id: u64) -> Result<(), DatabaseError>;
}
