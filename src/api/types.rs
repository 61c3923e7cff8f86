//! Request and response bodies of the offer API.

use serde::{Deserialize, Serialize};

use crate::models::{Offer, PaginationInfo};

/// Fields a client supplies for a new or updated offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OfferInput {
    pub user_id: u64,
    pub team_id: u64,
    pub grade: u64,
}

impl OfferInput {
    pub fn into_offer(self, id: u64) -> Offer {
        Offer {
            id,
            ..Offer::new(self.user_id, self.team_id, self.grade)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MultiCreateRequest {
    pub offers: Vec<OfferInput>,
}

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub take: Option<u32>,
    pub skip: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CreateOfferResponse {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub struct MultiCreateResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct BufferedResponse {
    pub accepted: usize,
}

#[derive(Debug, Serialize)]
pub struct DescribeOfferResponse {
    pub offer: OfferView,
}

#[derive(Debug, Serialize)]
pub struct ListOffersResponse {
    pub offers: Vec<OfferView>,
    pub pagination: PaginationInfo,
}

/// Offer as returned to clients; the soft-delete flag is internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferView {
    pub id: u64,
    pub user_id: u64,
    pub team_id: u64,
    pub grade: u64,
}

impl From<Offer> for OfferView {
    fn from(offer: Offer) -> Self {
        OfferView {
            id: offer.id,
            user_id: offer.user_id,
            team_id: offer.team_id,
            grade: offer.grade,
        }
    }
}
