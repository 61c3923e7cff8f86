//! Domain models.

mod offer;
mod pagination;

pub use offer::Offer;
pub use pagination::{PaginationInfo, PaginationInput};
