// storage/mod.rs
// Database operations module

pub mod batch;
mod migrations;
mod offers;
mod pool;
mod repository;
#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use offers::SqliteOfferRepository;
pub use pool::init_db_pool_with_path;
pub use repository::OfferRepository;
