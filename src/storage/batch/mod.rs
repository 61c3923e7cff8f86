//! Buffered batch-write pipeline.
//!
//! Offers flow `Saver -> Flusher -> OfferRepository`:
//! - [`Saver`] buffers offers handed to it by any number of tasks
//! - [`Notifier`] drives periodic flushing
//! - [`Flusher`] splits a flush into batches and persists them in order

mod flusher;
mod notifier;
mod saver;

pub use flusher::{FlushOutcome, Flusher};
pub use notifier::{Notifier, Ticks};
pub use saver::Saver;
