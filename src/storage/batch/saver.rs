//! Buffered saver.
//!
//! [`Saver`] accepts offers from any number of tasks and hands them to a single
//! event-loop task that owns the buffer. The loop flushes the buffer through a
//! [`Flusher`] on every notifier tick, whenever the buffer fills up, and once
//! more on shutdown. Offers that fail to persist stay buffered for the next
//! flush.
//!
//! The capacity flush starts only after the save that filled the buffer has
//! been acknowledged, so that caller returns before the flush completes. A
//! later save waits behind it in the request queue.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error_handling::SaverError;
use crate::models::Offer;

use super::flusher::Flusher;
use super::notifier::{Notifier, Ticks};

const STATE_CREATED: u8 = 0;
const STATE_INITIALIZED: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// An offer on its way to the event loop, with the channel its verdict goes back on.
struct SaveRequest {
    offer: Offer,
    ack: oneshot::Sender<Result<(), SaverError>>,
}

enum Lifecycle {
    Created {
        flusher: Flusher,
        notifier: Notifier,
        requests: mpsc::Receiver<SaveRequest>,
    },
    Initialized {
        notifier: Notifier,
        handle: JoinHandle<()>,
    },
    Closed,
}

/// Thread-safe front end of the buffered write pipeline.
///
/// A save that fills the buffer is acknowledged before the capacity flush it
/// triggers runs.
pub struct Saver {
    capacity: usize,
    state: AtomicU8,
    lifecycle: Mutex<Lifecycle>,
    requests: mpsc::Sender<SaveRequest>,
    shutdown: CancellationToken,
    /// Cancelled once the event loop has exited and the notifier is stopped.
    stopped: CancellationToken,
    buffered: Arc<AtomicUsize>,
}

impl Saver {
    /// Creates a saver that buffers at most `capacity` offers.
    ///
    /// # Errors
    ///
    /// - `SaverError::ZeroCapacity` if `capacity` is zero
    /// - `SaverError::ZeroGroupCount` if `flusher` splits into zero batches
    pub fn new(capacity: usize, flusher: Flusher, notifier: Notifier) -> Result<Self, SaverError> {
        if capacity == 0 {
            return Err(SaverError::ZeroCapacity);
        }
        if flusher.group_count() == 0 {
            return Err(SaverError::ZeroGroupCount);
        }

        // One slot: a sender waits until the loop has taken the previous request.
        let (requests_tx, requests_rx) = mpsc::channel(1);

        Ok(Saver {
            capacity,
            state: AtomicU8::new(STATE_CREATED),
            lifecycle: Mutex::new(Lifecycle::Created {
                flusher,
                notifier,
                requests: requests_rx,
            }),
            requests: requests_tx,
            shutdown: CancellationToken::new(),
            stopped: CancellationToken::new(),
            buffered: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Starts the notifier and the event loop.
    ///
    /// # Errors
    ///
    /// Returns `SaverError::AlreadyInitialized` unless the saver is freshly
    /// created, or the notifier's error if it fails to start.
    pub fn init(&self) -> Result<(), SaverError> {
        let mut lifecycle = self
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match std::mem::replace(&mut *lifecycle, Lifecycle::Closed) {
            Lifecycle::Created {
                flusher,
                mut notifier,
                requests,
            } => {
                if let Err(e) = notifier.init() {
                    *lifecycle = Lifecycle::Created {
                        flusher,
                        notifier,
                        requests,
                    };
                    return Err(e.into());
                }

                let event_loop = EventLoop {
                    capacity: self.capacity,
                    buffer: Vec::with_capacity(self.capacity),
                    flusher,
                    requests,
                    ticks: notifier.notify(),
                    shutdown: self.shutdown.clone(),
                    buffered: Arc::clone(&self.buffered),
                };
                let handle = tokio::spawn(event_loop.run());

                *lifecycle = Lifecycle::Initialized { notifier, handle };
                self.state.store(STATE_INITIALIZED, Ordering::SeqCst);
                log::info!("Saver initialized with capacity {}", self.capacity);
                Ok(())
            }
            other => {
                *lifecycle = other;
                Err(SaverError::AlreadyInitialized)
            }
        }
    }

    /// Hands `offer` to the event loop and waits until the loop has buffered it.
    ///
    /// Returning `Ok` means the offer is buffered, not that it is persisted.
    ///
    /// # Errors
    ///
    /// - `SaverError::NotInitialized` before [`Saver::init`]
    /// - `SaverError::Closed` once [`Saver::close`] has started
    /// - `SaverError::MaximumCapacityReached` if the buffer is full
    pub async fn save(&self, offer: Offer) -> Result<(), SaverError> {
        if self.shutdown.is_cancelled() {
            return Err(SaverError::Closed);
        }
        if self.state.load(Ordering::SeqCst) == STATE_CREATED {
            return Err(SaverError::NotInitialized);
        }

        let (ack, verdict) = oneshot::channel();
        let request = SaveRequest { offer, ack };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return Err(SaverError::Closed),
            sent = self.requests.send(request) => sent.map_err(|_| SaverError::Closed)?,
        }

        // The loop drops the ack without answering only when it has exited.
        verdict.await.map_err(|_| SaverError::Closed)?
    }

    /// Stops intake, flushes whatever is buffered, and stops the notifier.
    ///
    /// Returns after the event loop has exited, so the final flush has been
    /// attempted. Persistence errors in that flush are logged, not returned.
    /// Concurrent or repeated calls all wait for the same shutdown.
    pub async fn close(&self) {
        self.shutdown.cancel();

        let previous = {
            let mut lifecycle = self
                .lifecycle
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *lifecycle, Lifecycle::Closed)
        };
        self.state.store(STATE_CLOSED, Ordering::SeqCst);

        match previous {
            Lifecycle::Initialized {
                mut notifier,
                handle,
            } => {
                let _stopped = self.stopped.clone().drop_guard();
                if let Err(e) = handle.await {
                    log::error!("Saver event loop failed: {}", e);
                }
                if let Err(e) = notifier.close().await {
                    log::warn!("Failed to stop notifier: {}", e);
                }
                log::info!("Saver closed");
            }
            Lifecycle::Created { .. } => {
                self.stopped.cancel();
                log::debug!("Saver closed before initialization");
            }
            // Another caller owns the event loop handle
            Lifecycle::Closed => self.stopped.cancelled().await,
        }
    }

    /// Snapshot of the number of buffered offers; may be stale by the time it is read.
    pub fn buffered_len(&self) -> usize {
        self.buffered.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Drop for Saver {
    fn drop(&mut self) {
        // Lets an abandoned event loop run its final flush and exit.
        self.shutdown.cancel();
    }
}

/// Sole owner of the buffer.
struct EventLoop {
    capacity: usize,
    buffer: Vec<Offer>,
    flusher: Flusher,
    requests: mpsc::Receiver<SaveRequest>,
    ticks: Ticks,
    shutdown: CancellationToken,
    buffered: Arc<AtomicUsize>,
}

impl EventLoop {
    async fn run(mut self) {
        let mut ticks_open = true;

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                Some(request) = self.requests.recv() => self.accept(request).await,
                changed = self.ticks.changed(), if ticks_open => match changed {
                    Ok(()) => self.flush("periodic").await,
                    Err(_) => {
                        log::debug!("Tick stream ended, periodic flushing stopped");
                        ticks_open = false;
                    }
                },
            }
        }

        // Requests that reached the queue before shutdown are still accepted.
        self.requests.close();
        while let Ok(request) = self.requests.try_recv() {
            self.accept(request).await;
        }

        self.flush("final").await;
        if !self.buffer.is_empty() {
            log::error!(
                "Saver shut down with {} unpersisted offers",
                self.buffer.len()
            );
        }
    }

    async fn accept(&mut self, request: SaveRequest) {
        if self.buffer.len() >= self.capacity {
            // The caller may have given up waiting; the rejection is dropped with it.
            let _ = request.ack.send(Err(SaverError::MaximumCapacityReached {
                capacity: self.capacity,
            }));
            return;
        }

        self.buffer.push(request.offer);
        self.publish_len();
        // The caller may have given up waiting; the offer stays buffered either way.
        let _ = request.ack.send(Ok(()));

        if self.buffer.len() >= self.capacity {
            self.flush("capacity").await;
        }
    }

    async fn flush(&mut self, reason: &str) {
        if self.buffer.is_empty() {
            return;
        }

        let offers = std::mem::take(&mut self.buffer);
        let count = offers.len();
        let outcome = self.flusher.flush(offers).await;

        match &outcome.error {
            Some(e) => log::warn!(
                "{} flush persisted {} of {} offers, {} retained: {}",
                reason,
                count - outcome.remaining.len(),
                count,
                outcome.remaining.len(),
                e
            ),
            None => log::debug!("{} flush persisted {} offers", reason, count),
        }

        self.buffer = outcome.remaining;
        self.publish_len();
    }

    fn publish_len(&self) {
        self.buffered.store(self.buffer.len(), Ordering::SeqCst);
    }
}
