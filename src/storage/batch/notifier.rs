//! Periodic tick source for the batch pipeline.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error_handling::NotifierError;

/// Tick stream handed out by [`Notifier::notify`].
///
/// The value is the number of ticks fired so far. `changed()` resolves on the
/// next tick and returns an error once the notifier has shut down. Only the
/// latest tick is kept, so a slow consumer sees one pending tick at most.
pub type Ticks = watch::Receiver<u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotifierState {
    Created,
    Running,
    Closed,
}

/// Fires a tick every `duration` from a single background task.
///
/// Lifecycle is `Created -> Running -> Closed`; a notifier cannot be restarted.
pub struct Notifier {
    duration: Duration,
    state: NotifierState,
    ticks: Ticks,
    sender: Option<watch::Sender<u64>>,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Notifier {
    /// Creates a notifier that will tick every `duration` once initialized.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::InvalidDuration` if `duration` is zero.
    pub fn new(duration: Duration) -> Result<Self, NotifierError> {
        if duration.is_zero() {
            return Err(NotifierError::InvalidDuration);
        }

        let (sender, ticks) = watch::channel(0);
        Ok(Notifier {
            duration,
            state: NotifierState::Created,
            ticks,
            sender: Some(sender),
            shutdown: CancellationToken::new(),
            handle: None,
        })
    }

    /// Starts the background tick task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn init(&mut self) -> Result<(), NotifierError> {
        if self.state != NotifierState::Created {
            return Err(NotifierError::AlreadyInitialized);
        }
        let sender = self
            .sender
            .take()
            .ok_or(NotifierError::AlreadyInitialized)?;

        let duration = self.duration;
        let shutdown = self.shutdown.clone();

        self.handle = Some(tokio::spawn(async move {
            // First tick one full period from now, not immediately
            let mut ticker = interval_at(Instant::now() + duration, duration);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        log::debug!("Notifier background task shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        sender.send_modify(|count| *count += 1);
                    }
                }
            }
            // Dropping the sender ends every tick stream
            drop(sender);
        }));

        self.state = NotifierState::Running;
        log::debug!("Notifier started with period {:?}", duration);
        Ok(())
    }

    /// Returns a tick stream positioned at the current tick.
    pub fn notify(&self) -> Ticks {
        let mut ticks = self.ticks.clone();
        ticks.borrow_and_update();
        ticks
    }

    /// Stops the background task and waits for it to exit.
    ///
    /// Consumers of [`Notifier::notify`] observe the end of the stream once this returns.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::NotRunning` unless the notifier is running.
    pub async fn close(&mut self) -> Result<(), NotifierError> {
        if self.state != NotifierState::Running {
            return Err(NotifierError::NotRunning);
        }

        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::error!("Notifier background task failed: {}", e);
            }
        }

        self.state = NotifierState::Closed;
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
