//! Simulation clock plumbing
//!
//! Hosts arm a timer when a run starts, wrap its cancellation in a
//! [`ClockGuard`] and hand it to
//! [`MissionController::attach_clock`](crate::MissionController::attach_clock).
//! The controller drops the guard in the same call that leaves
//! [`Phase::Active`](crate::Phase::Active), so no tick is scheduled past the
//! transition.

/// Scoped ownership of a running host timer.
#[must_use = "dropping the guard cancels the timer immediately"]
pub struct ClockGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ClockGuard {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.cancel.is_some()
    }

    /// Stop the timer now. Equivalent to dropping the guard.
    pub fn cancel(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ClockGuard {
    fn drop(&mut self) {
        self.fire();
    }
}

impl std::fmt::Debug for ClockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockGuard")
            .field("armed", &self.is_armed())
            .finish()
    }
}

/// Tokio-driven clock for multi-threaded hosts. Every mutation goes through
/// one mutex, which keeps tick and action processing serialized.
#[cfg(feature = "async")]
pub mod ticker {
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use tokio::task::JoinHandle;
    use tokio::time::{Instant, interval_at, sleep};

    use super::ClockGuard;
    use crate::lifecycle::{MissionController, MissionHooks, Phase};
    use crate::notifications::NotificationId;

    pub type SharedMission<H> = Arc<Mutex<MissionController<H>>>;

    pub fn lock<H: MissionHooks>(mission: &SharedMission<H>) -> MutexGuard<'_, MissionController<H>> {
        mission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tick the mission at its configured cadence until it leaves the
    /// active phase or the guard is dropped. Attach the guard to the mission
    /// so the task is aborted by the transition that ends the run.
    pub fn spawn_ticker<H>(mission: SharedMission<H>) -> ClockGuard
    where
        H: MissionHooks + Send + 'static,
    {
        let cadence = lock(&mission).config().tick_interval();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + cadence, cadence);
            loop {
                interval.tick().await;
                let mut m = lock(&mission);
                if m.tick().is_none() || m.phase() != Phase::Active {
                    break;
                }
            }
        });
        ClockGuard::new(move || handle.abort())
    }

    /// Remove a notification once its time-to-live elapses. Resolves to
    /// whether it was still live.
    pub fn spawn_expiry<H>(mission: SharedMission<H>, id: NotificationId) -> JoinHandle<bool>
    where
        H: MissionHooks + Send + 'static,
    {
        let ttl = lock(&mission).config().notification_ttl();
        tokio::spawn(async move {
            sleep(ttl).await;
            lock(&mission).expire_notification(id)
        })
    }

}
