//! Midnight reset task for hosts running a tokio runtime.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::session::StaminaSession;
use crate::storage::KeyValueStore;

/// Handle to the scheduled midnight reset.
///
/// The task sleeps until the next local midnight, rolls the session over to a
/// fresh day, hands the session to the callback, and re-arms itself. Dropping
/// the handle aborts the task so it can never fire against a torn-down session.
#[derive(Debug)]
pub struct MidnightReset {
    handle: JoinHandle<()>,
}

impl MidnightReset {
    /// Spawn the reset loop on the current tokio runtime.
    pub fn spawn<S, C, F>(session: Arc<Mutex<StaminaSession<S, C>>>, mut on_reset: F) -> Self
    where
        S: KeyValueStore + Send + 'static,
        C: Clock + Send + 'static,
        F: FnMut(&StaminaSession<S, C>) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                let delay = session.lock().await.next_reset_delay();
                log::debug!("next stamina reset in {}s", delay.as_secs());
                tokio::time::sleep(delay).await;

                let mut guard = session.lock().await;
                if !guard.day_has_changed() {
                    log::debug!("stamina day unchanged at reset time, re-arming");
                    continue;
                }
                if let Err(err) = guard.reset_for_new_day() {
                    log::error!("midnight reset could not be persisted: {err}");
                }
                on_reset(&guard);
            }
        });
        Self { handle }
    }

    /// Stop the task. Equivalent to dropping the handle.
    pub fn cancel(self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for MidnightReset {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
