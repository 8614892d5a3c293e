//! Session controller owning the live stamina state.

use std::time::Duration;

use crate::clock::{Clock, date_key, until_next_midnight};
use crate::persistence::{DailyStore, FreshReason, LoadOutcome, Restored};
use crate::projection::{Projection, project_stamina};
use crate::state::{StaminaEdit, StaminaState};
use crate::storage::KeyValueStore;

/// Single owner of the live stamina state.
///
/// Every transition goes through this type and is written back to storage
/// before it returns; the projection is recomputed on demand.
#[derive(Debug)]
pub struct StaminaSession<S, C> {
    daily: DailyStore<S>,
    clock: C,
    state: StaminaState,
    outcome: LoadOutcome,
}

impl<S, C> StaminaSession<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    /// Open a session over `store`, resuming today's record or starting fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the reconciled record cannot be written.
    pub fn open(store: S, clock: C) -> Result<Self, S::Error> {
        Self::from_daily(DailyStore::new(store), clock)
    }

    /// Open a session over a pre-configured adapter (for example a custom key).
    ///
    /// # Errors
    ///
    /// Returns an error if the reconciled record cannot be written.
    pub fn from_daily(mut daily: DailyStore<S>, clock: C) -> Result<Self, S::Error> {
        let Restored { state, outcome, .. } = daily.initialize(clock.now())?;
        Ok(Self {
            daily,
            clock,
            state,
            outcome,
        })
    }

    /// Borrow the live state.
    #[must_use]
    pub const fn state(&self) -> &StaminaState {
        &self.state
    }

    /// How the session's current state was obtained: loaded, or rolled over.
    #[must_use]
    pub const fn outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    /// Calendar day the session is tracking.
    #[must_use]
    pub fn date_key(&self) -> Option<&str> {
        self.daily.date_key()
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub const fn daily(&self) -> &DailyStore<S> {
        &self.daily
    }

    /// Derived metrics for the current state.
    #[must_use]
    pub fn projection(&self) -> Projection {
        project_stamina(&self.state)
    }

    /// Apply one edit and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the in-memory state keeps the edit.
    pub fn apply(&mut self, edit: StaminaEdit) -> Result<&StaminaState, S::Error> {
        log::debug!("stamina edit {}", edit.field());
        self.state.apply(edit);
        self.daily.persist(&self.state)?;
        Ok(&self.state)
    }

    /// Apply several edits, persisting once at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the in-memory state keeps the edits.
    pub fn apply_all(
        &mut self,
        edits: impl IntoIterator<Item = StaminaEdit>,
    ) -> Result<&StaminaState, S::Error> {
        for edit in edits {
            log::debug!("stamina edit {}", edit.field());
            self.state.apply(edit);
        }
        self.daily.persist(&self.state)?;
        Ok(&self.state)
    }

    /// Apply a closure to the live state and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the in-memory state keeps the change.
    pub fn with_state_mut<R>(
        &mut self,
        f: impl FnOnce(&mut StaminaState) -> R,
    ) -> Result<R, S::Error> {
        let result = f(&mut self.state);
        self.daily.persist(&self.state)?;
        Ok(result)
    }

    /// Time left until the next local midnight reset.
    #[must_use]
    pub fn next_reset_delay(&self) -> Duration {
        until_next_midnight(self.clock.now())
    }

    /// Whether the clock has moved past the calendar day being tracked.
    #[must_use]
    pub fn day_has_changed(&self) -> bool {
        self.daily.date_key() != Some(date_key(self.clock.now()).as_str())
    }

    /// Replace the live state with fresh defaults for the clock's current day.
    ///
    /// # Errors
    ///
    /// Returns an error if the new day's record cannot be written; the live
    /// state and tracked day are already rolled forward.
    pub fn reset_for_new_day(&mut self) -> Result<&StaminaState, S::Error> {
        let now = self.clock.now();
        let previous_date_key = self.daily.date_key().unwrap_or_default().to_string();
        self.state = StaminaState::fresh_at(now);
        self.outcome = LoadOutcome::Fresh(FreshReason::Rollover { previous_date_key });
        self.daily.start_new_day(now)?;
        Ok(&self.state)
    }

    /// Consume the session, returning the live state.
    #[must_use]
    pub fn into_state(self) -> StaminaState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, ManualClock};
    use crate::constants::STAMINA_STORAGE_KEY;
    use crate::persistence::parse_stored_record;
    use crate::storage::MemoryStore;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid instant")
    }

    #[test]
    fn edits_are_written_through() {
        let store = MemoryStore::new();
        let mut session = StaminaSession::open(store.clone(), FixedClock(at(18, 9, 0))).unwrap();
        assert_eq!(
            session.outcome(),
            &LoadOutcome::Fresh(FreshReason::Missing)
        );

        session.apply(StaminaEdit::CurrentStamina(110.0)).unwrap();
        session
            .apply_all([
                StaminaEdit::ActivityReward(true),
                StaminaEdit::Buy50Times(0.0),
            ])
            .unwrap();
        let raw = store.get(STAMINA_STORAGE_KEY).unwrap().unwrap();
        let record = parse_stored_record(&raw).unwrap();
        let persisted = record.state.overlay(StaminaState::default());
        assert_eq!(persisted.current_stamina, 110);
        assert!(persisted.activity_reward);
        assert_eq!(persisted.buy_50_times, 0);
        assert_eq!(session.projection().bonuses.total(), 400);
    }

    #[test]
    fn reopening_resumes_with_regeneration() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(at(18, 9, 0));
        let mut session = StaminaSession::open(store.clone(), clock.clone()).unwrap();
        session
            .with_state_mut(|state| state.current_stamina = 30)
            .unwrap();
        drop(session);

        clock.advance_minutes(47);
        let reopened = StaminaSession::open(store, clock).unwrap();
        assert_eq!(reopened.outcome(), &LoadOutcome::Resumed { recovered: 9 });
        assert_eq!(reopened.state().current_stamina, 39);
        assert_eq!(reopened.state().current_time, "09:47");
    }

    #[test]
    fn midnight_reset_restores_defaults() {
        let clock = ManualClock::new(at(18, 23, 30));
        let mut session = StaminaSession::open(MemoryStore::new(), clock.clone()).unwrap();
        session.apply(StaminaEdit::FriendGift(true)).unwrap();
        assert_eq!(session.next_reset_delay(), Duration::from_secs(30 * 60));

        clock.set(at(19, 0, 0));
        let state = session.reset_for_new_day().unwrap().clone();
        assert_eq!(state, StaminaState::fresh("00:00"));
        assert_eq!(session.date_key(), Some("2026-10-19"));
        assert_eq!(
            session.outcome(),
            &LoadOutcome::Fresh(FreshReason::Rollover {
                previous_date_key: "2026-10-18".into()
            })
        );
        assert!(!session.into_state().friend_gift);
    }

    #[test]
    fn day_change_follows_the_clock() {
        let clock = ManualClock::new(at(18, 23, 59));
        let session = StaminaSession::open(MemoryStore::new(), clock.clone()).unwrap();
        assert!(!session.day_has_changed());

        clock.set(at(19, 0, 0));
        assert!(session.day_has_changed());
    }
}
