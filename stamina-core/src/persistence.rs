//! Day-keyed persistence of the live stamina state.
//!
//! One record lives under a fixed key. On startup it is either resumed (same
//! calendar day, with stamina re-estimated for the time the app was closed)
//! or replaced by fresh defaults. Every later transition overwrites it.

use chrono::NaiveDateTime;
use num_traits::cast::cast;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::clock::{date_key, format_time, parse_minutes};
use crate::constants::{
    DEFAULT_CURRENT_STAMINA, DEFAULT_MAX_STAMINA, RECOVERY_INTERVAL_MINUTES, STAMINA_STORAGE_KEY,
};
use crate::numbers::{to_int, to_positive_int};
use crate::state::StaminaState;
use crate::storage::KeyValueStore;

/// Persisted form: `{ dateKey, lastTime, state }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub date_key: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_time: Option<String>,
    pub state: StoredState,
}

/// Partial state as stored. Fields of the wrong JSON type read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    /// Only present in older records that predate `lastTime`.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_stamina: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_stamina: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub activity_reward: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub mini_program_sign_in: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub friend_gift: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub buy_100_times: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub buy_50_times: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub other_stamina: Option<Number>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn number_or(value: Option<&Number>, fallback: i64) -> f64 {
    value
        .and_then(Number::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or_else(|| cast::<i64, f64>(fallback).unwrap_or(0.0))
}

impl StoredState {
    #[must_use]
    pub fn from_state(state: &StaminaState) -> Self {
        Self {
            current_time: None,
            current_stamina: Some(state.current_stamina.into()),
            max_stamina: Some(state.max_stamina.into()),
            activity_reward: Some(state.activity_reward),
            mini_program_sign_in: Some(state.mini_program_sign_in),
            friend_gift: Some(state.friend_gift),
            buy_100_times: Some(state.buy_100_times.into()),
            buy_50_times: Some(state.buy_50_times.into()),
            other_stamina: Some(state.other_stamina.into()),
        }
    }

    /// Stored current stamina, coerced; non-numeric values fall back to the default.
    #[must_use]
    pub fn current_stamina(&self) -> i64 {
        to_positive_int(number_or(
            self.current_stamina.as_ref(),
            DEFAULT_CURRENT_STAMINA,
        ))
    }

    /// Stored cap, coerced; non-numeric values fall back to the default.
    #[must_use]
    pub fn max_stamina(&self) -> i64 {
        to_positive_int(number_or(self.max_stamina.as_ref(), DEFAULT_MAX_STAMINA))
    }

    /// Lay the stored fields over `base`, keeping `base` wherever a field is absent.
    #[must_use]
    pub fn overlay(&self, base: StaminaState) -> StaminaState {
        StaminaState {
            current_time: self.current_time.clone().unwrap_or(base.current_time),
            current_stamina: to_positive_int(number_or(
                self.current_stamina.as_ref(),
                base.current_stamina,
            )),
            max_stamina: to_positive_int(number_or(self.max_stamina.as_ref(), base.max_stamina)),
            activity_reward: self.activity_reward.unwrap_or(base.activity_reward),
            mini_program_sign_in: self
                .mini_program_sign_in
                .unwrap_or(base.mini_program_sign_in),
            friend_gift: self.friend_gift.unwrap_or(base.friend_gift),
            buy_100_times: to_positive_int(number_or(
                self.buy_100_times.as_ref(),
                base.buy_100_times,
            )),
            buy_50_times: to_positive_int(number_or(
                self.buy_50_times.as_ref(),
                base.buy_50_times,
            )),
            other_stamina: to_int(number_or(self.other_stamina.as_ref(), base.other_stamina)),
        }
    }
}

impl StoredRecord {
    /// Record for `state` under `date_key`, stamped with the state's time.
    #[must_use]
    pub fn new(date_key: impl Into<String>, state: &StaminaState) -> Self {
        Self {
            date_key: date_key.into(),
            last_time: Some(state.current_time.clone()),
            state: StoredState::from_state(state),
        }
    }

    /// Time the stored stamina was last accurate, preferring `lastTime`.
    ///
    /// A blank time counts as no time at all.
    #[must_use]
    pub fn last_time(&self) -> Option<&str> {
        self.last_time
            .as_deref()
            .or(self.state.current_time.as_deref())
            .filter(|time| !time.trim().is_empty())
    }
}

/// Parse a raw stored value. Malformed or mistyped JSON yields `None`.
#[must_use]
pub fn parse_stored_record(raw: &str) -> Option<StoredRecord> {
    serde_json::from_str(raw).ok()
}

/// Re-estimate stored stamina for the minutes elapsed since the record was written.
///
/// Stamina is capped at the stored max, regenerated, then capped again, so a
/// session gap never lifts it above the cap. Without a stored time no
/// regeneration is credited.
#[must_use]
pub fn estimate_current_stamina(record: &StoredRecord, now: NaiveDateTime) -> i64 {
    let max = record.state.max_stamina();
    let capped = record.state.current_stamina().min(max);
    let Some(last_time) = record.last_time() else {
        return capped;
    };
    let elapsed = (parse_minutes(&format_time(now)) - parse_minutes(last_time)).max(0);
    let recovered = elapsed / RECOVERY_INTERVAL_MINUTES;
    max.min(capped.saturating_add(recovered))
}

/// Why a fresh default state was created instead of resuming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum FreshReason {
    Missing,
    Unreadable,
    Malformed,
    #[serde(rename_all = "camelCase")]
    Stale { stored_date_key: String },
    /// The live session crossed a midnight reset.
    #[serde(rename_all = "camelCase")]
    Rollover { previous_date_key: String },
}

/// How [`DailyStore::initialize`] produced its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LoadOutcome {
    Resumed { recovered: i64 },
    Fresh(FreshReason),
}

/// Result of reconciling storage with the current day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub state: StaminaState,
    pub date_key: String,
    pub outcome: LoadOutcome,
}

/// Reconcile a stored record, or the reason there is none, with `now`.
///
/// Pure: storage is neither read nor written.
#[must_use]
pub fn reconcile(record: Result<StoredRecord, FreshReason>, now: NaiveDateTime) -> Restored {
    let today = date_key(now);
    let record = match record {
        Ok(record) if record.date_key == today => record,
        Ok(record) => {
            return fresh(
                today,
                now,
                FreshReason::Stale {
                    stored_date_key: record.date_key,
                },
            );
        }
        Err(reason) => return fresh(today, now, reason),
    };

    let capped = record.state.current_stamina().min(record.state.max_stamina());
    let current_stamina = estimate_current_stamina(&record, now);
    let state = StaminaState {
        current_time: format_time(now),
        current_stamina,
        ..record.state.overlay(StaminaState::default())
    };
    Restored {
        state,
        date_key: record.date_key,
        outcome: LoadOutcome::Resumed {
            recovered: current_stamina - capped,
        },
    }
}

fn fresh(today: String, now: NaiveDateTime, reason: FreshReason) -> Restored {
    Restored {
        state: StaminaState::fresh_at(now),
        date_key: today,
        outcome: LoadOutcome::Fresh(reason),
    }
}

/// Owns reads and writes of the day record for one storage key.
#[derive(Debug)]
pub struct DailyStore<S> {
    store: S,
    key: String,
    date_key: Option<String>,
}

impl<S: KeyValueStore> DailyStore<S> {
    /// Adapter over `store` using the standard storage key.
    pub fn new(store: S) -> Self {
        Self::with_key(store, STAMINA_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            date_key: None,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Calendar day currently tracked, once initialized.
    #[must_use]
    pub fn date_key(&self) -> Option<&str> {
        self.date_key.as_deref()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn read_record(&self) -> Result<StoredRecord, FreshReason> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(FreshReason::Missing),
            Err(err) => {
                log::warn!("stamina record under {:?} unreadable: {err}", self.key);
                return Err(FreshReason::Unreadable);
            }
        };
        parse_stored_record(&raw).ok_or_else(|| {
            log::warn!("discarding malformed stamina record under {:?}", self.key);
            FreshReason::Malformed
        })
    }

    /// Load today's state, resuming or resetting, and write it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the reconciled record cannot be written.
    pub fn initialize(&mut self, now: NaiveDateTime) -> Result<Restored, S::Error> {
        let restored = reconcile(self.read_record(), now);
        match &restored.outcome {
            LoadOutcome::Resumed { recovered } => log::debug!(
                "resumed stamina for {} ({recovered} recovered while away)",
                restored.date_key
            ),
            LoadOutcome::Fresh(reason) => log::debug!(
                "starting fresh stamina day {} ({reason:?})",
                restored.date_key
            ),
        }
        self.date_key = Some(restored.date_key.clone());
        self.write(&restored.date_key, &restored.state)?;
        Ok(restored)
    }

    /// Overwrite the record for the tracked day. Does nothing before initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn persist(&self, state: &StaminaState) -> Result<bool, S::Error> {
        let Some(date_key) = self.date_key.as_deref() else {
            return Ok(false);
        };
        self.write(date_key, state)?;
        Ok(true)
    }

    /// Roll the tracked day forward to `now` with fresh defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the new day's record cannot be written.
    pub fn start_new_day(&mut self, now: NaiveDateTime) -> Result<StaminaState, S::Error> {
        let next_key = date_key(now);
        let state = StaminaState::fresh_at(now);
        log::info!(
            "stamina day rolled over from {} to {next_key}",
            self.date_key.as_deref().unwrap_or("<none>")
        );
        self.date_key = Some(next_key.clone());
        self.write(&next_key, &state)?;
        Ok(state)
    }

    fn write(&self, date_key: &str, state: &StaminaState) -> Result<(), S::Error> {
        let record = StoredRecord::new(date_key, state);
        match serde_json::to_string(&record) {
            Ok(payload) => self.store.set(&self.key, &payload),
            Err(err) => {
                log::warn!("skipping stamina write under {}: {err}", self.key);
                Ok(())
            }
        }
    }
}
