//! Live stamina snapshot and the edits that change it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clock::format_time;
use crate::constants::{
    DEFAULT_BUY_50_TIMES, DEFAULT_BUY_100_TIMES, DEFAULT_CURRENT_STAMINA, DEFAULT_CURRENT_TIME,
    DEFAULT_MAX_STAMINA, DEFAULT_OTHER_STAMINA,
};
use crate::numbers::{to_int, to_positive_int};

/// Everything the projection engine reads: the live, user-editable stamina snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaminaState {
    /// `HH:MM` at which `current_stamina` was accurate.
    pub current_time: String,
    pub current_stamina: i64,
    pub max_stamina: i64,
    pub activity_reward: bool,
    pub mini_program_sign_in: bool,
    pub friend_gift: bool,
    pub buy_100_times: i64,
    pub buy_50_times: i64,
    /// Signed free-form adjustment; negative values model planned spending.
    pub other_stamina: i64,
}

impl Default for StaminaState {
    fn default() -> Self {
        Self {
            current_time: DEFAULT_CURRENT_TIME.to_string(),
            current_stamina: DEFAULT_CURRENT_STAMINA,
            max_stamina: DEFAULT_MAX_STAMINA,
            activity_reward: false,
            mini_program_sign_in: false,
            friend_gift: false,
            buy_100_times: DEFAULT_BUY_100_TIMES,
            buy_50_times: DEFAULT_BUY_50_TIMES,
            other_stamina: DEFAULT_OTHER_STAMINA,
        }
    }
}

impl StaminaState {
    /// Fresh defaults stamped with the given `HH:MM`.
    #[must_use]
    pub fn fresh(current_time: impl Into<String>) -> Self {
        Self {
            current_time: current_time.into(),
            ..Self::default()
        }
    }

    /// Fresh defaults stamped with the time of day of `now`.
    #[must_use]
    pub fn fresh_at(now: NaiveDateTime) -> Self {
        Self::fresh(format_time(now))
    }

    /// Apply a single user edit, coercing numeric input the way the form fields do.
    pub fn apply(&mut self, edit: StaminaEdit) {
        match edit {
            StaminaEdit::CurrentTime(time) => self.current_time = time,
            StaminaEdit::CurrentStamina(value) => self.current_stamina = to_positive_int(value),
            StaminaEdit::MaxStamina(value) => self.max_stamina = to_positive_int(value),
            StaminaEdit::ActivityReward(claimed) => self.activity_reward = claimed,
            StaminaEdit::MiniProgramSignIn(claimed) => self.mini_program_sign_in = claimed,
            StaminaEdit::FriendGift(claimed) => self.friend_gift = claimed,
            StaminaEdit::Buy100Times(value) => self.buy_100_times = to_positive_int(value),
            StaminaEdit::Buy50Times(value) => self.buy_50_times = to_positive_int(value),
            StaminaEdit::OtherStamina(value) => self.other_stamina = to_int(value),
        }
    }

    /// Builder-style [`StaminaState::apply`].
    #[must_use]
    pub fn with(mut self, edit: StaminaEdit) -> Self {
        self.apply(edit);
        self
    }
}

/// A single transition of the live state, one per editable field.
///
/// Numeric payloads are raw `f64` form input; non-finite values coerce to 0.
#[derive(Debug, Clone, PartialEq)]
pub enum StaminaEdit {
    CurrentTime(String),
    CurrentStamina(f64),
    MaxStamina(f64),
    ActivityReward(bool),
    MiniProgramSignIn(bool),
    FriendGift(bool),
    Buy100Times(f64),
    Buy50Times(f64),
    OtherStamina(f64),
}

impl StaminaEdit {
    /// Field name as it appears in the stored record.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::CurrentTime(_) => "currentTime",
            Self::CurrentStamina(_) => "currentStamina",
            Self::MaxStamina(_) => "maxStamina",
            Self::ActivityReward(_) => "activityReward",
            Self::MiniProgramSignIn(_) => "miniProgramSignIn",
            Self::FriendGift(_) => "friendGift",
            Self::Buy100Times(_) => "buy100Times",
            Self::Buy50Times(_) => "buy50Times",
            Self::OtherStamina(_) => "otherStamina",
        }
    }
}
