//! Stamina projection engine.
//!
//! A pure function of a [`StaminaState`] snapshot: the snapshot's
//! `current_time` is the evaluation instant, and every derived quantity shown
//! to the player is computed here. Nothing is mutated or persisted.

use serde::Serialize;
use std::fmt;

use crate::clock::{format_minutes_to_time, parse_minutes};
use crate::constants::{
    ACTIVITY_REWARD_AMOUNT, BUY_50_PACK_AMOUNT, BUY_100_PACK_AMOUNT, DAILY_RECOVERY_MAX,
    FRIEND_GIFT_AMOUNT, MINI_PROGRAM_SIGN_IN_AMOUNT, MINUTES_PER_DAY, MINUTES_PER_HOUR,
    RECOVERY_INTERVAL_MINUTES,
};
use crate::numbers::non_negative;
use crate::state::StaminaState;

/// Stamina contributed by each bonus source today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusBreakdown {
    pub activity: i64,
    pub mini_program: i64,
    pub friend_gift: i64,
    pub buy_100: i64,
    pub buy_50: i64,
    /// Signed; negative when the player plans to spend stamina.
    pub other: i64,
}

impl BonusBreakdown {
    #[must_use]
    pub fn from_state(state: &StaminaState) -> Self {
        Self {
            activity: if state.activity_reward {
                ACTIVITY_REWARD_AMOUNT
            } else {
                0
            },
            mini_program: if state.mini_program_sign_in {
                MINI_PROGRAM_SIGN_IN_AMOUNT
            } else {
                0
            },
            friend_gift: if state.friend_gift {
                FRIEND_GIFT_AMOUNT
            } else {
                0
            },
            buy_100: non_negative(state.buy_100_times).saturating_mul(BUY_100_PACK_AMOUNT),
            buy_50: non_negative(state.buy_50_times).saturating_mul(BUY_50_PACK_AMOUNT),
            other: state.other_stamina,
        }
    }

    /// Sum of every source, `other` included with its sign.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.activity
            .saturating_add(self.mini_program)
            .saturating_add(self.friend_gift)
            .saturating_add(self.buy_100)
            .saturating_add(self.buy_50)
            .saturating_add(self.other)
    }
}

/// When natural regeneration alone fills the bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FullTime {
    /// Already at or above the cap.
    AlreadyFull,
    /// Full at `time`; a non-zero `day_offset` means only after crossing a reset.
    #[serde(rename_all = "camelCase")]
    At { time: String, day_offset: i64 },
}

impl FullTime {
    /// True when filling up requires crossing at least one daily reset.
    #[must_use]
    pub const fn is_next_day(&self) -> bool {
        matches!(self, Self::At { day_offset, .. } if *day_offset > 0)
    }
}

impl fmt::Display for FullTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyFull => f.write_str("already full"),
            Self::At { time, day_offset } if *day_offset > 0 => {
                write!(f, "{time} (new game day)")
            }
            Self::At { time, .. } => f.write_str(time),
        }
    }
}

/// Whether regeneration is being wasted now, will be, or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverflowStatus {
    /// Already full: every regenerated point until the reset is lost.
    Alert { overflow: i64 },
    /// Will reach the cap before the reset and waste `overflow` afterwards.
    #[serde(rename_all = "camelCase")]
    Projected { full_at: FullTime, overflow: i64 },
    Clear,
}

impl OverflowStatus {
    #[must_use]
    pub const fn is_alert(&self) -> bool {
        matches!(self, Self::Alert { .. })
    }
}

impl fmt::Display for OverflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alert { overflow } => write!(
                f,
                "Already full: continued natural recovery will waste {overflow} stamina."
            ),
            Self::Projected { full_at, overflow } => write!(
                f,
                "Full at {full_at}; {overflow} naturally recovered stamina will be wasted before the new game day."
            ),
            Self::Clear => f.write_str("No overflow before the new game day."),
        }
    }
}

/// Every quantity derived from a [`StaminaState`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub minutes_since_midnight: i64,
    pub minutes_until_midnight: i64,
    pub hours_left: i64,
    pub minutes_left: i64,
    /// Regeneration obtainable before the reset, ignoring the cap.
    pub natural_recovery: i64,
    pub daily_recovery_max: i64,
    pub current: i64,
    pub max: i64,
    pub expected_at_midnight: i64,
    pub overflow: i64,
    pub missing_stamina: i64,
    pub minutes_to_full: i64,
    /// Part of `natural_recovery` usable before the cap is hit.
    pub remaining_recovery: i64,
    pub full_time: FullTime,
    pub bonuses: BonusBreakdown,
    /// Uncapped stamina reachable by the reset if nothing is spent.
    pub daily_total: i64,
    pub status: OverflowStatus,
}

impl Projection {
    #[must_use]
    pub const fn is_alert(&self) -> bool {
        self.status.is_alert()
    }

    /// One-line overflow summary for the display layer.
    #[must_use]
    pub fn summary(&self) -> String {
        self.status.to_string()
    }
}

/// Project regeneration, overflow, time-to-full, and the daily ceiling.
#[must_use]
pub fn project_stamina(state: &StaminaState) -> Projection {
    let minutes_since_midnight = parse_minutes(&state.current_time);
    let minutes_until_midnight = (MINUTES_PER_DAY - minutes_since_midnight).max(0);
    let natural_recovery = minutes_until_midnight / RECOVERY_INTERVAL_MINUTES;

    let current = non_negative(state.current_stamina);
    let max = non_negative(state.max_stamina);
    let expected_at_midnight = current.saturating_add(natural_recovery);
    let overflow = expected_at_midnight.saturating_sub(max).max(0);

    let bonuses = BonusBreakdown::from_state(state);
    let daily_total = current
        .saturating_add(natural_recovery)
        .saturating_add(bonuses.total());

    let missing_stamina = max.saturating_sub(current).max(0);
    let minutes_to_full = missing_stamina.saturating_mul(RECOVERY_INTERVAL_MINUTES);
    let remaining_recovery = natural_recovery.min(missing_stamina);

    let full_time = if missing_stamina == 0 {
        FullTime::AlreadyFull
    } else {
        let total = minutes_since_midnight.saturating_add(minutes_to_full);
        FullTime::At {
            time: format_minutes_to_time(total.rem_euclid(MINUTES_PER_DAY)),
            day_offset: total.div_euclid(MINUTES_PER_DAY),
        }
    };

    let status = if overflow == 0 {
        OverflowStatus::Clear
    } else if missing_stamina == 0 {
        OverflowStatus::Alert { overflow }
    } else {
        OverflowStatus::Projected {
            full_at: full_time.clone(),
            overflow,
        }
    };

    Projection {
        minutes_since_midnight,
        minutes_until_midnight,
        hours_left: minutes_until_midnight / MINUTES_PER_HOUR,
        minutes_left: minutes_until_midnight % MINUTES_PER_HOUR,
        natural_recovery,
        daily_recovery_max: DAILY_RECOVERY_MAX,
        current,
        max,
        expected_at_midnight,
        overflow,
        missing_stamina,
        minutes_to_full,
        remaining_recovery,
        full_time,
        bonuses,
        daily_total,
        status,
    }
}
