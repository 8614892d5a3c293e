//! Centralized tuning constants for the stamina planner.
//!
//! These values mirror the in-game economy. Keeping them together ensures the
//! projection math can only change through reviewed code, not stored data.

// Clock -------------------------------------------------------------------
pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

// Natural regeneration ----------------------------------------------------
/// One stamina point regenerates every this many minutes.
pub const RECOVERY_INTERVAL_MINUTES: i64 = 5;
/// Upper bound on natural regeneration within a single game day.
pub const DAILY_RECOVERY_MAX: i64 = MINUTES_PER_DAY / RECOVERY_INTERVAL_MINUTES;

// Bonus sources -----------------------------------------------------------
pub const ACTIVITY_REWARD_AMOUNT: i64 = 100;
pub const MINI_PROGRAM_SIGN_IN_AMOUNT: i64 = 30;
pub const FRIEND_GIFT_COUNT: i64 = 30;
pub const FRIEND_GIFT_EACH: i64 = 5;
pub const FRIEND_GIFT_AMOUNT: i64 = FRIEND_GIFT_COUNT * FRIEND_GIFT_EACH;
pub const BUY_100_PACK_AMOUNT: i64 = 100;
pub const BUY_50_PACK_AMOUNT: i64 = 50;

// Defaults ----------------------------------------------------------------
pub const DEFAULT_CURRENT_TIME: &str = "12:00";
pub const DEFAULT_CURRENT_STAMINA: i64 = 0;
pub const DEFAULT_MAX_STAMINA: i64 = 120;
pub const DEFAULT_BUY_100_TIMES: i64 = 3;
pub const DEFAULT_BUY_50_TIMES: i64 = 4;
pub const DEFAULT_OTHER_STAMINA: i64 = 0;

// Persistence -------------------------------------------------------------
/// Fixed key under which the day's record is stored.
pub const STAMINA_STORAGE_KEY: &str = "thunder-fighter-stamina";
