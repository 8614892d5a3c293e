//! Stamina Planner Engine
//!
//! Platform-agnostic core logic for tracking a mobile-game stamina bar: natural
//! regeneration until the daily reset, bonus sources claimed today, overflow
//! that the cap would waste, and the theoretical daily maximum. Storage and
//! display are left to the host through the [`KeyValueStore`] seam and the
//! plain data returned by [`project_stamina`].

pub mod clock;
pub mod constants;
pub mod numbers;
pub mod persistence;
pub mod projection;
#[cfg(feature = "async")]
pub mod reset_timer;
pub mod session;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use clock::{
    Clock, FixedClock, ManualClock, SystemClock, date_key, format_minutes_to_time, format_time,
    parse_local_instant, parse_minutes, until_next_midnight,
};
pub use numbers::{to_int, to_positive_int};
pub use persistence::{
    DailyStore, FreshReason, LoadOutcome, Restored, StoredRecord, StoredState,
    estimate_current_stamina, parse_stored_record, reconcile,
};
pub use projection::{BonusBreakdown, FullTime, OverflowStatus, Projection, project_stamina};
#[cfg(feature = "async")]
pub use reset_timer::MidnightReset;
pub use session::StaminaSession;
pub use state::{StaminaEdit, StaminaState};
pub use storage::{KeyValueStore, MemoryStore};
