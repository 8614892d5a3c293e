use stamina_core::constants::MINUTES_PER_DAY;
use stamina_core::{
    FullTime, OverflowStatus, StaminaEdit, StaminaState, format_minutes_to_time, parse_minutes,
    project_stamina,
};

fn snapshot(minutes: i64, current: i64, max: i64) -> StaminaState {
    StaminaState {
        current_stamina: current,
        max_stamina: max,
        ..StaminaState::fresh(format_minutes_to_time(minutes))
    }
}

#[test]
fn acceptance_scenarios_hold() {
    let late =
        project_stamina(&StaminaState::fresh("23:55").with(StaminaEdit::CurrentStamina(100.0)));
    assert_eq!(late.minutes_until_midnight, 5);
    assert_eq!(late.natural_recovery, 1);
    assert_eq!(late.expected_at_midnight, 101);
    assert_eq!(late.overflow, 0);

    let full =
        project_stamina(&StaminaState::fresh("00:00").with(StaminaEdit::CurrentStamina(120.0)));
    assert_eq!(full.minutes_until_midnight, 1440);
    assert_eq!(full.natural_recovery, 288);
    assert_eq!(full.expected_at_midnight, 408);
    assert_eq!(full.overflow, 288);
    assert_eq!(full.missing_stamina, 0);
    assert_eq!(full.status, OverflowStatus::Alert { overflow: 288 });

    let noon = project_stamina(&StaminaState::fresh("12:00"));
    assert_eq!(noon.natural_recovery, 144);
    assert_eq!(noon.bonuses.total(), 500);
    assert_eq!(noon.daily_total, 644);
}

#[test]
fn usable_recovery_is_bounded_by_recovery_and_room() {
    for minutes in (0..=MINUTES_PER_DAY).step_by(7) {
        for max in [0, 1, 60, 120, 300] {
            for current in (0..=max).step_by(13) {
                let projection = project_stamina(&snapshot(minutes, current, max));
                assert!(projection.remaining_recovery <= projection.natural_recovery);
                assert!(projection.remaining_recovery <= projection.missing_stamina);
            }
        }
    }
}

#[test]
fn overflow_and_alert_follow_the_cap() {
    for minutes in (0..=MINUTES_PER_DAY).step_by(11) {
        for (current, max) in [(0, 120), (100, 120), (120, 120), (200, 120), (5, 0)] {
            let projection = project_stamina(&snapshot(minutes, current, max));
            assert_eq!(
                projection.overflow > 0,
                projection.expected_at_midnight > projection.max
            );
            if projection.is_alert() {
                assert!(projection.overflow > 0);
                assert_eq!(projection.missing_stamina, 0);
                assert_eq!(projection.full_time, FullTime::AlreadyFull);
            }
            if projection.overflow > 0 && projection.missing_stamina > 0 {
                assert!(matches!(
                    projection.status,
                    OverflowStatus::Projected { .. }
                ));
            }
        }
    }
}

#[test]
fn projection_is_pure() {
    let state = StaminaState::fresh("17:23")
        .with(StaminaEdit::CurrentStamina(64.0))
        .with(StaminaEdit::FriendGift(true))
        .with(StaminaEdit::OtherStamina(-35.0));
    let before = state.clone();
    assert_eq!(project_stamina(&state), project_stamina(&state));
    assert_eq!(state, before);
}

#[test]
fn fill_time_stays_on_the_clock_face() {
    for minutes in (0..=MINUTES_PER_DAY).step_by(17) {
        let projection = project_stamina(&snapshot(minutes, 0, 500));
        let FullTime::At { time, day_offset } = &projection.full_time else {
            panic!("empty bar cannot be full");
        };
        assert!(parse_minutes(time) < MINUTES_PER_DAY);
        let total = projection.minutes_since_midnight + projection.minutes_to_full;
        assert_eq!(*day_offset, total / MINUTES_PER_DAY);
    }
}
