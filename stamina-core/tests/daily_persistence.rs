use chrono::{NaiveDate, NaiveDateTime};
use stamina_core::constants::STAMINA_STORAGE_KEY;
use stamina_core::{
    DailyStore, FixedClock, FreshReason, KeyValueStore, LoadOutcome, ManualClock, MemoryStore,
    StaminaEdit, StaminaSession, StaminaState, StoredRecord, estimate_current_stamina,
    parse_stored_record,
};

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid instant")
}

fn seeded(record: &StoredRecord) -> MemoryStore {
    MemoryStore::with_entry(
        STAMINA_STORAGE_KEY,
        &serde_json::to_string(record).expect("record serializes"),
    )
}

fn read_back(store: &MemoryStore) -> StoredRecord {
    let raw = store
        .get(STAMINA_STORAGE_KEY)
        .expect("memory store is infallible")
        .expect("record present");
    parse_stored_record(&raw).expect("record parses")
}

#[test]
fn stale_record_is_replaced_with_todays_defaults() {
    let store = seeded(&StoredRecord::new(
        "2026-10-17",
        &StaminaState::fresh("21:00").with(StaminaEdit::ActivityReward(true)),
    ));
    let session = StaminaSession::open(store.clone(), FixedClock(at(18, 8, 20))).unwrap();
    assert!(matches!(
        session.outcome(),
        LoadOutcome::Fresh(FreshReason::Stale { .. })
    ));
    assert_eq!(session.state(), &StaminaState::fresh("08:20"));

    let record = read_back(&store);
    assert_eq!(record.date_key, "2026-10-18");
    assert_eq!(record.last_time.as_deref(), Some("08:20"));
    assert_eq!(record.state.activity_reward, Some(false));
}

#[test]
fn same_day_record_resumes_with_regenerated_stamina() {
    let state = StaminaState::fresh("10:00")
        .with(StaminaEdit::CurrentStamina(50.0))
        .with(StaminaEdit::MaxStamina(100.0));
    let store = seeded(&StoredRecord::new("2026-10-18", &state));
    let session = StaminaSession::open(store, FixedClock(at(18, 10, 30))).unwrap();
    assert_eq!(session.outcome(), &LoadOutcome::Resumed { recovered: 6 });
    assert_eq!(session.state().current_stamina, 56);
    assert_eq!(session.state().max_stamina, 100);
    assert_eq!(session.state().current_time, "10:30");
}

#[test]
fn re_estimation_never_exceeds_the_cap() {
    for stored_current in [0, 40, 99, 100, 150, 10_000] {
        for stored_max in [0, 1, 100, 240] {
            let state = StaminaState {
                current_stamina: stored_current,
                max_stamina: stored_max,
                ..StaminaState::fresh("00:10")
            };
            let record = StoredRecord::new("2026-10-18", &state);
            for hour in [0, 3, 12, 23] {
                let estimate = estimate_current_stamina(&record, at(18, hour, 59));
                assert!(estimate <= stored_max);
                assert!(estimate >= 0);
            }
        }
    }
}

#[test]
fn session_day_lifecycle_round_trips_through_storage() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(at(18, 7, 0));
    let mut session = StaminaSession::from_daily(
        DailyStore::with_key(store.clone(), "planner"),
        clock.clone(),
    )
    .unwrap();
    session
        .apply_all([
            StaminaEdit::CurrentStamina(20.0),
            StaminaEdit::MiniProgramSignIn(true),
            StaminaEdit::OtherStamina(-40.0),
        ])
        .unwrap();
    drop(session);

    clock.advance_minutes(60);
    let mut session = StaminaSession::from_daily(
        DailyStore::with_key(store.clone(), "planner"),
        clock.clone(),
    )
    .unwrap();
    assert_eq!(session.state().current_stamina, 32);
    assert!(session.state().mini_program_sign_in);
    assert_eq!(session.state().other_stamina, -40);

    clock.set(at(19, 0, 0));
    session.reset_for_new_day().unwrap();
    assert_eq!(session.state(), &StaminaState::fresh("00:00"));
    let raw = store.get("planner").unwrap().unwrap();
    assert_eq!(parse_stored_record(&raw).unwrap().date_key, "2026-10-19");
    assert!(store.get(STAMINA_STORAGE_KEY).unwrap().is_none());
}
