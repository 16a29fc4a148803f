use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use roster_core::ports::{ManualClock, NoopEventSink};
use roster_core::{Credits, ProfileFields, Registry, RosterError, UserId};

fn fresh() -> (Registry, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let reg = Registry::builder()
        .clock(clock.clone())
        .event_sink(NoopEventSink)
        .build()
        .unwrap();
    (reg, clock)
}

fn fields_strategy() -> impl Strategy<Value = ProfileFields> {
    (".{0,12}", ".{0,12}", ".{0,12}", ".{0,6}", ".{0,24}").prop_map(
        |(nickname, avatar, website, locale, metadata)| ProfileFields {
            nickname,
            avatar,
            website,
            locale,
            metadata,
        },
    )
}

proptest! {
    #[test]
    fn last_update_wins_count_untouched(updates in prop::collection::vec(fields_strategy(), 1..8)) {
        let (mut reg, _) = fresh();
        let u = UserId::new("u");
        for f in &updates {
            reg.update(&u, &u, f.clone()).unwrap();
        }
        let p = reg.profile(&u).unwrap();
        prop_assert_eq!(&p.fields, updates.last().unwrap());
        prop_assert_eq!(p.count, Credits::ZERO);
    }

    #[test]
    fn cross_user_schedule_is_unauthorized(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        prop_assume!(a != b);
        let (mut reg, _) = fresh();
        let err = reg.schedule(&UserId::new(&a), &UserId::new(&b)).unwrap_err();
        let is_unauthorized = matches!(err, RosterError::Unauthorized { .. });
        prop_assert!(is_unauthorized);
    }

    #[test]
    fn task_is_due_exactly_at_delay(wait_secs in 0i64..30) {
        let (mut reg, clock) = fresh();
        let u = UserId::new("u");
        reg.schedule(&u, &u).unwrap();
        clock.advance(Duration::seconds(wait_secs));

        let result = reg.tick(&u);
        if wait_secs >= 10 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result.unwrap_err(), RosterError::NothingToDo);
        }
    }

    #[test]
    fn applied_at_most_once(steps in prop::collection::vec(0i64..8, 1..20)) {
        let (mut reg, clock) = fresh();
        let u = UserId::new("u");
        reg.schedule(&u, &u).unwrap();

        let mut successes = 0;
        for step in steps {
            clock.advance(Duration::seconds(step));
            if reg.tick(&UserId::new("keeper")).is_ok() {
                successes += 1;
            }
        }
        prop_assert!(successes <= 1);
        let expected = if successes == 1 { 100 } else { 0 };
        prop_assert_eq!(reg.profile(&u).unwrap().count, Credits::new(expected));
    }
}
