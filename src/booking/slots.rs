//! Time-range splitting into portal-legal slots
//!
//! The portal rejects bookings longer than two hours, so a long request is
//! submitted as several back-to-back chunks. Splitting is a pure greedy
//! left-to-right fill: every slot is `min(remaining, cap)` minutes, and the
//! slots partition the input range with no gaps or overlaps.

use chrono::{NaiveTime, Timelike};

/// Maximum length of a single booking the portal accepts, in minutes
pub const MAX_SLOT_MINUTES: i64 = 120;

/// Split `[start, end]` into ordered slots of at most `cap_minutes` each.
///
/// `start == end` yields an empty list; a range within the cap yields exactly
/// one slot equal to the input. The caller guarantees `start <= end`.
///
/// Arithmetic runs on minutes-from-midnight: `NaiveTime` addition wraps at
/// midnight, which would corrupt a slot ending near the top of the day.
pub fn split_slots(
    start: NaiveTime,
    end: NaiveTime,
    cap_minutes: i64,
) -> Vec<(NaiveTime, NaiveTime)> {
    let s = minutes_of_day(start);
    let e = minutes_of_day(end);

    let mut out = Vec::new();
    let mut cur = s;
    while cur < e {
        let next = std::cmp::min(cur + cap_minutes, e);
        out.push((time_of_minutes(cur), time_of_minutes(next)));
        cur = next;
    }
    out
}

fn minutes_of_day(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

fn time_of_minutes(m: i64) -> NaiveTime {
    NaiveTime::from_hms_opt((m / 60) as u32, (m % 60) as u32, 0)
        .expect("minutes-of-day stays within one day")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_three_hours_splits_into_two() {
        let slots = split_slots(t(19, 0), t(22, 0), MAX_SLOT_MINUTES);
        assert_eq!(slots, vec![(t(19, 0), t(21, 0)), (t(21, 0), t(22, 0))]);
    }

    #[test]
    fn test_empty_range_yields_no_slots() {
        assert!(split_slots(t(10, 0), t(10, 0), MAX_SLOT_MINUTES).is_empty());
    }

    #[test]
    fn test_range_within_cap_is_single_slot() {
        let slots = split_slots(t(10, 0), t(11, 30), MAX_SLOT_MINUTES);
        assert_eq!(slots, vec![(t(10, 0), t(11, 30))]);
    }

    #[test]
    fn test_exact_multiple_of_cap() {
        let slots = split_slots(t(8, 0), t(12, 0), MAX_SLOT_MINUTES);
        assert_eq!(slots, vec![(t(8, 0), t(10, 0)), (t(10, 0), t(12, 0))]);
    }

    #[test]
    fn test_no_midnight_wraparound_near_day_end() {
        // 22:30 + 120min would wrap to 00:30 under NaiveTime addition.
        let slots = split_slots(t(22, 30), t(23, 0), MAX_SLOT_MINUTES);
        assert_eq!(slots, vec![(t(22, 30), t(23, 0))]);
    }

    #[test]
    fn test_partition_property() {
        // Slots concatenate back to the input range: contiguous, no overlap,
        // each within the cap.
        for (s, e, cap) in [
            (t(6, 0), t(23, 0), 120),
            (t(9, 15), t(14, 5), 90),
            (t(19, 0), t(19, 1), 120),
            (t(7, 30), t(11, 30), 45),
        ] {
            let slots = split_slots(s, e, cap);
            let mut cursor = s;
            for (a, b) in &slots {
                assert_eq!(*a, cursor, "gap or overlap before {a}");
                assert!(*a < *b, "empty slot");
                assert!((*b - *a) <= Duration::minutes(cap));
                cursor = *b;
            }
            assert_eq!(cursor, e, "slots must end at the range end");
        }
    }

    #[test]
    fn test_custom_small_cap() {
        let slots = split_slots(t(10, 0), t(10, 50), 20);
        assert_eq!(
            slots,
            vec![
                (t(10, 0), t(10, 20)),
                (t(10, 20), t(10, 40)),
                (t(10, 40), t(10, 50)),
            ]
        );
    }
}
