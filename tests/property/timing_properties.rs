// Property-based tests for the countdown time arithmetic

use proptest::prelude::*;
use rust_countdown::services::countdown::timing::{
    compute_progress, decompose, DAY_MS, HOUR_MS, MINUTE_MS, SECOND_MS,
};

proptest! {
    /// Property: the unit breakdown never overshoots and is short by less
    /// than one second
    #[test]
    fn prop_decomposition_brackets_time_left(time_left in 0i64..(5_000 * DAY_MS)) {
        let units = decompose(time_left);
        let floor = units.days * DAY_MS
            + units.hours * HOUR_MS
            + units.minutes * MINUTE_MS
            + units.seconds * SECOND_MS;

        prop_assert!(floor <= time_left);
        prop_assert!(time_left < floor + SECOND_MS);
        prop_assert!((0..24).contains(&units.hours));
        prop_assert!((0..60).contains(&units.minutes));
        prop_assert!((0..60).contains(&units.seconds));
    }

    /// Property: total progress is clamped and grows with elapsed time
    #[test]
    fn prop_total_progress_monotonic(
        total in 1i64..(30 * DAY_MS),
        first in -DAY_MS..(31 * DAY_MS),
        step in 0i64..DAY_MS,
    ) {
        let earlier = compute_progress(first, total, &decompose(total - first));
        let later = compute_progress(first + step, total, &decompose(total - first - step));

        prop_assert!((0.0..=1.0).contains(&earlier.total));
        prop_assert!((0.0..=1.0).contains(&later.total));
        prop_assert!(later.total >= earlier.total);
    }

    /// Property: per-unit ratios for hours, minutes and seconds stay below one
    #[test]
    fn prop_unit_ratios_below_one(time_left in 0i64..(400 * DAY_MS)) {
        let progress = compute_progress(0, time_left.max(1), &decompose(time_left));
        prop_assert!(progress.hours < 1.0);
        prop_assert!(progress.minutes < 1.0);
        prop_assert!(progress.seconds < 1.0);
    }
}
