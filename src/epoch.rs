//! Week / second of week helpers
use crate::prelude::{Duration, Epoch, TimeScale};

/// Seconds in one week
pub const SECONDS_PER_WEEK: f64 = 604_800.0;

/// Builds an [Epoch] from a week counter and a second of week,
/// expressed in given [TimeScale].
pub fn week_second(week: u32, seconds: f64, ts: TimeScale) -> Epoch {
    let nanos = (seconds * 1.0E9).round().max(0.0) as u64;
    Epoch::from_time_of_week(week, nanos, ts)
}

/// Decomposes this [Epoch] into (week, second of week) in given [TimeScale].
pub fn to_week_second(t: Epoch, ts: TimeScale) -> (u32, f64) {
    let (week, nanos) = t.to_time_scale(ts).to_time_of_week();
    (week, nanos as f64 * 1.0E-9)
}

/// Resolves a truncated week counter (`bits` wide) to the full week
/// number closest to `reference`.
pub fn resolve_week(truncated: u32, bits: u32, reference: u32) -> u32 {
    let modulo = 1_i64 << bits;
    let truncated = truncated as i64 % modulo;
    let reference = reference as i64;
    let mut week = reference - reference.rem_euclid(modulo) + truncated;
    if week - reference > modulo / 2 {
        week -= modulo;
    } else if reference - week > modulo / 2 {
        week += modulo;
    }
    week.max(0) as u32
}

/// Resolves a reference time, given as a second of week, to the [Epoch]
/// closest to `t`. Used for almanac and UTC reference times that
/// do not come with a week counter.
pub fn nearest_week_second(seconds: f64, t: Epoch, ts: TimeScale) -> Epoch {
    let (week, sow) = to_week_second(t, ts);
    let delta = seconds - sow;
    let week = if delta > SECONDS_PER_WEEK / 2.0 && week > 0 {
        week - 1
    } else if delta < -SECONDS_PER_WEEK / 2.0 {
        week + 1
    } else {
        week
    };
    week_second(week, seconds, ts)
}

/// Day of year (1 = January 1st) of this [Epoch], in UTC.
pub fn day_of_year(t: Epoch) -> u16 {
    t.to_time_scale(TimeScale::UTC).day_of_year().floor() as u16 + 1
}

/// Shortcut to express a number of hours as a [Duration]
pub(crate) fn hours(h: f64) -> Duration {
    Duration::from_seconds(h * 3600.0)
}
