//! Elapsed time sums over completed logs and running timers.

use chrono::{DateTime, Duration, Utc};

use super::entities::{Log, StartedLog};

/// Sum of durations of completed logs.
pub fn sum_logs<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Duration {
    logs.into_iter()
        .fold(Duration::zero(), |acc, log| acc + log.duration())
}

/// Total time of completed logs plus the time running timers have accumulated until `now`.
pub fn live_total<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
    started_logs: impl IntoIterator<Item = &'a StartedLog>,
    now: DateTime<Utc>,
) -> Duration {
    started_logs
        .into_iter()
        .fold(sum_logs(logs), |acc, started| acc + started.elapsed(now))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::tracking::entities::{Log, StartedLog};

    use super::{live_total, sum_logs};

    fn log(start_minute: i64, end_minute: i64) -> Log {
        let base = Utc.with_ymd_and_hms(2024, 2, 6, 9, 0, 0).unwrap();
        Log {
            project_slug: "AO107".into(),
            activity_name: "Coding".into(),
            started_at: base + Duration::minutes(start_minute),
            ended_at: base + Duration::minutes(end_minute),
        }
    }

    #[test]
    fn sum_without_running_timers_is_exact() {
        let logs = vec![log(0, 30), log(45, 60), log(120, 121)];
        let now = Utc::now();

        assert_eq!(sum_logs(&logs), Duration::minutes(46));
        assert_eq!(live_total(&logs, &[], now), Duration::minutes(46));
    }

    #[test]
    fn running_timers_count_until_now() {
        let logs = vec![log(0, 30)];
        let started = StartedLog {
            project_slug: "AO107".into(),
            activity_name: "Coding".into(),
            started_at: Utc.with_ymd_and_hms(2024, 2, 6, 10, 0, 0).unwrap(),
        };
        let now = Utc.with_ymd_and_hms(2024, 2, 6, 10, 15, 30).unwrap();

        assert_eq!(
            live_total(&logs, [&started], now),
            Duration::minutes(45) + Duration::seconds(30)
        );
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(live_total(&[], &[], Utc::now()), Duration::zero());
    }
}
