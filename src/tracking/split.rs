use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use clap::ValueEnum;
use tracing::trace;

use crate::utils::time::{next_day_start, next_hour_start, next_minute_start};

use super::entities::{Log, StartedLog};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[default]
    Day,
    Hour,
    Minute,
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Day => write!(f, "day"),
            TimeUnit::Hour => write!(f, "hour"),
            TimeUnit::Minute => write!(f, "minute"),
        }
    }
}

impl TimeUnit {
    /// First boundary of this unit strictly after `moment`, in the timezone of `moment`.
    pub fn next_boundary<Tz: TimeZone>(&self, moment: DateTime<Tz>) -> DateTime<Tz> {
        match self {
            TimeUnit::Day => next_day_start(moment),
            TimeUnit::Hour => next_hour_start(moment),
            TimeUnit::Minute => next_minute_start(moment),
        }
    }
}

/// Splits a log into pieces that each stay within a single `unit` of `timezone`. The pieces
/// are chronological and their durations add up to the duration of `log`.
///
/// A log that already fits into one unit is returned as is. That includes zero-length logs,
/// which come out as a single empty log.
pub fn split_log_by_time_unit<Tz: TimeZone>(log: Log, unit: TimeUnit, timezone: &Tz) -> Vec<Log> {
    let mut pieces = vec![];
    let mut rest = log;
    loop {
        let boundary = unit
            .next_boundary(rest.started_at.with_timezone(timezone))
            .with_timezone(&Utc);
        if boundary <= rest.started_at {
            break;
        }
        match rest.split_by(boundary) {
            (Some(before), Some(after)) => {
                trace!("Split {} at {boundary}", before.project_slug);
                pieces.push(before);
                rest = after;
            }
            (Some(whole), None) | (None, Some(whole)) => {
                pieces.push(whole);
                return pieces;
            }
            (None, None) => unreachable!(),
        }
    }
    pieces.push(rest);
    pieces
}

/// Closes a running timer at `now` and splits it by day.
pub fn started_log_to_logs<Tz: TimeZone>(
    started: &StartedLog,
    now: DateTime<Utc>,
    timezone: &Tz,
) -> Vec<Log> {
    split_log_by_time_unit(started.close(now), TimeUnit::Day, timezone)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::tracking::{aggregation::sum_logs, entities::Log};

    use super::{split_log_by_time_unit, TimeUnit};

    fn log(start: DateTime<Utc>, end: DateTime<Utc>) -> Log {
        Log {
            project_slug: "AO107".into(),
            activity_name: "Deploy".into(),
            started_at: start,
            ended_at: end,
        }
    }

    #[test]
    fn splits_at_midnight() {
        let original = log(
            Utc.with_ymd_and_hms(2024, 2, 6, 23, 50, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 7, 0, 10, 0).unwrap(),
        );
        let pieces = split_log_by_time_unit(original.clone(), TimeUnit::Day, &Utc);

        assert_eq!(
            pieces,
            vec![
                log(
                    Utc.with_ymd_and_hms(2024, 2, 6, 23, 50, 0).unwrap(),
                    Utc.with_ymd_and_hms(2024, 2, 7, 0, 0, 0).unwrap(),
                ),
                log(
                    Utc.with_ymd_and_hms(2024, 2, 7, 0, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2024, 2, 7, 0, 10, 0).unwrap(),
                ),
            ]
        );
        assert_eq!(sum_logs(&pieces), Duration::minutes(20));
    }

    #[test]
    fn multi_day_log_keeps_total_and_stays_in_days() {
        let original = log(
            Utc.with_ymd_and_hms(2024, 2, 6, 18, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 9, 6, 30, 0).unwrap(),
        );
        let pieces = split_log_by_time_unit(original.clone(), TimeUnit::Day, &Utc);

        assert_eq!(pieces.len(), 4);
        assert_eq!(sum_logs(&pieces), original.duration());
        for piece in &pieces {
            let last_moment = piece.ended_at - Duration::milliseconds(1);
            assert_eq!(piece.started_at.date_naive(), last_moment.date_naive());
        }
        for pair in pieces.windows(2) {
            assert_eq!(pair[0].ended_at, pair[1].started_at);
        }
    }

    #[test]
    fn log_within_one_day_is_unchanged() {
        let original = log(
            Utc.with_ymd_and_hms(2024, 2, 6, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 6, 17, 0, 0).unwrap(),
        );
        let pieces = split_log_by_time_unit(original.clone(), TimeUnit::Day, &Utc);
        assert_eq!(pieces, vec![original.clone()]);

        let again = split_log_by_time_unit(pieces[0].clone(), TimeUnit::Day, &Utc);
        assert_eq!(again, vec![original]);
    }

    #[test]
    fn log_ending_exactly_at_midnight_is_one_piece() {
        let original = log(
            Utc.with_ymd_and_hms(2024, 2, 6, 22, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 7, 0, 0, 0).unwrap(),
        );
        assert_eq!(
            split_log_by_time_unit(original.clone(), TimeUnit::Day, &Utc),
            vec![original]
        );
    }

    #[test]
    fn zero_length_log_yields_one_empty_log() {
        let moment = Utc.with_ymd_and_hms(2024, 2, 6, 12, 0, 0).unwrap();
        let pieces = split_log_by_time_unit(log(moment, moment), TimeUnit::Day, &Utc);
        assert_eq!(pieces, vec![log(moment, moment)]);
    }

    #[test]
    fn splits_by_hours_and_minutes() {
        let original = log(
            Utc.with_ymd_and_hms(2024, 2, 6, 9, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 6, 11, 15, 0).unwrap(),
        );
        let hours = split_log_by_time_unit(original.clone(), TimeUnit::Hour, &Utc);
        assert_eq!(
            hours.iter().map(Log::duration).collect::<Vec<_>>(),
            vec![
                Duration::minutes(30),
                Duration::minutes(60),
                Duration::minutes(15)
            ]
        );

        let short = log(
            Utc.with_ymd_and_hms(2024, 2, 6, 9, 30, 30).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 6, 9, 32, 10).unwrap(),
        );
        let minutes = split_log_by_time_unit(short, TimeUnit::Minute, &Utc);
        assert_eq!(minutes.len(), 3);
        assert_eq!(sum_logs(&minutes), Duration::seconds(100));
    }
}
