pub mod import;
pub mod tracks;

use chrono::Local;

use crate::{
    tracking::entities::Log,
    utils::format::{format_duration, DurationStyle},
};

pub struct LogTextParts {
    pub timestamp: String,
    pub name: String,
    pub duration: String,
}

pub fn log_to_text_parts(log: &Log) -> LogTextParts {
    let start = log.started_at.with_timezone(&Local).format("%H:%M:%S");
    let end = log.ended_at.with_timezone(&Local).format("%H:%M:%S");
    LogTextParts {
        timestamp: format!("{start} - {end}"),
        name: format!("{}, {}", log.activity_name, log.project_slug),
        duration: format_duration(log.duration(), DurationStyle::Units),
    }
}

/// `(09:00:00 - 09:30:00) Review, AO107 [30m]`
pub fn format_log_line(log: &Log) -> String {
    let LogTextParts {
        timestamp,
        name,
        duration,
    } = log_to_text_parts(log);
    format!("({timestamp}) {name} [{duration}]")
}

pub fn format_logs<'a>(logs: impl IntoIterator<Item = &'a Log>) -> String {
    logs.into_iter()
        .map(format_log_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Groups values by key keeping the order in which keys first appeared.
pub(crate) fn group_ordered<K: PartialEq, T>(
    values: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
) -> Vec<(K, Vec<T>)> {
    let mut groups: Vec<(K, Vec<T>)> = vec![];
    for value in values {
        let value_key = key(&value);
        match groups.iter_mut().find(|(k, _)| *k == value_key) {
            Some((_, group)) => group.push(value),
            None => groups.push((value_key, vec![value])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use crate::tracking::entities::Log;

    use super::{format_log_line, group_ordered};

    #[test]
    fn log_line() {
        let log = Log {
            project_slug: "AO107".into(),
            activity_name: "Review".into(),
            started_at: Local.with_ymd_and_hms(2024, 2, 6, 9, 0, 0).unwrap().to_utc(),
            ended_at: Local.with_ymd_and_hms(2024, 2, 6, 10, 30, 5).unwrap().to_utc(),
        };
        assert_eq!(
            format_log_line(&log),
            "(09:00:00 - 10:30:05) Review, AO107 [1h 30m 5s]"
        );
    }

    #[test]
    fn grouping_keeps_first_appearance_order() {
        let groups = group_ordered(["b1", "a1", "b2", "c1", "a2"], |v| v.chars().next());
        assert_eq!(
            groups,
            vec![
                (Some('b'), vec!["b1", "b2"]),
                (Some('a'), vec!["a1", "a2"]),
                (Some('c'), vec!["c1"]),
            ]
        );
    }
}
