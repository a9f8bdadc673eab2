//! `/track` lines, the format accepted by the project manager chat command.

use chrono::Local;

use crate::{
    tracking::{
        aggregation::sum_logs,
        entities::{Log, Project},
    },
    utils::{
        format::{format_duration, format_machine_hours, DurationStyle},
        time::date_to_string,
    },
};

use super::group_ordered;

/// One `/track` entry per day the project has logs on:
///
/// ```text
/// /track 2024-02-06 AO107 1.50 - Review (1h / x2)
/// - Deploy (30m / x1)
/// ```
pub fn project_tracks(project: &Project, logs: &[Log]) -> Vec<String> {
    let by_day = group_ordered(logs, |log| {
        date_to_string(log.started_at.with_timezone(&Local).date_naive())
    });

    by_day
        .into_iter()
        .map(|(date, day_logs)| {
            let activities = group_ordered(day_logs.iter().copied(), |log| {
                log.activity_name.clone()
            })
            .into_iter()
            .map(|(name, activity_logs)| {
                let total = sum_logs(activity_logs.iter().copied());
                format!(
                    "- {name} ({} / x{})",
                    format_duration(total, DurationStyle::Units),
                    activity_logs.len()
                )
            })
            .collect::<Vec<_>>();

            let hours = format_machine_hours(sum_logs(day_logs.iter().copied()));
            format!(
                "/track {date} {} {hours} {}",
                project.slug,
                activities.join("\n")
            )
        })
        .collect()
}
