use std::num::NonZeroU32;

use anyhow::Result;
use clap::Parser;

use crate::tracking::{
    service::Tracker,
    storage::StateStore,
    timeline::{legend, logs_timeline, DEFAULT_TIMELINE_LENGTH},
};

use super::output::format_logs;

#[derive(Debug, Parser)]
pub struct TimelineCommand {
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_TIMELINE_LENGTH,
        help = "Amount of intervals the day is split into"
    )]
    length: NonZeroU32,
    #[arg(long, help = "Skip the list of logs after the legend")]
    no_logs: bool,
}

/// Command to process `timeline` command. Prints one timeline per project that has logs on the
/// selected day, a legend, and the list of the day's logs.
pub async fn process_timeline_command<S: StateStore>(
    tracker: &Tracker<S>,
    TimelineCommand { length, no_logs }: TimelineCommand,
) -> Result<()> {
    match render_timelines(tracker, length, !no_logs) {
        Some(text) => println!("{text}"),
        None => println!("No logs"),
    }
    Ok(())
}

pub fn render_timelines<S: StateStore>(
    tracker: &Tracker<S>,
    length: NonZeroU32,
    with_logs: bool,
) -> Option<String> {
    let window = tracker.logs_window()?;
    let interval_minutes = window.interval_minutes(length);

    let timelines = tracker
        .projects()
        .iter()
        .filter_map(|project| {
            let logs = tracker.project_track_logs(&project.slug);
            if logs.is_empty() {
                return None;
            }
            Some(format!(
                "{} {} ({})",
                logs_timeline(&window, length, &logs),
                project.name,
                project.slug
            ))
        })
        .collect::<Vec<_>>();

    let mut sections = vec![
        timelines.join("\n"),
        format!("{}\n", legend(interval_minutes)),
    ];
    if with_logs {
        sections.push(format_logs(tracker.logs()));
    }
    Some(sections.join("\n"))
}

/// Activities of a single project followed by its timeline over the window of the whole day:
///
/// ```text
/// - Review
/// - Deploy
///
/// ██▒·
/// · 0m  ░ < 5m  ▒ < 10m  █ < 15m
/// ```
///
/// Activities named like the project itself are left out.
pub fn render_project_log<S: StateStore>(
    tracker: &Tracker<S>,
    slug: &str,
    length: NonZeroU32,
) -> Result<Option<String>> {
    let project = tracker.project_by_slug(slug)?;
    let Some(window) = tracker.logs_window() else {
        return Ok(None);
    };
    let logs = tracker.project_track_logs(slug);

    let mut activities: Vec<&str> = vec![];
    for log in &logs {
        let name = &*log.activity_name;
        if name != project.name && !activities.contains(&name) {
            activities.push(name);
        }
    }

    Ok(Some(
        [
            activities
                .iter()
                .map(|v| format!("- {v}"))
                .collect::<Vec<_>>()
                .join("\n"),
            String::new(),
            logs_timeline(&window, length, &logs).to_string(),
            legend(window.interval_minutes(length)),
        ]
        .join("\n"),
    ))
}
