use std::io::Write;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::{
    tracking::{
        live::{run_live_total, LiveSnapshot, DEFAULT_TICK_FREQUENCY},
        service::Tracker,
        storage::StateStore,
    },
    utils::{
        format::{format_duration, format_machine_hours, DurationStyle},
        shutdown::detect_shutdown,
    },
};

/// `Total: 07:52:10 (7.87h)  Overtime: 00:00:00 (0.00h)`
pub fn format_snapshot(snapshot: &LiveSnapshot) -> String {
    let marker = if snapshot.overtime > chrono::Duration::zero() {
        "  (overtime!)"
    } else if snapshot.almost_done {
        "  (almost done)"
    } else {
        ""
    };
    format!(
        "Total: {} ({}h)  Overtime: {} ({}h){marker}",
        format_duration(snapshot.total, DurationStyle::Colon),
        format_machine_hours(snapshot.total),
        format_duration(snapshot.overtime, DurationStyle::Colon),
        format_machine_hours(snapshot.overtime),
    )
}

pub async fn process_status_command<S: StateStore>(
    tracker: &mut Tracker<S>,
    watch: bool,
) -> Result<()> {
    if let (Some(project), Some(started)) =
        (tracker.first_started_project()?, tracker.started_logs().first())
    {
        println!(
            "Running: {}, {} ({}) since {}",
            project.name,
            project.slug,
            started.activity_name,
            started
                .started_at
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S"),
        );
    }

    if watch && !tracker.selected_date_is_today() {
        println!("Only today's total can be watched");
    }
    if !watch || !tracker.selected_date_is_today() {
        let status = tracker.workday_status();
        println!(
            "{}",
            format_snapshot(&LiveSnapshot {
                total: status.total,
                overtime: status.overtime,
                almost_done: status.almost_done,
                running: tracker.has_started_logs(),
            })
        );
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let (_, result) = tokio::join!(detect_shutdown(shutdown.clone()), async {
        let result = run_live_total(tracker, shutdown.clone(), DEFAULT_TICK_FREQUENCY, |v| {
            print!("\r{}", format_snapshot(&v));
            let _ = std::io::stdout().flush();
        })
        .await;
        shutdown.cancel();
        result
    });
    println!();
    result
}
