use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::{service::Tracker, storage::StateStore};

pub const DEFAULT_TICK_FREQUENCY: StdDuration = StdDuration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSnapshot {
    pub total: Duration,
    pub overtime: Duration,
    pub almost_done: bool,
    pub running: bool,
}

/// Recomputes the total of the selected date every `frequency` and hands it to `on_tick`.
/// State is reloaded on every tick, so timers stopped by another process are picked up.
///
/// Returns after the first tick that sees no running timer, or once `shutdown` is cancelled.
#[instrument(skip_all)]
pub async fn run_live_total<S: StateStore>(
    tracker: &mut Tracker<S>,
    shutdown: CancellationToken,
    frequency: StdDuration,
    mut on_tick: impl FnMut(LiveSnapshot),
) -> Result<()> {
    let mut tick_point = tracker.clock().instant();
    loop {
        tick_point += frequency;

        tracker.reload().await?;
        let status = tracker.workday_status();
        let snapshot = LiveSnapshot {
            total: status.total,
            overtime: status.overtime,
            almost_done: status.almost_done,
            running: tracker.has_started_logs(),
        };
        on_tick(snapshot);

        if !snapshot.running {
            debug!("Nothing is running, stopping live total");
            return Ok(());
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                return Ok(())
            }
            _ = tracker.clock().sleep_until(tick_point) => ()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration as StdDuration};

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::{
        tracking::{
            config::TrackerConfig,
            entities::Project,
            service::Tracker,
            storage::MemoryStore,
        },
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    use super::{run_live_total, LiveSnapshot};

    /// Wall clock that moves together with tokio's (paused) time.
    struct TestClock {
        start_time: DateTime<Utc>,
        reference: Instant,
    }

    #[async_trait]
    impl Clock for TestClock {
        fn time(&self) -> DateTime<Utc> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep_until(&self, instant: Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    async fn tracker() -> Result<Tracker<Arc<MemoryStore>>> {
        *TEST_LOGGING;
        let clock = TestClock {
            start_time: Utc.with_ymd_and_hms(2024, 2, 6, 9, 0, 0).unwrap(),
            reference: Instant::now(),
        };
        let mut tracker = Tracker::load(
            Arc::new(MemoryStore::default()),
            Box::new(clock),
            TrackerConfig::default(),
        )
        .await?;
        tracker
            .add_project(Project::new("Advisor Online", "AO107"))
            .await?;
        Ok(tracker)
    }

    #[tokio::test(start_paused = true)]
    async fn stops_right_away_without_running_timer() -> Result<()> {
        let mut tracker = tracker().await?;
        let mut ticks = vec![];

        run_live_total(
            &mut tracker,
            CancellationToken::new(),
            StdDuration::from_secs(1),
            |snapshot| ticks.push(snapshot),
        )
        .await?;

        assert_eq!(
            ticks,
            vec![LiveSnapshot {
                total: Duration::zero(),
                overtime: Duration::zero(),
                almost_done: false,
                running: false,
            }]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_every_second_until_cancelled() -> Result<()> {
        let mut tracker = tracker().await?;
        tracker.start_activity("AO107", None).await?;

        let shutdown = CancellationToken::new();
        let canceller = shutdown.clone();
        let mut totals = vec![];

        run_live_total(
            &mut tracker,
            shutdown,
            StdDuration::from_secs(1),
            |snapshot| {
                totals.push(snapshot.total.num_seconds());
                if totals.len() == 4 {
                    canceller.cancel();
                }
            },
        )
        .await?;

        assert_eq!(totals, vec![0, 1, 2, 3]);
        Ok(())
    }
}
