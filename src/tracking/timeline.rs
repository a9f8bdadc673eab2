//! Compressed text timelines. A window of time is cut into a fixed number of buckets and every
//! bucket is drawn with one of four glyphs depending on how much of it was logged.

use std::{fmt::Display, num::NonZeroU32};

use chrono::{DateTime, Duration, Utc};
use tracing::{instrument, trace};

use crate::utils::format::{format_duration, DurationStyle};

use super::entities::{Log, StartedLog};

/// Amount of glyphs in timelines printed by the cli.
pub const DEFAULT_TIMELINE_LENGTH: NonZeroU32 = match NonZeroU32::new(32) {
    Some(v) => v,
    None => unreachable!(),
};

/// Observed time range of a timeline. Can't end before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
}

impl Window {
    pub fn new_opt(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> Option<Self> {
        if started_at > ended_at {
            None
        } else {
            Some(Self {
                started_at,
                ended_at,
            })
        }
    }

    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    /// Width of a single bucket in whole minutes, at least 1. Buckets cover the window
    /// completely, so the last one may reach past `ended_at`.
    pub fn interval_minutes(&self, timeline_length: NonZeroU32) -> i64 {
        let bucket_span = i64::from(timeline_length.get()) * 60_000;
        let ms = self.duration().num_milliseconds();
        ((ms + bucket_span - 1) / bucket_span).max(1)
    }
}

/// Range spanning every log and running timer. Running timers extend the range up to `now`.
/// Returns [None] when there's nothing to span.
pub fn logs_window<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
    started_logs: impl IntoIterator<Item = &'a StartedLog>,
    now: DateTime<Utc>,
) -> Option<Window> {
    let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    let mut extend = |start: DateTime<Utc>, end: DateTime<Utc>| {
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(start), max.max(end)),
            None => (start, end),
        });
    };

    for log in logs {
        extend(log.started_at, log.ended_at);
    }
    for started in started_logs {
        extend(started.started_at, now);
    }

    bounds.and_then(|(start, end)| Window::new_opt(start, end))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Intensity {
    Empty,
    Low,
    Mid,
    Full,
}

impl Intensity {
    /// Classifies how much of a bucket of `width` was covered.
    pub fn classify(covered: Duration, width: Duration) -> Self {
        let covered = covered.num_milliseconds();
        let width = width.num_milliseconds();
        if covered <= 0 {
            Intensity::Empty
        } else if covered * 3 <= width {
            Intensity::Low
        } else if covered * 3 <= width * 2 {
            Intensity::Mid
        } else {
            Intensity::Full
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Intensity::Empty => '·',
            Intensity::Low => '░',
            Intensity::Mid => '▒',
            Intensity::Full => '█',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    interval_minutes: i64,
    buckets: Vec<Intensity>,
}

impl Timeline {
    pub fn interval_minutes(&self) -> i64 {
        self.interval_minutes
    }

    pub fn buckets(&self) -> &[Intensity] {
        &self.buckets
    }
}

impl Display for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bucket in &self.buckets {
            write!(f, "{}", bucket.glyph())?;
        }
        Ok(())
    }
}

/// Draws `logs` over `window` using `timeline_length` buckets.
///
/// Each log is chopped into bucket-wide chunks starting from its own start, and a chunk counts
/// towards the bucket its start falls into. Chunks starting outside of the window are ignored.
#[instrument(skip(logs))]
pub fn logs_timeline<'a>(
    window: &Window,
    timeline_length: NonZeroU32,
    logs: impl IntoIterator<Item = &'a Log>,
) -> Timeline {
    let interval_minutes = window.interval_minutes(timeline_length);
    let width = Duration::minutes(interval_minutes);
    let length = timeline_length.get() as usize;
    let mut covered = vec![Duration::zero(); length];

    for log in logs {
        let mut chunk_start = log.started_at;
        while chunk_start < log.ended_at {
            let size = width.min(log.ended_at - chunk_start);
            let offset = chunk_start - window.started_at;
            if offset >= Duration::zero() {
                let index = (offset.num_milliseconds() / width.num_milliseconds()) as usize;
                if let Some(bucket) = covered.get_mut(index) {
                    *bucket += size;
                }
            }
            chunk_start += size;
        }
    }
    trace!("Covered per bucket {covered:?}");

    Timeline {
        interval_minutes,
        buckets: covered
            .into_iter()
            .map(|v| Intensity::classify(v, width))
            .collect(),
    }
}

/// Caption explaining the glyphs of a timeline with buckets of `interval_minutes`.
pub fn legend(interval_minutes: i64) -> String {
    let width = Duration::minutes(interval_minutes);
    let third = width / 3;
    format!(
        "{} 0m  {} < {}  {} < {}  {} < {}",
        Intensity::Empty.glyph(),
        Intensity::Low.glyph(),
        format_duration(third, DurationStyle::Units),
        Intensity::Mid.glyph(),
        format_duration(third * 2, DurationStyle::Units),
        Intensity::Full.glyph(),
        format_duration(width, DurationStyle::Units),
    )
}
