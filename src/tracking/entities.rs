use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use std::sync::Arc;

/// A closed time range `[started_at, ended_at)`.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Interval {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl Interval {
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }
}

/// A completed stretch of work on a project. Logs are never edited after creation, they are
/// only added or removed as a whole.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub project_slug: Arc<str>,
    pub activity_name: Arc<str>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ended_at: DateTime<Utc>,
}

impl Log {
    pub fn interval(&self) -> Interval {
        Interval {
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    pub fn duration(&self) -> Duration {
        self.interval().duration()
    }

    /// Splits a log into 2 halves, 1 before split, 1 after.
    pub fn split_by(self, split: DateTime<Utc>) -> (Option<Log>, Option<Log>) {
        if split <= self.started_at {
            (None, Some(self))
        } else if split >= self.ended_at {
            (Some(self), None)
        } else {
            let before = Log {
                project_slug: self.project_slug.clone(),
                activity_name: self.activity_name.clone(),
                started_at: self.started_at,
                ended_at: split,
            };
            let after = Log {
                started_at: split,
                ..self
            };
            (Some(before), Some(after))
        }
    }
}

/// The running timer. It becomes one or more [Log]s once stopped.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StartedLog {
    pub project_slug: Arc<str>,
    pub activity_name: Arc<str>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
}

impl StartedLog {
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        now - self.started_at
    }

    /// Closes the timer at `ended_at` without any day splitting.
    pub fn close(&self, ended_at: DateTime<Utc>) -> Log {
        Log {
            project_slug: self.project_slug.clone(),
            activity_name: self.activity_name.clone(),
            started_at: self.started_at,
            ended_at,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Project {
    pub name: String,
    pub slug: String,
}

impl Project {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// Recently used activity name of a project.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub project_slug: Arc<str>,
    pub name: Arc<str>,
}
