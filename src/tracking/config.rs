use chrono::Duration;

/// Tunables of [Tracker](super::service::Tracker).
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Logs that started before the beginning of the day this many days ago are dropped.
    pub retention_days: u32,
    /// How many recently used activities are remembered across all projects.
    pub activities_limit: usize,
    /// Length of a work day. Everything above it is reported as overtime.
    pub workday: Duration,
    /// How long before the end of the work day the status starts warning.
    pub workday_warning: Duration,
}

pub const DEFAULT_RETENTION_DAYS: u32 = 30;

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            activities_limit: 100,
            workday: Duration::hours(8),
            workday_warning: Duration::minutes(10),
        }
    }
}

impl TrackerConfig {
    pub fn with_retention_days(self, retention_days: u32) -> Self {
        Self {
            retention_days,
            ..self
        }
    }
}
