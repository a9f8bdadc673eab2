use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use crate::utils::{
    clock::Clock,
    time::{local_day_range, start_of_day_days_ago},
};

use super::{
    aggregation,
    config::TrackerConfig,
    entities::{Activity, Log, Project, StartedLog},
    split::started_log_to_logs,
    storage::{
        load_collection, save_collection, StateStore, ACTIVITIES_KEY, LOGS_KEY, PROJECTS_KEY,
        STARTED_LOGS_KEY,
    },
    timeline::{logs_window, Window},
};

/// Totals of the selected day measured against the configured work day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkdayStatus {
    pub total: Duration,
    pub overtime: Duration,
    /// The work day ends in less than the configured warning time.
    pub almost_done: bool,
}

/// Owner of every tracked collection. All mutations go through here and are written back to the
/// store right away, one whole collection at a time.
///
/// Queries about logs are limited to the selected date, which is today unless
/// [Tracker::set_selected_date] says otherwise. Running timers are always visible.
pub struct Tracker<S: StateStore> {
    store: S,
    clock: Box<dyn Clock>,
    config: TrackerConfig,
    selected_date: NaiveDate,
    projects: Vec<Project>,
    logs: Vec<Log>,
    started_logs: Vec<StartedLog>,
    activities: Vec<Activity>,
}

impl<S: StateStore> Tracker<S> {
    pub async fn load(store: S, clock: Box<dyn Clock>, config: TrackerConfig) -> Result<Self> {
        let selected_date = clock.time().with_timezone(&Local).date_naive();
        let mut tracker = Self {
            store,
            clock,
            config,
            selected_date,
            projects: vec![],
            logs: vec![],
            started_logs: vec![],
            activities: vec![],
        };
        tracker.reload().await?;
        Ok(tracker)
    }

    /// Replaces in-memory state with whatever the store holds now.
    pub async fn reload(&mut self) -> Result<()> {
        let (projects, logs, started_logs, activities) = futures::try_join!(
            load_collection(&self.store, PROJECTS_KEY),
            load_collection(&self.store, LOGS_KEY),
            load_collection(&self.store, STARTED_LOGS_KEY),
            load_collection(&self.store, ACTIVITIES_KEY),
        )?;
        self.projects = projects;
        self.logs = logs;
        self.started_logs = started_logs;
        self.activities = activities;
        debug!(
            "Loaded {} projects, {} logs, {} running",
            self.projects.len(),
            self.logs.len(),
            self.started_logs.len()
        );
        Ok(())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn set_selected_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    pub fn selected_date_is_today(&self) -> bool {
        self.selected_date == self.now().with_timezone(&Local).date_naive()
    }

    fn is_on_selected_date(&self, log: &Log) -> bool {
        let (start, end) = local_day_range(self.selected_date);
        log.started_at >= start && log.started_at < end
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Logs of the selected date.
    pub fn logs(&self) -> Vec<&Log> {
        self.logs
            .iter()
            .filter(|log| self.is_on_selected_date(log))
            .collect()
    }

    /// Every stored log regardless of the selected date.
    pub fn all_logs(&self) -> &[Log] {
        &self.logs
    }

    pub fn started_logs(&self) -> &[StartedLog] {
        &self.started_logs
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn has_started_logs(&self) -> bool {
        !self.started_logs.is_empty()
    }

    pub fn project_by_slug(&self, slug: &str) -> Result<&Project> {
        match self.projects.iter().find(|p| p.slug == slug) {
            Some(project) => Ok(project),
            None => bail!("Project not found: {slug}"),
        }
    }

    pub fn project_logs(&self, slug: &str) -> Vec<&Log> {
        self.logs()
            .into_iter()
            .filter(|log| &*log.project_slug == slug)
            .collect()
    }

    pub fn project_started_logs(&self, slug: &str) -> Vec<&StartedLog> {
        self.started_logs
            .iter()
            .filter(|log| &*log.project_slug == slug)
            .collect()
    }

    pub fn project_activities(&self, slug: &str) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|activity| &*activity.project_slug == slug)
            .collect()
    }

    /// Project of the running timer, if any.
    pub fn first_started_project(&self) -> Result<Option<&Project>> {
        self.started_logs
            .first()
            .map(|started| self.project_by_slug(&started.project_slug))
            .transpose()
    }

    /// Name of what the project is doing right now, or did last on the selected date.
    pub fn current_activity_name(&self, slug: &str) -> Option<Arc<str>> {
        self.project_started_logs(slug)
            .last()
            .map(|v| v.activity_name.clone())
            .or_else(|| {
                self.project_logs(slug)
                    .last()
                    .map(|v| v.activity_name.clone())
            })
    }

    fn last_activity_name(&self, slug: &str) -> Option<Arc<str>> {
        self.project_activities(slug)
            .last()
            .map(|activity| activity.name.clone())
    }

    /// Logs of the selected date with running timers closed at the current moment.
    pub fn project_track_logs(&self, slug: &str) -> Vec<Log> {
        let now = self.now();
        self.project_logs(slug)
            .into_iter()
            .cloned()
            .chain(
                self.project_started_logs(slug)
                    .into_iter()
                    .flat_map(|started| started_log_to_logs(started, now, &Local)),
            )
            .collect()
    }

    pub fn live_total(&self) -> Duration {
        aggregation::live_total(self.logs(), &self.started_logs, self.now())
    }

    pub fn project_live_total(&self, slug: &str) -> Duration {
        aggregation::live_total(
            self.project_logs(slug),
            self.project_started_logs(slug),
            self.now(),
        )
    }

    pub fn workday_status(&self) -> WorkdayStatus {
        let total = self.live_total();
        WorkdayStatus {
            total,
            overtime: (total - self.config.workday).max(Duration::zero()),
            almost_done: total > self.config.workday - self.config.workday_warning,
        }
    }

    /// Range covered by the selected date's logs and the running timers.
    pub fn logs_window(&self) -> Option<Window> {
        logs_window(self.logs(), &self.started_logs, self.now())
    }

    /// Adds a project unless its name or slug is empty or the slug is taken.
    #[instrument(skip(self))]
    pub async fn add_project(&mut self, project: Project) -> Result<bool> {
        if project.name.trim().is_empty() || project.slug.trim().is_empty() {
            return Ok(false);
        }
        if self.projects.iter().any(|p| p.slug == project.slug) {
            debug!("Project {} already exists", project.slug);
            return Ok(false);
        }
        self.projects.push(project);
        self.persist_projects().await?;
        Ok(true)
    }

    /// Adds projects whose slugs aren't known yet. Returns how many were added.
    #[instrument(skip_all)]
    pub async fn import_projects(&mut self, to_import: Vec<Project>) -> Result<usize> {
        let mut added = 0;
        for project in to_import {
            if project.name.is_empty() || project.slug.is_empty() {
                continue;
            }
            if self.projects.iter().any(|p| p.slug == project.slug) {
                continue;
            }
            self.projects.push(project);
            added += 1;
        }
        if added > 0 {
            self.persist_projects().await?;
        }
        info!("Imported {added} projects");
        Ok(added)
    }

    /// Removes the project together with all of its logs and its running timer.
    #[instrument(skip(self))]
    pub async fn remove_project(&mut self, slug: &str) -> Result<()> {
        self.project_by_slug(slug)?;
        self.projects.retain(|p| p.slug != slug);
        self.started_logs.retain(|l| &*l.project_slug != slug);
        self.logs.retain(|l| &*l.project_slug != slug);
        self.persist_logs().await?;
        self.persist_projects().await?;
        self.persist_started_logs().await?;
        Ok(())
    }

    /// Removes the project's logs of the selected date and its running timer.
    #[instrument(skip(self))]
    pub async fn reset_project(&mut self, slug: &str) -> Result<()> {
        self.project_by_slug(slug)?;
        let (start, end) = local_day_range(self.selected_date);
        self.logs.retain(|l| {
            !(&*l.project_slug == slug && l.started_at >= start && l.started_at < end)
        });
        self.started_logs.retain(|l| &*l.project_slug != slug);
        self.persist_logs().await?;
        self.persist_started_logs().await?;
        Ok(())
    }

    /// Moves the projects named in `slugs` to the front in that order. Projects that aren't
    /// named keep their relative order after them, unknown slugs are skipped.
    #[instrument(skip(self))]
    pub async fn sort_projects(&mut self, slugs: &[String]) -> Result<()> {
        let mut sorted: Vec<Project> = Vec::with_capacity(self.projects.len());
        for slug in slugs {
            if sorted.iter().any(|p| &p.slug == slug) {
                continue;
            }
            match self.projects.iter().find(|p| &p.slug == slug) {
                Some(project) => sorted.push(project.clone()),
                None => warn!("Skipping unknown project {slug} while sorting"),
            }
        }
        let rest = self
            .projects
            .iter()
            .filter(|p| !sorted.iter().any(|v| v.slug == p.slug))
            .cloned()
            .collect::<Vec<_>>();
        sorted.extend(rest);
        self.projects = sorted;
        self.persist_projects().await
    }

    pub async fn remove_log(&mut self, log: &Log) -> Result<bool> {
        let Some(position) = self.logs.iter().position(|l| l == log) else {
            return Ok(false);
        };
        self.logs.remove(position);
        self.persist_logs().await?;
        Ok(true)
    }

    pub async fn remove_all_logs(&mut self) -> Result<()> {
        self.logs.clear();
        self.started_logs.clear();
        self.persist_logs().await?;
        self.persist_started_logs().await
    }

    pub async fn remove_all_projects_and_logs(&mut self) -> Result<()> {
        self.projects.clear();
        self.remove_all_logs().await?;
        self.persist_projects().await
    }

    /// Starts a timer for the project, closing whatever timer was running. Without an activity
    /// name the last activity of the project is reused, falling back to the project name.
    #[instrument(skip(self))]
    pub async fn start_activity(
        &mut self,
        slug: &str,
        activity_name: Option<&str>,
    ) -> Result<StartedLog> {
        let project = self.project_by_slug(slug)?;
        let activity_name: Arc<str> = match activity_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.into(),
            _ => self
                .last_activity_name(slug)
                .unwrap_or_else(|| project.name.as_str().into()),
        };
        let project_slug: Arc<str> = project.slug.as_str().into();

        self.close_started_logs().await?;

        let started = StartedLog {
            project_slug: project_slug.clone(),
            activity_name: activity_name.clone(),
            started_at: self.now(),
        };
        self.started_logs = vec![started.clone()];
        self.persist_started_logs().await?;
        self.add_activity(Activity {
            project_slug,
            name: activity_name,
        })
        .await?;
        info!("Started {} ({})", started.project_slug, started.activity_name);
        Ok(started)
    }

    /// Stops the project if it's running, starts it otherwise. Returns the new timer if one was
    /// started.
    pub async fn toggle_active_project(&mut self, slug: &str) -> Result<Option<StartedLog>> {
        if self.project_started_logs(slug).is_empty() {
            self.start_activity(slug, None).await.map(Some)
        } else {
            self.stop_all_projects().await?;
            Ok(None)
        }
    }

    /// Stops every running timer. Returns the logs that were created.
    #[instrument(skip(self))]
    pub async fn stop_all_projects(&mut self) -> Result<Vec<Log>> {
        let created = self.close_started_logs().await?;
        self.started_logs.clear();
        self.persist_started_logs().await?;
        Ok(created)
    }

    /// Turns running timers into logs, split by day. Running timers stay in place, callers decide
    /// what replaces them.
    async fn close_started_logs(&mut self) -> Result<Vec<Log>> {
        if self.started_logs.is_empty() {
            return Ok(vec![]);
        }
        let now = self.now();
        let created = self
            .started_logs
            .iter()
            .flat_map(|started| started_log_to_logs(started, now, &Local))
            .collect::<Vec<_>>();
        debug!("Closing running timers into {} logs", created.len());
        self.logs.extend(created.iter().cloned());
        self.persist_logs().await?;
        Ok(created)
    }

    async fn add_activity(&mut self, activity: Activity) -> Result<()> {
        self.activities.retain(|a| {
            !(a.project_slug == activity.project_slug && a.name == activity.name)
        });
        self.activities.push(activity);
        let overflow = self
            .activities
            .len()
            .saturating_sub(self.config.activities_limit);
        self.activities.drain(..overflow);
        save_collection(&self.store, ACTIVITIES_KEY, &self.activities).await
    }

    async fn persist_projects(&self) -> Result<()> {
        save_collection(&self.store, PROJECTS_KEY, &self.projects).await
    }

    async fn persist_started_logs(&self) -> Result<()> {
        save_collection(&self.store, STARTED_LOGS_KEY, &self.started_logs).await
    }

    /// Writes logs, dropping the ones that fell out of retention.
    async fn persist_logs(&mut self) -> Result<()> {
        let horizon = start_of_day_days_ago(
            self.now().with_timezone(&Local),
            self.config.retention_days,
        );
        let before = self.logs.len();
        self.logs.retain(|l| l.started_at > horizon);
        if before != self.logs.len() {
            info!("Dropped {} logs older than {horizon}", before - self.logs.len());
        }
        save_collection(&self.store, LOGS_KEY, &self.logs).await
    }
}
