use std::{num::NonZeroU32, path::PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::{
    tracking::{
        entities::Project, service::Tracker, storage::StateStore,
        timeline::DEFAULT_TIMELINE_LENGTH,
    },
    utils::format::{format_duration, DurationStyle},
};

use super::{
    confirm,
    output::{
        import::{parse_projects, projects_to_import_text},
        tracks::project_tracks,
    },
    timeline::render_project_log,
};

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    #[command(about = "Add a project")]
    Add { name: String, slug: String },
    #[command(about = "Remove a project together with all of its logs")]
    Remove {
        slug: String,
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
    #[command(about = "Remove logs of a project for the selected day")]
    Reset {
        slug: String,
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
    #[command(about = "List projects with their time for the selected day")]
    List {
        #[arg(long, help = "Print projects in the format accepted by `project import`")]
        import_format: bool,
    },
    #[command(about = "Move the listed projects to the top in the given order")]
    Sort {
        #[arg(required = true, num_args = 1..)]
        slugs: Vec<String>,
    },
    #[command(about = "Import projects from a pasted project manager listing")]
    Import {
        #[arg(long, help = "Read the listing from a file instead of stdin")]
        file: Option<PathBuf>,
    },
    #[command(about = "Print /track lines of a single project")]
    Tracks { slug: String },
    #[command(about = "Print activities and the timeline of a single project")]
    Log {
        slug: String,
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_TIMELINE_LENGTH,
            help = "Amount of intervals the day is split into"
        )]
        length: NonZeroU32,
    },
}

pub async fn process_project_command<S: StateStore>(
    tracker: &mut Tracker<S>,
    command: ProjectCommand,
) -> Result<()> {
    match command {
        ProjectCommand::Add { name, slug } => {
            if tracker.add_project(Project::new(name, slug.clone())).await? {
                println!("Added {slug}");
            } else {
                println!("Project {slug} already exists or is incomplete");
            }
        }
        ProjectCommand::Remove { slug, yes } => {
            let name = tracker.project_by_slug(&slug)?.name.clone();
            if confirm(
                &format!("Are you sure you want to remove {name} and all its logs?"),
                yes,
            )
            .await?
            {
                tracker.remove_project(&slug).await?;
            }
        }
        ProjectCommand::Reset { slug, yes } => {
            let name = tracker.project_by_slug(&slug)?.name.clone();
            if confirm(
                &format!("Are you sure you want to remove all logs for {name}?"),
                yes,
            )
            .await?
            {
                tracker.reset_project(&slug).await?;
            }
        }
        ProjectCommand::List { import_format } => {
            if import_format {
                println!("{}", projects_to_import_text(tracker.projects()));
            } else {
                print_projects(tracker);
            }
        }
        ProjectCommand::Sort { slugs } => tracker.sort_projects(&slugs).await?,
        ProjectCommand::Import { file } => {
            let text = match file {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Can't read {path:?}"))?,
                None => {
                    let mut text = String::new();
                    tokio::io::stdin().read_to_string(&mut text).await?;
                    text
                }
            };
            let projects = parse_projects(&text);
            info!("Parsed {} projects", projects.len());
            let added = tracker.import_projects(projects).await?;
            println!("Imported {added} projects");
        }
        ProjectCommand::Tracks { slug } => {
            let project = tracker.project_by_slug(&slug)?;
            let tracks = project_tracks(project, &tracker.project_track_logs(&slug));
            println!("{}", tracks.join("\n\n"));
        }
        ProjectCommand::Log { slug, length } => {
            match render_project_log(tracker, &slug, length)? {
                Some(text) => println!("{text}"),
                None => println!("No logs"),
            }
        }
    }
    Ok(())
}

fn print_projects<S: StateStore>(tracker: &Tracker<S>) {
    for (order, project) in tracker.projects().iter().enumerate() {
        let running = !tracker.project_started_logs(&project.slug).is_empty();
        let activity = tracker
            .current_activity_name(&project.slug)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "No activity".into());
        println!(
            "{}\t{}\t({})\t{}, {}\t{activity}",
            order + 1,
            if running { "▶" } else { " " },
            format_duration(
                tracker.project_live_total(&project.slug),
                DurationStyle::Colon
            ),
            project.name,
            project.slug,
        );
    }
}
