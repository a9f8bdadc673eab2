pub mod date;
pub mod output;
pub mod project;
pub mod status;
pub mod timeline;

use std::{io::Write, path::PathBuf};

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use date::DateSelection;
use project::{process_project_command, ProjectCommand};
use status::process_status_command;
use timeline::{process_timeline_command, TimelineCommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    tracking::{
        config::{TrackerConfig, DEFAULT_RETENTION_DAYS},
        service::Tracker,
        split::{split_log_by_time_unit, TimeUnit},
        storage::{FileStore, StateStore},
    },
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

use output::{format_log_line, tracks::project_tracks};

#[derive(Parser, Debug)]
#[command(name = "Jagaatrack", version, long_about = None)]
#[command(about = "Personal time tracker for projects and activities", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[command(flatten)]
    date: DateSelection,
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_RETENTION_DAYS,
        help = "Logs that started more days ago than this are dropped"
    )]
    retention_days: u32,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(subcommand, about = "Manage projects")]
    Project(ProjectCommand),
    #[command(about = "Start a timer for a project. Stops the running one")]
    Start {
        slug: String,
        #[arg(help = "Activity name. Defaults to the last activity of the project")]
        activity: Vec<String>,
    },
    #[command(about = "Stop the project if it's running, start it otherwise")]
    Toggle { slug: String },
    #[command(about = "Stop the running timer")]
    Stop {},
    #[command(about = "Show running timers and the total of the day")]
    Status {
        #[arg(short, long, help = "Keep redrawing the total until Ctrl-C")]
        watch: bool,
    },
    #[command(about = "List logs of the day")]
    Logs {
        #[arg(long, help = "Split logs further by the given unit")]
        split: Option<TimeUnit>,
    },
    #[command(about = "Remove a log by its number in `logs`")]
    RemoveLog { number: usize },
    #[command(about = "List recently used activities")]
    Activities { slug: Option<String> },
    #[command(about = "Print /track lines of every project")]
    Export {},
    #[command(about = "Display a timeline of the day")]
    Timeline {
        #[command(flatten)]
        command: TimelineCommand,
    },
    #[command(about = "Remove every log")]
    Reset {
        #[arg(long, help = "Remove projects as well")]
        all: bool,
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir.clone() {
        Some(v) => {
            std::fs::create_dir_all(&v)?;
            v
        }
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let config = TrackerConfig::default().with_retention_days(args.retention_days);
    let store = FileStore::new(app_dir.join("state"))?;
    let mut tracker = Tracker::load(store, Box::new(DefaultClock), config).await?;
    if let Some(date) = args.date.parse(Local::now())? {
        tracker.set_selected_date(date);
    }

    process_command(&mut tracker, args.commands).await
}

async fn process_command<S: StateStore>(tracker: &mut Tracker<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Project(command) => process_project_command(tracker, command).await?,
        Commands::Start { slug, activity } => {
            let activity = activity.join(" ");
            let started = tracker
                .start_activity(&slug, Some(activity.as_str()))
                .await?;
            println!("Started {}, {}", started.activity_name, started.project_slug);
        }
        Commands::Toggle { slug } => match tracker.toggle_active_project(&slug).await? {
            Some(started) => println!("Started {}, {}", started.activity_name, started.project_slug),
            None => println!("Stopped {slug}"),
        },
        Commands::Stop {} => {
            let created = tracker.stop_all_projects().await?;
            if created.is_empty() {
                println!("Nothing is running");
            }
            for log in created {
                println!("{}", format_log_line(&log));
            }
        }
        Commands::Status { watch } => process_status_command(tracker, watch).await?,
        Commands::Logs { split } => {
            let logs = tracker.logs();
            if logs.is_empty() {
                println!("No logs");
            }
            for (number, log) in logs.into_iter().enumerate() {
                match split {
                    Some(unit) => {
                        for part in split_log_by_time_unit(log.clone(), unit, &Local) {
                            println!("{}\t{}", number + 1, format_log_line(&part));
                        }
                    }
                    None => println!("{}\t{}", number + 1, format_log_line(log)),
                }
            }
        }
        Commands::RemoveLog { number } => {
            let log = match number.checked_sub(1).and_then(|i| tracker.logs().get(i).copied()) {
                Some(v) => v.clone(),
                None => bail!("There's no log number {number}"),
            };
            tracker.remove_log(&log).await?;
            println!("Removed {}", format_log_line(&log));
        }
        Commands::Activities { slug } => {
            let activities = match &slug {
                Some(slug) => {
                    tracker.project_by_slug(slug)?;
                    tracker.project_activities(slug)
                }
                None => tracker.activities().iter().collect(),
            };
            for activity in activities.into_iter().rev() {
                println!("{}, {}", activity.name, activity.project_slug);
            }
        }
        Commands::Export {} => {
            let tracks = tracker
                .projects()
                .iter()
                .flat_map(|project| {
                    project_tracks(project, &tracker.project_track_logs(&project.slug))
                })
                .collect::<Vec<_>>();
            if tracks.is_empty() {
                println!("No logs");
            } else {
                println!("{}", tracks.join("\n\n"));
            }
        }
        Commands::Timeline { command } => process_timeline_command(tracker, command).await?,
        Commands::Reset { all, yes } => {
            let message = if all {
                "Are you sure you want to remove all projects and logs?"
            } else {
                "Are you sure you want to remove all logs?"
            };
            if confirm(message, yes).await? {
                if all {
                    tracker.remove_all_projects_and_logs().await?;
                } else {
                    tracker.remove_all_logs().await?;
                }
            }
        }
    }
    Ok(())
}

/// Asks a yes/no question on stdin. `yes` skips the question.
async fn confirm(message: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    print!("{message} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
