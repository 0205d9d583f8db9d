//! Command-line interface: argument parsing and wiring a run together.
//!
//! A run goes through the same steps whatever the mode:
//! 1. Load the configuration
//! 2. Locate the desktop
//! 3. Pick the category folder and date format (from settings, or by asking)
//! 4. Scan the desktop and provision `<desktop>/<category>/<day>`
//! 5. Move every eligible file into it

use crate::config::{Config, DEFAULT_MAIN_FOLDER};
use crate::desktop::{DesktopLocator, FixedDesktop, PlatformDesktop};
use crate::destination::{DestinationResolver, Provisioning};
use crate::error::AppError;
use crate::file_organizer::{Organizer, PlannedMove, Report};
use crate::logging::{DEFAULT_LOG_FILE, init_logger};
use crate::naming::normalize_folder_name;
use crate::output::OutputFormatter;
use crate::policy::{Mode, NamingPolicy};
use crate::prompt::{Prompt, StdinPrompt, ask_custom_choices};
use chrono::{Local, NaiveDate};
use clap::Parser;
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "desktidy")]
#[command(about = "Move loose desktop files into a dated folder", version)]
pub struct Cli {
    /// Directory to organize instead of the desktop
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Configuration file (default: .desktidyrc.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show what would be moved without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Where to write the action log
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// What a dry run would do.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub destination: PathBuf,
    pub creates_root: bool,
    pub creates_day: bool,
    pub moves: Vec<PlannedMove>,
}

/// Everything decided before the first file is touched.
pub struct Session {
    pub desktop: PathBuf,
    pub category_folder: PathBuf,
    pub policy: NamingPolicy,
    today: NaiveDate,
}

impl Session {
    /// Locates the desktop and settles the folder name and date format,
    /// asking through `prompt` in CUSTOM mode.
    pub fn prepare(
        config: &Config,
        locator: &dyn DesktopLocator,
        prompt: &mut dyn Prompt,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let desktop = locator.locate().ok_or(AppError::DesktopNotFound)?;
        let settings = &config.settings;
        info!(mode = %settings.mode, desktop = %desktop.display(), "starting run");

        let (folder, date_format) = match settings.mode {
            Mode::Default => (settings.main_folder.clone(), settings.date_format()),
            Mode::Custom => {
                let (folder, date_format) = ask_custom_choices(prompt).map_err(AppError::Prompt)?;
                (
                    folder.unwrap_or_else(|| settings.main_folder.clone()),
                    date_format,
                )
            }
        };

        let policy = config.policy(date_format)?;
        let category_folder = desktop.join(category_folder_name(&folder));
        info!(
            category_folder = %category_folder.display(),
            date_format = date_format.pattern(),
            "destination chosen"
        );

        Ok(Self {
            desktop,
            category_folder,
            policy,
            today,
        })
    }

    fn resolver(&self) -> DestinationResolver {
        DestinationResolver::new(&self.category_folder, &self.policy, self.today)
    }

    /// Computes the moves without creating or moving anything.
    pub fn plan(&self) -> Result<Plan, AppError> {
        let resolver = self.resolver();
        let state = resolver.inspect()?;
        let organizer = Organizer::new(&self.policy);
        let entries = organizer.scan(&self.desktop)?;

        Ok(Plan {
            destination: resolver.day_path().to_path_buf(),
            creates_root: state == Provisioning::RootMissing,
            creates_day: !matches!(state, Provisioning::Ready(_)),
            moves: organizer.plan(&entries, resolver.day_path())?,
        })
    }

    /// Provisions the day folder and moves every eligible file into it,
    /// advancing `progress` once per file. The source is scanned first, so
    /// an unreadable source leaves no empty folders behind.
    pub fn execute(&self, progress: &ProgressBar) -> Result<Report, AppError> {
        let organizer = Organizer::new(&self.policy);
        let entries = organizer.scan(&self.desktop)?;
        let destination = self.resolver().resolve()?;

        progress.set_length(entries.len() as u64);
        let report = organizer.organize(&entries, &destination.path, |outcome| {
            OutputFormatter::file_outcome(progress, outcome);
            progress.inc(1);
        });
        progress.finish_and_clear();

        info!(
            moved = report.moved.len(),
            failed = report.failed.len(),
            "run finished"
        );
        Ok(report)
    }
}

/// Normalized folder name, falling back to the default when nothing is left.
fn category_folder_name(raw: &str) -> String {
    let name = normalize_folder_name(raw);
    if name.is_empty() {
        DEFAULT_MAIN_FOLDER.to_string()
    } else {
        name
    }
}

/// Runs the application for parsed arguments.
pub fn run_cli(cli: &Cli) -> Result<(), AppError> {
    let config = Config::load(cli.config.as_deref())?;

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.settings.log_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let _guard = init_logger(&log_file).map_err(AppError::Logging)?;

    let result = run_with_config(cli, &config);
    if let Err(e) = &result {
        error!(error = %e, "run aborted");
    }
    result
}

fn run_with_config(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let override_path = cli
        .source
        .clone()
        .or_else(|| config.settings.desktop_path.clone());
    let locator: Box<dyn DesktopLocator> = match override_path {
        Some(path) => Box::new(FixedDesktop(path)),
        None => Box::new(PlatformDesktop::new()),
    };

    let today = Local::now().date_naive();
    let session = Session::prepare(config, locator.as_ref(), &mut StdinPrompt, today)?;

    if !cli.json {
        OutputFormatter::info(&format!("Organizing contents of: {}", session.desktop.display()));
    }

    if cli.dry_run {
        let plan = session.plan()?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            OutputFormatter::plan(&plan);
        }
        return Ok(());
    }

    let progress = if cli.json {
        ProgressBar::hidden()
    } else {
        OutputFormatter::create_progress_bar(0)
    };
    let report = session.execute(&progress)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    OutputFormatter::report_summary(&report);
    if report.is_complete_success() {
        OutputFormatter::success("Organization complete!");
    } else {
        OutputFormatter::warning("Some files could not be organized. See the errors above.");
    }
    Ok(())
}
