//! # syllabus
//!
//! Command-line front end for a classroom's section list: wires settings,
//! logging, auth and the HTTP client into a [`SectionListController`] and
//! runs one operation against it.

#![deny(unsafe_code)]

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use syllabus_api::HttpClassroomApi;
use syllabus_auth::{EnvTokenProvider, StaticTokenProvider, TokenProvider};
use syllabus_core::{Section, SectionId};
use syllabus_sections::{ControllerOptions, SectionListController, SectionListError};
use syllabus_settings::SyllabusSettings;
use tracing::info;

/// Manage the sections of a classroom.
#[derive(Parser, Debug)]
#[command(name = "syllabus", version, about = "Manage the sections of a classroom")]
struct Cli {
    /// Classroom to operate on.
    #[arg(long, global = true)]
    classroom: Option<String>,

    /// Settings file (defaults to `~/.syllabus/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Bearer token (defaults to the environment variable named in settings).
    #[arg(long, global = true)]
    token: Option<String>,

    /// Log level or filter directive (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the sections in order.
    List,
    /// Create a section at the end of the list.
    Add {
        /// Title of the new section.
        title: String,
    },
    /// Drop section `source` onto the position of section `target`.
    Move {
        /// Section being dragged.
        source: String,
        /// Section it is dropped onto.
        target: String,
    },
}

fn load_settings(path: Option<&PathBuf>) -> Result<SyllabusSettings> {
    match path {
        Some(path) => syllabus_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => syllabus_settings::load_settings().context("Failed to load settings"),
    }
}

fn token_provider(
    cli_token: Option<String>,
    settings: &SyllabusSettings,
) -> Arc<dyn TokenProvider> {
    match cli_token {
        Some(token) => Arc::new(StaticTokenProvider::new(token)),
        None => Arc::new(EnvTokenProvider::new(settings.auth.token_env.clone())),
    }
}

/// Wrap a controller error so the user-facing text leads the chain.
fn user_error(err: SectionListError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

/// One line per section: order, title, id.
fn render(sections: &[Section]) -> String {
    if sections.is_empty() {
        return "(no sections)\n".to_string();
    }
    let width = sections
        .iter()
        .map(|s| s.order.to_string().len())
        .max()
        .unwrap_or(1);
    let mut out = String::new();
    for s in sections {
        let _ = writeln!(out, "{:>width$}. {}  [{}]", s.order, s.title, s.id);
    }
    out
}

async fn run(controller: &SectionListController, command: Command) -> Result<()> {
    match command {
        Command::List => {
            let _ = controller.load().await.map_err(user_error)?;
        }
        Command::Add { title } => {
            let count = controller.add_section(&title).await.map_err(user_error)?;
            info!(count, "section added");
        }
        Command::Move { source, target } => {
            let _ = controller.load().await.map_err(user_error)?;
            let report = controller
                .reorder(&SectionId::from(source), &SectionId::from(target))
                .await
                .map_err(user_error)?;
            if let Some(message) = report.failure_message() {
                print!("{}", render(&controller.sections()));
                anyhow::bail!(message);
            }
        }
    }
    print!("{}", render(&controller.sections()));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings = load_settings(args.settings.as_ref())?;
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| settings.logging.level.clone());
    if args.json_logs {
        syllabus_logging::init_json_subscriber(&level);
    } else {
        syllabus_logging::init_subscriber(&level);
    }

    let classroom = args.classroom.context("--classroom is required")?;
    let api = HttpClassroomApi::from_settings(&settings.api)
        .context("Failed to build classroom API client")?;
    let tokens = token_provider(args.token, &settings);
    let controller = SectionListController::new(Arc::new(api), tokens, classroom.into())
        .map_err(user_error)?
        .with_options(ControllerOptions::from(&settings.reorder));

    info!(
        classroom_id = %controller.classroom_id(),
        base_url = %settings.api.classrooms_url(),
        "syllabus starting"
    );
    run(&controller, args.command).await
}
