// CLI module for handling command-line interface

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tdl")]
#[command(about = "Open TouchDesigner projects in the build they were saved with")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project to open (same as `tdl open FILE`)
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a project in the matching TouchDesigner build
    Open {
        file: PathBuf,
        /// Use this build instead of the one the project asks for
        #[arg(long)]
        version: Option<String>,
        /// Open in TouchPlayer instead of TouchDesigner
        #[arg(long)]
        player: bool,
        /// Show what would be launched without launching it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show which build a project needs and whether it is installed
    Inspect { file: PathBuf },
    /// List installed TouchDesigner and TouchPlayer builds
    Versions,
    /// Print the installer download URL for a build
    Url { key: String },
    /// Download and run the installer for a build or a project's build
    Install {
        /// Build key (e.g. TouchDesigner.2023.12370) or a .toe project
        target: String,
        /// Directory for the downloaded installer
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Start the installer and return without waiting for it
        #[arg(long)]
        no_wait: bool,
        /// Seconds between checks for the finished install
        #[arg(long)]
        poll_secs: Option<u64>,
        /// Keep the installer after a successful install
        #[arg(long, conflicts_with = "delete")]
        keep: bool,
        /// Delete the installer after a successful install
        #[arg(long)]
        delete: bool,
    },
    /// Show or edit recently opened projects
    Recents {
        #[command(subcommand)]
        action: Option<RecentsAction>,
        /// Show only projects opened through the launcher
        #[arg(long)]
        local: bool,
    },
    /// Show or edit project templates
    Templates {
        #[command(subcommand)]
        action: Option<TemplatesAction>,
    },
    /// Show or change preferences
    Prefs {
        /// Number of launcher recents to keep
        #[arg(long)]
        max_recent: Option<usize>,
        /// Ask before removing entries
        #[arg(long, action = ArgAction::Set)]
        confirm_removal: Option<bool>,
        /// Merge TouchDesigner's own history into recents
        #[arg(long, action = ArgAction::Set)]
        merged_history: Option<bool>,
        /// Show project icons in listings
        #[arg(long, action = ArgAction::Set)]
        show_icons: Option<bool>,
        /// Show README summaries and modified times in listings
        #[arg(long, action = ArgAction::Set)]
        show_info: Option<bool>,
    },
}

#[derive(Subcommand)]
pub enum RecentsAction {
    /// Forget a project
    Remove {
        path: PathBuf,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Forget every project that no longer exists on disk
    Clean,
    /// Forget all recent projects
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TemplatesAction {
    /// Add a project as a template
    Add {
        path: PathBuf,
        /// Label shown instead of the file name
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a template
    Remove {
        path: PathBuf,
        #[arg(long)]
        yes: bool,
    },
    /// Move a template one place up, wrapping to the bottom
    Up { path: PathBuf },
    /// Move a template one place down, wrapping to the top
    Down { path: PathBuf },
}
