mod cli;
mod commands;
mod config;
mod constants;
mod document;
mod history;
mod launch;
mod paths;
mod platform;
mod project;
mod prompt;
mod runtime;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use commands::install::InstallOptions;
use commands::prefs::PrefChanges;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match (cli.command, cli.file) {
        (Some(command), _) => run(command).await,
        (None, Some(file)) => commands::open::open(&file, None, false, false).await,
        (None, None) => commands::recents::recents(None, false),
    };

    if let Err(e) = result {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Open {
            file,
            version,
            player,
            dry_run,
        } => commands::open::open(&file, version, player, dry_run).await,
        Commands::Inspect { file } => commands::inspect::inspect(&file).await,
        Commands::Versions => commands::versions::versions(),
        Commands::Url { key } => commands::url::url(&key),
        Commands::Install {
            target,
            dir,
            no_wait,
            poll_secs,
            keep,
            delete,
        } => {
            commands::install::install(
                &target,
                InstallOptions {
                    dir,
                    no_wait,
                    poll_secs,
                    keep,
                    delete,
                },
            )
            .await
        }
        Commands::Recents { action, local } => commands::recents::recents(action, local),
        Commands::Templates { action } => commands::templates::templates(action),
        Commands::Prefs {
            max_recent,
            confirm_removal,
            merged_history,
            show_icons,
            show_info,
        } => commands::prefs::prefs(PrefChanges {
            max_recent,
            confirm_removal,
            merged_history,
            show_icons,
            show_info,
        }),
    }
}
