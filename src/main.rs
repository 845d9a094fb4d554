//! VoiceLedger CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_ledger::cli::{
    app::{
        load_merged_config, run_analyze, run_clear, run_delete, run_list, run_record, EXIT_ERROR,
    },
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_ledger::domain::config::AppConfig;
use voice_ledger::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Config management is handled before any pipeline wiring
    let command = match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        command => command,
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        db_path: cli.db,
        language: match &command {
            Commands::Record { language, .. } => language.clone(),
            _ => None,
        },
        llm_model: match &command {
            Commands::Record { model, .. } => model.clone(),
            _ => None,
        },
        ..Default::default()
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Route to appropriate handler
    match command {
        Commands::Record { .. } => run_record(config).await,
        Commands::List => run_list(config),
        Commands::Delete { id } => run_delete(config, id),
        Commands::Clear => run_clear(config),
        Commands::Analyze => run_analyze(config),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}
