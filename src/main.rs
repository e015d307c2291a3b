//! Tapedeck CLI entry point

use std::process::ExitCode;

use clap::Parser;

use tapedeck::cli::{
    app::{run_devices, run_doctor, run_record, run_session, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use tapedeck::infrastructure::{logging, JsonConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // --verbose wins; otherwise the persisted debug toggle decides
    let debug = cli.verbose || {
        let store = JsonConfigStore::new();
        tapedeck::cli::app::load_config(&store).await.debug
    };
    logging::init(debug);

    match cli.command {
        Commands::Devices => run_devices().await,
        Commands::Record(args) => run_record(args).await,
        Commands::Session(args) => run_session(args).await,
        Commands::Doctor => run_doctor().await,
        Commands::Config { action } => {
            let presenter = Presenter::new();
            let store = JsonConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
