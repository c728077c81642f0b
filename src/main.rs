mod ui;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use movie_rating::{
    config::{Cli, Config},
    console,
    provider::{LookupProvider, OmdbProvider},
};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "movie_rating=info",
        1 => "movie_rating=debug",
        _ => "movie_rating=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout belongs to the console flow
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_console(provider: &dyn LookupProvider) {
    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    if let Err(e) = console::run(provider, &mut input, &mut out) {
        tracing::error!(error = %e, "Console I/O failed");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let provider: Arc<dyn LookupProvider> = match OmdbProvider::new(&config) {
        Ok(provider) => Arc::new(provider),
        // The console flow needs a provider too, so there is nothing to fall back to
        Err(e) => {
            tracing::error!(error = %e, "Failed to build lookup provider");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.console {
        run_console(provider.as_ref());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = gtk::init() {
        tracing::warn!(error = %e, "GTK initialisation failed");
        println!("GTK is not available. Running console version instead.");
        println!("Error: {}", e);
        run_console(provider.as_ref());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = ui::run(&config, provider.clone()) {
        tracing::error!(error = ?e, "GUI failed to start");
        println!("An error occurred: {:#}", e);
        println!("Falling back to console version.");
        run_console(provider.as_ref());
    }

    ExitCode::SUCCESS
}
