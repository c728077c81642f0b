use std::time::Duration;

use clap::Parser;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_URL: &str = "https://www.omdbapi.com/";

/// Command line arguments, each with an environment variable fallback
#[derive(Debug, Parser)]
#[command(name = "movie-rating", version, about = "Search movies and look up their ratings")]
pub struct Cli {
    /// OMDb API key
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Base URL of the OMDb API
    #[arg(long, env = "OMDB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Maximum number of lookups running at once
    #[arg(long, env = "MOVIE_RATING_WORKERS", default_value_t = 4)]
    pub workers: usize,

    /// HTTP timeout in seconds
    #[arg(long, env = "MOVIE_RATING_TIMEOUT", default_value_t = 15)]
    pub timeout: u64,

    /// Skip the GUI and run the console flow
    #[arg(long)]
    pub console: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub workers: usize,
    pub timeout: Duration,
    pub console: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        if cli.workers == 0 {
            return Err(AppError::InvalidInput(
                "--workers must be at least 1".to_string(),
            ));
        }
        if cli.timeout == 0 {
            return Err(AppError::InvalidInput(
                "--timeout must be at least 1 second".to_string(),
            ));
        }

        let api_url = cli.api_url.trim();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(AppError::InvalidInput(format!(
                "--api-url must be an http(s) URL, got '{}'",
                api_url
            )));
        }

        Ok(Self {
            api_key: cli.api_key.trim().to_string(),
            api_url: api_url.to_string(),
            workers: cli.workers,
            timeout: Duration::from_secs(cli.timeout),
            console: cli.console,
        })
    }
}
