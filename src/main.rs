//! CLI entry point for tdei-harness.
//!
//! Operates the fixture layer from a shell: provision or reload the seed
//! bundle, check that an account can log in, or print the cached bundle.
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (bad settings file, auth failure, API error, no cache)
//! - 2: argument validation error (clap handles this automatically)

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tdei_harness::auth::{login, parse_jwt};
use tdei_harness::config::{CONFIG_PATH_ENV, HarnessConfig};
use tdei_harness::seed::{DEFAULT_CACHE_PATH, FileSeedStore, SeedManager, SeedOptions, SeedStore};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file with the admin account and gateway URL.
    /// Defaults to test-harness.json in the working directory.
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Provision the fixture bundle, or reload it from the cache file.
    Seed {
        /// Ignore the cache and provision a new bundle.
        #[arg(long)]
        fresh: bool,

        /// Cache file to read and write.
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: PathBuf,

        /// Skip registering the POC user.
        #[arg(long)]
        no_poc: bool,

        /// Also create a project group.
        #[arg(long)]
        with_project_group: bool,
    },

    /// Log in and print the access token. Defaults to the admin account.
    Login {
        #[arg(long)]
        username: Option<String>,

        /// Prefer the TDEI_PASSWORD environment variable over this flag to
        /// keep the password out of shell history.
        #[arg(long, env = "TDEI_PASSWORD")]
        password: Option<String>,
    },

    /// Print the cached fixture bundle.
    ShowCache {
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<HarnessConfig, ExitCode> {
    let loaded = match path {
        Some(path) => HarnessConfig::load(path),
        None => HarnessConfig::discover(),
    };
    loaded.map_err(|e| {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing();

    match args.command {
        Command::Seed {
            fresh,
            cache,
            no_poc,
            with_project_group,
        } => {
            let config = match load_config(args.config.as_ref()) {
                Ok(config) => config,
                Err(code) => return code,
            };
            let options = SeedOptions {
                with_poc_user: !no_poc,
                with_project_group,
            };
            let manager = SeedManager::new(config, Arc::new(FileSeedStore::new(&cache)))
                .with_options(options);
            match manager.generate(fresh).await {
                Ok(details) => {
                    println!("organization: {}", details.org_id());
                    if let Some(pg) = &details.project_group {
                        println!(
                            "project group: {}",
                            pg.tdei_project_group_id.as_deref().unwrap_or_default()
                        );
                    }
                    println!(
                        "service: {}",
                        details.service.tdei_service_id.as_deref().unwrap_or_default()
                    );
                    println!(
                        "station: {}",
                        details.station.tdei_station_id.as_deref().unwrap_or_default()
                    );
                    println!("producer user: {}", details.producer_user.email);
                    if let Some(poc) = &details.poc_user {
                        println!("poc user: {}", poc.email);
                    }
                    println!("cache: {}", cache.display());
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        Command::Login { username, password } => {
            let config = match load_config(args.config.as_ref()) {
                Ok(config) => config,
                Err(code) => return code,
            };
            let username = username.unwrap_or_else(|| config.username().to_string());
            let password = password.unwrap_or_else(|| config.password().to_string());
            match login(&config, &username, &password).await {
                Ok(token) => {
                    if let Some(claims) = parse_jwt(&token.access_token) {
                        tracing::info!(
                            subject = %claims["sub"],
                            expires_in = ?token.expires_in,
                            "logged in"
                        );
                    }
                    println!("{}", token.access_token);
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        Command::ShowCache { cache } => {
            let store = FileSeedStore::new(&cache);
            match store.load().await {
                Ok(Some(details)) => match serde_json::to_string_pretty(&details) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::FAILURE;
                    }
                },
                Ok(None) => {
                    eprintln!("No cached seed data at {}", cache.display());
                    return ExitCode::FAILURE;
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
