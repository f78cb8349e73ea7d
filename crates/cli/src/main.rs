use std::{env, path::PathBuf, str::FromStr, sync::Arc};

#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::Parser;
use tam::{ApiResult, Client, CreateClientConfig, SessionEvent};
use tam_core::{ApiConfig, load_env_from_project_path, setup_info_logger};
use tracing::debug;

use crate::{
    cli_interface::{Cli, Commands},
    console::{print_error_message, print_warn_message},
    commands::{
        auth,
        list::{self, Resource},
        request,
    },
    credentials::{DEFAULT_PROFILE, FileTokenStore},
    error::CliError,
    project_location::ProjectLocation,
};

mod cli_interface;
mod commands;
mod console;
mod credentials;
mod error;
mod project_location;

fn resolve_path(override_path: &Option<String>) -> Result<PathBuf, String> {
    let path = match override_path {
        Some(path) => {
            PathBuf::from_str(path).map_err(|_| format!("Invalid path provided: '{}'", path))?
        }
        None => env::current_dir().map_err(|_| "Failed to get current directory.".to_string())?,
    };

    path.canonicalize().map_err(|e| format!("Failed to resolve path '{}': {}", path.display(), e))
}

fn on_session_event(event: SessionEvent) {
    match event {
        SessionEvent::TokensRefreshed => debug!("Stored session refreshed"),
        SessionEvent::LoggedOut => print_warn_message("Stored session cleared"),
        SessionEvent::ReauthenticationRequired => {
            print_warn_message("Session can no longer be refreshed, run `tam auth login` again")
        }
    }
}

fn create_client(api: &ApiConfig, store: Arc<FileTokenStore>) -> ApiResult<Client> {
    Client::new(CreateClientConfig::from(api), store, Arc::new(on_session_event))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    setup_info_logger();

    let resolved_path = resolve_path(&cli.path).inspect_err(|e| print_error_message(e))?;
    load_env_from_project_path(&resolved_path);

    let project_location = ProjectLocation::new(resolved_path);
    let setup_config =
        project_location.setup_config().inspect_err(|e| print_error_message(&e.to_string()))?;

    let profile = cli
        .profile
        .clone()
        .or_else(|| setup_config.profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
    let store = Arc::new(FileTokenStore::for_profile(&profile)?);
    let client = create_client(&setup_config.api, Arc::clone(&store))?;
    let locale = setup_config.api.locale;

    match &cli.command {
        Commands::Auth { command } => {
            auth::handle_auth_command(command, &client, &store, &profile)
                .await
                .inspect_err(|e| print_error_message(&e.to_string()))?;
        }
        Commands::Request(args) => {
            request::handle_request(args, &client).await?;
        }
        Commands::Articles { command } => {
            list::handle_list(Resource::Articles, command, &client, locale).await?;
        }
        Commands::Players { command } => {
            list::handle_list(Resource::Players, command, &client, locale).await?;
        }
        Commands::Teams { command } => {
            list::handle_list(Resource::Teams, command, &client, locale).await?;
        }
        Commands::Users { command } => {
            list::handle_list(Resource::Users, command, &client, locale).await?;
        }
    }

    Ok(())
}
