use clap::{Parser, Subcommand};

use crate::commands::{auth::AuthCommand, list::ResourceCommand, request::RequestArgs};

#[derive(Parser)]
#[command(name = "tam", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// optional - The project directory holding tam.yaml, default will be where the command is run.
    #[clap(long, short, global = true)]
    pub path: Option<String>,

    /// optional - The stored session to use, default is the tam.yaml profile or "default".
    #[clap(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, sign out and inspect the stored session
    Auth {
        #[clap(subcommand)]
        command: AuthCommand,
    },
    /// Send an authenticated request and print the JSON response
    Request(RequestArgs),
    /// Manage news articles
    Articles {
        #[command(subcommand)]
        command: ResourceCommand,
    },
    /// Manage players
    Players {
        #[command(subcommand)]
        command: ResourceCommand,
    },
    /// Manage teams
    Teams {
        #[command(subcommand)]
        command: ResourceCommand,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        command: ResourceCommand,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tam", "players", "list", "--page", "2", "--filter", "position=GK", "--profile", "staff",
        ])
        .unwrap();

        assert_eq!(cli.profile.as_deref(), Some("staff"));
        match cli.command {
            Commands::Players { command: ResourceCommand::List(args) } => {
                assert_eq!(args.page, 2);
                assert_eq!(args.page_size, 8);
                assert_eq!(args.filter, vec!["position=GK".to_string()]);
            }
            _ => panic!("expected players list"),
        }
    }
}
