//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "ghlist",
    version,
    about = "Browse GitHub users and profiles - works offline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch users, profiles and avatars, or load the offline copy
    Sync {
        /// Skip the network and read the cached snapshot
        #[arg(long)]
        offline: bool,
    },

    /// Show a cached profile
    Show { login: String },

    /// Re-fetch one cached profile from GitHub
    Refresh { login: String },

    /// Write a cached avatar image to a file
    Avatar {
        /// GitHub user id
        id: i64,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Cache location, snapshot ages, token and network state
    Status,

    /// Watch network reachability until interrupted
    Net {
        /// Seconds between probes
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },

    /// Manage the GitHub token kept in the OS keychain
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum TokenAction {
    /// Prompt for a token and store it
    Set,
    /// Remove the stored token
    Clear,
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
    fn test_parse_sync_offline() {
        let cli = Cli::try_parse_from(["ghlist", "sync", "--offline"]).unwrap();
        assert!(matches!(cli.command, Command::Sync { offline: true }));
    }

    #[test]
    fn test_parse_avatar() {
        let cli = Cli::try_parse_from(["ghlist", "avatar", "1", "--out", "me.jpg"]).unwrap();
        match cli.command {
            Command::Avatar { id, out } => {
                assert_eq!(id, 1);
                assert_eq!(out, PathBuf::from("me.jpg"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_show_requires_login() {
        assert!(Cli::try_parse_from(["ghlist", "show"]).is_err());
    }
}
