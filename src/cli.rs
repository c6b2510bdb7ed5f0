//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use imgur_folder_core::ArchiveOptions;

/// Download Imgur albums, galleries, subreddits and tags into folders.
#[derive(Parser, Debug)]
#[command(name = "imgur-folder")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download one or more album, gallery, subreddit or tag URLs
    Download {
        /// Imgur URLs
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,

        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Download an account's favorites
    Favorites {
        /// Account name
        username: String,

        /// Use gallery favorites instead of account favorites
        #[arg(long)]
        gallery: bool,

        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Download the images an account uploaded
    AccountImages {
        /// Account name
        username: String,

        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Download an account's gallery submissions
    Submissions {
        /// Account name
        username: String,

        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Authorize this tool to read account data (interactive)
    Auth,

    /// Exchange the stored refresh token for a new access token
    Refresh,

    /// Inspect or change the stored configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the stored configuration
    Show,

    /// Change the default download folder
    SetFolder {
        /// New download root
        path: PathBuf,
    },

    /// Store the registered application's client id and secret
    SetClient {
        /// Client id
        id: String,
        /// Client secret
        secret: String,
    },
}

/// Options shared by every downloading command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListingArgs {
    /// Download into this folder for this run only
    #[arg(short, long, value_name = "PATH")]
    pub folder: Option<PathBuf>,

    /// Download files again even if they already exist
    #[arg(short, long)]
    pub overwrite: bool,

    /// Maximum number of items for paginated listings
    #[arg(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_items: Option<u32>,

    /// Listing sort order (time, top, viral, newest, oldest)
    #[arg(long)]
    pub sort: Option<String>,

    /// Listing time window (day, week, month, year, all)
    #[arg(long)]
    pub window: Option<String>,

    /// Starting page of the listing
    #[arg(long)]
    pub page: Option<u32>,
}

impl ListingArgs {
    /// Converts the flags to archive options. `--overwrite` only ever turns
    /// overwriting on; without it the configured value applies.
    #[must_use]
    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            max_items: self
                .max_items
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
            sort: self.sort.clone(),
            window: self.window.clone(),
            page: self.page,
            overwrite: self.overwrite.then_some(true),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_download_parses_urls_and_options() {
        let args = Args::try_parse_from([
            "imgur-folder",
            "download",
            "https://imgur.com/a/abc",
            "https://imgur.com/t/cats",
            "--max-items",
            "13",
            "--sort",
            "top",
            "--overwrite",
        ])
        .unwrap();

        let Command::Download { urls, listing } = args.command else {
            panic!("expected download command");
        };
        assert_eq!(urls.len(), 2);
        let options = listing.archive_options();
        assert_eq!(options.max_items, Some(13));
        assert_eq!(options.sort.as_deref(), Some("top"));
        assert_eq!(options.overwrite, Some(true));
        assert_eq!(options.window, None);
    }

    #[test]
    fn test_cli_download_requires_a_url() {
        let err = Args::try_parse_from(["imgur-folder", "download"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_without_overwrite_keeps_config_value() {
        let args =
            Args::try_parse_from(["imgur-folder", "download", "https://imgur.com/a/x"]).unwrap();
        let Command::Download { listing, .. } = args.command else {
            panic!("expected download command");
        };
        assert_eq!(listing.archive_options().overwrite, None);
    }

    #[test]
    fn test_cli_max_items_rejects_zero() {
        let result = Args::try_parse_from([
            "imgur-folder",
            "download",
            "https://imgur.com/t/cats",
            "-m",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["imgur-folder", "-v", "auth"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["imgur-folder", "refresh", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["imgur-folder", "-q", "config", "show"]).unwrap();
        assert!(args.quiet);
        assert!(matches!(args.command, Command::Config(ConfigCommand::Show)));
    }

    #[test]
    fn test_cli_favorites_gallery_flag() {
        let args =
            Args::try_parse_from(["imgur-folder", "favorites", "someone", "--gallery"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Favorites { gallery: true, .. }
        ));
    }

    #[test]
    fn test_cli_config_set_client() {
        let args =
            Args::try_parse_from(["imgur-folder", "config", "set-client", "id1", "sec1"]).unwrap();
        let Command::Config(ConfigCommand::SetClient { id, secret }) = args.command else {
            panic!("expected config set-client");
        };
        assert_eq!(id, "id1");
        assert_eq!(secret, "sec1");
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["imgur-folder", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["imgur-folder", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["imgur-folder", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
