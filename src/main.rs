//! CLI entry point for the imgur-folder tool.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use imgur_folder_core::{
    ArchiveOptions, Archiver, ConfigStore, DownloadReport, DownloadSettings, HttpDownloader,
    ImgurClient, authorize_url, parse_authorization_redirect,
};
use tracing::{debug, error, info};

mod cli;

use cli::{Args, Command, ConfigCommand, ListingArgs};

/// Which account listing a username command downloads.
#[derive(Debug, Clone, Copy)]
enum AccountListing {
    Favorites,
    GalleryFavorites,
    Images,
    Submissions,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let mut store = match &args.config {
        Some(path) => ConfigStore::load_or_default(path.clone()),
        None => ConfigStore::load_default(),
    }
    .context("failed to load configuration")?;
    debug!(path = %store.path().display(), "Using configuration file");

    match args.command {
        Command::Download { urls, listing } => download_urls(&mut store, &urls, &listing).await,
        Command::Favorites {
            username,
            gallery,
            listing,
        } => {
            let kind = if gallery {
                AccountListing::GalleryFavorites
            } else {
                AccountListing::Favorites
            };
            download_account(&mut store, &username, kind, &listing).await
        }
        Command::AccountImages { username, listing } => {
            download_account(&mut store, &username, AccountListing::Images, &listing).await
        }
        Command::Submissions { username, listing } => {
            download_account(&mut store, &username, AccountListing::Submissions, &listing).await
        }
        Command::Auth => authorize(&mut store),
        Command::Refresh => refresh(&mut store).await,
        Command::Config(command) => configure(&mut store, command),
    }
}

fn api_client(store: &ConfigStore) -> Result<ImgurClient> {
    let config = store.config();
    if config.client_id().is_empty() {
        bail!(
            "no client id configured\n  Suggestion: register an application and run `imgur-folder config set-client <ID> <SECRET>`"
        );
    }
    Ok(ImgurClient::new(config.client_id())?.with_access_token(config.access_token()))
}

/// Applies run-only flags to the loaded configuration.
fn apply_listing_flags(store: &mut ConfigStore, listing: &ListingArgs) -> ArchiveOptions {
    if let Some(folder) = &listing.folder {
        store.config_mut().set_download_path(folder);
    }
    listing.archive_options()
}

async fn download_urls(store: &mut ConfigStore, urls: &[String], listing: &ListingArgs) -> Result<()> {
    let options = apply_listing_flags(store, listing);
    let gateway = api_client(store)?;
    let downloader = HttpDownloader::new()?;
    let archiver = Archiver::new(&gateway, &downloader, &*store).with_options(options);

    info!(
        urls = urls.len(),
        root = %store.download_path().display(),
        "imgur-folder starting"
    );

    let mut total = DownloadReport::default();
    let mut failed_urls = 0usize;
    for url in urls {
        match archiver.download_url(url).await {
            Ok(report) => {
                debug!(url = %url, ?report, "URL finished");
                total.merge(&report);
            }
            Err(err) => {
                error!(url = %url, error = %err, "URL failed");
                failed_urls += 1;
            }
        }
    }

    log_report(&total);
    if failed_urls > 0 {
        bail!("{failed_urls} of {} URLs failed", urls.len());
    }
    Ok(())
}

async fn download_account(
    store: &mut ConfigStore,
    username: &str,
    kind: AccountListing,
    listing: &ListingArgs,
) -> Result<()> {
    let options = apply_listing_flags(store, listing);
    let gateway = api_client(store)?;
    let downloader = HttpDownloader::new()?;
    let archiver = Archiver::new(&gateway, &downloader, &*store).with_options(options);

    debug!(username, ?kind, "Downloading account listing");
    let report = match kind {
        AccountListing::Favorites => archiver.download_favorites(username).await,
        AccountListing::GalleryFavorites => archiver.download_gallery_favorites(username).await,
        AccountListing::Images => archiver.download_account_images(username).await,
        AccountListing::Submissions => archiver.download_submissions(username).await,
    }?;

    log_report(&report);
    Ok(())
}

fn log_report(report: &DownloadReport) {
    #[allow(clippy::cast_precision_loss)]
    let megabytes = report.bytes as f64 / f64::from(1u32 << 20);
    info!(
        downloaded = report.downloaded,
        skipped = report.skipped,
        failed = report.failed,
        total = report.total(),
        size_mb = %format!("{megabytes:.2}"),
        "Download complete"
    );
}

fn authorize(store: &mut ConfigStore) -> Result<()> {
    let client_id = store.config().client_id().to_string();
    if client_id.is_empty() {
        bail!("no client id configured\n  Suggestion: run `imgur-folder config set-client <ID> <SECRET>` first");
    }

    let url = authorize_url(&client_id);
    info!("Open this page and sign in: {url}");
    info!("This only grants read access to account data; no password is collected");
    info!("After signing in you will land on the Imgur homepage");

    print!("Paste the redirected URL here: ");
    io::stdout().flush()?;
    let mut pasted = String::new();
    io::stdin().lock().read_line(&mut pasted)?;

    let tokens = parse_authorization_redirect(pasted.trim())?;
    store.set_access_token(tokens.access_token)?;
    store.set_refresh_token(tokens.refresh_token)?;
    info!(path = %store.path().display(), "The application is now authorized");
    Ok(())
}

async fn refresh(store: &mut ConfigStore) -> Result<()> {
    let config = store.config();
    if config.refresh_token().is_empty() {
        bail!("no refresh token stored\n  Suggestion: run `imgur-folder auth` first");
    }
    let refresh_token = config.refresh_token().to_string();
    let client_secret = config.client_secret().to_string();

    let token = api_client(store)?
        .refresh_access_token(&refresh_token, &client_secret)
        .await?;
    store.set_access_token(token.access_token)?;
    if let Some(rotated) = token.refresh_token {
        store.set_refresh_token(rotated)?;
    }
    info!("Access token refreshed");
    Ok(())
}

fn configure(store: &mut ConfigStore, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", store.config().to_json()?);
        }
        ConfigCommand::SetFolder { path } => {
            store.set_default_download_path(&path)?;
            info!(path = %store.download_path().display(), "Default download folder saved");
        }
        ConfigCommand::SetClient { id, secret } => {
            store.set_client_id(id)?;
            store.set_client_secret(secret)?;
            info!(path = %store.path().display(), "Client credentials saved");
        }
    }
    Ok(())
}
