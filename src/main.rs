use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use music_catalog::config::{DEFAULT_READY_TIMEOUT_SEC, DEFAULT_REQUEST_TIMEOUT_SEC};
use music_catalog::{
    AppConfig, CatalogCache, CatalogFetcher, CliConfig, FileConfig, SearchField, Track,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file, its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// URL of the remote catalog document.
    #[clap(long)]
    pub endpoint: Option<String>,

    /// Directory holding a bundled catalog document, used instead of --endpoint.
    #[clap(long, value_parser = parse_path)]
    pub asset_dir: Option<PathBuf>,

    /// Name of the catalog document inside --asset-dir.
    #[clap(long)]
    pub asset_name: Option<String>,

    /// Timeout in seconds for the catalog request.
    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SEC)]
    pub request_timeout_sec: u64,

    /// How long to wait in seconds for the catalog to become ready.
    #[clap(long, default_value_t = DEFAULT_READY_TIMEOUT_SEC)]
    pub ready_timeout_sec: u64,

    /// Print results as JSON.
    #[clap(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists all genres.
    Genres,

    /// Lists the tracks of a genre.
    Browse { genre: String },

    /// Searches tracks whose field contains the query, ignoring case.
    Search {
        #[clap(long, value_enum, default_value_t = SearchField::Title)]
        field: SearchField,
        query: String,
    },

    /// Shows a single track.
    Track { id: String },

    /// Shows catalog counts.
    Stats,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            endpoint_url: self.endpoint.clone(),
            asset_dir: self.asset_dir.clone(),
            asset_name: self.asset_name.clone(),
            request_timeout_sec: self.request_timeout_sec,
            ready_timeout_sec: self.ready_timeout_sec,
        }
    }
}

fn print_tracks(tracks: &[Track], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tracks)?);
        return Ok(());
    }
    for track in tracks {
        println!(
            "{}  #{:<4} {} - {} [{}] ({})",
            track.id, track.track_number, track.artist, track.title, track.album, track.genre
        );
    }
    Ok(())
}

fn run_command(cache: &CatalogCache, command: &Command, json: bool) -> Result<()> {
    match command {
        Command::Genres => {
            let genres = cache.genres();
            if json {
                println!("{}", serde_json::to_string_pretty(&genres)?);
            } else {
                for genre in genres {
                    println!("{}", genre);
                }
            }
        }
        Command::Browse { genre } => print_tracks(&cache.tracks_by_genre(genre), json)?,
        Command::Search { field, query } => {
            print_tracks(&cache.search_by_field(*field, query), json)?
        }
        Command::Track { id } => {
            let track = cache
                .track_by_id(id)
                .with_context(|| format!("Track {} not found", id))?;
            print_tracks(&[track], json)?;
        }
        Command::Stats => {
            if json {
                let stats = serde_json::json!({
                    "tracks": cache.tracks_count(),
                    "genres": cache.genres_count(),
                });
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "Catalog has:\n{} tracks\n{} genres",
                    cache.tracks_count(),
                    cache.genres_count()
                );
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let fetcher = CatalogFetcher::new(config.catalog_source()?, config.track_defaults.clone());
    let cache = CatalogCache::new(Arc::new(fetcher));

    cache
        .ensure_ready_within(config.ready_timeout())
        .await
        .context("Catalog could not be loaded")?;

    run_command(&cache, &cli_args.command, cli_args.json)
}
