use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use photo_organizer::{config, geocode, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "photo-organizer",
    version,
    about = "Organize photos into dated, place-named folders from EXIF capture dates and GPS reverse geocoding"
)]
struct Cli {
    /// Directory containing the photos to organize (default: current directory)
    #[arg(value_name = "SOURCE_DIR")]
    source: Option<PathBuf>,

    /// Destination root (default: a "Destination" directory next to the source)
    #[arg(short, long, value_name = "DIR")]
    destination: Option<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Resolve dates and places without moving any file
    #[arg(long)]
    dry_run: bool,

    /// Output the run report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    // Load config
    let mut config = config::Config::load(cli.config.as_deref())?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.output.dry_run = true;
    }

    // Resolve the source directory and the sibling Destination root
    let source = cli.source.unwrap_or_else(|| PathBuf::from("."));
    let source = source.canonicalize().unwrap_or(source);
    let destination = cli.destination.unwrap_or_else(|| {
        source
            .parent()
            .map(|parent| parent.join("Destination"))
            .unwrap_or_else(|| PathBuf::from("Destination"))
    });

    log::info!("Source: {}", source.display());
    log::info!("Destination: {}", destination.display());
    log::info!(
        "Geocoder: {} (language: {})",
        config.geocoder.endpoint,
        config.geocoder.language
    );
    if config.output.dry_run {
        log::info!("DRY RUN — no files will be moved");
    }

    // Per-file errors are reported in the summary, never via the exit code
    let photos = match pipeline::collect_photos(&source, &config.extensions) {
        Ok(photos) => photos,
        Err(e) => {
            log::error!("{e:#}");
            return Ok(());
        }
    };

    if photos.is_empty() {
        log::warn!("No photos found in {}", source.display());
        return Ok(());
    }

    log::info!("Found {} photo(s) to organize", photos.len());

    let geocoder = geocode::NominatimGeocoder::new(&config.geocoder)?;
    let mut resolver = geocode::PlaceResolver::new(Box::new(geocoder), &config.geocoder);

    // Process each photo
    let mut results = Vec::new();
    let total = photos.len();

    for (i, photo) in photos.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, photo.display());

        let result = pipeline::process_photo(photo, &destination, &mut resolver, &config).await;

        log::info!("  Date: {}", result.date.format("%Y-%m-%d"));
        if let Some(coord) = result.coordinate {
            log::info!("  GPS: {:.6}, {:.6}", coord.latitude, coord.longitude);
        }
        log::info!("  Place: {}", result.place);
        if let Some(ref err) = result.error {
            log::error!("  Error: {err}");
        }

        results.push(result);
    }

    // JSON output
    if cli.json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "date": r.date.format("%Y-%m-%d %H:%M:%S").to_string(),
                    "place": r.place,
                    "latitude": r.coordinate.map(|c| c.latitude),
                    "longitude": r.coordinate.map(|c| c.longitude),
                    "destination": r.destination.as_ref().map(|p| p.display().to_string()),
                    "moved": r.moved,
                    "error": r.error,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary
    let organized = results.iter().filter(|r| r.error.is_none()).count();
    let errors = results.iter().filter(|r| r.error.is_some()).count();
    log::info!("Done: {organized} organized, {errors} error(s) out of {total} photos");

    Ok(())
}
