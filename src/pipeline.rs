use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::date;
use crate::dest;
use crate::exif::{self, GeoCoordinate, gps};
use crate::geocode::PlaceResolver;

/// The outcome of organizing a single photo.
///
/// A photo ends in exactly one of two terminal states: moved to a unique
/// destination (`moved` true, `error` empty) or left untouched with the
/// error recorded. Date and place are always resolved — every stage before
/// the move degrades instead of failing.
///
/// # Example
///
/// ```rust,no_run
/// # use photo_organizer::config::Config;
/// # use photo_organizer::geocode::{NominatimGeocoder, PlaceResolver};
/// # use photo_organizer::pipeline::process_photo;
/// # async fn example() -> anyhow::Result<()> {
/// # let config = Config::default();
/// # let geocoder = NominatimGeocoder::new(&config.geocoder)?;
/// # let mut resolver = PlaceResolver::new(Box::new(geocoder), &config.geocoder);
/// let result = process_photo(
///     "photo.jpg".as_ref(),
///     "Destination".as_ref(),
///     &mut resolver,
///     &config,
/// )
/// .await;
///
/// if let Some(ref err) = result.error {
///     eprintln!("left in place: {err}");
/// } else if let Some(ref dest) = result.destination {
///     println!("{} → {}", result.place, dest.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProcessResult {
    pub path: PathBuf,
    /// Resolved capture date (EXIF, filename, or mtime — never absent).
    pub date: NaiveDateTime,
    /// Resolved place name, or the fallback sentinel.
    pub place: String,
    /// Decoded GPS position, if the photo carried one.
    pub coordinate: Option<GeoCoordinate>,
    /// Where the file was moved — or would be, in dry-run mode.
    pub destination: Option<PathBuf>,
    pub moved: bool,
    pub error: Option<String>,
}

/// Enumerate the photos directly inside `source` (non-recursive).
///
/// Entries are filtered by extension, case-insensitively, and sorted by
/// name for stable output. A missing or unreadable source directory is an
/// error — fatal for the run, before any file is touched.
pub fn collect_photos(source: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(source)
        .with_context(|| format!("Source directory not accessible: {}", source.display()))?;

    let mut photos = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if path.is_file() && is_photo(&path, extensions) {
            photos.push(path);
        }
    }

    photos.sort();
    Ok(photos)
}

/// Check if a file has one of the configured photo extensions.
fn is_photo(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

/// Organize a single photo: resolve its capture date and place, derive a
/// collision-free destination, and move it there.
///
/// Resolution stages degrade instead of failing — unreadable metadata
/// becomes an empty tag set, an undecodable position becomes no
/// coordinate, a geocoding failure becomes the fallback place. Only the
/// final move can record an error, in which case the file is untouched.
pub async fn process_photo(
    path: &Path,
    destination_root: &Path,
    resolver: &mut PlaceResolver,
    config: &Config,
) -> ProcessResult {
    let exif_data = exif::read_exif(path);

    let date = date::resolve_date(&exif_data, path);
    let coordinate = exif_data.gps.as_ref().and_then(gps::decode);
    let place = resolver.resolve(coordinate).await;

    let folder = destination_root.join(dest::folder_name(&date, &place));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());

    // Evaluated against the live directory state: moves earlier in the run
    // affect this collision check.
    let destination = dest::unique_destination(&folder, &file_name);

    let mut result = ProcessResult {
        path: path.to_path_buf(),
        date,
        place,
        coordinate,
        destination: Some(destination.clone()),
        moved: false,
        error: None,
    };

    if config.output.dry_run {
        log::info!("  Would move to: {}", destination.display());
        return result;
    }

    match move_photo(path, &destination) {
        Ok(()) => {
            result.moved = true;
            log::info!("  Moved to: {}", destination.display());
        }
        Err(e) => {
            log::error!("  Failed to move {}: {e:#}", path.display());
            result.error = Some(format!("{e:#}"));
        }
    }

    result
}

/// Relocate `source` to `destination`, creating the folder first.
///
/// `fs::rename` cannot cross filesystems, so a failed rename falls back to
/// copy + remove. The source is deleted only after the copy succeeded, and
/// a half-written copy is cleaned up if the source cannot be removed — a
/// file is never left in both places.
fn move_photo(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    if std::fs::rename(source, destination).is_ok() {
        return Ok(());
    }

    std::fs::copy(source, destination)
        .with_context(|| format!("Failed to copy to {}", destination.display()))?;
    if let Err(e) = std::fs::remove_file(source) {
        let _ = std::fs::remove_file(destination);
        return Err(e).with_context(|| format!("Failed to remove {}", source.display()));
    }

    Ok(())
}
