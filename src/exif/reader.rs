use anyhow::{Context, Result};
use nom_exif::*;

use std::path::Path;

use crate::exif::gps::RawGps;

/// Capture metadata extracted from an image.
///
/// Date tag values are kept as strings — the EXIF `YYYY:MM:DD HH:MM:SS`
/// convention, or RFC 3339 when the parser recognized the tag as a typed
/// timestamp. Parsing them is the date resolver's job. Every field may be
/// absent.
#[derive(Debug, Clone, Default)]
pub struct ExifData {
    /// `DateTimeOriginal` — when the shutter fired.
    pub date_time_original: Option<String>,
    /// `ModifyDate` — the generic file timestamp.
    pub date_time: Option<String>,
    /// `CreateDate` — when the image was digitized.
    pub date_time_digitized: Option<String>,
    /// Raw GPS block, if the image carries one.
    pub gps: Option<RawGps>,
}

/// Read capture metadata from an image file.
///
/// Never fails: an unreadable or metadata-less file produces an empty
/// [`ExifData`] so the pipeline continues with its fallbacks.
pub fn read_exif(path: &Path) -> ExifData {
    match try_read(path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Failed to read EXIF from {}: {e}", path.display());
            ExifData::default()
        }
    }
}

fn try_read(path: &Path) -> Result<ExifData> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(path).context("Failed to open image file")?;

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(_) => {
            log::debug!("No EXIF data found in {}", path.display());
            return Ok(ExifData::default());
        }
    };

    // Parse GPS info before converting to Exif (consumes the iterator)
    let gps_info = iter.parse_gps_info().ok().flatten();
    let exif: Exif = iter.into();

    let mut data = ExifData::default();

    if let Some(val) = exif.get(ExifTag::DateTimeOriginal) {
        data.date_time_original = entry_to_string(val);
    }
    if let Some(val) = exif.get(ExifTag::ModifyDate) {
        data.date_time = entry_to_string(val);
    }
    if let Some(val) = exif.get(ExifTag::CreateDate) {
        data.date_time_digitized = entry_to_string(val);
    }

    data.gps = gps_info.as_ref().map(RawGps::from_info);

    Ok(data)
}

/// Convert an EntryValue to an Option<String>.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = val.to_string();
    let s = s.trim().trim_matches('"').to_string();
    if s.is_empty() { None } else { Some(s) }
}
