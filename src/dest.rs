//! Destination naming: folder names from date + place, and collision-free
//! file names inside them. Pure name computation — nothing is created here.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Build the destination folder name: `"{YYYY-MM-DD} - {place}"`.
pub fn folder_name(date: &NaiveDateTime, place: &str) -> String {
    format!("{} - {}", date.format("%Y-%m-%d"), sanitize_place(place))
}

/// A locality name must never introduce extra path components.
fn sanitize_place(place: &str) -> String {
    place.replace(['/', '\\'], "-")
}

/// Pick a collision-free path for `file_name` inside `folder`.
///
/// Checks the live directory state: if `photo.jpg` is taken the candidate
/// becomes `photo_1.jpg`, then `photo_2.jpg`, and so on until a free name
/// is found. An existing file is never overwritten.
pub fn unique_destination(folder: &Path, file_name: &str) -> PathBuf {
    let candidate = folder.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
    let extension = name.extension().and_then(|e| e.to_str());

    let mut counter = 1;
    loop {
        let alternative = match extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = folder.join(alternative);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
