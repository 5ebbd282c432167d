//! Capture-date resolution.
//!
//! A photo's date comes from the first source in the chain that yields a
//! valid value: EXIF capture tags, a date embedded in the file name, and
//! finally the filesystem modification time. The last step always
//! succeeds, so every photo resolves to exactly one date.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::exif::ExifData;

/// EXIF datetimes have no timezone info - they are local time as-is.
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// A run of 8 digits, optionally separated into 4/2/2 groups by `-` or `_`.
static FILENAME_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[-_]?(\d{2})[-_]?(\d{2})").unwrap());

/// Resolve the capture date for a photo.
pub fn resolve_date(exif: &ExifData, path: &Path) -> NaiveDateTime {
    if let Some(dt) = date_from_exif(exif) {
        return dt;
    }

    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if let Some(dt) = date_from_filename(name) {
        return dt;
    }

    date_from_mtime(path)
}

/// Try the capture-date tags in fixed priority order.
fn date_from_exif(exif: &ExifData) -> Option<NaiveDateTime> {
    let tags = [
        ("DateTimeOriginal", &exif.date_time_original),
        ("ModifyDate", &exif.date_time),
        ("CreateDate", &exif.date_time_digitized),
    ];

    for (tag, value) in tags {
        let Some(value) = value else { continue };
        match parse_exif_datetime(value) {
            Some(dt) => return Some(dt),
            None => log::debug!("Skipping unparseable {tag} value {value:?}"),
        }
    }

    None
}

fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, EXIF_DATETIME_FORMAT) {
        return Some(dt);
    }

    // nom-exif renders tags it recognized as timestamps in RFC 3339; keep
    // the wall time the camera recorded
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    // Odd separator variants seen in the wild
    let cleaned = s.replace(['-', '/', '\\', '.'], ":");
    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, EXIF_DATETIME_FORMAT) {
        return Some(dt);
    }

    // Date-only tag values still count, at midnight
    let date = cleaned.split(' ').next()?;
    NaiveDate::parse_from_str(date, "%Y:%m:%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}

/// Extract a date from the file name.
///
/// Candidate matches are scanned left to right and the first one that forms
/// a real calendar date wins, so `2023-13-05_20230615.jpg` still resolves
/// to June 15 2023.
fn date_from_filename(name: &str) -> Option<NaiveDateTime> {
    for caps in FILENAME_DATE.captures_iter(name) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;

        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

fn date_from_mtime(path: &Path) -> NaiveDateTime {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => DateTime::<Local>::from(mtime).naive_local(),
        Err(e) => {
            log::warn!(
                "Could not read modification time for {}, using current time: {e}",
                path.display()
            );
            Local::now().naive_local()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn exif_with(original: Option<&str>, modify: Option<&str>, digitized: Option<&str>) -> ExifData {
        ExifData {
            date_time_original: original.map(str::to_string),
            date_time: modify.map(str::to_string),
            date_time_digitized: digitized.map(str::to_string),
            gps: None,
        }
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    // ── EXIF chain ───────────────────────────────────────────────────

    #[test]
    fn date_time_original_wins_over_everything() {
        let exif = exif_with(
            Some("2022:01:05 10:20:30"),
            Some("2023:02:06 11:21:31"),
            Some("2024:03:07 12:22:32"),
        );
        let dt = resolve_date(&exif, Path::new("IMG_20250101.jpg"));
        assert_eq!(dt.date(), ymd(2022, 1, 5));
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(10, 20, 30).unwrap());
    }

    #[test]
    fn unparseable_tag_falls_through_to_next() {
        let exif = exif_with(Some("not a date"), Some("2023:02:06 11:21:31"), None);
        let dt = resolve_date(&exif, Path::new("photo.jpg"));
        assert_eq!(dt.date(), ymd(2023, 2, 6));
    }

    #[test]
    fn digitized_is_the_last_tag_tried() {
        let exif = exif_with(None, None, Some("2021:12:24 23:59:59"));
        let dt = resolve_date(&exif, Path::new("photo.jpg"));
        assert_eq!(dt.date(), ymd(2021, 12, 24));
    }

    #[test]
    fn exif_separator_variants_parse() {
        assert_eq!(
            parse_exif_datetime("2022-01-05 10:20:30").unwrap().date(),
            ymd(2022, 1, 5)
        );
        assert_eq!(
            parse_exif_datetime("2022/01/05 10:20:30").unwrap().date(),
            ymd(2022, 1, 5)
        );
    }

    #[test]
    fn rfc3339_rendered_tags_keep_wall_time() {
        let dt = parse_exif_datetime("2023-07-09T20:36:33+08:00").unwrap();
        assert_eq!(dt.date(), ymd(2023, 7, 9));
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(20, 36, 33).unwrap());
    }

    // ── filename patterns ────────────────────────────────────────────

    #[test]
    fn filename_date_variants() {
        for name in ["IMG_20230615.jpg", "2023-06-15 beach.jpg", "trip_2023_06_15.png"] {
            let dt = resolve_date(&ExifData::default(), Path::new(name));
            assert_eq!(dt.date(), ymd(2023, 6, 15), "failed for {name}");
            assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        }
    }

    #[test]
    fn invalid_calendar_date_is_rejected() {
        assert!(date_from_filename("photo-2023-13-05.jpg").is_none());
        assert!(date_from_filename("photo-2023-02-30.jpg").is_none());
    }

    #[test]
    fn later_candidate_rescues_invalid_first_match() {
        let dt = date_from_filename("2023-13-05_20230615.jpg").unwrap();
        assert_eq!(dt.date(), ymd(2023, 6, 15));
    }

    #[test]
    fn no_date_in_filename() {
        assert!(date_from_filename("random_photo.jpg").is_none());
        assert!(date_from_filename("DSC123.jpg").is_none());
    }

    // ── mtime fallback ───────────────────────────────────────────────

    #[test]
    fn falls_back_to_modification_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_date_here.jpg");
        fs::write(&path, b"bytes").unwrap();

        let mtime = fs::metadata(&path).unwrap().modified().unwrap();
        let expected = DateTime::<Local>::from(mtime).naive_local();

        let dt = resolve_date(&ExifData::default(), &path);
        assert_eq!(dt, expected);
    }
}
