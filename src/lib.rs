//! # photo-organizer
//!
//! Organize a flat directory of photos into dated, place-named folders.
//! Capture dates come from EXIF tags, filename patterns, or the file
//! modification time; place names come from GPS reverse geocoding with an
//! `"Unknown"` fallback. Files are moved into `"{YYYY-MM-DD} - {place}"`
//! folders without ever overwriting an existing file.
//!
//! ## Quick Start
//!
//! The pipeline module handles the full read → resolve → move flow for
//! each photo:
//!
//! ```rust,no_run
//! use photo_organizer::config::Config;
//! use photo_organizer::geocode::{NominatimGeocoder, PlaceResolver};
//! use photo_organizer::pipeline::{collect_photos, process_photo};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let source = Path::new("./photos");
//!     let destination = Path::new("./Destination");
//!
//!     // One geocoder for the whole run — the resolver throttles it to
//!     // the service's published rate limit
//!     let geocoder = NominatimGeocoder::new(&config.geocoder)?;
//!     let mut resolver = PlaceResolver::new(Box::new(geocoder), &config.geocoder);
//!
//!     for photo in collect_photos(source, &config.extensions)? {
//!         let result = process_photo(&photo, destination, &mut resolver, &config).await;
//!
//!         match result.error {
//!             Some(ref err) => eprintln!("Error organizing {}: {err}", photo.display()),
//!             None => println!(
//!                 "{} → {} - {}",
//!                 photo.display(),
//!                 result.date.format("%Y-%m-%d"),
//!                 result.place
//!             ),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Resolution chain
//!
//! | Stage | Sources, in priority order |
//! |-------|---------------------------|
//! | Date | `DateTimeOriginal`, `ModifyDate`, `CreateDate`, filename pattern, file mtime |
//! | Place | village, town, city, municipality, county — else `"Unknown"` |
//!
//! Every stage degrades instead of failing: unreadable metadata, an
//! undecodable GPS block, or a geocoding outage still leave the photo
//! organized, just with fallback values.
//!
//! ## Modules
//!
//! - [`config`] — Configuration types and loading/saving
//! - [`date`] — Capture-date resolution chain
//! - [`dest`] — Destination folder and collision-free file naming
//! - [`exif`] — EXIF capture-metadata reading and GPS decoding
//! - [`geocode`] — Reverse-geocoder trait, Nominatim client, rate-limited resolver
//! - [`pipeline`] — Photo collection and the per-file organize flow

pub mod config;
pub mod date;
pub mod dest;
pub mod exif;
pub mod geocode;
pub mod pipeline;
