//! EXIF capture-metadata reading and GPS position decoding.
//!
//! [`read_exif`] extracts the capture-date tags and the raw GPS block from
//! an image file, absorbing every read or parse failure into an empty
//! result. [`gps::decode`] converts the raw degrees/minutes/seconds block
//! into signed decimal degrees.

pub mod gps;
mod reader;

pub use gps::GeoCoordinate;
pub use reader::{ExifData, read_exif};
