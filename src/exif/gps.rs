use nom_exif::{GPSInfo, LatLng};

/// A decoded GPS position in signed decimal degrees.
///
/// Latitude is within [-90, 90], longitude within [-180, 180]; south and
/// west are negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw GPS position as embedded in EXIF: (degrees, minutes, seconds)
/// rational triples plus hemisphere reference characters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGps {
    pub latitude: [(u32, u32); 3],
    pub latitude_ref: char,
    pub longitude: [(u32, u32); 3],
    pub longitude_ref: char,
}

impl RawGps {
    pub(crate) fn from_info(info: &GPSInfo) -> Self {
        Self {
            latitude: latlng_triple(&info.latitude),
            latitude_ref: info.latitude_ref,
            longitude: latlng_triple(&info.longitude),
            longitude_ref: info.longitude_ref,
        }
    }
}

fn latlng_triple(latlng: &LatLng) -> [(u32, u32); 3] {
    [
        (latlng.0.0, latlng.0.1),
        (latlng.1.0, latlng.1.1),
        (latlng.2.0, latlng.2.1),
    ]
}

/// Decode a raw GPS block into signed decimal degrees.
///
/// decimal = degrees + minutes/60 + seconds/3600, negated for the S and W
/// hemispheres. A zero denominator or an out-of-range result yields `None`
/// rather than failing the file.
pub fn decode(raw: &RawGps) -> Option<GeoCoordinate> {
    let latitude = apply_ref(dms_to_decimal(&raw.latitude)?, raw.latitude_ref);
    let longitude = apply_ref(dms_to_decimal(&raw.longitude)?, raw.longitude_ref);

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        log::debug!("Implausible GPS position {latitude}, {longitude}");
        return None;
    }

    Some(GeoCoordinate {
        latitude,
        longitude,
    })
}

fn dms_to_decimal(dms: &[(u32, u32); 3]) -> Option<f64> {
    let [degrees, minutes, seconds] = dms;
    Some(ratio(degrees)? + ratio(minutes)? / 60.0 + ratio(seconds)? / 3600.0)
}

fn ratio(&(numerator, denominator): &(u32, u32)) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(numerator as f64 / denominator as f64)
}

fn apply_ref(value: f64, reference: char) -> f64 {
    if reference == 'S' || reference == 'W' { -value } else { value }
}
