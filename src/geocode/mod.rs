//! Reverse geocoding: coordinate → human-readable place name.
//!
//! The external service sits behind the [`ReverseGeocoder`] trait so tests
//! can substitute a deterministic stub. [`PlaceResolver`] owns the service,
//! enforces the minimum gap between requests, and converts every failure
//! mode into the [`FALLBACK_PLACE`] sentinel — a photo is organized even
//! when geocoding is unavailable.

mod nominatim;

pub use nominatim::NominatimGeocoder;

use anyhow::Result;
use serde::Deserialize;
use std::time::{Duration, Instant};

use crate::config::GeocoderConfig;
use crate::exif::GeoCoordinate;

/// Place name used when no coordinate exists or resolution fails.
pub const FALLBACK_PLACE: &str = "Unknown";

/// Address components returned by a reverse-geocoding lookup.
///
/// Unknown fields in the service response are ignored; absent fields
/// deserialize to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    pub village: Option<String>,
    pub town: Option<String>,
    pub city: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// Pick the most specific locality present: village, then town, city,
    /// municipality, county.
    pub fn place(&self) -> Option<&str> {
        self.village
            .as_deref()
            .or(self.town.as_deref())
            .or(self.city.as_deref())
            .or(self.municipality.as_deref())
            .or(self.county.as_deref())
    }
}

/// Trait for reverse-geocoding services.
///
/// `Ok(None)` means the service answered but knows no address for the
/// coordinate. Errors (timeouts, non-success statuses, decode failures)
/// are absorbed by [`PlaceResolver`], never by implementations.
#[async_trait::async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// The display name of this service (e.g., "Nominatim").
    fn name(&self) -> &str;
    /// Look up the address for a coordinate, localized to `language`.
    async fn reverse(&self, coordinate: GeoCoordinate, language: &str)
    -> Result<Option<Address>>;
}

/// Resolves coordinates to place names under the service's rate limit.
pub struct PlaceResolver {
    geocoder: Box<dyn ReverseGeocoder>,
    language: String,
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl PlaceResolver {
    pub fn new(geocoder: Box<dyn ReverseGeocoder>, config: &GeocoderConfig) -> Self {
        Self {
            geocoder,
            language: config.language.clone(),
            min_interval: Duration::from_millis(config.min_interval_ms),
            last_request: None,
        }
    }

    /// Resolve an optional coordinate to a place name.
    ///
    /// No coordinate returns the fallback immediately — no request is
    /// issued and no throttle delay is paid.
    pub async fn resolve(&mut self, coordinate: Option<GeoCoordinate>) -> String {
        let Some(coordinate) = coordinate else {
            return FALLBACK_PLACE.to_string();
        };

        self.throttle().await;
        self.last_request = Some(Instant::now());

        match self.geocoder.reverse(coordinate, &self.language).await {
            Ok(Some(address)) => match address.place() {
                Some(place) => place.to_string(),
                None => {
                    log::debug!(
                        "{}: address for {:.6}, {:.6} has no usable locality",
                        self.geocoder.name(),
                        coordinate.latitude,
                        coordinate.longitude
                    );
                    FALLBACK_PLACE.to_string()
                }
            },
            Ok(None) => {
                log::debug!(
                    "{}: no address for {:.6}, {:.6}",
                    self.geocoder.name(),
                    coordinate.latitude,
                    coordinate.longitude
                );
                FALLBACK_PLACE.to_string()
            }
            Err(e) => {
                log::warn!("{} lookup failed: {e}", self.geocoder.name());
                FALLBACK_PLACE.to_string()
            }
        }
    }

    /// Wait out the remaining gap since the previous request, if any.
    async fn throttle(&self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn coord() -> GeoCoordinate {
        GeoCoordinate {
            latitude: 48.8566,
            longitude: 2.3522,
        }
    }

    fn config(min_interval_ms: u64) -> GeocoderConfig {
        GeocoderConfig {
            min_interval_ms,
            ..GeocoderConfig::default()
        }
    }

    /// Deterministic stand-in for the network service.
    struct StubGeocoder {
        response: Result<Option<Address>, String>,
        calls: Arc<AtomicUsize>,
    }

    impl StubGeocoder {
        fn new(response: Result<Option<Address>, String>) -> (Box<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stub = Box::new(Self {
                response,
                calls: calls.clone(),
            });
            (stub, calls)
        }
    }

    #[async_trait::async_trait]
    impl ReverseGeocoder for StubGeocoder {
        fn name(&self) -> &str {
            "Stub"
        }

        async fn reverse(
            &self,
            _coordinate: GeoCoordinate,
            _language: &str,
        ) -> Result<Option<Address>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(address) => Ok(address.clone()),
                Err(msg) => anyhow::bail!("{msg}"),
            }
        }
    }

    // ── address priority ─────────────────────────────────────────────

    #[test]
    fn village_beats_town_and_city() {
        let address = Address {
            village: Some("Èze".into()),
            town: Some("Beaulieu".into()),
            city: Some("Nice".into()),
            ..Address::default()
        };
        assert_eq!(address.place(), Some("Èze"));
    }

    #[test]
    fn county_is_the_last_resort() {
        let address = Address {
            county: Some("Alpes-Maritimes".into()),
            ..Address::default()
        };
        assert_eq!(address.place(), Some("Alpes-Maritimes"));
    }

    #[test]
    fn empty_address_has_no_place() {
        assert_eq!(Address::default().place(), None);
    }

    // ── resolution and fallbacks ─────────────────────────────────────

    #[tokio::test]
    async fn no_coordinate_skips_the_service() {
        let (stub, calls) = StubGeocoder::new(Ok(Some(Address::default())));
        let mut resolver = PlaceResolver::new(stub, &config(1000));

        assert_eq!(resolver.resolve(None).await, FALLBACK_PLACE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolves_to_most_specific_locality() {
        let address = Address {
            town: Some("Cassis".into()),
            city: Some("Marseille".into()),
            ..Address::default()
        };
        let (stub, _) = StubGeocoder::new(Ok(Some(address)));
        let mut resolver = PlaceResolver::new(stub, &config(0));

        assert_eq!(resolver.resolve(Some(coord())).await, "Cassis");
    }

    #[tokio::test]
    async fn service_error_falls_back() {
        let (stub, calls) = StubGeocoder::new(Err("timed out".into()));
        let mut resolver = PlaceResolver::new(stub, &config(0));

        assert_eq!(resolver.resolve(Some(coord())).await, FALLBACK_PLACE);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_address_falls_back() {
        let (stub, _) = StubGeocoder::new(Ok(None));
        let mut resolver = PlaceResolver::new(stub, &config(0));

        assert_eq!(resolver.resolve(Some(coord())).await, FALLBACK_PLACE);
    }

    #[tokio::test]
    async fn empty_address_falls_back() {
        let (stub, _) = StubGeocoder::new(Ok(Some(Address::default())));
        let mut resolver = PlaceResolver::new(stub, &config(0));

        assert_eq!(resolver.resolve(Some(coord())).await, FALLBACK_PLACE);
    }

    // ── rate limiting ────────────────────────────────────────────────

    #[tokio::test]
    async fn consecutive_lookups_respect_the_interval() {
        let address = Address {
            city: Some("Paris".into()),
            ..Address::default()
        };
        let (stub, _) = StubGeocoder::new(Ok(Some(address)));
        let mut resolver = PlaceResolver::new(stub, &config(50));

        let start = Instant::now();
        resolver.resolve(Some(coord())).await;
        resolver.resolve(Some(coord())).await;

        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[tokio::test]
    async fn coordinate_less_files_pay_no_delay() {
        let (stub, _) = StubGeocoder::new(Ok(Some(Address::default())));
        let mut resolver = PlaceResolver::new(stub, &config(5000));

        resolver.resolve(Some(coord())).await;
        let start = Instant::now();
        resolver.resolve(None).await;

        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
