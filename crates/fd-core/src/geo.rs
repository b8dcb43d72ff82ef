//! Geographic coordinate type and great-circle distance.
//!
//! `Coordinate` stores WGS-84 degrees as `f64`.  Dispatch distances are
//! compared against arrival thresholds of a few tens of metres, so the
//! precision budget is spent here rather than on memory.
//!
//! A `Coordinate` can only be built through [`Coordinate::new`] (or serde,
//! which routes through the same check), so every value in circulation is
//! finite and in range.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A validated WGS-84 latitude/longitude pair in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Validate and construct.
    ///
    /// Rejects non-finite values and anything outside `[-90, 90]` latitude or
    /// `[-180, 180]` longitude.  Out-of-range input is never wrapped or
    /// clamped.
    pub fn new(lat: f64, lng: f64) -> CoreResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    #[inline]
    pub fn lat(self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lng(self) -> f64 {
        self.lng
    }

    /// Haversine great-circle distance in metres.
    ///
    /// The haversine term is clamped to `[0, 1]` before the inverse
    /// trigonometry: rounding can push it marginally past 1 for antipodal
    /// points, which would otherwise yield `NaN` from `sqrt(1 - a)`.
    pub fn distance_m(self, other: Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);
        let a = a.clamp(0.0, 1.0);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// [`distance_m`](Self::distance_m) in kilometres.
    #[inline]
    pub fn distance_km(self, other: Coordinate) -> f64 {
        self.distance_m(other) / 1_000.0
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = CoreError;

    /// `(lat, lng)` tuple form.
    fn try_from((lat, lng): (f64, f64)) -> CoreResult<Self> {
        Self::new(lat, lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

// ── serde bridge ──────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoreError;

    fn try_from(raw: RawCoordinate) -> CoreResult<Self> {
        Self::new(raw.lat, raw.lng)
    }
}
