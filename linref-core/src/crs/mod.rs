//! Coordinate reference systems and the WGS84 ↔ BNG transform.
//!
//! The engine works internally on the planar British National Grid
//! (EPSG:27700). Callers may supply and request WGS84 (EPSG:4326); the
//! conversion is a pure function composed of a geodetic→cartesian step, a
//! seven-parameter Helmert datum shift, and the Ordnance Survey transverse
//! Mercator projection on the Airy 1830 ellipsoid.

mod osgb;

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

/// A supported spatial reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpatialRef {
    /// WGS84 geodetic longitude/latitude, EPSG:4326.
    #[default]
    Wgs84,
    /// British National Grid easting/northing, EPSG:27700.
    Bng,
}

impl SpatialRef {
    /// The EPSG code of this reference system.
    #[must_use]
    pub const fn epsg(self) -> u32 {
        match self {
            Self::Wgs84 => 4_326,
            Self::Bng => 27_700,
        }
    }
}

impl fmt::Display for SpatialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// Error returned when parsing a [`SpatialRef`] from an EPSG name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported spatial reference {value:?}; expected EPSG:4326 or EPSG:27700")]
pub struct SpatialRefError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for SpatialRef {
    type Err = SpatialRefError;

    /// Parses `"EPSG:4326"` / `"EPSG:27700"` (or the bare codes),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "epsg:4326" | "4326" => Ok(Self::Wgs84),
            "epsg:27700" | "27700" => Ok(Self::Bng),
            _ => Err(SpatialRefError {
                value: s.to_owned(),
            }),
        }
    }
}

/// Errors returned by the coordinate transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The point lies far outside the region the transform covers.
    #[error("point ({x}, {y}) in {srs} is outside the supported Great Britain coverage")]
    OutOfCoverage {
        /// Reference system of the rejected point.
        srs: SpatialRef,
        /// First ordinate (longitude or easting).
        x: f64,
        /// Second ordinate (latitude or northing).
        y: f64,
    },
    /// An ordinate was NaN or infinite.
    #[error("coordinates must be finite (got ({x}, {y}))")]
    NonFinite {
        /// First ordinate as supplied.
        x: f64,
        /// Second ordinate as supplied.
        y: f64,
    },
}

// Coverage limits are deliberately generous: points well off the coast must
// still project (and then simply match no line); only inputs far outside
// Great Britain are rejected.
const WGS84_LON_RANGE: (f64, f64) = (-15.0, 10.0);
const WGS84_LAT_RANGE: (f64, f64) = (45.0, 65.0);
const BNG_EASTING_RANGE: (f64, f64) = (-250_000.0, 1_000_000.0);
const BNG_NORTHING_RANGE: (f64, f64) = (-250_000.0, 1_500_000.0);

/// A coordinate pair tagged with its spatial reference.
///
/// For WGS84 `x` is longitude and `y` is latitude, in degrees. For BNG `x`
/// is easting and `y` is northing, in metres.
///
/// # Examples
///
/// ```
/// use linref_core::{GeoPoint, SpatialRef};
///
/// # fn main() -> Result<(), linref_core::ProjectionError> {
/// let greenwich = GeoPoint::wgs84(0.0, 51.4778);
/// let grid = greenwich.to_bng()?;
/// assert_eq!(grid.srs, SpatialRef::Bng);
/// // The observatory sits near the 538,880 E / 177,360 N grid square.
/// assert!((grid.coord.x - 538_880.0).abs() < 500.0);
/// assert!((grid.coord.y - 177_360.0).abs() < 500.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// The coordinate pair.
    pub coord: Coord<f64>,
    /// The reference system `coord` is expressed in.
    pub srs: SpatialRef,
}

impl GeoPoint {
    /// A point in the given reference system.
    #[must_use]
    pub const fn new(coord: Coord<f64>, srs: SpatialRef) -> Self {
        Self { coord, srs }
    }

    /// A WGS84 point from longitude and latitude in degrees.
    #[must_use]
    pub const fn wgs84(lon: f64, lat: f64) -> Self {
        Self::new(Coord { x: lon, y: lat }, SpatialRef::Wgs84)
    }

    /// A BNG point from easting and northing in metres.
    #[must_use]
    pub const fn bng(easting: f64, northing: f64) -> Self {
        Self::new(Coord { x: easting, y: northing }, SpatialRef::Bng)
    }

    /// Converts to British National Grid.
    ///
    /// # Errors
    /// Returns [`ProjectionError::NonFinite`] for NaN/infinite ordinates and
    /// [`ProjectionError::OutOfCoverage`] when the point lies far outside
    /// Great Britain.
    pub fn to_bng(&self) -> Result<Self, ProjectionError> {
        self.to_srs(SpatialRef::Bng)
    }

    /// Converts to WGS84.
    ///
    /// # Errors
    /// As [`GeoPoint::to_bng`].
    pub fn to_wgs84(&self) -> Result<Self, ProjectionError> {
        self.to_srs(SpatialRef::Wgs84)
    }

    /// Converts to the requested reference system.
    ///
    /// Converting to the system the point is already in is the identity and
    /// performs no floating-point work.
    ///
    /// # Errors
    /// As [`GeoPoint::to_bng`].
    pub fn to_srs(&self, target: SpatialRef) -> Result<Self, ProjectionError> {
        self.check_coverage()?;
        if self.srs == target {
            return Ok(*self);
        }
        let coord = match self.srs {
            SpatialRef::Wgs84 => osgb::wgs84_to_bng(self.coord),
            SpatialRef::Bng => osgb::bng_to_wgs84(self.coord),
        };
        Ok(Self::new(coord, target))
    }

    fn check_coverage(&self) -> Result<(), ProjectionError> {
        let Coord { x, y } = self.coord;
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }
        let (x_range, y_range) = match self.srs {
            SpatialRef::Wgs84 => (WGS84_LON_RANGE, WGS84_LAT_RANGE),
            SpatialRef::Bng => (BNG_EASTING_RANGE, BNG_NORTHING_RANGE),
        };
        if x < x_range.0 || x > x_range.1 || y < y_range.0 || y > y_range.1 {
            return Err(ProjectionError::OutOfCoverage {
                srs: self.srs,
                x,
                y,
            });
        }
        Ok(())
    }
}
