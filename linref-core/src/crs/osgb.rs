//! WGS84 ↔ OSGB36 National Grid transform.
//!
//! Implements the Ordnance Survey's published formulae: the transverse
//! Mercator projection on the Airy 1830 ellipsoid for grid coordinates, and
//! a single seven-parameter Helmert transformation for the WGS84 ↔ OSGB36
//! datum shift. The Helmert step is accurate to a few metres across Great
//! Britain, which is ample for positioning against line geometry carrying
//! the same transform.

use geo::Coord;

// Airy 1830 ellipsoid (OSGB36).
const AIRY_A: f64 = 6_377_563.396;
const AIRY_B: f64 = 6_356_256.909;

// WGS84 ellipsoid.
const WGS84_A: f64 = 6_378_137.0;
const WGS84_B: f64 = 6_356_752.314_245;

// National Grid projection constants.
const SCALE_F0: f64 = 0.999_601_271_7;
const ORIGIN_LAT_DEG: f64 = 49.0;
const ORIGIN_LON_DEG: f64 = -2.0;
const FALSE_EASTING: f64 = 400_000.0;
const FALSE_NORTHING: f64 = -100_000.0;

// Helmert parameters, WGS84 → OSGB36. Translations in metres, rotations in
// arc-seconds, scale in parts per million.
const HELMERT_TX: f64 = -446.448;
const HELMERT_TY: f64 = 125.157;
const HELMERT_TZ: f64 = -542.060;
const HELMERT_RX_SEC: f64 = -0.150_2;
const HELMERT_RY_SEC: f64 = -0.247_0;
const HELMERT_RZ_SEC: f64 = -0.842_1;
const HELMERT_S_PPM: f64 = 20.489_4;

const ARC_SECOND: f64 = std::f64::consts::PI / (180.0 * 3_600.0);

/// Squared first eccentricity of an ellipsoid.
fn eccentricity_sq(a: f64, b: f64) -> f64 {
    (a * a - b * b) / (a * a)
}

/// WGS84 longitude/latitude (degrees) to BNG easting/northing (metres).
pub(super) fn wgs84_to_bng(coord: Coord<f64>) -> Coord<f64> {
    let (x, y, z) = geodetic_to_cartesian(
        coord.y.to_radians(),
        coord.x.to_radians(),
        WGS84_A,
        WGS84_B,
    );
    let (x, y, z) = helmert(x, y, z, 1.0);
    let (lat, lon) = cartesian_to_geodetic(x, y, z, AIRY_A, AIRY_B);
    tm_forward(lat, lon)
}

/// BNG easting/northing (metres) to WGS84 longitude/latitude (degrees).
pub(super) fn bng_to_wgs84(coord: Coord<f64>) -> Coord<f64> {
    let (lat, lon) = tm_inverse(coord.x, coord.y);
    let (x, y, z) = geodetic_to_cartesian(lat, lon, AIRY_A, AIRY_B);
    let (x, y, z) = helmert(x, y, z, -1.0);
    let (lat, lon) = cartesian_to_geodetic(x, y, z, WGS84_A, WGS84_B);
    Coord {
        x: lon.to_degrees(),
        y: lat.to_degrees(),
    }
}

/// Geodetic latitude/longitude (radians, height zero) to 3D cartesian.
fn geodetic_to_cartesian(lat: f64, lon: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let e_sq = eccentricity_sq(a, b);
    let sin_lat = lat.sin();
    let nu = a / (1.0 - e_sq * sin_lat * sin_lat).sqrt();
    (
        nu * lat.cos() * lon.cos(),
        nu * lat.cos() * lon.sin(),
        (1.0 - e_sq) * nu * sin_lat,
    )
}

/// 3D cartesian back to geodetic latitude/longitude (radians).
fn cartesian_to_geodetic(x: f64, y: f64, z: f64, a: f64, b: f64) -> (f64, f64) {
    let e_sq = eccentricity_sq(a, b);
    let p = x.hypot(y);
    let mut lat = (z / (p * (1.0 - e_sq))).atan();
    // A handful of iterations reaches double precision.
    loop {
        let sin_lat = lat.sin();
        let nu = a / (1.0 - e_sq * sin_lat * sin_lat).sqrt();
        let next = ((z + e_sq * nu * sin_lat) / p).atan();
        if (next - lat).abs() < 1e-14 {
            lat = next;
            break;
        }
        lat = next;
    }
    (lat, y.atan2(x))
}

/// Seven-parameter Helmert transform; `direction` is `1.0` for
/// WGS84 → OSGB36 and `-1.0` for the inverse.
fn helmert(x: f64, y: f64, z: f64, direction: f64) -> (f64, f64, f64) {
    let tx = direction * HELMERT_TX;
    let ty = direction * HELMERT_TY;
    let tz = direction * HELMERT_TZ;
    let rx = direction * HELMERT_RX_SEC * ARC_SECOND;
    let ry = direction * HELMERT_RY_SEC * ARC_SECOND;
    let rz = direction * HELMERT_RZ_SEC * ARC_SECOND;
    let s = 1.0 + direction * HELMERT_S_PPM * 1e-6;
    (
        tx + s * x - rz * y + ry * z,
        ty + rz * x + s * y - rx * z,
        tz - ry * x + rx * y + s * z,
    )
}

/// Meridional arc from the projection origin to `lat`.
fn meridional_arc(lat: f64) -> f64 {
    let lat0 = ORIGIN_LAT_DEG.to_radians();
    let n = (AIRY_A - AIRY_B) / (AIRY_A + AIRY_B);
    let n2 = n * n;
    let n3 = n2 * n;
    let d_lat = lat - lat0;
    let s_lat = lat + lat0;
    AIRY_B
        * SCALE_F0
        * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * d_lat
            - (3.0 * n + 3.0 * n2 + 2.625 * n3) * d_lat.sin() * s_lat.cos()
            + (1.875 * n2 + 1.875 * n3) * (2.0 * d_lat).sin() * (2.0 * s_lat).cos()
            - (35.0 / 24.0) * n3 * (3.0 * d_lat).sin() * (3.0 * s_lat).cos())
}

/// OSGB36 latitude/longitude (radians) to grid easting/northing.
fn tm_forward(lat: f64, lon: f64) -> Coord<f64> {
    let e_sq = eccentricity_sq(AIRY_A, AIRY_B);
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();
    let tan2 = tan_lat * tan_lat;
    let tan4 = tan2 * tan2;

    let nu = AIRY_A * SCALE_F0 / (1.0 - e_sq * sin_lat * sin_lat).sqrt();
    let rho =
        AIRY_A * SCALE_F0 * (1.0 - e_sq) / (1.0 - e_sq * sin_lat * sin_lat).powf(1.5);
    let eta2 = nu / rho - 1.0;

    let i = meridional_arc(lat) + FALSE_NORTHING;
    let ii = (nu / 2.0) * sin_lat * cos_lat;
    let iii = (nu / 24.0) * sin_lat * cos_lat.powi(3) * (5.0 - tan2 + 9.0 * eta2);
    let iii_a = (nu / 720.0) * sin_lat * cos_lat.powi(5) * (61.0 - 58.0 * tan2 + tan4);
    let iv = nu * cos_lat;
    let v = (nu / 6.0) * cos_lat.powi(3) * (nu / rho - tan2);
    let vi = (nu / 120.0)
        * cos_lat.powi(5)
        * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

    let d_lon = lon - ORIGIN_LON_DEG.to_radians();
    let d2 = d_lon * d_lon;
    Coord {
        x: FALSE_EASTING + iv * d_lon + v * d_lon * d2 + vi * d_lon * d2 * d2,
        y: i + ii * d2 + iii * d2 * d2 + iii_a * d2 * d2 * d2,
    }
}

/// Grid easting/northing to OSGB36 latitude/longitude (radians).
fn tm_inverse(easting: f64, northing: f64) -> (f64, f64) {
    let e_sq = eccentricity_sq(AIRY_A, AIRY_B);
    let lat0 = ORIGIN_LAT_DEG.to_radians();

    let mut lat = lat0 + (northing - FALSE_NORTHING) / (AIRY_A * SCALE_F0);
    loop {
        let m = meridional_arc(lat);
        let delta = northing - FALSE_NORTHING - m;
        if delta.abs() < 1e-5 {
            break;
        }
        lat += delta / (AIRY_A * SCALE_F0);
    }

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let sec_lat = 1.0 / cos_lat;
    let tan_lat = lat.tan();
    let tan2 = tan_lat * tan_lat;
    let tan4 = tan2 * tan2;
    let tan6 = tan4 * tan2;

    let nu = AIRY_A * SCALE_F0 / (1.0 - e_sq * sin_lat * sin_lat).sqrt();
    let rho =
        AIRY_A * SCALE_F0 * (1.0 - e_sq) / (1.0 - e_sq * sin_lat * sin_lat).powf(1.5);
    let eta2 = nu / rho - 1.0;

    let vii = tan_lat / (2.0 * rho * nu);
    let viii = tan_lat / (24.0 * rho * nu.powi(3))
        * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
    let ix = tan_lat / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
    let x_term = sec_lat / nu;
    let xi = sec_lat / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
    let xii = sec_lat / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
    let xii_a = sec_lat / (5_040.0 * nu.powi(7))
        * (61.0 + 662.0 * tan2 + 1_320.0 * tan4 + 720.0 * tan6);

    let de = easting - FALSE_EASTING;
    let de2 = de * de;
    let out_lat = lat - vii * de2 + viii * de2 * de2 - ix * de2 * de2 * de2;
    let out_lon = ORIGIN_LON_DEG.to_radians() + x_term * de - xi * de * de2
        + xii * de * de2 * de2
        - xii_a * de * de2 * de2 * de2;
    (out_lat, out_lon)
}
