//! Test fixtures: small synthetic networks with known geometry.
//!
//! The sample network is laid out in BNG coordinates so expected distances
//! and chainages can be asserted exactly, with the `FTC` line anchored to a
//! real WGS84 reference point near Folkestone.

use geo::Coord;

use crate::units::{METRES_PER_CHAIN, METRES_PER_MILE};
use crate::{Elr, GeoPoint, Line, RailNetwork, Vertex};

/// WGS84 longitude of the reference query point near Folkestone.
pub const FOLKESTONE_LON: f64 = 1.141_28;
/// WGS84 latitude of the reference query point near Folkestone.
pub const FOLKESTONE_LAT: f64 = 51.095_52;

/// Chainage of the `FTC` line at its closest approach to the reference
/// point: 4 miles 50 chains.
#[must_use]
pub fn ftc_reference_chainage() -> f64 {
    4.0 * METRES_PER_MILE + 50.0 * METRES_PER_CHAIN
}

/// Perpendicular offset of the `FTC` line from the reference point, metres.
pub const FTC_OFFSET_METRES: f64 = 5.0;

/// An [`Elr`] from a known-good code.
///
/// # Panics
/// Panics when the code is invalid; fixtures should fail fast.
#[must_use]
pub fn elr(code: &str) -> Elr {
    Elr::new(code).expect("fixture ELR code must be valid")
}

/// A [`Vertex`] from bare ordinates.
#[must_use]
pub fn vertex(x: f64, y: f64, chainage: f64) -> Vertex {
    Vertex::new(Coord { x, y }, chainage)
}

/// A straight north-south line passing `offset_east` metres east of
/// `through`, with the given chainage at the closest approach and
/// `half_length` metres of line either side of it.
///
/// # Panics
/// Panics when the resulting geometry is invalid; fixtures should fail
/// fast.
#[must_use]
pub fn north_south_line(
    code: &str,
    through: Coord<f64>,
    offset_east: f64,
    chainage_at_closest: f64,
    half_length: f64,
) -> Line {
    let x = through.x + offset_east;
    Line::new(
        elr(code),
        vec![
            vertex(x, through.y - half_length, chainage_at_closest - half_length),
            vertex(x, through.y + half_length, chainage_at_closest + half_length),
        ],
    )
    .expect("fixture line geometry must be valid")
}

/// The BNG position of the Folkestone reference point.
///
/// # Panics
/// Panics when projection fails; the reference point is well inside
/// coverage.
#[must_use]
pub fn folkestone_bng() -> Coord<f64> {
    GeoPoint::wgs84(FOLKESTONE_LON, FOLKESTONE_LAT)
        .to_bng()
        .expect("reference point projects")
        .coord
}

/// A small network with known answers:
///
/// - `FTC` runs north-south [`FTC_OFFSET_METRES`] east of the Folkestone
///   reference point, at 4 miles 50 chains there.
/// - `AAA` and `BBB` are parallel lines 10 m either side of BNG
///   (530000, 180000), equidistant from it, for tie-break assertions.
///
/// # Panics
/// Panics when fixture geometry fails validation.
#[must_use]
pub fn sample_network() -> RailNetwork {
    let folkestone = folkestone_bng();
    let tie_centre = Coord {
        x: 530_000.0,
        y: 180_000.0,
    };
    let lines = vec![
        north_south_line(
            "FTC",
            folkestone,
            FTC_OFFSET_METRES,
            ftc_reference_chainage(),
            1_000.0,
        ),
        north_south_line("AAA", tie_centre, 10.0, 2_000.0, 500.0),
        north_south_line("BBB", tie_centre, -10.0, 3_000.0, 500.0),
    ];
    RailNetwork::build(lines).expect("fixture network builds")
}
