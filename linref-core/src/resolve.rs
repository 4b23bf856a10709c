//! The two resolvers: coordinate → mileage and mileage → coordinate.

use std::collections::HashMap;

use geo::Coord;
use thiserror::Error;

use crate::units::{Mileage, MileageError};
use crate::{Elr, GeoPoint, ProjectionError, RailNetwork, SpatialRef};

/// Search radius applied when the caller does not supply one.
pub const DEFAULT_SEARCH_RADIUS_METRES: f64 = 100.0;
/// Smallest accepted search radius; smaller requests are clamped up.
pub const MIN_SEARCH_RADIUS_METRES: f64 = 1.0;
/// Largest accepted search radius; larger requests are clamped down.
pub const MAX_SEARCH_RADIUS_METRES: f64 = 1_000.0;

/// Clamps a requested search radius to the supported range.
///
/// Out-of-range values are clamped rather than rejected; a non-finite
/// request falls back to [`DEFAULT_SEARCH_RADIUS_METRES`].
#[must_use]
pub fn clamp_search_radius(radius_metres: f64) -> f64 {
    if radius_metres.is_finite() {
        radius_metres.clamp(MIN_SEARCH_RADIUS_METRES, MAX_SEARCH_RADIUS_METRES)
    } else {
        DEFAULT_SEARCH_RADIUS_METRES
    }
}

/// One line matched by [`RailNetwork::resolve_point`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    /// The matched line.
    pub elr: Elr,
    /// Mileage of the closest position on that line.
    pub mileage: Mileage,
    /// The closest position itself, in the requested reference system.
    pub point: GeoPoint,
    /// Straight-line distance from the query point to `point`, in metres.
    pub distance_metres: f64,
}

/// Errors returned by the resolvers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The requested ELR is not in the network.
    #[error("unknown ELR {elr}")]
    UnknownElr {
        /// The requested code.
        elr: Elr,
    },
    /// The requested mileage falls outside the line's chainage extent.
    ///
    /// Callers conventionally surface this as "not found" rather than a
    /// hard fault.
    #[error(
        "mileage {requested_metres} m is outside line {elr} \
         ({start_metres} m to {end_metres} m)"
    )]
    OutOfRange {
        /// The requested line.
        elr: Elr,
        /// The requested mileage, in metres.
        requested_metres: f64,
        /// Chainage at the line's datum.
        start_metres: f64,
        /// Chainage at the line's end.
        end_metres: f64,
    },
    /// Coordinate conversion failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// Mileage normalisation failed.
    #[error(transparent)]
    Mileage(#[from] MileageError),
}

/// Closest approach of a query point to one line, before ranking.
#[derive(Clone, Copy)]
struct Candidate {
    distance: f64,
    chainage: f64,
    segment: usize,
    closest: Coord<f64>,
}

impl Candidate {
    /// Ordering for "best" candidates: nearer wins, then lower chainage,
    /// then earlier segment, keeping results deterministic when a point
    /// sits on a shared vertex of adjacent segments.
    fn beats(&self, other: &Self) -> bool {
        (self.distance, self.chainage, self.segment)
            < (other.distance, other.chainage, other.segment)
    }
}

/// Perpendicular projection of `point` onto the segment `a`-`b`, clamped to
/// the endpoints. Returns the projection fraction and the closest point.
fn project_onto_segment(point: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> (f64, Coord<f64>) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return (0.0, a);
    }
    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    (
        t,
        Coord {
            x: a.x + t * dx,
            y: a.y + t * dy,
        },
    )
}

fn planar_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

impl RailNetwork {
    /// Resolves a geographic point to the lines passing within
    /// `radius_metres` of it, closest first.
    ///
    /// The radius is clamped per [`clamp_search_radius`] before the index is
    /// queried. Each matched line contributes one [`MatchResult`] for its
    /// closest segment; results are sorted by distance ascending, with ties
    /// broken by ELR so equidistant lines come back in a stable order. An
    /// empty vector means no line lies within the radius; that is a normal
    /// outcome, not an error.
    ///
    /// # Errors
    /// Returns [`ResolveError::Projection`] when the query point cannot be
    /// converted to grid coordinates.
    pub fn resolve_point(
        &self,
        point: &GeoPoint,
        radius_metres: f64,
        target: SpatialRef,
    ) -> Result<Vec<MatchResult>, ResolveError> {
        let radius = clamp_search_radius(radius_metres);
        let origin = point.to_bng()?.coord;

        let mut best: HashMap<usize, Candidate> = HashMap::new();
        for segment in self.segments_within(origin, radius) {
            let (t, closest) = project_onto_segment(origin, segment.start, segment.end);
            let distance = planar_distance(origin, closest);
            if distance > radius {
                continue;
            }
            let chainage =
                segment.chainage_start + t * (segment.chainage_end - segment.chainage_start);
            let candidate = Candidate {
                distance,
                chainage,
                segment: segment.segment,
                closest,
            };
            best.entry(segment.line)
                .and_modify(|current| {
                    if candidate.beats(current) {
                        *current = candidate;
                    }
                })
                .or_insert(candidate);
        }

        let mut results = Vec::with_capacity(best.len());
        for (line_index, candidate) in best {
            let line = self.line_at(line_index);
            results.push(MatchResult {
                elr: line.elr().clone(),
                mileage: Mileage::from_metres(candidate.chainage)?,
                point: GeoPoint::bng(candidate.closest.x, candidate.closest.y).to_srs(target)?,
                distance_metres: candidate.distance,
            });
        }
        results.sort_by(|a, b| {
            a.distance_metres
                .total_cmp(&b.distance_metres)
                .then_with(|| a.elr.cmp(&b.elr))
        });
        Ok(results)
    }

    /// Resolves an ELR and mileage to the corresponding geographic point.
    ///
    /// The vertex bracket is found by binary search on chainage and the
    /// coordinate interpolated linearly within it, proportional to the
    /// chainage fraction.
    ///
    /// # Errors
    /// Returns [`ResolveError::UnknownElr`] when the ELR is not in the
    /// network and [`ResolveError::OutOfRange`] when the mileage falls
    /// outside the line's chainage extent.
    pub fn resolve_mileage(
        &self,
        elr: &Elr,
        mileage: Mileage,
        target: SpatialRef,
    ) -> Result<GeoPoint, ResolveError> {
        let line = self
            .line(elr)
            .ok_or_else(|| ResolveError::UnknownElr { elr: elr.clone() })?;
        let requested = mileage.metres();
        let start = line.start_chainage();
        let end = line.end_chainage();
        if requested < start || requested > end {
            return Err(ResolveError::OutOfRange {
                elr: elr.clone(),
                requested_metres: requested,
                start_metres: start,
                end_metres: end,
            });
        }

        let vertices = line.vertices();
        // First vertex whose chainage exceeds the target, giving the
        // bracket [upper - 1, upper]; clamped so the final vertex brackets
        // requests at the exact end of the line.
        let upper = vertices
            .partition_point(|v| v.chainage <= requested)
            .clamp(1, vertices.len() - 1);
        let a = vertices[upper - 1];
        let b = vertices[upper];
        let span = b.chainage - a.chainage;
        let t = if span > 0.0 {
            ((requested - a.chainage) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let coord = Coord {
            x: a.coord.x + t * (b.coord.x - a.coord.x),
            y: a.coord.y + t * (b.coord.y - a.coord.y),
        };
        Ok(GeoPoint::bng(coord.x, coord.y).to_srs(target)?)
    }
}
