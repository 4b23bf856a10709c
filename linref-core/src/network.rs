//! The line network: validated geometry plus a segment-level spatial index.
//!
//! A [`RailNetwork`] is built once from a set of [`Line`] values and is
//! read-only afterwards. Each line's vertices carry cumulative chainage;
//! validation happens at construction so invalid geometry cannot enter the
//! index. The index itself is an R*-tree over per-segment bounding boxes,
//! which the resolvers query by search-circle bounding box and then re-rank
//! by exact distance.

use std::collections::HashMap;

use geo::Coord;
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;

use crate::units::Mileage;
use crate::{Elr, GeoPoint};

/// A polyline vertex: a BNG coordinate plus cumulative chainage in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// Easting/northing on the British National Grid.
    pub coord: Coord<f64>,
    /// Distance along the line from its datum, in metres.
    pub chainage: f64,
}

impl Vertex {
    /// A vertex at `coord` with the given chainage.
    #[must_use]
    pub const fn new(coord: Coord<f64>, chainage: f64) -> Self {
        Self { coord, chainage }
    }
}

/// Errors returned by [`Line::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    /// Fewer than two vertices were supplied.
    #[error("line {elr} requires at least two vertices (got {count})")]
    TooFewVertices {
        /// The line's ELR.
        elr: Elr,
        /// Number of vertices supplied.
        count: usize,
    },
    /// A coordinate or chainage value was NaN or infinite.
    #[error("line {elr} has a non-finite value at vertex {index}")]
    NonFinite {
        /// The line's ELR.
        elr: Elr,
        /// Index of the offending vertex.
        index: usize,
    },
    /// A chainage value was negative.
    #[error("line {elr} has a negative chainage at vertex {index}")]
    NegativeChainage {
        /// The line's ELR.
        elr: Elr,
        /// Index of the offending vertex.
        index: usize,
    },
    /// Chainage decreased along the vertex sequence.
    #[error("line {elr} has non-monotonic chainage at vertex {index}")]
    NonMonotonicChainage {
        /// The line's ELR.
        elr: Elr,
        /// Index of the vertex whose chainage is below its predecessor's.
        index: usize,
    },
}

/// One railway line: an [`Elr`] plus an ordered, chainage-annotated
/// polyline.
///
/// Construction validates the invariants the resolvers depend on, so a
/// `Line` value is always well-formed: at least two vertices, finite
/// non-negative chainage, monotonically non-decreasing along the sequence.
/// The chainage datum need not be zero; real ELR datums are arbitrary.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    elr: Elr,
    vertices: Vec<Vertex>,
}

impl Line {
    /// Validates and constructs a [`Line`].
    ///
    /// # Errors
    /// Returns a [`LineError`] describing the first violated invariant.
    pub fn new(elr: Elr, vertices: Vec<Vertex>) -> Result<Self, LineError> {
        if vertices.len() < 2 {
            return Err(LineError::TooFewVertices {
                elr,
                count: vertices.len(),
            });
        }
        let mut previous: Option<f64> = None;
        for (index, vertex) in vertices.iter().enumerate() {
            if !vertex.coord.x.is_finite()
                || !vertex.coord.y.is_finite()
                || !vertex.chainage.is_finite()
            {
                return Err(LineError::NonFinite { elr, index });
            }
            if vertex.chainage < 0.0 {
                return Err(LineError::NegativeChainage { elr, index });
            }
            if previous.is_some_and(|p| vertex.chainage < p) {
                return Err(LineError::NonMonotonicChainage { elr, index });
            }
            previous = Some(vertex.chainage);
        }
        Ok(Self { elr, vertices })
    }

    /// The line's ELR.
    #[must_use]
    pub const fn elr(&self) -> &Elr {
        &self.elr
    }

    /// The chainage-annotated vertices, in traversal order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Chainage of the first vertex (the line's datum).
    #[must_use]
    pub fn start_chainage(&self) -> f64 {
        self.vertices[0].chainage
    }

    /// Chainage of the last vertex.
    #[must_use]
    pub fn end_chainage(&self) -> f64 {
        self.vertices[self.vertices.len() - 1].chainage
    }

    /// Total chainage covered by the line.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.end_chainage() - self.start_chainage()
    }
}

/// Per-ELR metadata: the extent of a line in mileage and on the ground.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSummary {
    /// The line's ELR.
    pub elr: Elr,
    /// Mileage at the line's datum.
    pub start: Mileage,
    /// Mileage at the line's end.
    pub end: Mileage,
    /// Location of the first vertex.
    pub start_point: GeoPoint,
    /// Location of the last vertex.
    pub end_point: GeoPoint,
}

/// Errors returned by [`RailNetwork::build`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// Two lines shared the same ELR.
    #[error("duplicate ELR {elr} in network data")]
    DuplicateElr {
        /// The repeated code.
        elr: Elr,
    },
}

/// One line segment as stored in the spatial index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentRef {
    /// Index of the owning line in `RailNetwork::lines`.
    pub(crate) line: usize,
    /// Index of the segment within the line.
    pub(crate) segment: usize,
    pub(crate) start: Coord<f64>,
    pub(crate) end: Coord<f64>,
    pub(crate) chainage_start: f64,
    pub(crate) chainage_end: f64,
}

impl RTreeObject for SegmentRef {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.start.x.min(self.end.x), self.start.y.min(self.end.y)],
            [self.start.x.max(self.end.x), self.start.y.max(self.end.y)],
        )
    }
}

/// The immutable, indexed line network.
///
/// Built once at startup and shared read-only for the engine's lifetime; no
/// operation mutates it, so it is freely usable from concurrent resolutions.
#[derive(Debug)]
pub struct RailNetwork {
    lines: Vec<Line>,
    by_elr: HashMap<Elr, usize>,
    index: RTree<SegmentRef>,
}

impl RailNetwork {
    /// Indexes a set of validated lines.
    ///
    /// # Errors
    /// Returns [`NetworkError::DuplicateElr`] when two lines carry the same
    /// code. Malformed geometry cannot reach this point; it is rejected by
    /// [`Line::new`].
    pub fn build(lines: Vec<Line>) -> Result<Self, NetworkError> {
        let mut by_elr = HashMap::with_capacity(lines.len());
        let mut segments = Vec::new();
        for (line_index, line) in lines.iter().enumerate() {
            if by_elr.insert(line.elr().clone(), line_index).is_some() {
                return Err(NetworkError::DuplicateElr {
                    elr: line.elr().clone(),
                });
            }
            for (segment, pair) in line.vertices().windows(2).enumerate() {
                segments.push(SegmentRef {
                    line: line_index,
                    segment,
                    start: pair[0].coord,
                    end: pair[1].coord,
                    chainage_start: pair[0].chainage,
                    chainage_end: pair[1].chainage,
                });
            }
        }
        Ok(Self {
            lines,
            by_elr,
            index: RTree::bulk_load(segments),
        })
    }

    /// Looks up a line by ELR.
    #[must_use]
    pub fn line(&self, elr: &Elr) -> Option<&Line> {
        self.by_elr.get(elr).map(|&index| &self.lines[index])
    }

    /// All lines, in build order.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of lines in the network.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the network holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Per-ELR extents, sorted by ELR.
    #[must_use]
    pub fn summaries(&self) -> Vec<LineSummary> {
        let mut summaries: Vec<LineSummary> = self
            .lines
            .iter()
            .map(|line| {
                let first = line.vertices()[0];
                let last = line.vertices()[line.vertices().len() - 1];
                LineSummary {
                    elr: line.elr().clone(),
                    start: Mileage::from_metres_unchecked(first.chainage),
                    end: Mileage::from_metres_unchecked(last.chainage),
                    start_point: GeoPoint::bng(first.coord.x, first.coord.y),
                    end_point: GeoPoint::bng(last.coord.x, last.coord.y),
                }
            })
            .collect();
        summaries.sort_by(|a, b| a.elr.cmp(&b.elr));
        summaries
    }

    pub(crate) fn line_at(&self, index: usize) -> &Line {
        &self.lines[index]
    }

    /// Every indexed segment whose bounding box intersects the bounding box
    /// of the search circle. Callers re-rank by exact distance; ordering
    /// here is unspecified.
    pub(crate) fn segments_within(
        &self,
        centre: Coord<f64>,
        radius: f64,
    ) -> impl Iterator<Item = &SegmentRef> + '_ {
        let envelope = AABB::from_corners(
            [centre.x - radius, centre.y - radius],
            [centre.x + radius, centre.y + radius],
        );
        self.index.locate_in_envelope_intersecting(&envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn elr(code: &str) -> Elr {
        Elr::new(code).unwrap()
    }

    fn vertex(x: f64, y: f64, chainage: f64) -> Vertex {
        Vertex::new(Coord { x, y }, chainage)
    }

    fn straight(code: &str) -> Line {
        Line::new(
            elr(code),
            vec![vertex(0.0, 0.0, 0.0), vertex(0.0, 1_000.0, 1_000.0)],
        )
        .unwrap()
    }

    #[rstest]
    fn rejects_single_vertex_line() {
        let result = Line::new(elr("ONE"), vec![vertex(0.0, 0.0, 0.0)]);
        assert!(matches!(
            result,
            Err(LineError::TooFewVertices { count: 1, .. })
        ));
    }

    #[rstest]
    fn rejects_decreasing_chainage() {
        let result = Line::new(
            elr("BAD"),
            vec![
                vertex(0.0, 0.0, 100.0),
                vertex(0.0, 50.0, 150.0),
                vertex(0.0, 90.0, 140.0),
            ],
        );
        assert!(matches!(
            result,
            Err(LineError::NonMonotonicChainage { index: 2, .. })
        ));
    }

    #[rstest]
    fn accepts_plateaued_chainage() {
        // Equal consecutive chainage is tolerated; interpolation treats the
        // zero-span segment as a point.
        let result = Line::new(
            elr("FLT"),
            vec![
                vertex(0.0, 0.0, 0.0),
                vertex(0.0, 10.0, 10.0),
                vertex(5.0, 10.0, 10.0),
                vertex(5.0, 20.0, 20.0),
            ],
        );
        assert!(result.is_ok());
    }

    #[rstest]
    fn rejects_negative_chainage() {
        let result = Line::new(
            elr("NEG"),
            vec![vertex(0.0, 0.0, -5.0), vertex(0.0, 10.0, 5.0)],
        );
        assert!(matches!(
            result,
            Err(LineError::NegativeChainage { index: 0, .. })
        ));
    }

    #[rstest]
    fn rejects_non_finite_coordinates() {
        let result = Line::new(
            elr("NAN"),
            vec![vertex(0.0, f64::NAN, 0.0), vertex(0.0, 10.0, 10.0)],
        );
        assert!(matches!(result, Err(LineError::NonFinite { index: 0, .. })));
    }

    #[rstest]
    fn line_reports_datum_and_length() {
        let line = Line::new(
            elr("DTM"),
            vec![vertex(0.0, 0.0, 500.0), vertex(0.0, 250.0, 750.0)],
        )
        .unwrap();
        assert_eq!(line.start_chainage(), 500.0);
        assert_eq!(line.end_chainage(), 750.0);
        assert_eq!(line.length(), 250.0);
    }

    #[rstest]
    fn build_rejects_duplicate_elrs() {
        let result = RailNetwork::build(vec![straight("DUP"), straight("DUP")]);
        assert!(matches!(result, Err(NetworkError::DuplicateElr { .. })));
    }

    #[rstest]
    fn build_accepts_empty_network() {
        let network = RailNetwork::build(Vec::new()).unwrap();
        assert!(network.is_empty());
        assert!(network.summaries().is_empty());
        assert_eq!(
            network.segments_within(Coord { x: 0.0, y: 0.0 }, 100.0).count(),
            0
        );
    }

    #[rstest]
    fn looks_up_lines_by_elr() {
        let network = RailNetwork::build(vec![straight("AAA"), straight("BBB")]).unwrap();
        assert_eq!(network.len(), 2);
        assert!(network.line(&elr("AAA")).is_some());
        assert!(network.line(&elr("ZZZ")).is_none());
    }

    #[rstest]
    fn segments_within_finds_nearby_geometry_only() {
        let network = RailNetwork::build(vec![Line::new(
            elr("SEG"),
            vec![
                vertex(0.0, 0.0, 0.0),
                vertex(0.0, 100.0, 100.0),
                vertex(0.0, 200.0, 200.0),
            ],
        )
        .unwrap()])
        .unwrap();

        let near: Vec<_> = network
            .segments_within(Coord { x: 10.0, y: 50.0 }, 20.0)
            .collect();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].segment, 0);

        let far = network.segments_within(Coord { x: 500.0, y: 500.0 }, 20.0);
        assert_eq!(far.count(), 0);
    }

    #[rstest]
    fn summaries_are_sorted_by_elr() {
        let network = RailNetwork::build(vec![straight("BBB"), straight("AAA")]).unwrap();
        let summaries = network.summaries();
        let codes: Vec<_> = summaries.iter().map(|s| s.elr.as_str()).collect();
        assert_eq!(codes, vec!["AAA", "BBB"]);
        assert_eq!(summaries[0].start.metres(), 0.0);
        assert_eq!(summaries[0].end.metres(), 1_000.0);
    }

    #[test]
    fn network_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RailNetwork>();
    }
}
