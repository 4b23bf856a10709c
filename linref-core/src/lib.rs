//! Core linear referencing engine for the British railway network.
//!
//! The engine converts between geographic position and linear-reference
//! position: an Engineer's Line Reference ([`Elr`]) plus a [`Mileage`] along
//! that line. It is built from a read-only snapshot of line geometry
//! ([`Line`] values whose vertices carry cumulative chainage) and answers
//! four questions:
//!
//! - Which lines pass near this point, and at what mileage?
//!   ([`RailNetwork::resolve_point`])
//! - Where on the ground is this ELR and mileage?
//!   ([`RailNetwork::resolve_mileage`])
//! - The same two questions for an ordered batch of caller-identified
//!   features ([`RailNetwork::resolve_point_batch`],
//!   [`RailNetwork::resolve_mileage_batch`]).
//!
//! Coordinates are accepted and returned in either WGS84 (EPSG:4326) or
//! British National Grid (EPSG:27700); all internal geometry is planar BNG.
//! A [`RailNetwork`] is immutable after [`RailNetwork::build`] and safe to
//! share across threads.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use linref_core::{Elr, Line, Mileage, RailNetwork, SpatialRef, Vertex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let line = Line::new(
//!     Elr::new("ABC")?,
//!     vec![
//!         Vertex::new(Coord { x: 530_000.0, y: 180_000.0 }, 0.0),
//!         Vertex::new(Coord { x: 530_000.0, y: 182_000.0 }, 2_000.0),
//!     ],
//! )?;
//! let network = RailNetwork::build(vec![line])?;
//!
//! let point = network.resolve_mileage(
//!     &Elr::new("ABC")?,
//!     Mileage::from_metres(1_000.0)?,
//!     SpatialRef::Bng,
//! )?;
//! assert_eq!(point.coord, Coord { x: 530_000.0, y: 181_000.0 });
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod batch;
mod crs;
mod elr;
mod network;
mod resolve;
pub mod units;

#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use batch::{MileageBatchItem, MileageFeature, PointBatchItem, PointFeature};
pub use crs::{GeoPoint, ProjectionError, SpatialRef, SpatialRefError};
pub use elr::{Elr, ElrError};
pub use network::{Line, LineError, LineSummary, NetworkError, RailNetwork, Vertex};
pub use resolve::{
    DEFAULT_SEARCH_RADIUS_METRES, MAX_SEARCH_RADIUS_METRES, MIN_SEARCH_RADIUS_METRES, MatchResult,
    ResolveError, clamp_search_radius,
};
pub use units::{Mileage, MileageBreakdown, MileageError, MileageParts};
