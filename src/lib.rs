//! Facade crate for the linear referencing engine.
//!
//! Converts between geographic coordinates (WGS84 or British National
//! Grid) and linear-reference positions (Engineer's Line Reference plus
//! mileage) on a railway network, singly or in batches. This crate
//! re-exports the core engine types and exposes the optional network store
//! behind a feature flag.

#![forbid(unsafe_code)]

pub use linref_core::{
    DEFAULT_SEARCH_RADIUS_METRES, Elr, ElrError, GeoPoint, Line, LineError, LineSummary,
    MAX_SEARCH_RADIUS_METRES, MIN_SEARCH_RADIUS_METRES, MatchResult, Mileage, MileageBatchItem,
    MileageBreakdown, MileageError, MileageFeature, MileageParts, NetworkError, PointBatchItem,
    PointFeature, ProjectionError, RailNetwork, ResolveError, SpatialRef, SpatialRefError, Vertex,
    clamp_search_radius, units,
};

#[cfg(feature = "store-sqlite")]
pub use linref_core::store;
