//! Batch resolution with per-feature identity and partial failure.
//!
//! Batches apply a resolver to every feature independently: one feature
//! failing (unknown ELR, malformed mileage, out-of-coverage point) never
//! aborts the rest. Output order matches input order and every item carries
//! the caller's original `id`, so results can be correlated however the
//! batch was assembled. Size limits (1-1000 features upstream) are the
//! calling layer's concern, not the engine's.

use crate::units::{Mileage, MileageParts};
use crate::{Elr, GeoPoint, MatchResult, RailNetwork, ResolveError, SpatialRef};

/// A coordinate feature submitted for coordinate → mileage resolution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointFeature {
    /// Caller-chosen identifier, passed through uninterpreted.
    pub id: Option<String>,
    /// The point to resolve.
    pub point: GeoPoint,
}

/// A mileage feature submitted for mileage → coordinate resolution.
///
/// Mileage arrives as raw [`MileageParts`] so malformed unit input surfaces
/// as a per-feature failure rather than rejecting the whole batch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MileageFeature {
    /// Caller-chosen identifier, passed through uninterpreted.
    pub id: Option<String>,
    /// The line to resolve on.
    pub elr: Elr,
    /// The position along it, in raw caller units.
    pub mileage: MileageParts,
}

/// Per-feature outcome of [`RailNetwork::resolve_point_batch`].
///
/// A feature with no line in range yields `Ok` with an empty match list;
/// items are never omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBatchItem {
    /// The submitting feature's identifier.
    pub id: Option<String>,
    /// Ranked matches, or the per-feature failure.
    pub outcome: Result<Vec<MatchResult>, ResolveError>,
}

/// Per-feature outcome of [`RailNetwork::resolve_mileage_batch`].
#[derive(Debug, Clone, PartialEq)]
pub struct MileageBatchItem {
    /// The submitting feature's identifier.
    pub id: Option<String>,
    /// The resolved point, or the per-feature failure.
    pub outcome: Result<GeoPoint, ResolveError>,
}

impl RailNetwork {
    /// Applies [`RailNetwork::resolve_point`] to every feature.
    ///
    /// The output has exactly one item per input, in input order. The
    /// shared radius and target reference system apply to every feature.
    #[must_use]
    pub fn resolve_point_batch(
        &self,
        features: &[PointFeature],
        radius_metres: f64,
        target: SpatialRef,
    ) -> Vec<PointBatchItem> {
        features
            .iter()
            .map(|feature| PointBatchItem {
                id: feature.id.clone(),
                outcome: self.resolve_point(&feature.point, radius_metres, target),
            })
            .collect()
    }

    /// Applies [`RailNetwork::resolve_mileage`] to every feature,
    /// normalising each feature's raw mileage parts first.
    ///
    /// The output has exactly one item per input, in input order.
    #[must_use]
    pub fn resolve_mileage_batch(
        &self,
        features: &[MileageFeature],
        target: SpatialRef,
    ) -> Vec<MileageBatchItem> {
        features
            .iter()
            .map(|feature| MileageBatchItem {
                id: feature.id.clone(),
                outcome: Mileage::from_parts(&feature.mileage)
                    .map_err(ResolveError::from)
                    .and_then(|mileage| self.resolve_mileage(&feature.elr, mileage, target)),
            })
            .collect()
    }
}
