//! Mileage unit conversion.
//!
//! A [`Mileage`] is a single scalar distance along a line, normalised to
//! metres. Callers supply raw unit parts (miles/chains/yards or
//! kilometres/metres) via [`MileageParts`] and read results back through
//! [`MileageBreakdown`], which carries both unit systems at once.
//!
//! Conversion uses the exact statutory constants: 1 mile = 1609.344 m =
//! 80 chains = 1760 yards; 1 chain = 20.1168 m.

use std::fmt;

use thiserror::Error;

/// Metres in one statute mile.
pub const METRES_PER_MILE: f64 = 1_609.344;
/// Metres in one chain (22 yards).
pub const METRES_PER_CHAIN: f64 = 20.116_8;
/// Metres in one yard.
pub const METRES_PER_YARD: f64 = 0.914_4;
/// Chains in one mile.
pub const CHAINS_PER_MILE: f64 = 80.0;
/// Yards in one chain.
pub const YARDS_PER_CHAIN: f64 = 22.0;

/// Errors returned when normalising caller-supplied mileage input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MileageError {
    /// No mileage part was supplied in either unit system.
    #[error("mileage requires at least one of miles, chains, yards, kilometres or metres")]
    Empty,
    /// The combined value was negative.
    #[error("mileage must not be negative (got {metres} m)")]
    Negative {
        /// The offending combined value in metres.
        metres: f64,
    },
    /// A part was NaN or infinite.
    #[error("mileage parts must be finite")]
    NonFinite,
}

/// Raw mileage input: any non-empty subset of the two unit systems.
///
/// Unspecified parts default to zero. When both imperial and metric parts
/// are present the imperial parts take precedence and the metric parts are
/// ignored; the upstream data feed mixed the two silently and this keeps
/// the precedence explicit rather than summing them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MileageParts {
    /// Statute miles.
    pub miles: Option<f64>,
    /// Chains (80 per mile).
    pub chains: Option<f64>,
    /// Yards (22 per chain).
    pub yards: Option<f64>,
    /// Kilometres.
    pub kilometres: Option<f64>,
    /// Metres.
    pub metres: Option<f64>,
}

impl MileageParts {
    /// True when any imperial part is present.
    #[must_use]
    pub const fn has_imperial(&self) -> bool {
        self.miles.is_some() || self.chains.is_some() || self.yards.is_some()
    }

    /// True when any metric part is present.
    #[must_use]
    pub const fn has_metric(&self) -> bool {
        self.kilometres.is_some() || self.metres.is_some()
    }
}

/// A position along a line, normalised to metres.
///
/// # Examples
///
/// ```
/// use linref_core::{Mileage, MileageParts};
///
/// # fn main() -> Result<(), linref_core::MileageError> {
/// let mileage = Mileage::from_parts(&MileageParts {
///     miles: Some(4.0),
///     chains: Some(50.0),
///     ..MileageParts::default()
/// })?;
/// assert!((mileage.metres() - 7_443.216).abs() < 1e-9);
///
/// let breakdown = mileage.breakdown();
/// assert_eq!((breakdown.miles, breakdown.chains, breakdown.yards), (4, 50, 0));
/// assert_eq!((breakdown.kilometres, breakdown.metres), (7, 443));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Mileage {
    metres: f64,
}

impl Mileage {
    /// Wraps an already-normalised distance in metres.
    ///
    /// # Errors
    /// Returns [`MileageError::Negative`] for negative values and
    /// [`MileageError::NonFinite`] for NaN or infinite values.
    pub fn from_metres(metres: f64) -> Result<Self, MileageError> {
        if !metres.is_finite() {
            return Err(MileageError::NonFinite);
        }
        if metres < 0.0 {
            return Err(MileageError::Negative { metres });
        }
        Ok(Self { metres })
    }

    /// Normalises raw mileage parts to metres.
    ///
    /// # Errors
    /// Returns [`MileageError::Empty`] when no part is supplied in either
    /// unit system, [`MileageError::NonFinite`] when any supplied part is
    /// NaN or infinite, and [`MileageError::Negative`] when the combined
    /// value is below zero.
    pub fn from_parts(parts: &MileageParts) -> Result<Self, MileageError> {
        let supplied = [
            parts.miles,
            parts.chains,
            parts.yards,
            parts.kilometres,
            parts.metres,
        ];
        if supplied.iter().all(Option::is_none) {
            return Err(MileageError::Empty);
        }
        if supplied.iter().flatten().any(|value| !value.is_finite()) {
            return Err(MileageError::NonFinite);
        }

        // Imperial precedence when both systems are present.
        let metres = if parts.has_imperial() {
            parts.miles.unwrap_or(0.0) * METRES_PER_MILE
                + parts.chains.unwrap_or(0.0) * METRES_PER_CHAIN
                + parts.yards.unwrap_or(0.0) * METRES_PER_YARD
        } else {
            parts.kilometres.unwrap_or(0.0) * 1_000.0 + parts.metres.unwrap_or(0.0)
        };

        Self::from_metres(metres)
    }

    /// Used for chainage values already validated by [`crate::Line`].
    pub(crate) const fn from_metres_unchecked(metres: f64) -> Self {
        Self { metres }
    }

    /// The normalised distance in metres.
    #[must_use]
    pub const fn metres(&self) -> f64 {
        self.metres
    }

    /// Renders the mileage in both unit systems simultaneously.
    ///
    /// Whole units are produced by successive remainder division; the
    /// smallest unit of each system (yards, remainder metres) is rounded
    /// half-up, carrying into the larger units where the rounding reaches a
    /// full chain, mile or kilometre.
    #[must_use]
    pub fn breakdown(&self) -> MileageBreakdown {
        let total = self.metres;

        let mut miles = (total / METRES_PER_MILE).floor();
        let after_miles = total - miles * METRES_PER_MILE;
        let mut chains = (after_miles / METRES_PER_CHAIN).floor();
        let after_chains = after_miles - chains * METRES_PER_CHAIN;
        let mut yards = round_half_up(after_chains / METRES_PER_YARD);
        if yards >= YARDS_PER_CHAIN {
            yards -= YARDS_PER_CHAIN;
            chains += 1.0;
        }
        if chains >= CHAINS_PER_MILE {
            chains -= CHAINS_PER_MILE;
            miles += 1.0;
        }

        let mut kilometres = (total / 1_000.0).floor();
        let mut metres = round_half_up(total - kilometres * 1_000.0);
        if metres >= 1_000.0 {
            metres -= 1_000.0;
            kilometres += 1.0;
        }

        MileageBreakdown {
            miles: miles as u64,
            chains: chains as u32,
            yards: yards as u32,
            kilometres: kilometres as u64,
            metres: metres as u32,
        }
    }
}

/// Round-half-up for non-negative values.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// A mileage rendered as whole units in both systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MileageBreakdown {
    /// Whole miles.
    pub miles: u64,
    /// Whole chains past the last mile (`0..80`).
    pub chains: u32,
    /// Yards past the last chain, rounded half-up (`0..22`).
    pub yards: u32,
    /// Whole kilometres.
    pub kilometres: u64,
    /// Metres past the last kilometre, rounded half-up (`0..1000`).
    pub metres: u32,
}

impl MileageBreakdown {
    /// Re-normalises the imperial representation back to a [`Mileage`].
    ///
    /// # Errors
    /// Propagates [`MileageError`] from [`Mileage::from_parts`]; whole-unit
    /// breakdowns are always valid input.
    pub fn to_mileage(&self) -> Result<Mileage, MileageError> {
        Mileage::from_parts(&MileageParts {
            miles: Some(self.miles as f64),
            chains: Some(f64::from(self.chains)),
            yards: Some(f64::from(self.yards)),
            ..MileageParts::default()
        })
    }
}

impl fmt::Display for MileageBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}mi {}ch {}yd ({}km {}m)",
            self.miles, self.chains, self.yards, self.kilometres, self.metres
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parts(
        miles: Option<f64>,
        chains: Option<f64>,
        yards: Option<f64>,
        kilometres: Option<f64>,
        metres: Option<f64>,
    ) -> MileageParts {
        MileageParts {
            miles,
            chains,
            yards,
            kilometres,
            metres,
        }
    }

    #[rstest]
    #[case(parts(Some(1.0), None, None, None, None), 1_609.344)]
    #[case(parts(None, Some(80.0), None, None, None), 1_609.344)]
    #[case(parts(None, None, Some(1_760.0), None, None), 1_609.344)]
    #[case(parts(Some(4.0), Some(50.0), None, None, None), 7_443.216)]
    #[case(parts(None, None, None, Some(2.0), Some(500.0)), 2_500.0)]
    #[case(parts(None, None, None, None, Some(0.0)), 0.0)]
    fn normalises_to_metres(#[case] input: MileageParts, #[case] expected: f64) {
        let mileage = Mileage::from_parts(&input).unwrap();
        assert!((mileage.metres() - expected).abs() < 1e-9);
    }

    #[rstest]
    fn imperial_takes_precedence_over_metric() {
        let mixed = parts(Some(1.0), None, None, Some(99.0), Some(999.0));
        let mileage = Mileage::from_parts(&mixed).unwrap();
        assert!((mileage.metres() - METRES_PER_MILE).abs() < 1e-9);
    }

    #[rstest]
    fn rejects_empty_parts() {
        assert_eq!(
            Mileage::from_parts(&MileageParts::default()),
            Err(MileageError::Empty)
        );
    }

    #[rstest]
    #[case(parts(Some(-1.0), None, None, None, None))]
    #[case(parts(None, None, None, None, Some(-0.5)))]
    fn rejects_negative_totals(#[case] input: MileageParts) {
        assert!(matches!(
            Mileage::from_parts(&input),
            Err(MileageError::Negative { .. })
        ));
    }

    #[rstest]
    #[case(parts(Some(f64::NAN), None, None, None, None))]
    #[case(parts(None, None, None, Some(f64::INFINITY), None))]
    fn rejects_non_finite_parts(#[case] input: MileageParts) {
        assert_eq!(Mileage::from_parts(&input), Err(MileageError::NonFinite));
    }

    #[rstest]
    fn rejects_negative_metres() {
        assert!(matches!(
            Mileage::from_metres(-1.0),
            Err(MileageError::Negative { .. })
        ));
    }

    #[rstest]
    #[case(0.0, (0, 0, 0), (0, 0))]
    #[case(7_443.216, (4, 50, 0), (7, 443))]
    #[case(1_609.344, (1, 0, 0), (1, 609))]
    #[case(20.116_8, (0, 1, 0), (0, 20))]
    #[case(10.058_4, (0, 0, 11), (0, 10))]
    fn breaks_down_into_both_systems(
        #[case] metres: f64,
        #[case] imperial: (u64, u32, u32),
        #[case] metric: (u64, u32),
    ) {
        let b = Mileage::from_metres(metres).unwrap().breakdown();
        assert_eq!((b.miles, b.chains, b.yards), imperial);
        assert_eq!((b.kilometres, b.metres), metric);
    }

    #[rstest]
    fn yard_rounding_carries_into_chains_and_miles() {
        // A hair under one mile: 79 chains plus 21.95 yards rounds to a
        // full chain, which carries all the way up to 1mi 0ch 0yd.
        let metres = 79.0 * METRES_PER_CHAIN + 21.95 * METRES_PER_YARD;
        let b = Mileage::from_metres(metres).unwrap().breakdown();
        assert_eq!((b.miles, b.chains, b.yards), (1, 0, 0));
    }

    #[rstest]
    fn metre_rounding_carries_into_kilometres() {
        let b = Mileage::from_metres(1_999.7).unwrap().breakdown();
        assert_eq!((b.kilometres, b.metres), (2, 0));
    }

    #[rstest]
    fn breakdown_round_trips_exactly() {
        let mileage = Mileage::from_parts(&parts(Some(4.0), Some(50.0), None, None, None)).unwrap();
        let breakdown = mileage.breakdown();
        assert_eq!(breakdown.to_mileage().unwrap().breakdown(), breakdown);
    }

    #[rstest]
    fn display_shows_both_systems() {
        let b = Mileage::from_metres(7_443.216).unwrap().breakdown();
        assert_eq!(b.to_string(), "4mi 50ch 0yd (7km 443m)");
    }
}
