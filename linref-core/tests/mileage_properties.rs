//! Property-based tests for mileage unit handling.
//!
//! These tests use `proptest` to assert invariants that must hold for all
//! valid mileage inputs, complementing the unit tests on specific values.
//!
//! # Invariants tested
//!
//! - **Imperial round-trip:** Whole miles/chains/yards survive conversion to
//!   metres and back.
//! - **Metric round-trip:** Whole kilometres/metres survive likewise.
//! - **Idempotency:** Re-breaking a breakdown down keeps its imperial parts.
//! - **Precedence:** Imperial parts win when both unit families are given.
//! - **Range:** Breakdown components stay inside their carry bounds.

use linref_core::{Mileage, MileageParts};
use proptest::prelude::*;

fn imperial_parts(miles: u64, chains: u32, yards: u32) -> MileageParts {
    MileageParts {
        miles: Some(miles as f64),
        chains: Some(f64::from(chains)),
        yards: Some(f64::from(yards)),
        ..MileageParts::default()
    }
}

fn metric_parts(kilometres: u64, metres: u32) -> MileageParts {
    MileageParts {
        kilometres: Some(kilometres as f64),
        metres: Some(f64::from(metres)),
        ..MileageParts::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn whole_imperial_parts_round_trip(
        miles in 0_u64..=200,
        chains in 0_u32..80,
        yards in 0_u32..22,
    ) {
        let mileage = Mileage::from_parts(&imperial_parts(miles, chains, yards))
            .expect("whole imperial parts are valid");
        let breakdown = mileage.breakdown();
        prop_assert_eq!(breakdown.miles, miles);
        prop_assert_eq!(breakdown.chains, chains);
        prop_assert_eq!(breakdown.yards, yards);
    }

    #[test]
    fn whole_metric_parts_round_trip(
        kilometres in 0_u64..=500,
        metres in 0_u32..1_000,
    ) {
        let mileage = Mileage::from_parts(&metric_parts(kilometres, metres))
            .expect("whole metric parts are valid");
        let breakdown = mileage.breakdown();
        prop_assert_eq!(breakdown.kilometres, kilometres);
        prop_assert_eq!(breakdown.metres, metres);
    }

    // Restricted to the imperial components: `to_mileage` re-normalises
    // from them alone, so the derived metric fields may shift by the yard
    // rounding.
    #[test]
    fn imperial_breakdown_is_idempotent(metres in 0.0_f64..2_000_000.0) {
        let mileage = Mileage::from_metres(metres).expect("finite non-negative");
        let first = mileage.breakdown();
        let second = first
            .to_mileage()
            .expect("whole-unit breakdown is valid input")
            .breakdown();
        prop_assert_eq!(
            (first.miles, first.chains, first.yards),
            (second.miles, second.chains, second.yards)
        );
    }

    #[test]
    fn imperial_parts_take_precedence_over_metric(
        miles in 0_u64..=200,
        kilometres in 1_u64..=500,
    ) {
        let parts = MileageParts {
            miles: Some(miles as f64),
            kilometres: Some(kilometres as f64),
            ..MileageParts::default()
        };
        let mileage = Mileage::from_parts(&parts).expect("valid parts");
        let imperial_only = Mileage::from_parts(&MileageParts {
            miles: Some(miles as f64),
            ..MileageParts::default()
        })
        .expect("valid parts");
        prop_assert_eq!(mileage, imperial_only);
    }

    #[test]
    fn breakdown_components_respect_carry_bounds(metres in 0.0_f64..2_000_000.0) {
        let breakdown = Mileage::from_metres(metres)
            .expect("finite non-negative")
            .breakdown();
        prop_assert!(breakdown.chains < 80);
        prop_assert!(breakdown.yards < 22);
        prop_assert!(breakdown.metres < 1_000);
    }
}
