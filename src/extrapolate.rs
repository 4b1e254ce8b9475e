//! Client-side prediction of resource amounts between server syncs.
//!
//! Pure functions only. Elapsed time is always measured from the snapshot's
//! reception stamp, never accumulated tick by tick, so frame jitter cannot
//! make the displayed value drift.

use crate::snapshot::{Resource, Snapshot};

/// Amount of `resource` to show `elapsed_seconds` after its snapshot arrived,
/// clamped to `0..=maximum`.
pub fn displayed_amount(resource: &Resource, elapsed_seconds: f64) -> f64 {
    let amount = resource.owned + elapsed_seconds * resource.income;
    if amount < 0.0 {
        return 0.0;
    }
    match resource.maximum {
        Some(maximum) if amount > maximum => maximum,
        _ => amount,
    }
}

/// Seconds since `snapshot` was received. Never negative, even if the clock
/// was adjusted backwards.
pub fn elapsed_seconds(snapshot: &Snapshot, now: f64) -> f64 {
    (now - snapshot.received_at()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(owned: f64, income: f64, maximum: Option<f64>) -> Resource {
        Resource {
            name: "gold".into(),
            owned,
            income,
            maximum,
        }
    }

    #[test]
    fn grows_linearly_below_cap() {
        assert_eq!(displayed_amount(&res(10.0, 2.0, Some(100.0)), 5.0), 20.0);
    }

    #[test]
    fn clamps_at_maximum() {
        assert_eq!(displayed_amount(&res(98.0, 5.0, Some(100.0)), 10.0), 100.0);
    }

    #[test]
    fn depletes_to_zero_without_maximum() {
        assert_eq!(displayed_amount(&res(3.0, -1.0, None), 10.0), 0.0);
    }

    #[test]
    fn zero_elapsed_is_identity() {
        let r = res(42.125, 7.0, Some(50.0));
        assert_eq!(displayed_amount(&r, 0.0), 42.125);
    }

    #[test]
    fn unbounded_growth_is_not_clamped() {
        assert_eq!(displayed_amount(&res(0.0, 1e6, None), 1e3), 1e9);
    }

    #[test]
    fn elapsed_is_measured_from_reception() {
        let snap = crate::snapshot::Snapshot::new(
            crate::snapshot::GameState {
                resources: vec![],
                buildings: vec![],
                upgrades: vec![],
            },
            100.0,
            0,
        )
        .unwrap();
        assert_eq!(elapsed_seconds(&snap, 102.5), 2.5);
        assert_eq!(elapsed_seconds(&snap, 99.0), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_resource() -> impl Strategy<Value = Resource> {
        (0.0f64..1e6, -1e4f64..1e4, prop::option::of(0.0f64..1e6)).prop_map(
            |(owned, income, maximum)| {
                // Snapshots arrive with owned already inside its bound.
                let owned = match maximum {
                    Some(m) => owned.min(m),
                    None => owned,
                };
                Resource {
                    name: "r".into(),
                    owned,
                    income,
                    maximum,
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_always_within_bounds(r in arb_resource(), elapsed in 0.0f64..1e5) {
            let shown = displayed_amount(&r, elapsed);
            prop_assert!(shown >= 0.0, "got {}", shown);
            if let Some(m) = r.maximum {
                prop_assert!(shown <= m, "got {} above {}", shown, m);
            }
        }

        #[test]
        fn prop_identity_at_zero(r in arb_resource()) {
            prop_assert_eq!(displayed_amount(&r, 0.0), r.owned);
        }

        #[test]
        fn prop_unbounded_positive_income_strictly_increases(
            owned in 0.0f64..1e6,
            income in 0.01f64..1e4,
            t1 in 0.0f64..1e4,
            dt in 0.01f64..1e4,
        ) {
            let r = Resource { name: "r".into(), owned, income, maximum: None };
            prop_assert!(displayed_amount(&r, t1 + dt) > displayed_amount(&r, t1));
        }

        #[test]
        fn prop_non_decreasing_for_non_negative_income(
            r in arb_resource(),
            t1 in 0.0f64..1e4,
            dt in 0.0f64..1e4,
        ) {
            prop_assume!(r.income >= 0.0);
            prop_assert!(displayed_amount(&r, t1 + dt) >= displayed_amount(&r, t1));
        }
    }
}
