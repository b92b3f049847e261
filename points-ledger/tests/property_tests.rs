//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Point conservation: Σ(balances) == Σ(outstanding points)
//! - All-or-nothing: rejected spends leave state untouched
//! - Oldest-first: spends drain contributions in timestamp order
//! - Exactness: a successful spend removes exactly the requested points

use chrono::{DateTime, Duration, TimeZone, Utc};
use points_ledger::{Config, Contribution, Error, PointsLedger, SpendAllocator};
use proptest::prelude::*;

/// Strategy for generating payers from a small pool (so payers repeat)
fn payer_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("DANNON".to_string()),
        Just("UNILEVER".to_string()),
        Just("MILLER COORS".to_string()),
        Just("KRAFT".to_string()),
    ]
}

/// Strategy for generating timestamps (coarse, so ties are common)
fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..48).prop_map(|hours| {
        Utc.with_ymd_and_hms(2020, 10, 31, 0, 0, 0).unwrap() + Duration::hours(hours)
    })
}

/// Strategy for generating contributions, mostly positive with some corrections
fn contribution_strategy() -> impl Strategy<Value = Contribution> {
    (
        payer_strategy(),
        prop_oneof![4 => 1i64..10_000, 1 => -500i64..=0],
        timestamp_strategy(),
    )
        .prop_map(|(payer, points, timestamp)| Contribution::new(payer.as_str(), points, timestamp))
}

fn build_allocator(contributions: &[Contribution]) -> SpendAllocator {
    let mut allocator = SpendAllocator::new();
    for contribution in contributions {
        allocator.record_contribution(contribution.clone()).unwrap();
    }
    allocator
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: Balances always equal the points left on outstanding contributions
    #[test]
    fn prop_conservation(
        contributions in prop::collection::vec(contribution_strategy(), 1..40),
        spends in prop::collection::vec(0i64..5_000, 1..10),
    ) {
        let mut allocator = build_allocator(&contributions);
        prop_assert!(allocator.check_conservation().is_ok());

        for amount in spends {
            let _ = allocator.allocate_spend(amount);
            prop_assert!(allocator.check_conservation().is_ok());
            let pending: i64 = allocator.pending_contributions().iter().map(|c| c.points).sum();
            prop_assert_eq!(allocator.total(), pending);
            prop_assert_eq!(allocator.balances().total(), pending);
        }
    }

    /// Property: A successful spend removes exactly the requested points
    #[test]
    fn prop_spend_is_exact(
        contributions in prop::collection::vec(contribution_strategy(), 1..40),
        fraction in 0.0f64..=1.0,
    ) {
        let mut allocator = build_allocator(&contributions);
        let before = allocator.total();
        prop_assume!(before > 0);

        let amount = ((before as f64) * fraction) as i64;
        let spent = allocator.allocate_spend(amount).unwrap();

        prop_assert_eq!(spent.total(), -amount);
        prop_assert_eq!(allocator.total(), before - amount);
        for (payer, delta) in spent.iter() {
            let old = contributions
                .iter()
                .filter(|c| &c.payer == payer)
                .map(|c| c.points)
                .sum::<i64>();
            prop_assert_eq!(allocator.balances().get(payer.as_str()), Some(old + delta));
        }
    }

    /// Property: Overspending is rejected and leaves state untouched
    #[test]
    fn prop_overspend_all_or_nothing(
        contributions in prop::collection::vec(contribution_strategy(), 0..40),
        excess in 1i64..10_000,
    ) {
        let mut allocator = build_allocator(&contributions);
        let balances = allocator.balances();
        let pending = allocator.pending_contributions();
        let amount = allocator.total().max(0) + excess;

        let result = allocator.allocate_spend(amount);
        let is_insufficient = matches!(result, Err(Error::InsufficientPoints { .. }));
        prop_assert!(is_insufficient);
        prop_assert_eq!(allocator.balances(), balances);
        prop_assert_eq!(allocator.pending_contributions(), pending);
    }

    /// Property: Negative spends are rejected without mutation
    #[test]
    fn prop_negative_spend_rejected(
        contributions in prop::collection::vec(contribution_strategy(), 0..20),
        amount in i64::MIN / 2..0,
    ) {
        let mut allocator = build_allocator(&contributions);
        let pending = allocator.pending_contributions();

        let is_invalid = matches!(allocator.allocate_spend(amount), Err(Error::InvalidSpend(_)));
        prop_assert!(is_invalid);
        prop_assert_eq!(allocator.pending_contributions(), pending);
    }

    /// Property: Outstanding contributions stay sorted and nothing older than the head survives
    #[test]
    fn prop_oldest_first(
        contributions in prop::collection::vec(
            (payer_strategy(), 1i64..1_000, timestamp_strategy())
                .prop_map(|(p, pts, ts)| Contribution::new(p.as_str(), pts, ts)),
            1..40,
        ),
        amount in 1i64..5_000,
    ) {
        let mut allocator = build_allocator(&contributions);
        prop_assume!(allocator.total() >= amount);

        allocator.allocate_spend(amount).unwrap();

        let pending = allocator.pending_contributions();
        for pair in pending.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }

        // Everything strictly newer than the new head is untouched
        if let Some(head) = pending.first() {
            let newer_before: i64 = contributions
                .iter()
                .filter(|c| c.timestamp > head.timestamp)
                .map(|c| c.points)
                .sum();
            let newer_after: i64 = pending
                .iter()
                .filter(|c| c.timestamp > head.timestamp)
                .map(|c| c.points)
                .sum();
            prop_assert_eq!(newer_before, newer_after);
        }
    }

    /// Property: The actor-backed ledger agrees with the bare allocator
    #[test]
    fn prop_ledger_matches_allocator(
        contributions in prop::collection::vec(contribution_strategy(), 1..20),
        amount in 0i64..5_000,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ledger = PointsLedger::open(Config::default()).unwrap();
            let mut allocator = SpendAllocator::new();

            for contribution in &contributions {
                ledger
                    .record_contribution(
                        contribution.payer.clone(),
                        contribution.points,
                        contribution.timestamp,
                    )
                    .await
                    .unwrap();
                allocator.record_contribution(contribution.clone()).unwrap();
            }

            let via_ledger = ledger.allocate_spend(amount).await;
            let direct = allocator.allocate_spend(amount);
            prop_assert_eq!(via_ledger.is_ok(), direct.is_ok());
            if let (Ok(a), Ok(b)) = (via_ledger, direct) {
                prop_assert_eq!(a, b);
            }
            prop_assert_eq!(ledger.balances().await.unwrap(), allocator.balances());

            ledger.shutdown().await.unwrap();
            Ok(())
        })?;
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_full_points_lifecycle() {
        let ledger = PointsLedger::open(Config::default()).unwrap();

        // 1. Nothing recorded yet
        assert!(ledger.balances().await.unwrap().is_empty());
        assert!(ledger.balances().await.unwrap().is_empty());
        assert!(matches!(
            ledger.allocate_spend(10).await,
            Err(Error::InsufficientPoints { requested: 10, available: 0 })
        ));

        // 2. Contributions arrive out of order
        ledger.record_contribution("DANNON", 1000, ts("2020-11-02T14:00:00Z")).await.unwrap();
        ledger.record_contribution("UNILEVER", 200, ts("2020-10-31T11:00:00Z")).await.unwrap();
        ledger.record_contribution("DANNON", -200, ts("2020-10-31T15:00:00Z")).await.unwrap();
        ledger.record_contribution("MILLER COORS", 10000, ts("2020-11-01T14:00:00Z")).await.unwrap();
        ledger.record_contribution("DANNON", 300, ts("2020-10-31T10:00:00Z")).await.unwrap();
        assert_eq!(ledger.total().await.unwrap(), 11300);

        // 3. Negative spend changes nothing
        assert!(matches!(ledger.allocate_spend(-5).await, Err(Error::InvalidSpend(-5))));
        assert_eq!(ledger.total().await.unwrap(), 11300);

        // 4. Spend 5000
        let spent = ledger.allocate_spend(5000).await.unwrap();
        assert_eq!(
            serde_json::to_value(&spent).unwrap(),
            serde_json::json!({"DANNON": -100, "UNILEVER": -200, "MILLER COORS": -4700})
        );

        // 5. Balances
        let balances = ledger.balances().await.unwrap();
        assert_eq!(
            serde_json::to_value(&balances).unwrap(),
            serde_json::json!({"DANNON": 1000, "UNILEVER": 0, "MILLER COORS": 5300})
        );

        // 6. Remaining points drain MILLER COORS before the newer DANNON award
        let spent = ledger.allocate_spend(5300).await.unwrap();
        assert_eq!(spent.get("MILLER COORS"), Some(-5300));
        assert_eq!(spent.get("DANNON"), None);

        ledger.check_conservation().await.unwrap();
        ledger.shutdown().await.unwrap();
    }
}
