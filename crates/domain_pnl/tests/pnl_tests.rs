//! Comprehensive tests for domain_pnl

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::{KeyValueStore, KeyValueStoreExt};
use infra_store::InMemoryStore;
use test_utils::{
    assert_series_aligned, capital_strategy, pnl_entries_strategy, StoreSeeder, UnreliableStore,
};

use domain_pnl::{
    aggregate, bucket_key, EntryForm, LedgerState, PnlConfig, PnlEntry, PnlError, PnlLedger,
    PnlStorageKeys, ViewMode,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn ready_ledger() -> (Arc<InMemoryStore>, PnlLedger) {
    let store = Arc::new(InMemoryStore::new());
    let ledger = PnlLedger::load(store.clone(), PnlConfig::default()).await;
    (store, ledger)
}

async fn active_ledger(baseline: Decimal) -> (Arc<InMemoryStore>, PnlLedger) {
    let (store, mut ledger) = ready_ledger().await;
    ledger.save_baseline(baseline).await.unwrap();
    (store, ledger)
}

async fn seed_legacy(store: &InMemoryStore) {
    StoreSeeder::new(Arc::new(store.clone()))
        .raw(
            "pnlTracker_entries",
            json!([
                {"id": "a", "date": "2025-01-01", "account": "intraday", "capital": 60},
                {"id": "b", "date": "2025-01-01", "account": "swing", "capital": 40},
                {"id": "c", "date": "2025-01-02", "account": "intraday", "capital": 75},
            ]),
        )
        .await
        .raw(
            "pnlTracker_baseline",
            json!({"intraday": 50, "swing": 30, "saved": true}),
        )
        .await;
}

// ============================================================================
// Baseline Tests
// ============================================================================

mod baseline_tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_uninitialized() {
        let (_, ledger) = ready_ledger().await;
        assert_eq!(ledger.state(), LedgerState::Uninitialized);
        assert_eq!(ledger.baseline(), None);
        assert!(ledger.summary().is_none());
        assert!(ledger.series(ViewMode::Daily).is_none());
    }

    #[tokio::test]
    async fn test_save_baseline_activates() {
        let (store, ledger) = active_ledger(dec!(-8000)).await;
        assert_eq!(ledger.state(), LedgerState::Active);
        assert_eq!(ledger.baseline(), Some(dec!(-8000)));

        let stored_flag: Option<bool> = store.load_json("pnlTracker_baselineSaved_v2").await.unwrap();
        assert_eq!(stored_flag, Some(true));
        let stored_value: Option<f64> = store.load_json("pnlTracker_baseline_v2").await.unwrap();
        assert_eq!(stored_value, Some(-8000.0));
    }

    #[tokio::test]
    async fn test_baseline_is_set_once() {
        let (_, mut ledger) = active_ledger(dec!(100)).await;
        assert_eq!(
            ledger.save_baseline(dec!(200)).await,
            Err(PnlError::BaselineAlreadySaved)
        );
        assert_eq!(ledger.baseline(), Some(dec!(100)));
    }

    #[tokio::test]
    async fn test_summary_without_entries_uses_baseline() {
        let (_, ledger) = active_ledger(dec!(100)).await;
        let summary = ledger.summary().unwrap();
        assert_eq!(summary.current, dec!(100));
        assert_eq!(summary.delta, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_mutations_rejected_while_loading() {
        let store = Arc::new(InMemoryStore::new());
        let mut ledger = PnlLedger::new(store, PnlConfig::default());
        assert!(ledger.is_loading());
        assert_eq!(ledger.save_baseline(dec!(1)).await, Err(PnlError::NotReady));
        assert_eq!(ledger.reset_all().await, Err(PnlError::NotReady));
    }
}

// ============================================================================
// Entry Tests
// ============================================================================

mod entry_tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_require_baseline() {
        let (store, mut ledger) = ready_ledger().await;
        let result = ledger.save_entry(date(2025, 1, 1), dec!(100)).await;
        assert_eq!(result, Err(PnlError::BaselineRequired));
        assert!(ledger.entries().is_empty());
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_baseline_not_required_when_disabled() {
        let store = Arc::new(InMemoryStore::new());
        let config = PnlConfig {
            require_baseline: false,
            ..Default::default()
        };
        let mut ledger = PnlLedger::load(store, config).await;

        ledger.save_entry(date(2025, 1, 1), dec!(100)).await.unwrap();
        assert_eq!(ledger.entries().len(), 1);
        assert!(ledger.summary().is_none());
    }

    #[tokio::test]
    async fn test_same_date_upserts() {
        let (_, mut ledger) = active_ledger(dec!(100)).await;
        ledger.save_entry(date(2025, 1, 1), dec!(110)).await.unwrap();
        ledger.save_entry(date(2025, 1, 2), dec!(120)).await.unwrap();
        ledger.save_entry(date(2025, 1, 1), dec!(130)).await.unwrap();

        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(ledger.get(date(2025, 1, 1)).unwrap().capital, dec!(130));
        // upsert removes then appends
        assert_eq!(ledger.entries().last().unwrap().date, date(2025, 1, 1));
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let (_, mut ledger) = active_ledger(dec!(100)).await;
        ledger.save_entry(date(2025, 1, 1), dec!(110)).await.unwrap();

        assert!(ledger.edit_entry(date(2025, 1, 1), dec!(90)).await.unwrap());
        assert_eq!(ledger.get(date(2025, 1, 1)).unwrap().capital, dec!(90));
        assert!(!ledger.edit_entry(date(2025, 1, 2), dec!(1)).await.unwrap());

        assert!(ledger.delete_entry(date(2025, 1, 1)).await.unwrap());
        assert!(!ledger.delete_entry(date(2025, 1, 1)).await.unwrap());
        assert!(ledger.entries().is_empty());
    }

    #[tokio::test]
    async fn test_summary_uses_latest_date() {
        let (_, mut ledger) = active_ledger(dec!(100)).await;
        ledger.save_entry(date(2025, 1, 5), dec!(150)).await.unwrap();
        ledger.save_entry(date(2025, 1, 2), dec!(80)).await.unwrap();

        let summary = ledger.summary().unwrap();
        assert_eq!(summary.current, dec!(150));
        assert_eq!(summary.delta, dec!(50));
    }

    #[tokio::test]
    async fn test_entries_page_newest_first() {
        let (_, mut ledger) = active_ledger(dec!(100)).await;
        for day in 1..=5 {
            ledger
                .save_entry(date(2025, 1, day), Decimal::from(100 + day))
                .await
                .unwrap();
        }

        let first = ledger.entries_page(0, 2);
        assert_eq!(first.total, 5);
        assert!(first.has_more);
        let dates: Vec<NaiveDate> = first.items.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2025, 1, 5), date(2025, 1, 4)]);
        assert_eq!(first.items[0].delta, Some(dec!(5)));

        let last = ledger.entries_page(4, 2);
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_more);

        assert!(ledger.entries_page(10, 2).items.is_empty());
    }

    #[tokio::test]
    async fn test_entries_persist_across_loads() {
        let (store, mut ledger) = active_ledger(dec!(100)).await;
        ledger.save_entry(date(2025, 1, 1), dec!(110.25)).await.unwrap();

        let reloaded = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert_eq!(reloaded.entries(), ledger.entries());
        assert_eq!(reloaded.baseline(), Some(dec!(100)));
    }

    #[test]
    fn test_entry_form() {
        let form = EntryForm {
            date: "2025-12-11".to_string(),
            capital: " 1,050 ".to_string(),
        };
        assert_eq!(form.parse().unwrap(), (date(2025, 12, 11), dec!(1050)));

        let bad = EntryForm {
            date: "2025-02-30".to_string(),
            capital: "1".to_string(),
        };
        assert!(matches!(bad.parse(), Err(PnlError::InvalidDate(_))));
    }
}

// ============================================================================
// Reset Tests
// ============================================================================

mod reset_tests {
    use super::*;

    #[tokio::test]
    async fn test_reset_returns_to_uninitialized() {
        let (store, mut ledger) = active_ledger(dec!(100)).await;
        ledger.save_entry(date(2025, 1, 1), dec!(110)).await.unwrap();

        ledger.reset_all().await.unwrap();
        assert_eq!(ledger.state(), LedgerState::Uninitialized);
        assert!(ledger.entries().is_empty());
        assert_eq!(ledger.baseline(), None);

        let reloaded = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert_eq!(reloaded.state(), LedgerState::Uninitialized);
        assert!(reloaded.entries().is_empty());
        assert_eq!(store.load("pnlTracker_baseline_v2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_baseline_can_be_saved_again_after_reset() {
        let (_, mut ledger) = active_ledger(dec!(100)).await;
        ledger.reset_all().await.unwrap();
        ledger.save_baseline(dec!(250)).await.unwrap();
        assert_eq!(ledger.baseline(), Some(dec!(250)));
    }

    #[tokio::test]
    async fn test_reset_does_not_bring_back_legacy_data() {
        let store = Arc::new(InMemoryStore::new());
        seed_legacy(&store).await;

        let mut ledger = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert_eq!(ledger.entries().len(), 2);
        ledger.reset_all().await.unwrap();

        let reloaded = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert!(reloaded.entries().is_empty());
        assert_eq!(reloaded.state(), LedgerState::Uninitialized);
    }
}

// ============================================================================
// Migration Tests
// ============================================================================

mod migration_tests {
    use super::*;

    #[tokio::test]
    async fn test_legacy_data_is_migrated() {
        let store = Arc::new(InMemoryStore::new());
        seed_legacy(&store).await;

        let ledger = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert_eq!(
            ledger.entries(),
            &[
                PnlEntry::new(date(2025, 1, 1), dec!(100)),
                PnlEntry::new(date(2025, 1, 2), dec!(75)),
            ]
        );
        assert_eq!(ledger.baseline(), Some(dec!(80)));
        assert_eq!(ledger.state(), LedgerState::Active);

        assert!(store.load("pnlTracker_entries_v2").await.unwrap().is_some());
        assert!(store.load("pnlTracker_entries").await.unwrap().is_some());
        assert!(store.load("pnlTracker_baseline").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_migration_runs_once() {
        let store = Arc::new(InMemoryStore::new());
        seed_legacy(&store).await;

        let first = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        let snapshot = store.load("pnlTracker_entries_v2").await.unwrap();

        let second = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert_eq!(second.entries(), first.entries());
        assert_eq!(store.load("pnlTracker_entries_v2").await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_current_layout_wins_over_legacy() {
        let store = Arc::new(InMemoryStore::new());
        seed_legacy(&store).await;
        store
            .save_json(
                "pnlTracker_entries_v2",
                &json!([{"id": "2025-02-01", "date": "2025-02-01", "capital": 999}]),
            )
            .await
            .unwrap();

        let ledger = PnlLedger::load(store, PnlConfig::default()).await;
        assert_eq!(ledger.entries(), &[PnlEntry::new(date(2025, 2, 1), dec!(999))]);
        assert_eq!(ledger.state(), LedgerState::Uninitialized);
    }

    #[tokio::test]
    async fn test_legacy_edits_after_migration_are_ignored() {
        let store = Arc::new(InMemoryStore::new());
        seed_legacy(&store).await;
        PnlLedger::load(store.clone(), PnlConfig::default()).await;

        store
            .save_json(
                "pnlTracker_entries",
                &json!([{"date": "2030-01-01", "account": "swing", "capital": 1}]),
            )
            .await
            .unwrap();

        let ledger = PnlLedger::load(store, PnlConfig::default()).await;
        assert_eq!(ledger.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_legacy_entries_leave_ledger_empty() {
        let store = Arc::new(InMemoryStore::new());
        store.save("pnlTracker_entries", b"not json".to_vec()).await.unwrap();

        let ledger = PnlLedger::load(store, PnlConfig::default()).await;
        assert!(!ledger.is_loading());
        assert!(ledger.entries().is_empty());
        assert_eq!(ledger.state(), LedgerState::Uninitialized);
    }

    #[tokio::test]
    async fn test_malformed_current_entries_are_dropped() {
        let store = Arc::new(InMemoryStore::new());
        store
            .save_json(
                "pnlTracker_entries_v2",
                &json!([
                    {"date": "2025-01-01", "capital": 5},
                    {"date": "2025-01-02"},
                    {"date": "garbage", "capital": 1}
                ]),
            )
            .await
            .unwrap();

        let ledger = PnlLedger::load(store, PnlConfig::default()).await;
        assert_eq!(ledger.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_current_data_blocks_migration() {
        let store = Arc::new(UnreliableStore::new(InMemoryStore::new()));
        seed_legacy(store.inner()).await;

        let mut ledger = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        ledger.save_entry(date(2025, 3, 1), dec!(999)).await.unwrap();
        let written = store.load("pnlTracker_entries_v2").await.unwrap();

        store.set_unreadable(&[
            "pnlTracker_entries_v2",
            "pnlTracker_baseline_v2",
            "pnlTracker_baselineSaved_v2",
        ]);
        let degraded = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert!(!degraded.is_loading());
        assert!(degraded.entries().is_empty());
        store.clear_unreadable();
        assert_eq!(store.load("pnlTracker_entries_v2").await.unwrap(), written);

        let recovered = PnlLedger::load(store, PnlConfig::default()).await;
        assert_eq!(recovered.entries().len(), 3);
        assert_eq!(recovered.get(date(2025, 3, 1)).unwrap().capital, dec!(999));
        assert_eq!(recovered.baseline(), Some(dec!(80)));
    }

    #[tokio::test]
    async fn test_partly_readable_current_data_is_loaded_without_writes() {
        let store = Arc::new(UnreliableStore::new(InMemoryStore::new()));
        seed_legacy(store.inner()).await;
        PnlLedger::load(store.clone(), PnlConfig::default()).await;
        let keys_before = store.inner().keys().await;

        store.set_unreadable(&["pnlTracker_baseline_v2"]);
        let ledger = PnlLedger::load(store.clone(), PnlConfig::default()).await;

        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(store.inner().keys().await, keys_before);
    }

    #[tokio::test]
    async fn test_unreadable_legacy_data_postpones_migration() {
        let store = Arc::new(UnreliableStore::new(InMemoryStore::new()));
        seed_legacy(store.inner()).await;

        store.set_unreadable(&["pnlTracker_baseline"]);
        let ledger = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert!(ledger.entries().is_empty());
        assert_eq!(store.load("pnlTracker_entries_v2").await.unwrap(), None);

        store.clear_unreadable();
        let migrated = PnlLedger::load(store, PnlConfig::default()).await;
        assert_eq!(migrated.entries().len(), 2);
        assert_eq!(migrated.baseline(), Some(dec!(80)));
    }

    #[tokio::test]
    async fn test_corrupt_current_value_blocks_migration() {
        let store = Arc::new(InMemoryStore::new());
        seed_legacy(&store).await;
        store.save("pnlTracker_entries_v2", b"[{".to_vec()).await.unwrap();

        let ledger = PnlLedger::load(store.clone(), PnlConfig::default()).await;
        assert!(ledger.entries().is_empty());
        assert_eq!(
            store.load("pnlTracker_entries_v2").await.unwrap(),
            Some(b"[{".to_vec())
        );
        assert_eq!(store.load("pnlTracker_baseline_v2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_custom_keys() {
        let store = Arc::new(InMemoryStore::new());
        let config = PnlConfig {
            keys: PnlStorageKeys {
                entries: "e".to_string(),
                baseline: "b".to_string(),
                baseline_saved: "s".to_string(),
                ..Default::default()
            },
            require_baseline: true,
        };
        let mut ledger = PnlLedger::load(store.clone(), config).await;
        ledger.save_baseline(dec!(1)).await.unwrap();

        assert_eq!(store.keys().await, vec!["b".to_string(), "s".to_string()]);
    }
}

// ============================================================================
// Aggregation Tests
// ============================================================================

mod aggregate_tests {
    use super::*;

    #[test]
    fn test_daily_deltas() {
        let entries = [
            PnlEntry::new(date(2025, 1, 1), dec!(100)),
            PnlEntry::new(date(2025, 1, 2), dec!(120)),
        ];
        let series = aggregate(&entries, dec!(100), ViewMode::Daily);
        assert_eq!(series.values, vec![dec!(0), dec!(20)]);
        assert_eq!(series.labels, vec!["01-01", "01-02"]);
    }

    #[test]
    fn test_weekly_key() {
        assert_eq!(bucket_key(date(2025, 1, 10), ViewMode::Weekly), "2025-W02");
    }

    #[test]
    fn test_latest_entry_in_bucket_wins() {
        let entries = [
            PnlEntry::new(date(2025, 1, 9), dec!(130)),
            PnlEntry::new(date(2025, 1, 8), dec!(110)),
            PnlEntry::new(date(2025, 1, 2), dec!(90)),
        ];
        let series = aggregate(&entries, dec!(100), ViewMode::Weekly);
        assert_eq!(series.labels, vec!["W01", "W02"]);
        assert_eq!(series.values, vec![dec!(-10), dec!(30)]);
    }

    #[test]
    fn test_monthly_across_years() {
        let entries = [
            PnlEntry::new(date(2025, 1, 31), dec!(300)),
            PnlEntry::new(date(2024, 12, 1), dec!(50)),
            PnlEntry::new(date(2024, 12, 31), dec!(200)),
        ];
        let series = aggregate(&entries, dec!(100), ViewMode::Monthly);
        assert_eq!(series.labels, vec!["24-12", "25-01"]);
        assert_eq!(series.values, vec![dec!(100), dec!(200)]);
    }

    #[test]
    fn test_empty_series() {
        let series = aggregate(&[], dec!(100), ViewMode::Daily);
        assert!(series.is_empty());
        assert!(series.labels.is_empty());
    }

    #[test]
    fn test_series_serializes_numbers() {
        let entries = [PnlEntry::new(date(2025, 1, 1), dec!(120.5))];
        let series = aggregate(&entries, dec!(100), ViewMode::Daily);
        assert_eq!(
            serde_json::to_value(&series).unwrap(),
            json!({"mode": "daily", "labels": ["01-01"], "values": [20.5]})
        );
    }

    #[tokio::test]
    async fn test_ledger_series_uses_baseline() {
        let (_, mut ledger) = active_ledger(dec!(1000)).await;
        ledger.save_entry(date(2025, 3, 3), dec!(1100)).await.unwrap();
        let series = ledger.series(ViewMode::Monthly).unwrap();
        assert_eq!(series.values, vec![dec!(100)]);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bucket_count_matches_distinct_keys(entries in pnl_entries_strategy(40)) {
            for mode in [ViewMode::Daily, ViewMode::Weekly, ViewMode::Monthly] {
                let series = aggregate(&entries, Decimal::ZERO, mode);
                let mut keys: Vec<String> = entries.iter().map(|e| bucket_key(e.date, mode)).collect();
                keys.sort();
                keys.dedup();
                prop_assert_eq!(series.values.len(), keys.len());
                assert_series_aligned(&series);
            }
        }

        #[test]
        fn baseline_shifts_every_value(
            entries in pnl_entries_strategy(20),
            baseline in capital_strategy(),
        ) {
            let flat = aggregate(&entries, Decimal::ZERO, ViewMode::Monthly);
            let shifted = aggregate(&entries, baseline, ViewMode::Monthly);
            assert_series_aligned(&shifted);
            prop_assert_eq!(&flat.labels, &shifted.labels);
            for (raw, delta) in flat.values.iter().zip(&shifted.values) {
                prop_assert_eq!(*raw - baseline, *delta);
            }
        }

        #[test]
        fn daily_series_is_ordered_by_date(entries in pnl_entries_strategy(40)) {
            let series = aggregate(&entries, Decimal::ZERO, ViewMode::Daily);
            let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
            dates.sort();
            dates.dedup();
            let expected: Vec<String> = dates.iter().map(|d| d.format("%m-%d").to_string()).collect();
            prop_assert_eq!(series.labels, expected);
        }

        #[test]
        fn week_numbers_stay_in_range(offset in 0u32..3650) {
            let day = date(2020, 1, 1) + chrono::Days::new(u64::from(offset));
            let week = domain_pnl::week_of_year(day);
            prop_assert!((1..=53).contains(&week));
        }
    }
}
