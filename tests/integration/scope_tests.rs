//! Scope filter integration tests

#[cfg(test)]
mod tests {
    use chargedesk::scope::DateWindow;
    use chargedesk::{DateRange, Region, ScopePatch, ScopeStore, Selection};
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[test]
    fn test_region_patch_leaves_other_keys() {
        let store = ScopeStore::new();
        let before = store.scope();

        let after = store.set_scope(ScopePatch::default().region(Region::Africa));

        assert_eq!(after.region, Selection::Only(Region::Africa));
        assert_eq!(after.org_id, before.org_id);
        assert_eq!(after.station_id, before.station_id);
        assert_eq!(after.site_id, before.site_id);
        assert_eq!(after.date_range, before.date_range);
    }

    /// Ids are taken as given
    #[test]
    fn test_unknown_ids_accepted() {
        let store = ScopeStore::new();
        let scope = store.set_scope(
            ScopePatch::default()
                .org("does-not-exist")
                .station("st-404")
                .site("site-404"),
        );
        assert_eq!(scope.org_id, Selection::Only("does-not-exist".to_string()));
        assert!(scope.is_narrowed());
    }

    #[test]
    fn test_patch_from_client_json() {
        let store = ScopeStore::new();
        let patch: ScopePatch =
            serde_json::from_str(r#"{"stationId":"st-1","dateRange":"7D"}"#).unwrap();
        let scope = store.set_scope(patch);
        assert_eq!(scope.station_id, Selection::Only("st-1".to_string()));
        assert_eq!(scope.date_range, DateRange::Last7Days);
        assert_eq!(scope.region, Selection::All);

        let patch: ScopePatch = serde_json::from_str(r#"{"stationId":"ALL"}"#).unwrap();
        assert_eq!(store.set_scope(patch).station_id, Selection::All);
    }

    #[test]
    fn test_custom_range_bounds() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let window = DateWindow::new(start, end).unwrap();

        let store = ScopeStore::new();
        let scope = store.set_scope(ScopePatch::default().custom_window(window));
        assert_eq!(scope.date_bounds(end).map(|w| w.days()), Some(15));

        // Switching back to a relative range ignores the stored window
        let scope = store.set_scope(ScopePatch::default().date_range(DateRange::Today));
        assert_eq!(scope.date_bounds(end), Some(DateWindow::new(end, end).unwrap()));
    }

    #[test]
    fn test_concurrent_patches_merge() {
        let store = Arc::new(ScopeStore::new());

        let handles: Vec<_> = [
            ScopePatch::default().region(Region::Europe),
            ScopePatch::default().org("org-1"),
            ScopePatch::default().date_range(DateRange::Last30Days),
        ]
        .into_iter()
        .map(|patch| {
            let store = store.clone();
            std::thread::spawn(move || {
                store.set_scope(patch);
            })
        })
        .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let scope = store.scope();
        assert_eq!(scope.region, Selection::Only(Region::Europe));
        assert_eq!(scope.org_id, Selection::Only("org-1".to_string()));
        assert_eq!(scope.date_range, DateRange::Last30Days);
    }
}
