#[cfg(test)]
mod tests {
    use bodylog::db::db::Db;
    use bodylog::libs::sleep::{EndOutcome, SleepTracker, StartOutcome};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SleepTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for SleepTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            SleepTestContext { _temp_dir: temp_dir }
        }
    }

    fn tracker() -> SleepTracker {
        SleepTracker::new(&Db::new().unwrap())
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_start_creates_open_session(_ctx: &mut SleepTestContext) {
        let tracker = tracker();

        let outcome = tracker.start().unwrap();
        let id = match outcome {
            StartOutcome::Started { id } => id,
            other => panic!("expected Started, got {other:?}"),
        };

        let status = tracker.status().unwrap();
        assert!(status.is_sleeping);
        assert_eq!(status.id, Some(id));
        assert!(status.start_time.is_some());
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_double_start_overwrites_instead_of_duplicating(_ctx: &mut SleepTestContext) {
        let tracker = tracker();

        let first = tracker.start().unwrap();
        let first_start = tracker.status().unwrap().start_time.unwrap();

        let second = tracker.start().unwrap();
        let second_start = tracker.status().unwrap().start_time.unwrap();

        let first_id = match first {
            StartOutcome::Started { id } => id,
            other => panic!("expected Started, got {other:?}"),
        };
        match second {
            StartOutcome::Restarted { id } => assert_eq!(id, first_id),
            other => panic!("expected Restarted, got {other:?}"),
        }

        // The open row's start belongs to the second call
        assert!(second_start >= first_start);

        // Still exactly one open row: ending once closes everything
        tracker.end().unwrap();
        assert!(!tracker.status().unwrap().is_sleeping);
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_end_closes_open_session_with_display(_ctx: &mut SleepTestContext) {
        let tracker = tracker();
        tracker.start().unwrap();

        match tracker.end().unwrap() {
            EndOutcome::Completed { display, .. } => {
                assert!(display.contains('-'));
                assert!(display.contains("共睡了"));
            }
            other => panic!("expected Completed, got {other:?}"),
        }

        assert!(!tracker.status().unwrap().is_sleeping);
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_end_without_start_records_degenerate_session(_ctx: &mut SleepTestContext) {
        let tracker = tracker();

        let id = match tracker.end().unwrap() {
            EndOutcome::WithoutStart { id } => id,
            other => panic!("expected WithoutStart, got {other:?}"),
        };

        // The degenerate row is closed and listable
        let sessions = tracker.list(50).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, id);
        assert!(sessions[0].display.contains("共睡了0分钟"));
        assert!(!tracker.status().unwrap().is_sleeping);
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_list_never_returns_open_sessions(_ctx: &mut SleepTestContext) {
        let tracker = tracker();

        tracker.insert_custom("2024-01-01T22:00:00.000Z", "2024-01-02T06:00:00.000Z").unwrap();
        tracker.start().unwrap();

        let sessions = tracker.list(50).unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(tracker.status().unwrap().is_sleeping);
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_list_orders_newest_first(_ctx: &mut SleepTestContext) {
        let tracker = tracker();

        let (first, _) = tracker.insert_custom("2024-01-01T22:00:00.000Z", "2024-01-02T06:00:00.000Z").unwrap();
        let (second, _) = tracker.insert_custom("2024-01-02T22:00:00.000Z", "2024-01-03T06:00:00.000Z").unwrap();

        let sessions = tracker.list(50).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, second);
        assert_eq!(sessions[1].id, first);
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_insert_custom_allows_inverted_range(_ctx: &mut SleepTestContext) {
        let tracker = tracker();

        // end < start is accepted; duration shows up negative
        let (_, display) = tracker.insert_custom("2024-01-01T06:00:00.000Z", "2024-01-01T05:30:00.000Z").unwrap();
        assert!(display.contains("共睡了-30分钟"), "got: {display}");
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_trackers_on_one_db_share_the_connection(_ctx: &mut SleepTestContext) {
        let db = Db::new().unwrap();
        let first = SleepTracker::new(&db);
        let second = SleepTracker::new(&db);

        first.start().unwrap();
        assert!(second.status().unwrap().is_sleeping);

        second.end().unwrap();
        assert!(!first.status().unwrap().is_sleeping);
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_remove_reports_affected_rows(_ctx: &mut SleepTestContext) {
        let tracker = tracker();

        let (id, _) = tracker.insert_custom("2024-01-01T22:00:00.000Z", "2024-01-02T06:00:00.000Z").unwrap();
        assert_eq!(tracker.remove(9999).unwrap(), 0);
        assert_eq!(tracker.remove(id).unwrap(), 1);
        assert!(tracker.list(50).unwrap().is_empty());
    }

    #[test_context(SleepTestContext)]
    #[test]
    fn test_list_in_range_bounds_are_inclusive(_ctx: &mut SleepTestContext) {
        let tracker = tracker();

        tracker.insert_custom("2024-01-01T22:00:00.000Z", "2024-01-02T06:00:00.000Z").unwrap();
        tracker.insert_custom("2024-01-05T22:00:00.000Z", "2024-01-06T06:00:00.000Z").unwrap();
        tracker.insert_custom("2024-02-01T22:00:00.000Z", "2024-02-02T06:00:00.000Z").unwrap();

        let sessions = tracker
            .list_in_range("2024-01-01T22:00:00.000Z", "2024-01-31T23:59:59.999Z")
            .unwrap();
        assert_eq!(sessions.len(), 2);
        // Newest first by start
        assert_eq!(sessions[0].start, "2024-01-05T22:00:00.000Z");
        assert_eq!(sessions[1].start, "2024-01-01T22:00:00.000Z");
        assert_eq!(sessions[1].end, "2024-01-02T06:00:00.000Z");
    }
}
