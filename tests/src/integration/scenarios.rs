//! # MockStore Scenarios
//!
//! End-to-end behavior of the validating store, one reporting mode at a time.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use stats_core::tags::{per_instance_tags, serialize_tags, tag_set};
    use stats_core::{Scope, Store};
    use stats_mock::{
        MockSink, MockStore, ReportingMode, ReportingPolicy, TestRecorder, ValidationErrorKind,
    };

    use crate::fixtures::{CheckoutService, CountingStore};

    fn recording_store(test: &str) -> (MockStore, Arc<TestRecorder>) {
        stats_telemetry::init_test_logging();
        let recorder = Arc::new(TestRecorder::new(test));
        (MockStore::new(Some(recorder.clone())), recorder)
    }

    fn counting_store(policy: ReportingPolicy) -> (MockStore, Arc<CountingStore>) {
        let sink = Arc::new(MockSink::new());
        let delegate = Arc::new(CountingStore::new(sink.clone()));
        let store = MockStore::with_delegate(delegate.clone(), sink, policy);
        (store, delegate)
    }

    // =========================================================================
    // FAIL TEST
    // =========================================================================

    #[test]
    fn test_whitespace_in_name_fails_once() {
        let (store, recorder) = recording_store("whitespace_in_name");

        let counter = store.new_counter("request count");

        let failures = recorder.take_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("whitespace"));
        assert!(failures[0].message.contains("\"request count\""));

        // Handle still works
        counter.add(3);
        store.flush();
        store.sink().assert_counter_equals("request count", 3);
    }

    #[test]
    fn test_whitespace_in_tag_value_names_the_key() {
        let (store, recorder) = recording_store("whitespace_in_tag_value");
        let tags = tag_set([("method", "GET ")]);

        store.new_counter_with_tags("requests", &tags);

        let failures = recorder.take_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("tag value error (key=\"method\")"));
        assert!(failures[0].message.contains("whitespace"));
    }

    #[test]
    fn test_tag_value_needing_sanitizing_fails() {
        let (store, recorder) = recording_store("unsanitized_tag_value");
        let tags = tag_set([("path", "/v1/users:get")]);

        store.new_timer_with_tags("latency", &tags);

        let failures = recorder.take_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("invalid chars"));
        assert!(failures[0].message.contains("\"/v1/users_get\""));
    }

    #[test]
    fn test_bad_tag_key_reported_as_key_error() {
        let (store, recorder) = recording_store("bad_tag_key");
        let tags = tag_set([("http method", "GET")]);

        store.new_gauge_with_tags("pending", &tags);

        let failures = recorder.take_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("tag key error"));
    }

    #[test]
    fn test_instrumented_service_passes() {
        let (store, recorder) = recording_store("instrumented_service");

        let service = CheckoutService::new(&store, "us-east-1");
        service.place_order(Duration::from_millis(5), true);
        service.place_order(Duration::from_millis(7), false);
        store.flush();

        assert!(!recorder.failed());

        let tags = tag_set([("region", "us-east-1")]);
        let sink = store.sink();
        sink.assert_counter_equals(&serialize_tags("orders", &tags), 1);
        sink.assert_counter_equals(&serialize_tags("failures", &per_instance_tags(&tags)), 1);
        sink.assert_gauge_equals("in_flight", 0);
        sink.assert_timer_call_count(&serialize_tags("latency", &tags), 2);
    }

    #[test]
    fn test_instrumented_service_with_bad_region() {
        let (store, recorder) = recording_store("bad_region");

        CheckoutService::new(&store, "us east");

        // orders, failures and latency all carry the region tag
        let failures = recorder.take_failures();
        assert_eq!(failures.len(), 3);
        assert!(failures
            .iter()
            .all(|f| f.message.contains("tag value error (key=\"region\")")));
    }

    #[test]
    fn test_scoped_stats_bypass_validation() {
        let (store, recorder) = recording_store("scoped_stats");

        let scope = store.scope(CheckoutService::SCOPE);
        scope.new_counter("bad name").inc();
        store.flush();

        assert!(!recorder.failed());
        store.sink().assert_counter_equals("checkout.bad name", 1);
    }

    #[test]
    fn test_invalid_scopes_are_reported() {
        let (store, recorder) = recording_store("invalid_scopes");

        store.scope("bad scope");
        store.scope_with_tags("ok", &tag_set([("k", "a|b")]));

        let failures = recorder.take_failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].message.starts_with("stats: scope: invalid stat name"));
        assert!(failures[0].message.contains("\"bad scope\""));
        assert!(failures[1].message.starts_with("stats: scope_with_tags:"));
        assert!(failures[1]
            .message
            .contains("tag value error (key=\"k\"): invalid chars: \"a|b\" vs. \"a_b\""));
    }

    // =========================================================================
    // DELEGATION
    // =========================================================================

    #[test]
    fn test_every_call_reaches_delegate_once() {
        let (store, delegate) = counting_store(ReportingPolicy::silent());
        let tags = tag_set([("method", "GET")]);

        store.new_counter("requests");
        store.new_counter("requests");
        store.new_per_instance_gauge("pending", &tags);
        store.new_timer_with_tags("bad name", &tags);

        assert_eq!(delegate.calls("new_counter"), 2);
        assert_eq!(delegate.calls("new_per_instance_gauge"), 1);
        assert_eq!(delegate.calls("new_timer_with_tags"), 1);
        assert_eq!(delegate.calls("flush"), 4);
    }

    #[test]
    fn test_repeated_valid_calls_report_nothing() {
        stats_telemetry::init_test_logging();
        let recorder = Arc::new(TestRecorder::new("repeated_valid_calls"));
        let (store, delegate) = counting_store(ReportingPolicy::from_context(Some(recorder.clone())));

        let first = store.new_counter("requests");
        let second = store.new_counter("requests");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(delegate.calls("new_counter"), 2);
        assert!(!recorder.failed());
        assert!(recorder.logs().is_empty());
    }

    #[test]
    fn test_store_passes_through() {
        let (store, delegate) = counting_store(ReportingPolicy::silent());

        store.store();
        store.flush();

        assert_eq!(delegate.calls("store"), 1);
        assert_eq!(delegate.calls("flush"), 1);
    }

    // =========================================================================
    // OTHER MODES
    // =========================================================================

    #[test]
    fn test_silent_mode_keeps_handles_usable() {
        stats_telemetry::init_test_logging();
        let store = MockStore::silent();

        let gauge = store.new_gauge("queue depth");
        gauge.set(9);
        store.flush();

        assert_eq!(store.reporting_mode(), ReportingMode::Silent);
        store.sink().assert_gauge_equals("queue depth", 9);
    }

    #[test]
    fn test_log_and_continue_goes_to_context_log() {
        stats_telemetry::init_test_logging();
        let recorder = Arc::new(TestRecorder::new("log_and_continue"));
        let policy = ReportingPolicy::new(ReportingMode::LogAndContinue, Some(recorder.clone()));
        let (store, _) = counting_store(policy);

        store.new_counter("");

        assert!(!recorder.failed());
        let logs = recorder.logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].message.contains("invalid stat name: empty string"));
    }

    #[test]
    fn test_log_and_continue_without_context() {
        stats_telemetry::init_test_logging();
        let store = MockStore::logging();

        store.new_timer("t\u{e9}").add_value(1.0);

        assert_eq!(store.reporting_mode(), ReportingMode::LogAndContinue);
        store.sink().assert_timer_called("t\u{e9}");
    }

    #[test]
    fn test_violation_kinds_cover_rule_order() {
        use stats_mock::validate_name;

        let cases = [
            ("", ValidationErrorKind::Empty),
            ("caf\u{e9} latte", ValidationErrorKind::NonAscii),
            ("a\u{7}b c", ValidationErrorKind::NonPrintable),
            ("a\tb", ValidationErrorKind::ContainsWhitespace),
        ];
        for (name, kind) in cases {
            let err = validate_name(name).unwrap_err();
            assert_eq!(err.kind(), kind, "name {:?}", name);
        }
    }
}
