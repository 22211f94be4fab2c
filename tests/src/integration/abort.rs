//! # AbortProcess
//!
//! Aborting takes the whole test binary down, so the failing store runs in a
//! child process: the parent re-runs this test binary filtered to a single
//! test and inspects how the child exited.

#[cfg(test)]
mod tests {
    use std::env;
    use std::process::Command;

    use stats_core::Scope;
    use stats_mock::{MockStore, ReportingMode};

    const CHILD_ENV: &str = "STATS_ABORT_CHILD";
    const CHILD_TEST: &str = "integration::abort::tests::abort_child_process";

    /// Only does anything when spawned by [`test_abort_process_exits_abnormally`].
    #[test]
    fn abort_child_process() {
        if env::var_os(CHILD_ENV).is_none() {
            return;
        }
        let store = MockStore::new(None);
        assert_eq!(store.reporting_mode(), ReportingMode::AbortProcess);

        store.new_counter("bad name");
        unreachable!("store should have aborted");
    }

    #[test]
    fn test_abort_process_exits_abnormally() {
        let exe = env::current_exe().expect("test binary path");
        let output = Command::new(exe)
            .args(["--exact", CHILD_TEST, "--nocapture", "--test-threads=1"])
            .env(CHILD_ENV, "1")
            .output()
            .expect("spawn child test");

        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("invalid stat name"),
            "child stderr: {}",
            stderr
        );
        assert!(!stderr.contains("store should have aborted"));
    }

    #[test]
    fn test_valid_calls_never_abort() {
        let store = MockStore::new(None);
        store.new_counter("requests").inc();
        store.new_gauge("pending").set(1);
    }
}
