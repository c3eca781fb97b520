//! Common test utilities for integration tests

use goalpro::GoalTracker;
use tempfile::TempDir;

/// Create a test tracker over a store file inside a fresh temp directory
pub fn get_test_tracker() -> (GoalTracker, TempDir) {
    let dir = TempDir::new().unwrap();
    let tracker = GoalTracker::new(dir.path().join("goals.json")).unwrap();
    (tracker, dir)
}
