//! Deadline queries for Document
//!
//! The due-soon scan backs the notification side of the tracker: a periodic
//! caller asks for goals whose deadline falls within the next window and
//! surfaces each at most once, tracked by the per-goal `notified` flag.

use super::document::Document;
use super::goal::Goal;

impl Document {
    /// Goals whose deadline falls within `[now, now + window_millis]`
    /// and that have not been surfaced yet
    pub fn due_within(&self, now: i64, window_millis: i64) -> Vec<&Goal> {
        self.goals
            .iter()
            .filter(|g| !g.notified && !g.is_completed())
            .filter(|g| match g.deadline {
                Some(deadline) => deadline >= now && deadline <= now + window_millis,
                None => false,
            })
            .collect()
    }

    /// Consume the due-soon set: mark matching goals as notified and
    /// return their titles
    ///
    /// Each goal is returned at most once across repeated calls.
    pub fn take_due_within(&mut self, now: i64, window_millis: i64) -> Vec<String> {
        let mut titles = Vec::new();
        for goal in self.goals.iter_mut() {
            if goal.notified || goal.is_completed() {
                continue;
            }
            if let Some(deadline) = goal.deadline
                && deadline >= now
                && deadline <= now + window_millis
            {
                goal.notified = true;
                titles.push(goal.title.clone());
            }
        }
        titles
    }
}
