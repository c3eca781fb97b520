use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current wall-clock time as milliseconds since the Unix epoch
///
/// All persisted timestamps (document stamp, goal creation, deadlines) use
/// this representation to stay byte-compatible with the original JSON format.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Convert a millisecond timestamp to its local calendar date
///
/// Returns None for timestamps that fall outside the representable range
/// or into a DST gap with no unambiguous local time.
pub fn local_date_of(millis: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive())
}

/// Goal priority level
///
/// Uses snake_case naming to match the JSON serialization format.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    low,
    #[default]
    medium,
    high,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::low),
            "medium" => Ok(Priority::medium),
            "high" => Ok(Priority::high),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options are: low, medium, high",
                s
            )),
        }
    }
}

/// A user-defined category that goals may reference
///
/// Categories are referenced (not owned) by goals via `category_id`.
/// Deleting a category that is still referenced is blocked by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier (random v4 UUID)
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Display color (CSS-style string, opaque to the core)
    pub color: String,
}

/// A checklist item owned exclusively by one goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (random v4 UUID)
    pub id: Uuid,
    /// Task text
    pub title: String,
    /// Completion flag
    pub done: bool,
    /// Relative sort key; values need not be contiguous
    pub order: u32,
}

/// A goal with its checklist of tasks
///
/// Owns its tasks exclusively; tasks have no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique identifier (random v4 UUID)
    pub id: Uuid,
    /// Goal title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Optional reference to a category
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Priority level (defaults to medium)
    #[serde(default)]
    pub priority: Priority,
    /// Optional deadline as milliseconds since the Unix epoch
    #[serde(default)]
    pub deadline: Option<i64>,
    /// Creation time as milliseconds since the Unix epoch
    pub created_at: i64,
    /// Relative sort key; values need not be contiguous
    pub order: u32,
    /// Owned checklist, ordered by each task's `order` key
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Set once the due-soon scan has surfaced this goal
    #[serde(default)]
    pub notified: bool,
}

impl Goal {
    /// Check if every task is done and the checklist is non-empty
    ///
    /// A goal with zero tasks is never considered completed.
    pub fn is_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.done)
    }

    /// Completion percentage, rounded to the nearest integer
    ///
    /// Defined as 0 when the goal has no tasks.
    pub fn progress_percent(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let done = self.tasks.iter().filter(|t| t.done).count();
        ((done as f64 / self.tasks.len() as f64) * 100.0).round() as u8
    }

    /// Find a task by its ID and return a mutable reference
    pub fn find_task_by_id_mut(&mut self, task_id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Next order key for a task appended to this goal
    pub fn next_task_order(&self) -> u32 {
        self.tasks.iter().map(|t| t.order).max().map_or(0, |o| o + 1)
    }
}

/// Fields for creating a new goal
///
/// Everything except the title is optional; the tracker fills in id,
/// creation time and order key.
#[derive(Debug, Clone, Default)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub priority: Priority,
    pub deadline: Option<i64>,
}

/// Shallow-merge patch for updating a goal
///
/// `None` leaves a field untouched. The two doubly-optional fields
/// distinguish "leave alone" (outer None) from "clear" (inner None).
#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Option<Uuid>>,
    pub priority: Option<Priority>,
    pub deadline: Option<Option<i64>>,
}

impl GoalPatch {
    /// Apply the patch to a goal in place
    ///
    /// A deadline change clears the `notified` flag so the due-soon scan
    /// can surface the goal again for its new deadline.
    pub fn apply(self, goal: &mut Goal) {
        if let Some(title) = self.title {
            goal.title = title;
        }
        if let Some(description) = self.description {
            goal.description = description;
        }
        if let Some(category_id) = self.category_id {
            goal.category_id = category_id;
        }
        if let Some(priority) = self.priority {
            goal.priority = priority;
        }
        if let Some(deadline) = self.deadline {
            if deadline != goal.deadline {
                goal.notified = false;
            }
            goal.deadline = deadline;
        }
    }
}
