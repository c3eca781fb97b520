use crate::model::goal::{Category, Goal, Task, now_millis};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format version stamped into every persisted document (current: 2)
pub const DOCUMENT_VERSION: u32 = 2;

/// The single aggregate root containing all categories and goals
///
/// Vec is used as the primary storage for both collections:
/// 1. Maintains insertion order for consistent JSON serialization
/// 2. Enables predictable iteration order for display
/// 3. Simple ownership model - Vec owns all data directly
///
/// ID uniqueness within each collection is provided by the v4 UUID
/// generator; there is no secondary index, lookups are linear scans,
/// which is fine at personal-tracker scales (tens of goals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Format version for the persisted JSON (only presence is checked on load)
    pub version: u32,

    /// Document stamp as milliseconds since the Unix epoch
    ///
    /// Refreshed on every persist; cross-process sync adopts whichever
    /// document carries the strictly newer stamp (last writer wins).
    pub created_at: i64,

    /// All categories, in insertion order
    #[serde(default)]
    pub categories: Vec<Category>,

    /// All goals, in insertion order; display order comes from each
    /// goal's `order` key, not from this Vec
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            created_at: now_millis(),
            categories: Vec::new(),
            goals: Vec::new(),
        }
    }
}

impl Document {
    /// Create a new empty document skeleton
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the document stamp to "now"
    ///
    /// Called by the persist path right before serialization so the
    /// last-writer-wins comparison reflects actual write recency.
    pub fn touch(&mut self) {
        self.created_at = now_millis();
    }

    /// Find a goal by its ID
    pub fn find_goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Find a goal by its ID and return a mutable reference
    pub fn find_goal_mut(&mut self, id: Uuid) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }

    /// Add a goal to the collection
    pub fn add_goal(&mut self, goal: Goal) {
        self.goals.push(goal);
    }

    /// Remove a goal and return it together with its position
    ///
    /// The position lets undo put the goal back where it was, keeping
    /// the serialized collection order stable across delete + undo.
    pub fn remove_goal(&mut self, id: Uuid) -> Option<(usize, Goal)> {
        let pos = self.goals.iter().position(|g| g.id == id)?;
        Some((pos, self.goals.remove(pos)))
    }

    /// Re-insert a previously removed goal at its original position
    pub fn restore_goal(&mut self, pos: usize, goal: Goal) {
        let pos = pos.min(self.goals.len());
        self.goals.insert(pos, goal);
    }

    /// Next order key for a newly created goal
    pub fn next_goal_order(&self) -> u32 {
        self.goals.iter().map(|g| g.order).max().map_or(0, |o| o + 1)
    }

    /// Find a category by its ID
    pub fn find_category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Add a category to the collection
    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Remove a category and return it
    pub fn remove_category(&mut self, id: Uuid) -> Option<Category> {
        let pos = self.categories.iter().position(|c| c.id == id)?;
        Some(self.categories.remove(pos))
    }

    /// Check if any goal still references a category
    pub fn category_is_referenced(&self, id: Uuid) -> bool {
        self.goals.iter().any(|g| g.category_id == Some(id))
    }

    /// Count goals that reference a category (used for error messages)
    pub fn category_reference_count(&self, id: Uuid) -> usize {
        self.goals
            .iter()
            .filter(|g| g.category_id == Some(id))
            .count()
    }

    /// Flip a task's done flag
    ///
    /// Returns `Some(())` when both the goal and the task exist,
    /// `None` otherwise.
    pub fn toggle_task(&mut self, goal_id: Uuid, task_id: Uuid) -> Option<()> {
        let goal = self.find_goal_mut(goal_id)?;
        let task = goal.find_task_by_id_mut(task_id)?;
        task.done = !task.done;
        Some(())
    }

    /// Append a task to a goal's checklist
    ///
    /// Returns the created task, or `None` when the title is blank or the
    /// goal does not exist (silent no-op, tolerant of stale callbacks).
    pub fn add_task(&mut self, goal_id: Uuid, title: &str) -> Option<Task> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let goal = self.find_goal_mut(goal_id)?;
        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            done: false,
            order: goal.next_task_order(),
        };
        goal.tasks.push(task.clone());
        Some(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::goal::Priority;

    fn make_goal(title: &str, order: u32) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            category_id: None,
            priority: Priority::medium,
            deadline: None,
            created_at: now_millis(),
            order,
            tasks: Vec::new(),
            notified: false,
        }
    }

    #[test]
    fn test_serde_round_trip_preserves_document() {
        let mut doc = Document::new();
        doc.add_category(Category {
            id: Uuid::new_v4(),
            name: "Health".to_string(),
            color: "#2ecc71".to_string(),
        });
        let mut goal = make_goal("Run a marathon", 0);
        let cat_id = doc.categories[0].id;
        goal.category_id = Some(cat_id);
        goal.deadline = Some(1_735_689_600_000);
        doc.add_goal(goal);
        doc.add_task(doc.goals[0].id, "Buy running shoes");

        let json = serde_json::to_string(&doc).unwrap();
        let loaded: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_serialized_field_names_are_camel_case() {
        let doc = Document::new();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("\"created_at\""));
    }

    #[test]
    fn test_toggle_task_is_idempotent_under_double_toggle() {
        let mut doc = Document::new();
        doc.add_goal(make_goal("Goal", 0));
        let goal_id = doc.goals[0].id;
        let task = doc.add_task(goal_id, "task").unwrap();

        doc.toggle_task(goal_id, task.id).unwrap();
        assert!(doc.find_goal(goal_id).unwrap().tasks[0].done);

        doc.toggle_task(goal_id, task.id).unwrap();
        assert!(!doc.find_goal(goal_id).unwrap().tasks[0].done);
    }

    #[test]
    fn test_toggle_task_missing_ids_is_noop() {
        let mut doc = Document::new();
        doc.add_goal(make_goal("Goal", 0));
        let goal_id = doc.goals[0].id;

        assert!(doc.toggle_task(Uuid::new_v4(), Uuid::new_v4()).is_none());
        assert!(doc.toggle_task(goal_id, Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_add_task_blank_title_is_noop() {
        let mut doc = Document::new();
        doc.add_goal(make_goal("Goal", 0));
        let goal_id = doc.goals[0].id;

        assert!(doc.add_task(goal_id, "").is_none());
        assert!(doc.add_task(goal_id, "   ").is_none());
        assert!(doc.goals[0].tasks.is_empty());
    }

    #[test]
    fn test_add_task_missing_goal_is_noop() {
        let mut doc = Document::new();
        assert!(doc.add_task(Uuid::new_v4(), "orphan").is_none());
    }

    #[test]
    fn test_add_task_assigns_increasing_order() {
        let mut doc = Document::new();
        doc.add_goal(make_goal("Goal", 0));
        let goal_id = doc.goals[0].id;

        let a = doc.add_task(goal_id, "first").unwrap();
        let b = doc.add_task(goal_id, "second").unwrap();
        assert!(b.order > a.order);
    }

    #[test]
    fn test_remove_and_restore_goal_keeps_position() {
        let mut doc = Document::new();
        doc.add_goal(make_goal("first", 0));
        doc.add_goal(make_goal("second", 1));
        doc.add_goal(make_goal("third", 2));
        let middle = doc.goals[1].id;

        let (pos, goal) = doc.remove_goal(middle).unwrap();
        assert_eq!(pos, 1);
        assert_eq!(doc.goals.len(), 2);

        doc.restore_goal(pos, goal);
        assert_eq!(doc.goals[1].id, middle);
    }

    #[test]
    fn test_next_goal_order_after_gaps() {
        let mut doc = Document::new();
        assert_eq!(doc.next_goal_order(), 0);
        doc.add_goal(make_goal("a", 0));
        doc.add_goal(make_goal("b", 9));
        assert_eq!(doc.next_goal_order(), 10);
    }

    #[test]
    fn test_category_reference_tracking() {
        let mut doc = Document::new();
        let cat = Category {
            id: Uuid::new_v4(),
            name: "Work".to_string(),
            color: "#3498db".to_string(),
        };
        let cat_id = cat.id;
        doc.add_category(cat);
        assert!(!doc.category_is_referenced(cat_id));

        let mut goal = make_goal("Goal", 0);
        goal.category_id = Some(cat_id);
        doc.add_goal(goal);
        assert!(doc.category_is_referenced(cat_id));
        assert_eq!(doc.category_reference_count(cat_id), 1);
    }

    #[test]
    fn test_touch_advances_stamp() {
        let mut doc = Document::new();
        doc.created_at = 0;
        doc.touch();
        assert!(doc.created_at > 0);
    }
}
