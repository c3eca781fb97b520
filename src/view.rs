//! View projection over the document
//!
//! Purely derived, no owned state: every call recomputes a filtered,
//! order-sorted list from the document. No incremental diffing - fine at
//! personal-tracker scales.

use crate::model::{Document, Goal, local_date_of};
use chrono::NaiveDate;
use std::str::FromStr;

/// Display tab selecting a goal subset
///
/// Uses snake_case naming to match the way tabs are addressed externally.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Every goal
    #[default]
    all,
    /// Goals whose deadline falls on today's local calendar date
    today,
    /// Goals with at least one task and no undone tasks
    completed,
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Tab::all),
            "today" => Ok(Tab::today),
            "completed" => Ok(Tab::completed),
            _ => Err(format!(
                "Invalid tab '{}'. Valid options are: all, today, completed",
                s
            )),
        }
    }
}

/// Active filter state applied to the projection
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Free-text query matched case-insensitively against goal title,
    /// description, and task titles
    pub query: Option<String>,
    /// Restrict to goals referencing this category
    pub category: Option<uuid::Uuid>,
    /// Tab subset
    pub tab: Tab,
}

impl Filter {
    fn matches(&self, goal: &Goal, today: NaiveDate) -> bool {
        match self.tab {
            Tab::all => {}
            Tab::today => {
                let due_today = goal
                    .deadline
                    .and_then(local_date_of)
                    .is_some_and(|d| d == today);
                if !due_today {
                    return false;
                }
            }
            Tab::completed => {
                if !goal.is_completed() {
                    return false;
                }
            }
        }

        if let Some(category) = self.category
            && goal.category_id != Some(category)
        {
            return false;
        }

        if let Some(ref query) = self.query {
            let q = query.to_lowercase();
            if !q.is_empty() {
                let hit = goal.title.to_lowercase().contains(&q)
                    || goal.description.to_lowercase().contains(&q)
                    || goal.tasks.iter().any(|t| t.title.to_lowercase().contains(&q));
                if !hit {
                    return false;
                }
            }
        }

        true
    }
}

/// Project the document through a filter, sorted by order key
///
/// `today` is passed in so the "today" tab is testable against a fixed
/// date; the tracker supplies the current local date.
pub fn project<'a>(document: &'a Document, filter: &Filter, today: NaiveDate) -> Vec<&'a Goal> {
    let mut goals: Vec<&Goal> = document
        .goals
        .iter()
        .filter(|g| filter.matches(g, today))
        .collect();
    goals.sort_by_key(|g| g.order);
    goals
}

/// Render the projection as a displayable text list
pub fn render_text(document: &Document, filter: &Filter, today: NaiveDate) -> String {
    let goals = project(document, filter, today);
    if goals.is_empty() {
        return "No goals found".to_string();
    }

    let mut result = format!("Found {} goal(s):\n\n", goals.len());
    for goal in goals {
        result.push_str(&format!(
            "- [{}] {} ({}%, priority: {:?})\n",
            goal.id, goal.title, goal.progress_percent(), goal.priority
        ));
        if !goal.description.is_empty() {
            result.push_str(&format!("  {}\n", goal.description));
        }
        if let Some(category) = goal
            .category_id
            .and_then(|id| document.find_category(id))
        {
            result.push_str(&format!("  Category: {}\n", category.name));
        }
        if let Some(date) = goal.deadline.and_then(local_date_of) {
            result.push_str(&format!("  Deadline: {}\n", date));
        }
        for task in &goal.tasks {
            let mark = if task.done { "x" } else { " " };
            result.push_str(&format!("  [{}] {} ({})\n", mark, task.title, task.id));
        }
    }
    result
}
