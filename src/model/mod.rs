//! GoalPro domain models
//!
//! This module contains the core data structures and their implementations.
//! It is split into submodules for better organization:
//! - `goal`: Category, Goal, Task and the creation/patch helper types
//! - `document`: the aggregate root with all document-level operations
//! - `queries`: deadline queries backing the due-soon scan

mod document;
mod goal;
mod queries;

// Re-export all public types
pub use document::{DOCUMENT_VERSION, Document};
pub use goal::{
    Category, Goal, GoalPatch, NewGoal, Priority, Task, local_date_of, local_date_today,
    now_millis,
};
