//! GoalPro core library
//!
//! A goal/task tracker core: a list of goals, each with a checklist of
//! tasks, persisted as a single JSON document and rendered as a derived
//! text view.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Facade**: [`GoalTracker`] - owns the in-memory document and routes
//!   every read/write through one place
//! - **Domain**: `model` + `view` modules - document model, CRUD mutation
//!   helpers, and the pure view projection
//! - **Persistence**: `storage` + `scheduler` + `sync` + `transfer` -
//!   file-backed store with debounced saves, cross-process adoption of
//!   external writes, and backup import/export
//!
//! # Example
//!
//! ```no_run
//! use goalpro::{GoalTracker, NewGoal};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let tracker = GoalTracker::new("goals.json")?;
//!     let goal = tracker.create_goal(NewGoal {
//!         title: "Learn Rust".to_string(),
//!         ..Default::default()
//!     })?;
//!     tracker.add_task(goal.id, "read the book");
//!     tracker.flush()?;
//!     Ok(())
//! }
//! ```

pub mod logging;
mod model;
mod scheduler;
mod storage;
mod sync;
pub mod transfer;
pub mod view;

use anyhow::{Result, bail};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use scheduler::SaveScheduler;

// Re-export commonly used types
pub use model::{
    Category, DOCUMENT_VERSION, Document, Goal, GoalPatch, NewGoal, Priority, Task,
    local_date_today, now_millis,
};
pub use scheduler::DEFAULT_DEBOUNCE;
pub use storage::Storage;
pub use sync::SyncOutcome;
pub use view::{Filter, Tab};

/// How long a deleted goal stays restorable
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(5);

/// Deadline horizon for the due-soon scan (one hour)
const NOTIFY_WINDOW_MILLIS: i64 = 60 * 60 * 1000;

struct PendingUndo {
    goal: Goal,
    position: usize,
    deleted_at: Instant,
}

/// Application-state owner for the goal tracker
///
/// Holds the single in-memory document plus the persistence machinery.
/// All mutations run through this facade: each one validates, mutates in
/// place, and arms the debounced save. Failures are either returned
/// errors (validation), silent no-ops (referential misses, tolerant of
/// stale UI callbacks), or recovered-from with a logged reason (storage).
pub struct GoalTracker {
    data: Mutex<Document>,
    storage: Storage,
    scheduler: Mutex<SaveScheduler>,
    undo: Mutex<Option<PendingUndo>>,
    undo_window: Duration,
    startup_notice: Option<String>,
}

impl GoalTracker {
    /// Open a tracker over the given store file
    ///
    /// Missing or corrupt storage falls back to an empty document; the
    /// fallback reason is kept and exposed via [`startup_notice`] so the
    /// caller can inform the user.
    ///
    /// [`startup_notice`]: GoalTracker::startup_notice
    pub fn new(storage_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_timing(storage_path, DEFAULT_DEBOUNCE, DEFAULT_UNDO_WINDOW)
    }

    /// Open a tracker with explicit debounce and undo-window durations
    pub fn with_timing(
        storage_path: impl AsRef<Path>,
        debounce: Duration,
        undo_window: Duration,
    ) -> Result<Self> {
        let storage = Storage::new(storage_path);
        let (document, startup_notice) = storage.load_or_default();
        Ok(Self {
            data: Mutex::new(document),
            storage,
            scheduler: Mutex::new(SaveScheduler::new(debounce)),
            undo: Mutex::new(None),
            undo_window,
            startup_notice,
        })
    }

    /// Why the last load fell back to an empty document, if it did
    pub fn startup_notice(&self) -> Option<&str> {
        self.startup_notice.as_deref()
    }

    /// Clone of the current in-memory document
    pub fn snapshot(&self) -> Document {
        self.data.lock().unwrap().clone()
    }

    fn mark_dirty(&self) {
        self.scheduler.lock().unwrap().note_mutation(Instant::now());
    }

    /// Write current state to the store, bypassing the debounce
    ///
    /// Refreshes the document stamp first so other processes observe
    /// this write as the newest.
    pub fn persist_now(&self) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.touch();
        self.storage.save(&data)?;
        drop(data);
        self.scheduler.lock().unwrap().take_pending();
        Ok(())
    }

    /// Flush a pending debounced write, if any
    ///
    /// The explicit teardown hook: call before exit so the last edits are
    /// not lost inside the debounce window.
    pub fn flush(&self) -> Result<()> {
        let pending = self.scheduler.lock().unwrap().take_pending();
        if pending {
            self.persist_now()?;
        }
        Ok(())
    }

    /// Drive debounced saves until cancelled
    ///
    /// Sleeps until the pending write comes due, performs it, and waits
    /// for the next mutation. Meant to be spawned alongside the UI loop.
    pub async fn run_autosave(&self) {
        loop {
            let due_at = self.scheduler.lock().unwrap().due_at();
            match due_at {
                Some(due) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await;
                    let expired = self.scheduler.lock().unwrap().take_due(Instant::now());
                    if expired && let Err(e) = self.persist_now() {
                        warn!("debounced save failed: {:#}", e);
                    }
                }
                None => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    }

    // --- CRUD operations ---

    /// Create a category
    ///
    /// Validates a non-empty name; the color string is opaque to the core.
    pub fn create_category(&self, name: &str, color: &str) -> Result<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Category name must not be empty");
        }
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            color: color.to_string(),
        };
        let id = category.id;
        self.data.lock().unwrap().add_category(category);
        self.mark_dirty();
        Ok(id)
    }

    /// Delete a category
    ///
    /// Blocked while any goal still references it; reassign or delete the
    /// referring goals first. A missing id is a silent no-op.
    pub fn delete_category(&self, id: Uuid) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        if data.find_category(id).is_none() {
            return Ok(());
        }
        let referrers = data.category_reference_count(id);
        if referrers > 0 {
            bail!(
                "Category is still referenced by {} goal(s); reassign them first",
                referrers
            );
        }
        data.remove_category(id);
        drop(data);
        self.mark_dirty();
        Ok(())
    }

    /// Create a goal
    ///
    /// Validates a non-empty title and, when given, an existing category
    /// reference. Id, creation time and order key are assigned here.
    pub fn create_goal(&self, fields: NewGoal) -> Result<Goal> {
        if fields.title.trim().is_empty() {
            bail!("Goal title must not be empty");
        }
        let mut data = self.data.lock().unwrap();
        if let Some(category_id) = fields.category_id
            && data.find_category(category_id).is_none()
        {
            bail!("Category '{}' does not exist", category_id);
        }
        let goal = Goal {
            id: Uuid::new_v4(),
            title: fields.title.trim().to_string(),
            description: fields.description,
            category_id: fields.category_id,
            priority: fields.priority,
            deadline: fields.deadline,
            created_at: now_millis(),
            order: data.next_goal_order(),
            tasks: Vec::new(),
            notified: false,
        };
        data.add_goal(goal.clone());
        drop(data);
        self.mark_dirty();
        Ok(goal)
    }

    /// Shallow-merge a patch into a goal; no-op if the id is unknown
    pub fn update_goal(&self, id: Uuid, patch: GoalPatch) {
        let mut data = self.data.lock().unwrap();
        let Some(goal) = data.find_goal_mut(id) else {
            return;
        };
        patch.apply(goal);
        drop(data);
        self.mark_dirty();
    }

    /// Delete a goal, keeping it restorable for the undo window
    ///
    /// Returns whether a goal was removed. Only the most recent deletion
    /// is restorable.
    pub fn delete_goal(&self, id: Uuid) -> bool {
        let mut data = self.data.lock().unwrap();
        let Some((position, goal)) = data.remove_goal(id) else {
            return false;
        };
        drop(data);
        *self.undo.lock().unwrap() = Some(PendingUndo {
            goal,
            position,
            deleted_at: Instant::now(),
        });
        self.mark_dirty();
        true
    }

    /// Restore the most recently deleted goal
    ///
    /// Succeeds only within the undo window; the goal comes back with its
    /// tasks and original order value intact.
    pub fn undo_delete(&self) -> bool {
        let Some(pending) = self.undo.lock().unwrap().take() else {
            return false;
        };
        if pending.deleted_at.elapsed() > self.undo_window {
            return false;
        }
        self.data
            .lock()
            .unwrap()
            .restore_goal(pending.position, pending.goal);
        self.mark_dirty();
        true
    }

    /// Append a task to a goal's checklist
    ///
    /// Silent no-op when the title is blank or the goal is missing.
    pub fn add_task(&self, goal_id: Uuid, title: &str) -> Option<Task> {
        let task = self.data.lock().unwrap().add_task(goal_id, title)?;
        self.mark_dirty();
        Some(task)
    }

    /// Flip a task's done flag; silent no-op on any referential miss
    pub fn toggle_task(&self, goal_id: Uuid, task_id: Uuid) {
        if self
            .data
            .lock()
            .unwrap()
            .toggle_task(goal_id, task_id)
            .is_some()
        {
            self.mark_dirty();
        }
    }

    // --- View ---

    /// Render the current document through a filter
    pub fn render(&self, filter: &Filter) -> String {
        let data = self.data.lock().unwrap();
        view::render_text(&data, filter, local_date_today())
    }

    // --- Import / export ---

    /// Export the document as a backup file
    ///
    /// Without an explicit path, writes a date-stamped filename into the
    /// current directory. Returns the path written.
    pub fn export(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        let path = path
            .unwrap_or_else(|| PathBuf::from(transfer::default_export_filename(local_date_today())));
        let data = self.data.lock().unwrap();
        transfer::export_to_file(&data, &path)?;
        Ok(path)
    }

    /// Replace the document wholesale from a backup file
    ///
    /// Rejects files lacking a version stamp, leaving existing state
    /// untouched. On success the new document is persisted immediately,
    /// bypassing the debounce. Destructive - no merge.
    pub fn import(&self, path: impl AsRef<Path>) -> Result<()> {
        let imported = transfer::import_from_file(path)?;
        *self.data.lock().unwrap() = imported;
        *self.undo.lock().unwrap() = None;
        self.persist_now()?;
        Ok(())
    }

    // --- Cross-process sync ---

    /// Reconcile against the store once
    ///
    /// Adopts the stored document wholesale iff its stamp is strictly
    /// newer than the in-memory one; ties and older stamps keep local
    /// state. A pending local save is cancelled on adoption so the
    /// adopted state is not immediately overwritten.
    pub fn sync_from_disk(&self) -> SyncOutcome {
        if !self.storage.file_path().exists() {
            return SyncOutcome::Unavailable;
        }
        let remote = match self.storage.load() {
            Ok(doc) => doc,
            Err(e) => {
                warn!("ignoring unreadable external write: {:#}", e);
                return SyncOutcome::Unavailable;
            }
        };
        let mut data = self.data.lock().unwrap();
        if sync::should_adopt(data.created_at, remote.created_at) {
            *data = remote;
            drop(data);
            self.scheduler.lock().unwrap().take_pending();
            *self.undo.lock().unwrap() = None;
            info!("adopted newer document from store");
            SyncOutcome::Adopted
        } else {
            SyncOutcome::Ignored
        }
    }

    /// Poll the store for external writes until cancelled
    pub async fn watch_external(&self, poll: Duration) {
        let mut interval = tokio::time::interval(poll);
        loop {
            interval.tick().await;
            self.sync_from_disk();
        }
    }

    // --- Notifications ---

    /// Titles of goals due within the next hour, each surfaced once
    pub fn collect_due_notifications(&self) -> Vec<String> {
        let titles = self
            .data
            .lock()
            .unwrap()
            .take_due_within(now_millis(), NOTIFY_WINDOW_MILLIS);
        if !titles.is_empty() {
            self.mark_dirty();
        }
        titles
    }
}

impl Drop for GoalTracker {
    fn drop(&mut self) {
        // Flush pending writes on teardown so the last edits inside the
        // debounce window are not lost.
        if let Err(e) = self.flush() {
            warn!("flush on teardown failed: {:#}", e);
        }
    }
}
