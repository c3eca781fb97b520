use crate::model::Document;
use anyhow::{Context, Result, bail};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed persistent store for the whole document
///
/// Persistence is shared mutable state with no locking: several processes
/// may point at the same file, and concurrent writers race (last writer
/// wins). The sync module handles adoption of external writes.
pub struct Storage {
    file_path: PathBuf,
}

/// Parse persisted or imported text as a document
///
/// Accepts the text only when it parses as JSON and carries a truthy
/// `version` stamp. Anything else is rejected so callers can fall back
/// (load) or abort untouched (import).
pub fn parse_document(content: &str) -> Result<Document> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("stored data is not valid JSON")?;

    let version_ok = match value.get("version") {
        Some(v) => v.as_u64().is_some_and(|n| n > 0),
        None => false,
    };
    if !version_ok {
        bail!("stored data has no version stamp");
    }

    serde_json::from_value(value).context("stored data does not match the document format")
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the document, failing on unreadable or corrupt data
    ///
    /// A missing file is not an error: it yields a fresh default document,
    /// matching first-run behavior.
    pub fn load(&self) -> Result<Document> {
        if !self.file_path.exists() {
            return Ok(Document::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("failed to read {}", self.file_path.display()))?;
        parse_document(&content)
    }

    /// Load the document, falling back to a default on corrupt data
    ///
    /// Returns the document together with the fallback reason, if any,
    /// so the caller can inform the user. Corruption is also logged here;
    /// it never propagates as an error.
    pub fn load_or_default(&self) -> (Document, Option<String>) {
        match self.load() {
            Ok(doc) => (doc, None),
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!("falling back to empty document: {}", reason);
                (Document::new(), Some(reason))
            }
        }
    }

    /// Persist the document
    ///
    /// Serializes to JSON and writes via a sibling temp file followed by a
    /// rename, so a crash mid-write cannot leave a torn document behind.
    /// Failures (disk full, permissions) come back with a user-facing hint
    /// and must not crash the caller.
    pub fn save(&self, document: &Document) -> Result<()> {
        let content = serde_json::to_string_pretty(document)?;
        let tmp_path = self.tmp_path();

        fs::write(&tmp_path, &content).with_context(|| {
            format!(
                "failed to write {} - storage may be full, consider exporting your data",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, &self.file_path)
            .with_context(|| format!("failed to replace {}", self.file_path.display()))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "goalpro.json".into());
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Goal, Priority, now_millis};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn storage_in(dir: &TempDir) -> Storage {
        Storage::new(dir.path().join("goals.json"))
    }

    #[test]
    fn test_load_missing_file_yields_default() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let doc = storage.load().unwrap();
        assert!(doc.goals.is_empty());
        assert!(doc.categories.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let mut doc = Document::new();
        doc.add_goal(Goal {
            id: Uuid::new_v4(),
            title: "Read more".to_string(),
            description: "one book a month".to_string(),
            category_id: None,
            priority: Priority::high,
            deadline: None,
            created_at: now_millis(),
            order: 0,
            tasks: Vec::new(),
            notified: false,
        });
        storage.save(&doc).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_save_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.save(&Document::new()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("goals.json")]);
    }

    #[test]
    fn test_load_or_default_recovers_from_invalid_json() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        fs::write(storage.file_path(), "{ not json").unwrap();

        let (doc, reason) = storage.load_or_default();
        assert!(doc.goals.is_empty());
        assert!(reason.is_some());
    }

    #[test]
    fn test_load_or_default_recovers_from_missing_version() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        fs::write(storage.file_path(), r#"{"goals": [], "categories": []}"#).unwrap();

        let (doc, reason) = storage.load_or_default();
        assert!(doc.goals.is_empty());
        assert!(reason.unwrap().contains("version"));
    }

    #[test]
    fn test_parse_document_rejects_zero_version() {
        let err =
            parse_document(r#"{"version": 0, "createdAt": 1, "goals": [], "categories": []}"#)
                .unwrap_err();
        assert!(format!("{:#}", err).contains("version"));
    }

    #[test]
    fn test_parse_document_accepts_versioned_payload() {
        let doc =
            parse_document(r#"{"version": 2, "createdAt": 123, "goals": [], "categories": []}"#)
                .unwrap();
        assert_eq!(doc.created_at, 123);
    }
}
