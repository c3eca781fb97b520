//! Backup export and restore import
//!
//! Export serializes the full document to pretty-printed JSON with a
//! date-stamped default filename. Import accepts any text that parses as
//! a versioned document and is destructive: the tracker replaces its
//! in-memory document wholesale, with no merge of existing data.

use crate::model::Document;
use crate::storage::parse_document;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// Serialize the document as a pretty-printed backup payload
pub fn export_string(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document).context("failed to serialize backup")
}

/// Default backup filename embedding the export date
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("goalpro-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Write the document to a backup file
pub fn export_to_file(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    let content = export_string(document)?;
    fs::write(path.as_ref(), content)
        .with_context(|| format!("failed to write backup to {}", path.as_ref().display()))?;
    Ok(())
}

/// Parse uploaded backup text as a document
///
/// Rejects payloads lacking a truthy version stamp; the caller's existing
/// document stays untouched on failure.
pub fn import_string(content: &str) -> Result<Document> {
    parse_document(content).context("import aborted")
}

/// Read and parse a backup file as a document
pub fn import_from_file(path: impl AsRef<Path>) -> Result<Document> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed to read backup {}", path.as_ref().display()))?;
    import_string(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_filename_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(
            default_export_filename(date),
            "goalpro-backup-2026-08-29.json"
        );
    }

    #[test]
    fn test_export_is_pretty_printed() {
        let exported = export_string(&Document::new()).unwrap();
        // Pretty printing puts each field on its own line
        assert!(exported.lines().count() > 1);
        assert!(exported.contains("\"version\""));
    }

    #[test]
    fn test_export_then_import_round_trips() {
        let mut doc = Document::new();
        doc.add_goal(crate::model::Goal {
            id: uuid::Uuid::new_v4(),
            title: "Backup me".to_string(),
            description: String::new(),
            category_id: None,
            priority: Default::default(),
            deadline: None,
            created_at: crate::model::now_millis(),
            order: 0,
            tasks: Vec::new(),
            notified: false,
        });

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(default_export_filename(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        ));
        export_to_file(&doc, &path).unwrap();

        let imported = import_from_file(&path).unwrap();
        assert_eq!(imported, doc);
    }

    #[test]
    fn test_import_rejects_missing_version() {
        let err = import_string(r#"{"goals": [], "categories": []}"#).unwrap_err();
        assert!(format!("{:#}", err).contains("version"));
    }

    #[test]
    fn test_import_rejects_non_json() {
        assert!(import_string("definitely not json").is_err());
    }
}
