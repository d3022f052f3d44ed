//! Writing the final document to disk.

use crate::utils::slugify;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used when the topic has no usable characters.
pub const DEFAULT_EXPORT_NAME: &str = "blog_post.md";

/// Derives the export file name from the topic.
///
/// Lowercases, turns every run of non-alphanumeric characters into `_`,
/// trims separators from both ends and appends `.md`.
#[must_use]
pub fn export_file_name(topic: &str) -> String {
    let stem = slugify(topic, '_');
    if stem.is_empty() {
        DEFAULT_EXPORT_NAME.to_string()
    } else {
        format!("{stem}.md")
    }
}

/// Writes `document` as UTF-8 into `dir`, creating the directory if needed.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns the IO error if the directory cannot be created or the file
/// cannot be written.
pub fn export_document(dir: &Path, topic: &str, document: &str) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(topic));
    std::fs::write(&path, document)?;
    info!(path = %path.display(), bytes = document.len(), "Exported document");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Remote Work Productivity"), "remote_work_productivity.md");
        assert_eq!(export_file_name("  AI & ML: 2025 Trends!  "), "ai_ml_2025_trends.md");
        assert_eq!(export_file_name("!!!"), DEFAULT_EXPORT_NAME);
        assert_eq!(export_file_name(""), DEFAULT_EXPORT_NAME);
    }

    #[test]
    fn test_export_document() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");

        let path = export_document(&target, "Edge AI", "# Edge AI\n").unwrap();

        assert_eq!(path, target.join("edge_ai.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Edge AI\n");
    }

    #[test]
    fn test_export_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        export_document(dir.path(), "Edge AI", "first").unwrap();
        let path = export_document(dir.path(), "Edge AI", "second").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }
}
