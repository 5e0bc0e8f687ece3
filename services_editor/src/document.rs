//! Per-tab document metadata and title formatting

use std::path::{Path, PathBuf};

/// File association and modified state of one tab
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentMetadata {
    path: Option<PathBuf>,
    original_content: String,
    is_modified: bool,
}

impl DocumentMetadata {
    /// Unsaved document whose baseline is `content`
    pub fn untitled(content: impl Into<String>) -> Self {
        Self {
            path: None,
            original_content: content.into(),
            is_modified: false,
        }
    }

    /// Document freshly loaded from `path`
    pub fn from_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            original_content: content.into(),
            is_modified: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Compare `current` against the saved baseline.
    ///
    /// Returns true when the modified flag flipped.
    pub fn refresh(&mut self, current: &str) -> bool {
        let modified = current != self.original_content;
        let flipped = modified != self.is_modified;
        self.is_modified = modified;
        flipped
    }

    /// Record a successful save of `content`, optionally under a new path
    pub fn mark_saved(&mut self, content: impl Into<String>, path: Option<PathBuf>) {
        if let Some(path) = path {
            self.path = Some(path);
        }
        self.original_content = content.into();
        self.is_modified = false;
    }

    /// File name, or `untitled_name` for documents without a path
    pub fn display_name(&self, untitled_name: &str) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| untitled_name.to_string())
    }

    /// Tab strip label, with ` *` once the text differs from the baseline
    pub fn tab_title(&self, untitled_name: &str) -> String {
        let mut title = self.display_name(untitled_name);
        if self.is_modified {
            title.push_str(" *");
        }
        title
    }
}

/// Window caption for the current tab, or the bare app title with no tab
pub fn window_title(app_title: &str, current: Option<&DocumentMetadata>, untitled_name: &str) -> String {
    match current {
        None => app_title.to_string(),
        Some(document) => match document.path() {
            Some(path) => format!("{} - {}", app_title, path.display()),
            None => format!("{} - {}", app_title, untitled_name),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_tracks_baseline() {
        let mut document = DocumentMetadata::untitled("x");
        assert!(document.refresh("xy"));
        assert!(document.is_modified());
        assert!(!document.refresh("xyz"));
        assert!(document.refresh("x"));
        assert!(!document.is_modified());
    }

    #[test]
    fn test_tab_title() {
        let mut document = DocumentMetadata::from_file("/tmp/work/main.py", "");
        assert_eq!(document.tab_title("untitled.py"), "main.py");
        document.refresh("a");
        assert_eq!(document.tab_title("untitled.py"), "main.py *");

        let untitled = DocumentMetadata::untitled("");
        assert_eq!(untitled.tab_title("untitled.py"), "untitled.py");
    }

    #[test]
    fn test_mark_saved() {
        let mut document = DocumentMetadata::untitled("");
        document.refresh("print(1)");
        document.mark_saved("print(1)", Some(PathBuf::from("run.py")));
        assert!(!document.is_modified());
        assert_eq!(document.path(), Some(Path::new("run.py")));
        assert_eq!(document.original_content(), "print(1)");
    }

    #[test]
    fn test_window_title() {
        assert_eq!(window_title("Malachite IDE", None, "untitled.py"), "Malachite IDE");

        let untitled = DocumentMetadata::untitled("");
        assert_eq!(
            window_title("Malachite IDE", Some(&untitled), "untitled.py"),
            "Malachite IDE - untitled.py"
        );

        let file = DocumentMetadata::from_file("src/app.py", "");
        assert_eq!(
            window_title("Malachite IDE", Some(&file), "untitled.py"),
            "Malachite IDE - src/app.py"
        );
    }
}
