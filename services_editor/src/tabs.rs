//! Tabbed document management

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use editor_core::KeywordSet;
use input_types::{KeyCode, KeyEvent};
use thiserror::Error;
use uuid::Uuid;

use crate::document::{window_title, DocumentMetadata};
use crate::io::{DocumentStore, IoError, ScriptRunner};
use crate::keywords;
use crate::settings::EditorSettings;
use crate::view::EditorView;

/// Stable tab identity, independent of position in the tab strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab:{}", self.0)
    }
}

/// Tab error
#[derive(Debug, Error)]
pub enum TabError {
    #[error("No such tab: {0}")]
    NotFound(TabId),

    #[error("No tab is open")]
    NoCurrentTab,

    #[error("Document has no path; save it under a name first")]
    NeedsPath,

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Tab result
pub type TabResult<T> = Result<T, TabError>;

pub struct Tab {
    id: TabId,
    view: EditorView,
    metadata: DocumentMetadata,
}

impl Tab {
    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    // Re-derive the modified flag if the text changed since last time.
    fn sync_metadata(&mut self) {
        if self.view.take_modified() && self.metadata.refresh(&self.view.text()) {
            tracing::debug!(tab = %self.id, modified = self.metadata.is_modified(), "modified state changed");
        }
    }
}

/// Owns the open tabs and which one has focus.
///
/// There is always a current tab once any tab exists; closing the last one
/// opens a fresh untitled tab.
pub struct TabManager<S: DocumentStore> {
    store: S,
    settings: EditorSettings,
    keywords: Arc<KeywordSet>,
    tabs: Vec<Tab>,
    current: Option<usize>,
}

impl<S: DocumentStore> TabManager<S> {
    pub fn new(store: S, settings: EditorSettings) -> Self {
        Self {
            store,
            settings,
            keywords: keywords::shared(),
            tabs: Vec::new(),
            current: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> + '_ {
        self.tabs.iter()
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn current(&self) -> Option<&Tab> {
        self.current.and_then(|index| self.tabs.get(index))
    }

    pub fn current_id(&self) -> Option<TabId> {
        self.current().map(Tab::id)
    }

    /// Open an empty untitled tab and focus it
    pub fn new_tab(&mut self) -> TabId {
        self.push_tab("", DocumentMetadata::untitled(""))
    }

    /// Open `path`, or focus the tab that already has it
    pub fn open(&mut self, path: impl AsRef<Path>) -> TabResult<TabId> {
        let path = path.as_ref();
        if let Some(index) = self.index_of_path(path) {
            self.current = Some(index);
            tracing::debug!(path = %path.display(), "focused already open document");
            return Ok(self.tabs[index].id);
        }

        let content = self.store.load(path).map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "open failed");
            err
        })?;
        tracing::info!(path = %path.display(), "document opened");
        let metadata = DocumentMetadata::from_file(path, content.as_str());
        Ok(self.push_tab(&content, metadata))
    }

    pub fn close(&mut self, id: TabId) -> TabResult<()> {
        let index = self.index_of(id)?;
        self.tabs.remove(index);
        tracing::debug!(tab = %id, "tab closed");

        if self.tabs.is_empty() {
            self.current = None;
            self.new_tab();
            return Ok(());
        }

        self.current = self.current.map(|current| {
            if current > index || current == self.tabs.len() {
                current - 1
            } else {
                current
            }
        });
        Ok(())
    }

    pub fn set_current(&mut self, id: TabId) -> TabResult<()> {
        self.current = Some(self.index_of(id)?);
        Ok(())
    }

    /// Focus the tab to the right, wrapping around
    pub fn next_tab(&mut self) -> Option<TabId> {
        let current = self.current?;
        let next = (current + 1) % self.tabs.len();
        self.current = Some(next);
        Some(self.tabs[next].id)
    }

    /// Focus the tab to the left, wrapping around
    pub fn prev_tab(&mut self) -> Option<TabId> {
        let current = self.current?;
        let len = self.tabs.len();
        let prev = (current + len - 1) % len;
        self.current = Some(prev);
        Some(self.tabs[prev].id)
    }

    /// Write the current tab to its path.
    ///
    /// Returns false when there was nothing to save.
    pub fn save_current(&mut self) -> TabResult<bool> {
        let tab = self.current_tab_mut()?;
        tab.sync_metadata();
        let path = tab.metadata.path().map(Path::to_path_buf).ok_or(TabError::NeedsPath)?;
        if !tab.metadata.is_modified() {
            return Ok(false);
        }
        self.write_current(path, false)?;
        Ok(true)
    }

    /// Write the current tab under `path` and associate it with that path
    pub fn save_current_as(&mut self, path: impl Into<PathBuf>) -> TabResult<()> {
        self.current_tab_mut()?.sync_metadata();
        self.write_current(path.into(), true)
    }

    /// Route a key to the current tab.
    ///
    /// Ctrl+Tab and Ctrl+Shift+Tab switch tabs. Returns false when no tab
    /// handled the key.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        if event.is_press() && event.modifiers.is_ctrl() {
            match event.code {
                KeyCode::Tab if !event.modifiers.is_shift() => return self.next_tab().is_some(),
                KeyCode::Tab | KeyCode::Backtab => return self.prev_tab().is_some(),
                _ => {}
            }
        }

        let Ok(tab) = self.current_tab_mut() else {
            return false;
        };
        let handled = tab.view.handle_key_event(event);
        tab.sync_metadata();
        handled
    }

    /// Tabs with unsaved changes, in tab order
    pub fn modified_tabs(&self) -> Vec<TabId> {
        self.tabs
            .iter()
            .filter(|tab| tab.metadata.is_modified())
            .map(Tab::id)
            .collect()
    }

    /// Save the current document if needed, then hand it to `runner`
    pub fn run_current<R: ScriptRunner + ?Sized>(&mut self, runner: &mut R) -> TabResult<()> {
        self.save_current()?;
        let tab = self.current_tab_mut()?;
        let path = tab.metadata.path().map(Path::to_path_buf).ok_or(TabError::NeedsPath)?;
        tracing::info!(path = %path.display(), "running script");
        runner.run(&path).map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "script runner failed");
            TabError::from(err)
        })
    }

    pub fn tab_title(&self, id: TabId) -> Option<String> {
        self.tab(id).map(|tab| tab.metadata.tab_title(&self.settings.untitled_name))
    }

    /// Labels for the tab strip, in tab order
    pub fn tab_titles(&self) -> Vec<String> {
        self.tabs
            .iter()
            .map(|tab| tab.metadata.tab_title(&self.settings.untitled_name))
            .collect()
    }

    pub fn window_title(&self) -> String {
        window_title(
            &self.settings.app_title,
            self.current().map(Tab::metadata),
            &self.settings.untitled_name,
        )
    }

    fn push_tab(&mut self, content: &str, metadata: DocumentMetadata) -> TabId {
        let view = EditorView::with_content(self.keywords.clone(), self.settings.engine, content)
            .with_viewport(self.settings.viewport_lines);
        let id = TabId::new();
        self.tabs.push(Tab { id, view, metadata });
        self.current = Some(self.tabs.len() - 1);
        tracing::debug!(tab = %id, "tab opened");
        id
    }

    fn write_current(&mut self, path: PathBuf, rename: bool) -> TabResult<()> {
        let index = self.current.ok_or(TabError::NoCurrentTab)?;
        let content = self.tabs[index].view.text();
        if let Err(err) = self.store.save(&path, &content) {
            tracing::warn!(path = %path.display(), error = %err, "save failed");
            return Err(err.into());
        }
        tracing::info!(path = %path.display(), "document saved");
        let new_path = if rename { Some(path) } else { None };
        self.tabs[index].metadata.mark_saved(content, new_path);
        Ok(())
    }

    fn current_tab_mut(&mut self) -> TabResult<&mut Tab> {
        let index = self.current.ok_or(TabError::NoCurrentTab)?;
        self.tabs.get_mut(index).ok_or(TabError::NoCurrentTab)
    }

    fn index_of(&self, id: TabId) -> TabResult<usize> {
        self.tabs
            .iter()
            .position(|tab| tab.id == id)
            .ok_or(TabError::NotFound(id))
    }

    fn index_of_path(&self, path: &Path) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.metadata.path() == Some(path))
    }
}
