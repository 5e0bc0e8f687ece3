//! One editor pane: buffer, router, and viewport

use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

use editor_core::{
    CompletionState, Cursor, EngineConfig, KeyEventRouter, KeywordSet, LineBuffer, Position,
    TextBuffer,
};
use input_types::{InputEvent, KeyCode, KeyEvent};

/// Editor pane.
///
/// Key events go to the router first. Keys it leaves unconsumed are host
/// commands: cursor movement, Delete, undo and redo.
pub struct EditorView {
    buffer: LineBuffer,
    router: KeyEventRouter,
    viewport_lines: usize,
    scroll_top: usize,
    /// Set by the router's buffer-modified listener, drained by the owner
    modified: Rc<Cell<bool>>,
}

impl EditorView {
    pub fn new(keywords: Arc<KeywordSet>, config: EngineConfig) -> Self {
        Self::with_content(keywords, config, "")
    }

    pub fn with_content(keywords: Arc<KeywordSet>, config: EngineConfig, content: &str) -> Self {
        let mut router = KeyEventRouter::with_config(keywords, config);
        let modified = Rc::new(Cell::new(false));
        let flag = modified.clone();
        router.on_buffer_modified(move || flag.set(true));

        Self {
            buffer: LineBuffer::from_string(content),
            router,
            viewport_lines: 20,
            scroll_top: 0,
            modified,
        }
    }

    /// Create view with specified viewport size
    pub fn with_viewport(mut self, viewport_lines: usize) -> Self {
        self.viewport_lines = viewport_lines.max(1);
        self
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn router(&self) -> &KeyEventRouter {
        &self.router
    }

    /// Register extra listeners through the router
    pub fn router_mut(&mut self) -> &mut KeyEventRouter {
        &mut self.router
    }

    pub fn completion(&self) -> &CompletionState {
        self.router.completion()
    }

    pub fn text(&self) -> String {
        self.buffer.as_string()
    }

    pub fn cursor(&self) -> Cursor {
        self.buffer.cursor()
    }

    pub fn cursor_position(&self) -> Position {
        self.buffer.position_of(self.buffer.cursor().position)
    }

    pub fn viewport_lines(&self) -> usize {
        self.viewport_lines
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Buffer rows currently on screen (may run past the last line)
    pub fn visible_rows(&self) -> Range<usize> {
        self.scroll_top..self.scroll_top + self.viewport_lines
    }

    /// Whether the text changed since the last call
    pub fn take_modified(&self) -> bool {
        self.modified.replace(false)
    }

    /// Process an input event
    pub fn process_input(&mut self, event: &InputEvent) -> bool {
        match event.as_key() {
            Some(key) => self.handle_key_event(key),
            None => false,
        }
    }

    /// Returns true when the event was handled by the router or the host
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        if !event.is_press() {
            return false;
        }

        let handled = if self.router.handle_key_event(&mut self.buffer, event) {
            true
        } else {
            let handled = self.handle_host_key(event);
            if handled {
                self.router.refresh_completion(&self.buffer);
            }
            handled
        };

        if handled {
            self.scroll_to_cursor();
        }
        handled
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.buffer.undo();
        if undone {
            self.router.notify_buffer_modified();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.buffer.redo();
        if redone {
            self.router.notify_buffer_modified();
        }
        redone
    }

    fn handle_host_key(&mut self, event: &KeyEvent) -> bool {
        let modifiers = event.modifiers;
        let extend = modifiers.is_shift();

        match event.code {
            KeyCode::Char('z') | KeyCode::Char('Z') if modifiers.is_ctrl() && modifiers.is_shift() => self.redo(),
            KeyCode::Char('z') if modifiers.is_ctrl() => self.undo(),
            KeyCode::Char('y') if modifiers.is_ctrl() => self.redo(),
            KeyCode::Left => {
                self.buffer.move_cursor(-1, extend);
                true
            }
            KeyCode::Right => {
                self.buffer.move_cursor(1, extend);
                true
            }
            KeyCode::Up => {
                self.move_vertically(-1, extend);
                true
            }
            KeyCode::Down => {
                self.move_vertically(1, extend);
                true
            }
            KeyCode::Home => {
                let row = self.cursor_position().row;
                let target = self.buffer.offset_of(Position::new(row, 0));
                self.move_to(target, extend);
                true
            }
            KeyCode::End => {
                let row = self.cursor_position().row;
                let target = self.buffer.offset_of(Position::new(row, usize::MAX));
                self.move_to(target, extend);
                true
            }
            KeyCode::Delete => {
                self.delete_forward();
                true
            }
            _ => false,
        }
    }

    fn move_to(&mut self, target: usize, extend: bool) {
        let cursor = self.buffer.cursor();
        let anchor = if extend {
            Some(cursor.anchor.unwrap_or(cursor.position))
        } else {
            None
        };
        self.buffer.set_cursor(Cursor {
            position: target,
            anchor,
        });
    }

    // Column is clamped to the target line, not remembered across moves.
    fn move_vertically(&mut self, rows: isize, extend: bool) {
        let current = self.cursor_position();
        let last = self.buffer.line_count().saturating_sub(1);
        let row = current.row.saturating_add_signed(rows).min(last);
        let target = self.buffer.offset_of(Position::new(row, current.col));
        self.move_to(target, extend);
    }

    fn delete_forward(&mut self) {
        let cursor = self.buffer.cursor();
        let revision = self.buffer.revision();
        match cursor.selection() {
            Some(selected) => self.buffer.remove_range(selected.start, selected.len()),
            None if cursor.position < self.buffer.len_chars() => self.buffer.remove_range(cursor.position, 1),
            None => {}
        }
        if self.buffer.revision() != revision {
            self.router.notify_buffer_modified();
        }
    }

    fn scroll_to_cursor(&mut self) {
        let row = self.cursor_position().row;
        if row < self.scroll_top {
            self.scroll_top = row;
        } else if row >= self.scroll_top + self.viewport_lines {
            self.scroll_top = row + 1 - self.viewport_lines;
        }
    }
}
