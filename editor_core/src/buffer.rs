//! Text buffer capability, cursor, and the line-vector buffer hosts use
//!
//! Offsets count `char`s, with every line break counting as one.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Line/column position, both in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn zero() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Cursor with optional selection anchor
///
/// The selected range is `[min(position, anchor), max(position, anchor))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Cursor {
    pub position: usize,
    pub anchor: Option<usize>,
}

impl Cursor {
    pub const fn at(position: usize) -> Self {
        Self {
            position,
            anchor: None,
        }
    }

    /// Cursor at `position` selecting back to `anchor`
    pub const fn selecting(anchor: usize, position: usize) -> Self {
        Self {
            position,
            anchor: Some(anchor),
        }
    }

    /// Selected range, `None` when nothing (or an empty range) is selected
    pub fn selection(&self) -> Option<Range<usize>> {
        match self.anchor {
            Some(anchor) if anchor != self.position => {
                Some(anchor.min(self.position)..anchor.max(self.position))
            }
            _ => None,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    fn clamped(self, len: usize) -> Self {
        Self {
            position: self.position.min(len),
            anchor: self.anchor.map(|anchor| anchor.min(len)),
        }
    }
}

/// Editing capability the engine works against.
///
/// Implementations own storage, cursor, and undo history. The required
/// methods are the primitive edits; everything else is derived from them.
pub trait TextBuffer {
    /// Buffer length in chars
    fn len_chars(&self) -> usize;

    fn line_count(&self) -> usize;

    fn line(&self, row: usize) -> Option<&str>;

    fn cursor(&self) -> Cursor;

    /// Replace the cursor; out-of-range offsets are clamped
    fn set_cursor(&mut self, cursor: Cursor);

    /// Insert at the cursor, replacing the selection if there is one.
    /// The cursor ends up after the inserted text with no selection.
    fn insert_text(&mut self, text: &str);

    /// Remove `count` chars starting at `start`, clamped to the buffer
    fn remove_range(&mut self, start: usize, count: usize);

    /// Start an edit group; nested groups join the outermost one
    fn begin_edit_group(&mut self);

    fn end_edit_group(&mut self);

    /// Monotonic counter bumped by every mutation
    fn revision(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    fn position_of(&self, offset: usize) -> Position {
        let mut remaining = offset;
        let last = self.line_count().saturating_sub(1);
        for row in 0..=last {
            let len = self.line(row).map(|l| l.chars().count()).unwrap_or(0);
            if remaining <= len || row == last {
                return Position::new(row, remaining.min(len));
            }
            remaining -= len + 1;
        }
        Position::zero()
    }

    fn offset_of(&self, pos: Position) -> usize {
        let row = pos.row.min(self.line_count().saturating_sub(1));
        let mut offset = 0;
        for r in 0..row {
            offset += self.line(r).map(|l| l.chars().count()).unwrap_or(0) + 1;
        }
        let len = self.line(row).map(|l| l.chars().count()).unwrap_or(0);
        offset + pos.col.min(len)
    }

    fn line_start(&self, row: usize) -> usize {
        self.offset_of(Position::new(row, 0))
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        let pos = self.position_of(offset);
        let line = self.line(pos.row)?;
        match line.chars().nth(pos.col) {
            Some(ch) => Some(ch),
            None if pos.row + 1 < self.line_count() => Some('\n'),
            None => None,
        }
    }

    fn current_row(&self) -> usize {
        self.position_of(self.cursor().position).row
    }

    fn current_line_text(&self) -> &str {
        self.line(self.current_row()).unwrap_or("")
    }

    fn leading_whitespace_count(&self, row: usize) -> usize {
        self.line(row)
            .map(|line| line.chars().take_while(|ch| *ch == ' ' || *ch == '\t').count())
            .unwrap_or(0)
    }

    /// Text of the current line from its start up to the cursor
    fn text_before_cursor(&self) -> String {
        let pos = self.position_of(self.cursor().position);
        self.line(pos.row)
            .map(|line| line.chars().take(pos.col).collect())
            .unwrap_or_default()
    }

    fn text_range(&self, range: Range<usize>) -> String {
        let mut text = String::new();
        for offset in range {
            match self.char_at(offset) {
                Some(ch) => text.push(ch),
                None => break,
            }
        }
        text
    }

    /// Move the cursor by `delta` chars; moving past either end stops there
    fn move_cursor(&mut self, delta: isize, extend_selection: bool) {
        let cursor = self.cursor();
        let target = if delta.is_negative() {
            cursor.position.saturating_sub(delta.unsigned_abs())
        } else {
            cursor
                .position
                .saturating_add(delta.unsigned_abs())
                .min(self.len_chars())
        };
        let anchor = if extend_selection {
            Some(cursor.anchor.unwrap_or(cursor.position))
        } else {
            None
        };
        self.set_cursor(Cursor {
            position: target,
            anchor,
        });
    }

    fn insert_at(&mut self, offset: usize, text: &str) {
        self.set_cursor(Cursor::at(offset));
        self.insert_text(text);
    }
}

/// Buffer state captured for undo/redo
#[derive(Debug, Clone)]
struct Revision {
    lines: Vec<String>,
    cursor: Cursor,
}

const MAX_UNDO_STACK: usize = 100;

fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Line-vector [`TextBuffer`] with snapshot undo
///
/// Per-line char lengths are kept alongside the text so offset lookups never
/// rescan line contents.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
    line_lens: Vec<usize>,
    /// Total chars, line breaks included
    len: usize,
    cursor: Cursor,
    revision: u64,
    undo_stack: Vec<Revision>,
    redo_stack: Vec<Revision>,
    group_depth: usize,
    group_recorded: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            line_lens: vec![0],
            len: 0,
            cursor: Cursor::default(),
            revision: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            group_depth: 0,
            group_recorded: false,
        }
    }

    /// Build from text; CRLF line endings are normalized to `\n`
    pub fn from_string(content: &str) -> Self {
        let lines: Vec<String> = content
            .split('\n')
            .map(|line| String::from(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        let mut buffer = Self {
            lines,
            ..Self::new()
        };
        buffer.reindex();
        buffer
    }

    pub fn as_string(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Revert the last edit or edit group
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = self.capture();
                self.redo_stack.push(current);
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = self.capture();
                self.undo_stack.push(current);
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn capture(&self) -> Revision {
        Revision {
            lines: self.lines.clone(),
            cursor: self.cursor,
        }
    }

    fn restore(&mut self, revision: Revision) {
        self.lines = revision.lines;
        self.cursor = revision.cursor;
        self.reindex();
        self.revision += 1;
    }

    fn reindex(&mut self) {
        self.line_lens = self.lines.iter().map(|line| char_len(line)).collect();
        self.len = self.line_lens.iter().sum::<usize>() + self.lines.len() - 1;
    }

    fn record_undo(&mut self) {
        if self.group_depth > 0 {
            if self.group_recorded {
                return;
            }
            self.group_recorded = true;
        }

        let snapshot = self.capture();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_STACK {
            self.undo_stack.remove(0);
        }
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    fn insert_raw(&mut self, pos: Position, text: &str) {
        let line = &mut self.lines[pos.row];
        let split = Self::byte_index(line, pos.col);
        let tail = line.split_off(split);

        let mut segments = text.split('\n');
        if let Some(first) = segments.next() {
            self.lines[pos.row].push_str(first);
        }
        let mut added: Vec<String> = segments.map(String::from).collect();
        match added.last_mut() {
            Some(last) => last.push_str(&tail),
            None => self.lines[pos.row].push_str(&tail),
        }

        self.line_lens[pos.row] = char_len(&self.lines[pos.row]);
        let added_lens: Vec<usize> = added.iter().map(|line| char_len(line)).collect();
        let at = pos.row + 1;
        self.lines.splice(at..at, added);
        self.line_lens.splice(at..at, added_lens);
        self.len += char_len(text);
    }

    fn remove_raw(&mut self, start: Position, end: Position) {
        let removed_from: usize =
            self.line_lens[start.row..=end.row].iter().sum::<usize>() + (end.row - start.row);

        if start.row == end.row {
            let line = &mut self.lines[start.row];
            let from = Self::byte_index(line, start.col);
            let to = Self::byte_index(line, end.col);
            line.replace_range(from..to, "");
        } else {
            let end_line = &self.lines[end.row];
            let tail = String::from(&end_line[Self::byte_index(end_line, end.col)..]);
            let start_line = &mut self.lines[start.row];
            let cut = Self::byte_index(start_line, start.col);
            start_line.truncate(cut);
            start_line.push_str(&tail);
            self.lines.drain(start.row + 1..=end.row);
            self.line_lens.drain(start.row + 1..=end.row);
        }

        self.line_lens[start.row] = char_len(&self.lines[start.row]);
        self.len -= removed_from - self.line_lens[start.row];
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer for LineBuffer {
    fn len_chars(&self) -> usize {
        self.len
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor.clamped(self.len_chars());
    }

    fn insert_text(&mut self, text: &str) {
        self.record_undo();
        if let Some(selected) = self.cursor.selection() {
            let start = self.position_of(selected.start);
            let end = self.position_of(selected.end);
            self.remove_raw(start, end);
            self.cursor = Cursor::at(selected.start);
        }

        let at = self.cursor.position;
        let pos = self.position_of(at);
        self.insert_raw(pos, text);
        self.cursor = Cursor::at(at + text.chars().count());
        self.revision += 1;
    }

    fn remove_range(&mut self, start: usize, count: usize) {
        let len = self.len_chars();
        let start = start.min(len);
        let end = start.saturating_add(count).min(len);
        if start == end {
            return;
        }

        self.record_undo();
        let from = self.position_of(start);
        let to = self.position_of(end);
        self.remove_raw(from, to);

        let position = self.cursor.position;
        let position = if position >= end {
            position - (end - start)
        } else {
            position.min(start)
        };
        self.cursor = Cursor::at(position);
        self.revision += 1;
    }

    fn begin_edit_group(&mut self) {
        if self.group_depth == 0 {
            self.group_recorded = false;
        }
        self.group_depth += 1;
    }

    fn end_edit_group(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
        if self.group_depth == 0 {
            self.group_recorded = false;
        }
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn position_of(&self, offset: usize) -> Position {
        let mut remaining = offset.min(self.len);
        let last = self.line_lens.len() - 1;
        for (row, len) in self.line_lens.iter().enumerate() {
            if remaining <= *len || row == last {
                return Position::new(row, remaining.min(*len));
            }
            remaining -= len + 1;
        }
        Position::zero()
    }

    fn offset_of(&self, pos: Position) -> usize {
        let row = pos.row.min(self.line_lens.len() - 1);
        let before: usize = self.line_lens[..row].iter().sum::<usize>() + row;
        before + pos.col.min(self.line_lens[row])
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        let pos = self.position_of(offset);
        match self.lines[pos.row].chars().nth(pos.col) {
            Some(ch) => Some(ch),
            None if pos.row + 1 < self.lines.len() => Some('\n'),
            None => None,
        }
    }

    fn text_range(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.len);
        if range.start >= end {
            return String::new();
        }
        let from = self.position_of(range.start);
        let to = self.position_of(end);
        let mut text = String::with_capacity(end - range.start);
        for row in from.row..=to.row {
            let line = &self.lines[row];
            let start_col = if row == from.row { from.col } else { 0 };
            let end_col = if row == to.row { to.col } else { self.line_lens[row] };
            if row > from.row {
                text.push('\n');
            }
            text.push_str(&line[Self::byte_index(line, start_col)..Self::byte_index(line, end_col)]);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_selection_range() {
        assert_eq!(Cursor::at(3).selection(), None);
        assert_eq!(Cursor::selecting(5, 2).selection(), Some(2..5));
        assert_eq!(Cursor::selecting(2, 5).selection(), Some(2..5));
        assert!(!Cursor::selecting(4, 4).has_selection());
    }

    #[test]
    fn test_new_buffer() {
        let buffer = LineBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0), Some(""));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_from_string_keeps_trailing_newline() {
        let buffer = LineBuffer::from_string("hello\nworld\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.as_string(), "hello\nworld\n");
        assert_eq!(buffer.len_chars(), 12);
    }

    #[test]
    fn test_from_string_normalizes_crlf() {
        let buffer = LineBuffer::from_string("a\r\nbc\r\n");
        assert_eq!(buffer.lines(), &["a", "bc", ""]);
        assert_eq!(buffer.len_chars(), 5);
        assert_eq!(buffer.as_string(), "a\nbc\n");
        assert_eq!(buffer.char_at(1), Some('\n'));
    }

    #[test]
    fn test_position_offset_conversion() {
        let buffer = LineBuffer::from_string("ab\ncde\n");
        assert_eq!(buffer.position_of(0), Position::new(0, 0));
        assert_eq!(buffer.position_of(2), Position::new(0, 2));
        assert_eq!(buffer.position_of(3), Position::new(1, 0));
        assert_eq!(buffer.position_of(7), Position::new(2, 0));
        assert_eq!(buffer.offset_of(Position::new(1, 2)), 5);
        assert_eq!(buffer.offset_of(Position::new(1, 99)), 6);
    }

    #[test]
    fn test_char_at_reports_line_breaks() {
        let buffer = LineBuffer::from_string("ab\nc");
        assert_eq!(buffer.char_at(1), Some('b'));
        assert_eq!(buffer.char_at(2), Some('\n'));
        assert_eq!(buffer.char_at(3), Some('c'));
        assert_eq!(buffer.char_at(4), None);
    }

    #[test]
    fn test_insert_text_moves_cursor() {
        let mut buffer = LineBuffer::from_string("hello");
        buffer.set_cursor(Cursor::at(5));
        buffer.insert_text("!");
        assert_eq!(buffer.as_string(), "hello!");
        assert_eq!(buffer.cursor(), Cursor::at(6));
    }

    #[test]
    fn test_insert_multiline_text() {
        let mut buffer = LineBuffer::from_string("ad");
        buffer.set_cursor(Cursor::at(1));
        buffer.insert_text("b\nc");
        assert_eq!(buffer.lines(), &["ab", "cd"]);
        assert_eq!(buffer.cursor().position, 4);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buffer = LineBuffer::from_string("hello world");
        buffer.set_cursor(Cursor::selecting(0, 5));
        buffer.insert_text("bye");
        assert_eq!(buffer.as_string(), "bye world");
        assert_eq!(buffer.cursor(), Cursor::at(3));
    }

    #[test]
    fn test_insert_multibyte() {
        let mut buffer = LineBuffer::from_string("née");
        buffer.set_cursor(Cursor::at(2));
        buffer.insert_text("x");
        assert_eq!(buffer.as_string(), "néxe");
        assert_eq!(buffer.char_at(1), Some('é'));
    }

    #[test]
    fn test_remove_range_across_lines() {
        let mut buffer = LineBuffer::from_string("line1\nline2\nline3");
        buffer.set_cursor(Cursor::at(17));
        buffer.remove_range(4, 8);
        assert_eq!(buffer.as_string(), "lineline3");
        assert_eq!(buffer.cursor().position, 9);
    }

    #[test]
    fn test_remove_range_clamps() {
        let mut buffer = LineBuffer::from_string("abc");
        buffer.remove_range(2, 10);
        assert_eq!(buffer.as_string(), "ab");
        buffer.remove_range(10, 1);
        assert_eq!(buffer.as_string(), "ab");
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut buffer = LineBuffer::from_string("abc");
        buffer.set_cursor(Cursor::selecting(10, 20));
        assert_eq!(buffer.cursor(), Cursor::selecting(3, 3));
    }

    #[test]
    fn test_move_cursor_stops_at_ends() {
        let mut buffer = LineBuffer::from_string("abc");
        buffer.move_cursor(-1, false);
        assert_eq!(buffer.cursor().position, 0);
        buffer.move_cursor(10, false);
        assert_eq!(buffer.cursor().position, 3);
        buffer.move_cursor(-2, true);
        assert_eq!(buffer.cursor().selection(), Some(1..3));
        buffer.move_cursor(-1, true);
        assert_eq!(buffer.cursor().selection(), Some(0..3));
    }

    #[test]
    fn test_leading_whitespace_and_current_line() {
        let mut buffer = LineBuffer::from_string("x\n    def f():");
        buffer.set_cursor(Cursor::at(8));
        assert_eq!(buffer.current_line_text(), "    def f():");
        assert_eq!(buffer.leading_whitespace_count(1), 4);
        assert_eq!(buffer.text_before_cursor(), "    de");
    }

    #[test]
    fn test_undo_redo() {
        let mut buffer = LineBuffer::new();
        buffer.insert_text("a");
        buffer.insert_text("b");
        assert!(buffer.undo());
        assert_eq!(buffer.as_string(), "a");
        assert!(buffer.redo());
        assert_eq!(buffer.as_string(), "ab");
        assert!(!buffer.redo());
    }

    #[test]
    fn test_edit_group_is_one_undo_step() {
        let mut buffer = LineBuffer::from_string("a\nb");
        buffer.begin_edit_group();
        buffer.insert_at(0, "    ");
        buffer.insert_at(6, "    ");
        buffer.end_edit_group();
        assert_eq!(buffer.as_string(), "    a\n    b");
        assert_eq!(buffer.undo_depth(), 1);

        assert!(buffer.undo());
        assert_eq!(buffer.as_string(), "a\nb");
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buffer = LineBuffer::new();
        buffer.insert_text("a");
        buffer.undo();
        assert_eq!(buffer.redo_depth(), 1);
        buffer.insert_text("b");
        assert_eq!(buffer.redo_depth(), 0);
    }

    #[test]
    fn test_undo_limit() {
        let mut buffer = LineBuffer::new();
        for _ in 0..150 {
            buffer.insert_text("x");
        }
        assert!(buffer.undo_depth() <= MAX_UNDO_STACK);
    }

    #[test]
    fn test_line_index_tracks_edits() {
        let mut buffer = LineBuffer::from_string("alpha\nbéta\ngamma");
        let check = |buffer: &LineBuffer| {
            let text = buffer.as_string();
            assert_eq!(buffer.len_chars(), text.chars().count());
            assert_eq!(buffer.text_range(0..buffer.len_chars()), text);
            for (offset, ch) in text.chars().enumerate() {
                assert_eq!(buffer.char_at(offset), Some(ch));
                assert_eq!(buffer.offset_of(buffer.position_of(offset)), offset);
            }
        };
        check(&buffer);

        buffer.set_cursor(Cursor::at(8));
        buffer.insert_text("X\nY\n");
        check(&buffer);
        assert_eq!(buffer.text_range(6..12), "béX\nY\n");

        buffer.remove_range(3, 9);
        check(&buffer);
        buffer.set_cursor(Cursor::selecting(1, 7));
        buffer.insert_text("\n");
        check(&buffer);

        while buffer.undo() {
            check(&buffer);
        }
        assert_eq!(buffer.as_string(), "alpha\nbéta\ngamma");
        buffer.redo();
        check(&buffer);
    }

    #[test]
    fn test_revision_bumps_on_mutation_only() {
        let mut buffer = LineBuffer::from_string("abc");
        let before = buffer.revision();
        buffer.move_cursor(1, false);
        assert_eq!(buffer.revision(), before);
        buffer.remove_range(0, 1);
        assert!(buffer.revision() > before);
    }
}
