//! Space-based indentation: Tab, Shift+Tab, Backspace dedent, Enter
//!
//! Everything works in whole units of [`INDENT_WIDTH`] spaces. Tab characters
//! are never inserted.

use crate::buffer::{Cursor, Position, TextBuffer};
use alloc::string::String;
use core::ops::RangeInclusive;

pub const INDENT_WIDTH: usize = 4;
pub const INDENT_UNIT: &str = "    ";

/// First tokens that open a block on the next line
pub const BLOCK_KEYWORDS: &[&str] = &["class", "def"];

/// Lines touched by the cursor's selection, or just the cursor line
fn touched_rows<B: TextBuffer + ?Sized>(buffer: &B) -> RangeInclusive<usize> {
    let cursor = buffer.cursor();
    match cursor.selection() {
        Some(selected) => buffer.position_of(selected.start).row..=buffer.position_of(selected.end).row,
        None => {
            let row = buffer.current_row();
            row..=row
        }
    }
}

/// Shift cursor and anchor columns on touched rows by `delta`
fn shifted_cursor<B: TextBuffer + ?Sized>(
    buffer: &B,
    cursor: Cursor,
    rows: &RangeInclusive<usize>,
    delta: isize,
) -> (Position, Option<Position>) {
    let shift = |offset: usize| {
        let mut pos = buffer.position_of(offset);
        if rows.contains(&pos.row) {
            pos.col = pos.col.saturating_add_signed(delta);
        }
        pos
    };
    (shift(cursor.position), cursor.anchor.map(shift))
}

/// Tab: one unit at the cursor, or one unit in front of every selected line
pub fn indent<B: TextBuffer + ?Sized>(buffer: &mut B) {
    let cursor = buffer.cursor();
    if !cursor.has_selection() {
        buffer.insert_text(INDENT_UNIT);
        return;
    }

    let rows = touched_rows(&*buffer);
    let (position, anchor) = shifted_cursor(&*buffer, cursor, &rows, INDENT_WIDTH as isize);

    buffer.begin_edit_group();
    replace_rows(buffer, &rows, |line| {
        let mut indented = String::with_capacity(INDENT_WIDTH + line.len());
        indented.push_str(INDENT_UNIT);
        indented.push_str(line);
        indented
    });
    restore_cursor(buffer, position, anchor);
    buffer.end_edit_group();
    tracing::debug!(first = rows.start(), last = rows.end(), "indented lines");
}

/// Shift+Tab: drop one leading unit from the cursor line or every selected
/// line. Lines without a full unit stay as they are.
pub fn dedent<B: TextBuffer + ?Sized>(buffer: &mut B) -> bool {
    let cursor = buffer.cursor();
    let rows = touched_rows(&*buffer);
    let dedentable: alloc::vec::Vec<usize> = rows
        .clone()
        .filter(|row| buffer.line(*row).is_some_and(|line| line.starts_with(INDENT_UNIT)))
        .collect();
    if dedentable.is_empty() {
        return false;
    }

    let shift = |offset: usize| {
        let mut pos = buffer.position_of(offset);
        if dedentable.contains(&pos.row) {
            pos.col = pos.col.saturating_sub(INDENT_WIDTH);
        }
        pos
    };
    let position = shift(cursor.position);
    let anchor = cursor.anchor.map(shift);

    let span = dedentable[0]..=dedentable[dedentable.len() - 1];
    buffer.begin_edit_group();
    replace_rows(buffer, &span, |line| {
        String::from(line.strip_prefix(INDENT_UNIT).unwrap_or(line))
    });
    restore_cursor(buffer, position, anchor);
    buffer.end_edit_group();
    tracing::debug!(lines = dedentable.len(), "dedented lines");
    true
}

/// Rewrite whole rows as one replacement edit
fn replace_rows<B, F>(buffer: &mut B, rows: &RangeInclusive<usize>, mut edit: F)
where
    B: TextBuffer + ?Sized,
    F: FnMut(&str) -> String,
{
    let start = buffer.line_start(*rows.start());
    let end = buffer.offset_of(Position::new(*rows.end(), usize::MAX));

    let mut text = String::new();
    for row in rows.clone() {
        if row > *rows.start() {
            text.push('\n');
        }
        text.push_str(&edit(buffer.line(row).unwrap_or("")));
    }

    buffer.set_cursor(Cursor::selecting(start, end));
    buffer.insert_text(&text);
}

fn restore_cursor<B: TextBuffer + ?Sized>(buffer: &mut B, position: Position, anchor: Option<Position>) {
    let position = buffer.offset_of(position);
    let anchor = anchor.map(|pos| buffer.offset_of(pos));
    buffer.set_cursor(Cursor { position, anchor });
}

/// Backspace in pure indentation removes a whole unit.
///
/// Applies only without a selection when everything between line start and
/// the cursor is spaces, a positive multiple of [`INDENT_WIDTH`] of them.
pub fn backspace_dedent<B: TextBuffer + ?Sized>(buffer: &mut B) -> bool {
    let cursor = buffer.cursor();
    if cursor.has_selection() {
        return false;
    }

    let before = buffer.text_before_cursor();
    let spaces = before.chars().count();
    if spaces == 0 || spaces % INDENT_WIDTH != 0 || !before.chars().all(|ch| ch == ' ') {
        return false;
    }

    buffer.remove_range(cursor.position - INDENT_WIDTH, INDENT_WIDTH);
    true
}

/// Whether a line opens a block.
///
/// Looks at this one line only: a trailing `:`, a leading block keyword, or a
/// `{` that the line itself does not close. Braces inside quotes are ignored.
pub fn opens_block(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.ends_with(':') {
        return true;
    }

    let first_token: String = trimmed
        .chars()
        .take_while(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect();
    if BLOCK_KEYWORDS.contains(&first_token.as_str()) {
        return true;
    }

    let mut depth: usize = 0;
    let mut quote: Option<char> = None;
    for ch in trimmed.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '{') => depth += 1,
            (None, '}') => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth > 0
}

/// Enter: line break followed by the current line's indentation, plus one
/// unit when the line opens a block.
///
/// Both come from the whole current line, wherever the cursor sits in it.
pub fn newline_with_indent<B: TextBuffer + ?Sized>(buffer: &mut B) {
    let base = buffer.leading_whitespace_count(buffer.current_row());
    let extra = if opens_block(buffer.current_line_text()) { INDENT_WIDTH } else { 0 };

    let mut text = String::with_capacity(1 + base + extra);
    text.push('\n');
    text.extend(core::iter::repeat(' ').take(base + extra));
    buffer.insert_text(&text);
    tracing::debug!(base, extra, "newline with indent");
}
