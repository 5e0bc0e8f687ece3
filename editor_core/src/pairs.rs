//! Delimiter pairs: auto-close, wrap selection, skip-over, pair deletion

use crate::buffer::{Cursor, TextBuffer};
use alloc::string::String;

/// Immutable opener → closer table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairTable {
    pairs: &'static [(char, char)],
}

/// Brackets and quotes, the set every editor tab shares
pub const STANDARD_PAIRS: PairTable = PairTable {
    pairs: &[('(', ')'), ('[', ']'), ('{', '}'), ('\'', '\''), ('"', '"')],
};

impl PairTable {
    pub const fn new(pairs: &'static [(char, char)]) -> Self {
        Self { pairs }
    }

    pub fn closer_for(&self, opener: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(open, _)| *open == opener)
            .map(|(_, close)| *close)
    }

    pub fn is_opener(&self, ch: char) -> bool {
        self.closer_for(ch).is_some()
    }

    pub fn is_closer(&self, ch: char) -> bool {
        self.pairs.iter().any(|(_, close)| *close == ch)
    }

    /// True when `open` followed by `close` is an entry of the table
    pub fn is_pair(&self, open: char, close: char) -> bool {
        self.pairs.iter().any(|pair| *pair == (open, close))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.pairs.iter().copied()
    }
}

impl Default for PairTable {
    fn default() -> Self {
        STANDARD_PAIRS
    }
}

/// Insert `opener` with its closer, or wrap the selection in the pair.
///
/// Returns false when `opener` is not in the table.
pub fn open_pair<B: TextBuffer + ?Sized>(buffer: &mut B, table: &PairTable, opener: char) -> bool {
    let Some(closer) = table.closer_for(opener) else {
        return false;
    };

    let cursor = buffer.cursor();
    match cursor.selection() {
        Some(selected) => {
            let inner = buffer.text_range(selected.clone());
            let mut wrapped = String::with_capacity(inner.len() + 2);
            wrapped.push(opener);
            wrapped.push_str(&inner);
            wrapped.push(closer);

            buffer.begin_edit_group();
            buffer.insert_text(&wrapped);
            buffer.set_cursor(Cursor::at(selected.start + 1));
            buffer.end_edit_group();
            tracing::debug!(%opener, len = selected.len(), "wrapped selection");
        }
        None => {
            let mut pair = String::with_capacity(2);
            pair.push(opener);
            pair.push(closer);

            buffer.insert_text(&pair);
            buffer.move_cursor(-1, false);
        }
    }
    true
}

/// True when typing `closer` should step over the identical next char
pub fn can_skip_over<B: TextBuffer + ?Sized>(buffer: &B, table: &PairTable, closer: char) -> bool {
    let cursor = buffer.cursor();
    !cursor.has_selection()
        && table.is_closer(closer)
        && buffer.char_at(cursor.position) == Some(closer)
}

/// Step the cursor over an existing closer without touching the text
pub fn skip_over<B: TextBuffer + ?Sized>(buffer: &mut B, table: &PairTable, closer: char) -> bool {
    if !can_skip_over(&*buffer, table, closer) {
        return false;
    }
    buffer.move_cursor(1, false);
    true
}

/// Backspace inside an empty pair removes both halves.
///
/// Falls through (returns false) with a selection, at the buffer edges, or
/// when the chars around the cursor are not a table pair.
pub fn delete_pair<B: TextBuffer + ?Sized>(buffer: &mut B, table: &PairTable) -> bool {
    let cursor = buffer.cursor();
    if cursor.has_selection() || cursor.position == 0 {
        return false;
    }

    let before = buffer.char_at(cursor.position - 1);
    let after = buffer.char_at(cursor.position);
    match (before, after) {
        (Some(open), Some(close)) if table.is_pair(open, close) => {
            buffer.remove_range(cursor.position - 1, 2);
            true
        }
        _ => false,
    }
}
