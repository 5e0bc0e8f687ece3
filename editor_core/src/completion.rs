//! Prefix completion against a shared [`KeywordSet`]
//!
//! A session is open while the identifier fragment before the cursor is
//! non-empty and at least one corpus word starts with it.

use crate::buffer::TextBuffer;
use crate::keywords::KeywordSet;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Punctuation that ends an identifier fragment (whitespace does too)
pub const BOUNDARY_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '(', ')', '[', ']', '{', '}', '\'', '"', '+', '-', '*', '/', '%', '=',
    '<', '>', '!', '&', '|', '^', '~', '@', '#', '\\', '?', '`', '$',
];

pub fn is_word_boundary(ch: char) -> bool {
    ch.is_whitespace() || BOUNDARY_PUNCTUATION.contains(&ch)
}

/// Live completion session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionState {
    prefix: String,
    candidates: Vec<String>,
    is_open: bool,
    selected: usize,
}

impl CompletionState {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Index of the candidate Enter/Tab would accept
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_candidate(&self) -> Option<&str> {
        if !self.is_open {
            return None;
        }
        self.candidates.get(self.selected).map(|c| c.as_str())
    }
}

/// Identifier fragment immediately before the cursor; empty with a selection
pub fn prefix_at_cursor<B: TextBuffer + ?Sized>(buffer: &B) -> String {
    if buffer.cursor().has_selection() {
        return String::new();
    }
    let before = buffer.text_before_cursor();
    let mut prefix: Vec<char> = before
        .chars()
        .rev()
        .take_while(|ch| !is_word_boundary(*ch))
        .collect();
    prefix.reverse();
    prefix.into_iter().collect()
}

pub struct CompletionEngine {
    keywords: Arc<KeywordSet>,
    state: CompletionState,
    max_candidates: Option<usize>,
}

impl CompletionEngine {
    pub fn new(keywords: Arc<KeywordSet>) -> Self {
        Self {
            keywords,
            state: CompletionState::default(),
            max_candidates: None,
        }
    }

    pub fn with_max_candidates(mut self, max: Option<usize>) -> Self {
        self.max_candidates = max;
        self
    }

    pub fn state(&self) -> &CompletionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn keywords(&self) -> &Arc<KeywordSet> {
        &self.keywords
    }

    /// Recompute the prefix and, when it changed, the candidates.
    ///
    /// Returns true when the visible state changed.
    pub fn update_from_cursor<B: TextBuffer + ?Sized>(&mut self, buffer: &B) -> bool {
        let prefix = prefix_at_cursor(buffer);
        if prefix == self.state.prefix {
            return false;
        }

        let candidates: Vec<String> = if prefix.is_empty() {
            Vec::new()
        } else {
            let matches = self.keywords.matching(&prefix).map(String::from);
            match self.max_candidates {
                Some(max) => matches.take(max).collect(),
                None => matches.collect(),
            }
        };

        let was_open = self.state.is_open;
        let is_open = !prefix.is_empty() && !candidates.is_empty();
        if is_open != was_open {
            tracing::debug!(%prefix, count = candidates.len(), is_open, "completion session");
        }

        let changed = is_open || was_open;
        self.state = CompletionState {
            prefix,
            candidates,
            is_open,
            selected: 0,
        };
        changed
    }

    /// Replace the prefix before the cursor with `candidate` and close
    pub fn accept<B: TextBuffer + ?Sized>(&mut self, buffer: &mut B, candidate: &str) {
        let prefix_len = prefix_at_cursor(&*buffer).chars().count();
        let position = buffer.cursor().position;

        buffer.begin_edit_group();
        buffer.remove_range(position - prefix_len, prefix_len);
        buffer.insert_text(candidate);
        buffer.end_edit_group();
        tracing::debug!(candidate, "completion accepted");

        self.close();
    }

    /// Accept the selected candidate; false when no session is open
    pub fn accept_selected<B: TextBuffer + ?Sized>(&mut self, buffer: &mut B) -> bool {
        match self.state.selected_candidate().map(String::from) {
            Some(candidate) => {
                self.accept(buffer, &candidate);
                true
            }
            None => false,
        }
    }

    /// Close without touching the buffer
    pub fn dismiss(&mut self) -> bool {
        let was_open = self.state.is_open;
        self.close();
        was_open
    }

    pub fn select_next(&mut self) {
        if self.state.is_open {
            self.state.selected = (self.state.selected + 1) % self.state.candidates.len();
        }
    }

    pub fn select_previous(&mut self) {
        if self.state.is_open {
            let len = self.state.candidates.len();
            self.state.selected = (self.state.selected + len - 1) % len;
        }
    }

    // Forgetting the prefix makes the next update start a fresh session.
    fn close(&mut self) {
        self.state = CompletionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Cursor, LineBuffer};

    fn engine(words: &[&str]) -> CompletionEngine {
        CompletionEngine::new(Arc::new(KeywordSet::from_words(words.iter().copied())))
    }

    fn type_text(buffer: &mut LineBuffer, engine: &mut CompletionEngine, text: &str) {
        for ch in text.chars() {
            let mut s = String::new();
            s.push(ch);
            buffer.insert_text(&s);
            engine.update_from_cursor(&*buffer);
        }
    }

    #[test]
    fn test_word_boundaries() {
        assert!(is_word_boundary(' '));
        assert!(is_word_boundary('\t'));
        assert!(is_word_boundary('('));
        assert!(is_word_boundary('.'));
        assert!(!is_word_boundary('_'));
        assert!(!is_word_boundary('a'));
        assert!(!is_word_boundary('7'));
        assert!(!is_word_boundary('é'));
    }

    #[test]
    fn test_prefix_at_cursor() {
        let mut buffer = LineBuffer::from_string("x = os.pa");
        buffer.set_cursor(Cursor::at(9));
        assert_eq!(prefix_at_cursor(&buffer), "pa");
        buffer.set_cursor(Cursor::at(4));
        assert_eq!(prefix_at_cursor(&buffer), "");
        buffer.set_cursor(Cursor::selecting(7, 9));
        assert_eq!(prefix_at_cursor(&buffer), "");
    }

    #[test]
    fn test_filtering_session() {
        let mut engine = engine(&["class", "continue"]);
        let mut buffer = LineBuffer::new();

        type_text(&mut buffer, &mut engine, "cl");
        assert_eq!(engine.state().candidates(), &["class"]);
        assert!(engine.is_open());

        type_text(&mut buffer, &mut engine, "a");
        assert_eq!(engine.state().candidates(), &["class"]);
        assert!(engine.is_open());

        type_text(&mut buffer, &mut engine, "x");
        assert_eq!(engine.state().prefix(), "clax");
        assert!(engine.state().candidates().is_empty());
        assert!(!engine.is_open());
    }

    #[test]
    fn test_open_reports_change_only_when_visible() {
        let mut engine = engine(&["print"]);
        let mut buffer = LineBuffer::from_string("zz");
        buffer.set_cursor(Cursor::at(2));
        assert!(!engine.update_from_cursor(&buffer));

        buffer.insert_text(" p");
        assert!(engine.update_from_cursor(&buffer));
        assert!(!engine.update_from_cursor(&buffer));

        buffer.insert_text(" ");
        assert!(engine.update_from_cursor(&buffer));
        assert!(!engine.is_open());
    }

    #[test]
    fn test_accept_replaces_prefix() {
        let mut engine = engine(&["isinstance"]);
        let mut buffer = LineBuffer::from_string("if ");
        buffer.set_cursor(Cursor::at(3));
        type_text(&mut buffer, &mut engine, "isi");

        assert!(engine.accept_selected(&mut buffer));
        assert_eq!(buffer.as_string(), "if isinstance");
        assert_eq!(buffer.cursor(), Cursor::at(13));
        assert!(!engine.is_open());
        assert_eq!(engine.state().prefix(), "");
    }

    #[test]
    fn test_accept_matches_case_of_candidate() {
        let mut engine = engine(&["True"]);
        let mut buffer = LineBuffer::new();
        type_text(&mut buffer, &mut engine, "tr");
        engine.accept_selected(&mut buffer);
        assert_eq!(buffer.as_string(), "True");
    }

    #[test]
    fn test_dismiss_keeps_buffer() {
        let mut engine = engine(&["return"]);
        let mut buffer = LineBuffer::new();
        type_text(&mut buffer, &mut engine, "re");
        assert!(engine.dismiss());
        assert_eq!(buffer.as_string(), "re");
        assert!(!engine.is_open());
        assert!(!engine.dismiss());

        // the next keystroke starts a new session
        type_text(&mut buffer, &mut engine, "t");
        assert!(engine.is_open());
    }

    #[test]
    fn test_accept_without_session() {
        let mut engine = engine(&["pass"]);
        let mut buffer = LineBuffer::new();
        assert!(!engine.accept_selected(&mut buffer));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_selection_cycles() {
        let mut engine = engine(&["range", "repr", "return"]);
        let mut buffer = LineBuffer::new();
        type_text(&mut buffer, &mut engine, "r");
        assert_eq!(engine.state().selected_candidate(), Some("range"));
        engine.select_next();
        engine.select_next();
        assert_eq!(engine.state().selected_candidate(), Some("return"));
        engine.select_next();
        assert_eq!(engine.state().selected(), 0);
        engine.select_previous();
        assert_eq!(engine.state().selected_candidate(), Some("return"));

        engine.accept_selected(&mut buffer);
        assert_eq!(buffer.as_string(), "return");
    }

    #[test]
    fn test_max_candidates() {
        let mut engine = engine(&["a1", "a2", "a3"]).with_max_candidates(Some(2));
        let mut buffer = LineBuffer::new();
        type_text(&mut buffer, &mut engine, "a");
        assert_eq!(engine.state().candidates(), &[String::from("a1"), String::from("a2")]);
    }

    #[test]
    fn test_empty_corpus_stays_closed() {
        let mut engine = engine(&[]);
        let mut buffer = LineBuffer::new();
        type_text(&mut buffer, &mut engine, "abc");
        assert!(!engine.is_open());
        assert!(engine.state().candidates().is_empty());
    }
}
