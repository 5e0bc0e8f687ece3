//! Key event routing
//!
//! Every key press from the host passes through [`KeyEventRouter::handle_key_event`],
//! which picks exactly one [`Route`] and reports whether the event was
//! consumed. Buffer and completion changes are announced to listeners
//! registered by the host.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use input_types::{KeyCode, KeyEvent};

use crate::{
    buffer::TextBuffer,
    completion::{CompletionEngine, CompletionState},
    config::EngineConfig,
    indent,
    keywords::KeywordSet,
    pairs::{self, PairTable, STANDARD_PAIRS},
};

/// Branch chosen for a key event, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Enter/Tab accept, Escape/Backtab dismiss, while the popup is open
    CompletionCommand,
    Backspace,
    Indent,
    Dedent,
    Newline,
    OpenPair(char),
    SkipOver(char),
    /// Plain insertion, or left to the host when the key produced no text
    Default,
}

type BufferListener = Box<dyn FnMut()>;
type CompletionListener = Box<dyn FnMut(&CompletionState)>;

pub struct KeyEventRouter {
    pairs: PairTable,
    completion: CompletionEngine,
    config: EngineConfig,
    last_route: Option<Route>,
    buffer_listeners: Vec<BufferListener>,
    completion_listeners: Vec<CompletionListener>,
}

impl KeyEventRouter {
    pub fn new(keywords: Arc<KeywordSet>) -> Self {
        Self::with_config(keywords, EngineConfig::default())
    }

    pub fn with_config(keywords: Arc<KeywordSet>, config: EngineConfig) -> Self {
        Self {
            pairs: STANDARD_PAIRS,
            completion: CompletionEngine::new(keywords).with_max_candidates(config.max_candidates),
            config,
            last_route: None,
            buffer_listeners: Vec::new(),
            completion_listeners: Vec::new(),
        }
    }

    pub fn with_pairs(mut self, pairs: PairTable) -> Self {
        self.pairs = pairs;
        self
    }

    /// Called after any key event that changed the buffer text
    pub fn on_buffer_modified(&mut self, listener: impl FnMut() + 'static) {
        self.buffer_listeners.push(Box::new(listener));
    }

    /// Run the buffer listeners for an edit the host made outside
    /// [`Self::handle_key_event`], such as undo or Delete
    pub fn notify_buffer_modified(&mut self) {
        for listener in self.buffer_listeners.iter_mut() {
            listener();
        }
    }

    /// Called whenever the popup opens, closes, or its candidates change
    pub fn on_completion_state_changed(&mut self, listener: impl FnMut(&CompletionState) + 'static) {
        self.completion_listeners.push(Box::new(listener));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pairs(&self) -> &PairTable {
        &self.pairs
    }

    pub fn completion(&self) -> &CompletionState {
        self.completion.state()
    }

    /// Route taken by the most recent key press
    pub fn last_route(&self) -> Option<Route> {
        self.last_route
    }

    /// Decide which branch an event takes without acting on it
    pub fn route_for<B: TextBuffer + ?Sized>(&self, buffer: &B, event: &KeyEvent) -> Route {
        let modifiers = event.modifiers;

        if self.completion.is_open()
            && !modifiers.is_ctrl()
            && matches!(event.code, KeyCode::Enter | KeyCode::Escape | KeyCode::Tab | KeyCode::Backtab)
        {
            return Route::CompletionCommand;
        }

        match event.code {
            KeyCode::Backspace => return Route::Backspace,
            // Ctrl+Tab belongs to the tab strip
            KeyCode::Tab | KeyCode::Backtab if modifiers.is_ctrl() => return Route::Default,
            KeyCode::Tab if !modifiers.is_shift() => return Route::Indent,
            KeyCode::Tab | KeyCode::Backtab => return Route::Dedent,
            KeyCode::Enter => return Route::Newline,
            _ => {}
        }

        if self.config.auto_pair && event.is_text_input() {
            if let Some(ch) = event.produced_char() {
                if self.pairs.is_opener(ch) {
                    return Route::OpenPair(ch);
                }
                if pairs::can_skip_over(buffer, &self.pairs, ch) {
                    return Route::SkipOver(ch);
                }
            }
        }

        Route::Default
    }

    /// Handle one key event; returns true when it was consumed.
    ///
    /// Release events are ignored. Keys that produce no text and match no
    /// branch are returned unconsumed so the host can handle navigation.
    pub fn handle_key_event<B: TextBuffer + ?Sized>(&mut self, buffer: &mut B, event: &KeyEvent) -> bool {
        if !event.is_press() {
            return false;
        }

        let revision = buffer.revision();
        let cursor = buffer.cursor();
        let route = self.route_for(&*buffer, event);
        self.last_route = Some(route);
        tracing::trace!(?route, code = %event.code, modifiers = %event.modifiers, "key event");

        let mut completion_changed = false;
        let consumed = match route {
            Route::CompletionCommand => {
                completion_changed = match event.code {
                    KeyCode::Enter | KeyCode::Tab => self.completion.accept_selected(buffer),
                    _ => self.completion.dismiss(),
                };
                true
            }
            Route::Backspace => {
                self.backspace(buffer);
                true
            }
            Route::Indent => {
                indent::indent(buffer);
                true
            }
            Route::Dedent => {
                indent::dedent(buffer);
                true
            }
            Route::Newline => {
                indent::newline_with_indent(buffer);
                true
            }
            Route::OpenPair(opener) => pairs::open_pair(buffer, &self.pairs, opener),
            Route::SkipOver(closer) => pairs::skip_over(buffer, &self.pairs, closer),
            Route::Default => {
                if event.is_text_input() {
                    buffer.insert_text(&event.text);
                    true
                } else {
                    false
                }
            }
        };

        let modified = buffer.revision() != revision;
        if route != Route::CompletionCommand && (modified || buffer.cursor() != cursor) {
            completion_changed |= self.reevaluate(&*buffer);
        }

        if modified {
            self.notify_buffer_modified();
        }
        if completion_changed {
            self.notify_completion();
        }
        consumed
    }

    /// Re-run completion after the host moved the cursor itself.
    ///
    /// Only an open session is re-evaluated; moving never opens one.
    pub fn refresh_completion<B: TextBuffer + ?Sized>(&mut self, buffer: &B) {
        if self.completion.is_open() && self.reevaluate(buffer) {
            self.notify_completion();
        }
    }

    /// Close the popup from outside the key path (focus loss, document switch)
    pub fn dismiss_completion(&mut self) {
        if self.completion.dismiss() {
            self.notify_completion();
        }
    }

    pub fn select_next_candidate(&mut self) {
        if self.completion.is_open() {
            self.completion.select_next();
            self.notify_completion();
        }
    }

    pub fn select_previous_candidate(&mut self) {
        if self.completion.is_open() {
            self.completion.select_previous();
            self.notify_completion();
        }
    }

    fn reevaluate<B: TextBuffer + ?Sized>(&mut self, buffer: &B) -> bool {
        if !self.config.completion {
            return false;
        }
        self.completion.update_from_cursor(buffer)
    }

    fn notify_completion(&mut self) {
        let state = self.completion.state();
        for listener in self.completion_listeners.iter_mut() {
            listener(state);
        }
    }

    // Selection, then pair, then indentation unit, then one char.
    fn backspace<B: TextBuffer + ?Sized>(&self, buffer: &mut B) {
        let cursor = buffer.cursor();
        if let Some(selected) = cursor.selection() {
            buffer.remove_range(selected.start, selected.len());
            return;
        }
        if self.config.auto_pair && pairs::delete_pair(buffer, &self.pairs) {
            return;
        }
        if indent::backspace_dedent(buffer) {
            return;
        }
        if cursor.position > 0 {
            buffer.remove_range(cursor.position - 1, 1);
        }
    }
}
