//! Editor rendering and output

use crate::gutter::LineNumberGutter;
use crate::view::EditorView;
use editor_core::TextBuffer;

/// Turns an editor pane into whatever the host draws.
pub trait RenderDelegate {
    type Output;

    fn render(&self, view: &EditorView) -> Self::Output;
}

/// Text frame for console output and tests.
///
/// Each visible row is the gutter label and the line, with `|` at the
/// cursor. Rows past the end of the buffer show `~`. An open completion
/// popup is listed under the cursor line with the selected entry in
/// brackets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer {
    gutter: LineNumberGutter,
}

impl PlainTextRenderer {
    pub fn new(gutter: LineNumberGutter) -> Self {
        Self { gutter }
    }

    fn render_line_with_cursor(line: &str, col: usize) -> String {
        let mut result = String::with_capacity(line.len() + 1);
        for (i, ch) in line.chars().enumerate() {
            if i == col {
                result.push('|');
            }
            result.push(ch);
        }
        if col >= line.chars().count() {
            result.push('|');
        }
        result
    }

    fn render_popup(&self, view: &EditorView, digits: usize, output: &mut String) {
        let completion = view.completion();
        if !completion.is_open() {
            return;
        }
        let indent = " ".repeat(digits + 1);
        for (i, candidate) in completion.candidates().iter().enumerate() {
            output.push_str(&indent);
            if i == completion.selected() {
                output.push('[');
                output.push_str(candidate);
                output.push(']');
            } else {
                output.push(' ');
                output.push_str(candidate);
            }
            output.push('\n');
        }
    }
}

impl RenderDelegate for PlainTextRenderer {
    type Output = String;

    fn render(&self, view: &EditorView) -> String {
        let mut output = String::new();
        let buffer = view.buffer();
        let line_count = buffer.line_count();
        let digits = LineNumberGutter::digits(line_count);
        let cursor = view.cursor_position();

        for row in view.visible_rows() {
            match buffer.line(row) {
                Some(line) => {
                    output.push_str(&self.gutter.label(row, line_count));
                    output.push(' ');
                    if row == cursor.row {
                        output.push_str(&Self::render_line_with_cursor(line, cursor.col));
                    } else {
                        output.push_str(line);
                    }
                    output.push('\n');
                    if row == cursor.row {
                        self.render_popup(view, digits, &mut output);
                    }
                }
                None => output.push_str("~\n"),
            }
        }

        output
    }
}
