use ropey::{Rope, RopeSlice};
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

// Chars of a rope line without its terminator (`\n`, `\r\n` or a lone `\r`).
fn content_len(line: RopeSlice<'_>) -> usize {
    let mut len = line.len_chars();
    if len > 0 && line.char(len - 1) == '\n' {
        len -= 1;
    }
    if len > 0 && line.char(len - 1) == '\r' {
        len -= 1;
    }
    len
}

/// Char index of an LSP position (UTF-16 columns).
///
/// Columns past the end of the line land before the line break; a column inside a
/// surrogate pair lands before that character. Lines past the end map to the end.
pub(crate) fn char_offset(text: &Rope, pos: Position) -> usize {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return text.len_chars();
    }
    let line = text.line(line_idx);

    let mut units_left = pos.character as usize;
    let mut column = 0usize;
    for ch in line.chars().take(content_len(line)) {
        let width = ch.len_utf16();
        if width > units_left {
            break;
        }
        units_left -= width;
        column += 1;
    }
    text.line_to_char(line_idx) + column
}

/// Apply one `didChange` content change: ranged edits splice, range-less ones replace.
pub(crate) fn apply_content_change(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    let Some(range) = change.range else {
        *text = Rope::from_str(&change.text);
        return;
    };
    let a = char_offset(text, range.start);
    let b = char_offset(text, range.end);
    let (start, end) = (a.min(b), a.max(b));
    text.remove(start..end);
    text.insert(start, &change.text);
}

// Whole text of a line, line break included; empty past the end of the document.
pub(crate) fn line_text(text: &Rope, line: u32) -> String {
    let line_idx = line as usize;
    if line_idx >= text.len_lines() {
        return String::new();
    }
    text.line(line_idx).to_string()
}
