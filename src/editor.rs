// SPDX-License-Identifier: GPL-3.0-only

//! Cursor-aware text editing on editable surfaces.
//!
//! The keyboard never owns the elements it types into. The host exposes them
//! through [`SurfaceHost`], keyed by [`TargetId`], and each element implements
//! [`TextSurface`]: its text plus a selection expressed in character offsets.
//!
//! Editing rules:
//!
//! - A missing selection is treated as a caret at offset 0
//! - Offsets past the end of the text are clamped to the end
//! - A reversed selection (`start > end`) is normalized
//! - After any edit the selection is collapsed to a caret

use std::collections::HashMap;
use std::fmt;

/// Identifies an editable element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of element reported by a focus event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Single-line input element
    Input,
    /// Multi-line text area
    TextArea,
    /// Rich-text editable region
    EditableRegion,
    /// Anything that does not accept text
    Other,
}

impl TargetKind {
    /// Returns `true` for elements that accept typed text.
    pub fn is_editable(self) -> bool {
        !matches!(self, TargetKind::Other)
    }
}

/// A selection range in character offsets.
///
/// `start == end` is a collapsed selection (a caret).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Creates a selection from two offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a collapsed selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns `true` if the selection is a caret.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Orders the offsets and clamps both to `len`.
    pub fn normalized(self, len: usize) -> Self {
        let start = self.start.min(self.end).min(len);
        let end = self.start.max(self.end).min(len);
        Self { start, end }
    }
}

/// An element that can receive typed text.
pub trait TextSurface {
    /// Current content.
    fn text(&self) -> &str;

    /// Current selection, or `None` if the element reports none.
    fn selection(&self) -> Option<Selection>;

    /// Replaces the content.
    fn set_text(&mut self, text: String);

    /// Moves the selection.
    fn set_selection(&mut self, selection: Selection);
}

/// Looks up host elements by id.
pub trait SurfaceHost {
    /// Returns the element for `id`, or `None` if it no longer exists.
    fn surface_mut(&mut self, id: TargetId) -> Option<&mut dyn TextSurface>;
}

impl<S: TextSurface> SurfaceHost for HashMap<TargetId, S> {
    fn surface_mut(&mut self, id: TargetId) -> Option<&mut dyn TextSurface> {
        self.get_mut(&id).map(|surface| surface as &mut dyn TextSurface)
    }
}

/// A plain in-memory text element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection: Option<Selection>,
}

impl TextBuffer {
    /// Creates an empty buffer with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer with the caret at the end of `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            selection: Some(Selection::caret(end)),
        }
    }

    /// Sets the selection, builder style.
    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.selection = Some(Selection::new(start, end));
        self
    }

    /// Sets a collapsed caret, builder style.
    pub fn with_caret(self, offset: usize) -> Self {
        self.with_selection(offset, offset)
    }

    /// Clears the selection, builder style.
    pub fn without_selection(mut self) -> Self {
        self.selection = None;
        self
    }

    /// Returns the caret offset if the selection is collapsed.
    pub fn caret(&self) -> Option<usize> {
        self.selection
            .filter(Selection::is_collapsed)
            .map(|selection| selection.start)
    }
}

impl TextSurface for TextBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }
}

/// Converts a character offset into a byte offset, clamped to the end.
fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Reads the surface's selection with defaults and clamping applied.
fn current_selection(surface: &dyn TextSurface) -> Selection {
    let len = surface.text().chars().count();
    surface
        .selection()
        .unwrap_or_default()
        .normalized(len)
}

/// Removes the character range `start..end` and inserts `replacement` there.
fn splice(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);

    let capacity = text.len() - (end_byte - start_byte) + replacement.len();
    let mut spliced = String::with_capacity(capacity);
    spliced.push_str(&text[..start_byte]);
    spliced.push_str(replacement);
    spliced.push_str(&text[end_byte..]);
    spliced
}

/// Replaces the selection with `text` and collapses the caret after it.
///
/// # Returns
///
/// The new caret offset: selection start plus the inserted length.
pub fn insert_text(surface: &mut dyn TextSurface, text: &str) -> usize {
    let selection = current_selection(surface);
    let updated = splice(surface.text(), selection.start, selection.end, text);
    let caret = selection.start + text.chars().count();

    surface.set_text(updated);
    surface.set_selection(Selection::caret(caret));
    caret
}

/// Deletes the selection, or the character before a collapsed caret.
///
/// # Returns
///
/// `true` if anything was removed. A caret at offset 0 is a no-op.
pub fn delete_backward(surface: &mut dyn TextSurface) -> bool {
    let selection = current_selection(surface);

    let (start, end) = if selection.is_collapsed() {
        if selection.start == 0 {
            return false;
        }
        (selection.start - 1, selection.start)
    } else {
        (selection.start, selection.end)
    };

    let updated = splice(surface.text(), start, end, "");
    surface.set_text(updated);
    surface.set_selection(Selection::caret(start));
    true
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_caret() {
        let mut buffer = TextBuffer::with_text("abcd").with_caret(2);

        let caret = insert_text(&mut buffer, "x");

        assert_eq!(buffer.text(), "abxcd");
        assert_eq!(caret, 3);
        assert_eq!(buffer.caret(), Some(3));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buffer = TextBuffer::with_text("abcdef").with_selection(2, 4);

        insert_text(&mut buffer, "y");

        assert_eq!(buffer.text(), "abyef");
        assert_eq!(buffer.selection(), Some(Selection::caret(3)), "Selection should collapse");
    }

    #[test]
    fn test_insert_multi_character_text() {
        let mut buffer = TextBuffer::with_text("ad").with_caret(1);

        insert_text(&mut buffer, "bc");

        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.caret(), Some(3));
    }

    #[test]
    fn test_insert_without_selection_goes_to_start() {
        let mut buffer = TextBuffer::with_text("tail").without_selection();

        insert_text(&mut buffer, ">");

        assert_eq!(buffer.text(), ">tail");
        assert_eq!(buffer.caret(), Some(1));
    }

    #[test]
    fn test_insert_clamps_out_of_range_selection() {
        let mut buffer = TextBuffer::with_text("ab").with_selection(7, 9);

        insert_text(&mut buffer, "c");

        assert_eq!(buffer.text(), "abc");
        assert_eq!(buffer.caret(), Some(3));
    }

    #[test]
    fn test_insert_normalizes_reversed_selection() {
        let mut buffer = TextBuffer::with_text("abcdef").with_selection(4, 2);

        insert_text(&mut buffer, "y");

        assert_eq!(buffer.text(), "abyef");
        assert_eq!(buffer.caret(), Some(3));
    }

    #[test]
    fn test_insert_uses_character_offsets() {
        let mut buffer = TextBuffer::with_text("héllo").with_caret(2);

        insert_text(&mut buffer, "ü");

        assert_eq!(buffer.text(), "héüllo");
        assert_eq!(buffer.caret(), Some(3));
    }

    #[test]
    fn test_delete_before_caret() {
        let mut buffer = TextBuffer::with_text("abc");

        assert!(delete_backward(&mut buffer));

        assert_eq!(buffer.text(), "ab");
        assert_eq!(buffer.caret(), Some(2));
    }

    #[test]
    fn test_delete_in_middle() {
        let mut buffer = TextBuffer::with_text("abc").with_caret(2);

        delete_backward(&mut buffer);

        assert_eq!(buffer.text(), "ac");
        assert_eq!(buffer.caret(), Some(1));
    }

    #[test]
    fn test_delete_at_start_is_noop() {
        let mut buffer = TextBuffer::with_text("abc").with_caret(0);

        assert!(!delete_backward(&mut buffer));

        assert_eq!(buffer.text(), "abc");
        assert_eq!(buffer.caret(), Some(0));
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut buffer = TextBuffer::with_text("abc").without_selection();

        assert!(!delete_backward(&mut buffer));
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_delete_selection() {
        let mut buffer = TextBuffer::with_text("abcdef").with_selection(1, 4);

        assert!(delete_backward(&mut buffer));

        assert_eq!(buffer.text(), "aef");
        assert_eq!(buffer.caret(), Some(1));
    }

    #[test]
    fn test_delete_multibyte_character() {
        let mut buffer = TextBuffer::with_text("añ");

        delete_backward(&mut buffer);

        assert_eq!(buffer.text(), "a");
        assert_eq!(buffer.caret(), Some(1));
    }

    #[test]
    fn test_selection_normalized() {
        assert_eq!(Selection::new(5, 1).normalized(10), Selection::new(1, 5));
        assert_eq!(Selection::new(3, 12).normalized(4), Selection::new(3, 4));
        assert_eq!(Selection::new(9, 9).normalized(2), Selection::caret(2));
    }

    #[test]
    fn test_target_kind_editable() {
        assert!(TargetKind::Input.is_editable());
        assert!(TargetKind::TextArea.is_editable());
        assert!(TargetKind::EditableRegion.is_editable());
        assert!(!TargetKind::Other.is_editable());
    }

    #[test]
    fn test_hashmap_surface_host() {
        let mut host: HashMap<TargetId, TextBuffer> = HashMap::new();
        host.insert(TargetId(1), TextBuffer::new());

        let surface = host.surface_mut(TargetId(1)).expect("Surface should exist");
        insert_text(surface, "hi");

        assert_eq!(host[&TargetId(1)].text(), "hi");
        assert!(host.surface_mut(TargetId(2)).is_none());
    }
}
