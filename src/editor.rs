use crate::diary_entry::{DiaryEntry, EntryId, Mood};

/// Identifies one composition session. Bumped every time the editor is
/// reset, loaded or closed so late completions can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CompositionId(u64);

/// The entry being composed or viewed. Holds a copy of any opened entry;
/// nothing here is written back to the store except through a save.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    content: String,
    /// Byte offset into `content`, always on a char boundary.
    cursor: usize,
    mood: Mood,
    analysis_visible: bool,
    composing: bool,
    opened_from: Option<EntryId>,
    dirty: bool,
    composition: CompositionId,
}

impl EditorState {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn analysis_visible(&self) -> bool {
        self.analysis_visible
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn opened_from(&self) -> Option<&EntryId> {
        self.opened_from.as_ref()
    }

    /// Content changed since the composer opened or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn composition(&self) -> CompositionId {
        self.composition
    }

    pub fn start_new(&mut self) {
        self.begin(String::new(), Mood::Neutral, None);
    }

    pub fn load(&mut self, entry: &DiaryEntry) {
        self.begin(entry.content.clone(), entry.mood, Some(entry.id.clone()));
    }

    fn begin(&mut self, content: String, mood: Mood, opened_from: Option<EntryId>) {
        self.composition = CompositionId(self.composition.0 + 1);
        self.cursor = content.len();
        self.content = content;
        self.mood = mood;
        self.analysis_visible = false;
        self.composing = true;
        self.opened_from = opened_from;
        self.dirty = false;
    }

    pub fn close(&mut self) {
        self.composition = CompositionId(self.composition.0 + 1);
        self.composing = false;
    }

    pub fn apply_analysis(&mut self, mood: Mood) {
        self.mood = mood;
        self.analysis_visible = true;
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.content.len();
        self.dirty = true;
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.dirty = true;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if let Some(c) = self.content[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.content.remove(self.cursor);
            self.dirty = true;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
            self.dirty = true;
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.content[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.content[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    pub fn move_end(&mut self) {
        self.cursor = self.line_end(self.cursor);
    }

    pub fn move_up(&mut self) {
        let current_start = self.line_start(self.cursor);
        if current_start == 0 {
            return;
        }
        let column = self.content[current_start..self.cursor].chars().count();
        let prev_start = self.line_start(current_start - 1);
        self.cursor = self.offset_in_line(prev_start, column);
    }

    pub fn move_down(&mut self) {
        let current_end = self.line_end(self.cursor);
        if current_end == self.content.len() {
            return;
        }
        let column = self.content[self.line_start(self.cursor)..self.cursor]
            .chars()
            .count();
        self.cursor = self.offset_in_line(current_end + 1, column);
    }

    /// Line and column (in chars) of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.content[..self.cursor];
        let line = before.matches('\n').count();
        let col = before[self.line_start(self.cursor)..].chars().count();
        (line, col)
    }

    fn line_start(&self, at: usize) -> usize {
        self.content[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, at: usize) -> usize {
        self.content[at..]
            .find('\n')
            .map(|i| at + i)
            .unwrap_or(self.content.len())
    }

    fn offset_in_line(&self, start: usize, column: usize) -> usize {
        let end = self.line_end(start);
        self.content[start..end]
            .char_indices()
            .nth(column)
            .map(|(i, _)| start + i)
            .unwrap_or(end)
    }
}
