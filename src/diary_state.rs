use crate::diary_entry::{DiaryEntry, EntryId};
use crate::error::{EntryNotFound, SaveError};

/// Storage behind the entry list.
///
/// Only an in-memory implementation exists; the trait is the seam a durable
/// backend would plug into.
pub trait EntryRepository {
    /// All entries, newest first.
    fn list_entries(&self) -> &[DiaryEntry];

    fn save_entry(&mut self, entry: DiaryEntry) -> Result<(), SaveError>;

    fn delete_entry(&mut self, id: &EntryId) -> Result<DiaryEntry, EntryNotFound>;
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    entries: Vec<DiaryEntry>,
}

impl EntryRepository for InMemoryRepository {
    fn list_entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    fn save_entry(&mut self, entry: DiaryEntry) -> Result<(), SaveError> {
        // Newest first; equal dates keep the later insert in front.
        let index = self.entries.partition_point(|e| e.date > entry.date);
        self.entries.insert(index, entry);
        Ok(())
    }

    fn delete_entry(&mut self, id: &EntryId) -> Result<DiaryEntry, EntryNotFound> {
        let index = self
            .entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| EntryNotFound(id.clone()))?;
        Ok(self.entries.remove(index))
    }
}

/// The entry store. Sole owner of saved entries; callers only ever get copies
/// or shared borrows.
pub struct DiaryState {
    repository: Box<dyn EntryRepository + Send>,
}

impl DiaryState {
    pub fn new() -> Self {
        Self::with_repository(Box::new(InMemoryRepository::default()))
    }

    pub fn with_repository(repository: Box<dyn EntryRepository + Send>) -> Self {
        DiaryState { repository }
    }

    /// Store a new entry, replacing its id if one is already taken.
    pub fn add_entry(&mut self, mut entry: DiaryEntry) -> Result<EntryId, SaveError> {
        while self.contains(&entry.id) {
            entry.id = EntryId::generate();
        }
        let id = entry.id.clone();
        self.repository.save_entry(entry)?;
        Ok(id)
    }

    pub fn delete_entry(&mut self, id: &EntryId) -> Result<DiaryEntry, EntryNotFound> {
        self.repository.delete_entry(id)
    }

    pub fn get_entries(&self) -> &[DiaryEntry] {
        self.repository.list_entries()
    }

    pub fn get_entry(&self, id: &EntryId) -> Result<&DiaryEntry, EntryNotFound> {
        self.get_entries()
            .iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| EntryNotFound(id.clone()))
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get_entries().iter().any(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.get_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.get_entries().is_empty()
    }
}

impl Default for DiaryState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary_entry::Mood;
    use chrono::{Duration, Local};

    fn entry_at(content: &str, days_ago: i64) -> DiaryEntry {
        let mut entry = DiaryEntry::new(content.to_string(), Mood::Neutral);
        entry.date = Local::now() - Duration::days(days_ago);
        entry
    }

    #[test]
    fn newest_entry_goes_first() {
        let mut state = DiaryState::new();
        state.add_entry(entry_at("older", 2)).unwrap();
        state.add_entry(entry_at("newer", 1)).unwrap();
        state.add_entry(entry_at("today", 0)).unwrap();

        let contents: Vec<_> = state
            .get_entries()
            .iter()
            .map(|e| e.content.as_str())
            .collect();
        assert_eq!(contents, vec!["today", "newer", "older"]);
    }

    #[test]
    fn out_of_order_insert_keeps_descending_dates() {
        let mut state = DiaryState::new();
        state.add_entry(entry_at("a", 0)).unwrap();
        state.add_entry(entry_at("c", 5)).unwrap();
        state.add_entry(entry_at("b", 3)).unwrap();

        let dates: Vec<_> = state.get_entries().iter().map(|e| e.date).collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn duplicate_id_is_reassigned() {
        let mut state = DiaryState::new();
        let first = entry_at("first", 1);
        let mut second = entry_at("second", 0);
        second.id = first.id.clone();

        let first_id = state.add_entry(first).unwrap();
        let second_id = state.add_entry(second).unwrap();

        assert_ne!(first_id, second_id);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn delete_missing_entry_is_not_found() {
        let mut state = DiaryState::new();
        let id = EntryId::from("missing");
        assert_eq!(state.delete_entry(&id), Err(EntryNotFound(id.clone())));
        assert!(state.get_entry(&id).is_err());
    }

    #[test]
    fn delete_removes_only_the_target() {
        let mut state = DiaryState::new();
        let keep = state.add_entry(entry_at("keep", 1)).unwrap();
        let drop = state.add_entry(entry_at("drop", 0)).unwrap();

        let removed = state.delete_entry(&drop).unwrap();
        assert_eq!(removed.content, "drop");
        assert!(state.contains(&keep));
        assert_eq!(state.len(), 1);
    }
}
