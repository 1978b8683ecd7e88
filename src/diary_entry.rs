use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Characters per minute used for the reading time estimate.
const READING_CHARS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Neutral => "neutral",
            Mood::Negative => "negative",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Positive => "Positive",
            Mood::Neutral => "Neutral",
            Mood::Negative => "Negative",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        EntryId(Uuid::new_v4().to_string())
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId(value.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: EntryId,
    pub date: DateTime<Local>,
    pub content: String,
    pub mood: Mood,
}

impl DiaryEntry {
    pub fn new(content: String, mood: Mood) -> Self {
        DiaryEntry {
            id: EntryId::generate(),
            date: Local::now(),
            content,
            mood,
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn reading_minutes(&self) -> usize {
        reading_minutes(&self.content)
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn reading_minutes(text: &str) -> usize {
    text.chars().count().div_ceil(READING_CHARS_PER_MINUTE)
}

/// The two entries the app ships with when samples are enabled.
pub fn sample_entries(now: DateTime<Local>) -> Vec<DiaryEntry> {
    vec![
        DiaryEntry {
            id: EntryId::generate(),
            date: now - chrono::Duration::days(1),
            content: "Today was an amazing day! I finally completed my project and celebrated with friends. The weather was perfect for a walk in the park.".to_string(),
            mood: Mood::Positive,
        },
        DiaryEntry {
            id: EntryId::generate(),
            date: now - chrono::Duration::days(2),
            content: "Spent the morning reading my favorite book and working on personal goals. Sometimes quiet days are the best days.".to_string(),
            mood: Mood::Neutral,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_minutes(""), 0);
        assert_eq!(reading_minutes("a"), 1);
        assert_eq!(reading_minutes(&"x".repeat(200)), 1);
        assert_eq!(reading_minutes(&"x".repeat(201)), 2);
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  Hello \n\n world  "), 2);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn mood_serializes_lowercase() {
        let json = serde_json::to_string(&Mood::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        assert_eq!(Mood::default(), Mood::Neutral);
    }

    #[test]
    fn samples_are_newest_first() {
        let now = Local::now();
        let samples = sample_entries(now);
        assert_eq!(samples.len(), 2);
        assert!(samples[0].date > samples[1].date);
        assert_ne!(samples[0].id, samples[1].id);
    }
}
