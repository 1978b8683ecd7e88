use crate::diary_entry::Mood;
use crate::error::ShareError;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::io;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub message: String,
}

impl SharePayload {
    pub fn for_entry(content: &str, mood: Mood, now: DateTime<Local>) -> Self {
        let date = now.format("%-m-%-d-%Y").to_string();
        let title = format!("Diary Entry - {date}");
        let message = format!("{title}\n\n{content}\n\nMood: {mood}\nWritten on: {date}");
        SharePayload { title, message }
    }
}

/// The platform's share capability.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Shares by writing the message to a text file named after the title.
/// Existing files are never overwritten; later exports get `-2`, `-3`, ...
pub struct FileShareTarget {
    dir: PathBuf,
}

impl FileShareTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileShareTarget { dir: dir.into() }
    }

    fn stem_for(payload: &SharePayload) -> String {
        payload
            .title
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }

    fn path_for(&self, stem: &str, attempt: u32) -> PathBuf {
        match attempt {
            1 => self.dir.join(format!("{stem}.txt")),
            n => self.dir.join(format!("{stem}-{n}.txt")),
        }
    }
}

#[async_trait]
impl ShareTarget for FileShareTarget {
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ShareError::Platform(e.to_string()))?;
        let stem = Self::stem_for(payload);
        let mut attempt = 1;
        let (path, mut file) = loop {
            let path = self.path_for(&stem, attempt);
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(ShareError::Platform(e.to_string())),
            }
        };
        file.write_all(payload.message.as_bytes())
            .await
            .map_err(|e| ShareError::Platform(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| ShareError::Platform(e.to_string()))?;
        debug!(path = %path.display(), "Wrote shared entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn payload_matches_export_format() {
        let now = Local.with_ymd_and_hms(2026, 3, 7, 9, 30, 0).unwrap();
        let payload = SharePayload::for_entry("Dear diary", Mood::Positive, now);
        assert_eq!(payload.title, "Diary Entry - 3-7-2026");
        assert_eq!(
            payload.message,
            "Diary Entry - 3-7-2026\n\nDear diary\n\nMood: positive\nWritten on: 3-7-2026"
        );
    }

    #[tokio::test]
    async fn file_target_writes_message() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileShareTarget::new(dir.path().join("exports"));
        let payload = SharePayload {
            title: "Diary Entry - 1-2-2026".into(),
            message: "hello".into(),
        };

        target.share(&payload).await.unwrap();

        let written =
            std::fs::read_to_string(dir.path().join("exports/Diary_Entry_-_1-2-2026.txt")).unwrap();
        assert_eq!(written, "hello");
    }

    #[tokio::test]
    async fn same_day_exports_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileShareTarget::new(dir.path());
        for message in ["first", "second", "third"] {
            let payload = SharePayload {
                title: "Diary Entry - 1-2-2026".into(),
                message: message.into(),
            };
            target.share(&payload).await.unwrap();
        }

        let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("Diary_Entry_-_1-2-2026.txt"), "first");
        assert_eq!(read("Diary_Entry_-_1-2-2026-2.txt"), "second");
        assert_eq!(read("Diary_Entry_-_1-2-2026-3.txt"), "third");
    }
}
