use crate::diary_entry::{reading_minutes, word_count, Mood};
use crate::error::AnalysisError;
use async_trait::async_trait;
use std::time::Duration;

/// Content longer than this many characters reads as positive.
const POSITIVE_THRESHOLD: usize = 50;

/// Text-to-mood analysis. The simulated analyzer stands in for a real
/// service behind the same interface.
#[async_trait]
pub trait MoodAnalyzer: Send + Sync {
    async fn analyze(&self, content: &str) -> Result<Mood, AnalysisError>;
}

pub struct SimulatedAnalyzer {
    latency: Duration,
}

impl SimulatedAnalyzer {
    pub fn new(latency: Duration) -> Self {
        SimulatedAnalyzer { latency }
    }
}

#[async_trait]
impl MoodAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, content: &str) -> Result<Mood, AnalysisError> {
        tokio::time::sleep(self.latency).await;
        Ok(classify(content))
    }
}

pub fn classify(content: &str) -> Mood {
    if content.chars().count() > POSITIVE_THRESHOLD {
        Mood::Positive
    } else {
        Mood::Neutral
    }
}

/// Figures shown in the insights panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insights {
    pub tone: Mood,
    pub reading_minutes: usize,
    pub word_count: usize,
}

impl Insights {
    pub fn for_text(content: &str, tone: Mood) -> Self {
        Insights {
            tone,
            reading_minutes: reading_minutes(content),
            word_count: word_count(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary() {
        assert_eq!(classify(""), Mood::Neutral);
        assert_eq!(classify(&"a".repeat(50)), Mood::Neutral);
        assert_eq!(classify(&"a".repeat(51)), Mood::Positive);
    }

    #[test]
    fn threshold_counts_chars_not_bytes() {
        assert_eq!(classify(&"é".repeat(50)), Mood::Neutral);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_analyzer_waits_then_classifies() {
        let analyzer = SimulatedAnalyzer::new(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        let mood = analyzer.analyze(&"word ".repeat(20)).await.unwrap();
        assert_eq!(mood, Mood::Positive);
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[test]
    fn insights_summarise_text() {
        let insights = Insights::for_text("Hello world", Mood::Neutral);
        assert_eq!(insights.word_count, 2);
        assert_eq!(insights.reading_minutes, 1);
        assert_eq!(insights.tone, Mood::Neutral);
    }
}
