use crate::check_in::CheckIn;
use crate::sentiment::{sentiment_to_score, Sentiment};
use chrono::{DateTime, Local};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// One chart sample: self-reported score next to the text-derived score.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub timestamp: DateTime<Local>,
    pub mood_score: u8,
    pub text_score: Option<u8>,
    pub sentiment: Option<Sentiment>,
}

impl TrendPoint {
    fn from_check_in(check_in: &CheckIn) -> Self {
        let text_score = check_in
            .mood_match
            .as_ref()
            .map(|m| m.text_score)
            .or_else(|| check_in.sentiment.as_ref().map(sentiment_to_score));
        TrendPoint {
            label: check_in.timestamp.format("%a").to_string(),
            timestamp: check_in.timestamp,
            mood_score: check_in.selected_mood.score(),
            text_score,
            sentiment: check_in.sentiment.as_ref().map(|s| s.sentiment),
        }
    }

    pub fn value(&self, field: TrendField) -> Option<u8> {
        match field {
            TrendField::MoodScore => Some(self.mood_score),
            TrendField::TextScore => self.text_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendField {
    MoodScore,
    TextScore,
}

/// Append-only, insertion-ordered check-in log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<CheckIn>,
}

impl History {
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, check_in: CheckIn) {
        self.entries.push(check_in);
    }

    pub fn entries(&self) -> &[CheckIn] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn window(&self, window_size: usize) -> &[CheckIn] {
        let start = self.entries.len().saturating_sub(window_size);
        &self.entries[start..]
    }

    /// The most recent `window_size` check-ins projected for charting,
    /// oldest first.
    pub fn series(&self, window_size: usize) -> Vec<TrendPoint> {
        self.window(window_size)
            .iter()
            .map(TrendPoint::from_check_in)
            .collect()
    }

    /// Mean of `field` over the window. Divides by the number of values
    /// actually present, which may be fewer than `window_size`.
    pub fn average(&self, field: TrendField, window_size: usize) -> Option<f64> {
        let values: Vec<f64> = self
            .series(window_size)
            .iter()
            .filter_map(|p| p.value(field))
            .map(f64::from)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// Folds in check-ins recorded elsewhere. Entries already present (by
    /// id) are skipped; the result is re-ordered by timestamp, then id, so
    /// the outcome does not depend on which side merged. Returns how many
    /// entries were added.
    pub fn merge<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = CheckIn>,
    {
        let mut known: HashSet<_> = self.entries.iter().map(|c| c.id).collect();
        let before = self.entries.len();
        self.entries
            .extend(incoming.into_iter().filter(|c| known.insert(c.id)));
        self.entries.sort_by_key(|c| (c.timestamp, c.id));
        self.entries.len() - before
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self)?;
        fs::write(path, serialized)?;
        info!(path = %path.display(), entries = self.entries.len(), "journal saved");
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let serialized = fs::read_to_string(path)?;
        let history: History = serde_json::from_str(&serialized)?;
        Ok(history)
    }
}
