use crate::check_in::CheckIn;
use crate::history::TrendPoint;
use crate::sentiment::{Sentiment, SentimentResult};
use serde::{Deserialize, Serialize};

/// Anything the monitor can read a sentiment label from. Entries without a
/// label (unanalysed check-ins, unrecognised strings) never count as
/// negative.
pub trait SentimentLabel {
    fn sentiment_label(&self) -> Option<Sentiment>;
}

impl SentimentLabel for Sentiment {
    fn sentiment_label(&self) -> Option<Sentiment> {
        Some(*self)
    }
}

impl SentimentLabel for SentimentResult {
    fn sentiment_label(&self) -> Option<Sentiment> {
        Some(self.sentiment)
    }
}

impl SentimentLabel for CheckIn {
    fn sentiment_label(&self) -> Option<Sentiment> {
        self.sentiment.as_ref().map(|s| s.sentiment)
    }
}

impl SentimentLabel for TrendPoint {
    fn sentiment_label(&self) -> Option<Sentiment> {
        self.sentiment
    }
}

impl SentimentLabel for str {
    fn sentiment_label(&self) -> Option<Sentiment> {
        Sentiment::from_label(self)
    }
}

impl SentimentLabel for String {
    fn sentiment_label(&self) -> Option<Sentiment> {
        Sentiment::from_label(self)
    }
}

impl<T: SentimentLabel + ?Sized> SentimentLabel for &T {
    fn sentiment_label(&self) -> Option<Sentiment> {
        (**self).sentiment_label()
    }
}

/// True when the last `n` entries are all negative. Histories shorter than
/// `n`, and `n == 0`, never alert.
pub fn has_consecutive_negatives<T: SentimentLabel>(history: &[T], n: usize) -> bool {
    if n == 0 || history.len() < n {
        return false;
    }
    history[history.len() - n..]
        .iter()
        .all(|entry| entry.sentiment_label() == Some(Sentiment::Negative))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Quiet,
    Alerting,
}

impl AlertState {
    pub fn is_alerting(&self) -> bool {
        matches!(self, AlertState::Alerting)
    }
}

/// Re-scans the trailing window on every evaluation; there is no running
/// counter and no escalation beyond `Alerting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyMonitor {
    window: usize,
}

impl Default for SafetyMonitor {
    fn default() -> Self {
        Self { window: 3 }
    }
}

impl SafetyMonitor {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn evaluate<T: SentimentLabel>(&self, history: &[T]) -> AlertState {
        if has_consecutive_negatives(history, self.window) {
            AlertState::Alerting
        } else {
            AlertState::Quiet
        }
    }
}

/// A support contact offered while alerting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisResource {
    pub name: String,
    pub contact: String,
}

impl CrisisResource {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
        }
    }
}
