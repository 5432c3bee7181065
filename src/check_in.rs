use crate::comparator::MatchVerdict;
use crate::sentiment::{Sentiment, SentimentResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tags offered by the check-in form. Free-form tags are also accepted.
pub const FACTOR_TAGS: &[&str] = &["Sleep", "Work", "Family", "My Body", "Diet"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[serde(alias = "sad")]
    Rough,
    #[serde(alias = "neutral")]
    Okay,
    #[serde(alias = "happy")]
    Good,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Rough, Mood::Okay, Mood::Good];

    /// Position on the 0..=10 trend scale.
    pub fn score(&self) -> u8 {
        match self {
            Mood::Rough => 2,
            Mood::Okay => 5,
            Mood::Good => 8,
        }
    }

    pub fn expected_sentiment(&self) -> Sentiment {
        match self {
            Mood::Rough => Sentiment::Negative,
            Mood::Okay => Sentiment::Neutral,
            Mood::Good => Sentiment::Positive,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Rough => "Rough",
            Mood::Okay => "Okay",
            Mood::Good => "Good",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood: {}", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rough" | "sad" => Ok(Mood::Rough),
            "okay" | "neutral" => Ok(Mood::Okay),
            "good" | "happy" => Ok(Mood::Good),
            _ => Err(UnknownMood(s.to_string())),
        }
    }
}

/// What the user filled in, before analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInDraft {
    pub mood: Mood,
    pub journal_text: String,
    pub factors: Vec<String>,
}

impl CheckInDraft {
    pub fn new(mood: Mood, journal_text: impl Into<String>) -> Self {
        Self {
            mood,
            journal_text: journal_text.into(),
            factors: Vec::new(),
        }
    }

    pub fn with_factors<I, S>(mut self, factors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.factors = factors.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: Uuid,
    pub timestamp: DateTime<Local>,
    pub selected_mood: Mood,
    pub journal_text: String,
    #[serde(default)]
    pub factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_match: Option<MatchVerdict>,
}

impl CheckIn {
    pub fn new(draft: CheckInDraft) -> Self {
        CheckIn {
            id: Uuid::new_v4(),
            timestamp: Local::now(),
            selected_mood: draft.mood,
            journal_text: draft.journal_text,
            factors: draft.factors,
            sentiment: None,
            mood_match: None,
        }
    }

    pub fn with_analysis(mut self, sentiment: SentimentResult, verdict: MatchVerdict) -> Self {
        self.sentiment = Some(sentiment);
        self.mood_match = Some(verdict);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// First line of the journal text, for list views.
    pub fn headline(&self) -> &str {
        self.journal_text.lines().next().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_parse_to_same_mood() {
        assert_eq!("sad".parse::<Mood>(), Ok(Mood::Rough));
        assert_eq!("Neutral".parse::<Mood>(), Ok(Mood::Okay));
        assert_eq!(" happy ".parse::<Mood>(), Ok(Mood::Good));
        assert!("ecstatic".parse::<Mood>().is_err());
    }

    #[test]
    fn aliases_deserialize() {
        let mood: Mood = serde_json::from_str("\"happy\"").unwrap();
        assert_eq!(mood, Mood::Good);
        assert_eq!(serde_json::to_string(&Mood::Rough).unwrap(), "\"rough\"");
    }

    #[test]
    fn mood_scores_and_expectations() {
        assert_eq!(Mood::Rough.score(), 2);
        assert_eq!(Mood::Okay.score(), 5);
        assert_eq!(Mood::Good.score(), 8);
        assert_eq!(Mood::Rough.expected_sentiment(), Sentiment::Negative);
        assert_eq!(Mood::Good.expected_sentiment(), Sentiment::Positive);
    }

    #[test]
    fn new_check_in_is_unanalysed() {
        let a = CheckIn::new(CheckInDraft::new(Mood::Okay, "line one\nline two").with_factors(["Sleep", "Sleep"]));
        let b = CheckIn::new(CheckInDraft::new(Mood::Okay, ""));
        assert_ne!(a.id, b.id);
        assert!(a.sentiment.is_none());
        assert!(a.mood_match.is_none());
        assert_eq!(a.factors, vec!["Sleep", "Sleep"]);
        assert_eq!(a.headline(), "line one");
        assert_eq!(b.headline(), "");
    }
}
