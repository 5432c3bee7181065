use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Emotional valence assigned to a piece of journal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Mixed => "mixed",
        }
    }

    /// Parses a provider/wire label such as `"negative"`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            "mixed" => Some(Sentiment::Mixed),
            _ => None,
        }
    }

    pub fn badge(&self) -> SentimentBadge {
        match self {
            Sentiment::Positive => SentimentBadge {
                label: "Positive",
                emoji: "😊",
                needs_support: false,
            },
            Sentiment::Neutral => SentimentBadge {
                label: "Neutral",
                emoji: "😐",
                needs_support: false,
            },
            Sentiment::Negative => SentimentBadge {
                label: "Needs Support",
                emoji: "⚠️",
                needs_support: true,
            },
            Sentiment::Mixed => SentimentBadge {
                label: "Mixed",
                emoji: "🤔",
                needs_support: false,
            },
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display information for a sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentBadge {
    pub label: &'static str,
    pub emoji: &'static str,
    pub needs_support: bool,
}

/// Relative weights over positive, neutral and negative. Each lies in [0, 1];
/// they are not required to sum to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl ConfidenceScores {
    pub const fn new(positive: f64, neutral: f64, negative: f64) -> Self {
        Self {
            positive,
            neutral,
            negative,
        }
    }

    /// Forces every weight into [0, 1]. NaN becomes 0.
    pub fn clamped(self) -> Self {
        fn unit(v: f64) -> f64 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, 1.0)
            }
        }
        Self::new(unit(self.positive), unit(self.neutral), unit(self.negative))
    }
}

/// Per-sentence breakdown returned by the remote provider. Carried through
/// untouched; nothing downstream scores on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceSentiment {
    pub text: String,
    pub sentiment: String,
    pub confidence_scores: ConfidenceScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub confidence_scores: ConfidenceScores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<SentenceSentiment>>,
}

impl SentimentResult {
    pub fn new(sentiment: Sentiment, confidence_scores: ConfidenceScores) -> Self {
        Self {
            sentiment,
            confidence_scores,
            sentences: None,
        }
    }

    /// Result for empty or whitespace-only text.
    pub fn empty_text() -> Self {
        Self::new(Sentiment::Neutral, ConfidenceScores::new(0.0, 1.0, 0.0))
    }
}

const POSITIVE_KEYWORDS: &[&str] = &[
    "happy",
    "joy",
    "love",
    "great",
    "amazing",
    "wonderful",
    "excited",
    "blessed",
    "grateful",
    "thankful",
    "smile",
    "beautiful",
    "best",
    "fantastic",
    "awesome",
    "good",
    "better",
    "healing",
    "progress",
    "hope",
    "proud",
    "celebration",
    "🎉",
    "💕",
    "😊",
    "🥰",
    "❤️",
    "💜",
    "😍",
    "🙏",
    "✨",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "sad",
    "depressed",
    "anxious",
    "worried",
    "scared",
    "fear",
    "cry",
    "crying",
    "tired",
    "exhausted",
    "overwhelmed",
    "struggling",
    "hard",
    "difficult",
    "pain",
    "lonely",
    "alone",
    "hopeless",
    "helpless",
    "stressed",
    "angry",
    "frustrated",
    "can't cope",
    "breaking down",
    "give up",
    "too much",
    "no sleep",
    "😢",
    "😭",
    "😔",
    "😟",
    "😰",
    "😨",
    "💔",
];

/// Crisis indicators. A hit overrides every other keyword.
const WARNING_PHRASES: &[&str] = &[
    "harm",
    "hurt myself",
    "end it",
    "can't go on",
    "no point",
    "suicide",
    "self-harm",
    "want to die",
    "give up on life",
];

const BALANCE_THRESHOLD: f64 = 0.6;

fn normalize(text: &str) -> String {
    // Typographic apostrophes would otherwise miss "can't ..." phrases.
    text.to_lowercase().replace('\u{2019}', "'")
}

fn count_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

/// Returns the first crisis phrase contained in `text`, if any.
pub fn find_warning_phrase(text: &str) -> Option<&'static str> {
    let text = normalize(text);
    WARNING_PHRASES.iter().copied().find(|p| text.contains(p))
}

/// Deterministic keyword scoring used whenever the remote provider is not
/// available. Pure function of `text`.
pub fn score_keywords(text: &str) -> SentimentResult {
    if let Some(phrase) = find_warning_phrase(text) {
        debug!(phrase, "warning phrase matched");
        return SentimentResult::new(Sentiment::Negative, ConfidenceScores::new(0.0, 0.1, 0.9));
    }

    let lower = normalize(text);
    let positive = count_hits(&lower, POSITIVE_KEYWORDS);
    let negative = count_hits(&lower, NEGATIVE_KEYWORDS);
    debug!(positive, negative, "keyword counts");

    let total = positive + negative;
    if total == 0 {
        return SentimentResult::new(Sentiment::Neutral, ConfidenceScores::new(0.2, 0.6, 0.2));
    }

    let positive_ratio = positive as f64 / total as f64;
    let negative_ratio = negative as f64 / total as f64;

    if positive_ratio > BALANCE_THRESHOLD {
        SentimentResult::new(
            Sentiment::Positive,
            ConfidenceScores::new(
                (0.5 + 0.4 * positive_ratio).min(0.9),
                0.1,
                (0.4 - 0.4 * positive_ratio).max(0.0),
            ),
        )
    } else if negative_ratio > BALANCE_THRESHOLD {
        SentimentResult::new(
            Sentiment::Negative,
            ConfidenceScores::new(
                (0.4 - 0.4 * negative_ratio).max(0.0),
                0.1,
                (0.5 + 0.4 * negative_ratio).min(0.9),
            ),
        )
    } else {
        SentimentResult::new(Sentiment::Mixed, ConfidenceScores::new(0.35, 0.3, 0.35))
    }
}

/// Maps a confidence triple onto the 0..=10 trend scale
/// (0 very negative, 5 neutral, 10 very positive).
pub fn sentiment_to_score(result: &SentimentResult) -> u8 {
    let c = result.confidence_scores.clamped();
    let raw = (c.positive * 10.0 + c.neutral * 5.0 + c.negative * 0.0).round();
    raw.clamp(0.0, 10.0) as u8
}

/// Coarse reading of a 0..=10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    NeedsAttention,
    Okay,
    Good,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score < 4.0 {
            ScoreBand::NeedsAttention
        } else if score < 6.0 {
            ScoreBand::Okay
        } else {
            ScoreBand::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::NeedsAttention => "Needs Attention",
            ScoreBand::Okay => "Okay",
            ScoreBand::Good => "Good",
        }
    }
}
