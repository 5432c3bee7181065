use crate::check_in::Mood;
use crate::sentiment::{sentiment_to_score, Sentiment, SentimentResult};
use serde::{Deserialize, Serialize};

pub const CONCEALED_DISTRESS_MESSAGE: &str = "Your words suggest you might be going through a difficult time, even if you're trying to stay positive. It's okay to acknowledge how you're really feeling. 💜";
pub const UNACKNOWLEDGED_POSITIVITY_MESSAGE: &str = "It sounds like there might be some positivity in your message. Remember, it's okay to recognize the good moments too. 🌟";
pub const MATCH_MESSAGE: &str = "Your words match how you feel";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchVerdict {
    pub matches: bool,
    pub message: String,
    pub mood_score: u8,
    pub text_score: u8,
}

/// Checks the self-reported mood against the text's sentiment.
///
/// Only two combinations count as a mismatch: negative text under a good
/// mood, and positive text under a rough mood. Neutral and mixed text match
/// every mood.
pub fn compare(mood: Mood, result: &SentimentResult) -> MatchVerdict {
    let mood_score = mood.score();
    let text_score = sentiment_to_score(result);

    let mismatch = match (result.sentiment, mood) {
        (Sentiment::Negative, Mood::Good) => Some(CONCEALED_DISTRESS_MESSAGE),
        (Sentiment::Positive, Mood::Rough) => Some(UNACKNOWLEDGED_POSITIVITY_MESSAGE),
        _ => None,
    };

    MatchVerdict {
        matches: mismatch.is_none(),
        message: mismatch.unwrap_or(MATCH_MESSAGE).to_string(),
        mood_score,
        text_score,
    }
}
