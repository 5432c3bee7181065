use crate::config::SentimentConfig;
use crate::error::ProviderError;
use crate::sentiment::{score_keywords, SentimentResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A remote sentiment backend.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn analyze(&self, text: &str, language: &str) -> Result<SentimentResult, ProviderError>;
}

/// Azure AI Language, text analytics v3.1.
pub struct AzureLanguageProvider {
    endpoint: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SentimentRequest<'a> {
    documents: [Document<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    id: &'static str,
    language: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    #[serde(default)]
    documents: Vec<SentimentResult>,
}

impl AzureLanguageProvider {
    pub fn new(endpoint: &str, api_key: &str, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[async_trait]
impl SentimentProvider for AzureLanguageProvider {
    async fn analyze(&self, text: &str, language: &str) -> Result<SentimentResult, ProviderError> {
        let url = format!("{}/text/analytics/v3.1/sentiment", self.endpoint);
        let request = SentimentRequest {
            documents: [Document {
                id: "1",
                language,
                text,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: SentimentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        let mut doc = parsed
            .documents
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;
        doc.confidence_scores = doc.confidence_scores.clamped();
        Ok(doc)
    }
}

/// Why a classification did not come from the remote provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    MissingCredentials,
    Transport(String),
    Status(u16),
    Decode(String),
    EmptyResponse,
}

impl From<ProviderError> for FallbackReason {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingCredentials => FallbackReason::MissingCredentials,
            ProviderError::Transport(e) => FallbackReason::Transport(e.to_string()),
            ProviderError::Status(code) => FallbackReason::Status(code),
            ProviderError::Decode(msg) => FallbackReason::Decode(msg),
            ProviderError::EmptyResponse => FallbackReason::EmptyResponse,
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::MissingCredentials => f.write_str("credentials not configured"),
            FallbackReason::Transport(msg) => write!(f, "transport error: {msg}"),
            FallbackReason::Status(code) => write!(f, "status {code}"),
            FallbackReason::Decode(msg) => write!(f, "undecodable response: {msg}"),
            FallbackReason::EmptyResponse => f.write_str("empty response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationSource {
    /// Blank text; no provider call was made.
    EmptyInput,
    Remote,
    Fallback(FallbackReason),
}

/// A sentiment result together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub result: SentimentResult,
    pub source: ClassificationSource,
}

impl Classification {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ClassificationSource::Fallback(_))
    }
}

/// Hands out increasing tickets so that only the most recently started
/// request is applied.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestTracker {
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

pub struct SentimentClassifier {
    provider: Option<Arc<dyn SentimentProvider>>,
    language: String,
    max_text_chars: usize,
    tracker: RequestTracker,
}

impl SentimentClassifier {
    /// Uses Azure when both endpoint and key are configured, otherwise
    /// scores locally.
    pub fn from_config(config: &SentimentConfig) -> Self {
        let provider = config.credentials().map(|(endpoint, key)| {
            Arc::new(AzureLanguageProvider::new(endpoint, key, config.timeout_secs))
                as Arc<dyn SentimentProvider>
        });
        Self {
            provider,
            language: config.language.clone(),
            max_text_chars: config.max_text_chars,
            tracker: RequestTracker::default(),
        }
    }

    pub fn offline() -> Self {
        Self::from_config(&SentimentConfig::default())
    }

    pub fn with_provider(provider: Arc<dyn SentimentProvider>, config: &SentimentConfig) -> Self {
        Self {
            provider: Some(provider),
            language: config.language.clone(),
            max_text_chars: config.max_text_chars,
            tracker: RequestTracker::default(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.provider.is_some()
    }

    /// Never fails: provider problems are reported through
    /// [`ClassificationSource::Fallback`].
    pub async fn analyze(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification {
                result: SentimentResult::empty_text(),
                source: ClassificationSource::EmptyInput,
            };
        }

        let outcome = match &self.provider {
            Some(provider) => {
                let truncated = truncate_chars(text, self.max_text_chars);
                provider.analyze(truncated, &self.language).await
            }
            None => Err(ProviderError::MissingCredentials),
        };

        match outcome {
            Ok(result) => {
                debug!(sentiment = %result.sentiment, "remote classification");
                Classification {
                    result,
                    source: ClassificationSource::Remote,
                }
            }
            Err(err) => {
                let reason = FallbackReason::from(err);
                warn!(%reason, "sentiment provider unavailable, using keyword fallback");
                Classification {
                    result: score_keywords(text),
                    source: ClassificationSource::Fallback(reason),
                }
            }
        }
    }

    pub async fn classify(&self, text: &str) -> SentimentResult {
        self.analyze(text).await.result
    }

    /// Like [`analyze`](Self::analyze), but yields `None` when another
    /// classification started on this classifier before this one finished.
    /// Meant for live classification of a draft as it is typed.
    pub async fn classify_latest(&self, text: &str) -> Option<Classification> {
        let ticket = self.tracker.begin();
        let classification = self.analyze(text).await;
        if self.tracker.is_current(ticket) {
            Some(classification)
        } else {
            debug!("discarding superseded classification");
            None
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{ConfidenceScores, Sentiment};
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(endpoint: Option<String>, key: Option<&str>) -> SentimentConfig {
        SentimentConfig {
            endpoint,
            api_key: key.map(str::to_string),
            timeout_secs: 2,
            ..SentimentConfig::default()
        }
    }

    async fn received_bodies(server: &MockServer) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn remote_success_is_used() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text/analytics/v3.1/sentiment"))
            .and(header("Ocp-Apim-Subscription-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [{
                    "id": "1",
                    "sentiment": "mixed",
                    "confidenceScores": { "positive": 0.4, "neutral": 0.1, "negative": 0.5 },
                    "sentences": [{
                        "text": "Tired but happy.",
                        "sentiment": "mixed",
                        "confidenceScores": { "positive": 0.4, "neutral": 0.1, "negative": 0.5 },
                        "offset": 0,
                        "length": 16
                    }],
                    "warnings": []
                }],
                "errors": [],
                "modelVersion": "2022-11-01"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let classifier = SentimentClassifier::from_config(&config_for(Some(server.uri()), Some("test-key")));
        assert!(classifier.is_remote());
        let outcome = classifier.analyze("Tired but happy.").await;

        assert_eq!(outcome.source, ClassificationSource::Remote);
        assert_eq!(outcome.result.sentiment, Sentiment::Mixed);
        assert_eq!(outcome.result.sentences.as_ref().map(Vec::len), Some(1));

        let bodies = received_bodies(&server).await;
        assert_eq!(bodies[0]["documents"][0]["language"], "en");
        assert_eq!(bodies[0]["documents"][0]["id"], "1");
        assert_eq!(bodies[0]["documents"][0]["text"], "Tired but happy.");
    }

    #[tokio::test]
    async fn long_text_is_truncated_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [{
                    "sentiment": "neutral",
                    "confidenceScores": { "positive": 0.1, "neutral": 0.8, "negative": 0.1 }
                }]
            })))
            .mount(&server)
            .await;

        let classifier = SentimentClassifier::from_config(&config_for(Some(server.uri()), Some("k")));
        let text = "é".repeat(6000);
        classifier.analyze(&text).await;

        let bodies = received_bodies(&server).await;
        let sent = bodies[0]["documents"][0]["text"].as_str().unwrap();
        assert_eq!(sent.chars().count(), 5000);
    }

    #[tokio::test]
    async fn non_success_status_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let classifier = SentimentClassifier::from_config(&config_for(Some(server.uri()), Some("k")));
        let text = "so happy and grateful";
        let outcome = classifier.analyze(text).await;

        assert_eq!(outcome.source, ClassificationSource::Fallback(FallbackReason::Status(503)));
        assert_eq!(outcome.result, score_keywords(text));
    }

    #[tokio::test]
    async fn empty_documents_fall_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documents": [] })))
            .mount(&server)
            .await;

        let classifier = SentimentClassifier::from_config(&config_for(Some(server.uri()), Some("k")));
        let outcome = classifier.analyze("feeling lonely").await;

        assert_eq!(outcome.source, ClassificationSource::Fallback(FallbackReason::EmptyResponse));
        assert_eq!(outcome.result.sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn undecodable_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let classifier = SentimentClassifier::from_config(&config_for(Some(server.uri()), Some("k")));
        let outcome = classifier.analyze("a good day").await;

        assert!(matches!(
            outcome.source,
            ClassificationSource::Fallback(FallbackReason::Decode(_))
        ));
        assert_eq!(outcome.result.sentiment, Sentiment::Positive);
    }

    #[tokio::test]
    async fn unreachable_provider_falls_back() {
        let classifier = SentimentClassifier::from_config(&config_for(
            Some("http://127.0.0.1:1".to_string()),
            Some("k"),
        ));
        let outcome = classifier.analyze("I want to die").await;

        assert!(matches!(
            outcome.source,
            ClassificationSource::Fallback(FallbackReason::Transport(_))
        ));
        assert_eq!(outcome.result.confidence_scores, ConfidenceScores::new(0.0, 0.1, 0.9));
    }

    #[tokio::test]
    async fn slow_provider_times_out_to_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "documents": [{
                            "sentiment": "positive",
                            "confidenceScores": { "positive": 0.9, "neutral": 0.1, "negative": 0.0 }
                        }]
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = SentimentConfig {
            timeout_secs: 1,
            ..config_for(Some(server.uri()), Some("k"))
        };
        let classifier = SentimentClassifier::from_config(&config);
        let started = std::time::Instant::now();
        let outcome = classifier.analyze("I can't go on like this").await;

        assert!(started.elapsed() < Duration::from_millis(2500));
        assert!(matches!(
            outcome.source,
            ClassificationSource::Fallback(FallbackReason::Transport(_))
        ));
        assert_eq!(outcome.result.sentiment, Sentiment::Negative);
        assert_eq!(outcome.result.confidence_scores, ConfidenceScores::new(0.0, 0.1, 0.9));
    }

    #[tokio::test]
    async fn provider_scores_are_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [{
                    "sentiment": "positive",
                    "confidenceScores": { "positive": 1.4, "neutral": 0.3, "negative": -0.2 }
                }]
            })))
            .mount(&server)
            .await;

        let classifier = SentimentClassifier::from_config(&config_for(Some(server.uri()), Some("k")));
        let outcome = classifier.analyze("great day").await;

        assert_eq!(outcome.source, ClassificationSource::Remote);
        assert_eq!(outcome.result.confidence_scores, ConfidenceScores::new(1.0, 0.3, 0.0));
    }

    #[tokio::test]
    async fn missing_key_never_calls_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let classifier = SentimentClassifier::from_config(&config_for(Some(server.uri()), None));
        assert!(!classifier.is_remote());
        let outcome = classifier.analyze("exhausted").await;

        assert_eq!(
            outcome.source,
            ClassificationSource::Fallback(FallbackReason::MissingCredentials)
        );
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn blank_text_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let classifier = SentimentClassifier::from_config(&config_for(Some(server.uri()), Some("k")));
        for text in ["", "   \n\t"] {
            let outcome = classifier.analyze(text).await;
            assert_eq!(outcome.source, ClassificationSource::EmptyInput);
            assert_eq!(outcome.result, SentimentResult::empty_text());
        }
    }

    #[tokio::test]
    async fn offline_classification_is_idempotent() {
        let classifier = SentimentClassifier::offline();
        let text = "Proud of my progress, but so tired 😔";
        assert_eq!(classifier.classify(text).await, classifier.classify(text).await);
    }

    struct DelayedProvider;

    #[async_trait]
    impl SentimentProvider for DelayedProvider {
        async fn analyze(&self, text: &str, _language: &str) -> Result<SentimentResult, ProviderError> {
            if text.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(150)).await;
            }
            Ok(SentimentResult::new(
                Sentiment::Positive,
                ConfidenceScores::new(0.8, 0.1, 0.1),
            ))
        }
    }

    #[tokio::test]
    async fn superseded_request_is_discarded() {
        let classifier =
            SentimentClassifier::with_provider(Arc::new(DelayedProvider), &SentimentConfig::default());

        let (first, second) = tokio::join!(classifier.classify_latest("slow draft"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            classifier.classify_latest("final text").await
        });

        assert!(first.is_none());
        assert_eq!(second.map(|c| c.source), Some(ClassificationSource::Remote));
    }

    #[test]
    fn tracker_only_honours_latest_ticket() {
        let tracker = RequestTracker::default();
        let a = tracker.begin();
        assert!(tracker.is_current(a));
        let b = tracker.begin();
        assert!(!tracker.is_current(a));
        assert!(tracker.is_current(b));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
