use crate::check_in::{CheckIn, CheckInDraft};
use crate::classifier::{Classification, ClassificationSource, SentimentClassifier};
use crate::comparator::{compare, MatchVerdict};
use crate::config::Config;
use crate::history::{History, TrendField, TrendPoint};
use crate::safety::{AlertState, CrisisResource, SafetyMonitor};
use crate::sentiment::SentimentResult;
use color_eyre::eyre::{Result, WrapErr};
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything the front end needs after a submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub check_in: CheckIn,
    pub sentiment: SentimentResult,
    pub verdict: MatchVerdict,
    pub source: ClassificationSource,
    pub alert: AlertState,
}

/// The session: owns the history and runs each submission through
/// classify, compare, append and monitor.
pub struct Journal {
    history: History,
    path: Option<PathBuf>,
    classifier: SentimentClassifier,
    monitor: SafetyMonitor,
    alert: AlertState,
    trend_window: usize,
    crisis_resources: Vec<CrisisResource>,
}

impl Journal {
    pub fn new(classifier: SentimentClassifier, monitor: SafetyMonitor) -> Self {
        Journal {
            history: History::new(),
            path: None,
            classifier,
            monitor,
            alert: AlertState::Quiet,
            trend_window: 7,
            crisis_resources: Vec::new(),
        }
    }

    /// Opens the journal file named in `config`, starting empty when it does
    /// not exist yet.
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.journal.path.clone();
        let history = if path.exists() {
            History::load_from_file(&path)
                .wrap_err_with(|| format!("Failed to load journal {}", path.display()))?
        } else {
            info!(path = %path.display(), "no journal file found, starting a new one");
            History::new()
        };

        let mut journal = Journal::new(
            SentimentClassifier::from_config(&config.sentiment),
            SafetyMonitor::new(config.safety.consecutive_negatives),
        )
        .with_history(history);
        journal.path = Some(path);
        journal.trend_window = config.journal.trend_window;
        journal.crisis_resources = config.safety.crisis_resources.clone();
        Ok(journal)
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self.alert = self.monitor.evaluate(self.history.entries());
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn alert(&self) -> AlertState {
        self.alert
    }

    pub fn crisis_resources(&self) -> &[CrisisResource] {
        &self.crisis_resources
    }

    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    pub fn series(&self) -> Vec<TrendPoint> {
        self.history.series(self.trend_window)
    }

    pub fn average(&self, field: TrendField) -> Option<f64> {
        self.history.average(field, self.trend_window)
    }

    pub fn is_remote(&self) -> bool {
        self.classifier.is_remote()
    }

    /// For front ends that classify a draft live while it is being typed.
    /// Yields `None` when a newer preview has started in the meantime, so
    /// only the latest draft's result is shown. Does not record anything;
    /// [`submit`](Self::submit) classifies again.
    pub async fn preview(&self, text: &str) -> Option<Classification> {
        self.classifier.classify_latest(text).await
    }

    pub async fn submit(&mut self, draft: CheckInDraft) -> Result<SubmitOutcome> {
        let classification = self.classifier.analyze(&draft.journal_text).await;
        let verdict = compare(draft.mood, &classification.result);
        if !verdict.matches {
            info!(mood = %draft.mood, sentiment = %classification.result.sentiment, "mood and text diverge");
        }

        let check_in =
            CheckIn::new(draft).with_analysis(classification.result.clone(), verdict.clone());
        let mut next = self.history.clone();
        next.append(check_in.clone());
        self.persist(&next)?;
        self.history = next;
        self.refresh_alert();

        Ok(SubmitOutcome {
            check_in,
            sentiment: classification.result,
            verdict,
            source: classification.source,
            alert: self.alert,
        })
    }

    /// Folds in check-ins from another device and re-evaluates the alert.
    pub fn merge<I>(&mut self, incoming: I) -> Result<usize>
    where
        I: IntoIterator<Item = CheckIn>,
    {
        let mut next = self.history.clone();
        let added = next.merge(incoming);
        if added > 0 {
            self.persist(&next)?;
            self.history = next;
            self.refresh_alert();
        }
        Ok(added)
    }

    fn refresh_alert(&mut self) {
        let next = self.monitor.evaluate(self.history.entries());
        match (self.alert, next) {
            (AlertState::Quiet, AlertState::Alerting) => warn!(
                window = self.monitor.window(),
                "consecutive negative check-ins, surfacing crisis resources"
            ),
            (AlertState::Alerting, AlertState::Quiet) => info!("safety alert cleared"),
            _ => {}
        }
        self.alert = next;
    }

    /// Writes `history` out; the in-memory history is only replaced once
    /// this succeeds.
    fn persist(&self, history: &History) -> Result<()> {
        match &self.path {
            Some(path) => history
                .save_to_file(path)
                .wrap_err_with(|| format!("Failed to save journal {}", path.display())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check_in::Mood;
    use crate::classifier::FallbackReason;
    use crate::comparator::CONCEALED_DISTRESS_MESSAGE;
    use crate::sentiment::Sentiment;

    fn offline_journal() -> Journal {
        Journal::new(SentimentClassifier::offline(), SafetyMonitor::default())
    }

    #[tokio::test]
    async fn concealed_distress_scenario() {
        let mut journal = offline_journal();
        journal.submit(CheckInDraft::new(Mood::Rough, "so tired today")).await.unwrap();
        journal.submit(CheckInDraft::new(Mood::Okay, "feeling lonely")).await.unwrap();
        assert_eq!(journal.alert(), AlertState::Quiet);

        let outcome = journal
            .submit(
                CheckInDraft::new(Mood::Good, "I feel so exhausted and alone, I can't cope")
                    .with_factors(["Sleep", "Family"]),
            )
            .await
            .unwrap();

        assert_eq!(outcome.sentiment.sentiment, Sentiment::Negative);
        assert!(!outcome.verdict.matches);
        assert_eq!(outcome.verdict.message, CONCEALED_DISTRESS_MESSAGE);
        assert_eq!(
            outcome.source,
            ClassificationSource::Fallback(FallbackReason::MissingCredentials)
        );
        assert_eq!(outcome.alert, AlertState::Alerting);
        assert_eq!(journal.history().len(), 3);
        assert_eq!(outcome.check_in.factors, vec!["Sleep", "Family"]);
        assert_eq!(outcome.check_in.mood_match.as_ref(), Some(&outcome.verdict));
    }

    #[tokio::test]
    async fn empty_text_with_rough_mood_matches() {
        let mut journal = offline_journal();
        let outcome = journal.submit(CheckInDraft::new(Mood::Rough, "")).await.unwrap();

        assert_eq!(outcome.source, ClassificationSource::EmptyInput);
        assert_eq!(outcome.sentiment.sentiment, Sentiment::Neutral);
        assert!(outcome.verdict.matches);
    }

    #[tokio::test]
    async fn non_negative_entry_clears_alert() {
        let mut journal = offline_journal();
        for text in ["sad", "anxious", "crying"] {
            journal.submit(CheckInDraft::new(Mood::Rough, text)).await.unwrap();
        }
        assert!(journal.alert().is_alerting());

        let outcome = journal
            .submit(CheckInDraft::new(Mood::Good, "a wonderful walk"))
            .await
            .unwrap();
        assert_eq!(outcome.alert, AlertState::Quiet);
    }

    #[tokio::test]
    async fn series_reflects_submissions() {
        let mut journal = offline_journal();
        journal.submit(CheckInDraft::new(Mood::Good, "so happy")).await.unwrap();
        journal.submit(CheckInDraft::new(Mood::Rough, "")).await.unwrap();

        let series = journal.series();
        assert_eq!(series.len(), 2);
        assert_eq!((series[0].mood_score, series[0].text_score), (8, Some(10)));
        assert_eq!((series[1].mood_score, series[1].text_score), (2, Some(5)));
        assert_eq!(journal.average(TrendField::MoodScore), Some(5.0));
    }

    #[tokio::test]
    async fn persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.journal.path = dir.path().join("journal.json");

        let mut journal = Journal::open(&config).unwrap();
        assert!(journal.history().is_empty());
        for text in ["sad", "depressed", "overwhelmed"] {
            journal.submit(CheckInDraft::new(Mood::Okay, text)).await.unwrap();
        }

        let reopened = Journal::open(&config).unwrap();
        assert_eq!(reopened.history(), journal.history());
        assert_eq!(reopened.alert(), AlertState::Alerting);
        assert_eq!(reopened.crisis_resources().len(), 2);
    }

    #[tokio::test]
    async fn failed_save_leaves_history_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.journal.path = dir.path().join("missing_dir").join("journal.json");

        let mut journal = Journal::open(&config).unwrap();
        for _ in 0..2 {
            let result = journal.submit(CheckInDraft::new(Mood::Rough, "sad")).await;
            assert!(result.is_err());
            assert!(journal.history().is_empty());
        }

        let incoming = CheckIn::new(CheckInDraft::new(Mood::Okay, "from the other device"));
        assert!(journal.merge(vec![incoming]).is_err());
        assert!(journal.history().is_empty());

        std::fs::create_dir(dir.path().join("missing_dir")).unwrap();
        journal.submit(CheckInDraft::new(Mood::Rough, "sad")).await.unwrap();
        assert_eq!(journal.history().len(), 1);
    }

    #[tokio::test]
    async fn merge_recomputes_alert() {
        let mut other = offline_journal();
        for text in ["sad", "lonely", "scared"] {
            other.submit(CheckInDraft::new(Mood::Rough, text)).await.unwrap();
        }

        let mut journal = offline_journal();
        let added = journal.merge(other.history().entries().to_vec()).unwrap();
        assert_eq!(added, 3);
        assert!(journal.alert().is_alerting());
        assert_eq!(journal.merge(other.history().entries().to_vec()).unwrap(), 0);
    }

    #[tokio::test]
    async fn preview_returns_latest() {
        let journal = offline_journal();
        let preview = journal.preview("so proud").await.unwrap();
        assert_eq!(preview.result.sentiment, Sentiment::Positive);
    }
}
