//! Application view router.
//!
//! `App` owns the library, the shared stats and the current [`View`]. Views
//! only change through the named transitions below; each one checks the
//! view it starts from and fails with an invalid-state error otherwise.
//!
//! ```text
//! Home --start_session--> Study --view_details--> WordDetail --back--> Study
//!   |                       |
//!   |                       +--advance (last card)--> MistakeReview --retry--> Study
//!   |                                                       |
//!   +--open_progress--> Progress --back/home--> Home <--home+
//! ```
//!
//! The study-time ticker lives inside the study view, so leaving the
//! session in any way stops it. Stats are written back on every tick and
//! after every answer. The library is written at session end and after
//! imports and regeneration. Write failures are logged and do not interrupt
//! the user.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::content::FallbackProvider;
use crate::core::{
    Advance, AdvanceDelays, Feedback, ReviewRouter, Session, SessionOutcome, Word, WordStore,
};
use crate::error::{FailOpen, MnemoError, Result};
use crate::import::{ImportPipeline, ImportProgress, ImportReport};
use crate::stats::{SharedStats, StatsTicker, UserStats};
use crate::storage::StateStore;

/// A running study session together with its ticker.
#[derive(Debug)]
pub struct StudyView {
    session: Session,
    // Held for its Drop: the ticker stops with the view.
    _ticker: StatsTicker,
}

impl StudyView {
    fn start<F>(queue: Vec<Word>, stats: &SharedStats, delays: AdvanceDelays, on_tick: F) -> Self
    where
        F: Fn(&UserStats) + Send + 'static,
    {
        Self {
            session: Session::new(queue, stats.clone(), delays),
            _ticker: StatsTicker::start_with(stats.clone(), on_tick),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// The screen the app is on, with the data that screen owns.
#[derive(Debug, Default)]
pub enum View {
    #[default]
    Home,
    Study(StudyView),
    /// Side view of the current card. The session stays mounted underneath.
    WordDetail { word: Word, study: StudyView },
    MistakeReview(ReviewRouter),
    Progress,
}

/// Payload-free name of a [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Study,
    WordDetail,
    MistakeReview,
    Progress,
}

impl View {
    pub fn page(&self) -> Page {
        match self {
            View::Home => Page::Home,
            View::Study(_) => Page::Study,
            View::WordDetail { .. } => Page::WordDetail,
            View::MistakeReview(_) => Page::MistakeReview,
            View::Progress => Page::Progress,
        }
    }
}

/// The trainer application.
pub struct App<S: StateStore> {
    store: Arc<S>,
    words: WordStore,
    stats: SharedStats,
    config: Config,
    view: View,
}

impl<S: StateStore> App<S> {
    /// Load persisted state from `store`.
    ///
    /// A missing library starts from the seed words and missing stats start
    /// at zero. Unreadable state is logged and treated as missing.
    pub fn load(store: S, config: Config) -> Self {
        let words = store
            .load_words()
            .fail_open_default("failed to load word library")
            .map(WordStore::new)
            .unwrap_or_else(WordStore::seeded);
        let stats = store
            .load_stats()
            .fail_open_default("failed to load stats")
            .unwrap_or_default();

        debug!(words = words.size(), "app loaded");
        Self {
            store: Arc::new(store),
            words,
            stats: SharedStats::new(stats),
            config,
            view: View::Home,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn page(&self) -> Page {
        self.view.page()
    }

    pub fn words(&self) -> &WordStore {
        &self.words
    }

    pub fn stats(&self) -> UserStats {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The mounted session, in the study view or under the detail view.
    pub fn session(&self) -> Option<&Session> {
        match &self.view {
            View::Study(study) | View::WordDetail { study, .. } => Some(study.session()),
            _ => None,
        }
    }

    /// The review in progress, if on the mistake review screen.
    pub fn review(&self) -> Option<&ReviewRouter> {
        match &self.view {
            View::MistakeReview(review) => Some(review),
            _ => None,
        }
    }

    fn invalid(&self, event: &str) -> MnemoError {
        MnemoError::invalid_state(format!("cannot {} from {:?}", event, self.page()))
    }

    fn persist_words(&self) {
        self.store
            .save_words(self.words.words())
            .fail_open_default("failed to save word library");
    }

    fn persist_stats(&self) {
        self.store
            .save_stats(&self.stats.snapshot())
            .fail_open_default("failed to save stats");
    }

    /// Tick callback that writes the new totals to the store.
    fn stats_writer(&self) -> impl Fn(&UserStats) + Send + 'static {
        let store = Arc::clone(&self.store);
        move |stats: &UserStats| {
            store
                .save_stats(stats)
                .fail_open_default("failed to save stats")
        }
    }

    fn enter_study(&mut self, queue: Vec<Word>) {
        let delays = AdvanceDelays::from(&self.config.session);
        let study = StudyView::start(queue, &self.stats, delays, self.stats_writer());
        if study.session().is_finished() {
            self.finish(study);
        } else {
            self.view = View::Study(study);
        }
    }

    /// Tear down a finished session and route to the review.
    fn finish(&mut self, mut study: StudyView) {
        let outcome = study.session.take_outcome().unwrap_or_default();
        drop(study);
        self.record(&outcome);
        info!(
            correct = outcome.correct.len(),
            incorrect = outcome.incorrect.len(),
            "session complete"
        );
        self.view = View::MistakeReview(ReviewRouter::new(outcome.incorrect));
    }

    fn record(&mut self, outcome: &SessionOutcome) {
        self.words
            .record_outcome(outcome, chrono::Utc::now().timestamp());
        self.persist_words();
        self.persist_stats();
    }

    /// Home → Study over a fresh sample of the library.
    ///
    /// An empty library yields an empty session, which goes straight to the
    /// review with nothing to retry.
    pub fn start_session(&mut self) -> Result<()> {
        if !matches!(self.view, View::Home) {
            return Err(self.invalid("start a session"));
        }
        let queue = self
            .words
            .sample(self.config.session.sample_size, &mut rand::rng());
        debug!(len = queue.len(), "starting session");
        self.enter_study(queue);
        Ok(())
    }

    /// Answer the current card.
    ///
    /// `Ok(None)` means the answer was ignored because the card was already
    /// answered.
    pub fn select(&mut self, option: &str) -> Result<Option<Feedback>> {
        let View::Study(study) = &mut self.view else {
            return Err(self.invalid("answer"));
        };
        let feedback = study.session.select(option);
        if feedback.is_some() {
            self.persist_stats();
        }
        Ok(feedback)
    }

    /// Answer by position in the current option list.
    pub fn select_index(&mut self, index: usize) -> Result<Option<Feedback>> {
        let option = match &self.view {
            View::Study(study) => study.session().options().get(index).cloned(),
            _ => return Err(self.invalid("answer")),
        };
        let option = option.ok_or_else(|| {
            MnemoError::invalid_state(format!("no option at position {}", index + 1))
        })?;
        self.select(&option)
    }

    /// Move past the answered card. After the last card the session is
    /// recorded and the app moves to the mistake review.
    pub fn advance(&mut self) -> Result<Advance> {
        let View::Study(study) = &mut self.view else {
            return Err(self.invalid("advance"));
        };
        let step = study.session.advance()?;
        if step == Advance::Finished {
            if let View::Study(study) = std::mem::take(&mut self.view) {
                self.finish(study);
            }
        }
        Ok(step)
    }

    /// Study → WordDetail for the unanswered current card.
    pub fn view_details(&mut self) -> Result<&Word> {
        let word = match &self.view {
            View::Study(study) => study.session().view_details().cloned(),
            _ => None,
        };
        let Some(word) = word else {
            return Err(self.invalid("view details"));
        };
        if let View::Study(study) = std::mem::take(&mut self.view) {
            self.view = View::WordDetail { word, study };
        }
        match &self.view {
            View::WordDetail { word, .. } => Ok(word),
            _ => Err(self.invalid("view details")),
        }
    }

    /// WordDetail → Study, or Progress → Home.
    pub fn back(&mut self) -> Result<()> {
        match std::mem::take(&mut self.view) {
            View::WordDetail { study, .. } => {
                self.view = View::Study(study);
                Ok(())
            }
            View::Progress => Ok(()),
            other => {
                self.view = other;
                Err(self.invalid("go back"))
            }
        }
    }

    /// MistakeReview → Study over the same missed words.
    pub fn retry(&mut self) -> Result<()> {
        let queue = match &self.view {
            View::MistakeReview(review) => review.clone().retry()?,
            _ => return Err(self.invalid("retry")),
        };
        debug!(len = queue.len(), "retrying mistakes");
        self.enter_study(queue);
        Ok(())
    }

    /// Return home from any view.
    ///
    /// Leaving a session before it finishes abandons it: nothing is recorded
    /// for its words, but the study time and correct answers so far stay.
    pub fn home(&mut self) -> Result<()> {
        match std::mem::take(&mut self.view) {
            View::Study(_) | View::WordDetail { .. } => {
                debug!("session abandoned");
                self.persist_stats();
            }
            View::MistakeReview(review) => review.home(),
            View::Home | View::Progress => {}
        }
        Ok(())
    }

    /// Home → Progress.
    pub fn open_progress(&mut self) -> Result<()> {
        if !matches!(self.view, View::Home) {
            return Err(self.invalid("open progress"));
        }
        self.view = View::Progress;
        Ok(())
    }

    /// Import new words from raw text and save the library.
    pub async fn import<F>(
        &mut self,
        text: &str,
        provider: &FallbackProvider,
        progress: F,
    ) -> Result<ImportReport>
    where
        F: FnMut(ImportProgress<'_>),
    {
        let pipeline = ImportPipeline::new(provider, self.config.import.batch_size);
        let report = pipeline.run(text, progress).await;
        if report.words.is_empty() {
            return Ok(report);
        }

        self.words.append(report.words.clone())?;
        self.persist_words();
        Ok(report)
    }

    /// Generate fresh content for a word and save the library.
    ///
    /// Only the fields the provider returned replace stored ones. A word
    /// open in the detail view or waiting in the running session is updated
    /// too.
    pub async fn regenerate(&mut self, id: &str, provider: &FallbackProvider) -> Result<&Word> {
        let (term, current) = self
            .words
            .get(id)
            .map(|w| (w.term.clone(), w.content()))
            .ok_or_else(|| MnemoError::word_not_found(id))?;

        let content = provider.generate_partial(&term).await.merge_onto(current);
        let updated = self.words.replace_content(id, content)?.clone();
        self.persist_words();
        info!(id, term = %term, "regenerated word content");

        match &mut self.view {
            View::WordDetail { word, study } => {
                if word.id == updated.id {
                    *word = updated.clone();
                }
                study.session.refresh_word(&updated);
            }
            View::Study(study) => study.session.refresh_word(&updated),
            _ => {}
        }

        self.words
            .get(id)
            .ok_or_else(|| MnemoError::word_not_found(id))
    }

    /// Regenerate the word open in the detail view.
    pub async fn regenerate_detail(&mut self, provider: &FallbackProvider) -> Result<&Word> {
        let id = match &self.view {
            View::WordDetail { word, .. } => word.id.clone(),
            _ => return Err(self.invalid("regenerate details")),
        };
        self.regenerate(&id, provider).await?;
        match &self.view {
            View::WordDetail { word, .. } => Ok(word),
            _ => Err(self.invalid("regenerate details")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentProvider, PartialContent};
    use crate::core::{ReviewState, SessionPhase, WordContent};
    use crate::storage::MemoryStateStore;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct Failing;

    #[async_trait]
    impl ContentProvider for Failing {
        async fn generate(&self, _term: &str) -> Result<WordContent> {
            Err(MnemoError::provider("offline"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct Fixed;

    #[async_trait]
    impl ContentProvider for Fixed {
        async fn generate(&self, term: &str) -> Result<WordContent> {
            Ok(WordContent {
                definition: format!("new meaning of {term}"),
                confusers: vec!["p".into(), "q".into(), "r".into()],
                hook_l1: "fresh hook".into(),
                hook_l2: "fresh depth".into(),
                comparison: Some("fresh comparison".into()),
            })
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    /// Replies with a new hook and nothing else.
    struct HookOnly;

    #[async_trait]
    impl ContentProvider for HookOnly {
        async fn generate(&self, _term: &str) -> Result<WordContent> {
            Err(MnemoError::provider("only partial replies"))
        }

        async fn generate_partial(&self, _term: &str) -> Result<PartialContent> {
            Ok(serde_json::from_str(r#"{"hookL1":"new hook"}"#)?)
        }

        fn name(&self) -> &'static str {
            "hook-only"
        }
    }

    fn two_words() -> Vec<Word> {
        let content = |d: &str| WordContent {
            definition: d.to_string(),
            confusers: vec!["x".into(), "y".into(), "z".into()],
            hook_l1: "h".into(),
            hook_l2: "h2".into(),
            comparison: None,
        };
        vec![
            Word::new("w1", "alpha", content("first")),
            Word::new("w2", "beta", content("second")),
        ]
    }

    fn app_with(words: Vec<Word>) -> (App<Arc<MemoryStateStore>>, Arc<MemoryStateStore>) {
        let store = Arc::new(MemoryStateStore::with_words(words));
        (App::load(Arc::clone(&store), Config::default()), store)
    }

    /// Answer the current card right if its id is in `right`, wrong otherwise.
    fn answer(app: &mut App<Arc<MemoryStateStore>>, right: &[&str]) -> Feedback {
        let word = app.session().unwrap().current_word().unwrap().clone();
        let option = if right.contains(&word.id.as_str()) {
            word.definition.clone()
        } else {
            word.confusers[0].clone()
        };
        app.select(&option).unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_load_falls_back_to_seed() {
        let store = MemoryStateStore::new();
        let app = App::load(store, Config::default());

        assert_eq!(app.words().size(), 3);
        assert_eq!(app.stats(), UserStats::default());
        assert_eq!(app.page(), Page::Home);
    }

    #[tokio::test]
    async fn test_session_routes_mistakes_to_review() {
        let (mut app, store) = app_with(two_words());
        app.start_session().unwrap();
        assert_eq!(app.page(), Page::Study);
        assert_eq!(app.session().unwrap().len(), 2);

        let first = answer(&mut app, &["w1"]);
        // Second answer on the same card is ignored
        assert!(app.select("anything").unwrap().is_none());
        assert_eq!(app.advance().unwrap(), Advance::Next(1));
        let second = answer(&mut app, &["w1"]);
        assert_ne!(first.correct, second.correct);
        assert_eq!(app.advance().unwrap(), Advance::Finished);

        assert_eq!(app.page(), Page::MistakeReview);
        let review = app.review().unwrap();
        assert_eq!(review.state(), ReviewState::Mistakes);
        assert_eq!(review.mistakes().len(), 1);
        assert_eq!(review.mistakes()[0].id, "w2");
        assert_eq!(app.stats().today_count, 1);

        let saved = store.load_words().unwrap().unwrap();
        let w2 = saved.iter().find(|w| w.id == "w2").unwrap();
        let w1 = saved.iter().find(|w| w.id == "w1").unwrap();
        assert_eq!(w2.error_count, 1);
        assert_eq!(w1.error_count, 0);
        assert!(w1.last_review > 0);
        assert_eq!(store.load_stats().unwrap().unwrap().today_count, 1);
    }

    #[tokio::test]
    async fn test_retry_replays_only_mistakes() {
        let (mut app, _store) = app_with(two_words());
        app.start_session().unwrap();
        answer(&mut app, &[]);
        app.advance().unwrap();
        answer(&mut app, &[]);
        app.advance().unwrap();

        app.retry().unwrap();
        assert_eq!(app.session().unwrap().len(), 2);

        answer(&mut app, &["w1", "w2"]);
        app.advance().unwrap();
        answer(&mut app, &["w1", "w2"]);
        app.advance().unwrap();

        let review = app.review().unwrap();
        assert_eq!(review.state(), ReviewState::NoMistakes);
        assert!(app.retry().is_err());
        assert_eq!(app.page(), Page::MistakeReview);

        app.home().unwrap();
        assert_eq!(app.page(), Page::Home);
    }

    #[tokio::test]
    async fn test_empty_library_goes_straight_to_review() {
        let (mut app, _store) = app_with(Vec::new());
        app.start_session().unwrap();

        assert_eq!(app.page(), Page::MistakeReview);
        assert_eq!(app.review().unwrap().state(), ReviewState::NoMistakes);
    }

    #[tokio::test]
    async fn test_detail_detour_keeps_session() {
        let (mut app, _store) = app_with(two_words());
        app.start_session().unwrap();
        let current = app.session().unwrap().current_word().unwrap().id.clone();

        let detail = app.view_details().unwrap();
        assert_eq!(detail.id, current);
        assert_eq!(app.page(), Page::WordDetail);
        assert!(app.select("x").is_err());

        app.back().unwrap();
        let session = app.session().unwrap();
        assert_eq!(session.phase(), SessionPhase::Presenting);
        assert_eq!(session.current_index(), 0);
        assert!(session.correct_words().is_empty());
        assert!(session.incorrect_words().is_empty());
    }

    #[tokio::test]
    async fn test_details_unavailable_after_answer() {
        let (mut app, _store) = app_with(two_words());
        app.start_session().unwrap();
        answer(&mut app, &[]);

        assert!(matches!(
            app.view_details(),
            Err(MnemoError::InvalidState { .. })
        ));
        assert_eq!(app.page(), Page::Study);
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let (mut app, _store) = app_with(two_words());

        assert!(app.advance().is_err());
        assert!(app.retry().is_err());
        assert!(app.back().is_err());
        assert!(app.select("x").is_err());
        assert_eq!(app.page(), Page::Home);

        app.open_progress().unwrap();
        assert!(app.start_session().is_err());
        app.back().unwrap();
        assert_eq!(app.page(), Page::Home);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_runs_only_while_studying() {
        let (mut app, _store) = app_with(two_words());
        app.start_session().unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(app.stats().today_duration, 2);

        // Still ticking during the detail detour
        app.view_details().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(app.stats().today_duration, 3);

        app.home().unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(app.stats().today_duration, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_study_time_is_saved_every_tick() {
        let (mut app, store) = app_with(two_words());
        app.start_session().unwrap();

        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(app.stats().today_duration, 5);
        assert_eq!(store.load_stats().unwrap().unwrap().today_duration, 5);

        app.home().unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(store.load_stats().unwrap().unwrap().today_duration, 5);
    }

    #[tokio::test]
    async fn test_abandon_keeps_words_untouched() {
        let (mut app, store) = app_with(two_words());
        app.start_session().unwrap();
        answer(&mut app, &[]);
        app.home().unwrap();

        assert_eq!(app.page(), Page::Home);
        assert!(store
            .load_words()
            .unwrap()
            .unwrap()
            .iter()
            .all(|w| w.error_count == 0));
    }

    #[tokio::test]
    async fn test_import_appends_and_persists() {
        let (mut app, store) = app_with(two_words());
        let provider = FallbackProvider::new(Box::new(Failing));

        let report = app
            .import("cat,dog\n\nfish", &provider, |_| {})
            .await
            .unwrap();

        assert_eq!(report.added(), 3);
        assert_eq!(app.words().size(), 5);
        let saved = store.load_words().unwrap().unwrap();
        assert_eq!(saved.len(), 5);
        assert_eq!(saved[2].term, "cat");
        assert_eq!(saved[2].definition, "未知定义");
    }

    #[tokio::test]
    async fn test_empty_import_writes_nothing() {
        let (mut app, store) = app_with(two_words());
        let provider = FallbackProvider::new(Box::new(Failing));

        let report = app.import("  ,\n", &provider, |_| {}).await.unwrap();
        assert_eq!(report.added(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_regenerate_replaces_content() {
        let (mut app, store) = app_with(two_words());
        let provider = FallbackProvider::new(Box::new(Fixed));

        let word = app.regenerate("w1", &provider).await.unwrap();
        assert_eq!(word.term, "alpha");
        assert_eq!(word.definition, "new meaning of alpha");
        assert_eq!(word.hook_l1, "fresh hook");

        let saved = store.load_words().unwrap().unwrap();
        assert_eq!(saved[0].comparison.as_deref(), Some("fresh comparison"));

        assert!(matches!(
            app.regenerate("missing", &provider).await,
            Err(MnemoError::WordNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_regenerate_keeps_fields_missing_from_reply() {
        let store = Arc::new(MemoryStateStore::new());
        let mut app = App::load(Arc::clone(&store), Config::default());
        let before = app.words().get("1").unwrap().clone();
        let provider = FallbackProvider::new(Box::new(HookOnly));

        let word = app.regenerate("1", &provider).await.unwrap();
        assert_eq!(word.hook_l1, "new hook");
        assert_eq!(word.definition, "意外发现珍宝的运气");
        assert_eq!(word.confusers, before.confusers);
        assert_eq!(word.hook_l2, before.hook_l2);
        assert_eq!(word.comparison, before.comparison);

        let saved = store.load_words().unwrap().unwrap();
        assert_eq!(saved[0].definition, "意外发现珍宝的运气");
        assert_eq!(saved[0].hook_l1, "new hook");
    }

    #[tokio::test]
    async fn test_regenerate_detail_refreshes_view_and_card() {
        let (mut app, store) = app_with(two_words());
        let provider = FallbackProvider::new(Box::new(Fixed));
        app.start_session().unwrap();
        let current = app.session().unwrap().current_word().unwrap().clone();
        let expected = format!("new meaning of {}", current.term);

        app.view_details().unwrap();
        let word = app.regenerate_detail(&provider).await.unwrap();
        assert_eq!(word.id, current.id);
        assert_eq!(word.hook_l1, "fresh hook");
        match app.view() {
            View::WordDetail { word, .. } => assert_eq!(word.definition, expected),
            other => panic!("expected detail view, got {:?}", other.page()),
        }

        app.back().unwrap();
        let session = app.session().unwrap();
        assert_eq!(session.current_word().unwrap().definition, expected);
        assert!(session.options().contains(&expected));
        assert!(store
            .load_words()
            .unwrap()
            .unwrap()
            .iter()
            .any(|w| w.definition == expected));

        assert!(matches!(
            app.regenerate_detail(&provider).await,
            Err(MnemoError::InvalidState { .. })
        ));
    }
}
