use std::{
    collections::VecDeque,
    sync::{
        atomic::{
            AtomicU64,
            Ordering,
        },
        Arc,
    },
};

use chrono::NaiveDate;
use log::debug;

use crate::{
    ai::{
        ContentProvider,
        DegradedReason,
        ExampleOutcome,
    },
    core::{
        LanguageConfig,
        LexineError,
        PartOfSpeech,
        WordId,
    },
    scheduler::{
        build_queue,
        record_outcome,
        store::WordStore,
        RecallScore,
        SchedulerConfig,
    },
    tasks::TaskManager,
};

/// How a finished session ended. `NothingDue` means the queue was empty at
/// start, so the caller can say "nothing to review" instead of congratulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    NothingDue,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready { revealed: bool },
    Complete(Completion),
}

/// Everything the display collaborator needs to render the current card.
#[derive(Debug)]
pub struct CardView<'a> {
    pub term: &'a str,
    pub part_of_speech: PartOfSpeech,
    pub prompt: &'a str,
    pub answer: &'a str,
    pub note: &'a str,
    pub degraded: Option<DegradedReason>,
    pub position: usize,
    pub total: usize,
}

// Generation numbers are process-unique, so an in-flight reply for a dropped
// session can never match a newer session's request.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// One bounded pass through the review queue. Drives each card from content
/// loading through reveal to a recall score, then advances; at most one
/// generation request is ever outstanding.
pub struct PracticeSession {
    queue: VecDeque<WordId>,
    phase: SessionPhase,
    languages: LanguageConfig,
    provider: Arc<ContentProvider>,
    generation: u64,
    content: Option<ExampleOutcome>,
    total: usize,
    reviewed: usize,
}

impl PracticeSession {
    /// Start a session over everything due today. A `target` item is
    /// practiced first even when it is not due (jump-to-word).
    pub fn start(
        store: &WordStore,
        target: Option<WordId>,
        today: NaiveDate,
        languages: LanguageConfig,
        provider: Arc<ContentProvider>,
        tasks: &TaskManager,
    ) -> Self {
        let queue = build_queue(store.items(), target, today);
        let total = queue.len();

        let mut session = Self {
            queue,
            phase: SessionPhase::Complete(Completion::NothingDue),
            languages,
            provider,
            generation: 0,
            content: None,
            total,
            reviewed: 0,
        };
        if !session.queue.is_empty() {
            session.request_head(store, tasks);
        }
        session
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    /// Apply a finished generation result. Replies for anything but the
    /// current request are stale and dropped on arrival.
    pub fn content_ready(&mut self, generation: u64, outcome: ExampleOutcome) {
        if self.phase != SessionPhase::Loading || generation != self.generation {
            debug!("discarding stale content for generation {}", generation);
            return;
        }
        self.content = Some(outcome);
        self.phase = SessionPhase::Ready { revealed: false };
    }

    pub fn reveal(&mut self) {
        if let SessionPhase::Ready { revealed: false } = self.phase {
            self.phase = SessionPhase::Ready { revealed: true };
        }
    }

    /// Record a recall score for the revealed card and advance. The display
    /// surface only emits 0, 2 and 5; anything else is a defect at the call
    /// site and is rejected, leaving the session untouched.
    pub fn score_current(
        &mut self,
        raw_score: u8,
        store: &mut WordStore,
        config: &SchedulerConfig,
        today: NaiveDate,
        tasks: &TaskManager,
    ) -> Result<(), LexineError> {
        let score = RecallScore::try_from(raw_score)?;
        let id = self.revealed_head()?;

        if let Some(item) = store.get_mut(id) {
            record_outcome(item, score, today, config);
        }
        self.advance(store, tasks);
        Ok(())
    }

    /// Delete the revealed card from the store and advance. The deletion is
    /// permanent for the process lifetime.
    pub fn delete_current(
        &mut self,
        store: &mut WordStore,
        tasks: &TaskManager,
    ) -> Result<(), LexineError> {
        let id = self.revealed_head()?;

        store.delete(id);
        self.advance(store, tasks);
        Ok(())
    }

    /// Render data for the current card; `None` outside the `Ready` phases.
    pub fn current_card<'a>(&'a self, store: &'a WordStore) -> Option<CardView<'a>> {
        if !matches!(self.phase, SessionPhase::Ready { .. }) {
            return None;
        }
        let item = store.get(*self.queue.front()?)?;
        let outcome = self.content.as_ref()?;
        let content = outcome.content();

        Some(CardView {
            term: &item.term,
            part_of_speech: item.part_of_speech,
            // A sentence the learner has already seen beats generated text
            // for the prompt; the generated translation is the authoritative
            // answer for this review.
            prompt: item.context.as_deref().unwrap_or(&content.original),
            answer: &content.translation,
            note: &content.context,
            degraded: outcome.degraded_reason(),
            position: self.reviewed + 1,
            total: self.total,
        })
    }

    fn revealed_head(&self) -> Result<WordId, LexineError> {
        match self.phase {
            SessionPhase::Ready { revealed: true } => self
                .queue
                .front()
                .copied()
                .ok_or_else(|| LexineError::Custom("review queue is empty".to_string())),
            _ => Err(LexineError::Custom("no revealed card to act on".to_string())),
        }
    }

    fn advance(&mut self, store: &WordStore, tasks: &TaskManager) {
        self.queue.pop_front();
        self.reviewed += 1;
        self.content = None;
        self.request_head(store, tasks);
    }

    fn request_head(&mut self, store: &WordStore, tasks: &TaskManager) {
        // Ids the store no longer knows (deleted after the queue was built)
        // are skipped rather than displayed.
        while let Some(id) = self.queue.front().copied() {
            if let Some(item) = store.get(id) {
                self.generation = next_generation();
                self.phase = SessionPhase::Loading;
                tasks.generate_example(
                    self.provider.clone(),
                    self.languages.clone(),
                    item.id,
                    item.term.clone(),
                    self.generation,
                );
                return;
            }
            self.queue.pop_front();
        }
        self.phase = SessionPhase::Complete(Completion::Finished);
    }
}
