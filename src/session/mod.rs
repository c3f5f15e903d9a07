// src/session/mod.rs
// Runs one question/answer cycle at a time: pick an item, offer options,
// grade the answer, reschedule the item and record the attempt.

use chrono::{DateTime, Utc};
use rand::RngCore;

use crate::catalog::{Catalog, Item};
use crate::error::{PersistenceError, QuizError, Result};
use crate::options::{build_options, OptionSet};
use crate::scheduler::{schedule, Clock, Grade, MemoryState};
use crate::selector::{due_items, pick_item};
use crate::storage::{AttemptRecord, AttemptSink, StateStore};

/// A question on screen, waiting for an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub item: Item,
    pub options: OptionSet,
    pub presented_at: DateTime<Utc>,
}

/// The result of answering the pending question.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub correct: bool,
    pub answer: Item,
    pub chosen_id: String,
    pub grade: Grade,
    pub state: MemoryState,
    pub elapsed_ms: u64,
    /// False when the attempt could not be written to the log. The state
    /// update is committed either way.
    pub logged: bool,
}

/// Contains everything a quiz needs between questions.
pub struct QuizSession<'a> {
    catalog: Catalog,
    store: Box<dyn StateStore + 'a>,
    attempt_log: Box<dyn AttemptSink + 'a>,
    clock: Box<dyn Clock + 'a>,
    rng: Box<dyn RngCore + 'a>,
    option_count: usize,
    pending: Option<Question>,
    answered: usize,
    answered_correctly: usize,
}

impl<'a> QuizSession<'a> {
    pub fn new(
        catalog: Catalog,
        store: Box<dyn StateStore + 'a>,
        attempt_log: Box<dyn AttemptSink + 'a>,
        clock: Box<dyn Clock + 'a>,
        rng: Box<dyn RngCore + 'a>,
        option_count: usize,
    ) -> Self {
        Self {
            catalog,
            store,
            attempt_log,
            clock,
            rng,
            option_count,
            pending: None,
            answered: 0,
            answered_correctly: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    /// (answered, answered correctly) since the session started.
    pub fn tally(&self) -> (usize, usize) {
        (self.answered, self.answered_correctly)
    }

    /// Number of catalog items due today.
    pub fn due_count(&self) -> Result<usize> {
        let states = self.store.all()?;
        Ok(due_items(self.catalog.items(), &states, self.clock.today()).len())
    }

    /// The question awaiting an answer. A new one is drawn only after the
    /// previous one was submitted, so repeated calls return the same item and
    /// options in the same order.
    pub fn current_question(&mut self) -> Result<&Question> {
        let question = match self.pending.take() {
            Some(question) => question,
            None => self.next_question()?,
        };
        Ok(self.pending.insert(question))
    }

    fn next_question(&mut self) -> Result<Question> {
        let today = self.clock.today();
        let item = pick_item(self.catalog.items(), self.store.as_ref(), today, &mut *self.rng)?.clone();
        let options = build_options(self.catalog.items(), &item, self.option_count, &mut *self.rng)?;
        log::debug!("New question for {} with {} options", item.id, options.len());
        Ok(Question { item, options, presented_at: self.clock.now() })
    }

    /// Grades `chosen_id` against the pending question and reschedules the item.
    ///
    /// If the new state cannot be saved (after one retry) the whole cycle
    /// fails and the question stays pending so the answer can be resubmitted.
    pub fn submit(&mut self, chosen_id: &str) -> Result<Outcome> {
        let question = self.pending.as_ref().ok_or(QuizError::NoPendingQuestion)?;
        if question.options.get(chosen_id).is_none() {
            return Err(QuizError::UnknownOption(chosen_id.to_string()));
        }
        let answer = question.item.clone();
        let presented_at = question.presented_at;

        let correct = chosen_id == answer.id;
        let grade = Grade::from_correct(correct);
        let now = self.clock.now();
        let today = self.clock.today();

        let current = self.store.get_or_default(&answer.id, today)?;
        let state = schedule(&current, grade, today);
        self.commit(&answer.id, &state)?;
        log::info!(
            "{} answered {} ({}), next due {}",
            answer.id,
            chosen_id,
            if correct { "correct" } else { "wrong" },
            state.due_at
        );

        let elapsed_ms = u64::try_from((now - presented_at).num_milliseconds()).unwrap_or(0);
        let record = AttemptRecord {
            timestamp: now,
            item_id: answer.id.clone(),
            chosen_id: chosen_id.to_string(),
            correct: u8::from(correct),
            elapsed_ms,
        };
        let logged = match self.attempt_log.append(&record) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not log attempt for {}: {}", answer.id, e);
                false
            }
        };

        self.pending = None;
        self.answered += 1;
        if correct {
            self.answered_correctly += 1;
        }

        Ok(Outcome {
            correct,
            answer,
            chosen_id: chosen_id.to_string(),
            grade,
            state,
            elapsed_ms,
            logged,
        })
    }

    fn commit(&mut self, item_id: &str, state: &MemoryState) -> std::result::Result<(), PersistenceError> {
        if let Err(first) = self.store.put(item_id, state) {
            log::warn!("Saving state for {} failed ({}), retrying once", item_id, first);
            self.store.put(item_id, state).map_err(|e| {
                log::error!("Saving state for {} failed again: {}", item_id, e);
                e
            })?;
        }
        Ok(())
    }
}
