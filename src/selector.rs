// src/selector.rs
// Decides which item the learner sees next.

use std::collections::HashMap;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Item;
use crate::error::{QuizError, Result};
use crate::scheduler::MemoryState;
use crate::storage::StateStore;

/// Catalog items that are due on `today`. Items without a stored state count
/// as due, since a fresh state is due the day it is created.
pub fn due_items<'a>(catalog: &'a [Item], states: &HashMap<String, MemoryState>, today: NaiveDate) -> Vec<&'a Item> {
    catalog
        .iter()
        .filter(|item| states.get(&item.id).map_or(true, |state| state.is_due(today)))
        .collect()
}

/// Picks the next item to quiz: uniformly among due items, or among the whole
/// catalog when nothing is due.
pub fn pick_item<'a, R: Rng + ?Sized>(
    catalog: &'a [Item],
    store: &dyn StateStore,
    today: NaiveDate,
    rng: &mut R,
) -> Result<&'a Item> {
    if catalog.is_empty() {
        return Err(QuizError::EmptyCatalog);
    }

    let states = store.all()?;
    let due = due_items(catalog, &states, today);
    log::debug!("{} of {} items due on {}", due.len(), catalog.len(), today);

    let picked = if due.is_empty() {
        catalog.choose(rng)
    } else {
        due.choose(rng).copied()
    };
    picked.ok_or(QuizError::EmptyCatalog)
}
