// src/options.rs
// Builds the multiple-choice answers shown with each question.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Item;
use crate::error::{QuizError, Result};

/// Number of answers offered per question unless configured otherwise.
pub const DEFAULT_OPTION_COUNT: usize = 4;

/// The answers for one question in display order. Exactly one of them is the
/// target and no id appears twice.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet {
    items: Vec<Item>,
    target_id: String,
}

impl OptionSet {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Position of the correct answer in display order.
    pub fn correct_index(&self) -> usize {
        self.items
            .iter()
            .position(|item| item.id == self.target_id)
            .unwrap_or_default()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds `n` answer options around `target`.
///
/// Distractors come from the target's group first and are topped up from
/// other groups, always sampled without replacement. Fails rather than
/// returning a short set when the catalog holds fewer than `n` distinct items.
/// An `n` of zero is treated as one: the target is always offered.
pub fn build_options<R: Rng + ?Sized>(catalog: &[Item], target: &Item, n: usize, rng: &mut R) -> Result<OptionSet> {
    if catalog.is_empty() {
        return Err(QuizError::EmptyCatalog);
    }
    let n = n.max(1);

    let mut seen = HashSet::from([target.id.as_str()]);
    let pool: Vec<&Item> = catalog.iter().filter(|item| seen.insert(item.id.as_str())).collect();

    let available = pool.len() + 1;
    if available < n {
        return Err(QuizError::NotEnoughItems { needed: n, available });
    }

    let (same_group, other_groups): (Vec<&Item>, Vec<&Item>) =
        pool.into_iter().partition(|item| item.group_id == target.group_id);

    let wanted = n - 1;
    let mut items: Vec<Item> = Vec::with_capacity(n);
    items.push(target.clone());
    items.extend(same_group.choose_multiple(rng, wanted).map(|item| (*item).clone()));

    let shortfall = n - items.len();
    if shortfall > 0 {
        log::debug!(
            "Group {} is short by {}, topping up from other groups",
            target.group_id,
            shortfall
        );
        items.extend(other_groups.choose_multiple(rng, shortfall).map(|item| (*item).clone()));
    }

    items.shuffle(rng);
    Ok(OptionSet { items, target_id: target.id.clone() })
}
