// src/scheduler.rs
// Contains the logic for the spaced repetition system.

use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Lowest easiness factor an item can reach.
pub const MIN_EASINESS: f64 = 1.3;
/// Easiness factor given to items that have never been reviewed.
pub const DEFAULT_EASINESS: f64 = 2.5;

/// The response quality for one review, 0 (blackout) to 5 (perfect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade(u8);

impl Grade {
    /// Grade recorded for a correct multiple-choice answer.
    pub const CORRECT: Grade = Grade(5);
    /// Grade recorded for a wrong multiple-choice answer.
    pub const INCORRECT: Grade = Grade(2);

    pub fn new(value: u8) -> Result<Self, QuizError> {
        if value > 5 {
            return Err(QuizError::InvalidGrade(value));
        }
        Ok(Grade(value))
    }

    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Grade::CORRECT
        } else {
            Grade::INCORRECT
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self.0 >= 3
    }
}

/// The spaced-repetition state of a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub repetitions: u32,
    pub interval_days: u32,
    pub easiness: f64,
    pub due_at: NaiveDate,
}

impl MemoryState {
    /// State of an item that has never been scheduled; it is due immediately.
    pub fn new(today: NaiveDate) -> Self {
        MemoryState {
            repetitions: 0,
            interval_days: 0,
            easiness: DEFAULT_EASINESS,
            due_at: today,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.due_at <= today
    }
}

/// Source of the current time, injected so scheduling stays deterministic.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The wall clock. Due dates follow the user's local calendar day.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Computes the next state of an item after a graded review (SM-2).
///
/// The interval grows with the easiness held *before* this review. Products
/// are rounded half away from zero, so `5 * 2.5` becomes 13.
pub fn schedule(state: &MemoryState, grade: Grade, today: NaiveDate) -> MemoryState {
    let (repetitions, interval_days) = if grade.is_pass() {
        let interval = match state.repetitions {
            0 => 1,
            1 => 6,
            _ => grown_interval(state.interval_days, state.easiness),
        };
        (state.repetitions.saturating_add(1), interval)
    } else {
        (0, 1)
    };

    let lapse = f64::from(5 - grade.value());
    let easiness = (state.easiness + 0.1 - lapse * (0.08 + lapse * 0.02)).max(MIN_EASINESS);
    let interval_days = interval_days.max(1);

    MemoryState {
        repetitions,
        interval_days,
        easiness,
        due_at: today
            .checked_add_days(Days::new(u64::from(interval_days)))
            .unwrap_or(NaiveDate::MAX),
    }
}

fn grown_interval(interval_days: u32, easiness: f64) -> u32 {
    let grown = (f64::from(interval_days) * easiness).round();
    if grown >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        grown as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn state(repetitions: u32, interval_days: u32, easiness: f64) -> MemoryState {
        MemoryState { repetitions, interval_days, easiness, due_at: today() }
    }

    #[test]
    fn test_grade_validation() {
        assert!(Grade::new(0).is_ok());
        assert!(Grade::new(5).is_ok());
        assert!(matches!(Grade::new(6), Err(QuizError::InvalidGrade(6))));
        assert!(Grade::new(3).unwrap().is_pass());
        assert!(!Grade::new(2).unwrap().is_pass());
        assert_eq!(Grade::from_correct(true), Grade::CORRECT);
        assert_eq!(Grade::from_correct(false), Grade::INCORRECT);
    }

    #[test]
    fn test_first_correct_review() {
        let next = schedule(&state(0, 0, 2.5), Grade::CORRECT, today());
        assert_eq!(next.repetitions, 1);
        assert_eq!(next.interval_days, 1);
        assert!(next.easiness > 2.5);
        assert!((next.easiness - 2.6).abs() < 1e-9);
        assert_eq!(next.due_at, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn test_second_correct_review() {
        let next = schedule(&state(1, 1, 2.5), Grade::CORRECT, today());
        assert_eq!(next.repetitions, 2);
        assert_eq!(next.interval_days, 6);
    }

    #[test]
    fn test_growth_uses_previous_easiness() {
        let next = schedule(&state(1, 6, 2.5), Grade::CORRECT, today());
        assert_eq!(next.repetitions, 2);
        assert_eq!(next.interval_days, 6);

        let next = schedule(&state(2, 6, 2.5), Grade::CORRECT, today());
        assert_eq!(next.repetitions, 3);
        assert_eq!(next.interval_days, 15);
        assert_eq!(next.due_at, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let next = schedule(&state(4, 5, 2.5), Grade::CORRECT, today());
        assert_eq!(next.interval_days, 13);
    }

    #[test]
    fn test_failure_resets() {
        let next = schedule(&state(2, 6, 2.5), Grade::INCORRECT, today());
        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval_days, 1);
        assert!(next.easiness >= MIN_EASINESS);
        assert!((next.easiness - 2.18).abs() < 1e-9);
    }

    #[test]
    fn test_easiness_floor() {
        let next = schedule(&state(1, 1, 1.3), Grade::new(0).unwrap(), today());
        assert_eq!(next.easiness, MIN_EASINESS);
        let next = schedule(&state(3, 10, 1.3), Grade::new(3).unwrap(), today());
        assert_eq!(next.easiness, MIN_EASINESS);
        assert_eq!(next.interval_days, 13);
    }

    #[test]
    fn test_invariants_hold_for_all_grades() {
        for g in 0..=5 {
            let grade = Grade::new(g).unwrap();
            for start in [state(0, 0, 2.5), state(1, 1, 1.3), state(7, 40, 1.9), state(2, 0, 1.3)] {
                let next = schedule(&start, grade, today());
                assert!(next.easiness >= MIN_EASINESS, "grade {} from {:?}", g, start);
                assert!(next.interval_days >= 1, "grade {} from {:?}", g, start);
                assert!(next.due_at > today());
            }
        }
    }

    #[test]
    fn test_huge_interval_saturates() {
        let next = schedule(&state(9, u32::MAX / 2, 2.5), Grade::CORRECT, today());
        assert_eq!(next.interval_days, u32::MAX);
    }

    #[test]
    fn test_fixed_clock_today() {
        let clock = FixedClock(today().and_hms_opt(12, 0, 0).unwrap().and_utc());
        assert_eq!(clock.today(), today());
    }
}
