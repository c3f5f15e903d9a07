// src/scenes/quiz/mod.rs
// Terminal rendering of the quiz screen.

use std::io::{self, Write};

use crate::media::MediaRef;
use crate::session::{Outcome, Question};
use crate::storage::attempt_log::AccuracySummary;

pub mod input;
pub mod logic;

/// Draws a question with its picture reference and numbered options.
pub fn draw_question<W: Write>(out: &mut W, question: &Question, media: &MediaRef, due: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "[{} due] Which bird is this?", due)?;
    match media {
        MediaRef::Available { path, license, credit } => {
            writeln!(out, "  Image: {}", path.display())?;
            writeln!(out, "  {} - {}", license, credit)?;
        }
        MediaRef::Unavailable => writeln!(out, "  Image unavailable")?,
    }
    for (i, option) in question.options.items().iter().enumerate() {
        writeln!(out, "  {}) {}", i + 1, option.display_name)?;
    }
    write!(out, "Answer 1-{}, or q to quit: ", question.options.len())?;
    out.flush()
}

pub fn draw_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    if outcome.correct {
        writeln!(out, "Correct!")?;
    } else {
        writeln!(out, "Nope, it was {}", outcome.answer.display_name)?;
    }
    writeln!(out, "Next review on {}", outcome.state.due_at)
}

/// Session tally followed by the all-time accuracy from the attempt log.
pub fn draw_summary<W: Write>(out: &mut W, tally: (usize, usize), summary: &AccuracySummary) -> io::Result<()> {
    let (answered, correct) = tally;
    writeln!(out)?;
    writeln!(out, "This session: {}/{} correct", correct, answered)?;
    if let Some(accuracy) = summary.overall.accuracy() {
        writeln!(out, "Overall accuracy: {:.0}%", accuracy * 100.0)?;
    }
    Ok(())
}

/// Per-item accuracy table, worst items first.
pub fn draw_stats<W: Write>(out: &mut W, summary: &AccuracySummary) -> io::Result<()> {
    let Some(overall) = summary.overall.accuracy() else {
        return writeln!(out, "No attempts recorded yet.");
    };
    writeln!(out, "Overall accuracy: {:.0}% over {} attempts", overall * 100.0, summary.overall.attempts)?;

    let mut rows: Vec<_> = summary.per_item.iter().collect();
    rows.sort_by(|a, b| {
        let acc_a = a.1.accuracy().unwrap_or(0.0);
        let acc_b = b.1.accuracy().unwrap_or(0.0);
        acc_a.total_cmp(&acc_b).then_with(|| a.0.cmp(b.0))
    });
    for (item_id, tally) in rows {
        writeln!(
            out,
            "  {:<10} {:>4.0}%  ({}/{})",
            item_id,
            tally.accuracy().unwrap_or(0.0) * 100.0,
            tally.correct,
            tally.attempts
        )?;
    }
    Ok(())
}
