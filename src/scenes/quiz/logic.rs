// src/scenes/quiz/logic.rs

use std::io::{BufRead, Write};

use super::input::{parse_input, QuizInput};
use super::{draw_outcome, draw_question};
use crate::debug::Tracer;
use crate::error::QuizError;
use crate::media::MediaResolver;
use crate::session::QuizSession;

/// Runs questions until the learner quits or input ends.
pub fn run_quiz<R: BufRead, W: Write>(
    session: &mut QuizSession,
    resolver: &mut dyn MediaResolver,
    input: &mut R,
    out: &mut W,
) -> Result<(), String> {
    loop {
        let question = {
            #[cfg(debug_assertions)]
            let _tracer = Tracer::new("Load Question");
            session.current_question().map_err(|e| e.to_string())?.clone()
        };
        let media = resolver.resolve(&question.item);
        let due = session.due_count().map_err(|e| e.to_string())?;
        draw_question(out, &question, &media, due).map_err(|e| e.to_string())?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(|e| e.to_string())? == 0 {
            writeln!(out).map_err(|e| e.to_string())?;
            return Ok(());
        }

        match parse_input(&line, question.options.len()) {
            QuizInput::Quit => return Ok(()),
            QuizInput::Invalid => {
                writeln!(out, "Please enter a number between 1 and {}.", question.options.len())
                    .map_err(|e| e.to_string())?;
            }
            QuizInput::Choose(index) => {
                let chosen = &question.options.items()[index];
                match session.submit(&chosen.id) {
                    Ok(outcome) => draw_outcome(out, &outcome).map_err(|e| e.to_string())?,
                    Err(QuizError::Persistence(e)) => {
                        // The question stays pending; the learner can answer again.
                        writeln!(out, "Could not save your answer ({}). Please try again.", e)
                            .map_err(|e| e.to_string())?;
                    }
                    Err(e) => return Err(e.to_string()),
                }
            }
        }
    }
}
