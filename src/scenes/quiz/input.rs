// src/scenes/quiz/input.rs

/// What the learner typed at the answer prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInput {
    /// Zero-based index into the displayed options.
    Choose(usize),
    Quit,
    Invalid,
}

/// Maps a line of terminal input to an action. Options are numbered from 1.
pub fn parse_input(line: &str, option_count: usize) -> QuizInput {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return QuizInput::Quit;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=option_count).contains(&n) => QuizInput::Choose(n - 1),
        _ => QuizInput::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("1\n", 4), QuizInput::Choose(0));
        assert_eq!(parse_input("  4 ", 4), QuizInput::Choose(3));
        assert_eq!(parse_input("5", 4), QuizInput::Invalid);
        assert_eq!(parse_input("0", 4), QuizInput::Invalid);
        assert_eq!(parse_input("robin", 4), QuizInput::Invalid);
        assert_eq!(parse_input("", 4), QuizInput::Invalid);
        assert_eq!(parse_input("Q\n", 4), QuizInput::Quit);
        assert_eq!(parse_input("quit", 4), QuizInput::Quit);
    }
}
