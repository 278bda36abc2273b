use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions: Playing -> Won, Playing -> Lost.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    Playing,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Playing
    }
}

/// Outcome of one accepted submission.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Won,
    Ongoing,
    Lost,
}

impl SubmitOutcome {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Result of scoring one guess against the answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub win: bool,
    pub verdict: [TileColor; TILES_PER_GUESS],
    /// The submission's own numeric value; the answer's value on a win.
    pub value: Option<f64>,
}

/// One scored row of the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredGuess {
    pub expression: Expression,
    pub verdict: [TileColor; TILES_PER_GUESS],
    pub value: Option<f64>,
}

/// Checks a guess row for well-formedness, reporting the first failure in
/// fixed precedence order. Pure; checking the same row twice gives the
/// same outcome.
pub fn check_validity(guess: &GuessRow) -> Result<()> {
    let Some(joined) = join_guess(guess) else {
        return Err(GameError::EmptyCharacters);
    };

    if !joined.chars().any(is_operator) {
        return Err(GameError::NoOperators);
    }

    let bytes = joined.as_bytes();
    if !bytes[0].is_ascii_digit() || !bytes[TILES_PER_GUESS - 1].is_ascii_digit() {
        return Err(GameError::StartEndNotNumeric);
    }

    if bytes
        .windows(2)
        .any(|pair| is_operator(pair[0] as char) && is_operator(pair[1] as char))
    {
        return Err(GameError::BackToBackOperators);
    }

    if eval_expression(&joined).is_none() {
        return Err(GameError::InvalidFunction);
    }

    Ok(())
}

/// Scores a fully filled guess against the answer.
///
/// A guess wins on an exact character match, or as a cumulative solution:
/// the same character bag rearranged to the same total. Otherwise each
/// tile is scored independently against the whole answer string; matched
/// answer characters are not consumed, so repeated guess characters can
/// all score off a single occurrence.
pub fn evaluate_submission(answer: &Answer, guess: &GuessRow) -> SubmissionStatus {
    const WIN_VERDICT: [TileColor; TILES_PER_GUESS] = [TileColor::Match; TILES_PER_GUESS];

    let Some(submission) = join_guess(guess) else {
        return SubmissionStatus {
            win: false,
            verdict: [TileColor::Unset; TILES_PER_GUESS],
            value: None,
        };
    };

    let answer_str = answer.expression().as_str();
    let answer_value = answer.value() as f64;

    if submission == answer_str {
        return SubmissionStatus {
            win: true,
            verdict: WIN_VERDICT,
            value: Some(answer_value),
        };
    }

    let submission_value = eval_expression(&submission);
    if submission_value == Some(answer_value) && sorted_chars(&submission) == sorted_chars(answer_str)
    {
        return SubmissionStatus {
            win: true,
            verdict: WIN_VERDICT,
            value: Some(answer_value),
        };
    }

    let mut verdict = [TileColor::Absent; TILES_PER_GUESS];
    for (idx, c) in submission.chars().enumerate() {
        verdict[idx] = if answer.expression().char_at(idx) == c {
            TileColor::Match
        } else if answer_str.contains(c) {
            TileColor::Present
        } else {
            TileColor::Absent
        };
    }

    SubmissionStatus {
        win: false,
        verdict,
        value: submission_value,
    }
}

/// Canonical character order for the cumulative-solution comparison.
fn sorted_chars(s: &str) -> [u8; TILES_PER_GUESS] {
    let mut chars = [0u8; TILES_PER_GUESS];
    chars.copy_from_slice(s.as_bytes());
    chars.sort_unstable();
    chars
}

/// State of a single round from first guess to win or loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    answer: Answer,
    rows: Vec<ScoredGuess>,
    state: EngineState,
}

impl PlayEngine {
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            rows: Vec::new(),
            state: Default::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    pub fn target_value(&self) -> i64 {
        self.answer.value()
    }

    pub fn rows(&self) -> &[ScoredGuess] {
        &self.rows
    }

    pub fn attempts_used(&self) -> usize {
        self.rows.len()
    }

    pub fn attempts_left(&self) -> usize {
        TOTAL_GUESSES - self.rows.len()
    }

    /// Verdicts for the whole board; rows not yet played come back `Unset`.
    pub fn verdict_grid(&self) -> [[TileColor; TILES_PER_GUESS]; TOTAL_GUESSES] {
        let mut grid = [[TileColor::Unset; TILES_PER_GUESS]; TOTAL_GUESSES];
        for (row, scored) in self.rows.iter().enumerate() {
            grid[row] = scored.verdict;
        }
        grid
    }

    /// Scores `guess` without mutating the round.
    pub fn evaluate(&self, guess: &GuessRow) -> SubmissionStatus {
        evaluate_submission(&self.answer, guess)
    }

    /// Accepts a guess: validity failures leave the round untouched, a
    /// scored guess consumes an attempt and may finish the round.
    pub fn submit(&mut self, guess: &GuessRow) -> Result<SubmitOutcome> {
        self.check_playing()?;
        check_validity(guess)?;

        let joined = join_guess(guess).ok_or(GameError::EmptyCharacters)?;
        let expression = Expression::parse(&joined)?;
        let status = self.evaluate(guess);
        log::debug!(
            "scored {}: win={} value={:?}",
            expression,
            status.win,
            status.value
        );

        self.rows.push(ScoredGuess {
            expression,
            verdict: status.verdict,
            value: status.value,
        });

        Ok(if status.win {
            self.state = EngineState::Won;
            SubmitOutcome::Won
        } else if self.rows.len() >= TOTAL_GUESSES {
            self.state = EngineState::Lost;
            SubmitOutcome::Lost
        } else {
            SubmitOutcome::Ongoing
        })
    }

    fn check_playing(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileColor::*;

    fn answer(src: &str) -> Answer {
        Answer::from_expression(Expression::parse(src).unwrap()).unwrap()
    }

    /// Builds a guess row from a 6-character pattern; `_` marks an empty
    /// tile.
    fn row(pattern: &str) -> GuessRow {
        let mut cells: GuessRow = [None; TILES_PER_GUESS];
        for (idx, c) in pattern.chars().enumerate() {
            cells[idx] = (c != '_').then_some(c);
        }
        cells
    }

    #[test]
    fn exact_match_wins_immediately() {
        let status = evaluate_submission(&answer("10+2+3"), &row("10+2+3"));
        assert!(status.win);
        assert_eq!(status.verdict, [Match; TILES_PER_GUESS]);
        assert_eq!(status.value, Some(15.0));
    }

    #[test]
    fn cumulative_rearrangements_win() {
        let target = answer("10+2+3");
        for guess in ["3+2+10", "3+10+2", "2+3+10", "2+10+3", "10+3+2"] {
            let status = evaluate_submission(&target, &row(guess));
            assert!(status.win, "{}", guess);
            assert_eq!(status.verdict, [Match; TILES_PER_GUESS], "{}", guess);
            assert_eq!(status.value, Some(15.0), "{}", guess);
        }
    }

    #[test]
    fn rearranged_subtraction_is_not_cumulative() {
        // same character bag, different total
        let status = evaluate_submission(&answer("10-2-3"), &row("3-2-10"));
        assert!(!status.win);
        assert_eq!(status.verdict, [Present; TILES_PER_GUESS]);
        assert_eq!(status.value, Some(-9.0));
    }

    #[test]
    fn same_value_alone_is_not_a_win() {
        // 12+3*4 == 24 == 4*3+12 shares the bag, but 24 == 20+4 does not
        let status = evaluate_submission(&answer("12+3*4"), &row("20+4*1"));
        assert!(!status.win);
    }

    #[test]
    fn disjoint_characters_score_all_absent() {
        let status = evaluate_submission(&answer("10+2+3"), &row("456-78"));
        assert!(!status.win);
        assert_eq!(status.verdict, [Absent; TILES_PER_GUESS]);
        assert_eq!(status.value, Some(378.0));
    }

    #[test]
    fn mixed_verdict_scores_each_tile_independently() {
        let status = evaluate_submission(&answer("10+2+3"), &row("12-3+4"));
        assert!(!status.win);
        assert_eq!(status.verdict, [Match, Present, Absent, Present, Match, Absent]);
        assert_eq!(status.value, Some(13.0));
    }

    #[test]
    fn reversed_answer_scores_position_by_position() {
        // reversal keeps the character bag but not the value
        let status = evaluate_submission(&answer("10+2+3"), &row("3+2+01"));
        assert!(!status.win);
        assert_eq!(status.verdict, [Present; TILES_PER_GUESS]);
        assert_eq!(status.value, Some(6.0));
    }

    #[test]
    fn repeated_guess_chars_reuse_single_answer_char() {
        // the lone '1' in the answer is never consumed
        let status = evaluate_submission(&answer("81-2*3"), &row("11+1+1"));
        assert!(!status.win);
        assert_eq!(status.verdict, [Present, Match, Absent, Present, Absent, Present]);
        assert_eq!(status.value, Some(13.0));
    }

    #[test]
    fn validity_errors_fire_in_precedence_order() {
        assert_eq!(check_validity(&row("_1+234")), Err(GameError::EmptyCharacters));
        // an empty tile outranks every later rule
        assert_eq!(check_validity(&row("_11111")), Err(GameError::EmptyCharacters));
        assert_eq!(check_validity(&row("111111")), Err(GameError::NoOperators));
        assert_eq!(check_validity(&row("+12345")), Err(GameError::StartEndNotNumeric));
        assert_eq!(check_validity(&row("12345+")), Err(GameError::StartEndNotNumeric));
        // start/end outranks adjacency
        assert_eq!(check_validity(&row("+12++4")), Err(GameError::StartEndNotNumeric));
        assert_eq!(check_validity(&row("1++234")), Err(GameError::BackToBackOperators));
        assert_eq!(check_validity(&row("1234/0")), Err(GameError::InvalidFunction));
        assert_eq!(check_validity(&row("10+2+3")), Ok(()));
    }

    #[test]
    fn every_blank_position_reports_empty_characters() {
        for idx in 0..TILES_PER_GUESS {
            let mut cells = row("111+11");
            cells[idx] = None;
            assert_eq!(check_validity(&cells), Err(GameError::EmptyCharacters));
        }
    }

    #[test]
    fn zero_valued_guess_is_valid() {
        assert_eq!(check_validity(&row("12*0+0")), Ok(()));
    }

    #[test]
    fn validity_check_is_idempotent() {
        let cells = row("1234/0");
        assert_eq!(check_validity(&cells), check_validity(&cells));
        let ok = row("10+2+3");
        assert_eq!(check_validity(&ok), check_validity(&ok));
    }

    #[test]
    fn invalid_submission_consumes_no_attempt() {
        let mut engine = PlayEngine::new(answer("10+2+3"));

        assert_eq!(
            engine.submit(&row("1++234")),
            Err(GameError::BackToBackOperators)
        );

        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.attempts_used(), 0);
        assert_eq!(engine.attempts_left(), TOTAL_GUESSES);
    }

    #[test]
    fn winning_submission_finishes_the_round() {
        let mut engine = PlayEngine::new(answer("10+2+3"));

        assert_eq!(engine.submit(&row("12-3+4")), Ok(SubmitOutcome::Ongoing));
        assert_eq!(engine.submit(&row("3+2+10")), Ok(SubmitOutcome::Won));

        assert_eq!(engine.state(), EngineState::Won);
        assert!(engine.is_finished());
        assert_eq!(engine.submit(&row("10+2+3")), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn sixth_miss_loses_the_round() {
        let mut engine = PlayEngine::new(answer("10+2+3"));

        for _ in 0..TOTAL_GUESSES - 1 {
            assert_eq!(engine.submit(&row("456-78")), Ok(SubmitOutcome::Ongoing));
        }
        assert_eq!(engine.submit(&row("456-78")), Ok(SubmitOutcome::Lost));

        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.attempts_left(), 0);
        assert_eq!(engine.submit(&row("10+2+3")), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn winning_on_the_last_attempt_still_wins() {
        let mut engine = PlayEngine::new(answer("10+2+3"));

        for _ in 0..TOTAL_GUESSES - 1 {
            engine.submit(&row("456-78")).unwrap();
        }
        assert_eq!(engine.submit(&row("10+2+3")), Ok(SubmitOutcome::Won));
        assert_eq!(engine.state(), EngineState::Won);
    }

    #[test]
    fn verdict_grid_pads_unplayed_rows_with_unset() {
        let mut engine = PlayEngine::new(answer("10+2+3"));
        engine.submit(&row("456-78")).unwrap();

        let grid = engine.verdict_grid();
        assert_eq!(grid[0], [Absent; TILES_PER_GUESS]);
        for row in &grid[1..] {
            assert_eq!(*row, [Unset; TILES_PER_GUESS]);
        }
    }

    #[test]
    fn engine_round_trips_through_serde() {
        let mut engine = PlayEngine::new(answer("10+2+3"));
        engine.submit(&row("12-3+4")).unwrap();

        let encoded = serde_json::to_string(&engine).unwrap();
        let decoded: PlayEngine = serde_json::from_str(&encoded).unwrap();
        assert_eq!(engine, decoded);
    }
}
