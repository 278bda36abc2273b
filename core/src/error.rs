use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Please fill out all characters before submitting")]
    EmptyCharacters,
    #[error("Please submit a valid equation that includes an operator (+, -, *, or /)")]
    NoOperators,
    #[error("Your submission must start and end with a number")]
    StartEndNotNumeric,
    #[error("Your submission must not have back to back operators.")]
    BackToBackOperators,
    #[error("Your submission must be a valid function. Please try again")]
    InvalidFunction,
    #[error("Game already ended, no new guesses are accepted")]
    AlreadyEnded,
    #[error("Expressions are exactly {} characters long", crate::TILES_PER_GUESS)]
    BadLength,
    #[error("Expressions may only contain digits and + - * / (got {0:?})")]
    BadCharacter(char),
    #[error("Expression does not evaluate to a whole number")]
    NotAnInteger,
}

pub type Result<T> = core::result::Result<T, GameError>;
