use serde::{Deserialize, Serialize};

/// Per-tile verdict of a scored guess character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileColor {
    /// Not evaluated yet.
    Unset,
    /// Character does not appear anywhere in the answer.
    Absent,
    /// Character appears in the answer, but not at this position.
    Present,
    /// Correct character at the correct position.
    Match,
}

impl TileColor {
    pub const fn is_scored(self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }
}

impl Default for TileColor {
    fn default() -> Self {
        Self::Unset
    }
}
