use serde::{Deserialize, Serialize};

/// Visual state of a single cell, as the presentation layer should draw it.
///
/// The engine only ever hands out these projections; whether a hidden cell
/// holds a lion is not observable through the boundary.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(tag = "state")]
pub enum CellView {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    /// Revealed with no adjacent lions.
    #[serde(rename = "clear")]
    Clear,
    /// Revealed with 1..=8 adjacent lions.
    #[serde(rename = "number")]
    Number { adjacent: u8 },
    /// Revealed lion, only seen once the match is over.
    #[serde(rename = "lion")]
    Lion,
}

#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

/// Overall match state. `Won` and `Lost` are terminal: the engine answers
/// further actions with empty change-sets.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    InProgress,
    Won,
    Lost,
}

impl MatchState {
    pub fn is_terminal(self) -> bool {
        self != MatchState::InProgress
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameParams {
    pub width: usize,
    pub height: usize,
    pub lions: usize,
}

impl GameParams {
    pub const fn new(width: usize, height: usize, lions: usize) -> Self {
        Self {
            width,
            height,
            lions,
        }
    }

    /// 8x8 board with 10 lions.
    pub const fn small() -> Self {
        Self::new(8, 8, 10)
    }

    /// 16x16 board with 40 lions.
    pub const fn medium() -> Self {
        Self::new(16, 16, 40)
    }

    /// 24x24 board with 99 lions.
    pub const fn large() -> Self {
        Self::new(24, 24, 99)
    }

    /// 32x32 board with 200 lions.
    pub const fn huge() -> Self {
        Self::new(32, 32, 200)
    }
}

impl Default for GameParams {
    fn default() -> Self {
        Self::small()
    }
}
