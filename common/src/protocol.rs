use serde::{Deserialize, Serialize};

use crate::models::{CellView, MatchState, Pos};

/// One entry of a change-set: a cell whose visual state changed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct CellUpdate {
    pub pos: Pos,
    pub value: CellView,
}

/// Outcome of a reveal or chord action: every cell whose visual state
/// changed, plus the match state afterwards. An empty `updates` list means
/// the action was rejected or had no effect.
#[derive(Serialize, Deserialize, Debug)]
pub struct RevealResult {
    pub updates: Vec<CellUpdate>,
    pub state: MatchState,
}

impl RevealResult {
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Outcome of a flag toggle: at most one cell changes, and the match state
/// never does.
#[derive(Serialize, Deserialize, Debug)]
pub struct FlagResult {
    pub update: Option<CellUpdate>,
    pub state: MatchState,
}

impl FlagResult {
    pub fn is_noop(&self) -> bool {
        self.update.is_none()
    }
}
