//! Lion-sweeping puzzle engine (minesweeper with lions).
//!
//! The engine owns the board and the match state machine and exposes plain
//! operations: reveal a cell, toggle a flag, chord a numbered cell. Every
//! mutating call returns a change-set of `(pos, CellView)` updates plus the
//! resulting [`MatchState`], so a presentation layer only has to redraw the
//! cells named in the result. The engine never touches pixels or input
//! devices.
//!
//! ## Usage
//!
//! ```rust
//! use lionsweeper_engine::{CellView, Game, GameParams, MatchState, Pos};
//!
//! let mut game = Game::from_seed(GameParams::small(), 7).expect("valid parameters");
//! assert_eq!(game.state(), MatchState::InProgress);
//!
//! let result = game.reveal(Pos { x: 3, y: 4 });
//! for update in &result.updates {
//!     // redraw update.pos as update.value
//!     assert_ne!(update.value, CellView::Hidden);
//! }
//! ```
//!
//! Rule-violating actions (out-of-bounds coordinates, revealing a flagged or
//! already-revealed cell, acting on a finished match) are not errors: they
//! return empty change-sets, because UI-driven actions on stale state are
//! expected and must not take the session down.

use std::fmt;

mod data;
mod logic;

pub use logic::Game;

// Re-export the boundary types for convenience
pub use lionsweeper_common::{models::*, protocol::*};

/// Errors raised by the engine. Construction is the only fallible operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Width, height or lion count is zero, or the lions would not fit on
    /// the board.
    InvalidDimensions {
        width: usize,
        height: usize,
        lions: usize,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions {
                width,
                height,
                lions,
            } => {
                write!(
                    f,
                    "invalid dimensions: {width}x{height} board with {lions} lions"
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;
