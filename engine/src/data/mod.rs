use lionsweeper_common::models::{CellView, Pos};

/// A lion cell's `adjacent` value; the count is not meaningful there.
pub const LION_MARKER: i8 = -1;

#[derive(Debug)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub lion: bool,
    /// `LION_MARKER` for lion cells, otherwise 0..=8 adjacent lions.
    pub adjacent: i8,
    pub revealed: bool,
    pub flagged: bool,
}

impl Cell {
    pub fn pos(&self) -> Pos {
        Pos {
            x: self.x,
            y: self.y,
        }
    }

    /// Project the cell into what the presentation layer may see.
    pub fn view(&self) -> CellView {
        if self.revealed {
            if self.lion {
                CellView::Lion
            } else if self.adjacent > 0 {
                CellView::Number {
                    adjacent: self.adjacent as u8,
                }
            } else {
                CellView::Clear
            }
        } else if self.flagged {
            CellView::Flagged
        } else {
            CellView::Hidden
        }
    }
}

/// The cell grid, row-major (`index = x + y * width`). Shape, lion layout and
/// adjacency values are fixed after generation; only the `revealed`/`flagged`
/// flags mutate during a match. `revealed` counts revealed safe cells so the
/// win check stays O(1).
#[derive(Debug)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub lions: usize,
    pub revealed: usize,
    pub cells: Vec<Cell>,
}
