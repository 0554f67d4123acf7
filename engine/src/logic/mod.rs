use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

use lionsweeper_common::{
    models::{CellView, GameParams, MatchState, Pos},
    protocol::{CellUpdate, FlagResult, RevealResult},
};

use crate::data::{Board, Cell, LION_MARKER};
use crate::{EngineError, Result};

fn validate_params(params: &GameParams) -> Result<()> {
    if params.width == 0
        || params.height == 0
        || params.lions == 0
        || params.lions >= params.width * params.height
    {
        return Err(EngineError::InvalidDimensions {
            width: params.width,
            height: params.height,
            lions: params.lions,
        });
    }
    Ok(())
}

impl Board {
    fn generate(params: &GameParams, rng: &mut impl Rng) -> Result<Self> {
        validate_params(params)?;

        let mut board = Self {
            width: params.width,
            height: params.height,
            lions: params.lions,
            revealed: 0,
            cells: (0..params.width * params.height)
                .map(|i| Cell {
                    x: i % params.width,
                    y: i / params.width,
                    lion: false,
                    adjacent: 0,
                    revealed: false,
                    flagged: false,
                })
                .collect(),
        };
        board.place_lions(rng);
        board.compute_adjacency();
        Ok(board)
    }

    /// Rejection sampling: draw uniform coordinates, skip cells that already
    /// hold a lion, until exactly `lions` are placed. Lion density is below
    /// 100% so this terminates.
    fn place_lions(&mut self, rng: &mut impl Rng) {
        let mut placed = 0;
        while placed < self.lions {
            let x = rng.random_range(0..self.width);
            let y = rng.random_range(0..self.height);
            let cell = &mut self.cells[x + y * self.width];
            if !cell.lion {
                cell.lion = true;
                placed += 1;
            }
        }
    }

    fn compute_adjacency(&mut self) {
        for index in 0..self.cells.len() {
            if self.cells[index].lion {
                self.cells[index].adjacent = LION_MARKER;
                continue;
            }
            let count = self
                .neighbors_of(self.cells[index].pos())
                .into_iter()
                .filter(|p| self.cells[p.x + p.y * self.width].lion)
                .count();
            self.cells[index].adjacent = count as i8;
        }
    }

    fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn cell_at(&self, pos: Pos) -> Option<&Cell> {
        self.in_bounds(pos)
            .then(|| &self.cells[pos.x + pos.y * self.width])
    }

    fn cell_at_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        if self.in_bounds(pos) {
            Some(&mut self.cells[pos.x + pos.y * self.width])
        } else {
            None
        }
    }

    /// The up to 8 in-bounds Moore neighbors, row-major scan order.
    fn neighbors_of(&self, pos: Pos) -> Vec<Pos> {
        let mut neighbors = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1i32 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let x = pos.x as i32 + dx;
                let y = pos.y as i32 + dy;

                if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
                    neighbors.push(Pos {
                        x: x as usize,
                        y: y as usize,
                    });
                }
            }
        }
        neighbors
    }

    fn all_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    fn has_won(&self) -> bool {
        self.width * self.height == self.lions + self.revealed
    }

    /// Breadth-first cascading reveal. Reveals the popped cell (flagged
    /// cells keep their flag and stay hidden) and expands across cells with
    /// zero adjacency; lion cells are never enqueued, so the fill cannot end
    /// the match. Each cell is processed at most once.
    fn flood_reveal(&mut self, start: Pos, updates: &mut Vec<CellUpdate>) {
        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();

        visited[start.x + start.y * self.width] = true;
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            let index = pos.x + pos.y * self.width;
            let cell = &mut self.cells[index];

            if !cell.revealed && !cell.flagged {
                cell.revealed = true;
                self.revealed += 1;
                updates.push(CellUpdate {
                    pos,
                    value: cell.view(),
                });
            }

            if cell.adjacent != 0 {
                continue;
            }

            for neighbor in self.neighbors_of(pos) {
                let neighbor_index = neighbor.x + neighbor.y * self.width;
                let next = &self.cells[neighbor_index];
                if !visited[neighbor_index] && !next.lion && !next.revealed {
                    visited[neighbor_index] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    /// Show the lions for the end-of-match display. `force` (loss) reveals
    /// them all; otherwise (win) flagged lions keep their flag, the player
    /// called them correctly.
    fn reveal_lions(&mut self, force: bool, updates: &mut Vec<CellUpdate>) {
        for cell in &mut self.cells {
            if cell.lion && !cell.revealed && (force || !cell.flagged) {
                cell.revealed = true;
                updates.push(CellUpdate {
                    pos: cell.pos(),
                    value: cell.view(),
                });
            }
        }
    }
}

/// One match: the board plus the state machine driving it.
///
/// A plain owned value; a concurrent host should keep one `Game` per match
/// behind its own mutex.
pub struct Game {
    board: Board,
    state: MatchState,
}

impl Game {
    #[instrument(level = "trace")]
    pub fn new(params: GameParams) -> Result<Self> {
        Self::with_rng(params, &mut rand::rng())
    }

    /// Deterministic construction for replays and tests.
    #[instrument(level = "trace")]
    pub fn from_seed(params: GameParams, seed: u64) -> Result<Self> {
        Self::with_rng(params, &mut SmallRng::seed_from_u64(seed))
    }

    fn with_rng(params: GameParams, rng: &mut impl Rng) -> Result<Self> {
        let board = Board::generate(&params, rng)?;
        info!(
            "Creating new match: {}x{} with {} lions",
            params.width, params.height, params.lions
        );
        Ok(Self {
            board,
            state: MatchState::InProgress,
        })
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn width(&self) -> usize {
        self.board.width
    }

    pub fn height(&self) -> usize {
        self.board.height
    }

    pub fn lions(&self) -> usize {
        self.board.lions
    }

    /// Visual state of one cell; `None` when out of bounds.
    pub fn cell(&self, pos: Pos) -> Option<CellView> {
        self.board.cell_at(pos).map(Cell::view)
    }

    /// Full-grid snapshot, row by row, for presentation-layer initialization.
    pub fn view(&self) -> Vec<Vec<CellView>> {
        self.board
            .all_cells()
            .map(Cell::view)
            .collect::<Vec<_>>()
            .chunks(self.board.width)
            .map(|row| row.to_vec())
            .collect()
    }

    fn unchanged(&self) -> RevealResult {
        RevealResult {
            updates: Vec::new(),
            state: self.state,
        }
    }

    /// Reveal a cell. No-op unless the match is in progress and the cell is
    /// in bounds, hidden and unflagged. A lion loses the match and shows
    /// every lion; a zero-adjacency cell cascades; every reveal re-runs the
    /// win check.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn reveal(&mut self, pos: Pos) -> RevealResult {
        if self.state.is_terminal() {
            debug!("Ignoring reveal on finished match at ({}, {})", pos.x, pos.y);
            return self.unchanged();
        }

        let Some(cell) = self.board.cell_at(pos) else {
            warn!("Invalid reveal position: ({}, {})", pos.x, pos.y);
            return self.unchanged();
        };
        if cell.revealed || cell.flagged {
            debug!("Ignoring reveal on protected cell ({}, {})", pos.x, pos.y);
            return self.unchanged();
        }
        let lion = cell.lion;

        let mut updates = Vec::new();
        if lion {
            warn!("Lion hit at ({}, {}) - match over", pos.x, pos.y);
            self.state = MatchState::Lost;
            self.board.reveal_lions(true, &mut updates);
            info!("Match ended with loss, revealed {} lions", updates.len());
            return RevealResult {
                updates,
                state: self.state,
            };
        }

        self.board.flood_reveal(pos, &mut updates);

        if self.board.has_won() {
            self.state = MatchState::Won;
            self.board.reveal_lions(false, &mut updates);
            info!("Match won, all safe cells revealed");
        } else {
            debug!("Revealed {} cells, match continues", updates.len());
        }

        RevealResult {
            updates,
            state: self.state,
        }
    }

    /// Toggle the flag on a hidden cell. Never touches the win check:
    /// flagging has no effect on match state.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn toggle_flag(&mut self, pos: Pos) -> FlagResult {
        if self.state.is_terminal() {
            debug!("Ignoring flag on finished match at ({}, {})", pos.x, pos.y);
            return FlagResult {
                update: None,
                state: self.state,
            };
        }

        let Some(cell) = self.board.cell_at_mut(pos) else {
            warn!("Invalid flag position: ({}, {})", pos.x, pos.y);
            return FlagResult {
                update: None,
                state: self.state,
            };
        };
        if cell.revealed {
            debug!("Ignoring flag on revealed cell ({}, {})", pos.x, pos.y);
            return FlagResult {
                update: None,
                state: self.state,
            };
        }

        cell.flagged = !cell.flagged;
        debug!(
            "Cell ({}, {}) {}",
            pos.x,
            pos.y,
            if cell.flagged { "flagged" } else { "unflagged" }
        );
        let update = CellUpdate {
            pos,
            value: cell.view(),
        };
        FlagResult {
            update: Some(update),
            state: self.state,
        }
    }

    /// Chord a revealed numbered cell: when the flagged-neighbor count
    /// matches the number exactly, reveal every hidden unflagged neighbor.
    /// Any mismatch is a no-op, a wrong flag count must never auto-reveal.
    /// A chord can cascade into flood fills and end the match either way;
    /// once the state turns terminal the remaining reveals reject themselves.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn chord(&mut self, pos: Pos) -> RevealResult {
        if self.state.is_terminal() {
            debug!("Ignoring chord on finished match at ({}, {})", pos.x, pos.y);
            return self.unchanged();
        }

        let Some(cell) = self.board.cell_at(pos) else {
            warn!("Invalid chord position: ({}, {})", pos.x, pos.y);
            return self.unchanged();
        };
        if !cell.revealed || cell.adjacent <= 0 {
            debug!(
                "Ignoring chord on cell ({}, {}) without a visible number",
                pos.x, pos.y
            );
            return self.unchanged();
        }
        let adjacent = cell.adjacent as usize;

        let neighbors = self.board.neighbors_of(pos);
        let flagged = neighbors
            .iter()
            .filter(|p| self.board.cell_at(**p).is_some_and(|c| c.flagged))
            .count();
        if flagged != adjacent {
            debug!(
                "Chord at ({}, {}) needs {} flags, found {}",
                pos.x, pos.y, adjacent, flagged
            );
            return self.unchanged();
        }

        let mut updates = Vec::new();
        for neighbor in neighbors {
            let hidden = self
                .board
                .cell_at(neighbor)
                .is_some_and(|c| !c.revealed && !c.flagged);
            if hidden {
                updates.extend(self.reveal(neighbor).updates);
            }
        }

        RevealResult {
            updates,
            state: self.state,
        }
    }
}
