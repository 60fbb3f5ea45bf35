//! Board, tiles, and player slots.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PlayerSlot
// ---------------------------------------------------------------------------

/// A seat at the board. Every game has exactly two.
///
/// "No player" (no one to move, a drawn game) is `Option<PlayerSlot>::None`
/// rather than a third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    /// The other seat.
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// `0` for `One`, `1` for `Two`. Indexes score arrays.
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "Player1"),
            Self::Two => write!(f, "Player2"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell / TileState
// ---------------------------------------------------------------------------

/// A board coordinate. `x` is the column, `y` the row, both from the
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What a single tile holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileState {
    #[default]
    Empty,
    /// Empty, but marked as a legal move for the player to move.
    LegalMove,
    Occupied(PlayerSlot),
}

impl TileState {
    /// `true` for `Empty` and `LegalMove`: nothing has been placed here.
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty | Self::LegalMove)
    }

    fn symbol(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::LegalMove => '*',
            Self::Occupied(PlayerSlot::One) => 'X',
            Self::Occupied(PlayerSlot::Two) => 'O',
        }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A fixed-size grid of tiles, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<TileState>,
}

impl Board {
    /// Creates an empty board.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileState::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Returns the tile at `(x, y)`, or `None` off the board.
    pub fn get(&self, x: usize, y: usize) -> Option<TileState> {
        self.contains(x, y).then(|| self.tiles[y * self.width + x])
    }

    /// Sets the tile at `(x, y)`. Returns `false` off the board.
    pub fn set(&mut self, x: usize, y: usize, state: TileState) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.tiles[y * self.width + x] = state;
        true
    }

    /// Server position of a cell: `y * width + x`.
    pub fn position_of(&self, cell: Cell) -> usize {
        cell.y * self.width + cell.x
    }

    /// Cell for a server position, or `None` off the board.
    pub fn cell_at(&self, position: usize) -> Option<Cell> {
        if self.width == 0 || position >= self.tiles.len() {
            return None;
        }
        Some(Cell::new(position % self.width, position / self.width))
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Cells whose tile satisfies `pred`, row by row.
    pub fn cells_where(&self, pred: impl Fn(TileState) -> bool) -> Vec<Cell> {
        self.cells()
            .filter(|c| pred(self.tiles[c.y * self.width + c.x]))
            .collect()
    }

    /// Number of tiles equal to `state`.
    pub fn count(&self, state: TileState) -> usize {
        self.tiles.iter().filter(|t| **t == state).count()
    }

    /// `true` when no tile is empty.
    pub fn is_full(&self) -> bool {
        self.tiles.iter().all(|t| !t.is_empty())
    }

    /// Turns every `LegalMove` marker back into `Empty`.
    pub fn clear_markers(&mut self) {
        for tile in &mut self.tiles {
            if *tile == TileState::LegalMove {
                *tile = TileState::Empty;
            }
        }
    }

    /// Marks `cells` as legal moves.
    pub fn mark_legal(&mut self, cells: &[Cell]) {
        for cell in cells {
            self.set(cell.x, cell.y, TileState::LegalMove);
        }
    }

    /// Empties every tile.
    pub fn reset(&mut self) {
        self.tiles.fill(TileState::Empty);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for x in 0..self.width {
            write!(f, " {x}  ")?;
        }
        writeln!(f)?;
        for y in 0..self.height {
            write!(f, "{y} ")?;
            for x in 0..self.width {
                write!(f, "[{}] ", self.tiles[y * self.width + x].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
