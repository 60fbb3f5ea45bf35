use crate::{Board, Cell, PlayerSlot, RuleEngine, TileState};

const SIZE: usize = 3;

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)],
];

/// Tic-tac-toe on a 3×3 board.
///
/// Players alternate. Three in a row scores 1 and ends the game; a full
/// board without a line is a draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    fn has_line(board: &Board, slot: PlayerSlot) -> bool {
        LINES.iter().any(|line| {
            line.iter()
                .all(|&(x, y)| board.get(x, y) == Some(TileState::Occupied(slot)))
        })
    }
}

impl RuleEngine for TicTacToe {
    fn name(&self) -> &str {
        "Tic-tac-toe"
    }

    fn board_size(&self) -> (usize, usize) {
        (SIZE, SIZE)
    }

    fn starting_layout(&self) -> Vec<(Cell, PlayerSlot)> {
        Vec::new()
    }

    fn legal_moves(&self, board: &Board, _slot: PlayerSlot) -> Vec<Cell> {
        if self.has_ended(board) {
            return Vec::new();
        }
        board.cells_where(TileState::is_empty)
    }

    fn is_legal(&self, board: &Board, _slot: PlayerSlot, x: usize, y: usize) -> bool {
        !self.has_ended(board) && board.get(x, y).is_some_and(TileState::is_empty)
    }

    fn apply(&self, board: &mut Board, slot: PlayerSlot, x: usize, y: usize) {
        board.set(x, y, TileState::Occupied(slot));
    }

    fn next_slot(&self, board: &Board, current: PlayerSlot) -> Option<PlayerSlot> {
        (!self.has_ended(board)).then_some(current.opponent())
    }

    fn has_ended(&self, board: &Board) -> bool {
        board.is_full() || PlayerSlot::ALL.iter().any(|&s| Self::has_line(board, s))
    }

    fn scores(&self, board: &Board) -> [u32; 2] {
        PlayerSlot::ALL.map(|s| u32::from(Self::has_line(board, s)))
    }
}
