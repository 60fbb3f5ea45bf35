use crate::{Board, Cell, PlayerSlot, RuleEngine, TileState};

const SIZE: usize = 8;

const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Reversi (Othello) on an 8×8 board.
///
/// A move must flank at least one line of opponent stones, which are then
/// flipped. A player with no legal move passes; when neither can move the
/// game is over. Score is the number of stones on the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reversi;

impl Reversi {
    /// Opponent stones that a stone for `slot` at `(x, y)` would flip.
    fn captures(board: &Board, slot: PlayerSlot, x: usize, y: usize) -> Vec<Cell> {
        let mut flipped = Vec::new();
        for (dx, dy) in DIRECTIONS {
            let mut run = Vec::new();
            let mut cursor = step(board, x, y, dx, dy);
            while let Some(cell) = cursor {
                match board.get(cell.x, cell.y) {
                    Some(TileState::Occupied(s)) if s == slot.opponent() => {
                        run.push(cell);
                        cursor = step(board, cell.x, cell.y, dx, dy);
                    }
                    Some(TileState::Occupied(_)) => {
                        flipped.append(&mut run);
                        break;
                    }
                    _ => break,
                }
            }
        }
        flipped
    }

    fn stones(board: &Board, slot: PlayerSlot) -> usize {
        board.count(TileState::Occupied(slot))
    }
}

fn step(board: &Board, x: usize, y: usize, dx: isize, dy: isize) -> Option<Cell> {
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    board.contains(nx, ny).then(|| Cell::new(nx, ny))
}

impl RuleEngine for Reversi {
    fn name(&self) -> &str {
        "Reversi"
    }

    fn board_size(&self) -> (usize, usize) {
        (SIZE, SIZE)
    }

    fn starting_layout(&self) -> Vec<(Cell, PlayerSlot)> {
        vec![
            (Cell::new(3, 3), PlayerSlot::Two),
            (Cell::new(4, 3), PlayerSlot::One),
            (Cell::new(3, 4), PlayerSlot::One),
            (Cell::new(4, 4), PlayerSlot::Two),
        ]
    }

    fn legal_moves(&self, board: &Board, slot: PlayerSlot) -> Vec<Cell> {
        board
            .cells()
            .filter(|c| self.is_legal(board, slot, c.x, c.y))
            .collect()
    }

    fn is_legal(&self, board: &Board, slot: PlayerSlot, x: usize, y: usize) -> bool {
        board.get(x, y).is_some_and(TileState::is_empty)
            && !Self::captures(board, slot, x, y).is_empty()
    }

    fn apply(&self, board: &mut Board, slot: PlayerSlot, x: usize, y: usize) {
        let flipped = Self::captures(board, slot, x, y);
        board.set(x, y, TileState::Occupied(slot));
        for cell in flipped {
            board.set(cell.x, cell.y, TileState::Occupied(slot));
        }
    }

    fn next_slot(&self, board: &Board, current: PlayerSlot) -> Option<PlayerSlot> {
        let opponent = current.opponent();
        if !self.legal_moves(board, opponent).is_empty() {
            Some(opponent)
        } else if !self.legal_moves(board, current).is_empty() {
            Some(current)
        } else {
            None
        }
    }

    fn has_ended(&self, board: &Board) -> bool {
        Self::stones(board, PlayerSlot::One) == 0
            || Self::stones(board, PlayerSlot::Two) == 0
            || board.is_full()
    }

    fn scores(&self, board: &Board) -> [u32; 2] {
        PlayerSlot::ALL.map(|s| Self::stones(board, s) as u32)
    }
}
