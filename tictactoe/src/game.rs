use crate::players::Player;

use std::fmt;

/// Side length of the board.
pub const SIZE: usize = 3;

/// A board cell, addressed as `(column, row)`.
pub type Position = (usize, usize);

/// A player's mark. `X` belongs to the first player of
/// a game, `O` to the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// The result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Winner(Mark),
    Draw,
}

/// A tic-tac-toe board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Mark>; SIZE]; SIZE],
}

/// Every line of three cells that wins the game.
const LINES: [[Position; SIZE]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)],
];

impl Board {
    /// Returns an empty board.
    pub fn new() -> Board {
        Board::default()
    }

    /// Returns the mark at `position`, or `None` if the
    /// cell is empty or outside the board.
    pub fn get(&self, (column, row): Position) -> Option<Mark> {
        self.cells.get(column)?.get(row).copied().flatten()
    }

    /// Returns whether `position` is on the board and empty.
    pub fn is_free(&self, (column, row): Position) -> bool {
        column < SIZE && row < SIZE && self.cells[column][row].is_none()
    }

    /// Places `mark` at `position`. Returns `false`, leaving
    /// the board unchanged, if the cell is occupied or
    /// outside the board.
    pub fn place(&mut self, (column, row): Position, mark: Mark) -> bool {
        if !self.is_free((column, row)) {
            return false;
        }
        self.cells[column][row] = Some(mark);
        true
    }

    /// Returns the mark occupying a complete line, if any.
    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|line| {
            let mark = self.get(line[0])?;
            line[1..]
                .iter()
                .all(|position| self.get(*position) == Some(mark))
                .then_some(mark)
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    /// Returns every cell of the board in column-major order.
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(|column| (0..SIZE).map(move |row| (column, row)))
    }
}

impl fmt::Display for Board {
    /// Writes one line per row, with `.` for empty cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for column in 0..SIZE {
                if column > 0 {
                    write!(f, " ")?;
                }
                match self.cells[column][row] {
                    Some(mark) => write!(f, "{}", mark)?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Plays one game between `first` (marking `X`) and
/// `second` (marking `O`), with `starting` moving first.
///
/// A player that moves onto an occupied or nonexistent
/// cell loses immediately. So does a player that resigns
/// by returning no move. Both players are told the
/// outcome once the game ends.
pub fn play(first: &mut dyn Player, second: &mut dyn Player, starting: Mark) -> (Outcome, Board) {
    let mut board = Board::new();
    first.init(Mark::X);
    second.init(Mark::O);

    let mut current = starting;
    let outcome = loop {
        if let Some(mark) = board.winner() {
            break Outcome::Winner(mark);
        }
        if board.is_full() {
            break Outcome::Draw;
        }
        let player: &mut dyn Player = match current {
            Mark::X => &mut *first,
            Mark::O => &mut *second,
        };
        let legal = match player.turn(&board) {
            Some(position) => board.place(position, current),
            None => false,
        };
        if !legal {
            break Outcome::Winner(current.opponent());
        }
        current = current.opponent();
    };

    first.finish(outcome, &board);
    second.finish(outcome, &board);
    (outcome, board)
}
