//! Participants in a game of tic-tac-toe.
mod console;
mod network;
mod sequence;

pub use console::ConsolePlayer;
pub use network::{NetworkPlayer, Record};
pub use sequence::SequencePlayer;

use crate::game::{Board, Mark, Outcome, Position};

/// A participant in a game, driven by [`play`].
///
/// [`play`]: crate::game::play
pub trait Player {
    /// Called at the start of every game with
    /// the mark this player places.
    fn init(&mut self, mark: Mark);

    /// Called on every one of this player's turns. Returns the
    /// cell to mark, or `None` to resign.
    fn turn(&mut self, board: &Board) -> Option<Position>;

    /// Called at the end of every game.
    fn finish(&mut self, outcome: Outcome, board: &Board);
}
