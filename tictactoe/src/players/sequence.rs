use super::Player;
use crate::game::{Board, Mark, Outcome, Position};

use std::collections::VecDeque;

/// A player replaying a fixed list of moves,
/// resigning once they run out.
#[derive(Clone, Debug)]
pub struct SequencePlayer {
    moves: VecDeque<Position>,
    outcome: Option<Outcome>,
}

impl SequencePlayer {
    pub fn new(moves: Vec<Position>) -> SequencePlayer {
        SequencePlayer {
            moves: moves.into(),
            outcome: None,
        }
    }

    /// Returns the number of moves not yet played.
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }

    /// Returns the outcome of the last finished game.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

impl Player for SequencePlayer {
    fn init(&mut self, _: Mark) {
        self.outcome = None;
    }

    fn turn(&mut self, _: &Board) -> Option<Position> {
        self.moves.pop_front()
    }

    fn finish(&mut self, outcome: Outcome, _: &Board) {
        self.outcome = Some(outcome);
    }
}
