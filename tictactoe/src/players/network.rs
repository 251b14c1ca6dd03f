use super::Player;
use crate::game::{Board, Mark, Outcome, Position};

use neuroevo_nn::{Matrix, NeuralNetwork};

/// Game results of a [`NetworkPlayer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    /// Turns on which the network could not pick a move.
    pub illegal_moves: usize,
}

impl Record {
    pub fn games(&self) -> usize {
        self.wins + self.losses + self.draws
    }
}

/// A player choosing moves with a neural network of
/// 9 inputs and 9 outputs.
///
/// The board is fed to the network column by column,
/// with 1 for this player's marks, -1 for the opponent's
/// and 0 for empty cells. The player marks the free cell
/// with the highest corresponding output.
#[derive(Clone, Debug)]
pub struct NetworkPlayer<'a> {
    network: &'a NeuralNetwork,
    mark: Mark,
    record: Record,
}

impl<'a> NetworkPlayer<'a> {
    pub fn new(network: &'a NeuralNetwork) -> NetworkPlayer<'a> {
        NetworkPlayer {
            network,
            mark: Mark::X,
            record: Record::default(),
        }
    }

    pub fn record(&self) -> Record {
        self.record
    }

    pub fn reset_record(&mut self) {
        self.record = Record::default();
    }

    fn inputs(&self, board: &Board) -> Matrix {
        let values: Vec<f64> = Board::positions()
            .map(|position| match board.get(position) {
                Some(mark) if mark == self.mark => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            })
            .collect();
        Matrix::column(&values)
    }
}

impl Player for NetworkPlayer<'_> {
    fn init(&mut self, mark: Mark) {
        self.mark = mark;
    }

    /// Resigns, counting an illegal move, if the network
    /// rejects the input or outputs no finite value for
    /// any free cell.
    fn turn(&mut self, board: &Board) -> Option<Position> {
        let choice = self.network.evaluate(&self.inputs(board)).ok().and_then(|outputs| {
            Board::positions()
                .zip(outputs.values().iter().copied())
                .filter(|(position, output)| board.is_free(*position) && output.is_finite())
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(position, _)| position)
        });
        if choice.is_none() {
            self.record.illegal_moves += 1;
        }
        choice
    }

    fn finish(&mut self, outcome: Outcome, _: &Board) {
        match outcome {
            Outcome::Winner(mark) if mark == self.mark => self.record.wins += 1,
            Outcome::Winner(_) => self.record.losses += 1,
            Outcome::Draw => self.record.draws += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play;
    use crate::players::SequencePlayer;
    use neuroevo_nn::ActivationFunction;

    /// A network whose output for cell `i` (column-major)
    /// is `preferences[i]`, regardless of the board.
    fn fixed_network(preferences: [f64; 9]) -> NeuralNetwork {
        let text = format!(
            "identity:{{{};{}}}",
            Matrix::new(9, 9),
            Matrix::column(&preferences)
        );
        text.parse().unwrap()
    }

    #[test]
    fn picks_best_free_cell() {
        let network = fixed_network([0.1, 0.9, 0.2, 0.3, 0.8, 0.0, 0.0, 0.0, 0.5]);
        let mut player = NetworkPlayer::new(&network);
        player.init(Mark::O);

        let mut board = Board::new();
        assert_eq!(player.turn(&board), Some((0, 1)));
        board.place((0, 1), Mark::X);
        assert_eq!(player.turn(&board), Some((1, 1)));
        board.place((1, 1), Mark::X);
        assert_eq!(player.turn(&board), Some((2, 2)));
        assert_eq!(player.record().illegal_moves, 0);
    }

    #[test]
    fn encodes_board_relative_to_own_mark() {
        let network = NeuralNetwork::new(ActivationFunction::Identity, &[9, 9]).unwrap();
        let mut player = NetworkPlayer::new(&network);
        let mut board = Board::new();
        board.place((0, 1), Mark::X);
        board.place((2, 0), Mark::O);

        player.init(Mark::X);
        let inputs = player.inputs(&board);
        assert_eq!(inputs.values(), &[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0]);

        player.init(Mark::O);
        let inputs = player.inputs(&board);
        assert_eq!(inputs.values(), &[0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn wrong_topology_resigns() {
        let network = NeuralNetwork::new(ActivationFunction::Identity, &[4, 9]).unwrap();
        let mut player = NetworkPlayer::new(&network);
        player.init(Mark::X);
        assert_eq!(player.turn(&Board::new()), None);
        assert_eq!(player.record().illegal_moves, 1);
    }

    #[test]
    fn keeps_a_record() {
        let network = fixed_network([0.9, 0.8, 0.7, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mut player = NetworkPlayer::new(&network);

        // Fills column 0 before the opponent completes column 2.
        let mut opponent = SequencePlayer::new(vec![(2, 0), (2, 1), (2, 2)]);
        play(&mut player, &mut opponent, Mark::X);
        assert_eq!(player.record().wins, 1);

        let mut opponent = SequencePlayer::new(vec![(2, 0), (2, 1), (2, 2)]);
        play(&mut opponent, &mut player, Mark::X);
        assert_eq!(player.record().losses, 1);

        let mut opponent = SequencePlayer::new(vec![]);
        play(&mut player, &mut opponent, Mark::O);
        assert_eq!(
            player.record(),
            Record {
                wins: 2,
                losses: 1,
                draws: 0,
                illegal_moves: 0
            }
        );
        assert_eq!(player.record().games(), 3);

        player.reset_record();
        assert_eq!(player.record(), Record::default());
    }
}
