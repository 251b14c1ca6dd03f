use super::Player;
use crate::game::{Board, Mark, Outcome, Position, SIZE};

use std::io::{self, BufRead, Write};

/// A human player typing moves as `column,row`.
///
/// Invalid input is reported and asked for again; the
/// player resigns when the input ends.
pub struct ConsolePlayer<R, W> {
    input: R,
    output: W,
    mark: Mark,
}

impl ConsolePlayer<io::StdinLock<'static>, io::Stdout> {
    /// Returns a player reading from stdin
    /// and writing to stdout.
    pub fn stdio() -> Self {
        ConsolePlayer::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePlayer<R, W> {
    pub fn new(input: R, output: W) -> ConsolePlayer<R, W> {
        ConsolePlayer {
            input,
            output,
            mark: Mark::X,
        }
    }

    fn prompt(&mut self, board: &Board) -> io::Result<Option<Position>> {
        write!(self.output, "{}", board)?;
        loop {
            writeln!(self.output, "Player {}, type a position (column,row):", self.mark)?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match parse_position(&line) {
                Some(position) if board.is_free(position) => return Ok(Some(position)),
                Some(_) => writeln!(self.output, "That cell is not free.")?,
                None => writeln!(
                    self.output,
                    "Expected two numbers from 0 to {} separated by a comma.",
                    SIZE - 1
                )?,
            }
        }
    }
}

/// Parses `column,row`, ignoring surrounding whitespace.
fn parse_position(line: &str) -> Option<Position> {
    let (column, row) = line.trim().split_once(',')?;
    let position = (column.trim().parse().ok()?, row.trim().parse().ok()?);
    (position.0 < SIZE && position.1 < SIZE).then_some(position)
}

impl<R: BufRead, W: Write> Player for ConsolePlayer<R, W> {
    fn init(&mut self, mark: Mark) {
        self.mark = mark;
    }

    fn turn(&mut self, board: &Board) -> Option<Position> {
        match self.prompt(board) {
            Ok(position) => position,
            Err(e) => {
                log::error!("console player resigns: {}", e);
                None
            }
        }
    }

    fn finish(&mut self, outcome: Outcome, board: &Board) {
        let message = match outcome {
            Outcome::Winner(mark) if mark == self.mark => String::from("You won!"),
            Outcome::Winner(mark) => format!("Player {} won!", mark),
            Outcome::Draw => String::from("Draw!"),
        };
        if let Err(e) = writeln!(self.output, "{}{}", board, message) {
            log::error!("failed to report the outcome: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play;
    use crate::players::SequencePlayer;

    #[test]
    fn parses_positions() {
        assert_eq!(parse_position("1,2\n"), Some((1, 2)));
        assert_eq!(parse_position(" 0 , 0 "), Some((0, 0)));
        assert_eq!(parse_position("3,0"), None);
        assert_eq!(parse_position("1 2"), None);
        assert_eq!(parse_position("a,1"), None);
        assert_eq!(parse_position("-1,1"), None);
    }

    #[test]
    fn reprompts_on_invalid_input() {
        let mut board = Board::new();
        board.place((1, 1), Mark::O);
        let input = "nonsense\n1,1\n9,9\n2,0\n";
        let mut output = vec![];
        let mut player = ConsolePlayer::new(input.as_bytes(), &mut output);
        player.init(Mark::X);
        assert_eq!(player.turn(&board), Some((2, 0)));

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with(". . .\n. O .\n. . .\n"));
        assert_eq!(output.matches("Player X, type a position").count(), 4);
        assert_eq!(output.matches("not free").count(), 1);
        assert_eq!(output.matches("Expected two numbers").count(), 2);
    }

    #[test]
    fn resigns_at_end_of_input() {
        let mut player = ConsolePlayer::new("".as_bytes(), io::sink());
        assert_eq!(player.turn(&Board::new()), None);
    }

    #[test]
    fn plays_and_reports() {
        let mut output = vec![];
        let mut human = ConsolePlayer::new("0,0\n0,1\n0,2\n".as_bytes(), &mut output);
        let mut opponent = SequencePlayer::new(vec![(2, 0), (2, 1)]);
        let (outcome, _) = play(&mut human, &mut opponent, Mark::X);
        assert_eq!(outcome, Outcome::Winner(Mark::X));
        drop(human);
        assert!(String::from_utf8(output).unwrap().ends_with("You won!\n"));
    }
}
