//! Co-evolution of tic-tac-toe players: several independent
//! trainers take turns evolving their population against the
//! current top networks of all the others.
use crate::errors::Error;
use crate::game::{play, Mark, SIZE};
use crate::players::NetworkPlayer;

use neuroevo::logging::{EvolutionLogger, ReportingLevel};
use neuroevo::{EvolutionalTrainer, TrainerConfig};
use neuroevo_nn::{ActivationFunction, NeuralNetwork};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::Path;

/// Number of network inputs and outputs, one per cell.
const CELLS: usize = SIZE * SIZE;

/// Configuration data for a training session.
/// Missing fields take their default values
/// when loaded from a file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Neuron count of every network layer. The first
    /// and last layers must have one neuron per cell.
    pub topology: Vec<usize>,
    pub activation_function: ActivationFunction,
    /// Number of independently evolving populations.
    pub trainer_count: usize,
    /// Configuration shared by every trainer.
    pub trainer: TrainerConfig,
    /// Generations run in a trainer's turn.
    pub generations_per_turn: usize,
    /// Number of top networks each trainer lends
    /// as opponents to the one in training.
    pub opponents_per_trainer: usize,
    /// Whether fitness evaluations run in parallel.
    pub concurrent: bool,
}

impl Default for TrainingConfig {
    fn default() -> TrainingConfig {
        TrainingConfig {
            topology: vec![CELLS, 18, 18, CELLS],
            activation_function: ActivationFunction::SoftsignNorm,
            trainer_count: 20,
            trainer: TrainerConfig {
                population_size: 10,
                keep_amount: 5,
                mutation_rate: 0.2,
                randomize: true,
            },
            generations_per_turn: 100,
            opponents_per_trainer: 2,
            concurrent: true,
        }
    }
}

impl TrainingConfig {
    /// Loads and validates a configuration written in RON.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or parsed,
    /// or the configuration doesn't pass [`validate`].
    ///
    /// [`validate`]: TrainingConfig::validate
    pub fn from_file(path: &Path) -> Result<TrainingConfig, Error> {
        let config = Self::from_ron(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<TrainingConfig, Error> {
        Ok(ron::from_str(text)?)
    }

    pub fn to_ron(&self) -> Result<String, Error> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?)
    }

    /// Checks the configuration for values a training
    /// session cannot run with.
    ///
    /// # Errors
    /// Returns an error if the trainer configuration is invalid,
    /// the topology doesn't map cells to cells through non-empty
    /// layers, there are fewer
    /// than two trainers, no generations per turn, or no
    /// opponents or more opponents per trainer than networks.
    pub fn validate(&self) -> Result<(), Error> {
        self.trainer.validate()?;
        if self.topology.first() != Some(&CELLS) || self.topology.last() != Some(&CELLS) {
            return Err(Error::InvalidConfig(format!(
                "topology {:?} must start and end with {} neurons",
                self.topology, CELLS
            )));
        }
        if self.topology.len() < 2 || self.topology.contains(&0) {
            return Err(Error::InvalidConfig(format!(
                "topology {:?} needs at least two layers, none of them empty",
                self.topology
            )));
        }
        if self.trainer_count < 2 {
            return Err(Error::InvalidConfig(
                "at least two trainers are needed to provide opponents".into(),
            ));
        }
        if self.generations_per_turn == 0 {
            return Err(Error::InvalidConfig(
                "at least one generation per turn is needed".into(),
            ));
        }
        if self.opponents_per_trainer == 0
            || self.opponents_per_trainer > self.trainer.population_size
        {
            return Err(Error::InvalidConfig(format!(
                "opponents per trainer must be between 1 and the population size {}, got {}",
                self.trainer.population_size, self.opponents_per_trainer
            )));
        }
        Ok(())
    }
}

/// A training session.
pub struct Training {
    config: TrainingConfig,
    trainers: Vec<EvolutionalTrainer<NeuralNetwork>>,
    loggers: Vec<EvolutionLogger<NeuralNetwork>>,
    current: usize,
    round: usize,
    rng: StdRng,
}

impl Training {
    /// Starts a session drawing randomness from system entropy.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: TrainingConfig) -> Result<Training, Error> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Starts a session whose trainers and opponent
    /// shuffling are seeded from `rng`.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn with_rng(config: TrainingConfig, mut rng: StdRng) -> Result<Training, Error> {
        config.validate()?;
        let seed = NeuralNetwork::new(config.activation_function, &config.topology)?;
        let trainers = (0..config.trainer_count)
            .map(|_| {
                let trainer_rng = StdRng::seed_from_u64(rng.gen());
                EvolutionalTrainer::from_config_with_rng(&seed, &config.trainer, trainer_rng)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let loggers = (0..config.trainer_count)
            .map(|_| EvolutionLogger::new(ReportingLevel::NoGenomes))
            .collect();

        Ok(Training {
            config,
            trainers,
            loggers,
            current: 0,
            round: 0,
            rng,
        })
    }

    /// Returns the top networks of every trainer but the
    /// one whose turn it is, in random order.
    pub fn opponents(&mut self) -> Vec<NeuralNetwork> {
        let current = self.current;
        let per_trainer = self.config.opponents_per_trainer;
        let mut opponents: Vec<NeuralNetwork> = self
            .trainers
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != current)
            .flat_map(|(_, trainer)| trainer.genomes().take(per_trainer).cloned())
            .collect();
        opponents.shuffle(&mut self.rng);
        opponents
    }

    /// Runs the current trainer's turn against fresh opponents
    /// and passes the turn on. Returns the last highscore.
    ///
    /// # Errors
    /// Returns an error if a fitness evaluation failed.
    pub fn train_turn(&mut self) -> Result<f64, Error> {
        if self.current == 0 {
            self.round += 1;
        }
        let index = self.current;
        let opponents = self.opponents();
        log::debug!(
            "trainer {} in round {}: {} opponents",
            index,
            self.round,
            opponents.len()
        );

        let trainer = &mut self.trainers[index];
        let logger = &mut self.loggers[index];
        trainer.reset_tested();
        let fitness = |network: &NeuralNetwork| score(network, &opponents);
        let mut highscore = f64::NEG_INFINITY;
        for _ in 0..self.config.generations_per_turn {
            highscore = trainer.do_iteration(fitness, self.config.concurrent)?;
            logger.log(trainer);
        }

        if let Some(stats) = logger.latest().and_then(|log| log.scores.as_ref()) {
            log::info!(
                "round {}, trainer {}: highscore {:.3}, mean {:.3}, median {:.3}",
                self.round,
                index,
                stats.maximum,
                stats.mean,
                stats.median
            );
        }
        self.current = (self.current + 1) % self.trainers.len();
        Ok(highscore)
    }

    /// Runs turns until every trainer has had one
    /// in the current round.
    ///
    /// # Errors
    /// Returns an error if a fitness evaluation failed.
    pub fn train_round(&mut self) -> Result<(), Error> {
        loop {
            self.train_turn()?;
            if self.current == 0 {
                return Ok(());
            }
        }
    }

    /// Returns the number of started rounds.
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn trainers(&self) -> &[EvolutionalTrainer<NeuralNetwork>] {
        &self.trainers
    }

    /// Returns a copy of every trainer's best network.
    pub fn best_networks(&mut self) -> Vec<NeuralNetwork> {
        self.trainers.iter_mut().map(EvolutionalTrainer::best).collect()
    }

    /// Writes every trainer's best network to
    /// `path`, one per line, replacing its contents.
    ///
    /// # Errors
    /// Returns an error if the file can't be written.
    pub fn save_best_networks(&mut self, path: &Path) -> Result<(), Error> {
        let text: String = self
            .best_networks()
            .iter()
            .map(|network| format!("{}\n", network))
            .collect();
        fs::write(path, text)?;
        Ok(())
    }
}

/// Plays `network` once against each opponent, alternating
/// who starts, and returns
/// `(wins + draws / 2 - illegal moves) / opponents`.
/// Returns 0 if there are no opponents.
pub fn score(network: &NeuralNetwork, opponents: &[NeuralNetwork]) -> f64 {
    if opponents.is_empty() {
        return 0.0;
    }
    let mut player = NetworkPlayer::new(network);
    for (i, opponent) in opponents.iter().enumerate() {
        let mut opponent = NetworkPlayer::new(opponent);
        let starting = if i % 2 == 0 { Mark::X } else { Mark::O };
        play(&mut player, &mut opponent, starting);
    }
    let record = player.record();
    (record.wins as f64 + 0.5 * record.draws as f64 - record.illegal_moves as f64)
        / opponents.len() as f64
}
