use super::EvolutionalTrainer;

use crate::Evolvable;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the best genome of each generation.
    Champion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a trainer after a generation.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generation_number: usize,
    pub highscore: Option<f64>,
    /// Statistics over every score of the last
    /// evaluated generation, if there was one.
    pub scores: Option<Stats>,
    pub champion: Option<G>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \thighscore: {:?}\n\
            \tscores: {:?}\n\
            }}",
            &self.generation_number, &self.highscore, &self.scores,
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use neuroevo::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return None;
        }
        data.sort_unstable_by(f64::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f64>() / data.len() as f64,
            median,
        })
    }
}

/// A log of the evolution of a trainer's population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Evolvable> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// use neuroevo::logging::{EvolutionLogger, ReportingLevel};
    /// use neuroevo_nn::NeuralNetwork;
    ///
    /// let logger = EvolutionLogger::<NeuralNetwork>::new(ReportingLevel::NoGenomes);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a trainer. Meant to be
    /// called after each generation.
    ///
    /// # Examples
    /// ```
    /// use neuroevo::EvolutionalTrainer;
    /// use neuroevo::logging::{EvolutionLogger, ReportingLevel};
    /// use neuroevo_nn::{ActivationFunction, NeuralNetwork};
    ///
    /// let seed = NeuralNetwork::new(ActivationFunction::Identity, &[1, 1]).unwrap();
    /// let mut trainer = EvolutionalTrainer::new(&seed, 4, 2, true).unwrap();
    /// let mut logger = EvolutionLogger::new(ReportingLevel::Champion);
    ///
    /// trainer.do_iteration(|network| network.weights()[0].get(0, 0), false).unwrap();
    /// logger.log(&trainer);
    ///
    /// let log = logger.iter().next().unwrap();
    /// assert_eq!(log.generation_number, 1);
    /// assert_eq!(log.scores.as_ref().unwrap().maximum, log.highscore.unwrap());
    /// assert!(log.champion.is_some());
    /// ```
    pub fn log(&mut self, trainer: &EvolutionalTrainer<G>) {
        self.logs.push(Log {
            generation_number: trainer.generation(),
            highscore: trainer.highscore(),
            scores: Stats::from(trainer.last_scores().iter().copied()),
            champion: match self.reporting_level {
                ReportingLevel::Champion => trainer.champion().cloned(),
                ReportingLevel::NoGenomes => None,
            },
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot.
    pub fn latest(&self) -> Option<&Log<G>> {
        self.logs.last()
    }
}
