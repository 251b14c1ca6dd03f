use serde::{Deserialize, Serialize};

/// A member of a trainer's population: a genome
/// together with its most recent score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Individual<G> {
    genome: G,
    score: Option<f64>,
    tested: bool,
}

impl<G> Individual<G> {
    /// Returns a new, unscored and untested individual.
    pub(crate) fn new(genome: G) -> Individual<G> {
        Individual {
            genome,
            score: None,
            tested: false,
        }
    }

    /// Returns the individual's genome.
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Returns the individual's last assigned score,
    /// or `None` if it was never scored.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Returns whether the individual has been scored
    /// since it was created or since the trainer's
    /// tested flags were last reset.
    pub fn is_tested(&self) -> bool {
        self.tested
    }

    pub(crate) fn set_score(&mut self, score: f64) {
        self.score = Some(score);
        self.tested = true;
    }

    pub(crate) fn reset_tested(&mut self) {
        self.tested = false;
    }
}
