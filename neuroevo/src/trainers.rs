//! An EvolutionalTrainer holds a fixed-size population
//! of genomes, which is evolved one generation at a time
//! using a genome evaluation function as the source of
//! selective pressure.
mod config;
mod errors;
mod individual;
pub mod logging;

use crate::Evolvable;
pub use config::TrainerConfig;
use config::validate_mutation_rate;
pub use errors::{ConfigurationError, EvaluationError, FailureCause, UnitFailure};
pub use individual::Individual;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use std::any::Any;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};

/// Range of the uniform distribution used to
/// randomize the seed's copies on construction.
const SEED_RANDOMIZATION_RANGE: f64 = 1.0;

/// A population of genomes evolved by elitist
/// selection and mutation.
///
/// Each generation, every untested individual is scored
/// by a fitness function, the population is ranked, the
/// best [`keep_amount`] individuals survive unchanged and
/// the rest are replaced by mutated clones of survivors.
///
/// Deserialized trainers are checked like constructed ones,
/// and get a fresh entropy-seeded generator.
///
/// [`keep_amount`]: TrainerConfig::keep_amount
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "TrainerState<G>")]
pub struct EvolutionalTrainer<G> {
    individuals: Vec<Individual<G>>,
    keep_amount: usize,
    mutation_rate: f64,
    highscore: Option<f64>,
    last_scores: Vec<f64>,
    generation: usize,
    #[serde(skip, default = "fresh_rng")]
    rng: StdRng,
}

fn fresh_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Serialized form of an [`EvolutionalTrainer`],
/// validated before a trainer is built from it.
#[derive(Deserialize)]
struct TrainerState<G> {
    individuals: Vec<Individual<G>>,
    keep_amount: usize,
    mutation_rate: f64,
    highscore: Option<f64>,
    last_scores: Vec<f64>,
    generation: usize,
}

impl<G> TryFrom<TrainerState<G>> for EvolutionalTrainer<G> {
    type Error = ConfigurationError;

    fn try_from(state: TrainerState<G>) -> Result<Self, Self::Error> {
        TrainerConfig {
            population_size: state.individuals.len(),
            keep_amount: state.keep_amount,
            mutation_rate: state.mutation_rate,
            randomize: false,
        }
        .validate()?;
        if let Some(index) = state
            .individuals
            .iter()
            .position(|i| i.is_tested() && i.score().is_none())
        {
            return Err(ConfigurationError::UnscoredIndividual(index));
        }

        Ok(EvolutionalTrainer {
            individuals: state.individuals,
            keep_amount: state.keep_amount,
            mutation_rate: state.mutation_rate,
            highscore: state.highscore,
            last_scores: state.last_scores,
            generation: state.generation,
            rng: fresh_rng(),
        })
    }
}

impl<G: Evolvable> EvolutionalTrainer<G> {
    /// Creates a new trainer holding `population_size`
    /// copies of `seed`, randomized if `randomize` is set.
    /// The mutation rate starts at 0.
    ///
    /// # Errors
    /// Returns an error if `population_size < 2`,
    /// `keep_amount == 0` or `keep_amount >= population_size`.
    ///
    /// # Examples
    /// ```
    /// use neuroevo::EvolutionalTrainer;
    /// use neuroevo_nn::NeuralNetwork;
    ///
    /// let seed = NeuralNetwork::with_default_activation(&[9, 18, 9]).unwrap();
    /// let trainer = EvolutionalTrainer::new(&seed, 10, 5, true).unwrap();
    /// assert_eq!(trainer.population_size(), 10);
    ///
    /// assert!(EvolutionalTrainer::new(&seed, 1, 0, true).is_err());
    /// assert!(EvolutionalTrainer::new(&seed, 10, 10, true).is_err());
    /// ```
    pub fn new(
        seed: &G,
        population_size: usize,
        keep_amount: usize,
        randomize: bool,
    ) -> Result<EvolutionalTrainer<G>, ConfigurationError> {
        Self::from_config(
            seed,
            &TrainerConfig {
                population_size,
                keep_amount,
                randomize,
                ..TrainerConfig::zero()
            },
        )
    }

    /// Creates a new trainer from a configuration,
    /// drawing randomness from system entropy.
    ///
    /// # Errors
    /// Returns an error if the configuration doesn't
    /// pass [`TrainerConfig::validate`].
    pub fn from_config(
        seed: &G,
        config: &TrainerConfig,
    ) -> Result<EvolutionalTrainer<G>, ConfigurationError> {
        Self::from_config_with_rng(seed, config, StdRng::from_entropy())
    }

    /// Creates a new trainer from a configuration, using
    /// `rng` for seeding, selection and mutation. Passing
    /// a seeded generator makes evolution reproducible.
    ///
    /// # Errors
    /// Returns an error if the configuration doesn't
    /// pass [`TrainerConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// use neuroevo::{EvolutionalTrainer, TrainerConfig};
    /// use neuroevo_nn::NeuralNetwork;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let seed = NeuralNetwork::with_default_activation(&[2, 1]).unwrap();
    /// let config = TrainerConfig {
    ///     population_size: 6,
    ///     keep_amount: 2,
    ///     mutation_rate: 0.2,
    ///     randomize: true,
    /// };
    /// let first = EvolutionalTrainer::from_config_with_rng(&seed, &config, StdRng::seed_from_u64(7)).unwrap();
    /// let second = EvolutionalTrainer::from_config_with_rng(&seed, &config, StdRng::seed_from_u64(7)).unwrap();
    /// assert!(first.genomes().eq(second.genomes()));
    /// ```
    pub fn from_config_with_rng(
        seed: &G,
        config: &TrainerConfig,
        mut rng: StdRng,
    ) -> Result<EvolutionalTrainer<G>, ConfigurationError> {
        config.validate()?;
        let individuals = (0..config.population_size)
            .map(|_| {
                let mut genome = seed.clone();
                if config.randomize {
                    genome.randomize(SEED_RANDOMIZATION_RANGE, &mut rng);
                }
                Individual::new(genome)
            })
            .collect();

        Ok(EvolutionalTrainer {
            individuals,
            keep_amount: config.keep_amount,
            mutation_rate: config.mutation_rate,
            highscore: None,
            last_scores: vec![],
            generation: 0,
            rng,
        })
    }

    /// Runs a generation: scores every untested individual
    /// with `fitness`, ranks the population, keeps the elite
    /// and regenerates the rest. Returns the generation's
    /// highscore.
    ///
    /// If `concurrent` is set, evaluations run as parallel
    /// tasks and all of them finish before ranking begins;
    /// otherwise they run one after another in population order.
    ///
    /// # Errors
    /// Returns an error if `fitness` panicked or returned a
    /// non-finite score for any individual. See
    /// [`try_do_iteration`] for the state the population is
    /// left in.
    ///
    /// [`try_do_iteration`]: EvolutionalTrainer::try_do_iteration
    ///
    /// # Examples
    /// ```
    /// use neuroevo::EvolutionalTrainer;
    /// use neuroevo_nn::{Matrix, NeuralNetwork};
    ///
    /// let seed = NeuralNetwork::with_default_activation(&[1, 4, 1]).unwrap();
    /// let mut trainer = EvolutionalTrainer::new(&seed, 20, 5, true).unwrap();
    /// trainer.set_mutation_rate(0.2).unwrap();
    ///
    /// // Networks whose output at 1.0 is closer to 1.0 score higher.
    /// let fitness = |network: &NeuralNetwork| {
    ///     let output = network.evaluate(&Matrix::column(&[1.0])).unwrap();
    ///     -(output.get(0, 0) - 1.0).abs()
    /// };
    ///
    /// let first = trainer.do_iteration(fitness, true).unwrap();
    /// for _ in 0..20 {
    ///     trainer.do_iteration(fitness, true).unwrap();
    /// }
    /// // Elites are never lost, so the highscore can't decrease.
    /// assert!(trainer.highscore().unwrap() >= first);
    /// ```
    pub fn do_iteration<F>(
        &mut self,
        fitness: F,
        concurrent: bool,
    ) -> Result<f64, EvaluationError<Infallible>>
    where
        F: Fn(&G) -> f64 + Sync,
        G: Send + Sync,
    {
        self.try_do_iteration(|genome| Ok(fitness(genome)), concurrent)
    }

    /// Runs a generation with a fallible fitness function.
    /// Returns the generation's highscore.
    ///
    /// Each evaluation reads only its own genome and writes
    /// only its own individual's score, so one failing
    /// evaluation never affects another.
    ///
    /// # Errors
    /// Returns an error listing every individual whose
    /// evaluation returned an error, returned a non-finite
    /// score, or panicked. The error is returned only after
    /// every evaluation has finished. In that case the
    /// generation is not completed: successfully evaluated
    /// individuals keep their scores, failed ones remain
    /// untested, and the population is neither ranked nor
    /// regenerated, so calling this again re-evaluates only
    /// the failed individuals.
    ///
    /// # Examples
    /// ```
    /// use neuroevo::{EvolutionalTrainer, FailureCause};
    /// use neuroevo_nn::NeuralNetwork;
    ///
    /// let seed = NeuralNetwork::with_default_activation(&[1, 1]).unwrap();
    /// let mut trainer = EvolutionalTrainer::new(&seed, 4, 2, true).unwrap();
    ///
    /// let error = trainer
    ///     .try_do_iteration(|network| {
    ///         let weight = network.weights()[0].get(0, 0);
    ///         if weight < 0.0 { Err("negative weight") } else { Ok(weight) }
    ///     }, false);
    /// if let Err(error) = error {
    ///     for failure in error.failures() {
    ///         assert!(matches!(failure.cause, FailureCause::Fitness("negative weight")));
    ///     }
    /// }
    /// ```
    pub fn try_do_iteration<F, E>(
        &mut self,
        fitness: F,
        concurrent: bool,
    ) -> Result<f64, EvaluationError<E>>
    where
        F: Fn(&G) -> Result<f64, E> + Sync,
        E: Send,
        G: Send + Sync,
    {
        let attempted = self.individuals.iter().filter(|i| !i.is_tested()).count();
        let failures = self.evaluate(&fitness, concurrent);
        if !failures.is_empty() {
            log::warn!(
                "generation {}: {} of {} fitness evaluations failed",
                self.generation,
                failures.len(),
                attempted
            );
            return Err(EvaluationError::new(failures, attempted));
        }

        self.sort_by_decreasing_score();
        self.last_scores = self.individuals.iter().filter_map(Individual::score).collect();
        let highscore = self.individuals[0]
            .score()
            .expect("evaluated population contains an unscored individual");
        self.highscore = Some(highscore);
        self.regenerate();
        self.generation += 1;

        log::debug!(
            "generation {} complete: highscore {}, {} individuals evaluated",
            self.generation,
            highscore,
            attempted
        );
        Ok(highscore)
    }

    /// Scores every untested individual, returning
    /// the failed evaluations in population order.
    fn evaluate<F, E>(&mut self, fitness: &F, concurrent: bool) -> Vec<UnitFailure<E>>
    where
        F: Fn(&G) -> Result<f64, E> + Sync,
        E: Send,
        G: Send + Sync,
    {
        let evaluate_pending = |(index, individual): (usize, &mut Individual<G>)| {
            evaluate_individual(fitness, individual)
                .err()
                .map(|cause| UnitFailure { index, cause })
        };
        let pending = self
            .individuals
            .iter_mut()
            .enumerate()
            .filter(|(_, individual)| !individual.is_tested());

        if concurrent {
            pending
                .collect::<Vec<_>>()
                .into_par_iter()
                .filter_map(evaluate_pending)
                .collect()
        } else {
            pending.filter_map(evaluate_pending).collect()
        }
    }

    /// Replaces every non-elite individual with a mutated
    /// clone of an elite, chosen with a bias towards the best.
    fn regenerate(&mut self) {
        for i in self.keep_amount..self.individuals.len() {
            let parent = select_elite_index(self.keep_amount, &mut self.rng);
            let mut child = self.individuals[parent].genome().clone();
            child.mutate(self.mutation_rate, &mut self.rng);
            self.individuals[i] = Individual::new(child);
        }
    }

    /// Sorts the population by score in descending order,
    /// keeping the current order of equal scores.
    /// Unscored individuals are placed last.
    fn sort_by_decreasing_score(&mut self) {
        self.individuals.sort_by(|i1, i2| {
            i2.score()
                .partial_cmp(&i1.score())
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Marks every individual as untested, so that all
    /// of them are re-evaluated in the next generation.
    /// Should be called whenever the meaning of the fitness
    /// function changes, e.g. when opponents are replaced.
    ///
    /// # Examples
    /// ```
    /// use neuroevo::EvolutionalTrainer;
    /// use neuroevo_nn::NeuralNetwork;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// let seed = NeuralNetwork::with_default_activation(&[1, 1]).unwrap();
    /// let mut trainer = EvolutionalTrainer::new(&seed, 10, 4, true).unwrap();
    /// let calls = AtomicUsize::new(0);
    /// let fitness = |_: &NeuralNetwork| {
    ///     calls.fetch_add(1, Ordering::SeqCst);
    ///     1.0
    /// };
    ///
    /// trainer.do_iteration(&fitness, true).unwrap();
    /// trainer.do_iteration(&fitness, true).unwrap();
    /// // The elite was tested in the first generation.
    /// assert_eq!(calls.load(Ordering::SeqCst), 10 + 6);
    ///
    /// trainer.reset_tested();
    /// trainer.do_iteration(&fitness, true).unwrap();
    /// assert_eq!(calls.load(Ordering::SeqCst), 10 + 6 + 10);
    /// ```
    pub fn reset_tested(&mut self) {
        self.individuals.iter_mut().for_each(Individual::reset_tested);
    }

    /// Ranks the population and returns a copy
    /// of the best-scoring genome.
    pub fn best(&mut self) -> G {
        self.sort_by_decreasing_score();
        self.individuals[0].genome().clone()
    }

    /// Returns the best genome of the last completed
    /// generation, or `None` if no generation has completed.
    pub fn champion(&self) -> Option<&G> {
        self.highscore.map(|_| self.individuals[0].genome())
    }

    /// Sets the mutation rate used for regeneration.
    ///
    /// # Errors
    /// Returns an error if the rate is negative or not finite,
    /// leaving the current rate unchanged.
    pub fn set_mutation_rate(&mut self, mutation_rate: f64) -> Result<(), ConfigurationError> {
        validate_mutation_rate(mutation_rate)?;
        self.mutation_rate = mutation_rate;
        Ok(())
    }
}

impl<G> EvolutionalTrainer<G> {
    /// Returns the highscore of the last completed
    /// generation, or `None` if no generation has completed.
    pub fn highscore(&self) -> Option<f64> {
        self.highscore
    }

    /// Returns every score of the last completed
    /// generation, in descending order.
    pub fn last_scores(&self) -> &[f64] {
        &self.last_scores
    }

    /// Returns the mutation rate used for regeneration.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Returns the number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the number of individuals in the population.
    pub fn population_size(&self) -> usize {
        self.individuals.len()
    }

    /// Returns the number of individuals which
    /// survive each generation unchanged.
    pub fn keep_amount(&self) -> usize {
        self.keep_amount
    }

    /// Returns an iterator over all current genomes,
    /// in population order. After a completed generation
    /// the first [`keep_amount`] are the elite.
    ///
    /// [`keep_amount`]: EvolutionalTrainer::keep_amount
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.individuals.iter().map(Individual::genome)
    }

    /// Returns an iterator over all current individuals,
    /// in population order.
    pub fn individuals(&self) -> impl Iterator<Item = &Individual<G>> {
        self.individuals.iter()
    }
}

/// Picks the index of a parent among `keep_amount` elites as
/// `floor(U1 * U2 * keep_amount)`, with `U1, U2` uniform in
/// [0, 1). The product of two uniforms is concentrated near 0,
/// which biases selection towards the best elites.
///
/// # Examples
/// ```
/// use neuroevo::select_elite_index;
///
/// let mut rng = rand::thread_rng();
/// assert!(select_elite_index(5, &mut rng) < 5);
/// ```
pub fn select_elite_index<R: Rng + ?Sized>(keep_amount: usize, rng: &mut R) -> usize {
    debug_assert!(keep_amount > 0, "no elite to select from");
    let product = rng.gen::<f64>() * rng.gen::<f64>();
    ((product * keep_amount as f64).floor() as usize).min(keep_amount.saturating_sub(1))
}

/// Scores a single individual, catching any panic
/// raised by the fitness function.
fn evaluate_individual<G, F, E>(
    fitness: &F,
    individual: &mut Individual<G>,
) -> Result<(), FailureCause<E>>
where
    F: Fn(&G) -> Result<f64, E>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| fitness(individual.genome())));
    match outcome {
        Ok(Ok(score)) if score.is_finite() => {
            individual.set_score(score);
            Ok(())
        }
        Ok(Ok(score)) => Err(FailureCause::NonFiniteScore(score)),
        Ok(Err(e)) => Err(FailureCause::Fitness(e)),
        Err(payload) => Err(FailureCause::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic payload")
    }
}
