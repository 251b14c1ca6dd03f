use std::error::Error;
use std::fmt;

/// An error type indicating invalid trainer
/// construction parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    /// Fewer than two individuals were requested.
    PopulationTooSmall(usize),
    /// No individual would survive a generation.
    NoSurvivors,
    /// Every individual would survive a generation,
    /// leaving none to be regenerated.
    KeepAmountTooLarge {
        keep_amount: usize,
        population_size: usize,
    },
    /// The mutation rate is negative, NaN or infinite.
    InvalidMutationRate(f64),
    /// A restored individual is marked as tested
    /// but holds no score.
    UnscoredIndividual(usize),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopulationTooSmall(size) => write!(
                f,
                "population size must be at least 2, got {}",
                size
            ),
            Self::NoSurvivors => write!(f, "keep amount must be at least 1"),
            Self::KeepAmountTooLarge {
                keep_amount,
                population_size,
            } => write!(
                f,
                "keep amount {} must be less than the population size {}",
                keep_amount, population_size
            ),
            Self::InvalidMutationRate(rate) => write!(
                f,
                "mutation rate must be finite and non-negative, got {}",
                rate
            ),
            Self::UnscoredIndividual(index) => write!(
                f,
                "individual {} is marked as tested but has no score",
                index
            ),
        }
    }
}

impl Error for ConfigurationError {}

/// The reason a single fitness evaluation failed.
#[derive(Debug)]
pub enum FailureCause<E> {
    /// The fitness function returned an error.
    Fitness(E),
    /// The fitness function returned NaN or an infinity,
    /// which cannot be ranked.
    NonFiniteScore(f64),
    /// The fitness function panicked. Holds the panic message.
    Panicked(String),
}

impl<E: fmt::Display> fmt::Display for FailureCause<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fitness(e) => write!(f, "fitness function failed: {}", e),
            Self::NonFiniteScore(score) => write!(f, "non-finite score {}", score),
            Self::Panicked(message) => write!(f, "fitness function panicked: {}", message),
        }
    }
}

/// A failed evaluation of the individual at `index`.
#[derive(Debug)]
pub struct UnitFailure<E> {
    pub index: usize,
    pub cause: FailureCause<E>,
}

/// An error type indicating that one or more fitness
/// evaluations of a generation failed.
///
/// Every pending evaluation has run to completion by
/// the time this error is returned; individuals that
/// were scored successfully keep their scores, while
/// the failed ones remain untested.
#[derive(Debug)]
pub struct EvaluationError<E> {
    failures: Vec<UnitFailure<E>>,
    attempted: usize,
}

impl<E> EvaluationError<E> {
    pub(crate) fn new(failures: Vec<UnitFailure<E>>, attempted: usize) -> EvaluationError<E> {
        EvaluationError { failures, attempted }
    }

    /// Returns the failed evaluations, in population order.
    pub fn failures(&self) -> &[UnitFailure<E>] {
        &self.failures
    }

    /// Returns the number of evaluations that were attempted.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Consumes the error, returning the failed evaluations.
    pub fn into_failures(self) -> Vec<UnitFailure<E>> {
        self.failures
    }
}

impl<E: fmt::Display> fmt::Display for EvaluationError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} fitness evaluations failed",
            self.failures.len(),
            self.attempted
        )?;
        for failure in &self.failures {
            write!(f, "; individual {}: {}", failure.index, failure.cause)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> Error for EvaluationError<E> {}
