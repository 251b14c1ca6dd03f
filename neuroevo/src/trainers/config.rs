use super::ConfigurationError;

use serde::{Deserialize, Serialize};

/// Configuration data for trainer construction
/// and evolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Number of individuals in the population.
    /// Must be at least 2.
    pub population_size: usize,
    /// Top n of the population which is carried
    /// as-is into the next generation. Must be
    /// at least 1 and less than `population_size`.
    pub keep_amount: usize,
    /// Maximum relative magnitude of the perturbation
    /// applied to each parameter of a regenerated individual.
    pub mutation_rate: f64,
    /// Whether the seed's copies are randomized
    /// on construction.
    pub randomize: bool,
}

impl TrainerConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0 or `false`.
    ///
    /// # Note
    /// This value does not pass validation. It is meant
    /// as a way to abbreviate configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use neuroevo::TrainerConfig;
    ///
    /// let config = TrainerConfig {
    ///     population_size: 10,
    ///     keep_amount: 5,
    ///     ..TrainerConfig::zero()
    /// };
    /// assert!(config.validate().is_ok());
    /// assert!(TrainerConfig::zero().validate().is_err());
    /// ```
    pub const fn zero() -> TrainerConfig {
        TrainerConfig {
            population_size: 0,
            keep_amount: 0,
            mutation_rate: 0.0,
            randomize: false,
        }
    }

    /// Checks the configuration for values a trainer
    /// cannot be built from.
    ///
    /// # Errors
    /// Returns an error if the population has fewer than
    /// two individuals, if the keep amount is 0 or not less
    /// than the population size, or if the mutation rate is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.population_size < 2 {
            return Err(ConfigurationError::PopulationTooSmall(self.population_size));
        }
        if self.keep_amount == 0 {
            return Err(ConfigurationError::NoSurvivors);
        }
        if self.keep_amount >= self.population_size {
            return Err(ConfigurationError::KeepAmountTooLarge {
                keep_amount: self.keep_amount,
                population_size: self.population_size,
            });
        }
        validate_mutation_rate(self.mutation_rate)
    }
}

pub(super) fn validate_mutation_rate(mutation_rate: f64) -> Result<(), ConfigurationError> {
    if mutation_rate.is_finite() && mutation_rate >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidMutationRate(mutation_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(population_size: usize, keep_amount: usize) -> TrainerConfig {
        TrainerConfig {
            population_size,
            keep_amount,
            ..TrainerConfig::zero()
        }
    }

    #[test]
    fn validate() {
        assert_eq!(config(2, 1).validate(), Ok(()));
        assert_eq!(
            config(1, 0).validate(),
            Err(ConfigurationError::PopulationTooSmall(1))
        );
        assert_eq!(config(5, 0).validate(), Err(ConfigurationError::NoSurvivors));
        assert_eq!(
            config(5, 5).validate(),
            Err(ConfigurationError::KeepAmountTooLarge {
                keep_amount: 5,
                population_size: 5
            })
        );
        assert_eq!(
            TrainerConfig {
                mutation_rate: -0.1,
                ..config(5, 2)
            }
            .validate(),
            Err(ConfigurationError::InvalidMutationRate(-0.1))
        );
        assert!(TrainerConfig {
            mutation_rate: f64::NAN,
            ..config(5, 2)
        }
        .validate()
        .is_err());
    }

    #[test]
    fn serde_round_trip() {
        let config = TrainerConfig {
            mutation_rate: 0.2,
            randomize: true,
            ..config(10, 5)
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<TrainerConfig>(&json).unwrap(), config);
    }
}
