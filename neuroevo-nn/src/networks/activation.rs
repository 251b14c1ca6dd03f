use crate::errors::Error;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// The activation function applied element-wise
/// after each layer's linear transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    // x
    Identity,
    // 1 / (1 + exp(-x))
    Sigmoid,
    // tanh(x)
    Tanh,
    // x / (1 + |x|)
    Softsign,
    // 0.5 * x / (1 + |x|) + 0.5
    #[default]
    SoftsignNorm,
}

impl ActivationFunction {
    /// All available activation functions.
    pub const ALL: [ActivationFunction; 5] = [
        ActivationFunction::Identity,
        ActivationFunction::Sigmoid,
        ActivationFunction::Tanh,
        ActivationFunction::Softsign,
        ActivationFunction::SoftsignNorm,
    ];

    /// Returns φ(x).
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::ActivationFunction;
    ///
    /// assert_eq!(ActivationFunction::Sigmoid.apply(0.0), 0.5);
    /// assert_eq!(ActivationFunction::Softsign.apply(1.0), 0.5);
    /// assert_eq!(ActivationFunction::SoftsignNorm.apply(-1.0), 0.25);
    /// ```
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
            Self::Softsign => x / (1.0 + x.abs()),
            Self::SoftsignNorm => 0.5 * x / (1.0 + x.abs()) + 0.5,
        }
    }

    /// Returns the function's name in the text format.
    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::Softsign => "softsign",
            Self::SoftsignNorm => "softsign_norm",
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationFunction {
    type Err = Error;

    /// # Examples
    /// ```
    /// use neuroevo_nn::{ActivationFunction, Error};
    ///
    /// assert_eq!("tanh".parse::<ActivationFunction>(), Ok(ActivationFunction::Tanh));
    /// assert_eq!(
    ///     "relu".parse::<ActivationFunction>(),
    ///     Err(Error::UnknownActivation("relu".into()))
    /// );
    /// ```
    fn from_str(s: &str) -> Result<ActivationFunction, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|function| function.name() == s)
            .ok_or_else(|| Error::UnknownActivation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_at_zero() {
        assert_eq!(ActivationFunction::Sigmoid.apply(0.0), 0.5);
        assert_eq!(ActivationFunction::SoftsignNorm.apply(0.0), 0.5);
        assert_eq!(ActivationFunction::Identity.apply(0.0), 0.0);
        assert_eq!(ActivationFunction::Tanh.apply(0.0), 0.0);
        assert_eq!(ActivationFunction::Softsign.apply(0.0), 0.0);
    }

    #[test]
    fn bounded_ranges() {
        for x in (-50..=50).map(|x| x as f64 / 2.0) {
            let sigmoid = ActivationFunction::Sigmoid.apply(x);
            assert!((0.0..=1.0).contains(&sigmoid));
            let softsign = ActivationFunction::Softsign.apply(x);
            assert!(softsign > -1.0 && softsign < 1.0);
            let softsign_norm = ActivationFunction::SoftsignNorm.apply(x);
            assert!(softsign_norm > 0.0 && softsign_norm < 1.0);
            assert_eq!(ActivationFunction::Identity.apply(x), x);
        }
    }

    #[test]
    fn softsign_norm_is_rescaled_softsign() {
        for x in [-3.0, -0.5, 0.25, 8.0] {
            let expected = 0.5 * ActivationFunction::Softsign.apply(x) + 0.5;
            assert!((ActivationFunction::SoftsignNorm.apply(x) - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn names_round_trip() {
        for function in ActivationFunction::ALL {
            assert_eq!(function.to_string().parse::<ActivationFunction>(), Ok(function));
        }
    }

    #[test]
    fn unknown_names() {
        for name in ["", "Sigmoid", "relu", "softsign-norm"] {
            assert_eq!(
                name.parse::<ActivationFunction>(),
                Err(Error::UnknownActivation(name.to_string()))
            );
        }
    }

    #[test]
    fn default_is_softsign_norm() {
        assert_eq!(ActivationFunction::default(), ActivationFunction::SoftsignNorm);
    }

    #[test]
    fn serde_uses_text_names() {
        assert_eq!(
            serde_json::to_string(&ActivationFunction::SoftsignNorm).unwrap(),
            "\"softsign_norm\""
        );
    }
}
