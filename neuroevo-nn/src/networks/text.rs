use super::{ActivationFunction, NeuralNetwork};
use crate::errors::{Error, Result};
use crate::matrix::innermost_groups;
use crate::Matrix;

use std::fmt;
use std::str::FromStr;

impl fmt::Display for NeuralNetwork {
    /// Writes the network as `kind:{W;B}{W;B}...`, with one
    /// braced group per layer holding its weight and
    /// bias matrices. Stored activations are not written.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.activation_function())?;
        for (weights, biases) in self.weights().iter().zip(self.biases()) {
            write!(f, "{{{};{}}}", weights, biases)?;
        }
        Ok(())
    }
}

impl FromStr for NeuralNetwork {
    type Err = Error;

    /// Parses a network from its text form.
    ///
    /// # Errors
    /// Returns an [`UnknownActivation`] error if the activation
    /// function name is not recognized, and a [`Parse`] error
    /// if the text is otherwise malformed or the layers'
    /// shapes are inconsistent.
    ///
    /// [`UnknownActivation`]: Error::UnknownActivation
    /// [`Parse`]: Error::Parse
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::{ActivationFunction, NeuralNetwork};
    ///
    /// let network: NeuralNetwork = "tanh:{[[0.5, -1.0]];[[0.25]]}".parse().unwrap();
    /// assert_eq!(network.activation_function(), ActivationFunction::Tanh);
    /// assert_eq!(network.neurons(), &[2, 1]);
    /// assert_eq!(network.to_string(), "tanh:{[[0.5, -1.0]];[[0.25]]}");
    ///
    /// assert!("tanh".parse::<NeuralNetwork>().is_err());
    /// assert!("tanh:".parse::<NeuralNetwork>().is_err());
    /// assert!("relu:{[[1.0]];[[1.0]]}".parse::<NeuralNetwork>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<NeuralNetwork> {
        let (kind, layers) = s
            .split_once(':')
            .ok_or_else(|| Error::Parse("missing ':' after the activation function".into()))?;
        let activation_function = kind.trim().parse::<ActivationFunction>()?;

        let groups = innermost_groups(layers, '{', '}');
        if groups.is_empty() {
            return Err(Error::Parse("network has no layers".into()));
        }

        let mut weights = Vec::with_capacity(groups.len());
        let mut biases = Vec::with_capacity(groups.len());
        for (layer, group) in groups.into_iter().enumerate() {
            let mut parts = group.split(';');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(w), Some(b), None) => {
                    weights.push(w.parse::<Matrix>()?);
                    biases.push(b.parse::<Matrix>()?);
                }
                _ => {
                    return Err(Error::Parse(format!(
                        "layer {} must hold exactly one ';' between its weights and biases",
                        layer
                    )))
                }
            }
        }

        NeuralNetwork::from_layers(activation_function, weights, biases)
    }
}

impl TryFrom<String> for NeuralNetwork {
    type Error = Error;

    fn try_from(s: String) -> Result<NeuralNetwork> {
        s.parse()
    }
}

impl From<NeuralNetwork> for String {
    fn from(network: NeuralNetwork) -> String {
        network.to_string()
    }
}
