use super::ActivationFunction;
use crate::errors::{Error, Result};
use crate::Matrix;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A layered feedforward neural network.
///
/// Layer `l` maps the `neurons[l]` values of the previous
/// layer to `neurons[l + 1]` values as
/// `φ(weights[l] × input + biases[l])`, with a single
/// activation function `φ` shared by all layers.
///
/// The network keeps the activations computed by the last
/// call to [`feedforward`]; they are unset until then.
///
/// [`feedforward`]: NeuralNetwork::feedforward
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NeuralNetwork {
    activation_function: ActivationFunction,
    neurons: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
    activations: Vec<Option<Matrix>>,
}

impl NeuralNetwork {
    /// Returns a network with the given neuron count per
    /// layer (input layer first) and zero-valued weights
    /// and biases.
    ///
    /// # Errors
    /// Returns an error if fewer than two neuron counts are
    /// given or any of them is 0.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::{ActivationFunction, NeuralNetwork};
    ///
    /// let network = NeuralNetwork::new(ActivationFunction::Tanh, &[9, 18, 9]).unwrap();
    /// assert_eq!(network.layer_count(), 2);
    /// assert_eq!(network.weights()[0].shape(), (18, 9));
    /// assert_eq!(network.biases()[1].shape(), (9, 1));
    ///
    /// assert!(NeuralNetwork::new(ActivationFunction::Tanh, &[9]).is_err());
    /// assert!(NeuralNetwork::new(ActivationFunction::Tanh, &[9, 0, 9]).is_err());
    /// ```
    pub fn new(activation_function: ActivationFunction, neurons: &[usize]) -> Result<NeuralNetwork> {
        if neurons.len() < 2 || neurons.contains(&0) {
            return Err(Error::InvalidTopology(neurons.to_vec()));
        }
        Ok(NeuralNetwork {
            activation_function,
            neurons: neurons.to_vec(),
            weights: neurons
                .windows(2)
                .map(|pair| Matrix::new(pair[1], pair[0]))
                .collect(),
            biases: neurons[1..].iter().map(|n| Matrix::new(*n, 1)).collect(),
            activations: vec![None; neurons.len() - 1],
        })
    }

    /// Same as [`new`], using the default
    /// [`SoftsignNorm`] activation function.
    ///
    /// [`new`]: NeuralNetwork::new
    /// [`SoftsignNorm`]: ActivationFunction::SoftsignNorm
    pub fn with_default_activation(neurons: &[usize]) -> Result<NeuralNetwork> {
        Self::new(ActivationFunction::default(), neurons)
    }

    /// Builds a network from existing layers, deriving the
    /// neuron counts from the weight matrices' shapes.
    ///
    /// # Errors
    /// Returns an error if there are no layers, the numbers of
    /// weight and bias matrices differ, a bias is not a column
    /// matching its weight's rows, or consecutive weight
    /// matrices don't chain.
    pub fn from_layers(
        activation_function: ActivationFunction,
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
    ) -> Result<NeuralNetwork> {
        let first = weights
            .first()
            .ok_or_else(|| Error::Parse("network has no layers".into()))?;
        if weights.len() != biases.len() {
            return Err(Error::Parse(format!(
                "network has {} weight matrices but {} bias matrices",
                weights.len(),
                biases.len()
            )));
        }

        let mut neurons = vec![first.cols()];
        for (layer, (weight, bias)) in weights.iter().zip(&biases).enumerate() {
            let inputs = neurons[layer];
            if weight.cols() != inputs {
                return Err(Error::Parse(format!(
                    "layer {} takes {} inputs but the previous layer has {} neurons",
                    layer,
                    weight.cols(),
                    inputs
                )));
            }
            if bias.shape() != (weight.rows(), 1) {
                return Err(Error::Parse(format!(
                    "layer {} has {} neurons but a {}x{} bias matrix",
                    layer,
                    weight.rows(),
                    bias.rows(),
                    bias.cols()
                )));
            }
            neurons.push(weight.rows());
        }

        Ok(NeuralNetwork {
            activation_function,
            neurons,
            activations: vec![None; weights.len()],
            weights,
            biases,
        })
    }

    /// Replaces every weight and bias with an independent
    /// uniform sample in `[-range, range]`.
    ///
    /// # Panics
    /// Panics if `range` is negative or not finite.
    pub fn randomize<R: Rng + ?Sized>(&mut self, range: f64, rng: &mut R) {
        for matrix in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            *matrix = matrix.map(|_, _, _| rng.gen_range(-range..=range));
        }
    }

    /// Replaces every weight and bias `x` with
    /// `x + ((U * 2 - 1) * mutation_rate) * x`, for an
    /// independent uniform `U` in [0, 1) per value.
    ///
    /// Zero-valued parameters stay at zero, and a
    /// `mutation_rate` of 0 leaves the network unchanged.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::NeuralNetwork;
    ///
    /// let mut rng = rand::thread_rng();
    /// let mut network = NeuralNetwork::with_default_activation(&[3, 2]).unwrap();
    /// network.randomize(1.0, &mut rng);
    ///
    /// let mut mutated = network.clone();
    /// mutated.mutate(0.0, &mut rng);
    /// assert_eq!(mutated, network);
    /// ```
    pub fn mutate<R: Rng + ?Sized>(&mut self, mutation_rate: f64, rng: &mut R) {
        for matrix in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            *matrix = matrix.map(|x, _, _| x + ((rng.gen::<f64>() * 2.0 - 1.0) * mutation_rate) * x);
        }
    }

    /// Runs the network on a column vector of `neurons[0]`
    /// inputs, stores every layer's activations and returns
    /// a copy of the output layer's activations.
    ///
    /// # Errors
    /// Returns a [`DimensionMismatch`] error if `inputs`
    /// is not a `neurons[0] × 1` matrix.
    ///
    /// [`DimensionMismatch`]: Error::DimensionMismatch
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::{ActivationFunction, Matrix, NeuralNetwork};
    ///
    /// let mut network = NeuralNetwork::new(ActivationFunction::Sigmoid, &[2, 3, 1]).unwrap();
    /// let output = network.feedforward(&Matrix::column(&[0.3, -0.7])).unwrap();
    ///
    /// // A network of zeros outputs φ(0) everywhere.
    /// assert_eq!(output, Matrix::column(&[0.5]));
    /// assert_eq!(network.activations()[0], Some(Matrix::column(&[0.5, 0.5, 0.5])));
    ///
    /// assert!(network.feedforward(&Matrix::column(&[1.0])).is_err());
    /// ```
    pub fn feedforward(&mut self, inputs: &Matrix) -> Result<Matrix> {
        let mut current = inputs.clone();
        for layer in 0..self.layer_count() {
            current = self.activate_layer(layer, &current)?;
            self.activations[layer] = Some(current.clone());
        }
        Ok(current)
    }

    /// Runs the network like [`feedforward`], without
    /// storing the intermediate activations.
    ///
    /// [`feedforward`]: NeuralNetwork::feedforward
    ///
    /// # Errors
    /// Returns a [`DimensionMismatch`] error if `inputs`
    /// is not a `neurons[0] × 1` matrix.
    ///
    /// [`DimensionMismatch`]: Error::DimensionMismatch
    pub fn evaluate(&self, inputs: &Matrix) -> Result<Matrix> {
        let mut current = inputs.clone();
        for layer in 0..self.layer_count() {
            current = self.activate_layer(layer, &current)?;
        }
        Ok(current)
    }

    fn activate_layer(&self, layer: usize, input: &Matrix) -> Result<Matrix> {
        let function = self.activation_function;
        Ok(self.weights[layer]
            .multiply(input)?
            .add(&self.biases[layer])?
            .map(|x, _, _| function.apply(x)))
    }

    pub fn activation_function(&self) -> ActivationFunction {
        self.activation_function
    }

    /// Returns the neuron count of every layer,
    /// input layer first.
    pub fn neurons(&self) -> &[usize] {
        &self.neurons
    }

    /// Returns the number of weight layers,
    /// one less than the number of neuron counts.
    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    /// Returns the activations stored by the last call to
    /// [`feedforward`], or `None` for each layer if it was
    /// never called.
    ///
    /// [`feedforward`]: NeuralNetwork::feedforward
    pub fn activations(&self) -> &[Option<Matrix>] {
        &self.activations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_network(activation_function: ActivationFunction, neurons: &[usize]) -> NeuralNetwork {
        let mut network = NeuralNetwork::new(activation_function, neurons).unwrap();
        network.randomize(1.0, &mut StdRng::seed_from_u64(9));
        network
    }

    fn parameters(network: &NeuralNetwork) -> Vec<f64> {
        network
            .weights()
            .iter()
            .chain(network.biases())
            .flat_map(|m| m.values().to_vec())
            .collect()
    }

    #[test]
    fn topology() {
        let network = NeuralNetwork::with_default_activation(&[9, 18, 18, 9]).unwrap();
        assert_eq!(network.neurons(), &[9, 18, 18, 9]);
        assert_eq!(network.activation_function(), ActivationFunction::SoftsignNorm);
        let shapes: Vec<_> = network.weights().iter().map(Matrix::shape).collect();
        assert_eq!(shapes, [(18, 9), (18, 18), (9, 18)]);
        assert!(network.biases().iter().all(|b| b.cols() == 1));
        assert!(network.activations().iter().all(Option::is_none));
        assert!(parameters(&network).iter().all(|p| *p == 0.0));
    }

    #[test]
    fn invalid_topology() {
        assert_eq!(
            NeuralNetwork::new(ActivationFunction::Identity, &[]),
            Err(Error::InvalidTopology(vec![]))
        );
        assert_eq!(
            NeuralNetwork::new(ActivationFunction::Identity, &[3, 0]),
            Err(Error::InvalidTopology(vec![3, 0]))
        );
    }

    #[test]
    fn zero_identity_network_outputs_zeros() {
        let mut network = NeuralNetwork::new(ActivationFunction::Identity, &[4, 5, 3]).unwrap();
        for inputs in [[1.0, -2.0, 3.0, 4.0], [100.0, 0.5, -0.5, 7.0]] {
            let output = network.feedforward(&Matrix::column(&inputs)).unwrap();
            assert_eq!(output, Matrix::new(3, 1));
        }
    }

    #[test]
    fn feedforward_computes_layers() {
        let weights = vec![
            Matrix::from_rows(vec![vec![1.0, 2.0], vec![-1.0, 0.5]]).unwrap(),
            Matrix::from_rows(vec![vec![3.0, -1.0]]).unwrap(),
        ];
        let biases = vec![Matrix::column(&[0.5, 0.0]), Matrix::column(&[-1.0])];
        let mut network =
            NeuralNetwork::from_layers(ActivationFunction::Identity, weights, biases).unwrap();

        let output = network.feedforward(&Matrix::column(&[1.0, 2.0])).unwrap();
        // Hidden: [1 + 4 + 0.5, -1 + 1 + 0] = [5.5, 0]
        assert_eq!(network.activations()[0], Some(Matrix::column(&[5.5, 0.0])));
        // Output: 3 * 5.5 - 0 - 1 = 15.5
        assert_eq!(output, Matrix::column(&[15.5]));
        assert_eq!(network.activations()[1], Some(output));
    }

    #[test]
    fn feedforward_input_mismatch() {
        let mut network = random_network(ActivationFunction::Tanh, &[3, 2]);
        assert!(matches!(
            network.feedforward(&Matrix::column(&[1.0, 2.0])),
            Err(Error::DimensionMismatch { left: (2, 3), right: (2, 1), .. })
        ));
        assert!(network.feedforward(&Matrix::new(3, 2)).is_err());
    }

    #[test]
    fn evaluate_matches_feedforward_without_caching() {
        let mut network = random_network(ActivationFunction::Sigmoid, &[3, 4, 2]);
        let inputs = Matrix::column(&[0.1, -0.4, 0.9]);
        let evaluated = network.evaluate(&inputs).unwrap();
        assert!(network.activations().iter().all(Option::is_none));
        assert_eq!(network.feedforward(&inputs).unwrap(), evaluated);
    }

    #[test]
    fn randomize_in_range() {
        let mut network = NeuralNetwork::with_default_activation(&[5, 6, 2]).unwrap();
        network.randomize(0.3, &mut StdRng::seed_from_u64(1));
        let parameters = parameters(&network);
        assert!(parameters.iter().all(|p| p.abs() <= 0.3));
        assert!(parameters.iter().any(|p| *p != 0.0));
    }

    #[test]
    fn zero_mutation_rate_is_exact_clone() {
        let network = random_network(ActivationFunction::Tanh, &[4, 4, 4]);
        let mut clone = network.clone();
        clone.mutate(0.0, &mut StdRng::seed_from_u64(2));
        assert_eq!(parameters(&clone), parameters(&network));
    }

    #[test]
    fn mutation_is_bounded_and_multiplicative() {
        let network = random_network(ActivationFunction::Tanh, &[4, 6, 3]);
        let mut mutated = network.clone();
        mutated.mutate(0.2, &mut StdRng::seed_from_u64(3));
        let before = parameters(&network);
        let after = parameters(&mutated);
        assert_ne!(before, after);
        for (x, y) in before.iter().zip(&after) {
            assert!((y - x).abs() <= 0.2 * x.abs() + 1e-12);
        }

        let mut zeros = NeuralNetwork::with_default_activation(&[2, 2]).unwrap();
        zeros.mutate(0.5, &mut StdRng::seed_from_u64(4));
        assert!(parameters(&zeros).iter().all(|p| *p == 0.0));
    }

    #[test]
    fn clone_is_deep_and_keeps_unset_activations() {
        let mut network = random_network(ActivationFunction::Softsign, &[2, 3, 1]);
        let untouched = network.clone();
        assert!(untouched.activations().iter().all(Option::is_none));

        network.feedforward(&Matrix::column(&[0.5, 0.5])).unwrap();
        let copy = network.clone();
        assert_eq!(copy, network);

        network.mutate(0.5, &mut StdRng::seed_from_u64(5));
        assert_ne!(parameters(&copy), parameters(&network));
        assert!(copy.activations().iter().all(Option::is_some));
    }

    #[test]
    fn from_layers_rejects_inconsistent_shapes() {
        let identity = ActivationFunction::Identity;
        assert!(NeuralNetwork::from_layers(identity, vec![], vec![]).is_err());
        assert!(NeuralNetwork::from_layers(
            identity,
            vec![Matrix::new(2, 3)],
            vec![Matrix::new(3, 1)]
        )
        .is_err());
        assert!(NeuralNetwork::from_layers(
            identity,
            vec![Matrix::new(2, 3), Matrix::new(1, 3)],
            vec![Matrix::new(2, 1), Matrix::new(1, 1)]
        )
        .is_err());
        assert!(NeuralNetwork::from_layers(
            identity,
            vec![Matrix::new(2, 3)],
            vec![Matrix::new(2, 1), Matrix::new(1, 1)]
        )
        .is_err());

        let network = NeuralNetwork::from_layers(
            identity,
            vec![Matrix::new(2, 3), Matrix::new(4, 2)],
            vec![Matrix::new(2, 1), Matrix::new(4, 1)],
        )
        .unwrap();
        assert_eq!(network.neurons(), &[3, 2, 4]);
    }
}
