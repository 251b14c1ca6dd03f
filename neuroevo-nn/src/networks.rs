//! Feedforward networks and the activation
//! functions they apply between layers.

mod activation;
mod neural_network;
mod text;

pub use activation::*;
pub use neural_network::*;

use rand::Rng;

impl neuroevo::Evolvable for NeuralNetwork {
    fn randomize<R: Rng + ?Sized>(&mut self, range: f64, rng: &mut R) {
        NeuralNetwork::randomize(self, range, rng);
    }

    fn mutate<R: Rng + ?Sized>(&mut self, mutation_rate: f64, rng: &mut R) {
        NeuralNetwork::mutate(self, mutation_rate, rng);
    }
}
