//! # neuroevo-nn
//! Dense-matrix feedforward neural networks implementing the
//! [`neuroevo` crate](neuroevo)'s [`Evolvable`] trait.
//!
//! Provides:
//! - [`Matrix`]: a row-major `f64` matrix with shape-checked
//!   addition and multiplication.
//! - [`ActivationFunction`]: the element-wise functions applied
//!   after each layer.
//! - [`NeuralNetwork`]: a layered network of weight and bias
//!   matrices, with a compact text form used for persistence.
//!
//! [`Evolvable`]: neuroevo::Evolvable
//!
//! # Example usage: evolving a network towards a fixed output
//! ```
//! use neuroevo::EvolutionalTrainer;
//! use neuroevo_nn::{ActivationFunction, Matrix, NeuralNetwork};
//!
//! fn evaluate(network: &NeuralNetwork) -> f64 {
//!     let output = network.evaluate(&Matrix::column(&[1.0, 0.0])).unwrap();
//!     -(output.get(0, 0) - 0.8).abs()
//! }
//!
//! let seed = NeuralNetwork::new(ActivationFunction::Sigmoid, &[2, 4, 1]).unwrap();
//! let mut trainer = EvolutionalTrainer::new(&seed, 30, 6, true).unwrap();
//! trainer.set_mutation_rate(0.2).unwrap();
//!
//! let first = trainer.do_iteration(evaluate, false).unwrap();
//! for _ in 0..20 {
//!     trainer.do_iteration(evaluate, true).unwrap();
//! }
//! assert!(trainer.highscore().unwrap() >= first);
//!
//! // Networks are persisted in their text form.
//! let best = trainer.best();
//! let restored: NeuralNetwork = best.to_string().parse().unwrap();
//! assert_eq!(restored, best);
//! ```

mod errors;
pub mod matrix;
pub mod networks;

pub use errors::*;
pub use matrix::Matrix;
pub use networks::{ActivationFunction, NeuralNetwork};
