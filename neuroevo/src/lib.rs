//! Elitist evolutionary training of fixed-topology genomes.
//!
//! An [`EvolutionalTrainer`] keeps a fixed-size population of
//! genomes. Each generation it scores the untested ones with a
//! user-supplied fitness function (optionally in parallel),
//! keeps the best performers and replaces the rest with mutated
//! clones of them. Genomes plug in through the [`Evolvable`]
//! trait; a dense feedforward neural network implementation is
//! supplied by the `neuroevo-nn` crate.
//!
//! # Example usage: evolving a network that doubles its input
//! ```
//! use neuroevo::{EvolutionalTrainer, TrainerConfig};
//! use neuroevo::logging::{EvolutionLogger, ReportingLevel};
//! use neuroevo_nn::{ActivationFunction, Matrix, NeuralNetwork};
//!
//! fn evaluate_doubling(network: &NeuralNetwork) -> f64 {
//!     let error: f64 = [-1.0, -0.5, 0.5, 1.0]
//!         .iter()
//!         .map(|x| {
//!             let output = network.evaluate(&Matrix::column(&[*x])).unwrap();
//!             (output.get(0, 0) - 2.0 * x).abs()
//!         })
//!         .sum();
//!     -error
//! }
//!
//! fn main() {
//!     let seed = NeuralNetwork::new(ActivationFunction::Identity, &[1, 3, 1]).unwrap();
//!     let config = TrainerConfig {
//!         population_size: 50,
//!         keep_amount: 10,
//!         mutation_rate: 0.3,
//!         randomize: true,
//!     };
//!
//!     let mut trainer = EvolutionalTrainer::from_config(&seed, &config).unwrap();
//!     let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
//!     for _ in 0..50 {
//!         if let Err(e) = trainer.do_iteration(evaluate_doubling, true) {
//!             eprintln!("{}", e);
//!             break;
//!         }
//!         logger.log(&trainer);
//!     }
//!
//!     let best = trainer.best();
//!     println!("Best network: {}", best);
//!     println!("{}", logger.latest().unwrap());
//! }
//! ```

mod genome;
mod trainers;

pub use genome::*;
pub use trainers::*;
