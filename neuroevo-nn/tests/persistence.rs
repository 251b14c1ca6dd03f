use neuroevo::{EvolutionalTrainer, TrainerConfig};
use neuroevo_nn::{ActivationFunction, Matrix, NeuralNetwork};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOLERANCE: f64 = 1e-12;

fn random_input<R: Rng>(size: usize, rng: &mut R) -> Matrix {
    let values: Vec<f64> = (0..size).map(|_| rng.gen_range(-1.0..=1.0)).collect();
    Matrix::column(&values)
}

fn assert_close(left: &Matrix, right: &Matrix) {
    assert_eq!(left.shape(), right.shape());
    for (a, b) in left.values().iter().zip(right.values()) {
        assert!((a - b).abs() <= TOLERANCE, "{} != {}", a, b);
    }
}

#[test]
fn parsed_networks_behave_identically() {
    let mut rng = StdRng::seed_from_u64(11);
    for activation_function in ActivationFunction::ALL {
        let mut network = NeuralNetwork::new(activation_function, &[9, 18, 18, 9]).unwrap();
        network.randomize(1.0, &mut rng);
        let mut parsed: NeuralNetwork = network.to_string().parse().unwrap();

        for _ in 0..10 {
            let input = random_input(9, &mut rng);
            let expected = network.feedforward(&input).unwrap();
            assert_close(&parsed.feedforward(&input).unwrap(), &expected);
        }
    }
}

#[test]
fn matrix_text_round_trip() {
    let mut rng = StdRng::seed_from_u64(12);
    let rows: Vec<Vec<f64>> = (0..4)
        .map(|_| (0..3).map(|_| rng.gen_range(-1e3..1e3)).collect())
        .collect();
    let matrix = Matrix::from_rows(rows).unwrap();
    assert_close(&matrix.to_string().parse().unwrap(), &matrix);
}

#[test]
fn trained_networks_survive_persistence() {
    let seed = NeuralNetwork::with_default_activation(&[2, 3, 1]).unwrap();
    let config = TrainerConfig {
        population_size: 12,
        keep_amount: 3,
        mutation_rate: 0.25,
        randomize: true,
    };
    let mut trainer =
        EvolutionalTrainer::from_config_with_rng(&seed, &config, StdRng::seed_from_u64(13)).unwrap();
    let input = Matrix::column(&[0.5, -0.5]);
    let fitness = |network: &NeuralNetwork| -> Result<f64, neuroevo_nn::Error> {
        Ok(network.evaluate(&input)?.get(0, 0))
    };

    for _ in 0..10 {
        trainer.try_do_iteration(fitness, true).unwrap();
    }

    let best = trainer.best();
    let restored: NeuralNetwork = best.to_string().parse().unwrap();
    assert_eq!(fitness(&restored).unwrap(), trainer.highscore().unwrap());

    let lines: String = trainer.genomes().map(|n| format!("{}\n", n)).collect();
    let parsed: Vec<NeuralNetwork> = lines.lines().map(|l| l.parse().unwrap()).collect();
    assert!(parsed.iter().eq(trainer.genomes()));
}

#[test]
fn trainer_state_serializes() {
    let seed = NeuralNetwork::new(ActivationFunction::Tanh, &[3, 2]).unwrap();
    let mut trainer = EvolutionalTrainer::new(&seed, 6, 2, true).unwrap();
    trainer.set_mutation_rate(0.1).unwrap();
    trainer
        .do_iteration(|n| n.evaluate(&Matrix::column(&[1.0, 1.0, 1.0])).unwrap().get(1, 0), false)
        .unwrap();

    let json = serde_json::to_string(&trainer).unwrap();
    let restored: EvolutionalTrainer<NeuralNetwork> = serde_json::from_str(&json).unwrap();
    assert!(restored.genomes().eq(trainer.genomes()));
    assert_eq!(restored.highscore(), trainer.highscore());
    assert_eq!(restored.generation(), 1);
    assert_eq!(restored.mutation_rate(), 0.1);
}
