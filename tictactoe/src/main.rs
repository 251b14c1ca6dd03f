//! Evolves neural networks playing tic-tac-toe against each
//! other, and lets a human play against the results.

use tictactoe::errors::Error;
use tictactoe::game::{self, Mark};
use tictactoe::players::{ConsolePlayer, NetworkPlayer};
use tictactoe::training::{Training, TrainingConfig};

use clap::{Parser, Subcommand};
use neuroevo_nn::NeuralNetwork;
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "tictactoe")]
#[command(version)]
#[command(about = "Evolves tic-tac-toe playing neural networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train groups of networks against each other
    Train {
        /// Training configuration file (RON); defaults are used if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// File the best networks are saved to after every round
        /// [default: nets<unix-seconds>.txt]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of rounds to train; runs until interrupted if omitted
        #[arg(short, long)]
        rounds: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play against a saved network
    Play {
        /// File of saved networks
        file: PathBuf,

        /// Line of the network in the file, starting at 1
        index: usize,
    },

    /// Write the default training configuration
    Init {
        /// Output path
        #[arg(short, long, default_value = "training.ron")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            config,
            output,
            rounds,
            seed,
        } => train(config, output, rounds, seed)?,

        Commands::Play { file, index } => play(&file, index)?,

        Commands::Init { output } => write_default_config(&output)?,
    }
    Ok(())
}

fn train(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    rounds: Option<usize>,
    seed: Option<u64>,
) -> Result<(), Error> {
    let config = match config_path {
        Some(path) => {
            log::info!("loading configuration from {}", path.display());
            TrainingConfig::from_file(&path)?
        }
        None => TrainingConfig::default(),
    };
    let output = output.unwrap_or_else(default_output);

    let mut training = match seed {
        Some(seed) => {
            log::info!("using seed {}", seed);
            Training::with_rng(config, StdRng::seed_from_u64(seed))?
        }
        None => Training::new(config)?,
    };

    loop {
        training.train_round()?;
        training.save_best_networks(&output)?;
        log::info!(
            "round {} complete, best networks saved to {}",
            training.round(),
            output.display()
        );
        if rounds.map_or(false, |rounds| training.round() >= rounds) {
            return Ok(());
        }
    }
}

fn default_output() -> PathBuf {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    PathBuf::from(format!("nets{}.txt", seconds))
}

/// Plays a game on the console against network
/// `index` (1-based) of `file`. The network moves first.
fn play(file: &Path, index: usize) -> Result<(), Error> {
    let network = load_network(&fs::read_to_string(file)?, index)?;
    let mut human = ConsolePlayer::stdio();
    let mut computer = NetworkPlayer::new(&network);
    let (outcome, _) = game::play(&mut human, &mut computer, Mark::O);
    log::debug!("game over: {:?}", outcome);
    Ok(())
}

/// Parses network `index` (1-based) from a file
/// holding one network per line.
fn load_network(text: &str, index: usize) -> Result<NeuralNetwork, Error> {
    let line = index
        .checked_sub(1)
        .and_then(|i| text.lines().nth(i))
        .ok_or(Error::NetworkNotFound {
            index,
            count: text.lines().count(),
        })?;
    Ok(line.parse()?)
}

fn write_default_config(output: &Path) -> Result<(), Error> {
    fs::write(output, TrainingConfig::default().to_ron()?)?;
    log::info!("default configuration written to {}", output.display());
    Ok(())
}
