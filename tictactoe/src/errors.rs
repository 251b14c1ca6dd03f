use neuroevo::{ConfigurationError, EvaluationError};

use std::convert::Infallible;
use std::error;
use std::fmt;
use std::io;

/// An error type for training and playing sessions.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    /// The configuration file is not valid RON.
    Ron(ron::Error),
    /// The training configuration is inconsistent.
    InvalidConfig(String),
    Trainer(ConfigurationError),
    Network(neuroevo_nn::Error),
    Evaluation(EvaluationError<Infallible>),
    /// The requested network is not in the file.
    NetworkNotFound { index: usize, count: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Ron(e) => write!(f, "invalid configuration file: {}", e),
            Self::InvalidConfig(message) => write!(f, "invalid configuration: {}", message),
            Self::Trainer(e) => write!(f, "invalid trainer configuration: {}", e),
            Self::Network(e) => write!(f, "invalid network: {}", e),
            Self::Evaluation(e) => write!(f, "evaluation failed: {}", e),
            Self::NetworkNotFound { index, count } => write!(
                f,
                "network {} requested, but the file holds networks 1 to {}",
                index, count
            ),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Ron(e) => Some(e),
            Self::Trainer(e) => Some(e),
            Self::Network(e) => Some(e),
            Self::Evaluation(e) => Some(e),
            Self::InvalidConfig(_) | Self::NetworkNotFound { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<ron::Error> for Error {
    fn from(e: ron::Error) -> Error {
        Error::Ron(e)
    }
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Error {
        Error::Trainer(e)
    }
}

impl From<neuroevo_nn::Error> for Error {
    fn from(e: neuroevo_nn::Error) -> Error {
        Error::Network(e)
    }
}

impl From<EvaluationError<Infallible>> for Error {
    fn from(e: EvaluationError<Infallible>) -> Error {
        Error::Evaluation(e)
    }
}
