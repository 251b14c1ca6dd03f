use std::error;
use std::fmt;

/// Specialized result type for matrix and network operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The arithmetic operation that detected a shape mismatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Addition,
    Multiplication,
}

/// An error type for matrix and network operations.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The operands' shapes (rows, columns) are
    /// incompatible for the operation.
    DimensionMismatch {
        operation: Operation,
        left: (usize, usize),
        right: (usize, usize),
    },
    /// The activation function name is not recognized.
    UnknownActivation(String),
    /// The text is not a valid matrix or network.
    Parse(String),
    /// The neuron counts don't describe at least one
    /// layer of non-empty neuron groups.
    InvalidTopology(Vec<usize>),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addition => write!(f, "addition"),
            Self::Multiplication => write!(f, "multiplication"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch {
                operation,
                left: (left_rows, left_cols),
                right: (right_rows, right_cols),
            } => write!(
                f,
                "matrix {} of incompatible shapes {}x{} and {}x{}",
                operation, left_rows, left_cols, right_rows, right_cols
            ),
            Self::UnknownActivation(name) => {
                write!(f, "activation function {:?} does not exist", name)
            }
            Self::Parse(message) => write!(f, "parse error: {}", message),
            Self::InvalidTopology(neurons) => write!(
                f,
                "invalid network topology {:?}: at least two non-zero neuron counts are required",
                neurons
            ),
        }
    }
}

impl error::Error for Error {}
