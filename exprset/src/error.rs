use polars::error::PolarsError;
use thiserror::Error;

pub type Result<T, E = ExprSetError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ExprSetError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("duplicate {kind} identifier '{name}'")]
    DuplicateIdentifier { kind: &'static str, name: String },

    #[error("unknown channel '{0}'")]
    UnknownChannel(String),

    #[error("unknown annotation field '{0}'")]
    UnknownField(String),

    #[error("index {index} is out of range for an axis of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown {kind} identifier '{name}'")]
    UnknownIdentifier { kind: &'static str, name: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    /// Failure reported by an external annotation service.
    #[error(transparent)]
    Lookup(#[from] anyhow::Error),
}

macro_rules! ensure_dim {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::ExprSetError::DimensionMismatch(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure_dim;
