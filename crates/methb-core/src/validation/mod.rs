//! Post-hoc checks over extracted records.
//!
//! The extractor never second-guesses what it reads; this module flags the
//! records a human should look at again.

mod issue;
mod sample;
mod validator;

pub use issue::*;
pub use sample::*;
pub use validator::*;

use thiserror::Error;

/// Validation output errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
