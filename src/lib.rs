//! This crate implements sum-product (belief-propagation) decoding for low-density parity-check
//! (LDPC) codes over a binary symmetric channel. The parity-check matrix is supplied in
//! compressed-sparse-column (CSC) form and expanded once into a Tanner graph; the decoder then
//! passes messages between check nodes and variable nodes until the hard decision reproduces the
//! target syndrome, the messages diverge, or the iteration budget runs out. A Monte-Carlo
//! simulator for frame-error-rate-versus-crossover-probability curves is included, along with a
//! command-line front end.
//!
//! The [`decode`] function is the core entry point; [`ParityCheckMatrix`] and [`TannerGraph`] hold
//! the code description, and [`Bsc`] models the channel.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use thiserror::Error;

mod channel;
mod decoder;
mod matrix;
pub mod sim;
pub mod utils;

pub use channel::{flip_fixed_count, Bsc, LlrChannel};
pub use decoder::{decode, DecodeOutcome, DecoderConfig};
pub use matrix::{ParityCheckMatrix, TannerGraph};

/// Custom error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input error
    #[error("{0}")]
    InvalidInput(String),
    /// Malformed parity-check matrix error
    #[error("{0}")]
    InvalidMatrix(String),
    /// File read/write error
    #[error("{0}")]
    FileReadWriteError(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWriteError(#[from] serde_json::Error),
}

/// Enumeration of binary symbol values
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum Bit {
    /// Binary symbol `0`
    Zero = 0,
    /// Binary symbol `1`
    One = 1,
}

impl Bit {
    /// Returns the other binary symbol.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }
}
