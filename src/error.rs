//! Error kinds shared by every layer of the lattice engine.
//!
//! The core never catches its own errors: a failed precondition propagates
//! via `?` and aborts whatever traversal triggered it. There are no retries
//! and no partial results.

/// One variant per failure kind the engine can raise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An index or element fell outside a bitset's fixed domain.
    #[error("index {index} out of range for domain of size {size}")]
    Domain { index: usize, size: usize },

    /// Two bitsets (or contexts) derived from different domains were used
    /// together in a binary operation.
    #[error("incompatible bitsets: operands do not share an origin")]
    Compatibility,

    /// A BitVec-level operation was applied to vectors of different sizes.
    #[error("size mismatch: left has {left} bits, right has {right}")]
    SizeMismatch { left: usize, right: usize },

    /// `BitVec::make(0)` or `Bitset::make([])`.
    #[error("domain must be non-empty")]
    EmptyDomain,

    /// Raised by the external context-table parser.
    #[error("parse error at byte offset {offset}: {message}")]
    Parse { offset: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
