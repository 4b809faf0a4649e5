//! Error types for problem input. Routing failures are reported, not raised.

use thiserror::Error;

use crate::types::{NetId, Point};

/// Malformed problem text
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },
    #[error("line {line}: invalid integer `{token}`")]
    InvalidInteger { line: usize, token: String },
    #[error("line {line}: expected {expected} values, found {found}")]
    WrongTokenCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: count must not be negative, got {value}")]
    NegativeCount { line: usize, value: i64 },
}

/// Parsed input that violates the router's preconditions
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ProblemError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    BadDimensions { width: i32, height: i32 },
    #[error("grid of {width}x{height} cells is too large")]
    GridTooLarge { width: i32, height: i32 },
    #[error("obstruction {0} is outside the grid")]
    ObstructionOutOfBounds(Point),
    #[error("net {net} pin {pin} is outside the grid")]
    PinOutOfBounds { net: NetId, pin: Point },
    #[error("net {net} pin {pin} lies on an obstruction")]
    PinOnObstruction { net: NetId, pin: Point },
    #[error("pin {pin} is shared by nets {first} and {second}")]
    SharedPin {
        pin: Point,
        first: NetId,
        second: NetId,
    },
    #[error("net {0} has no pins")]
    EmptyNet(NetId),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error("failed to read problem file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
