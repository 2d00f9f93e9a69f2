//! Error types shared across grepractice.
//!
//! `EvalError` is recovered by the calculator into its error marker.
//! `FetchError` is defined here rather than in the client crate so the
//! loader can classify failures and substitute the fallback set without
//! string matching.

use thiserror::Error;

/// Errors produced while evaluating a calculator expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The input contained a character outside the arithmetic alphabet.
    #[error("invalid character '{ch}' at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    /// Division by zero.
    #[error("division by zero")]
    DivideByZero,

    /// The operation is undefined for its operand (e.g. square root of a
    /// negative number) or the result is not a finite number.
    #[error("result outside the calculator's domain")]
    DomainError,

    /// The input does not form a complete arithmetic expression.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),
}

/// Errors that can occur while fetching questions from the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The service could not be reached (connection refused, DNS, timeout).
    #[error("question service unavailable: {0}")]
    NetworkUnavailable(String),

    /// The service answered with a non-2xx status.
    #[error("question service returned HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The response body was not a JSON array of records.
    #[error("could not decode question list: {0}")]
    DecodeError(String),

    /// The service returned an empty question list.
    #[error("the question bank is empty")]
    EmptyResult,
}

impl FetchError {
    /// HTTP status code, if the failure came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
