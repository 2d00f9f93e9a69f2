//! grepractice-core — calculator, question normalizer, and practice session.
//!
//! This crate holds the logic behind the GRE math practice application:
//! the on-screen calculator, the mapping from remote question records to
//! canonical questions, and the quiz state those questions feed.

pub mod calculator;
pub mod error;
pub mod eval;
pub mod fallback;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod session;
pub mod traits;

pub use error::{EvalError, FetchError};
pub use eval::evaluate;
pub use normalize::normalize;
