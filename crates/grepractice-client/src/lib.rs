//! grepractice-client — REST client for the GRE question service.
//!
//! Implements the `QuestionSource` trait over HTTP, plus the configuration
//! the client is built from and a mock source for tests.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{load_config, load_config_from, GrePracticeConfig};
pub use http::{HealthStatus, HttpQuestionSource};
pub use mock::MockQuestionSource;
