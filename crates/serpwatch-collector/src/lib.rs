pub mod config;
pub mod engine;
pub mod error;
pub mod outcome;

pub use config::CollectorConfig;
pub use engine::{fail_session_best_effort, Collector};
pub use error::CollectError;
pub use outcome::{KeywordCheck, KeywordOutcome};
