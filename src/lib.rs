pub mod app;
pub mod backend;
pub mod chain;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod history;
pub mod logging;
pub mod session;
pub mod speech;
pub mod status;
pub mod storage;
pub mod translate;

#[cfg(test)]
mod tests;

pub use app::{Intent, Outcome, StudyApp};
pub use config::StudyConfig;
pub use error::{StudyError, StudyResult};
pub use session::Session;
