pub mod local;
pub mod record;
pub mod store;

pub use local::LocalHistory;
pub use record::{RecordId, StudyRecord};
pub use store::{DeleteOutcome, HistorySource, HistoryStore, HistoryView, SaveOutcome};
