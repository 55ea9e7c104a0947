pub mod models;
pub mod service;
pub mod storage;

pub use models::{ComparisonResponse, PromptEcho, build_response, outcome_notices};
pub use service::{AppState, MAX_FILE_BYTES, build_router, create_app};
pub use storage::{ComparisonRecord, ComparisonStore, InMemoryComparisonStore};
