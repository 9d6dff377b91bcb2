pub mod error;
pub mod loader;
pub mod memory;
pub mod schema;
pub mod store;
pub mod unit_of_work;

pub use error::StorageError;
pub use loader::{LoadError, LoadPhase, LoadReport, load_payload, replace_all};
pub use memory::{MemorySnapshot, MemoryStore};
pub use schema::QuestionRow;
pub use store::{LastLoad, QuestionStore, StoreStats};
pub use unit_of_work::{RecordKind, TransactionalStore, UnitOfWork};
