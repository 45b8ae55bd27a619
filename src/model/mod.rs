mod models;
mod table;

pub use models::{ChainEvent, EventFilter, EventStats, SyncState};
pub use table::Table;
