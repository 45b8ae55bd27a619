use serde::Serialize;
use sqlx::FromRow;

/// One ingested protocol log, keyed by (tx_hash, log_index).
#[derive(Debug, Clone, FromRow)]
pub struct ChainEvent {
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub contract: String,
    pub event_name: String,
    pub args_json: String,
    pub timestamp: i64,
}

/// Optional predicates shared by the event list and stats queries.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub contract: Option<String>,
    pub event: Option<String>,
    pub from_block: Option<i64>,
    pub to_block: Option<i64>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventStats {
    pub contract: String,
    pub event_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct SyncState {
    pub key: String,
    pub value: String,
}
