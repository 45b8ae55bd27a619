use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::{ChainEvent, EventFilter},
};

#[get("/events")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let limit = data.limit.unwrap_or(100).clamp(1, 1000);

    let filter = EventFilter {
        contract: data.contract.clone(),
        event: data.event.clone(),
        from_block: data.from_block,
        to_block: data.to_block,
    };

    let rows = state.database.events.get_filtered(&filter, limit).await?;
    let items = rows
        .into_iter()
        .map(EventItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(web::Json(Response { items }))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    contract: Option<String>,
    event: Option<String>,
    #[serde(rename = "fromBlock")]
    from_block: Option<i64>,
    #[serde(rename = "toBlock")]
    to_block: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub items: Vec<EventItem>,
}

#[derive(Debug, Serialize)]
pub struct EventItem {
    pub block_number: i64,
    pub tx_hash: String,
    pub log_index: i64,
    pub contract: String,
    pub event_name: String,
    pub args: Value,
    pub timestamp: i64,
}

impl TryFrom<ChainEvent> for EventItem {
    type Error = Error;

    fn try_from(event: ChainEvent) -> Result<EventItem, Error> {
        let args = if event.args_json.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&event.args_json)?
        };

        Ok(EventItem {
            block_number: event.block_number,
            tx_hash: event.tx_hash,
            log_index: event.log_index,
            contract: event.contract,
            event_name: event.event_name,
            args,
            timestamp: event.timestamp,
        })
    }
}
