use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::{EventFilter, EventStats},
};

#[get("/stats")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let filter = EventFilter {
        contract: data.contract.clone(),
        event: data.event.clone(),
        from_block: data.from_block,
        to_block: data.to_block,
    };

    let items = state.database.events.stats(&filter).await?;
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
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub items: Vec<EventStats>,
}
