use actix_web::{get, web, Responder};
use serde::Serialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    provider::synchronization::LAST_PROCESSED_BLOCK,
};

#[get("/health")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let (chain_id, latest_block) = tokio::try_join!(
        state.chain.chain_id(),
        state.chain.latest_block()
    )?;

    let indexed_to_block = state
        .database
        .state
        .get(LAST_PROCESSED_BLOCK)
        .await?
        .map(|value| value.parse::<i64>())
        .transpose()?;

    Ok(web::Json(Response {
        chain_id,
        latest_block,
        indexed_to_block,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub chain_id: u64,
    pub latest_block: i64,
    pub indexed_to_block: Option<i64>,
}
