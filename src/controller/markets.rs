use actix_web::{get, web, Responder};
use serde::Serialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler,
    types::MarketSnapshot,
};

#[get("/markets")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let items = handler::list_markets(state.get_ref()).await;
    Ok(web::Json(Response { items }))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub items: Vec<MarketSnapshot>,
}
