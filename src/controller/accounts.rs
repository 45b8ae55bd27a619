use actix_web::{get, web, Responder};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler,
};

#[get("/accounts/{address}")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let address = path.into_inner();
    let snapshot = handler::get_account(state.get_ref(), &address).await?;
    Ok(web::Json(snapshot))
}
