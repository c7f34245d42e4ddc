use axum::{extract::State, response::Json, routing::get, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::serializer::{serialize_pizza_summary, PizzaSummary};
use crate::store;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/pizzas", get(list_pizzas))
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "List of pizzas", body = Vec<PizzaSummary>),
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(State(state): State<AppState>) -> Result<Json<Vec<PizzaSummary>>, ApiError> {
    let mut conn = state.conn()?;
    let conn = &mut *conn;

    let pizzas = store::list_pizzas(conn)?;
    Ok(Json(pizzas.iter().map(serialize_pizza_summary).collect()))
}
