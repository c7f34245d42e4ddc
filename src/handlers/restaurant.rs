use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::serializer::{
    serialize_restaurant_details, serialize_restaurant_summary, RestaurantDetails,
    RestaurantSummary,
};
use crate::store;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = Vec<RestaurantSummary>),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantSummary>>, ApiError> {
    let mut conn = state.conn()?;
    let conn = &mut *conn;

    let restaurants = store::list_restaurants(conn)?;
    Ok(Json(
        restaurants
            .iter()
            .map(serialize_restaurant_summary)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant with its offers", body = RestaurantDetails),
        (status = 404, description = "Restaurant not found", body = crate::error::ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i32>,
) -> Result<Json<RestaurantDetails>, ApiError> {
    let mut conn = state.conn()?;
    let conn = &mut *conn;

    let restaurant =
        store::find_restaurant(conn, restaurant_id)?.ok_or(ApiError::RestaurantNotFound)?;
    let menu = store::restaurant_menu(conn, &restaurant)?;

    Ok(Json(serialize_restaurant_details(&restaurant, &menu)))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its offers deleted"),
        (status = 404, description = "Restaurant not found", body = crate::error::ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;
    let conn = &mut *conn;

    match store::delete_restaurant(conn, restaurant_id)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::RestaurantNotFound),
    }
}
