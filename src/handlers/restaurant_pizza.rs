use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use diesel::Connection;
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::NewRestaurantPizza;
use crate::serializer::{serialize_restaurant_pizza_details, RestaurantPizzaDetails};
use crate::store;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Offer price, between 1 and 30
    pub price: i32,
    /// ID of an existing pizza
    pub pizza_id: i32,
    /// ID of an existing restaurant
    pub restaurant_id: i32,
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Offer created", body = RestaurantPizzaDetails),
        (status = 400, description = "Price out of range", body = crate::error::ValidationErrorResponse),
        (status = 404, description = "Restaurant or Pizza not found", body = crate::error::ApiErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    Json(payload): Json<CreateRestaurantPizzaRequest>,
) -> Result<(StatusCode, Json<RestaurantPizzaDetails>), ApiError> {
    let mut conn = state.conn()?;
    let conn = &mut *conn;

    // Parent lookups, validation, and the insert share one transaction, so a
    // rejected offer never leaves a row behind.
    let (offer, pizza, restaurant) = conn.transaction::<_, ApiError, _>(|conn| {
        let pizza =
            store::find_pizza(conn, payload.pizza_id)?.ok_or(ApiError::RestaurantOrPizzaNotFound)?;
        let restaurant = store::find_restaurant(conn, payload.restaurant_id)?
            .ok_or(ApiError::RestaurantOrPizzaNotFound)?;

        let new_offer = NewRestaurantPizza::new(payload.price, restaurant.id, pizza.id)?;
        let offer = store::insert_restaurant_pizza(conn, &new_offer)?;

        Ok((offer, pizza, restaurant))
    })?;

    Ok((
        StatusCode::CREATED,
        Json(serialize_restaurant_pizza_details(
            &offer,
            &pizza,
            &restaurant,
        )),
    ))
}
