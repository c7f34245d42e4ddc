//! Response shaping. Each endpoint returns a fixed field set, and embedding
//! stops after one hop: an embedded pizza never carries its own offers, so
//! cyclic expansion cannot happen.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models;

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantSummary {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PizzaSummary {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantDetails {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<RestaurantPizzaEntry>,
}

/// An offer as embedded in its owning restaurant's details.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantPizzaEntry {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: PizzaSummary,
}

/// A freshly created offer with both parents embedded.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantPizzaDetails {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: PizzaSummary,
    pub restaurant: RestaurantSummary,
}

pub fn serialize_restaurant_summary(restaurant: &models::Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza_summary(pizza: &models::Pizza) -> PizzaSummary {
    PizzaSummary {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

pub fn serialize_restaurant_details(
    restaurant: &models::Restaurant,
    menu: &[(models::RestaurantPizza, models::Pizza)],
) -> RestaurantDetails {
    RestaurantDetails {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: menu
            .iter()
            .map(|(offer, pizza)| RestaurantPizzaEntry {
                id: offer.id,
                price: offer.price,
                pizza_id: offer.pizza_id,
                restaurant_id: offer.restaurant_id,
                pizza: serialize_pizza_summary(pizza),
            })
            .collect(),
    }
}

pub fn serialize_restaurant_pizza_details(
    offer: &models::RestaurantPizza,
    pizza: &models::Pizza,
    restaurant: &models::Restaurant,
) -> RestaurantPizzaDetails {
    RestaurantPizzaDetails {
        id: offer.id,
        price: offer.price,
        pizza_id: offer.pizza_id,
        restaurant_id: offer.restaurant_id,
        pizza: serialize_pizza_summary(pizza),
        restaurant: serialize_restaurant_summary(restaurant),
    }
}
