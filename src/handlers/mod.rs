pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

// Re-export routers for easier importing
pub use pizza::router as pizza_router;
pub use restaurant::router as restaurant_router;
pub use restaurant_pizza::router as restaurant_pizza_router;

use utoipa::OpenApi;

use crate::error::ApiError;
use crate::{DbConnection, DbPool};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

impl AppState {
    pub fn conn(&self) -> Result<DbConnection, ApiError> {
        Ok(self.pool.get()?)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::delete_restaurant,
        pizza::list_pizzas,
        restaurant_pizza::create_restaurant_pizza,
    ),
    components(
        schemas(
            crate::serializer::RestaurantSummary,
            crate::serializer::RestaurantDetails,
            crate::serializer::RestaurantPizzaEntry,
            crate::serializer::RestaurantPizzaDetails,
            crate::serializer::PizzaSummary,
            crate::handlers::restaurant_pizza::CreateRestaurantPizzaRequest,
            crate::error::ApiErrorResponse,
            crate::error::ValidationErrorResponse,
        )
    ),
    tags(
        (name = "restaurants", description = "Restaurant listing and removal"),
        (name = "pizzas", description = "Pizza catalog"),
        (name = "restaurant_pizzas", description = "Priced offers between restaurants and pizzas")
    ),
    info(
        title = "Pizzeria Service",
        description = "Restaurants, pizzas, and the priced offers between them",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
