use axum::Router;
use clap::{Parser, Subcommand};
use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pizzeria_service::handlers::{
    pizza_router, restaurant_pizza_router, restaurant_router, ApiDoc, AppState,
};
use pizzeria_service::models::{NewPizza, NewRestaurant, NewRestaurantPizza};
use pizzeria_service::{establish_pool, store, MIGRATIONS};

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,
    /// Reset the store and load sample data
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve => serve().await,
        Commands::Seed => seed(),
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let pool = establish_pool();
    {
        let mut conn = pool.get()?;
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
    }

    let state = AppState { pool };

    let app = Router::new()
        .merge(restaurant_router())
        .merge(pizza_router())
        .merge(restaurant_pizza_router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:5555").await?;
    info!("pizzeria service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

fn seed() -> Result<(), Box<dyn std::error::Error>> {
    use pizzeria_service::schema::{pizzas, restaurant_pizzas, restaurants};

    let pool = establish_pool();
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    let conn = &mut *conn;
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(restaurant_pizzas::table).execute(conn)?;
        diesel::delete(restaurants::table).execute(conn)?;
        diesel::delete(pizzas::table).execute(conn)?;

        let shack = store::insert_restaurant(
            conn,
            &NewRestaurant {
                name: "Karen's Pizza Shack".to_string(),
                address: "address1".to_string(),
            },
        )?;
        let sanjays = store::insert_restaurant(
            conn,
            &NewRestaurant {
                name: "Sanjay's Pizza".to_string(),
                address: "address2".to_string(),
            },
        )?;
        let kikis = store::insert_restaurant(
            conn,
            &NewRestaurant {
                name: "Kiki's Pizza".to_string(),
                address: "address3".to_string(),
            },
        )?;

        let emma = store::insert_pizza(
            conn,
            &NewPizza {
                name: "Emma".to_string(),
                ingredients: "Dough, Tomato Sauce, Cheese".to_string(),
            },
        )?;
        let geri = store::insert_pizza(
            conn,
            &NewPizza {
                name: "Geri".to_string(),
                ingredients: "Dough, Tomato Sauce, Cheese, Pepperoni".to_string(),
            },
        )?;
        let melanie = store::insert_pizza(
            conn,
            &NewPizza {
                name: "Melanie".to_string(),
                ingredients: "Dough, Sauce, Ricotta, Red peppers, Mustard".to_string(),
            },
        )?;

        for (restaurant, pizza, price) in [
            (&shack, &emma, 12),
            (&shack, &geri, 15),
            (&sanjays, &geri, 20),
            (&sanjays, &melanie, 9),
            (&kikis, &emma, 6),
        ] {
            let offer = NewRestaurantPizza::new(price, restaurant.id, pizza.id)
                .expect("seed prices are in range");
            store::insert_restaurant_pizza(conn, &offer)?;
        }

        Ok(())
    })?;

    info!("seeded 3 restaurants, 3 pizzas, 5 offers");
    Ok(())
}
