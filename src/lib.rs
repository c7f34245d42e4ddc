use std::env;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations};
use dotenvy::dotenv;

pub mod error;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod serializer;
pub mod store;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite leaves foreign key enforcement off unless each connection opts in.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKeys;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ForeignKeys {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn establish_pool() -> DbPool {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| String::from("pizzeria.db"));
    Pool::builder()
        .connection_customizer(Box::new(ForeignKeys))
        .build(ConnectionManager::new(database_url))
        .expect("Failed to create connection pool")
}
