use diesel::{insert_into, prelude::*};

use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

pub fn list_restaurants(conn: &mut SqliteConnection) -> QueryResult<Vec<Restaurant>> {
    restaurants::table
        .order(restaurants::id.asc())
        .select(Restaurant::as_select())
        .load(conn)
}

pub fn find_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i32,
) -> QueryResult<Option<Restaurant>> {
    restaurants::table
        .find(restaurant_id)
        .select(Restaurant::as_select())
        .first(conn)
        .optional()
}

/// The restaurant's offers joined with the pizza each one points at.
pub fn restaurant_menu(
    conn: &mut SqliteConnection,
    restaurant: &Restaurant,
) -> QueryResult<Vec<(RestaurantPizza, Pizza)>> {
    RestaurantPizza::belonging_to(restaurant)
        .inner_join(pizzas::table)
        .order(restaurant_pizzas::id.asc())
        .select((RestaurantPizza::as_select(), Pizza::as_select()))
        .load(conn)
}

/// Removes the restaurant and its offers as one transaction. Returns the
/// number of offers removed, or `None` when the restaurant does not exist.
pub fn delete_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i32,
) -> QueryResult<Option<usize>> {
    conn.transaction(|conn| {
        let Some(restaurant) = find_restaurant(conn, restaurant_id)? else {
            return Ok(None);
        };
        let removed = diesel::delete(RestaurantPizza::belonging_to(&restaurant)).execute(conn)?;
        diesel::delete(&restaurant).execute(conn)?;
        Ok(Some(removed))
    })
}

pub fn list_pizzas(conn: &mut SqliteConnection) -> QueryResult<Vec<Pizza>> {
    pizzas::table
        .order(pizzas::id.asc())
        .select(Pizza::as_select())
        .load(conn)
}

pub fn find_pizza(conn: &mut SqliteConnection, pizza_id: i32) -> QueryResult<Option<Pizza>> {
    pizzas::table
        .find(pizza_id)
        .select(Pizza::as_select())
        .first(conn)
        .optional()
}

pub fn insert_restaurant(
    conn: &mut SqliteConnection,
    new_restaurant: &NewRestaurant,
) -> QueryResult<Restaurant> {
    insert_into(restaurants::table)
        .values(new_restaurant)
        .get_result(conn)
}

pub fn insert_pizza(conn: &mut SqliteConnection, new_pizza: &NewPizza) -> QueryResult<Pizza> {
    insert_into(pizzas::table).values(new_pizza).get_result(conn)
}

pub fn insert_restaurant_pizza(
    conn: &mut SqliteConnection,
    new_restaurant_pizza: &NewRestaurantPizza,
) -> QueryResult<RestaurantPizza> {
    insert_into(restaurant_pizzas::table)
        .values(new_restaurant_pizza)
        .get_result(conn)
}

#[cfg(test)]
mod tests {
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel_migrations::MigrationHarness;

    use super::*;
    use crate::{DbPool, ForeignKeys, MIGRATIONS};

    fn setup_pool() -> DbPool {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .connection_customizer(Box::new(ForeignKeys))
            .build(manager)
            .unwrap();
        pool.get()
            .unwrap()
            .run_pending_migrations(MIGRATIONS)
            .unwrap();
        pool
    }

    fn sample_restaurant(name: &str) -> NewRestaurant {
        NewRestaurant {
            name: name.to_string(),
            address: "123 Main Street".to_string(),
        }
    }

    fn sample_pizza(name: &str) -> NewPizza {
        NewPizza {
            name: name.to_string(),
            ingredients: "Dough, Tomato Sauce, Cheese".to_string(),
        }
    }

    #[test]
    fn test_find_restaurant_absent_is_none() {
        let pool = setup_pool();
        let conn = &mut pool.get().unwrap();

        assert_eq!(find_restaurant(conn, 999).unwrap(), None);
        assert_eq!(find_pizza(conn, 999).unwrap(), None);
    }

    #[test]
    fn test_list_restaurants_ordered_by_id() {
        let pool = setup_pool();
        let conn = &mut pool.get().unwrap();

        let first = insert_restaurant(conn, &sample_restaurant("Karen's Pizza Shack")).unwrap();
        let second = insert_restaurant(conn, &sample_restaurant("Sanjay's Pizza")).unwrap();

        let listed = list_restaurants(conn).unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[test]
    fn test_restaurant_menu_joins_pizzas() {
        let pool = setup_pool();
        let conn = &mut pool.get().unwrap();

        let restaurant = insert_restaurant(conn, &sample_restaurant("Kiki's Pizza")).unwrap();
        let other = insert_restaurant(conn, &sample_restaurant("Sanjay's Pizza")).unwrap();
        let emma = insert_pizza(conn, &sample_pizza("Emma")).unwrap();
        let geri = insert_pizza(conn, &sample_pizza("Geri")).unwrap();

        insert_restaurant_pizza(
            conn,
            &NewRestaurantPizza::new(10, restaurant.id, emma.id).unwrap(),
        )
        .unwrap();
        insert_restaurant_pizza(
            conn,
            &NewRestaurantPizza::new(20, restaurant.id, geri.id).unwrap(),
        )
        .unwrap();
        insert_restaurant_pizza(conn, &NewRestaurantPizza::new(5, other.id, emma.id).unwrap())
            .unwrap();

        let menu = restaurant_menu(conn, &restaurant).unwrap();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].0.price, 10);
        assert_eq!(menu[0].1, emma);
        assert_eq!(menu[1].0.price, 20);
        assert_eq!(menu[1].1, geri);
    }

    #[test]
    fn test_delete_restaurant_cascades_offers_only() {
        let pool = setup_pool();
        let conn = &mut pool.get().unwrap();

        let restaurant = insert_restaurant(conn, &sample_restaurant("Kiki's Pizza")).unwrap();
        let survivor = insert_restaurant(conn, &sample_restaurant("Sanjay's Pizza")).unwrap();
        let emma = insert_pizza(conn, &sample_pizza("Emma")).unwrap();
        let geri = insert_pizza(conn, &sample_pizza("Geri")).unwrap();

        insert_restaurant_pizza(
            conn,
            &NewRestaurantPizza::new(10, restaurant.id, emma.id).unwrap(),
        )
        .unwrap();
        insert_restaurant_pizza(
            conn,
            &NewRestaurantPizza::new(20, restaurant.id, geri.id).unwrap(),
        )
        .unwrap();
        insert_restaurant_pizza(
            conn,
            &NewRestaurantPizza::new(5, survivor.id, emma.id).unwrap(),
        )
        .unwrap();

        let removed = delete_restaurant(conn, restaurant.id).unwrap();
        assert_eq!(removed, Some(2));

        assert_eq!(find_restaurant(conn, restaurant.id).unwrap(), None);
        assert_eq!(list_restaurants(conn).unwrap(), vec![survivor]);

        let remaining: i64 = restaurant_pizzas::table.count().get_result(conn).unwrap();
        assert_eq!(remaining, 1);

        // Referenced pizzas are untouched by the cascade.
        assert_eq!(list_pizzas(conn).unwrap(), vec![emma, geri]);
    }

    #[test]
    fn test_delete_restaurant_absent_is_noop() {
        let pool = setup_pool();
        let conn = &mut pool.get().unwrap();

        assert_eq!(delete_restaurant(conn, 999).unwrap(), None);
    }
}
