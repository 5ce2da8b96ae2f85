use crate::models::all_models::{Food, FoodRecipe};
use async_trait::async_trait;
use sqlx::PgPool;

/// Persistence used by the inventory and recipe handlers.
#[async_trait]
pub trait FoodStore: Send + Sync {
    async fn add_food(&self, name: &str, expiry_date: &str) -> Result<Food, sqlx::Error>;

    /// All food items ordered by id.
    async fn list_foods(&self) -> Result<Vec<Food>, sqlx::Error>;

    /// Returns the number of rows removed; zero when `id` does not exist.
    async fn delete_food(&self, id: i32) -> Result<u64, sqlx::Error>;

    async fn add_recipe(&self, food_id: Option<i32>, recipe: &str)
        -> Result<FoodRecipe, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgFoodStore {
    pool: PgPool,
}

impl PgFoodStore {
    pub fn new(pool: PgPool) -> Self {
        PgFoodStore { pool }
    }
}

#[async_trait]
impl FoodStore for PgFoodStore {
    async fn add_food(&self, name: &str, expiry_date: &str) -> Result<Food, sqlx::Error> {
        let query = "INSERT INTO foods (name, expiry_date) VALUES ($1, $2) \
                     RETURNING id, name, expiry_date";

        sqlx::query_as::<_, Food>(query)
            .bind(name)
            .bind(expiry_date)
            .fetch_one(&self.pool)
            .await
    }

    async fn list_foods(&self) -> Result<Vec<Food>, sqlx::Error> {
        sqlx::query_as::<_, Food>("SELECT id, name, expiry_date FROM foods ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn delete_food(&self, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn add_recipe(
        &self,
        food_id: Option<i32>,
        recipe: &str,
    ) -> Result<FoodRecipe, sqlx::Error> {
        let query = "INSERT INTO food_recipes (food_id, recipe) VALUES ($1, $2) \
                     RETURNING id, food_id, recipe";

        sqlx::query_as::<_, FoodRecipe>(query)
            .bind(food_id)
            .bind(recipe)
            .fetch_one(&self.pool)
            .await
    }
}

pub async fn check_db_connection(pool: &PgPool) -> bool {
    match pool.acquire().await {
        Ok(_) => true,
        Err(e) => {
            log::error!("Database connection check failed: {}", e);
            false
        }
    }
}
