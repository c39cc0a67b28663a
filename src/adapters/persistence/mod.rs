pub mod password_reset;
pub mod user;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub struct PostgresPersistence {
    pub pool: PgPool,
}

impl PostgresPersistence {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }
}
