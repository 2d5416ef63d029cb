use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::model::{Figure, NewFigure};
use crate::store::traits::{FigureStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded migrations in `./migrations`
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    async fn exists(&self, id: i64) -> anyhow::Result<bool> {
        let row = sqlx::query("SELECT 1 FROM figures WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to check figure existence")?;
        Ok(row.is_some())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn figure_from_row(row: &PgRow) -> anyhow::Result<Figure> {
    Ok(Figure {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        name: row.try_get("name")?,
        years_of_life: row.try_get("years_of_life")?,
        description: row.try_get("description")?,
        version: row.try_get("version")?,
    })
}

#[async_trait::async_trait]
impl FigureStore for PostgresStore {
    async fn create(&self, figure: NewFigure) -> StoreResult<Figure> {
        let row = sqlx::query(
            r#"
            INSERT INTO figures (name, years_of_life, description)
            VALUES ($1, $2, $3)
            RETURNING id, created_at, version
            "#,
        )
        .bind(&figure.name)
        .bind(&figure.years_of_life)
        .bind(&figure.description)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert figure")?;

        Ok(Figure {
            id: row.try_get("id").context("Malformed insert result")?,
            created_at: row.try_get("created_at").context("Malformed insert result")?,
            name: figure.name,
            years_of_life: figure.years_of_life,
            description: figure.description,
            version: row.try_get("version").context("Malformed insert result")?,
        })
    }

    async fn get(&self, id: i64) -> StoreResult<Figure> {
        if id < 1 {
            return Err(StoreError::NotFound);
        }

        let row = sqlx::query(
            r#"
            SELECT id, created_at, name, years_of_life, description, version
            FROM figures
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch figure")?;

        let Some(row) = row else {
            return Err(StoreError::NotFound);
        };

        Ok(figure_from_row(&row).context("Malformed figure row")?)
    }

    async fn update(&self, figure: &Figure, expected_version: Option<i32>) -> StoreResult<i32> {
        if figure.id < 1 {
            return Err(StoreError::NotFound);
        }

        // The increment happens server side so concurrent writers always
        // produce consecutive versions.
        let row = sqlx::query(
            r#"
            UPDATE figures
            SET name = $1, years_of_life = $2, description = $3, version = version + 1
            WHERE id = $4 AND ($5::integer IS NULL OR version = $5)
            RETURNING version
            "#,
        )
        .bind(&figure.name)
        .bind(&figure.years_of_life)
        .bind(&figure.description)
        .bind(figure.id)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update figure")?;

        match row {
            Some(row) => Ok(row.try_get("version").context("Malformed update result")?),
            // A missing row is NotFound even when a version was supplied.
            None if expected_version.is_some() => {
                if self.exists(figure.id).await? {
                    Err(StoreError::Conflict(figure.id))
                } else {
                    Err(StoreError::NotFound)
                }
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        if id < 1 {
            return Err(StoreError::NotFound);
        }

        let result = sqlx::query("DELETE FROM figures WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete figure")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
