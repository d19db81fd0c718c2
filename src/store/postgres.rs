use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{
    Character, Favorite, NewCharacter, NewFavorite, NewPlanet, NewUser, Planet, Store,
    StoreError, StoreResult, User,
};

/// Postgres-backed store. Every statement commits on its own.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

fn insert_error(entity: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        if is_unique_violation(&e) {
            StoreError::Duplicate { entity }
        } else {
            StoreError::Database(e)
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, mail, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, mail, password_hash
            "#,
        )
        .bind(&new.name)
        .bind(&new.mail)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error("User"))?;
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"SELECT id, name, mail, password_hash FROM users ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, mail, password_hash FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_mail(&self, mail: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, mail, password_hash
            FROM users
            WHERE mail = $1
            LIMIT 1
            "#,
        )
        .bind(mail)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_character(&self, new: NewCharacter) -> StoreResult<Character> {
        let row = sqlx::query_as::<_, Character>(
            r#"
            INSERT INTO characters (name, gender, hair_color, eye_color)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, gender, hair_color, eye_color
            "#,
        )
        .bind(&new.name)
        .bind(&new.gender)
        .bind(&new.hair_color)
        .bind(&new.eye_color)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error("Character"))?;
        Ok(row)
    }

    async fn list_characters(&self) -> StoreResult<Vec<Character>> {
        let rows = sqlx::query_as::<_, Character>(
            r#"SELECT id, name, gender, hair_color, eye_color FROM characters ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_character(&self, id: i64) -> StoreResult<Option<Character>> {
        let row = sqlx::query_as::<_, Character>(
            r#"SELECT id, name, gender, hair_color, eye_color FROM characters WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_matching_character(
        &self,
        new: &NewCharacter,
    ) -> StoreResult<Option<Character>> {
        let row = sqlx::query_as::<_, Character>(
            r#"
            SELECT id, name, gender, hair_color, eye_color
            FROM characters
            WHERE name = $1 AND gender = $2 AND hair_color = $3 AND eye_color = $4
            LIMIT 1
            "#,
        )
        .bind(&new.name)
        .bind(&new.gender)
        .bind(&new.hair_color)
        .bind(&new.eye_color)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_planet(&self, new: NewPlanet) -> StoreResult<Planet> {
        let row = sqlx::query_as::<_, Planet>(
            r#"
            INSERT INTO planets (name, diameter, population, terrain)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, diameter, population, terrain
            "#,
        )
        .bind(&new.name)
        .bind(new.diameter)
        .bind(new.population)
        .bind(&new.terrain)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error("Planet"))?;
        Ok(row)
    }

    async fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        let rows = sqlx::query_as::<_, Planet>(
            r#"SELECT id, name, diameter, population, terrain FROM planets ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_planet(&self, id: i64) -> StoreResult<Option<Planet>> {
        let row = sqlx::query_as::<_, Planet>(
            r#"SELECT id, name, diameter, population, terrain FROM planets WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_matching_planet(&self, new: &NewPlanet) -> StoreResult<Option<Planet>> {
        let row = sqlx::query_as::<_, Planet>(
            r#"
            SELECT id, name, diameter, population, terrain
            FROM planets
            WHERE name = $1 AND diameter = $2 AND population = $3 AND terrain = $4
            LIMIT 1
            "#,
        )
        .bind(&new.name)
        .bind(new.diameter)
        .bind(new.population)
        .bind(&new.terrain)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_favorite(&self, new: NewFavorite) -> StoreResult<Favorite> {
        let row = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, favorite_type, favorite_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, favorite_type, favorite_id
            "#,
        )
        .bind(new.user_id)
        .bind(&new.favorite_type)
        .bind(&new.favorite_id)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error("Favorite"))?;
        Ok(row)
    }

    async fn list_favorites_by_user(&self, user_id: i64) -> StoreResult<Vec<Favorite>> {
        let rows = sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, favorite_type, favorite_id
            FROM favorites
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_favorite(&self, id: i64) -> StoreResult<Option<Favorite>> {
        let row = sqlx::query_as::<_, Favorite>(
            r#"SELECT id, user_id, favorite_type, favorite_id FROM favorites WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_matching_favorite(&self, new: &NewFavorite) -> StoreResult<Option<Favorite>> {
        let row = sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, favorite_type, favorite_id
            FROM favorites
            WHERE user_id = $1 AND favorite_type = $2 AND favorite_id = $3
            LIMIT 1
            "#,
        )
        .bind(new.user_id)
        .bind(&new.favorite_type)
        .bind(&new.favorite_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_favorite(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(r#"DELETE FROM favorites WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
