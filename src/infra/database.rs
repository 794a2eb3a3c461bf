pub mod connection {
    use std::time::Duration;

    use sqlx::PgPool;

    use crate::{config::env_var::EnvVar, error::persistence::PersistenceError};

    pub async fn create_sqlx_pool(env: &EnvVar) -> Result<PgPool, PersistenceError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .min_connections(1)
            .max_connections(env.database_max_connections)
            .acquire_timeout(Duration::from_millis(1000))
            .idle_timeout(Duration::from_millis(1000 * 30))
            .max_lifetime(Duration::from_millis(1000 * 60 * 30))
            .connect(&env.database_url)
            .await?;
        Ok(pool)
    }

    /// Creates the schema objects that are still missing.
    pub async fn apply_schema(pool: &PgPool) -> Result<(), PersistenceError> {
        let mut trx = pool.begin().await?;
        for sttm in include_str!("../../dbschema.sql").split(';') {
            if sttm.trim().is_empty() {
                continue;
            }
            sqlx::query(sttm).execute(&mut trx).await?;
        }
        trx.commit().await?;
        Ok(())
    }
}

pub mod repository {
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::{
        domain::{
            entity::{user::User, Entity},
            repository::{Page, UserRepository},
        },
        error::persistence::PersistenceError,
    };

    const SELECT_USER: &str = "SELECT id, created, name, age, gender FROM account.users";

    /// Postgres backed user store; each write runs in its own transaction.
    #[derive(Debug, Clone)]
    pub struct PgUserRepository {
        pool: PgPool,
    }

    impl PgUserRepository {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }
    }

    #[async_trait]
    impl UserRepository for PgUserRepository {
        async fn insert_user(&self, user: &User) -> Result<(), PersistenceError> {
            let mut trx = self.pool.begin().await?;
            sqlx::query(
                "INSERT INTO account.users (id, created, name, age, gender) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(user.ident())
            .bind(user.created())
            .bind(user.name())
            .bind(user.age())
            .bind(user.gender())
            .execute(&mut trx)
            .await?;
            trx.commit().await?;
            Ok(())
        }

        async fn find_user(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
            let row = sqlx::query(&format!("{SELECT_USER} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            Ok(row.as_ref().map(User::try_from).transpose()?)
        }

        async fn find_users(&self, page: Page) -> Result<Vec<User>, PersistenceError> {
            let skip = i64::try_from(page.skip).unwrap_or(i64::MAX);
            let take = i64::try_from(page.take).unwrap_or(i64::MAX);

            let sql = format!("{SELECT_USER} ORDER BY created, id OFFSET $1 LIMIT $2");
            let mut rows = sqlx::query(&sql).bind(skip).bind(take).fetch(&self.pool);

            let mut users = Vec::new();
            while let Some(row) = rows.try_next().await? {
                users.push(User::try_from(&row)?);
            }

            Ok(users)
        }

        async fn update_user(&self, user: &User) -> Result<bool, PersistenceError> {
            let mut trx = self.pool.begin().await?;
            let result = sqlx::query(
                "UPDATE account.users SET name = $2, age = $3, gender = $4 WHERE id = $1",
            )
            .bind(user.ident())
            .bind(user.name())
            .bind(user.age())
            .bind(user.gender())
            .execute(&mut trx)
            .await?;
            trx.commit().await?;
            Ok(result.rows_affected() > 0)
        }

        async fn delete_user(&self, user: &User) -> Result<bool, PersistenceError> {
            let mut trx = self.pool.begin().await?;
            let result = sqlx::query("DELETE FROM account.users WHERE id = $1")
                .bind(user.ident())
                .execute(&mut trx)
                .await?;
            trx.commit().await?;
            Ok(result.rows_affected() > 0)
        }
    }
}
