use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;

use crate::db::DbPool;

/// A user as provisioned by the authentication gateway.
///
/// The gateway owns registration, passwords and sessions; this service only
/// ever resolves a forwarded identity to one of these records.
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl User {
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, email, name FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &DbPool, email: &str, name: &str) -> Result<Self, sqlx::Error> {
        let id = sqlx::query("INSERT INTO users (email, name) VALUES (?, ?)")
            .bind(email)
            .bind(name)
            .execute(pool)
            .await?
            .last_insert_rowid();
        Ok(Self {
            id,
            email: email.to_owned(),
            name: name.to_owned(),
        })
    }
}
