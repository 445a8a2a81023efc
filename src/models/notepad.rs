use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;

use crate::db::DbPool;

/// A user-owned note.
///
/// `user_id` is set at creation time and never reassigned; every read goes
/// through the owner, so a notepad is invisible to any other user.
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Notepad {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl Notepad {
    pub async fn create(
        pool: &DbPool,
        user_id: i64,
        title: &str,
        body: &str,
    ) -> Result<Self, sqlx::Error> {
        let id = sqlx::query("INSERT INTO notepads (user_id, title, body) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(title)
            .bind(body)
            .execute(pool)
            .await?
            .last_insert_rowid();
        Ok(Self {
            id,
            user_id,
            title: title.to_owned(),
            body: body.to_owned(),
        })
    }

    pub async fn list_for_user(pool: &DbPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notepad>(
            "SELECT id, user_id, title, body FROM notepads WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Ownership is part of the lookup: a foreign id reads like a missing one.
    pub async fn retrieve_for_user(
        pool: &DbPool,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notepad>(
            "SELECT id, user_id, title, body FROM notepads WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
