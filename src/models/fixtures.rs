//! Helpers to seed database records in tests.

use crate::db::DbPool;
use crate::models::User;

pub async fn create_user(pool: &DbPool, email: &str) -> User {
    User::create(pool, email, "Test User")
        .await
        .expect("user fixture should be created")
}
