//! Account repository: provider identities and their OAuth tokens.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tsmp_common::models::account::Account;
use uuid::Uuid;

/// All provider accounts linked to a user.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE user_id = $1 ORDER BY provider")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Store a refreshed OAuth token set.
pub async fn update_tokens(
    pool: &PgPool,
    id: Uuid,
    access_token: &str,
    refresh_token: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE accounts SET
            access_token = $2,
            refresh_token = COALESCE($3, refresh_token),
            expires_at = $4
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(access_token)
    .bind(refresh_token)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}
