//! User repository: lookups and the Minecraft link reset.

use sqlx::PgPool;
use tsmp_common::models::{account::DISCORD_PROVIDER, user::User};
use uuid::Uuid;

/// Find a user by their unique ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find the user a Minecraft account is linked to.
pub async fn find_by_minecraft_uuid(
    pool: &PgPool,
    minecraft_uuid: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE minecraft_uuid = $1 LIMIT 1")
        .bind(minecraft_uuid)
        .fetch_optional(pool)
        .await
}

/// Find the user who logged in with the given Discord account.
pub async fn find_by_discord_id(
    pool: &PgPool,
    discord_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM users u
        JOIN accounts a ON a.user_id = u.id
        WHERE a.provider = $1 AND a.provider_account_id = $2
        "#,
    )
    .bind(DISCORD_PROVIDER)
    .bind(discord_id)
    .fetch_optional(pool)
    .await
}

/// Clear the Minecraft link and any pending link challenge together.
///
/// Returns whether a user row was updated.
pub async fn clear_minecraft_link(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users SET
            minecraft_uuid = NULL,
            link_challenge = NULL,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
