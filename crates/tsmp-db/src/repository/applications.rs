//! Application repository.

use sqlx::PgPool;
use tsmp_common::models::application::Application;
use uuid::Uuid;

/// The user's application, if they have one.
pub async fn find_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Delete an application. Returns `false` when it no longer existed.
pub async fn delete_application(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
