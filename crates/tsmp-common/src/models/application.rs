//! Membership applications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending server-membership application. A user has at most one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Free-form answers to the application questions
    pub answers: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
