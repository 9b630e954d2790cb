use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

/// An account that has not been persisted yet. `password_hash` must already
/// be the output of [`crate::service::password::hash_password`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub online: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created { id: i64 },
    AlreadyPresent { id: i64 },
}

impl SeedOutcome {
    pub fn id(&self) -> i64 {
        match self {
            SeedOutcome::Created { id } | SeedOutcome::AlreadyPresent { id } => *id,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, SeedOutcome::Created { .. })
    }
}
