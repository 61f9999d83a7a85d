use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::membership::MembershipTier;
use crate::store::StoreError;

/// A user as returned to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub membership_tier: MembershipTier,
    pub created_at: DateTime<Utc>,
}

/// A user as persisted in the credential store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

impl UserRecord {
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        Self {
            user: User {
                id: Uuid::new_v4().to_string(),
                email,
                name,
                membership_tier: MembershipTier::Free,
                created_at: Utc::now(),
            },
            password_hash,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub membership_tier: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let membership_tier = row
            .membership_tier
            .parse()
            .map_err(|e| StoreError::Serialization(serde::de::Error::custom(e)))?;
        Ok(UserRecord {
            user: User {
                id: row.id,
                email: row.email,
                name: row.name,
                membership_tier,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        })
    }
}
