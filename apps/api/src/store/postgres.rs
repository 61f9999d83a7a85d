use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgConnection, PgPool};

use crate::membership::MembershipTier;
use crate::models::user::{UserRecord, UserRow};
use crate::store::{document_id, Collection, DocumentStore, Query, StoreError, UserStore};

/// Document collections stored as JSONB rows in a single `documents` table,
/// keyed by `(collection, id)`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection.name())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count_containing(
        &self,
        collection: Collection,
        field: &str,
        needle: &str,
    ) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM documents WHERE collection = $1 AND strpos(body ->> $2::text, $3) > 0",
        )
        .bind(collection.name())
        .bind(field)
        .bind(needle)
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u64)
    }

    async fn find(&self, collection: Collection, query: &Query) -> Result<Vec<Value>, StoreError> {
        let filter = Value::Object(query.filter.clone());
        let limit = query.limit.map(|l| l as i64);

        let rows: Vec<(Value,)> = match query.sort {
            Some(sort) => {
                let direction = if sort.descending { "DESC" } else { "ASC" };
                let sql = format!(
                    "SELECT body FROM documents WHERE collection = $1 AND body @> $2 \
                     ORDER BY body -> $4::text {direction}, id LIMIT $3"
                );
                sqlx::query_as(&sql)
                    .bind(collection.name())
                    .bind(filter)
                    .bind(limit)
                    .bind(sort.field)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT body FROM documents WHERE collection = $1 AND body @> $2 ORDER BY id LIMIT $3",
                )
                .bind(collection.name())
                .bind(filter)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(|(body,)| body).collect())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Value>, StoreError> {
        let row: Option<(Value,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection.name())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(body,)| body))
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let inserted = insert_documents(&mut tx, collection, &docs).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn upsert(&self, collection: Collection, doc: Value) -> Result<(), StoreError> {
        let id = document_id(&doc)?;
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body
            "#,
        )
        .bind(collection.name())
        .bind(id)
        .bind(&doc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_all(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<(u64, u64), StoreError> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection.name())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let inserted = insert_documents(&mut tx, collection, &docs).await?;
        // dropping `tx` on any error above rolls the delete back
        tx.commit().await?;
        Ok((deleted, inserted))
    }

    async fn set_field_where(
        &self,
        collection: Collection,
        match_field: &str,
        match_value: &str,
        field: &str,
        value: Value,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_set(body, ARRAY[$4::text], $5::jsonb)
            WHERE collection = $1
              AND body ->> $2::text = $3
              AND (body -> $4::text) IS DISTINCT FROM $5::jsonb
            "#,
        )
        .bind(collection.name())
        .bind(match_field)
        .bind(match_value)
        .bind(field)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

async fn insert_documents(
    conn: &mut PgConnection,
    collection: Collection,
    docs: &[Value],
) -> Result<u64, StoreError> {
    let mut inserted = 0;
    for doc in docs {
        let id = document_id(doc)?;
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.name())
            .bind(id)
            .bind(doc)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(format!("{} id {id}", collection.name()))
                } else {
                    e.into()
                }
            })?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Credential store over the `users` table. `UNIQUE (email)` makes the
/// insert the arbiter of concurrent registrations.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

const USER_COLUMNS: &str = "id, email, name, password_hash, membership_tier, created_at";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn insert(&self, record: &UserRecord) -> Result<(), StoreError> {
        let user = &record.user;
        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        ))
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&record.password_hash)
        .bind(user.membership_tier.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate("email".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count_by_tier(&self, tier: MembershipTier) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE membership_tier = $1")
            .bind(tier.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
