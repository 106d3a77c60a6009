//! PostgreSQL Repository Implementations

use crate::domain::entities::{AllowedDomain, FormToken, NewOwner, Owner};
use crate::domain::repository::{AllowedDomainRepository, FormTokenRepository, OwnerRepository};
use crate::domain::value_objects::{ChatId, DomainId, OwnerId};
use crate::error::RelayResult;
use chrono::{DateTime, Utc};
use kernel::id::FormTokenId;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgRelayRepository {
    pool: PgPool,
}

impl PgRelayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OwnerRepository for PgRelayRepository {
    async fn find_owner_by_telegram_id(
        &self,
        telegram_user_id: i64,
    ) -> RelayResult<Option<Owner>> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            SELECT owner_id, telegram_user_id, telegram_user_name, verified_at, created_at
            FROM relay_owners
            WHERE telegram_user_id = $1
            "#,
        )
        .bind(telegram_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OwnerRow::into_owner))
    }

    async fn create_owner(&self, owner: &NewOwner) -> RelayResult<Owner> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            INSERT INTO relay_owners (telegram_user_id, telegram_user_name, verified_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (telegram_user_id)
            DO UPDATE SET telegram_user_id = EXCLUDED.telegram_user_id
            RETURNING owner_id, telegram_user_id, telegram_user_name, verified_at, created_at
            "#,
        )
        .bind(owner.telegram_user_id)
        .bind(owner.telegram_user_name.as_deref())
        .bind(owner.verified_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(owner_id = row.owner_id, "Owner stored");

        Ok(row.into_owner())
    }
}

impl FormTokenRepository for PgRelayRepository {
    async fn find_token(&self, id: FormTokenId) -> RelayResult<Option<FormToken>> {
        let row = sqlx::query_as::<_, FormTokenRow>(
            r#"
            SELECT form_token_id, owner_id, form_name, chat_id, created_at
            FROM relay_form_tokens
            WHERE form_token_id = $1
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FormTokenRow::into_form_token))
    }

    async fn find_token_by_name(
        &self,
        owner_id: OwnerId,
        name: &str,
    ) -> RelayResult<Option<FormToken>> {
        let row = sqlx::query_as::<_, FormTokenRow>(
            r#"
            SELECT form_token_id, owner_id, form_name, chat_id, created_at
            FROM relay_form_tokens
            WHERE owner_id = $1 AND form_name = $2
            "#,
        )
        .bind(owner_id.0)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FormTokenRow::into_form_token))
    }

    async fn create_token(&self, token: &FormToken) -> RelayResult<()> {
        sqlx::query(
            r#"
            INSERT INTO relay_form_tokens (form_token_id, owner_id, form_name, chat_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(token.id.into_uuid())
        .bind(token.owner_id.0)
        .bind(&token.name)
        .bind(token.chat_id.0)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(form_token = %token.id, owner_id = token.owner_id.0, "Form token created");

        Ok(())
    }

    async fn list_tokens(&self, owner_id: OwnerId) -> RelayResult<Vec<FormToken>> {
        let rows = sqlx::query_as::<_, FormTokenRow>(
            r#"
            SELECT form_token_id, owner_id, form_name, chat_id, created_at
            FROM relay_form_tokens
            WHERE owner_id = $1
            ORDER BY created_at, form_name
            "#,
        )
        .bind(owner_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FormTokenRow::into_form_token).collect())
    }

    async fn delete_token(&self, id: FormTokenId, owner_id: OwnerId) -> RelayResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM relay_form_tokens WHERE form_token_id = $1 AND owner_id = $2",
        )
        .bind(id.into_uuid())
        .bind(owner_id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }
}

impl AllowedDomainRepository for PgRelayRepository {
    async fn list_domains(&self, owner_id: OwnerId) -> RelayResult<Vec<AllowedDomain>> {
        let rows = sqlx::query_as::<_, AllowedDomainRow>(
            r#"
            SELECT domain_id, owner_id, domain_name, created_at
            FROM relay_allowed_domains
            WHERE owner_id = $1
            ORDER BY domain_id
            "#,
        )
        .bind(owner_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AllowedDomainRow::into_domain).collect())
    }

    async fn find_domain(
        &self,
        id: DomainId,
        owner_id: OwnerId,
    ) -> RelayResult<Option<AllowedDomain>> {
        let row = sqlx::query_as::<_, AllowedDomainRow>(
            r#"
            SELECT domain_id, owner_id, domain_name, created_at
            FROM relay_allowed_domains
            WHERE domain_id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AllowedDomainRow::into_domain))
    }

    async fn domain_exists(&self, owner_id: OwnerId, name: &str) -> RelayResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM relay_allowed_domains WHERE owner_id = $1 AND domain_name = $2)",
        )
        .bind(owner_id.0)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_domain(&self, owner_id: OwnerId, name: &str) -> RelayResult<AllowedDomain> {
        let row = sqlx::query_as::<_, AllowedDomainRow>(
            r#"
            INSERT INTO relay_allowed_domains (owner_id, domain_name)
            VALUES ($1, $2)
            RETURNING domain_id, owner_id, domain_name, created_at
            "#,
        )
        .bind(owner_id.0)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_domain())
    }

    async fn delete_domain(&self, id: DomainId, owner_id: OwnerId) -> RelayResult<bool> {
        let deleted =
            sqlx::query("DELETE FROM relay_allowed_domains WHERE domain_id = $1 AND owner_id = $2")
                .bind(id.0)
                .bind(owner_id.0)
                .execute(&self.pool)
                .await?
                .rows_affected();

        if deleted > 0 {
            tracing::info!(domain_id = id.0, "Allowed domain deleted");
        }

        Ok(deleted > 0)
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct OwnerRow {
    owner_id: i64,
    telegram_user_id: i64,
    telegram_user_name: Option<String>,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl OwnerRow {
    fn into_owner(self) -> Owner {
        Owner {
            id: OwnerId(self.owner_id),
            telegram_user_id: self.telegram_user_id,
            telegram_user_name: self.telegram_user_name,
            verified_at: self.verified_at,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FormTokenRow {
    form_token_id: Uuid,
    owner_id: i64,
    form_name: String,
    chat_id: i64,
    created_at: DateTime<Utc>,
}

impl FormTokenRow {
    fn into_form_token(self) -> FormToken {
        FormToken {
            id: FormTokenId::from_uuid(self.form_token_id),
            owner_id: OwnerId(self.owner_id),
            name: self.form_name,
            chat_id: ChatId(self.chat_id),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AllowedDomainRow {
    domain_id: i64,
    owner_id: i64,
    domain_name: String,
    created_at: DateTime<Utc>,
}

impl AllowedDomainRow {
    fn into_domain(self) -> AllowedDomain {
        AllowedDomain {
            id: DomainId(self.domain_id),
            owner_id: OwnerId(self.owner_id),
            name: self.domain_name,
            created_at: self.created_at,
        }
    }
}
