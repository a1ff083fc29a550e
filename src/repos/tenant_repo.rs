/*
 * Responsibility
 * - tenant registry の lookup (id または slug、active な tenant のみ)
 * - 正は registry。tenant directory はその結果を cache するだけ
 */
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

pub const TENANT_STATUS_ACTIVE: &str = "active";

/// Snapshot of a tenant as stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantRecord {
    pub id: String,
    pub slug: String,
    pub name: String,
    /// Identifier of the store holding this tenant's data.
    pub database_name: String,
    pub status: String,
}

impl TenantRecord {
    pub fn is_active(&self) -> bool {
        self.status == TENANT_STATUS_ACTIVE
    }
}

#[async_trait]
pub trait TenantRegistry: Send + Sync {
    /// Match `identifier` against the tenant id or slug. Only active tenants are returned.
    async fn lookup(&self, identifier: &str) -> Result<Option<TenantRecord>, RepoError>;
}

#[derive(Debug, FromRow)]
struct TenantRow {
    #[sqlx(rename = "tenantId")]
    id: Uuid,
    slug: String,
    name: String,
    #[sqlx(rename = "databaseName")]
    database_name: String,
    status: String,
}

impl From<TenantRow> for TenantRecord {
    fn from(row: TenantRow) -> Self {
        Self {
            id: row.id.to_string(),
            slug: row.slug,
            name: row.name,
            database_name: row.database_name,
            status: row.status,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgTenantRegistry {
    db: PgPool,
}

impl PgTenantRegistry {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantRegistry for PgTenantRegistry {
    async fn lookup(&self, identifier: &str) -> Result<Option<TenantRecord>, RepoError> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT "tenantId", slug, name, "databaseName", status
            FROM tenants
            WHERE ("tenantId"::text = $1 OR slug = $1)
              AND status = $2
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .bind(TENANT_STATUS_ACTIVE)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(TenantRecord::from))
    }
}
