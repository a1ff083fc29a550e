/*
 * Responsibility
 * - membership guard 用の tenant_memberships lookup
 * - 行の作成は別の管理フロー。ここは読むだけ
 */
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Active,
    Inactive,
    Rejected,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Rejected => "rejected",
        }
    }

    /// Unknown values are treated as `inactive` so they can never pass the gate.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "active" => Self::Active,
            "rejected" => Self::Rejected,
            _ => Self::Inactive,
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: String,
    pub user_id: String,
    pub tenant_id: String,
    /// Tenant-scoped role; independent of the user's global role.
    pub role: String,
    pub status: MembershipStatus,
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn find(&self, user_id: &str, tenant_id: &str) -> Result<Option<Membership>, RepoError>;
}

#[derive(Debug, FromRow)]
struct MembershipRow {
    #[sqlx(rename = "membershipId")]
    id: Uuid,
    #[sqlx(rename = "userId")]
    user_id: Uuid,
    #[sqlx(rename = "tenantId")]
    tenant_id: Uuid,
    role: String,
    status: String,
}

impl From<MembershipRow> for Membership {
    fn from(row: MembershipRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id.to_string(),
            tenant_id: row.tenant_id.to_string(),
            role: row.role,
            status: MembershipStatus::parse(&row.status),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgMembershipStore {
    db: PgPool,
}

impl PgMembershipStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn find(&self, user_id: &str, tenant_id: &str) -> Result<Option<Membership>, RepoError> {
        let (Ok(user_id), Ok(tenant_id)) = (Uuid::parse_str(user_id), Uuid::parse_str(tenant_id))
        else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT "membershipId", "userId", "tenantId", role, status
            FROM tenant_memberships
            WHERE "userId" = $1
              AND "tenantId" = $2
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Membership::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(MembershipStatus::parse("Active"), MembershipStatus::Active);
        assert_eq!(MembershipStatus::parse(" pending "), MembershipStatus::Pending);
        assert_eq!(MembershipStatus::parse("rejected"), MembershipStatus::Rejected);
    }

    #[test]
    fn unknown_status_never_reads_as_active() {
        assert_eq!(MembershipStatus::parse("suspended"), MembershipStatus::Inactive);
        assert_eq!(MembershipStatus::parse(""), MembershipStatus::Inactive);
    }
}
