/*
 * Responsibility
 * - authentication guard 用の users テーブル読み取り
 * - `UserRepository` が境界、`PgUserRepository` が本番用 adapter
 * - 非アクティブな user はここで除外 (呼び出し側は found / not found だけを見る)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

/// A platform user as the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Global role, used when the credential carries no role claim.
    pub role: String,
    pub default_tenant_id: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `Ok(None)` covers both "no such user" and "user is not active".
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, RepoError>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    #[sqlx(rename = "userId")]
    id: Uuid,
    email: String,
    role: String,
    #[sqlx(rename = "defaultTenantId")]
    default_tenant_id: Option<Uuid>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.to_string(),
            email: row.email,
            role: row.role,
            default_tenant_id: row.default_tenant_id.map(|t| t.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, RepoError> {
        // この schema の user id は UUID。それ以外は解決しようがない
        let Ok(user_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", email, role, "defaultTenantId"
            FROM users
            WHERE "userId" = $1
              AND "isActive" = true
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(User::from))
    }
}
