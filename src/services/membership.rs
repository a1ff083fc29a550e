/*
 * Responsibility
 * - membership guard の本体: 認証済み user が解決済み tenant に active な membership を持つこと
 * - 返す scoped role は handler 向けの参考情報。role チェックでは読まない
 */
use crate::context::{AuthenticatedIdentity, MembershipContext, TenantContext};
use crate::error::GuardError;
use crate::repos::MembershipStatus;
use crate::services::deadline::bounded;
use crate::state::AppState;

pub async fn check_membership(
    state: &AppState,
    identity: Option<&AuthenticatedIdentity>,
    tenant: Option<&TenantContext>,
) -> Result<MembershipContext, GuardError> {
    let identity = identity.ok_or(GuardError::MissingContext("identity"))?;
    let tenant = tenant.ok_or(GuardError::MissingContext("tenant"))?;

    let found = bounded(
        "membership_store.find",
        state.call_timeout,
        state.memberships.find(&identity.user_id, tenant.tenant_id()),
    )
    .await;

    let membership = match found {
        Ok(Some(membership)) => membership,
        Ok(None) => {
            tracing::info!(
                user_id = %identity.user_id,
                tenant_id = %tenant.tenant_id(),
                "no membership in tenant"
            );
            return Err(GuardError::MembershipNotFound);
        }
        Err(err) => {
            tracing::error!(
                user_id = %identity.user_id,
                tenant_id = %tenant.tenant_id(),
                error = %err,
                "membership lookup failed"
            );
            return Err(GuardError::MembershipNotFound);
        }
    };

    if membership.status != MembershipStatus::Active {
        tracing::info!(
            user_id = %identity.user_id,
            tenant_id = %tenant.tenant_id(),
            status = %membership.status,
            "membership not active"
        );
        return Err(GuardError::MembershipNotActive {
            status: membership.status,
        });
    }

    Ok(MembershipContext {
        role: membership.role,
        status: membership.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tenant::TenantSource;
    use crate::test_support::{Fixture, membership, tenant};

    fn identity(user_id: &str) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            effective_role: "student".to_string(),
            tenant_id: None,
            claims: serde_json::Value::Null,
        }
    }

    fn tenant_ctx(id: &str) -> TenantContext {
        TenantContext {
            record: tenant(id, "acme-corp"),
            identifier: "acme-corp".to_string(),
            source: TenantSource::Header,
        }
    }

    #[tokio::test]
    async fn active_membership_yields_scoped_role() {
        let fx = Fixture::new();
        fx.memberships
            .insert(membership("u1", "t1", "instructor", MembershipStatus::Active))
            .await;

        let ctx = check_membership(&fx.state(), Some(&identity("u1")), Some(&tenant_ctx("t1")))
            .await
            .expect("member");
        assert_eq!(ctx.role, "instructor");
        assert_eq!(ctx.status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn non_active_statuses_are_named() {
        for status in [
            MembershipStatus::Pending,
            MembershipStatus::Inactive,
            MembershipStatus::Rejected,
        ] {
            let fx = Fixture::new();
            fx.memberships
                .insert(membership("u1", "t1", "student", status))
                .await;

            let err = check_membership(&fx.state(), Some(&identity("u1")), Some(&tenant_ctx("t1")))
                .await
                .unwrap_err();
            assert_eq!(err, GuardError::MembershipNotActive { status });
            assert!(err.public_message().contains(status.as_str()));
        }
    }

    #[tokio::test]
    async fn membership_in_other_tenant_does_not_count() {
        let fx = Fixture::new();
        fx.memberships
            .insert(membership("u1", "t2", "admin", MembershipStatus::Active))
            .await;

        assert_eq!(
            check_membership(&fx.state(), Some(&identity("u1")), Some(&tenant_ctx("t1"))).await,
            Err(GuardError::MembershipNotFound)
        );
    }

    #[tokio::test]
    async fn missing_upstream_context() {
        let fx = Fixture::new();
        let state = fx.state();

        assert_eq!(
            check_membership(&state, None, Some(&tenant_ctx("t1"))).await,
            Err(GuardError::MissingContext("identity"))
        );
        assert_eq!(
            check_membership(&state, Some(&identity("u1")), None).await,
            Err(GuardError::MissingContext("tenant"))
        );
    }
}
