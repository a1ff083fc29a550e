/*
 * Responsibility
 * - v1 の URL 構造
 * - どの route group をどの guard pipeline で守るか
 */
use axum::{
    Router,
    routing::{delete, get},
};

use crate::api::v1::handlers::{
    admin::{invalidate_tenant, tenant_cache_stats},
    me::me,
    tenant::{catalog, current_tenant, staff_overview},
};
use crate::middleware::{GuardMode, Pipeline};
use crate::services::roles::{Role, RoleRequirement};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let authenticated = Pipeline::new(state.clone())
        .authenticate(GuardMode::Required)
        .apply(Router::new().route("/me", get(me)));

    // 未ログイン / tenant なし / 非メンバーでも通す
    let public = Pipeline::new(state.clone())
        .authenticate(GuardMode::Optional)
        .tenant(GuardMode::Optional)
        .membership(GuardMode::Optional)
        .apply(Router::new().route("/catalog", get(catalog)));

    let tenant_scoped = Pipeline::new(state.clone())
        .authenticate(GuardMode::Required)
        .tenant(GuardMode::Required)
        .membership(GuardMode::Required)
        .apply(Router::new().route("/tenant", get(current_tenant)));

    let staff = Pipeline::new(state.clone())
        .authenticate(GuardMode::Required)
        .tenant(GuardMode::Required)
        .membership(GuardMode::Required)
        .require_role(RoleRequirement::any_of([
            Role::Instructor.as_str(),
            Role::Admin.as_str(),
        ]))
        .apply(Router::new().route("/tenant/staff", get(staff_overview)));

    let admin = Pipeline::new(state)
        .authenticate(GuardMode::Required)
        .require_role(RoleRequirement::at_least(Role::Admin))
        .apply(
            Router::new()
                .route("/admin/tenant-cache", get(tenant_cache_stats))
                .route("/admin/tenant-cache/{identifier}", delete(invalidate_tenant)),
        );

    Router::new()
        .merge(authenticated)
        .merge(public)
        .merge(tenant_scoped)
        .merge(staff)
        .merge(admin)
}
