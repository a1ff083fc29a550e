/*
 * Responsibility
 * - middleware 層の公開インターフェース
 * - `Pipeline` が guard layer を固定順 (authentication → tenant → membership → role) で Router に載せる
 */
pub mod authentication;
pub mod http;
pub mod membership;
pub mod mode;
pub mod role;
pub mod tenant;

use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state};

use crate::services::roles::RoleRequirement;
use crate::state::AppState;

use self::authentication::authentication_middleware;
use self::membership::membership_middleware;
use self::role::role_middleware;
use self::tenant::tenant_middleware;

pub use mode::GuardMode;

/// State handed to each guard layer.
#[derive(Clone, Debug)]
pub struct GuardState {
    pub app: AppState,
    pub mode: GuardMode,
}

/// Which guards protect a group of routes.
///
/// ```ignore
/// let staff = Pipeline::new(state.clone())
///     .authenticate(GuardMode::Required)
///     .tenant(GuardMode::Required)
///     .membership(GuardMode::Required)
///     .require_role(RoleRequirement::any_of(["instructor", "admin"]))
///     .apply(Router::new().route("/tenant/staff", get(staff)));
/// ```
#[derive(Clone, Debug)]
pub struct Pipeline {
    state: AppState,
    authentication: Option<GuardMode>,
    tenant: Option<GuardMode>,
    membership: Option<GuardMode>,
    role: Option<RoleRequirement>,
}

impl Pipeline {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            authentication: None,
            tenant: None,
            membership: None,
            role: None,
        }
    }

    pub fn authenticate(mut self, mode: GuardMode) -> Self {
        self.authentication = Some(mode);
        self
    }

    pub fn tenant(mut self, mode: GuardMode) -> Self {
        self.tenant = Some(mode);
        self
    }

    pub fn membership(mut self, mode: GuardMode) -> Self {
        self.membership = Some(mode);
        self
    }

    pub fn require_role(mut self, requirement: RoleRequirement) -> Self {
        self.role = Some(requirement);
        self
    }

    /// Apply the configured guards to every route of `router`.
    ///
    /// Layers wrap from the inside out, so the last one added runs first: role is added
    /// first and authentication last.
    pub fn apply(self, router: Router<AppState>) -> Router<AppState> {
        let Pipeline {
            state,
            authentication,
            tenant,
            membership,
            role,
        } = self;
        let guard = |mode| GuardState {
            app: state.clone(),
            mode,
        };
        let mut router = router;

        if let Some(requirement) = role {
            router = router.route_layer(from_fn_with_state(
                Arc::new(requirement),
                role_middleware,
            ));
        }
        if let Some(mode) = membership {
            router = router.route_layer(from_fn_with_state(
                guard(mode),
                membership_middleware,
            ));
        }
        if let Some(mode) = tenant {
            router = router.route_layer(from_fn_with_state(guard(mode), tenant_middleware));
        }
        if let Some(mode) = authentication {
            router = router.route_layer(from_fn_with_state(
                guard(mode),
                authentication_middleware,
            ));
        }

        router
    }
}
