/*
 * Responsibility
 * - guard layer が書いた request context を handler から読む
 * - `Current*` は guard が走っていなければ MissingContext で reject (配線ミス → 500)
 * - `Maybe*` は reject しない。optional guard の後ろの route 用
 */
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::{AuthenticatedIdentity, MembershipContext, RequestContext, TenantContext};
use crate::error::GuardError;

fn context(parts: &Parts) -> Option<&RequestContext> {
    parts.extensions.get::<RequestContext>()
}

pub struct CurrentIdentity(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context(parts)
            .and_then(|ctx| ctx.identity.clone())
            .map(CurrentIdentity)
            .ok_or(GuardError::MissingContext("identity"))
    }
}

pub struct CurrentTenant(pub TenantContext);

impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context(parts)
            .and_then(|ctx| ctx.tenant.clone())
            .map(CurrentTenant)
            .ok_or(GuardError::MissingContext("tenant"))
    }
}

pub struct CurrentMembership(pub MembershipContext);

impl<S> FromRequestParts<S> for CurrentMembership
where
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context(parts)
            .and_then(|ctx| ctx.membership.clone())
            .map(CurrentMembership)
            .ok_or(GuardError::MissingContext("membership"))
    }
}

pub struct MaybeIdentity(pub Option<AuthenticatedIdentity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(context(parts).and_then(|ctx| ctx.identity.clone())))
    }
}

pub struct MaybeMembership(pub Option<MembershipContext>);

impl<S> FromRequestParts<S> for MaybeMembership
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeMembership(context(parts).and_then(|ctx| ctx.membership.clone())))
    }
}

pub struct MaybeTenant(pub Option<TenantContext>);

impl<S> FromRequestParts<S> for MaybeTenant
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeTenant(context(parts).and_then(|ctx| ctx.tenant.clone())))
    }
}
