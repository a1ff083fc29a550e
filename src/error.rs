/*
 * Responsibility
 * - guard pipeline の失敗種別 (GuardError)
 * - IntoResponse 実装 (種別ごとの HTTP status + 固定の {"success": false, "error": ...})
 * - 内部向けの失敗は汎用メッセージで返す
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::MembershipStatus;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("authorization header required")]
    MissingCredential,
    #[error("invalid authorization header format")]
    InvalidCredentialFormat,
    #[error("invalid token")]
    InvalidToken,
    #[error("token has expired")]
    ExpiredToken,
    #[error("user not found")]
    UserNotFound,

    #[error("tenant identifier required")]
    MissingTenant,
    #[error("tenant not found")]
    TenantNotFound,

    /// An upstream guard did not run or did not populate its context field.
    #[error("missing request context: {0}")]
    MissingContext(&'static str),

    #[error("you are not a member of this tenant")]
    MembershipNotFound,
    #[error("membership is {status}")]
    MembershipNotActive { status: MembershipStatus },

    #[error("insufficient permissions: requires {required}")]
    AuthorizationDenied { required: String },
}

impl GuardError {
    pub fn status(&self) -> StatusCode {
        match self {
            GuardError::MissingCredential
            | GuardError::InvalidCredentialFormat
            | GuardError::InvalidToken
            | GuardError::ExpiredToken
            | GuardError::UserNotFound => StatusCode::UNAUTHORIZED,
            GuardError::MissingTenant => StatusCode::BAD_REQUEST,
            GuardError::TenantNotFound => StatusCode::NOT_FOUND,
            GuardError::MissingContext(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GuardError::MembershipNotFound
            | GuardError::MembershipNotActive { .. }
            | GuardError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
        }
    }

    /// Message shown to the client. Pipeline wiring details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            GuardError::MissingContext(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn denied(required: impl Into<String>) -> Self {
        Self::AuthorizationDenied {
            required: required.into(),
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        if let GuardError::MissingContext(field) = &self {
            tracing::error!(missing = field, "guard pipeline is miswired");
        }

        let body = ErrorResponse {
            success: false,
            error: self.public_message(),
        };

        (self.status(), Json(body)).into_response()
    }
}
