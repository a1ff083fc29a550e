/*
 * Responsibility
 * - 成功時の envelope: {"success": true, "data": ...}
 * - 失敗時の envelope は GuardError 側 (crate::error)
 */
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}
