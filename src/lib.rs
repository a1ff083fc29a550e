/*
 * Responsibility
 * - crate root: identity / tenant / authorization pipeline のモジュール構成
 * - binary (main.rs) は app::run() を呼ぶだけ
 */
pub mod api;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
