//! Tenant identifier extraction.
//!
//! Sources are tried in a fixed order and the first candidate that passes
//! [`is_valid_identifier`] wins:
//!
//! 1. the tenant header
//! 2. the first label of a host with at least three labels (`acme.example.com`)
//! 3. the tenant id already resolved by the authentication guard
//! 4. the tenant query parameter, when enabled
//!
//! A rejected candidate only disqualifies its own source.
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;

use axum::extract::Query;
use axum::http::{HeaderMap, Uri, header};

use crate::config::TenantSourceConfig;
use crate::services::tenant::validator::{canonical_identifier, is_valid_identifier};

pub const RESERVED_SUBDOMAINS: [&str; 3] = ["www", "api", "admin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantSource {
    Header,
    Subdomain,
    Context,
    Query,
}

impl fmt::Display for TenantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TenantSource::Header => "header",
            TenantSource::Subdomain => "subdomain",
            TenantSource::Context => "context",
            TenantSource::Query => "query",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTenant {
    pub identifier: String,
    pub source: TenantSource,
}

/// Everything the extractor may look at for one request.
#[derive(Debug, Clone, Copy)]
pub struct TenantRequest<'a> {
    pub headers: &'a HeaderMap,
    pub uri: &'a Uri,
    /// Tenant id carried by the authenticated identity, if any.
    pub context_tenant: Option<&'a str>,
}

pub fn extract(req: TenantRequest<'_>, sources: &TenantSourceConfig) -> Option<ExtractedTenant> {
    let candidates = [
        (TenantSource::Header, from_header(req.headers, &sources.header)),
        (TenantSource::Subdomain, from_host(req.headers, req.uri)),
        (TenantSource::Context, req.context_tenant.map(str::to_string)),
        (
            TenantSource::Query,
            sources
                .query_fallback
                .then(|| from_query(req.uri, &sources.query_param))
                .flatten(),
        ),
    ];

    for (source, candidate) in candidates {
        let Some(candidate) = candidate else {
            continue;
        };
        if is_valid_identifier(&candidate) {
            return Some(ExtractedTenant {
                identifier: canonical_identifier(&candidate),
                source,
            });
        }
        tracing::debug!(%source, "rejected tenant identifier candidate");
    }

    None
}

fn from_header(headers: &HeaderMap, name: &str) -> Option<String> {
    // 複数値は proxy と同じく ", " で連結 → validator で弾かれる
    let values = headers
        .get_all(name)
        .iter()
        .map(|v| v.to_str().ok())
        .collect::<Option<Vec<_>>>()?;

    if values.is_empty() {
        return None;
    }
    Some(values.join(", "))
}

fn from_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.host())?;

    subdomain_label(host)
}

/// First label of `host` when it has at least three labels and is not reserved.
pub fn subdomain_label(host: &str) -> Option<String> {
    if host.starts_with('[') {
        // IPv6 literal
        return None;
    }

    let host = host.split(':').next().unwrap_or(host).to_ascii_lowercase();
    if host.parse::<IpAddr>().is_ok() {
        return None;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 3 {
        return None;
    }

    let first = labels[0];
    if first.is_empty() || RESERVED_SUBDOMAINS.contains(&first) {
        return None;
    }
    Some(first.to_string())
}

fn from_query(uri: &Uri, param: &str) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params.get(param).cloned()
}
