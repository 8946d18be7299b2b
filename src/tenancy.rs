//! Host-based tenant resolution.
//!
//! The first dot-separated label of the `Host` header names the tenant:
//! `demo.example.com` → `demo`. Hosts with a single label, local development hosts
//! and IPv4 literals resolve to no tenant. Resolving to no tenant is not an error;
//! each route decides whether it needs one.

use axum::http::{HeaderMap, Uri, header};

use crate::{error::AppError, models::tenant::Tenant, services::directory::Directory};

/// First labels that never name a tenant.
///
/// `127` and `0` cover `127.0.0.1` and `0.0.0.0` style hosts.
const RESERVED_LABELS: [&str; 3] = ["localhost", "127", "0"];

/// Subdomain candidate for `host`, if any. The port (if present) is ignored and the
/// label is returned with its original case.
pub fn candidate_subdomain(host: &str) -> Option<&str> {
    let mut labels = host.split('.');
    let first = labels.next()?;
    labels.next()?;

    if first.is_empty() || RESERVED_LABELS.contains(&first) {
        return None;
    }
    Some(first)
}

/// Whether `label` is a reserved first label that resolution always ignores.
pub fn is_reserved_label(label: &str) -> bool {
    RESERVED_LABELS.contains(&label)
}

/// Host the client addressed: the `Host` header, or the URI authority for HTTP/2.
pub fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
}

/// Look up the active tenant named by `host`.
pub async fn resolve(directory: &dyn Directory, host: Option<&str>) -> Result<Option<Tenant>, AppError> {
    let Some(subdomain) = host.and_then(candidate_subdomain) else {
        return Ok(None);
    };

    let tenant = directory.active_tenant_by_subdomain(subdomain).await?;
    if tenant.is_none() {
        tracing::debug!(subdomain, "no active tenant for subdomain");
    }
    Ok(tenant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::directory::memory::MemoryDirectory;

    #[test]
    fn first_label_is_the_candidate() {
        assert_eq!(candidate_subdomain("demo.example.com"), Some("demo"));
        assert_eq!(candidate_subdomain("demo.example.com:8080"), Some("demo"));
        assert_eq!(candidate_subdomain("Demo.example.com"), Some("Demo"));
    }

    #[test]
    fn local_and_single_label_hosts_have_no_candidate() {
        assert_eq!(candidate_subdomain("localhost:8080"), None);
        assert_eq!(candidate_subdomain("localhost.localdomain"), None);
        assert_eq!(candidate_subdomain("127.0.0.1:8080"), None);
        assert_eq!(candidate_subdomain("0.0.0.0"), None);
        assert_eq!(candidate_subdomain("example"), None);
        assert_eq!(candidate_subdomain(""), None);
        assert_eq!(candidate_subdomain(".example.com"), None);
    }

    #[test]
    fn host_header_wins_over_authority() {
        let mut headers = HeaderMap::new();
        let uri: Uri = "http://other.example.com/api".parse().unwrap();
        assert_eq!(request_host(&headers, &uri), Some("other.example.com"));

        headers.insert(header::HOST, "demo.example.com".parse().unwrap());
        assert_eq!(request_host(&headers, &uri), Some("demo.example.com"));
    }

    #[tokio::test]
    async fn resolves_active_tenant_only() {
        let directory = MemoryDirectory::default()
            .with_tenant(1, "demo", true)
            .with_tenant(2, "closed", false);

        let tenant = resolve(&directory, Some("demo.example.com")).await.unwrap();
        assert_eq!(tenant.map(|t| t.id), Some(1));

        assert!(resolve(&directory, Some("closed.example.com")).await.unwrap().is_none());
        assert!(resolve(&directory, Some("unknown.example.com")).await.unwrap().is_none());
        assert!(resolve(&directory, Some("DEMO.example.com")).await.unwrap().is_none());
        assert!(resolve(&directory, Some("localhost:8080")).await.unwrap().is_none());
        assert!(resolve(&directory, None).await.unwrap().is_none());
    }
}
