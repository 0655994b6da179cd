//! # Tenant Routing
//!
//! Maps an incoming `(host, path, query)` to a routing decision before any
//! handler runs. Agency subdomains become path prefixes (`acme.example.com/x`
//! is served from `/acme/x`), the root is rewritten to the public site and
//! the bare auth pages redirect to the agency sign-in page.

use std::sync::OnceLock;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use regex::RegexSet;

use crate::server::AppState;

/// Agency sign-in page that the bare `/sign-in` and `/sign-up` paths redirect to.
pub const AGENCY_SIGN_IN_PATH: &str = "/agency/sign-in";

/// Public landing page the root path is rewritten to.
pub const SITE_PATH: &str = "/site";

const PUBLIC_ROUTE_PATTERNS: &[&str] = &[
    r"^/site(.*)$",
    r"^/api/uploadthing(.*)$",
    r"^/agency/sign-in(.*)$",
    r"^/agency/sign-up(.*)$",
];

fn public_routes() -> &'static RegexSet {
    static PUBLIC_ROUTES: OnceLock<RegexSet> = OnceLock::new();
    PUBLIC_ROUTES.get_or_init(|| {
        RegexSet::new(PUBLIC_ROUTE_PATTERNS).unwrap_or_else(|_| RegexSet::empty())
    })
}

/// Whether `path` is reachable without a session.
pub fn is_public_path(path: &str) -> bool {
    public_routes().is_match(path)
}

/// Outcome of routing a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the request as-is.
    Pass,
    /// Serve the request from a different internal path and query.
    Rewrite(String),
    /// Send the client elsewhere.
    Redirect(String),
}

/// Request extension describing how the request was routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRoute {
    /// Path the client actually requested
    pub original_path: String,
    /// Subdomain label the path was prefixed with, if any
    pub subdomain: Option<String>,
}

/// Extract the tenant label from `host`: everything before `base_domain`,
/// without the joining dot. Empty labels yield `None`.
pub fn subdomain_label(host: &str, base_domain: &str) -> Option<String> {
    if base_domain.is_empty() {
        return None;
    }

    let index = host
        .to_ascii_lowercase()
        .find(&base_domain.to_ascii_lowercase())?;
    let prefix = host[..index].trim_end_matches('.');
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_string())
    }
}

/// Decide how to route a request.
///
/// Public paths always pass. A tenant subdomain prefixes the path with its
/// label, keeping the query. Otherwise the root is rewritten to the site,
/// the bare sign-in/sign-up pages redirect and everything else passes.
pub fn resolve_route(
    host: Option<&str>,
    path: &str,
    query: Option<&str>,
    base_domain: &str,
) -> RouteDecision {
    if is_public_path(path) {
        return RouteDecision::Pass;
    }

    if let Some(label) = host.and_then(|host| subdomain_label(host, base_domain)) {
        let mut target = format!("/{label}{path}");
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        return RouteDecision::Rewrite(target);
    }

    match path {
        "/" => RouteDecision::Rewrite(SITE_PATH.to_string()),
        "/sign-in" | "/sign-up" => RouteDecision::Redirect(AGENCY_SIGN_IN_PATH.to_string()),
        _ => RouteDecision::Pass,
    }
}

fn request_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|authority| authority.to_string()))
}

/// Middleware applying [`resolve_route`] to every request.
pub async fn tenant_routing_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request_host(request.headers(), request.uri());
    let original_path = request.uri().path().to_string();

    let decision = resolve_route(
        host.as_deref(),
        &original_path,
        request.uri().query(),
        &state.config.domain,
    );

    let subdomain = host
        .as_deref()
        .and_then(|host| subdomain_label(host, &state.config.domain));

    match decision {
        RouteDecision::Pass => {}
        RouteDecision::Redirect(location) => {
            tracing::debug!(from = %original_path, to = %location, "redirecting request");
            return Redirect::temporary(&location).into_response();
        }
        RouteDecision::Rewrite(target) => match target.parse::<Uri>() {
            Ok(uri) => {
                tracing::debug!(from = %original_path, to = %target, "rewriting request");
                *request.uri_mut() = uri;
            }
            Err(err) => {
                tracing::warn!(target = %target, error = %err, "rewrite produced an invalid URI");
                return StatusCode::BAD_REQUEST.into_response();
            }
        },
    }

    request.extensions_mut().insert(TenantRoute {
        original_path,
        subdomain,
    });

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "example.com";

    #[test]
    fn tenant_subdomain_prefixes_path_and_keeps_query() {
        assert_eq!(
            resolve_route(Some("acme.example.com"), "/dashboard", Some("tab=1&x=2"), BASE),
            RouteDecision::Rewrite("/acme/dashboard?tab=1&x=2".to_string())
        );
    }

    #[test]
    fn tenant_subdomain_without_query() {
        assert_eq!(
            resolve_route(Some("acme.example.com"), "/", None, BASE),
            RouteDecision::Rewrite("/acme/".to_string())
        );
    }

    #[test]
    fn host_matching_ignores_case() {
        assert_eq!(
            resolve_route(Some("Acme.Example.COM"), "/x", None, BASE),
            RouteDecision::Rewrite("/Acme/x".to_string())
        );
        assert_eq!(subdomain_label("EXAMPLE.com", BASE), None);
    }

    #[test]
    fn multi_label_subdomain_is_kept_whole() {
        assert_eq!(
            subdomain_label("eu.acme.example.com", BASE).as_deref(),
            Some("eu.acme")
        );
    }

    #[test]
    fn works_with_port_in_base_domain() {
        assert_eq!(
            resolve_route(Some("acme.localhost:3000"), "/x", None, "localhost:3000"),
            RouteDecision::Rewrite("/acme/x".to_string())
        );
    }

    #[test]
    fn bare_base_domain_has_no_label() {
        assert_eq!(subdomain_label("example.com", BASE), None);
        assert_eq!(
            resolve_route(Some("example.com"), "/agency", None, BASE),
            RouteDecision::Pass
        );
    }

    #[test]
    fn foreign_host_has_no_label() {
        assert_eq!(subdomain_label("acme.other.org", BASE), None);
    }

    #[test]
    fn public_paths_pass_even_on_subdomains() {
        for path in ["/site/anything", "/site", "/api/uploadthing/x", "/agency/sign-in"] {
            assert_eq!(
                resolve_route(Some("acme.example.com"), path, None, BASE),
                RouteDecision::Pass,
                "{path}"
            );
        }
    }

    #[test]
    fn public_matchers_are_anchored() {
        assert!(is_public_path("/agency/sign-up/verify"));
        assert!(!is_public_path("/x/site"));
        assert!(!is_public_path("/agency"));
    }

    #[test]
    fn bare_auth_pages_redirect_to_agency_sign_in() {
        for path in ["/sign-in", "/sign-up"] {
            assert_eq!(
                resolve_route(Some("example.com"), path, None, BASE),
                RouteDecision::Redirect(AGENCY_SIGN_IN_PATH.to_string())
            );
        }
    }

    #[test]
    fn root_is_rewritten_to_site() {
        assert_eq!(
            resolve_route(Some("example.com"), "/", Some("ref=x"), BASE),
            RouteDecision::Rewrite(SITE_PATH.to_string())
        );
    }

    #[test]
    fn missing_host_falls_through_to_path_rules() {
        assert_eq!(
            resolve_route(None, "/", None, BASE),
            RouteDecision::Rewrite(SITE_PATH.to_string())
        );
        assert_eq!(resolve_route(None, "/subaccount/1", None, BASE), RouteDecision::Pass);
        assert_eq!(resolve_route(None, "/unknown", None, BASE), RouteDecision::Pass);
    }
}
