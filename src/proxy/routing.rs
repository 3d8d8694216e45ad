//! Route table and registration of forwarding rules with the router.
//!
//! [`RouteTable`] is the ordered, immutable list of [`Rule`]s loaded at
//! startup. [`register_routes`] binds every rule's `from` pattern, for
//! each of the seven forwarded methods, to a handler that owns its own
//! copy of the rule. Matching and precedence between overlapping
//! patterns are entirely the router's: static segments beat parameters,
//! parameters beat catch-alls.
//!
//! Patterns are written in the conventional `:param` / `*` form and
//! translated by [`to_router_path`] into the router's `{param}` /
//! `{*rest}` syntax. A catch-all never matches an empty tail, so a
//! pattern ending in a bare `*` also claims its prefix (`/api/*` takes
//! `/api/`, `/*` takes `/`) unless another rule names that path exactly.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;

use crate::config::model::Rule;
use crate::error::WaypointError;
use crate::server::AppState;

/// Every rule accepts exactly these methods. Anything else gets a 405.
pub const FORWARDED_METHODS: [MethodFilter; 7] = [
    MethodFilter::GET,
    MethodFilter::POST,
    MethodFilter::PUT,
    MethodFilter::DELETE,
    MethodFilter::PATCH,
    MethodFilter::OPTIONS,
    MethodFilter::HEAD,
];

/// Name given to a bare `*` wildcard segment.
const CATCH_ALL_NAME: &str = "rest";

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<Rule>,
}

impl RouteTable {
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<Rule>> for RouteTable {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

/// Translate a configured `from` pattern into the router's path syntax.
///
/// `:name` becomes `{name}`, `*name` becomes `{*name}` and a bare `*`
/// becomes `{*rest}`. Segments already in `{...}` form are kept.
#[must_use]
pub fn to_router_path(from: &str) -> String {
    from.split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix('*') {
                let name = if name.is_empty() { CATCH_ALL_NAME } else { name };
                format!("{{*{name}}}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Router path for the empty tail of a pattern ending in a bare `*`.
///
/// `/api/*` gives `/api/`, `/*` gives `/`. Named wildcards and patterns
/// without a trailing `*` give `None`.
#[must_use]
pub fn empty_tail_path(from: &str) -> Option<String> {
    from.strip_suffix('*')
        .filter(|prefix| prefix.ends_with('/'))
        .map(to_router_path)
}

/// Register every rule in `table`, in order, and return the dispatch router.
///
/// Each pattern is first inserted into a standalone `matchit` router so
/// that duplicates, conflicts and malformed patterns come back as
/// [`WaypointError::RouteRegistration`] instead of a panic inside axum.
pub fn register_routes(table: &RouteTable) -> Result<Router<Arc<AppState>>, WaypointError> {
    let explicit: HashSet<String> = table
        .rules()
        .iter()
        .map(|rule| to_router_path(&rule.from))
        .collect();

    let mut conflicts = matchit::Router::new();
    let mut router = Router::new();

    for rule in table.rules() {
        let path = to_router_path(&rule.from);
        let rejected = |reason: String| WaypointError::RouteRegistration {
            from: rule.from.clone(),
            reason,
        };

        if !path.starts_with('/') {
            return Err(rejected("pattern must start with '/'".into()));
        }
        conflicts
            .insert(path.as_str(), ())
            .map_err(|e| rejected(e.to_string()))?;

        let shared = Arc::new(rule.clone());
        router = router.route(&path, forwarding_methods(Arc::clone(&shared)));
        tracing::info!(from = %rule.from, to = %rule.to, pattern = %path, "route registered");

        if let Some(tail) = empty_tail_path(&rule.from).filter(|tail| !explicit.contains(tail)) {
            conflicts
                .insert(tail.as_str(), ())
                .map_err(|e| rejected(e.to_string()))?;
            router = router.route(&tail, forwarding_methods(shared));
            tracing::debug!(from = %rule.from, pattern = %tail, "empty tail registered");
        }
    }

    Ok(router)
}

/// Bind all [`FORWARDED_METHODS`] to one handler owning `rule`.
fn forwarding_methods(rule: Arc<Rule>) -> MethodRouter<Arc<AppState>> {
    let handler = move |State(state): State<Arc<AppState>>,
                        ConnectInfo(client): ConnectInfo<SocketAddr>,
                        request: Request| {
        let rule = Arc::clone(&rule);
        async move { super::forward_handler(state, client, rule, request).await }
    };

    FORWARDED_METHODS
        .into_iter()
        .fold(MethodRouter::new(), |methods, filter| {
            methods.on(filter, handler.clone())
        })
}
