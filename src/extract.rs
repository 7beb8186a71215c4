//! Resolution of the hostnames a request addresses.
//!
//! Each supported URL shape is one [`Route`] in an ordered table. The first
//! route whose path pattern matches decides how hostnames are extracted;
//! requests that match no route address no hostnames at all.

use crate::config::{DEFAULT_NODE_API_ROOT, DEFAULT_ORCHESTRATOR_API_ROOT};
use crate::request::RequestUri;

/// Query parameters that carry hostnames.
pub const HOSTNAME_QUERY_KEYS: [&str; 2] = ["hostname", "parentHost"];

/// How a route's prefix is compared to the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathPattern {
    /// Path is strictly longer than the prefix and starts with it
    ChildOf,
    /// Path equals the prefix
    Exact,
}

/// Where a route finds its hostnames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extraction {
    /// The last path segment, e.g. `/nodes/v2/node/{host}`
    LastSegment,
    /// The first segment below the prefix, e.g. `/orchestrator/v1/hosts/{host}/suspended`
    FirstSegment,
    /// The last path segment followed by the hostname query parameters
    LastSegmentAndQuery,
    /// Only the hostname query parameters
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Route {
    prefix: String,
    pattern: PathPattern,
    extraction: Extraction,
}

impl Route {
    fn child_of(prefix: String, extraction: Extraction) -> Self {
        Self {
            prefix,
            pattern: PathPattern::ChildOf,
            extraction,
        }
    }

    fn exact(prefix: String, extraction: Extraction) -> Self {
        Self {
            prefix,
            pattern: PathPattern::Exact,
            extraction,
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self.pattern {
            PathPattern::ChildOf => is_child_of(&self.prefix, path),
            PathPattern::Exact => path == self.prefix,
        }
    }

    fn extract(&self, uri: &RequestUri) -> Vec<String> {
        let path = uri.path();
        match self.extraction {
            Extraction::LastSegment => vec![last_child_of(path).to_string()],
            Extraction::FirstSegment => first_child_of(&self.prefix, path)
                .map(|hostname| vec![hostname.to_string()])
                .unwrap_or_default(),
            Extraction::LastSegmentAndQuery => std::iter::once(last_child_of(path).to_string())
                .chain(hostnames_from_query(uri))
                .collect(),
            Extraction::Query => hostnames_from_query(uri).collect(),
        }
    }
}

/// Maps request URIs to the hostnames they address.
///
/// # Examples
///
/// ```
/// use node_authz::{RequestUri, ResourceExtractor};
///
/// let extractor = ResourceExtractor::default();
///
/// let uri = RequestUri::parse("/nodes/v2/node/host1.example.com");
/// assert_eq!(extractor.hostnames(&uri), ["host1.example.com"]);
///
/// let uri = RequestUri::parse("/orchestrator/v1/suspensions/hosts/h1?hostname=h2&parentHost=h3");
/// assert_eq!(extractor.hostnames(&uri), ["h1", "h2", "h3"]);
///
/// assert!(extractor.hostnames(&RequestUri::parse("/nodes/v2/node/")).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceExtractor {
    routes: Vec<Route>,
}

impl ResourceExtractor {
    /// Builds the route table for APIs served under the given roots.
    ///
    /// Roots are expected without a trailing separator, e.g. `/nodes/v2`.
    pub fn new(node_api_root: &str, orchestrator_api_root: &str) -> Self {
        let node = |resource: &str| format!("{node_api_root}/{resource}/");
        let orchestrator = |resource: &str| format!("{orchestrator_api_root}/{resource}/");

        let routes = vec![
            Route::child_of(node("acl"), Extraction::LastSegment),
            Route::child_of(node("node"), Extraction::LastSegment),
            Route::child_of(node("state"), Extraction::LastSegment),
            Route::child_of(orchestrator("hosts"), Extraction::FirstSegment),
            Route::child_of(
                orchestrator("suspensions/hosts"),
                Extraction::LastSegmentAndQuery,
            ),
            Route::child_of(node("command"), Extraction::Query),
            Route::exact(node("node"), Extraction::Query),
        ];

        Self { routes }
    }

    /// Returns the hostnames addressed by `uri`, in a deterministic order.
    ///
    /// Empty when the path matches no known route.
    pub fn hostnames(&self, uri: &RequestUri) -> Vec<String> {
        self.routes
            .iter()
            .find(|route| route.matches(uri.path()))
            .map(|route| route.extract(uri))
            .unwrap_or_default()
    }
}

impl Default for ResourceExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_API_ROOT, DEFAULT_ORCHESTRATOR_API_ROOT)
    }
}

/// Non-empty values of the hostname query parameters, in request order.
fn hostnames_from_query(uri: &RequestUri) -> impl Iterator<Item = String> + '_ {
    uri.query_pairs()
        .iter()
        .filter(|(key, _)| HOSTNAME_QUERY_KEYS.contains(&key.as_str()))
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .cloned()
}

/// Returns whether `child` is a sub-path of `parent`.
fn is_child_of(parent: &str, child: &str) -> bool {
    child.starts_with(parent) && child.len() > parent.len()
}

/// Returns the first component of `path` relative to `root`.
fn first_child_of<'a>(root: &str, path: &'a str) -> Option<&'a str> {
    if !is_child_of(root, path) {
        return None;
    }
    let relative = &path[root.len()..];
    Some(relative.split('/').next().unwrap_or(relative))
}

/// Returns the last component of `path`, ignoring one trailing separator.
fn last_child_of(path: &str) -> &str {
    let path = path.strip_suffix('/').unwrap_or(path);
    path.rsplit('/').next().unwrap_or(path)
}
