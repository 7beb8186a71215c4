use std::fmt;

use percent_encoding::percent_decode_str;
use url::{form_urlencoded, Url};

/// An authenticated caller.
///
/// Authentication happens upstream; by the time a `Principal` reaches the
/// authorizer its name is trusted to identify the caller, either a node
/// (its hostname) or a service identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    name: String,
}

impl Principal {
    /// Creates a principal with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the principal's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The path and query parameters of a request.
///
/// The path is held percent-decoded, so `%2E%2E` and `..` are the same
/// resource. Query parameters keep their original order and may repeat.
///
/// # Examples
///
/// ```
/// use node_authz::RequestUri;
///
/// let uri = RequestUri::parse("/orchestrator/v1/suspensions/hosts/h1?hostname=h2&hostname=h3");
/// assert_eq!(uri.path(), "/orchestrator/v1/suspensions/hosts/h1");
/// assert_eq!(uri.query_values("hostname").collect::<Vec<_>>(), ["h2", "h3"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUri {
    path: String,
    query: Vec<(String, String)>,
}

impl RequestUri {
    /// Creates a request URI with the given (already decoded) path and no query.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Appends a query parameter.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Parses a request target such as `/nodes/v2/node/?hostname=a&parentHost=b`.
    ///
    /// Anything after `#` is ignored. Parsing never fails: malformed escapes are
    /// kept literally and invalid UTF-8 is replaced.
    pub fn parse(target: &str) -> Self {
        let target = target.split_once('#').map_or(target, |(head, _)| head);
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        Self {
            path: decode_path(path),
            query: query.map(parse_query).unwrap_or_default(),
        }
    }

    /// Returns the decoded path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns all query parameters in request order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns every value of the query parameter named `key`, in request order.
    pub fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl From<&Url> for RequestUri {
    fn from(url: &Url) -> Self {
        Self {
            path: decode_path(url.path()),
            query: url.query_pairs().into_owned().collect(),
        }
    }
}

impl fmt::Display for RequestUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_exposes_name() {
        let principal = Principal::new("host1.example.com");
        assert_eq!(principal.name(), "host1.example.com");
        assert_eq!(principal.to_string(), "host1.example.com");
    }

    #[test]
    fn parse_path_without_query() {
        let uri = RequestUri::parse("/nodes/v2/node/host1.example.com");
        assert_eq!(uri.path(), "/nodes/v2/node/host1.example.com");
        assert!(uri.query_pairs().is_empty());
    }

    #[test]
    fn parse_keeps_repeated_query_keys_in_order() {
        let uri = RequestUri::parse("/nodes/v2/node/?hostname=a&parentHost=b&hostname=c");
        assert_eq!(uri.path(), "/nodes/v2/node/");
        assert_eq!(uri.query_values("hostname").collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(uri.query_values("parentHost").collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn parse_decodes_path_and_query() {
        let uri = RequestUri::parse("/nodes/v2/node/%2E%2E?hostname=h%2E1");
        assert_eq!(uri.path(), "/nodes/v2/node/..");
        assert_eq!(uri.query_values("hostname").collect::<Vec<_>>(), ["h.1"]);
    }

    #[test]
    fn parse_ignores_fragment() {
        let uri = RequestUri::parse("/nodes/v2/state/h1#top");
        assert_eq!(uri.path(), "/nodes/v2/state/h1");
    }

    #[test]
    fn parse_empty_query_value() {
        let uri = RequestUri::parse("/nodes/v2/command/reboot?hostname=");
        assert_eq!(uri.query_values("hostname").collect::<Vec<_>>(), [""]);
    }

    #[test]
    fn from_url() {
        let url = Url::parse("https://config.example.com:4443/nodes/v2/acl/h1?parentHost=p1")
            .unwrap();
        let uri = RequestUri::from(&url);
        assert_eq!(uri.path(), "/nodes/v2/acl/h1");
        assert_eq!(uri.query_values("parentHost").collect::<Vec<_>>(), ["p1"]);
    }

    #[test]
    fn builder_matches_parsed() {
        let built = RequestUri::new("/nodes/v2/node/").with_query_param("hostname", "h1");
        assert_eq!(built, RequestUri::parse("/nodes/v2/node/?hostname=h1"));
        assert_eq!(built.to_string(), "/nodes/v2/node/?hostname=h1");
    }
}
