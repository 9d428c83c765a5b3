//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `MarvelClient` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network; the
//! `Dispatcher` (or any caller with its own HTTP stack) performs the I/O.
//!
//! Every API call is a GET, so the request carries no method or body. Query
//! parameters are kept as an ordered list of pairs and only percent-encoded
//! when rendered with [`HttpRequest::url`].

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL without the query string.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(path: String) -> Self {
        Self {
            path,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Value of the first query parameter called `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Full URL with the percent-encoded query string appended.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path)
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport (or the host) after executing an
/// `HttpRequest`, then passed to `MarvelClient::parse_*`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_query_is_the_path() {
        let req = HttpRequest::new("http://localhost/v1/public/comics".to_string());
        assert_eq!(req.url(), "http://localhost/v1/public/comics");
    }

    #[test]
    fn url_encodes_spaces_and_commas() {
        let mut req = HttpRequest::new("http://localhost/series".to_string());
        req.query.push(("contains".to_string(), "trade paperback,comic".to_string()));
        req.query.push(("limit".to_string(), "5".to_string()));
        assert_eq!(
            req.url(),
            "http://localhost/series?contains=trade%20paperback%2Ccomic&limit=5"
        );
    }

    #[test]
    fn query_param_returns_first_match() {
        let mut req = HttpRequest::new("http://localhost/stories".to_string());
        req.query.push(("orderBy".to_string(), "id".to_string()));
        assert_eq!(req.query_param("orderBy"), Some("id"));
        assert_eq!(req.query_param("limit"), None);
    }
}
