//! API key authentication.
//!
//! Every request carries `apikey`. Server-side callers also hold the private
//! key and must send `ts` plus `hash = md5(ts + private_key + public_key)`.
//! The hash depends on the timestamp, so it is computed per request.

use std::fmt;

use chrono::Utc;

use crate::http::HttpRequest;

/// A public key and, for server-side use, the matching private key.
#[derive(Clone)]
pub struct Credentials {
    public_key: String,
    private_key: Option<String>,
}

impl Credentials {
    /// Browser-style credentials: `apikey` only.
    pub fn public(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: None,
        }
    }

    /// Server-side credentials: `apikey`, `ts` and `hash`.
    pub fn with_private_key(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: Some(private_key.into()),
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Authentication parameters for a request sent at `ts`.
    pub fn auth_params(&self, ts: &str) -> Vec<(String, String)> {
        let mut params = vec![("apikey".to_string(), self.public_key.clone())];
        if let Some(private_key) = &self.private_key {
            params.push(("ts".to_string(), ts.to_string()));
            params.push(("hash".to_string(), request_hash(ts, private_key, &self.public_key)));
        }
        params
    }

    /// Append authentication parameters stamped with `ts`.
    pub fn sign_at(&self, request: &mut HttpRequest, ts: &str) {
        request.query.extend(self.auth_params(ts));
    }

    /// Append authentication parameters stamped with the current time.
    pub fn sign(&self, request: &mut HttpRequest) {
        let ts = Utc::now().timestamp_millis().to_string();
        self.sign_at(request, &ts);
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Lower-case hex MD5 of `ts + private_key + public_key`.
pub fn request_hash(ts: &str, private_key: &str, public_key: &str) -> String {
    format!("{:x}", md5::compute(format!("{ts}{private_key}{public_key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_credentials_send_only_the_key() {
        let creds = Credentials::public("pub");
        assert_eq!(
            creds.auth_params("1"),
            vec![("apikey".to_string(), "pub".to_string())]
        );
    }

    #[test]
    fn private_credentials_add_ts_and_hash() {
        let creds = Credentials::with_private_key("1234", "abcd");
        let params = creds.auth_params("1");
        assert_eq!(params[0], ("apikey".to_string(), "1234".to_string()));
        assert_eq!(params[1], ("ts".to_string(), "1".to_string()));
        // md5("1abcd1234")
        assert_eq!(
            params[2],
            ("hash".to_string(), "ffd275c5130566a2916217b101f26150".to_string())
        );
    }

    #[test]
    fn hash_changes_with_timestamp() {
        assert_ne!(request_hash("1", "a", "b"), request_hash("2", "a", "b"));
        assert_eq!(request_hash("1", "a", "b").len(), 32);
    }

    #[test]
    fn sign_appends_after_existing_params() {
        let mut req = HttpRequest::new("http://localhost/stories".to_string());
        req.query.push(("limit".to_string(), "5".to_string()));
        Credentials::public("pub").sign_at(&mut req, "9");
        assert_eq!(req.query[0].0, "limit");
        assert_eq!(req.query_param("apikey"), Some("pub"));
        assert_eq!(req.query_param("ts"), None);
    }

    #[test]
    fn debug_redacts_private_key() {
        let rendered = format!("{:?}", Credentials::with_private_key("pub", "secret"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
