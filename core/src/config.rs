//! Client configuration.
//!
//! Values come from code or from the process environment:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `MARVEL_PUBLIC_KEY` | public API key (required) |
//! | `MARVEL_PRIVATE_KEY` | private key; enables `ts` + `hash` signing |
//! | `MARVEL_BASE_URL` | API root, defaults to the public gateway |
//! | `MARVEL_GZIP` | `true`/`false`, request compressed bodies |
//! | `MARVEL_TIMEOUT_SECS` | default per-call timeout |

use std::fmt;
use std::time::Duration;

use crate::auth::Credentials;
use crate::client::DEFAULT_BASE_URL;
use crate::error::ClientError;

#[derive(Clone)]
pub struct MarvelConfig {
    pub base_url: String,
    pub public_key: String,
    pub private_key: Option<String>,
    pub gzip: bool,
    /// Applied to every call unless a scoped context overrides it. A zero
    /// duration means no timeout.
    pub timeout: Option<Duration>,
}

impl MarvelConfig {
    pub fn new(public_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            public_key: public_key.into(),
            private_key: None,
            gzip: false,
            timeout: None,
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let public_key = lookup("MARVEL_PUBLIC_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClientError::Config("MARVEL_PUBLIC_KEY is not set".to_string()))?;

        let mut config = Self::new(public_key);
        config.private_key = lookup("MARVEL_PRIVATE_KEY").filter(|key| !key.trim().is_empty());
        if let Some(base_url) = lookup("MARVEL_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(gzip) = lookup("MARVEL_GZIP") {
            config.gzip = parse_flag("MARVEL_GZIP", &gzip)?;
        }
        if let Some(secs) = lookup("MARVEL_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Config(format!("MARVEL_TIMEOUT_SECS is not a number: {secs:?}"))
            })?;
            if secs == 0 {
                return Err(ClientError::Config(
                    "MARVEL_TIMEOUT_SECS must be greater than 0".to_string(),
                ));
            }
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn credentials(&self) -> Credentials {
        match &self.private_key {
            Some(private_key) => Credentials::with_private_key(&self.public_key, private_key),
            None => Credentials::public(&self.public_key),
        }
    }
}

impl fmt::Debug for MarvelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarvelConfig")
            .field("base_url", &self.base_url)
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("gzip", &self.gzip)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ClientError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ClientError::Config(format!("{name} is not a boolean: {value:?}"))),
    }
}
