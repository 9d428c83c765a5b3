//! Request dispatch: signing, compression and the single HTTP round trip.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. `Dispatcher` wraps a
//! transport with the immutable pieces every call needs (credentials and the
//! gzip flag) and races the call against the caller's `CallContext`. There is
//! no retry and no internal deadline: a call either completes, fails, or is
//! interrupted by the context the caller supplied.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::auth::Credentials;
use crate::error::{ClientError, Interruption};
use crate::http::{HttpRequest, HttpResponse};

/// Executes one signed `HttpRequest`.
///
/// Implementations must return non-2xx responses as data, not as errors;
/// status interpretation belongs to the parsers.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client; with `gzip` set, compressed bodies are decoded.
    pub fn new(gzip: bool) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .gzip(gzip)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut builder = self.client.get(&request.path).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Caller-supplied limits for a call: a cancellation token, a timeout, both
/// or neither.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: Option<CancellationToken>,
    timeout: Option<Duration>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Signs requests and sends them through a `Transport`.
pub struct Dispatcher<T> {
    transport: Arc<T>,
    credentials: Credentials,
    gzip: bool,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            credentials: self.credentials.clone(),
            gzip: self.gzip,
        }
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport: Arc::new(transport),
            credentials,
            gzip: false,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask the server for gzip-compressed bodies.
    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    /// Attach authentication and transport headers to a built request.
    pub fn prepare(&self, mut request: HttpRequest) -> HttpRequest {
        self.credentials.sign(&mut request);
        if self.gzip {
            request
                .headers
                .push(("accept-encoding".to_string(), "gzip".to_string()));
        }
        request
    }

    /// Sign `request`, send it once and return the raw response.
    pub async fn send(
        &self,
        request: HttpRequest,
        context: &CallContext,
    ) -> Result<HttpResponse, ClientError> {
        debug!(path = %request.path, params = request.query.len(), "dispatching request");
        let request = self.prepare(request);

        let call = self.transport.execute(request);
        let bounded = async {
            match context.timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => Err(ClientError::CancelledOrTimedOut(
                        Interruption::DeadlineExceeded,
                    )),
                },
                None => call.await,
            }
        };

        let response = match &context.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(ClientError::CancelledOrTimedOut(Interruption::Cancelled)),
                result = bounded => result,
            },
            None => bounded.await,
        }?;

        debug!(status = response.status, "received response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records requests and answers with a fixed response.
    struct Recording {
        seen: Mutex<Vec<HttpRequest>>,
        delay: Option<Duration>,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                delay: Some(delay),
            }
        }
    }

    #[async_trait]
    impl Transport for Recording {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
            self.seen.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: "{}".to_string(),
            })
        }
    }

    fn request() -> HttpRequest {
        HttpRequest::new("http://localhost/v1/public/stories".to_string())
    }

    #[test]
    fn prepare_signs_with_private_key() {
        let dispatcher = Dispatcher::new(
            Recording::new(),
            Credentials::with_private_key("pub", "priv"),
        );
        let req = dispatcher.prepare(request());
        assert_eq!(req.query_param("apikey"), Some("pub"));
        assert!(req.query_param("ts").is_some());
        assert_eq!(req.query_param("hash").map(str::len), Some(32));
        assert!(req.headers.is_empty());
    }

    #[test]
    fn prepare_adds_gzip_header_when_enabled() {
        let dispatcher = Dispatcher::new(Recording::new(), Credentials::public("pub")).with_gzip(true);
        let req = dispatcher.prepare(request());
        assert_eq!(
            req.headers,
            vec![("accept-encoding".to_string(), "gzip".to_string())]
        );
        assert_eq!(req.query_param("hash"), None);
    }

    #[tokio::test]
    async fn send_performs_exactly_one_call() {
        let dispatcher = Dispatcher::new(Recording::new(), Credentials::public("pub"));
        let response = dispatcher.send(request(), &CallContext::new()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(dispatcher.transport.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_token_interrupts_call() {
        let dispatcher = Dispatcher::new(
            Recording::slow(Duration::from_secs(30)),
            Credentials::public("pub"),
        );
        let token = CancellationToken::new();
        token.cancel();
        let context = CallContext::new().with_cancellation(token);

        let err = dispatcher.send(request(), &context).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::CancelledOrTimedOut(Interruption::Cancelled)
        ));
    }

    #[tokio::test]
    async fn timeout_interrupts_slow_call() {
        let dispatcher = Dispatcher::new(
            Recording::slow(Duration::from_secs(30)),
            Credentials::public("pub"),
        );
        let context = CallContext::new().with_timeout(Duration::from_millis(20));

        let err = dispatcher.send(request(), &context).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::CancelledOrTimedOut(Interruption::DeadlineExceeded)
        ));
    }

    #[tokio::test]
    async fn hash_is_recomputed_per_call() {
        let dispatcher = Dispatcher::new(
            Recording::new(),
            Credentials::with_private_key("pub", "priv"),
        );
        dispatcher.send(request(), &CallContext::new()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        dispatcher.send(request(), &CallContext::new()).await.unwrap();

        let seen = dispatcher.transport.seen.lock().unwrap();
        assert_ne!(seen[0].query_param("ts"), seen[1].query_param("ts"));
        assert_ne!(seen[0].query_param("hash"), seen[1].query_param("hash"));
    }
}
