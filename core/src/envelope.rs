//! The API's two-level response envelope.
//!
//! # Design
//! Unwrapping happens in three steps, each with its own error: the HTTP
//! status must be 2xx (`HttpError`), the envelope's own code and status must
//! report success (`ApiError`), and a `data` container holding `results` must
//! be present (`MalformedResponse`). The envelope is first read with `data`
//! left as raw JSON so that an error envelope is reported as such even when
//! its payload would not fit the expected entity type.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;
use crate::http::HttpResponse;

/// The envelope `code`, numeric on success and often textual on failure
/// (e.g. `"InvalidCredentials"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiCode {
    Number(i64),
    Text(String),
}

impl ApiCode {
    fn is_success(&self) -> bool {
        match self {
            ApiCode::Number(code) => *code == 200,
            ApiCode::Text(code) => code == "200",
        }
    }
}

impl std::fmt::Display for ApiCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiCode::Number(code) => write!(f, "{code}"),
            ApiCode::Text(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    code: Option<ApiCode>,
    status: Option<String>,
    message: Option<String>,
    attribution_text: Option<String>,
    etag: Option<String>,
    data: Option<serde_json::Value>,
}

impl RawEnvelope {
    fn check(&self) -> Result<(), ClientError> {
        let code_ok = self.code.as_ref().map_or(true, ApiCode::is_success);
        let status_ok = self
            .status
            .as_deref()
            .map_or(true, |status| status.eq_ignore_ascii_case("ok"));
        if code_ok && status_ok {
            return Ok(());
        }
        Err(ClientError::ApiError {
            code: self
                .code
                .as_ref()
                .map_or_else(|| "unknown".to_string(), ApiCode::to_string),
            message: self
                .message
                .clone()
                .or_else(|| self.status.clone())
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DataContainer<T> {
    #[serde(default)]
    offset: i64,
    #[serde(default)]
    limit: i64,
    #[serde(default)]
    total: i64,
    #[serde(default)]
    count: i64,
    results: Vec<T>,
}

/// One page of results together with the paging counters the server reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
    pub count: i64,
    pub results: Vec<T>,
    pub etag: Option<String>,
    pub attribution_text: Option<String>,
}

/// Validate `response` and extract its page of results.
pub fn unwrap_page<T: DeserializeOwned>(response: &HttpResponse) -> Result<Page<T>, ClientError> {
    if !(200..300).contains(&response.status) {
        return Err(ClientError::HttpError {
            status: response.status,
            body: response.body.clone(),
        });
    }

    let envelope: RawEnvelope = serde_json::from_str(&response.body)
        .map_err(|e| ClientError::MalformedResponse(format!("invalid envelope: {e}")))?;
    envelope.check()?;

    let data = envelope
        .data
        .ok_or_else(|| ClientError::MalformedResponse("envelope has no data container".to_string()))?;
    let data: DataContainer<T> = serde_json::from_value(data)
        .map_err(|e| ClientError::MalformedResponse(format!("invalid data container: {e}")))?;

    Ok(Page {
        offset: data.offset,
        limit: data.limit,
        total: data.total,
        count: data.count,
        results: data.results,
        etag: envelope.etag,
        attribution_text: envelope.attribution_text,
    })
}

/// Validate `response` and return its results in server order.
pub fn unwrap_results<T: DeserializeOwned>(response: &HttpResponse) -> Result<Vec<T>, ClientError> {
    unwrap_page(response).map(|page| page.results)
}
