use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini API.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

/// Resolve the API key from an explicit value or the environment.
///
/// An explicit key is used as given.  Otherwise `GEMINI_API_KEY` is read; an
/// unset or empty variable is [`Error::MissingApiKey`].
pub fn resolve_api_key(api_key: Option<String>) -> Result<String> {
    let api_key = match api_key {
        Some(key) => key,
        None => env::var(API_KEY_ENV).unwrap_or_default(),
    };
    if api_key.is_empty() {
        return Err(Error::missing_api_key(API_KEY_ENV));
    }
    Ok(api_key)
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the GEMINI_API_KEY
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = resolve_api_key(api_key)?;
        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that sees every request and its outcome.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let mut api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::authentication("API key contains invalid header characters"))?;
        api_key.set_sensitive(true);
        headers.insert("x-goog-api-key", api_key);
        Ok(headers)
    }

    fn endpoint(&self, model: &Model) -> String {
        let model = model.to_string();
        // Ids such as `tunedModels/x` already name their collection.
        if model.contains('/') {
            format!("{}{}:generateContent", self.base_url, model)
        } else {
            format!("{}models/{}:generateContent", self.base_url, model)
        }
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        match response.text().await {
            Ok(body) => error_from_status(status_code, &body, retry_after),
            Err(e) => Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            ),
        }
    }

    /// Send a `generateContent` request and wait for the full response.
    pub async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_request(model, request);
        }
        let start = Instant::now();
        let result = self.send(model, request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(model, response);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_error(model, err);
                }
            }
        }
        result
    }

    async fn send(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .headers(self.default_headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            })
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(
            format!("{base_url} cannot be used as a base URL"),
            None,
        ));
    }
    let mut base_url = url.to_string();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    Ok(base_url)
}

/// Map a non-success status and its body onto the error taxonomy.
///
/// The body is expected to look like
/// `{"error": {"code": 400, "message": "...", "status": "INVALID_ARGUMENT"}}`;
/// anything else is used verbatim as the message.
pub(crate) fn error_from_status(status_code: u16, body: &str, retry_after: Option<u64>) -> Error {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
        status: Option<String>,
    }

    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error);
    let status = detail.as_ref().and_then(|d| d.status.clone());
    let message = detail
        .and_then(|d| d.message)
        .unwrap_or_else(|| body.to_string());

    match status_code {
        400 => Error::bad_request(message, status),
        401 => Error::authentication(message),
        403 => Error::permission(message),
        404 => Error::not_found(message),
        408 => Error::timeout(message, None),
        429 => Error::rate_limit(message, retry_after),
        500 => Error::internal_server(message),
        502..=504 => Error::service_unavailable(message, retry_after),
        _ => Error::api(status_code, status, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn explicit_empty_key_is_missing() {
        let err = Gemini::new(Some(String::new())).unwrap_err();
        assert!(err.is_missing_api_key());
    }

    #[test]
    fn explicit_key_builds_client() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        assert_eq!(client.base_url(), DEFAULT_API_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
        assert!(!format!("{client:?}").contains("test-key"));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = Gemini::with_options(
            Some("k".to_string()),
            Some("http://127.0.0.1:8080/v1beta".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/v1beta/");
        assert_eq!(
            client.endpoint(&Model::Known(KnownModel::Gemini15Flash)),
            "http://127.0.0.1:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn tuned_model_endpoint_keeps_its_collection() {
        let client = Gemini::new(Some("k".to_string())).unwrap();
        assert_eq!(
            client.endpoint(&Model::Custom("tunedModels/my-model".to_string())),
            "https://generativelanguage.googleapis.com/v1beta/tunedModels/my-model:generateContent"
        );
        assert_eq!(
            client.endpoint(&"models/gemini-2.0-flash".parse::<Model>().unwrap()),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Gemini::with_options(Some("k".to_string()), Some("nope".to_string()), None)
            .unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn status_mapping_uses_google_error_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let err = error_from_status(400, body, None);
        assert!(err.is_bad_request());
        assert_eq!(
            err.to_string(),
            "Bad request: API key not valid. (INVALID_ARGUMENT)"
        );

        let err = error_from_status(429, r#"{"error":{"message":"quota"}}"#, Some(7));
        assert!(err.is_rate_limit());
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded: quota (retry after 7 seconds)"
        );

        assert!(error_from_status(403, "{}", None).is_permission());
        assert!(error_from_status(404, "", None).is_not_found());
        assert!(error_from_status(503, "", None).is_server_error());
    }

    #[test]
    fn status_mapping_falls_back_to_raw_body() {
        let err = error_from_status(418, "short and stout", None);
        assert_eq!(err.status_code(), Some(418));
        assert_eq!(err.to_string(), "API error (418): short and stout");
    }
}
