use std::sync::Arc;
use std::time::Duration;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use crate::api::config::ClientConfig;
use crate::api::error::ApiError;

/// HTTP method used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// One outbound request, independent of the HTTP library
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

/// Raw response: status code and body text
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the backend. `HttpTransport` is the real one; tests
/// substitute a recording fake.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Blocking reqwest transport
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport {
                path: base_url.to_string(),
                message: format!("client build failed: {e}"),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        };
        builder = builder
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| ApiError::Transport {
            path: request.path.clone(),
            message: e.to_string(),
        })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| ApiError::Transport {
            path: request.path.clone(),
            message: e.to_string(),
        })?;
        Ok(ApiResponse { status, body })
    }
}

/// API client bound to one session token.
///
/// The token is handed in at construction; the client never reads or
/// writes the session file itself.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, token: Option<String>) -> Self {
        Self { transport, token }
    }

    /// Client without credentials, for login and password reset
    pub fn anonymous(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, None)
    }

    /// Build an HTTP client from resolved configuration
    pub fn connect(config: &ClientConfig, token: Option<String>) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config.base_url, config.timeout_secs)?;
        Ok(Self::new(Arc::new(transport), token))
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(Method::Get, path, None)
    }

    pub fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.execute(Method::Post, path, body)
    }

    pub fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(Method::Put, path, Some(body))
    }

    fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer: self.token.clone(),
        };
        log::debug!("[API] {} {} - sending", method.as_str(), path);

        let response = self.transport.send(&request).map_err(|e| {
            log::error!("[API] {} {} - {}", method.as_str(), path, e);
            e
        })?;

        if !response.is_success() {
            log::error!("[API] {} {} - Failed: {}", method.as_str(), path, response.status);
            return Err(ApiError::Http {
                method: method.as_str(),
                path: path.to_string(),
                status: response.status,
            });
        }

        let value = if response.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            })?
        };
        log::info!("[API] {} {} - Success", method.as_str(), path);
        Ok(value)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport that replays canned responses and records every request
    #[derive(Default)]
    pub struct FakeTransport {
        pub requests: Mutex<Vec<ApiRequest>>,
        responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    }

    impl FakeTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn respond(&self, status: u16, body: Value) {
            self.responses.lock().unwrap().push_back(Ok(ApiResponse { status, body: body.to_string() }));
        }

        pub fn respond_raw(&self, status: u16, body: &str) {
            self.responses.lock().unwrap().push_back(Ok(ApiResponse { status, body: body.to_string() }));
        }

        pub fn fail(&self, message: &str) {
            self.responses.lock().unwrap().push_back(Err(ApiError::Transport {
                path: String::new(),
                message: message.to_string(),
            }));
        }

        pub fn sent(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse { status: 404, body: String::new() }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bearer_attached_when_token_present() {
        let fake = FakeTransport::new();
        fake.respond(200, json!({"data": []}));
        let client = ApiClient::new(fake.clone(), Some("tok-1".to_string()));
        client.get("/emergency").unwrap();
        let sent = fake.sent();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].path, "/emergency");
        assert_eq!(sent[0].bearer.as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_anonymous_has_no_bearer() {
        let fake = FakeTransport::new();
        fake.respond(200, json!({}));
        let client = ApiClient::anonymous(fake.clone());
        assert!(!client.has_token());
        client.post("/auth/login", Some(json!({"username": "u"}))).unwrap();
        assert!(fake.sent()[0].bearer.is_none());
    }

    #[test]
    fn test_non_success_is_http_error() {
        let fake = FakeTransport::new();
        fake.respond(422, json!({"message": "bad"}));
        let client = ApiClient::anonymous(fake.clone());
        let err = client.put("/cmdb/assets/1", json!({})).unwrap_err();
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_empty_body_is_null_and_bad_json_is_decode_error() {
        let fake = FakeTransport::new();
        fake.respond_raw(204, "");
        fake.respond_raw(200, "<html>");
        let client = ApiClient::anonymous(fake.clone());
        assert_eq!(client.post("/patch-jobs/1/assign", None).unwrap(), Value::Null);
        assert!(matches!(client.get("/dashboard/summary"), Err(ApiError::Decode { .. })));
    }

    #[test]
    fn test_transport_failure_propagates() {
        let fake = FakeTransport::new();
        fake.fail("connection refused");
        let client = ApiClient::anonymous(fake.clone());
        assert!(matches!(client.get("/emergency"), Err(ApiError::Transport { .. })));
    }
}
