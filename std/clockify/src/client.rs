//! Authenticated HTTP transport for the Clockify REST API.

use crate::config::Config;
use crate::error::{Error, Result};
use hyper::ext::ReasonPhrase;
use reqwest::{
    Method,
    header::{self, HeaderMap, HeaderValue},
};
use serde_json::Value;
use tracing::debug;

/// Header carrying the Clockify API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Issues single authenticated requests against the configured base URL.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Build a transport from startup configuration.
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::Config("API key is not a valid header value".into()))?;
        key.set_sensitive(true);
        headers.insert(header::HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Send one request to `base_url + endpoint`.
    ///
    /// Non-success statuses become [`Error::Upstream`] carrying the response
    /// body when it can be read. A success response yields decoded JSON only
    /// when its content type says JSON and the body is non-empty; anything
    /// else yields `None`.
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(method = %method, endpoint, "clockify request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        debug!(status = status.as_u16(), endpoint, "clockify response");
        if !status.is_success() {
            let status_text = status_text(&response);
            let body = response.text().await.ok();
            return Err(Error::Upstream {
                status: status.as_u16(),
                status_text,
                body,
            });
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return Ok(None);
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Shorthand for a GET request.
    pub async fn get(&self, endpoint: &str) -> Result<Option<Value>> {
        self.request(endpoint, Method::GET, None).await
    }
}

/// The reason phrase the server sent, or the standard one for the status.
fn status_text(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use crate::client::Client;
    use crate::config::Config;
    use crate::error::Error;
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Client {
        let config = Config::new(Some("test-key".into()), Some(server.uri())).unwrap();
        Client::new(config).unwrap()
    }

    #[tokio::test]
    async fn sends_api_key_and_decodes_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workspaces"))
            .and(header("x-api-key", "test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "w1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server).get("/workspaces").await.unwrap();
        assert_eq!(value, Some(json!([{"id": "w1"}])));
    }

    #[tokio::test]
    async fn posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/w1/time-entries"))
            .and(body_json(json!({"description": "work"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "e1"})))
            .expect(1)
            .mount(&server)
            .await;

        let body = json!({"description": "work"});
        let value = client_for(&server)
            .request("/workspaces/w1/time-entries", Method::POST, Some(&body))
            .await
            .unwrap();
        assert_eq!(value, Some(json!({"id": "e1"})));
    }

    #[tokio::test]
    async fn empty_json_body_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("content-type", "application/json"),
            )
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).get("/user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn non_json_body_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain"))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).get("/user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let err = client_for(&server).get("/user").await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 401, .. }));
        assert_eq!(
            err.to_string(),
            "Clockify API error: 401 Unauthorized - invalid key"
        );
    }

    #[tokio::test]
    async fn error_status_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workspaces/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).get("/workspaces/missing").await.unwrap_err();
        assert_eq!(err.to_string(), "Clockify API error: 404 Not Found");
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{not json", "application/json"),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).get("/user").await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
