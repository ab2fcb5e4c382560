//! HTTP transport for carrier requests.
//!
//! Both carriers take an XML document in a POST body and answer with XML, so the
//! transport is carrier-agnostic apart from the endpoint it is handed.

use crate::config::Endpoint;
use crate::error::{QuoteError, QuoteResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const XML_CONTENT_TYPE: &str = "text/xml";

// Sends one XML document and returns the raw response body
#[async_trait]
pub trait XmlTransport: Send + Sync {
    async fn post_xml(&self, endpoint: &Endpoint, body: String) -> QuoteResult<String>;
}

/// reqwest-backed transport. Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> QuoteResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| QuoteError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

#[async_trait]
impl XmlTransport for HttpTransport {
    async fn post_xml(&self, endpoint: &Endpoint, body: String) -> QuoteResult<String> {
        debug!(endpoint = %endpoint, bytes = body.len(), "posting carrier request");

        let response = self
            .client
            .post(endpoint.url.as_str())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(endpoint = %endpoint, status = %status, bytes = text.len(), "carrier responded");

        if status.is_success() {
            Ok(text)
        } else {
            Err(QuoteError::Transport(format!(
                "HTTP error ({}): {}",
                status, text
            )))
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Answers every request with a canned body and remembers what was sent.
    pub struct MockTransport {
        response: QuoteResult<String>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl MockTransport {
        pub fn replying(body: &str) -> Self {
            Self {
                response: Ok(body.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(err: QuoteError) -> Self {
            Self {
                response: Err(err),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<(String, String)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl XmlTransport for MockTransport {
        async fn post_xml(&self, endpoint: &Endpoint, body: String) -> QuoteResult<String> {
            self.requests
                .lock()
                .unwrap()
                .push((endpoint.url.clone(), body));
            self.response.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_transport() {
        let transport = HttpTransport::new(5000);
        assert!(transport.is_ok());
        assert_eq!(transport.unwrap().timeout_ms(), 5000);
    }

    #[tokio::test]
    async fn test_post_xml_sends_text_xml() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quote"))
            .and(header("content-type", "text/xml"))
            .and(body_string("<Ping/>"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<Pong/>"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(5000).unwrap();
        let endpoint = Endpoint::new(format!("{}/quote", server.uri()));
        let body = transport
            .post_xml(&endpoint, "<Ping/>".to_string())
            .await
            .unwrap();

        assert_eq!(body, "<Pong/>");
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(5000).unwrap();
        let endpoint = Endpoint::new(server.uri());
        let result = transport.post_xml(&endpoint, "<Ping/>".to_string()).await;

        match result {
            Err(QuoteError::Transport(message)) => {
                assert!(message.contains("503"));
                assert!(message.contains("down"));
            }
            other => panic!("Expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = HttpTransport::new(1000).unwrap();
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let endpoint = Endpoint::new("http://127.0.0.1:9/quote");
        let result = transport.post_xml(&endpoint, "<Ping/>".to_string()).await;
        assert!(matches!(result, Err(QuoteError::Transport(_))));
    }
}
