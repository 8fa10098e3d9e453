//! Live HTTP transport for the cache agent.
//!
//! [`HttpNetwork`] issues the request exactly as the agent hands it over and
//! returns whatever the server answered. Non-2xx statuses are ordinary
//! responses; only transport failures become [`Error::Network`]. No timeout
//! is applied unless one is configured.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method};

use lantern_core::{AppConfig, Error, Network, Request, Response};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// User agent string (default: "lantern/0.1")
    pub user_agent: String,

    /// Optional request timeout (default: none)
    pub timeout: Option<Duration>,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { user_agent: "lantern/0.1".to_string(), timeout: None, max_redirects: 5 }
    }
}

impl From<&AppConfig> for NetworkConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), max_redirects: config.max_redirects }
    }
}

/// reqwest-backed [`Network`].
pub struct HttpNetwork {
    http: Client,
}

impl HttpNetwork {
    /// Create a new transport with the given configuration.
    pub fn new(config: NetworkConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let start = Instant::now();
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| Error::InvalidInput(format!("invalid method {}: {e}", request.method)))?;

        let mut builder = self.http.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("{} {}: {}", request.method, request.url, describe(&e))))?;

        let status = response.status();
        let final_url = response.url().to_string();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect();

        let body: Bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response: {}", describe(&e))))?;

        tracing::debug!(
            "fetched {} {} -> {} in {}ms ({} bytes)",
            request.method,
            request.url,
            status.as_u16(),
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(Response {
            url: final_url,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response on a local port, returning the base URL.
    async fn serve_once(raw: &'static str) -> String {
        serve_capturing(raw).await.0
    }

    /// Like `serve_once`, but also hands back the request head it received.
    async fn serve_capturing(raw: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(raw.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&buf).to_lowercase()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_network_config_default() {
        let config = NetworkConfig::default();
        assert_eq!(config.user_agent, "lantern/0.1");
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_network_config_from_app_config() {
        let app = AppConfig { user_agent: "site/2".into(), timeout_ms: Some(2_000), ..Default::default() };
        let config = NetworkConfig::from(&app);
        assert_eq!(config.user_agent, "site/2");
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_http_network_new() {
        assert!(HttpNetwork::new(NetworkConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_ok_response() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 11\r\nConnection: close\r\n\r\n<h1>hi</h1>",
        )
        .await;
        let network = HttpNetwork::new(NetworkConfig::default()).unwrap();
        let request = Request::new("GET", &format!("{base}/index.html")).unwrap();

        let response = network.fetch(&request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.body, b"<h1>hi</h1>");
        assert!(response.url.ends_with("/index.html"));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_a_response() {
        let base =
            serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 5\r\nConnection: close\r\n\r\nnope!").await;
        let network = HttpNetwork::new(NetworkConfig::default()).unwrap();
        let request = Request::new("GET", &format!("{base}/missing.css")).unwrap();

        let response = network.fetch(&request).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_ok());
        assert_eq!(response.body_text(), "nope!");
    }

    #[tokio::test]
    async fn test_fetch_sends_request_headers() {
        let (base, head) =
            serve_capturing("HTTP/1.1 204 No Content\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let config = NetworkConfig { user_agent: "site/2".into(), ..Default::default() };
        let network = HttpNetwork::new(config).unwrap();
        let request = Request::new("GET", &format!("{base}/app.js"))
            .unwrap()
            .with_header("X-Requested-With", "lantern");

        let response = network.fetch(&request).await.unwrap();
        assert_eq!(response.status, 204);

        let head = head.await.unwrap();
        assert!(head.starts_with("get /app.js http/1.1"));
        assert!(head.contains("x-requested-with: lantern"));
        assert!(head.contains("user-agent: site/2"));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let network = HttpNetwork::new(NetworkConfig::default()).unwrap();
        let request = Request::new("GET", &format!("http://{addr}/index.html")).unwrap();

        let result = network.fetch(&request).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
