//! Shared fixtures for tool tests.

use async_trait::async_trait;
use rmcp::model::CallToolResult;

use lantern_core::{CacheDb, Error, Network, Request, Response};
use lantern_worker::{AgentSettings, CacheAgent};

/// Answers every path with `page <path>`, except `.../offline.js`
/// (transport failure) and `.../nope.js` (404).
pub struct StaticSite;

#[async_trait]
impl Network for StaticSite {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let path = request.url.path().to_string();
        if path.ends_with("offline.js") {
            return Err(Error::Network(format!("connection refused: {}", request.url)));
        }
        let (status, status_text) = if path.ends_with("nope.js") { (404, "Not Found") } else { (200, "OK") };
        Ok(Response {
            url: request.url.to_string(),
            status,
            status_text: status_text.into(),
            headers: vec![("content-type".into(), "text/plain".into())],
            body: format!("page {path}").into_bytes(),
        })
    }
}

pub async fn agent(paths: &[&str]) -> CacheAgent<CacheDb, StaticSite> {
    let manifest = paths
        .iter()
        .map(|path| Request::new("GET", &format!("http://localhost:8080{path}")).unwrap())
        .collect();
    let settings = AgentSettings { prefix: "App-".into(), version: "v2".into(), manifest };
    CacheAgent::new(CacheDb::open_in_memory().await.unwrap(), StaticSite, settings)
}

/// Parse the JSON text of the first content item.
pub fn output_json(result: &CallToolResult) -> serde_json::Value {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
